//! Queries: a search set expression plus branch, range and parameter
//! declarations.

use std::any;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use kbsearch_foundation::{Error, Result};

use crate::arguments::QueryArguments;
use crate::node::{NodeId, TypeSystemDependent};
use crate::order::Order;
use crate::set::SetExpression;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// =============================================================================
// Parameters
// =============================================================================

/// Which branches a query searches.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BranchParam {
    /// One branch: the requested branch, or the context default.
    #[default]
    Single,
    /// All branches, no restriction.
    All,
    /// An explicit set of branches. Not supported.
    Set,
    /// All branches except an explicit set. Not supported.
    Without,
}

/// Which window of the result rows a query returns.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RangeParam {
    /// All rows.
    #[default]
    Complete,
    /// Only the first row.
    First,
    /// Rows up to the requested stop row.
    Head,
    /// Rows between the requested start and stop rows.
    Range,
}

/// Which revisions a history query searches.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RevisionParam {
    /// The complete history.
    #[default]
    All,
    /// Revisions between the requested start and stop revisions.
    Range,
}

/// How eagerly a revision query fetches the payload of its results.
///
/// Only a hint to the executor; results are the same for every strategy.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LoadStrategy {
    /// Let the executor decide.
    #[default]
    Default,
    /// Fetch identifiers only and load objects on demand.
    IdLoad,
    /// Fetch identifiers and payload in one pass.
    FullLoad,
}

/// Declaration of a named, typed query parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterDeclaration {
    pub(crate) id: NodeId,
    type_name: Arc<str>,
    name: Arc<str>,
}

impl ParameterDeclaration {
    pub(crate) fn new(type_name: impl Into<Arc<str>>, name: impl Into<Arc<str>>) -> Self {
        Self {
            id: NodeId::fresh(),
            type_name: type_name.into(),
            name: name.into(),
        }
    }

    /// Returns the identity of this node.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the name of the parameter's value type.
    #[must_use]
    pub fn declared_type_name(&self) -> &str {
        &self.type_name
    }
}

impl TypeSystemDependent for ParameterDeclaration {
    fn node_id(&self) -> NodeId {
        self.id
    }

    fn type_name(&self) -> Option<&str> {
        Some(&self.type_name)
    }
}

// =============================================================================
// Query core
// =============================================================================

/// State shared by all query kinds.
#[derive(Clone, Debug)]
pub struct QueryCore {
    branch_param: BranchParam,
    range_param: RangeParam,
    parameters: Vec<ParameterDeclaration>,
    index: HashMap<Arc<str>, usize>,
    search: SetExpression,
}

impl QueryCore {
    pub(crate) fn new(
        branch_param: BranchParam,
        range_param: RangeParam,
        parameters: Vec<ParameterDeclaration>,
        search: SetExpression,
    ) -> Result<Self> {
        let index = index_parameters(&parameters)?;
        Ok(Self {
            branch_param,
            range_param,
            parameters,
            index,
            search,
        })
    }

    pub(crate) fn without_parameters(
        branch_param: BranchParam,
        range_param: RangeParam,
        search: SetExpression,
    ) -> Self {
        Self {
            branch_param,
            range_param,
            parameters: Vec::new(),
            index: HashMap::new(),
            search,
        }
    }

    /// Returns the branch selection policy.
    #[must_use]
    pub const fn branch_param(&self) -> BranchParam {
        self.branch_param
    }

    /// Returns the row window policy.
    #[must_use]
    pub const fn range_param(&self) -> RangeParam {
        self.range_param
    }

    /// Returns the declared parameters, in argument order.
    #[must_use]
    pub fn parameters(&self) -> &[ParameterDeclaration] {
        &self.parameters
    }

    /// Returns the search expression.
    #[must_use]
    pub const fn search(&self) -> &SetExpression {
        &self.search
    }

    /// Returns the argument position of a declared parameter.
    #[must_use]
    pub fn parameter_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Returns the declaration of a parameter by name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&ParameterDeclaration> {
        self.parameter_index(name).map(|i| &self.parameters[i])
    }

    /// Swaps in copied nodes that keep the parameter names and positions.
    pub(crate) fn replace_nodes(&mut self, parameters: Vec<ParameterDeclaration>, search: SetExpression) {
        debug_assert!(
            parameters
                .iter()
                .zip(&self.parameters)
                .all(|(new, old)| new.name() == old.name())
        );
        self.parameters = parameters;
        self.search = search;
    }

    fn set_parameters(&mut self, parameters: Vec<ParameterDeclaration>) -> Result<()> {
        self.index = index_parameters(&parameters)?;
        self.parameters = parameters;
        Ok(())
    }
}

fn index_parameters(parameters: &[ParameterDeclaration]) -> Result<HashMap<Arc<str>, usize>> {
    let mut index = HashMap::with_capacity(parameters.len());
    for (position, decl) in parameters.iter().enumerate() {
        if index.insert(decl.name.clone(), position).is_some() {
            return Err(Error::duplicate_parameter(decl.name()));
        }
    }
    Ok(index)
}

/// Common interface of revision and history queries.
pub trait SearchQuery {
    /// Returns the shared query state.
    fn core(&self) -> &QueryCore;

    /// Returns the shared query state for rewriting passes.
    fn core_mut(&mut self) -> &mut QueryCore;

    /// Returns the branch selection policy.
    fn branch_param(&self) -> BranchParam {
        self.core().branch_param()
    }

    /// Returns the row window policy.
    fn range_param(&self) -> RangeParam {
        self.core().range_param()
    }

    /// Returns the declared parameters.
    fn parameters(&self) -> &[ParameterDeclaration] {
        self.core().parameters()
    }

    /// Returns the search expression.
    fn search(&self) -> &SetExpression {
        self.core().search()
    }

    /// Returns the argument position of a declared parameter.
    fn parameter_index(&self, name: &str) -> Option<usize> {
        self.core().parameter_index(name)
    }

    /// Checks that `args` supplies one value per declared parameter.
    ///
    /// # Errors
    ///
    /// Returns an argument count mismatch error otherwise.
    fn check_arguments(&self, args: &QueryArguments) -> Result<()> {
        let expected = self.parameters().len();
        let actual = args.values().len();
        if expected == actual {
            Ok(())
        } else {
            Err(Error::argument_count_mismatch(expected, actual))
        }
    }

    /// Replaces the search expression. Rewriting passes only, before first
    /// execution.
    fn set_search(&mut self, search: SetExpression) {
        self.core_mut().search = search;
    }

    /// Replaces the declared parameters and rebuilds the name index.
    ///
    /// # Errors
    ///
    /// Returns a duplicate parameter error if two declarations share a name;
    /// the query is left unchanged in that case.
    fn set_parameters(&mut self, parameters: Vec<ParameterDeclaration>) -> Result<()> {
        self.core_mut().set_parameters(parameters)
    }

    /// Replaces the branch selection policy.
    fn set_branch_param(&mut self, branch_param: BranchParam) {
        self.core_mut().branch_param = branch_param;
    }

    /// Replaces the row window policy.
    fn set_range_param(&mut self, range_param: RangeParam) {
        self.core_mut().range_param = range_param;
    }
}

// =============================================================================
// Revision query
// =============================================================================

/// A search in a single revision, producing results of type `E`.
pub struct RevisionQuery<E> {
    core: QueryCore,
    order: Option<Order>,
    resolve: bool,
    load_strategy: LoadStrategy,
    result_type: PhantomData<fn() -> E>,
}

impl<E> RevisionQuery<E> {
    pub(crate) fn new(
        core: QueryCore,
        order: Option<Order>,
        resolve: bool,
        load_strategy: LoadStrategy,
    ) -> Self {
        Self {
            core,
            order,
            resolve,
            load_strategy,
            result_type: PhantomData,
        }
    }

    /// Returns the result order, if any.
    #[must_use]
    pub const fn order(&self) -> Option<&Order> {
        self.order.as_ref()
    }

    /// Returns true if result identifiers are resolved to objects.
    #[must_use]
    pub const fn resolve(&self) -> bool {
        self.resolve
    }

    /// Returns the load strategy hint.
    #[must_use]
    pub const fn load_strategy(&self) -> LoadStrategy {
        self.load_strategy
    }

    /// Returns the name of the expected result type.
    #[must_use]
    pub fn expected_type_name(&self) -> &'static str {
        any::type_name::<E>()
    }

    /// Replaces the result order.
    pub fn set_order(&mut self, order: Option<Order>) {
        self.order = order;
    }

    /// Replaces the load strategy hint.
    pub fn set_load_strategy(&mut self, load_strategy: LoadStrategy) {
        self.load_strategy = load_strategy;
    }
}

impl<E> SearchQuery for RevisionQuery<E> {
    fn core(&self) -> &QueryCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut QueryCore {
        &mut self.core
    }
}

impl<E> Clone for RevisionQuery<E> {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
            order: self.order.clone(),
            resolve: self.resolve,
            load_strategy: self.load_strategy,
            result_type: PhantomData,
        }
    }
}

impl<E> fmt::Debug for RevisionQuery<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevisionQuery")
            .field("expected_type", &self.expected_type_name())
            .field("core", &self.core)
            .field("order", &self.order)
            .field("resolve", &self.resolve)
            .field("load_strategy", &self.load_strategy)
            .finish()
    }
}

// =============================================================================
// History query
// =============================================================================

/// A search over the history of the store.
#[derive(Clone, Debug)]
pub struct HistoryQuery {
    core: QueryCore,
    revision_param: RevisionParam,
}

impl HistoryQuery {
    pub(crate) const fn new(core: QueryCore, revision_param: RevisionParam) -> Self {
        Self {
            core,
            revision_param,
        }
    }

    /// Returns the revision selection policy.
    #[must_use]
    pub const fn revision_param(&self) -> RevisionParam {
        self.revision_param
    }

    /// Replaces the revision selection policy.
    pub fn set_revision_param(&mut self, revision_param: RevisionParam) {
        self.revision_param = revision_param;
    }
}

impl SearchQuery for HistoryQuery {
    fn core(&self) -> &QueryCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut QueryCore {
        &mut self.core
    }
}
