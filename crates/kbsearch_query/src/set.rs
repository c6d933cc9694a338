//! Set expression AST.
//!
//! A set expression describes a collection of values: all instances of a
//! type, a literal collection, or the result of filtering, mapping,
//! partitioning or combining other sets.

use std::sync::Arc;

use kbsearch_foundation::{Error, Result, Value};

use crate::expr::Expression;
use crate::function::Function;
use crate::node::{NodeId, TypeSystemDependent};

/// A set expression node.
#[derive(Clone, Debug, PartialEq)]
pub enum SetExpression {
    /// The empty set.
    None(NodeId),
    /// A literal collection of values.
    SetLiteral(SetLiteral),
    /// A named placeholder for a collection of values.
    SetParameter(SetParameter),
    /// All instances of a type, excluding subtypes.
    AllOf(TypeSource),
    /// All instances of a type, including subtypes.
    AnyOf(TypeSource),
    /// Elements of a source for which a predicate holds.
    Filter(Filter),
    /// Projection of every element of a source.
    MapTo(MapTo),
    /// One representative per equivalence class of a source.
    Partition(Partition),
    /// Tuples of elements of several sources.
    CrossProduct(CrossProduct),
    /// Elements in either operand.
    Union(SetOperation),
    /// Elements in both operands.
    Intersection(SetOperation),
    /// Elements of the left operand not in the right operand.
    Substraction(SetOperation),
}

impl SetExpression {
    /// Returns the identity of this node.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        match self {
            Self::None(id) => *id,
            Self::SetLiteral(e) => e.id,
            Self::SetParameter(e) => e.id,
            Self::AllOf(e) | Self::AnyOf(e) => e.id,
            Self::Filter(e) => e.id,
            Self::MapTo(e) => e.id,
            Self::Partition(e) => e.id,
            Self::CrossProduct(e) => e.id,
            Self::Union(e) | Self::Intersection(e) | Self::Substraction(e) => e.id,
        }
    }

    /// A human-readable name for the kind of this node.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::None(_) => "none",
            Self::SetLiteral(_) => "set-literal",
            Self::SetParameter(_) => "set-parameter",
            Self::AllOf(_) => "all-of",
            Self::AnyOf(_) => "any-of",
            Self::Filter(_) => "filter",
            Self::MapTo(_) => "map",
            Self::Partition(_) => "partition",
            Self::CrossProduct(_) => "cross-product",
            Self::Union(_) => "union",
            Self::Intersection(_) => "intersection",
            Self::Substraction(_) => "substraction",
        }
    }

    /// Dispatches to the visitor method for this node's kind.
    pub fn visit<V: SetExpressionVisitor<A> + ?Sized, A>(&self, visitor: &mut V, arg: A) -> V::SetOutput {
        match self {
            Self::None(id) => visitor.visit_none(*id, arg),
            Self::SetLiteral(e) => visitor.visit_set_literal(e, arg),
            Self::SetParameter(e) => visitor.visit_set_parameter(e, arg),
            Self::AllOf(e) => visitor.visit_all_of(e, arg),
            Self::AnyOf(e) => visitor.visit_any_of(e, arg),
            Self::Filter(e) => visitor.visit_filter(e, arg),
            Self::MapTo(e) => visitor.visit_map_to(e, arg),
            Self::Partition(e) => visitor.visit_partition(e, arg),
            Self::CrossProduct(e) => visitor.visit_cross_product(e, arg),
            Self::Union(e) => visitor.visit_union(e, arg),
            Self::Intersection(e) => visitor.visit_intersection(e, arg),
            Self::Substraction(e) => visitor.visit_substraction(e, arg),
        }
    }
}

/// Visitor over [`SetExpression`]s. No default methods.
#[allow(missing_docs)]
pub trait SetExpressionVisitor<A> {
    /// Result of visiting a set expression.
    type SetOutput;

    fn visit_none(&mut self, id: NodeId, arg: A) -> Self::SetOutput;
    fn visit_set_literal(&mut self, expr: &SetLiteral, arg: A) -> Self::SetOutput;
    fn visit_set_parameter(&mut self, expr: &SetParameter, arg: A) -> Self::SetOutput;
    fn visit_all_of(&mut self, expr: &TypeSource, arg: A) -> Self::SetOutput;
    fn visit_any_of(&mut self, expr: &TypeSource, arg: A) -> Self::SetOutput;
    fn visit_filter(&mut self, expr: &Filter, arg: A) -> Self::SetOutput;
    fn visit_map_to(&mut self, expr: &MapTo, arg: A) -> Self::SetOutput;
    fn visit_partition(&mut self, expr: &Partition, arg: A) -> Self::SetOutput;
    fn visit_cross_product(&mut self, expr: &CrossProduct, arg: A) -> Self::SetOutput;
    fn visit_union(&mut self, expr: &SetOperation, arg: A) -> Self::SetOutput;
    fn visit_intersection(&mut self, expr: &SetOperation, arg: A) -> Self::SetOutput;
    fn visit_substraction(&mut self, expr: &SetOperation, arg: A) -> Self::SetOutput;
}

// =============================================================================
// Sources
// =============================================================================

/// A literal collection of non-null, normalized values.
#[derive(Clone, Debug, PartialEq)]
pub struct SetLiteral {
    pub(crate) id: NodeId,
    values: Vec<Value>,
}

impl SetLiteral {
    pub(crate) fn new(values: impl IntoIterator<Item = Value>) -> Result<Self> {
        let values = values
            .into_iter()
            .map(|value| {
                if value.is_null() {
                    Err(Error::invalid_argument("Set literals must not contain 'null'."))
                } else {
                    Ok(value.normalize())
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            id: NodeId::fresh(),
            values,
        })
    }

    pub(crate) fn fresh_copy(&self) -> Self {
        Self {
            id: NodeId::fresh(),
            values: self.values.clone(),
        }
    }

    /// Returns the values.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

/// A named placeholder for a collection.
#[derive(Clone, Debug, PartialEq)]
pub struct SetParameter {
    pub(crate) id: NodeId,
    name: Arc<str>,
}

impl SetParameter {
    pub(crate) fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            id: NodeId::fresh(),
            name: name.into(),
        }
    }

    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl TypeSystemDependent for SetParameter {
    fn node_id(&self) -> NodeId {
        self.id
    }

    fn type_name(&self) -> Option<&str> {
        None
    }
}

/// Instances of a named type, used by `all-of` and `any-of`.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeSource {
    pub(crate) id: NodeId,
    type_name: Arc<str>,
}

impl TypeSource {
    pub(crate) fn new(type_name: impl Into<Arc<str>>) -> Self {
        Self {
            id: NodeId::fresh(),
            type_name: type_name.into(),
        }
    }

    /// Returns the name of the source type.
    #[must_use]
    pub fn source_type_name(&self) -> &str {
        &self.type_name
    }
}

impl TypeSystemDependent for TypeSource {
    fn node_id(&self) -> NodeId {
        self.id
    }

    fn type_name(&self) -> Option<&str> {
        Some(&self.type_name)
    }
}

// =============================================================================
// Combinators
// =============================================================================

/// Elements of `source` for which `filter` evaluates to true.
#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
    pub(crate) id: NodeId,
    source: Box<SetExpression>,
    filter: Box<Expression>,
}

impl Filter {
    pub(crate) fn new(source: SetExpression, filter: Expression) -> Self {
        Self {
            id: NodeId::fresh(),
            source: Box::new(source),
            filter: Box::new(filter),
        }
    }

    /// Returns the filtered set.
    #[must_use]
    pub fn source(&self) -> &SetExpression {
        &self.source
    }

    /// Returns the predicate, evaluated with each element as context.
    #[must_use]
    pub fn filter(&self) -> &Expression {
        &self.filter
    }
}

/// `mapping` evaluated for every element of `source`.
#[derive(Clone, Debug, PartialEq)]
pub struct MapTo {
    pub(crate) id: NodeId,
    source: Box<SetExpression>,
    mapping: Box<Expression>,
}

impl MapTo {
    pub(crate) fn new(source: SetExpression, mapping: Expression) -> Self {
        Self {
            id: NodeId::fresh(),
            source: Box::new(source),
            mapping: Box::new(mapping),
        }
    }

    /// Returns the mapped set.
    #[must_use]
    pub fn source(&self) -> &SetExpression {
        &self.source
    }

    /// Returns the projection.
    #[must_use]
    pub fn mapping(&self) -> &Expression {
        &self.mapping
    }
}

/// Groups `source` by `equivalence` and picks one value per group through
/// `representative`.
#[derive(Clone, Debug, PartialEq)]
pub struct Partition {
    pub(crate) id: NodeId,
    source: Box<SetExpression>,
    equivalence: Box<Expression>,
    representative: Box<Function>,
}

impl Partition {
    pub(crate) fn new(source: SetExpression, equivalence: Expression, representative: Function) -> Self {
        Self {
            id: NodeId::fresh(),
            source: Box::new(source),
            equivalence: Box::new(equivalence),
            representative: Box::new(representative),
        }
    }

    /// Returns the partitioned set.
    #[must_use]
    pub fn source(&self) -> &SetExpression {
        &self.source
    }

    /// Returns the grouping key.
    #[must_use]
    pub fn equivalence(&self) -> &Expression {
        &self.equivalence
    }

    /// Returns the aggregation applied to each group.
    #[must_use]
    pub fn representative(&self) -> &Function {
        &self.representative
    }
}

/// Tuples built from a non-empty list of sources.
#[derive(Clone, Debug, PartialEq)]
pub struct CrossProduct {
    pub(crate) id: NodeId,
    sources: Vec<SetExpression>,
}

impl CrossProduct {
    pub(crate) fn new(sources: Vec<SetExpression>) -> Result<Self> {
        if sources.is_empty() {
            return Err(Error::invalid_argument("Empty cross product."));
        }
        Ok(Self {
            id: NodeId::fresh(),
            sources,
        })
    }

    pub(crate) fn from_copies(sources: Vec<SetExpression>) -> Self {
        debug_assert!(!sources.is_empty());
        Self {
            id: NodeId::fresh(),
            sources,
        }
    }

    /// Returns the combined sources.
    #[must_use]
    pub fn sources(&self) -> &[SetExpression] {
        &self.sources
    }
}

/// A binary set operation; the operation itself is the enclosing variant.
#[derive(Clone, Debug, PartialEq)]
pub struct SetOperation {
    pub(crate) id: NodeId,
    left: Box<SetExpression>,
    right: Box<SetExpression>,
}

impl SetOperation {
    pub(crate) fn new(left: SetExpression, right: SetExpression) -> Self {
        Self {
            id: NodeId::fresh(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Returns the left operand.
    #[must_use]
    pub fn left(&self) -> &SetExpression {
        &self.left
    }

    /// Returns the right operand.
    #[must_use]
    pub fn right(&self) -> &SetExpression {
        &self.right
    }
}
