//! Construction helpers for backends and query compilers.
//!
//! Unlike [`crate::factory`], these functions expose knobs that application
//! code should not need: the resolve flag and load strategy of a revision
//! query, and node constructors that bind an already resolved [`MetaObject`]
//! into an [`Annotations`] table so no separate binding pass is required.

use kbsearch_foundation::{MetaObject, Result};

use crate::expr::{Expression, TypeCheck};
use crate::factory;
use crate::node::Annotations;
use crate::order::Order;
use crate::query::{
    BranchParam, LoadStrategy, ParameterDeclaration, QueryCore, RangeParam, RevisionQuery,
};
use crate::set::{SetExpression, TypeSource};

/// Builds a revision query with every setting explicit.
///
/// # Errors
///
/// Returns a duplicate parameter error if two declarations share a name.
pub fn new_revision_query<E>(
    branch_param: BranchParam,
    range_param: RangeParam,
    params: Vec<ParameterDeclaration>,
    search: SetExpression,
    order: Option<Order>,
    resolve: bool,
    load_strategy: LoadStrategy,
) -> Result<RevisionQuery<E>> {
    let core = QueryCore::new(branch_param, range_param, params, search)?;
    Ok(RevisionQuery::new(core, order, resolve, load_strategy))
}

/// Declares a parameter whose type is already resolved.
#[must_use]
pub fn param_decl_typed(meta: &MetaObject, name: &str, annotations: &mut Annotations) -> ParameterDeclaration {
    let decl = factory::param_decl(meta.name(), name);
    annotations.set_declared_type(&decl, meta.clone());
    decl
}

/// All instances of a resolved type, excluding subtypes.
#[must_use]
pub fn all_of_typed(meta: &MetaObject, annotations: &mut Annotations) -> SetExpression {
    SetExpression::AllOf(typed_source(meta, annotations))
}

/// All instances of a resolved type, including subtypes.
#[must_use]
pub fn any_of_typed(meta: &MetaObject, annotations: &mut Annotations) -> SetExpression {
    SetExpression::AnyOf(typed_source(meta, annotations))
}

/// Exact type test of the context object against a resolved type.
#[must_use]
pub fn has_type_typed(meta: &MetaObject, annotations: &mut Annotations) -> Expression {
    Expression::HasType(typed_check(meta, annotations))
}

/// Type test of the context object against a resolved type, including subtypes.
#[must_use]
pub fn instance_of_typed(meta: &MetaObject, annotations: &mut Annotations) -> Expression {
    Expression::InstanceOf(typed_check(meta, annotations))
}

fn typed_source(meta: &MetaObject, annotations: &mut Annotations) -> TypeSource {
    let source = TypeSource::new(meta.name());
    annotations.set_declared_type(&source, meta.clone());
    source
}

fn typed_check(meta: &MetaObject, annotations: &mut Annotations) -> TypeCheck {
    let check = TypeCheck::new(factory::context(), meta.name());
    annotations.set_declared_type(&check, meta.clone());
    check
}
