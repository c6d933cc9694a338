//! Visitor families and tree traversal.
//!
//! This module provides:
//! - [`QueryVisitor`] - The sum of all node visitor families, for passes that
//!   must handle every node kind of a query tree
//! - [`PartVisitor`] - Read-only traversal hooks, driven by [`walk_set`],
//!   [`walk_expression`] and friends
//!
//! # Example
//!
//! ```
//! use kbsearch_query::factory as f;
//! use kbsearch_query::visitor::{PartVisitor, QueryPart, walk_set};
//!
//! struct AttributeCounter(usize);
//!
//! impl PartVisitor for AttributeCounter {
//!     fn enter_part(&mut self, part: QueryPart<'_>) -> kbsearch_foundation::Result<()> {
//!         if let QueryPart::Expression(kbsearch_query::Expression::Attribute(_)) = part {
//!             self.0 += 1;
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let set = f::filter(f::all_of("A"), f::eq_binary(f::attribute("A", "x"), f::attribute("A", "y")));
//! let mut counter = AttributeCounter(0);
//! walk_set(&mut counter, &set).unwrap();
//! assert_eq!(counter.0, 2);
//! ```

use kbsearch_foundation::Result;

use crate::expr::{Expression, ExpressionVisitor};
use crate::function::{Function, FunctionVisitor};
use crate::node::NodeId;
use crate::operator::OperatorVisitor;
use crate::order::{Order, OrderSpec, OrderVisitor};
use crate::query::{ParameterDeclaration, SearchQuery};
use crate::set::{SetExpression, SetExpressionVisitor};

// =============================================================================
// Exhaustive visitor
// =============================================================================

/// A visitor handling every node family of a query tree.
///
/// Implemented automatically for every type implementing all five family
/// visitors with the same argument type.
pub trait QueryVisitor<A>:
    ExpressionVisitor<A> + SetExpressionVisitor<A> + FunctionVisitor<A> + OrderVisitor<A> + OperatorVisitor<A>
{
}

impl<A, V> QueryVisitor<A> for V where
    V: ExpressionVisitor<A>
        + SetExpressionVisitor<A>
        + FunctionVisitor<A>
        + OrderVisitor<A>
        + OperatorVisitor<A>
{
}

// =============================================================================
// Read-only traversal
// =============================================================================

/// A borrowed reference to any node of a query tree.
#[derive(Copy, Clone, Debug)]
pub enum QueryPart<'a> {
    /// An expression node.
    Expression(&'a Expression),
    /// A set expression node.
    Set(&'a SetExpression),
    /// An aggregation function.
    Function(&'a Function),
    /// A result order.
    Order(&'a Order),
    /// One key of a result order.
    OrderSpec(&'a OrderSpec),
    /// A parameter declaration.
    Declaration(&'a ParameterDeclaration),
}

impl QueryPart<'_> {
    /// Returns the identity of the node.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        match self {
            Self::Expression(e) => e.id(),
            Self::Set(s) => s.id(),
            Self::Function(f) => f.id(),
            Self::Order(o) => o.id(),
            Self::OrderSpec(s) => s.id(),
            Self::Declaration(d) => d.id(),
        }
    }
}

/// Hooks called by the `walk_*` functions.
///
/// The default implementations do nothing. Returning an error stops the
/// traversal.
#[allow(unused_variables)]
pub trait PartVisitor {
    /// Called before the children of a node are walked.
    ///
    /// # Errors
    ///
    /// Any error stops the traversal and is returned by the walk.
    fn enter_part(&mut self, part: QueryPart<'_>) -> Result<()> {
        Ok(())
    }

    /// Called after the children of a node were walked.
    ///
    /// # Errors
    ///
    /// Any error stops the traversal and is returned by the walk.
    fn leave_part(&mut self, part: QueryPart<'_>) -> Result<()> {
        Ok(())
    }
}

/// Walks an expression depth-first.
///
/// # Errors
///
/// Returns the first error raised by a hook.
pub fn walk_expression<V: PartVisitor + ?Sized>(visitor: &mut V, expr: &Expression) -> Result<()> {
    visitor.enter_part(QueryPart::Expression(expr))?;

    match expr {
        Expression::Literal(_)
        | Expression::Parameter(_)
        | Expression::ContextAccess(_)
        | Expression::RequestedHistoryContext(_) => {}
        Expression::Unary(e) => walk_expression(visitor, e.argument())?,
        Expression::Binary(e) => {
            walk_expression(visitor, e.left())?;
            walk_expression(visitor, e.right())?;
        }
        Expression::Attribute(e) => walk_expression(visitor, e.context())?,
        Expression::Reference(e) => walk_expression(visitor, e.context())?,
        Expression::Flex(e) => walk_expression(visitor, e.context())?,
        Expression::GetEntry(e) => walk_expression(visitor, e.context())?,
        Expression::IsCurrent(e) => walk_expression(visitor, e.context())?,
        Expression::HasType(e) | Expression::InstanceOf(e) => walk_expression(visitor, e.context())?,
        Expression::Eval(e) => {
            walk_expression(visitor, e.context())?;
            walk_expression(visitor, e.expr())?;
        }
        Expression::InSet(e) => {
            walk_expression(visitor, e.context())?;
            walk_set(visitor, e.set())?;
        }
        Expression::Tuple(e) => {
            for entry in e.expressions() {
                walk_expression(visitor, entry)?;
            }
        }
        Expression::Matches(e) => walk_expression(visitor, e.expr())?,
    }

    visitor.leave_part(QueryPart::Expression(expr))
}

/// Walks a set expression depth-first.
///
/// # Errors
///
/// Returns the first error raised by a hook.
pub fn walk_set<V: PartVisitor + ?Sized>(visitor: &mut V, set: &SetExpression) -> Result<()> {
    visitor.enter_part(QueryPart::Set(set))?;

    match set {
        SetExpression::None(_)
        | SetExpression::SetLiteral(_)
        | SetExpression::SetParameter(_)
        | SetExpression::AllOf(_)
        | SetExpression::AnyOf(_) => {}
        SetExpression::Filter(s) => {
            walk_set(visitor, s.source())?;
            walk_expression(visitor, s.filter())?;
        }
        SetExpression::MapTo(s) => {
            walk_set(visitor, s.source())?;
            walk_expression(visitor, s.mapping())?;
        }
        SetExpression::Partition(s) => {
            walk_set(visitor, s.source())?;
            walk_expression(visitor, s.equivalence())?;
            walk_function(visitor, s.representative())?;
        }
        SetExpression::CrossProduct(s) => {
            for source in s.sources() {
                walk_set(visitor, source)?;
            }
        }
        SetExpression::Union(s) | SetExpression::Intersection(s) | SetExpression::Substraction(s) => {
            walk_set(visitor, s.left())?;
            walk_set(visitor, s.right())?;
        }
    }

    visitor.leave_part(QueryPart::Set(set))
}

/// Walks a function and its aggregated expression.
///
/// # Errors
///
/// Returns the first error raised by a hook.
pub fn walk_function<V: PartVisitor + ?Sized>(visitor: &mut V, function: &Function) -> Result<()> {
    visitor.enter_part(QueryPart::Function(function))?;
    if let Some(expr) = function.expr() {
        walk_expression(visitor, expr)?;
    }
    visitor.leave_part(QueryPart::Function(function))
}

/// Walks an order and its key expressions.
///
/// # Errors
///
/// Returns the first error raised by a hook.
pub fn walk_order<V: PartVisitor + ?Sized>(visitor: &mut V, order: &Order) -> Result<()> {
    visitor.enter_part(QueryPart::Order(order))?;
    for spec in order.specs() {
        visitor.enter_part(QueryPart::OrderSpec(spec))?;
        walk_expression(visitor, spec.order_expr())?;
        visitor.leave_part(QueryPart::OrderSpec(spec))?;
    }
    visitor.leave_part(QueryPart::Order(order))
}

/// Walks the declarations and the search expression of a query.
///
/// The order of a revision query is not part of the [`SearchQuery`]
/// interface; walk it separately with [`walk_order`].
///
/// # Errors
///
/// Returns the first error raised by a hook.
pub fn walk_query<V: PartVisitor + ?Sized, Q: SearchQuery + ?Sized>(visitor: &mut V, query: &Q) -> Result<()> {
    for decl in query.parameters() {
        visitor.enter_part(QueryPart::Declaration(decl))?;
        visitor.leave_part(QueryPart::Declaration(decl))?;
    }
    walk_set(visitor, query.search())
}
