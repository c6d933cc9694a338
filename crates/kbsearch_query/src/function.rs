//! Aggregation functions over a context set.

use crate::expr::Expression;
use crate::node::NodeId;

/// An aggregation function.
///
/// Functions are evaluated over a set of context objects, e.g. one
/// equivalence class of a [`crate::Partition`].
#[derive(Clone, Debug, PartialEq)]
pub enum Function {
    /// Number of elements.
    Count(NodeId),
    /// Sum of `expr` over all elements.
    Sum(Aggregate),
    /// Minimum of `expr` over all elements.
    Min(Aggregate),
    /// Maximum of `expr` over all elements.
    Max(Aggregate),
}

impl Function {
    /// Returns the identity of this node.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        match self {
            Self::Count(id) => *id,
            Self::Sum(f) | Self::Min(f) | Self::Max(f) => f.id,
        }
    }

    /// Returns the function name used when printing.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Count(_) => "count",
            Self::Sum(_) => "sum",
            Self::Min(_) => "min",
            Self::Max(_) => "max",
        }
    }

    /// Returns the aggregated expression, if the function has one.
    #[must_use]
    pub fn expr(&self) -> Option<&Expression> {
        match self {
            Self::Count(_) => None,
            Self::Sum(f) | Self::Min(f) | Self::Max(f) => Some(&f.expr),
        }
    }

    /// Dispatches to the visitor method for this function.
    pub fn visit<V: FunctionVisitor<A> + ?Sized, A>(&self, visitor: &mut V, arg: A) -> V::FunctionOutput {
        match self {
            Self::Count(id) => visitor.visit_count(*id, arg),
            Self::Sum(f) => visitor.visit_sum(f, arg),
            Self::Min(f) => visitor.visit_min(f, arg),
            Self::Max(f) => visitor.visit_max(f, arg),
        }
    }
}

/// Visitor over [`Function`]s. No default methods.
#[allow(missing_docs)]
pub trait FunctionVisitor<A> {
    /// Result of visiting a function.
    type FunctionOutput;

    fn visit_count(&mut self, id: NodeId, arg: A) -> Self::FunctionOutput;
    fn visit_sum(&mut self, f: &Aggregate, arg: A) -> Self::FunctionOutput;
    fn visit_min(&mut self, f: &Aggregate, arg: A) -> Self::FunctionOutput;
    fn visit_max(&mut self, f: &Aggregate, arg: A) -> Self::FunctionOutput;
}

/// An aggregation over the values of one expression.
#[derive(Clone, Debug, PartialEq)]
pub struct Aggregate {
    pub(crate) id: NodeId,
    expr: Box<Expression>,
}

impl Aggregate {
    pub(crate) fn new(expr: Expression) -> Self {
        Self {
            id: NodeId::fresh(),
            expr: Box::new(expr),
        }
    }

    /// Returns the aggregated expression.
    #[must_use]
    pub fn expr(&self) -> &Expression {
        &self.expr
    }
}
