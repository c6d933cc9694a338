//! Result order AST.

use crate::expr::Expression;
use crate::node::NodeId;

/// A result order: a single key or a lexicographic list of keys.
#[derive(Clone, Debug, PartialEq)]
pub enum Order {
    /// One sort key.
    Spec(OrderSpec),
    /// Several sort keys, most significant first.
    Tuple(OrderTuple),
}

impl Order {
    /// Returns the identity of this node.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        match self {
            Self::Spec(spec) => spec.id,
            Self::Tuple(tuple) => tuple.id,
        }
    }

    /// Returns the sort keys, most significant first.
    #[must_use]
    pub fn specs(&self) -> &[OrderSpec] {
        match self {
            Self::Spec(spec) => std::slice::from_ref(spec),
            Self::Tuple(tuple) => &tuple.specs,
        }
    }

    /// Dispatches to the visitor method for this order.
    pub fn visit<V: OrderVisitor<A> + ?Sized, A>(&self, visitor: &mut V, arg: A) -> V::OrderOutput {
        match self {
            Self::Spec(spec) => visitor.visit_order_spec(spec, arg),
            Self::Tuple(tuple) => visitor.visit_order_tuple(tuple, arg),
        }
    }
}

impl From<OrderSpec> for Order {
    fn from(spec: OrderSpec) -> Self {
        Self::Spec(spec)
    }
}

impl From<OrderTuple> for Order {
    fn from(tuple: OrderTuple) -> Self {
        Self::Tuple(tuple)
    }
}

/// Visitor over [`Order`]s. No default methods.
#[allow(missing_docs)]
pub trait OrderVisitor<A> {
    /// Result of visiting an order.
    type OrderOutput;

    fn visit_order_spec(&mut self, spec: &OrderSpec, arg: A) -> Self::OrderOutput;
    fn visit_order_tuple(&mut self, tuple: &OrderTuple, arg: A) -> Self::OrderOutput;
}

/// A single sort key with its direction.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderSpec {
    pub(crate) id: NodeId,
    order_expr: Box<Expression>,
    descending: bool,
}

impl OrderSpec {
    pub(crate) fn new(order_expr: Expression, descending: bool) -> Self {
        Self {
            id: NodeId::fresh(),
            order_expr: Box::new(order_expr),
            descending,
        }
    }

    /// Returns the identity of this node.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the key expression.
    #[must_use]
    pub fn order_expr(&self) -> &Expression {
        &self.order_expr
    }

    /// Returns true if larger keys sort first.
    #[must_use]
    pub const fn is_descending(&self) -> bool {
        self.descending
    }
}

/// A lexicographic list of sort keys.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderTuple {
    pub(crate) id: NodeId,
    specs: Vec<OrderSpec>,
}

impl OrderTuple {
    pub(crate) fn new(specs: Vec<OrderSpec>) -> Self {
        Self {
            id: NodeId::fresh(),
            specs,
        }
    }

    /// Returns the sort keys, most significant first.
    #[must_use]
    pub fn specs(&self) -> &[OrderSpec] {
        &self.specs
    }
}
