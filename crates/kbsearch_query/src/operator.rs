//! Symbolic operators of unary and binary operations.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Operator of a [`crate::UnaryOperation`] or [`crate::BinaryOperation`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Operator {
    /// Boolean negation.
    Not,
    /// Test for the absent value.
    IsNull,
    /// Boolean conjunction.
    And,
    /// Boolean disjunction.
    Or,
    /// Less than or equal.
    Le,
    /// Greater than or equal.
    Ge,
    /// Less than.
    Lt,
    /// Greater than.
    Gt,
    /// Exact (binary) equality.
    EqBinary,
    /// Case-insensitive equality.
    EqCi,
    /// Branch of an object.
    Branch,
    /// Revision of an object.
    Revision,
    /// History context of an object key.
    HistoryContext,
    /// Identifier of an object.
    Identifier,
    /// Name of the concrete type of an object.
    TypeName,
}

impl Operator {
    /// All operators, in declaration order.
    pub const ALL: [Operator; 15] = [
        Self::Not,
        Self::IsNull,
        Self::And,
        Self::Or,
        Self::Le,
        Self::Ge,
        Self::Lt,
        Self::Gt,
        Self::EqBinary,
        Self::EqCi,
        Self::Branch,
        Self::Revision,
        Self::HistoryContext,
        Self::Identifier,
        Self::TypeName,
    ];

    /// Returns the number of arguments the operator takes.
    #[must_use]
    pub const fn expected_arguments(self) -> usize {
        match self {
            Self::Not
            | Self::IsNull
            | Self::Branch
            | Self::Revision
            | Self::HistoryContext
            | Self::Identifier
            | Self::TypeName => 1,
            Self::And
            | Self::Or
            | Self::Le
            | Self::Ge
            | Self::Lt
            | Self::Gt
            | Self::EqBinary
            | Self::EqCi => 2,
        }
    }

    /// Returns true if the operator produces a boolean.
    #[must_use]
    pub const fn is_predicate(self) -> bool {
        !matches!(
            self,
            Self::Branch | Self::Revision | Self::HistoryContext | Self::Identifier | Self::TypeName
        )
    }

    /// Returns the symbol used when printing expressions.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Not => "not",
            Self::IsNull => "is-null",
            Self::And => "and",
            Self::Or => "or",
            Self::Le => "<=",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::EqBinary => "=",
            Self::EqCi => "=ci",
            Self::Branch => "branch",
            Self::Revision => "revision",
            Self::HistoryContext => "history-context",
            Self::Identifier => "identifier",
            Self::TypeName => "type-name",
        }
    }

    /// Dispatches to the visitor method for this operator.
    pub fn visit<V: OperatorVisitor<A>, A>(self, visitor: &mut V, arg: A) -> V::Output {
        match self {
            Self::Not => visitor.visit_not(arg),
            Self::IsNull => visitor.visit_is_null(arg),
            Self::And => visitor.visit_and(arg),
            Self::Or => visitor.visit_or(arg),
            Self::Le => visitor.visit_le(arg),
            Self::Ge => visitor.visit_ge(arg),
            Self::Lt => visitor.visit_lt(arg),
            Self::Gt => visitor.visit_gt(arg),
            Self::EqBinary => visitor.visit_eq_binary(arg),
            Self::EqCi => visitor.visit_eq_ci(arg),
            Self::Branch => visitor.visit_branch(arg),
            Self::Revision => visitor.visit_revision(arg),
            Self::HistoryContext => visitor.visit_history_context(arg),
            Self::Identifier => visitor.visit_identifier(arg),
            Self::TypeName => visitor.visit_type_name(arg),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Visitor over [`Operator`]s.
///
/// There are no default methods: adding an operator breaks every visitor
/// until it handles the new case.
#[allow(missing_docs)]
pub trait OperatorVisitor<A> {
    /// Result of visiting an operator.
    type Output;

    fn visit_not(&mut self, arg: A) -> Self::Output;
    fn visit_is_null(&mut self, arg: A) -> Self::Output;
    fn visit_and(&mut self, arg: A) -> Self::Output;
    fn visit_or(&mut self, arg: A) -> Self::Output;
    fn visit_le(&mut self, arg: A) -> Self::Output;
    fn visit_ge(&mut self, arg: A) -> Self::Output;
    fn visit_lt(&mut self, arg: A) -> Self::Output;
    fn visit_gt(&mut self, arg: A) -> Self::Output;
    fn visit_eq_binary(&mut self, arg: A) -> Self::Output;
    fn visit_eq_ci(&mut self, arg: A) -> Self::Output;
    fn visit_branch(&mut self, arg: A) -> Self::Output;
    fn visit_revision(&mut self, arg: A) -> Self::Output;
    fn visit_history_context(&mut self, arg: A) -> Self::Output;
    fn visit_identifier(&mut self, arg: A) -> Self::Output;
    fn visit_type_name(&mut self, arg: A) -> Self::Output;
}
