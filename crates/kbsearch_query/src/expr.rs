//! Expression AST.
//!
//! Expressions compute a single value, usually relative to a context object
//! (the element of the set currently being filtered or mapped). Nodes are
//! built through [`crate::factory`] only; the constructors here are
//! crate-private so that every tree is in canonical form.
//!
//! Equality on nodes includes their [`NodeId`]. Compare printed forms to
//! check two independently built trees for the same shape.

use std::sync::Arc;

use kbsearch_foundation::{Error, Result, Value};

use crate::node::{NodeId, TypeSystemDependent};
use crate::operator::Operator;
use crate::set::SetExpression;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An expression node.
#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    /// A constant value.
    Literal(Literal),
    /// A named placeholder bound by query arguments.
    Parameter(Parameter),
    /// The current context object.
    ContextAccess(NodeId),
    /// The revision the query was requested for.
    RequestedHistoryContext(NodeId),
    /// An operator applied to one argument.
    Unary(UnaryOperation),
    /// An operator applied to two arguments.
    Binary(BinaryOperation),
    /// A primitive attribute of the context object.
    Attribute(Attribute),
    /// A reference attribute of the context object.
    Reference(Reference),
    /// A dynamically typed attribute accessed by name.
    Flex(Flex),
    /// An entry of a tuple-valued context.
    GetEntry(GetEntry),
    /// An expression evaluated with another context.
    Eval(Eval),
    /// Membership of the context in a set.
    InSet(InSet),
    /// Whether the context is the current version of its object.
    IsCurrent(IsCurrent),
    /// Exact type test of the context.
    HasType(TypeCheck),
    /// Type test of the context, including subtypes.
    InstanceOf(TypeCheck),
    /// A tuple of expressions.
    Tuple(ExpressionTuple),
    /// Regular expression match.
    Matches(Matches),
}

impl Expression {
    /// Returns the identity of this node.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        match self {
            Self::ContextAccess(id) | Self::RequestedHistoryContext(id) => *id,
            Self::Literal(e) => e.id,
            Self::Parameter(e) => e.id,
            Self::Unary(e) => e.id,
            Self::Binary(e) => e.id,
            Self::Attribute(e) => e.id,
            Self::Reference(e) => e.id,
            Self::Flex(e) => e.id,
            Self::GetEntry(e) => e.id,
            Self::Eval(e) => e.id,
            Self::InSet(e) => e.id,
            Self::IsCurrent(e) => e.id,
            Self::HasType(e) | Self::InstanceOf(e) => e.id,
            Self::Tuple(e) => e.id,
            Self::Matches(e) => e.id,
        }
    }

    /// A human-readable name for the kind of this node.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Literal(_) => "literal",
            Self::Parameter(_) => "parameter",
            Self::ContextAccess(_) => "context",
            Self::RequestedHistoryContext(_) => "requested-history-context",
            Self::Unary(_) => "unary-operation",
            Self::Binary(_) => "binary-operation",
            Self::Attribute(_) => "attribute",
            Self::Reference(_) => "reference",
            Self::Flex(_) => "flex",
            Self::GetEntry(_) => "get-entry",
            Self::Eval(_) => "eval",
            Self::InSet(_) => "in-set",
            Self::IsCurrent(_) => "is-current",
            Self::HasType(_) => "has-type",
            Self::InstanceOf(_) => "instance-of",
            Self::Tuple(_) => "tuple",
            Self::Matches(_) => "matches",
        }
    }

    /// Returns the literal node, or None if this is not a literal.
    #[must_use]
    pub const fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Returns the literal value, or None if this is not a literal.
    #[must_use]
    pub const fn literal_value(&self) -> Option<&Value> {
        match self {
            Self::Literal(lit) => Some(&lit.value),
            _ => None,
        }
    }

    /// Returns true if this is the literal `true`.
    #[must_use]
    pub fn is_literal_true(&self) -> bool {
        self.is_literal_bool(true)
    }

    /// Returns true if this is the literal `false`.
    #[must_use]
    pub fn is_literal_false(&self) -> bool {
        self.is_literal_bool(false)
    }

    /// Only a literal holding exactly the boolean counts; equivalent
    /// constants of other shapes do not.
    fn is_literal_bool(&self, expected: bool) -> bool {
        matches!(self.literal_value(), Some(Value::Bool(b)) if *b == expected)
    }

    /// Returns the context expression of a context-relative node.
    #[must_use]
    pub fn context(&self) -> Option<&Expression> {
        match self {
            Self::Attribute(e) => Some(&e.context),
            Self::Reference(e) => Some(&e.context),
            Self::Flex(e) => Some(&e.context),
            Self::GetEntry(e) => Some(&e.context),
            Self::Eval(e) => Some(&e.context),
            Self::InSet(e) => Some(&e.context),
            Self::IsCurrent(e) => Some(&e.context),
            Self::HasType(e) | Self::InstanceOf(e) => Some(&e.context),
            _ => None,
        }
    }

    /// Dispatches to the visitor method for this node's kind.
    pub fn visit<V: ExpressionVisitor<A> + ?Sized, A>(&self, visitor: &mut V, arg: A) -> V::ExprOutput {
        match self {
            Self::Literal(e) => visitor.visit_literal(e, arg),
            Self::Parameter(e) => visitor.visit_parameter(e, arg),
            Self::ContextAccess(id) => visitor.visit_context_access(*id, arg),
            Self::RequestedHistoryContext(id) => visitor.visit_requested_history_context(*id, arg),
            Self::Unary(e) => visitor.visit_unary_operation(e, arg),
            Self::Binary(e) => visitor.visit_binary_operation(e, arg),
            Self::Attribute(e) => visitor.visit_attribute(e, arg),
            Self::Reference(e) => visitor.visit_reference(e, arg),
            Self::Flex(e) => visitor.visit_flex(e, arg),
            Self::GetEntry(e) => visitor.visit_get_entry(e, arg),
            Self::Eval(e) => visitor.visit_eval(e, arg),
            Self::InSet(e) => visitor.visit_in_set(e, arg),
            Self::IsCurrent(e) => visitor.visit_is_current(e, arg),
            Self::HasType(e) => visitor.visit_has_type(e, arg),
            Self::InstanceOf(e) => visitor.visit_instance_of(e, arg),
            Self::Tuple(e) => visitor.visit_tuple(e, arg),
            Self::Matches(e) => visitor.visit_matches(e, arg),
        }
    }
}

/// Visitor over [`Expression`]s.
///
/// There are no default methods, so every implementation handles every
/// node kind.
#[allow(missing_docs)]
pub trait ExpressionVisitor<A> {
    /// Result of visiting an expression.
    type ExprOutput;

    fn visit_literal(&mut self, expr: &Literal, arg: A) -> Self::ExprOutput;
    fn visit_parameter(&mut self, expr: &Parameter, arg: A) -> Self::ExprOutput;
    fn visit_context_access(&mut self, id: NodeId, arg: A) -> Self::ExprOutput;
    fn visit_requested_history_context(&mut self, id: NodeId, arg: A) -> Self::ExprOutput;
    fn visit_unary_operation(&mut self, expr: &UnaryOperation, arg: A) -> Self::ExprOutput;
    fn visit_binary_operation(&mut self, expr: &BinaryOperation, arg: A) -> Self::ExprOutput;
    fn visit_attribute(&mut self, expr: &Attribute, arg: A) -> Self::ExprOutput;
    fn visit_reference(&mut self, expr: &Reference, arg: A) -> Self::ExprOutput;
    fn visit_flex(&mut self, expr: &Flex, arg: A) -> Self::ExprOutput;
    fn visit_get_entry(&mut self, expr: &GetEntry, arg: A) -> Self::ExprOutput;
    fn visit_eval(&mut self, expr: &Eval, arg: A) -> Self::ExprOutput;
    fn visit_in_set(&mut self, expr: &InSet, arg: A) -> Self::ExprOutput;
    fn visit_is_current(&mut self, expr: &IsCurrent, arg: A) -> Self::ExprOutput;
    fn visit_has_type(&mut self, expr: &TypeCheck, arg: A) -> Self::ExprOutput;
    fn visit_instance_of(&mut self, expr: &TypeCheck, arg: A) -> Self::ExprOutput;
    fn visit_tuple(&mut self, expr: &ExpressionTuple, arg: A) -> Self::ExprOutput;
    fn visit_matches(&mut self, expr: &Matches, arg: A) -> Self::ExprOutput;
}

// =============================================================================
// Leaves
// =============================================================================

/// A constant value. Never null.
#[derive(Clone, Debug, PartialEq)]
pub struct Literal {
    pub(crate) id: NodeId,
    value: Value,
}

impl Literal {
    pub(crate) fn new(value: Value) -> Result<Self> {
        if value.is_null() {
            return Err(Error::invalid_argument(
                "Literals with value 'null' are not allowed.",
            ));
        }
        Ok(Self {
            id: NodeId::fresh(),
            value: value.normalize(),
        })
    }

    pub(crate) fn boolean(value: bool) -> Self {
        Self {
            id: NodeId::fresh(),
            value: Value::Bool(value),
        }
    }

    pub(crate) fn fresh_copy(&self) -> Self {
        Self {
            id: NodeId::fresh(),
            value: self.value.clone(),
        }
    }

    /// Returns the (normalized) value.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }
}

/// A named placeholder for a single value.
#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    pub(crate) id: NodeId,
    name: Arc<str>,
}

impl Parameter {
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

impl TypeSystemDependent for Parameter {
    fn node_id(&self) -> NodeId {
        self.id
    }

    fn type_name(&self) -> Option<&str> {
        None
    }
}

// =============================================================================
// Operations
// =============================================================================

/// An operator applied to one argument.
#[derive(Clone, Debug, PartialEq)]
pub struct UnaryOperation {
    pub(crate) id: NodeId,
    operator: Operator,
    argument: Box<Expression>,
}

impl UnaryOperation {
    pub(crate) fn new(operator: Operator, argument: Expression) -> Self {
        debug_assert_eq!(operator.expected_arguments(), 1, "{operator}");
        Self {
            id: NodeId::fresh(),
            operator,
            argument: Box::new(argument),
        }
    }

    /// Returns the operator.
    #[must_use]
    pub const fn operator(&self) -> Operator {
        self.operator
    }

    /// Returns the argument.
    #[must_use]
    pub fn argument(&self) -> &Expression {
        &self.argument
    }

    /// Returns the number of arguments, always 1.
    #[must_use]
    pub const fn argument_count(&self) -> usize {
        1
    }
}

/// An operator applied to two arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct BinaryOperation {
    pub(crate) id: NodeId,
    operator: Operator,
    left: Box<Expression>,
    right: Box<Expression>,
}

impl BinaryOperation {
    pub(crate) fn new(operator: Operator, left: Expression, right: Expression) -> Self {
        debug_assert_eq!(operator.expected_arguments(), 2, "{operator}");
        Self {
            id: NodeId::fresh(),
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Returns the operator.
    #[must_use]
    pub const fn operator(&self) -> Operator {
        self.operator
    }

    /// Returns the left argument.
    #[must_use]
    pub fn left(&self) -> &Expression {
        &self.left
    }

    /// Returns the right argument.
    #[must_use]
    pub fn right(&self) -> &Expression {
        &self.right
    }

    /// Returns the number of arguments, always 2.
    #[must_use]
    pub const fn argument_count(&self) -> usize {
        2
    }
}

// =============================================================================
// Context-relative nodes
// =============================================================================

/// A primitive attribute of the context object.
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    pub(crate) id: NodeId,
    context: Box<Expression>,
    owner_type_name: Arc<str>,
    attribute_name: Arc<str>,
}

impl Attribute {
    pub(crate) fn new(
        context: Expression,
        owner_type_name: impl Into<Arc<str>>,
        attribute_name: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            id: NodeId::fresh(),
            context: Box::new(context),
            owner_type_name: owner_type_name.into(),
            attribute_name: attribute_name.into(),
        }
    }

    /// Returns the identity of this node.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the context expression.
    #[must_use]
    pub fn context(&self) -> &Expression {
        &self.context
    }

    /// Returns the name of the type declaring the attribute.
    #[must_use]
    pub fn owner_type_name(&self) -> &str {
        &self.owner_type_name
    }

    /// Returns the attribute name.
    #[must_use]
    pub fn attribute_name(&self) -> &str {
        &self.attribute_name
    }
}

/// Part of a reference value an access selects.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ReferencePart {
    /// The identifier of the referenced object.
    Name,
    /// The type of the referenced object.
    Type,
    /// The branch of the referenced object.
    Branch,
    /// The revision of the referenced object.
    Revision,
}

impl ReferencePart {
    /// Returns the name used when printing expressions.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Type => "type",
            Self::Branch => "branch",
            Self::Revision => "revision",
        }
    }
}

/// A reference attribute of the context object.
///
/// Without an access part the whole referenced object is selected.
#[derive(Clone, Debug, PartialEq)]
pub struct Reference {
    pub(crate) id: NodeId,
    context: Box<Expression>,
    owner_type_name: Arc<str>,
    attribute_name: Arc<str>,
    access_part: Option<ReferencePart>,
}

impl Reference {
    pub(crate) fn new(
        context: Expression,
        owner_type_name: impl Into<Arc<str>>,
        attribute_name: impl Into<Arc<str>>,
        access_part: Option<ReferencePart>,
    ) -> Self {
        Self {
            id: NodeId::fresh(),
            context: Box::new(context),
            owner_type_name: owner_type_name.into(),
            attribute_name: attribute_name.into(),
            access_part,
        }
    }

    /// Returns the identity of this node.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the context expression.
    #[must_use]
    pub fn context(&self) -> &Expression {
        &self.context
    }

    /// Returns the name of the type declaring the reference.
    #[must_use]
    pub fn owner_type_name(&self) -> &str {
        &self.owner_type_name
    }

    /// Returns the reference name.
    #[must_use]
    pub fn attribute_name(&self) -> &str {
        &self.attribute_name
    }

    /// Returns the selected part, if any.
    #[must_use]
    pub const fn access_part(&self) -> Option<ReferencePart> {
        self.access_part
    }
}

/// A dynamically typed attribute accessed by name.
#[derive(Clone, Debug, PartialEq)]
pub struct Flex {
    pub(crate) id: NodeId,
    context: Box<Expression>,
    type_name: Arc<str>,
    name: Arc<str>,
}

impl Flex {
    pub(crate) fn new(
        context: Expression,
        type_name: impl Into<Arc<str>>,
        name: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            id: NodeId::fresh(),
            context: Box::new(context),
            type_name: type_name.into(),
            name: name.into(),
        }
    }

    /// Returns the context expression.
    #[must_use]
    pub fn context(&self) -> &Expression {
        &self.context
    }

    /// Returns the attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the name of the attribute's value type.
    #[must_use]
    pub fn value_type_name(&self) -> &str {
        &self.type_name
    }
}

impl TypeSystemDependent for Flex {
    fn node_id(&self) -> NodeId {
        self.id
    }

    fn type_name(&self) -> Option<&str> {
        Some(&self.type_name)
    }
}

/// An entry of a tuple-valued context.
#[derive(Clone, Debug, PartialEq)]
pub struct GetEntry {
    pub(crate) id: NodeId,
    context: Box<Expression>,
    index: usize,
}

impl GetEntry {
    pub(crate) fn new(context: Expression, index: usize) -> Self {
        Self {
            id: NodeId::fresh(),
            context: Box::new(context),
            index,
        }
    }

    /// Returns the context expression.
    #[must_use]
    pub fn context(&self) -> &Expression {
        &self.context
    }

    /// Returns the tuple index.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }
}

/// Evaluates `expr` with the value of `context` as the context object.
#[derive(Clone, Debug, PartialEq)]
pub struct Eval {
    pub(crate) id: NodeId,
    context: Box<Expression>,
    expr: Box<Expression>,
}

impl Eval {
    pub(crate) fn new(context: Expression, expr: Expression) -> Self {
        Self {
            id: NodeId::fresh(),
            context: Box::new(context),
            expr: Box::new(expr),
        }
    }

    /// Returns the context expression.
    #[must_use]
    pub fn context(&self) -> &Expression {
        &self.context
    }

    /// Returns the evaluated expression.
    #[must_use]
    pub fn expr(&self) -> &Expression {
        &self.expr
    }
}

/// Membership of the context value in a set.
#[derive(Clone, Debug, PartialEq)]
pub struct InSet {
    pub(crate) id: NodeId,
    context: Box<Expression>,
    set: Box<SetExpression>,
}

impl InSet {
    pub(crate) fn new(context: Expression, set: SetExpression) -> Self {
        Self {
            id: NodeId::fresh(),
            context: Box::new(context),
            set: Box::new(set),
        }
    }

    /// Returns the context expression.
    #[must_use]
    pub fn context(&self) -> &Expression {
        &self.context
    }

    /// Returns the set searched.
    #[must_use]
    pub fn set(&self) -> &SetExpression {
        &self.set
    }
}

/// Whether the context is the current version of its object.
#[derive(Clone, Debug, PartialEq)]
pub struct IsCurrent {
    pub(crate) id: NodeId,
    context: Box<Expression>,
}

impl IsCurrent {
    pub(crate) fn new(context: Expression) -> Self {
        Self {
            id: NodeId::fresh(),
            context: Box::new(context),
        }
    }

    /// Returns the context expression.
    #[must_use]
    pub fn context(&self) -> &Expression {
        &self.context
    }
}

/// Type test of the context, used by both `has-type` and `instance-of`.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeCheck {
    pub(crate) id: NodeId,
    context: Box<Expression>,
    type_name: Arc<str>,
}

impl TypeCheck {
    pub(crate) fn new(context: Expression, type_name: impl Into<Arc<str>>) -> Self {
        Self {
            id: NodeId::fresh(),
            context: Box::new(context),
            type_name: type_name.into(),
        }
    }

    /// Returns the context expression.
    #[must_use]
    pub fn context(&self) -> &Expression {
        &self.context
    }

    /// Returns the tested type name.
    #[must_use]
    pub fn checked_type_name(&self) -> &str {
        &self.type_name
    }
}

impl TypeSystemDependent for TypeCheck {
    fn node_id(&self) -> NodeId {
        self.id
    }

    fn type_name(&self) -> Option<&str> {
        Some(&self.type_name)
    }
}

// =============================================================================
// Composites
// =============================================================================

/// A non-empty tuple of expressions.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpressionTuple {
    pub(crate) id: NodeId,
    expressions: Vec<Expression>,
}

impl ExpressionTuple {
    pub(crate) fn new(expressions: Vec<Expression>) -> Result<Self> {
        if expressions.is_empty() {
            return Err(Error::invalid_argument("No empty tuples."));
        }
        Ok(Self {
            id: NodeId::fresh(),
            expressions,
        })
    }

    pub(crate) fn from_copies(expressions: Vec<Expression>) -> Self {
        debug_assert!(!expressions.is_empty());
        Self {
            id: NodeId::fresh(),
            expressions,
        }
    }

    /// Returns the tuple entries.
    #[must_use]
    pub fn expressions(&self) -> &[Expression] {
        &self.expressions
    }
}

/// Regular expression match of a string-valued expression.
#[derive(Clone, Debug, PartialEq)]
pub struct Matches {
    pub(crate) id: NodeId,
    regex: Arc<str>,
    expr: Box<Expression>,
}

impl Matches {
    pub(crate) fn new(regex: impl Into<Arc<str>>, expr: Expression) -> Self {
        Self {
            id: NodeId::fresh(),
            regex: regex.into(),
            expr: Box::new(expr),
        }
    }

    /// Returns the pattern.
    #[must_use]
    pub fn regex(&self) -> &str {
        &self.regex
    }

    /// Returns the matched expression.
    #[must_use]
    pub fn expr(&self) -> &Expression {
        &self.expr
    }
}
