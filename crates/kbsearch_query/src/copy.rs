//! Deep copies of query parts with fresh node identities.
//!
//! A copy shares no [`NodeId`] with its original, so annotations bound to
//! the original never apply to the copy. Copies must be bound again before
//! execution.

use crate::expr::{
    Attribute, BinaryOperation, Eval, Expression, ExpressionTuple, ExpressionVisitor, Flex,
    GetEntry, InSet, IsCurrent, Literal, Matches, Parameter, Reference, TypeCheck, UnaryOperation,
};
use crate::function::{Aggregate, Function, FunctionVisitor};
use crate::node::NodeId;
use crate::operator::{Operator, OperatorVisitor};
use crate::order::{Order, OrderSpec, OrderTuple, OrderVisitor};
use crate::query::{HistoryQuery, ParameterDeclaration, QueryCore, RevisionQuery, SearchQuery};
use crate::set::{
    CrossProduct, Filter, MapTo, Partition, SetExpression, SetExpressionVisitor, SetLiteral,
    SetOperation, SetParameter, TypeSource,
};

/// A query part that can be copied with fresh node identities.
pub trait DeepClone {
    /// Returns a structurally equal copy in which every node has a new ID.
    #[must_use]
    fn deep_clone(&self) -> Self;
}

/// Returns a structurally independent copy of `part` with fresh node IDs.
#[must_use]
pub fn deep_clone<T: DeepClone>(part: &T) -> T {
    part.deep_clone()
}

struct Copier;

impl ExpressionVisitor<()> for Copier {
    type ExprOutput = Expression;

    fn visit_literal(&mut self, expr: &Literal, (): ()) -> Expression {
        Expression::Literal(expr.fresh_copy())
    }

    fn visit_parameter(&mut self, expr: &Parameter, (): ()) -> Expression {
        Expression::Parameter(Parameter::new(expr.name()))
    }

    fn visit_context_access(&mut self, _id: NodeId, (): ()) -> Expression {
        Expression::ContextAccess(NodeId::fresh())
    }

    fn visit_requested_history_context(&mut self, _id: NodeId, (): ()) -> Expression {
        Expression::RequestedHistoryContext(NodeId::fresh())
    }

    fn visit_unary_operation(&mut self, expr: &UnaryOperation, (): ()) -> Expression {
        Expression::Unary(UnaryOperation::new(
            expr.operator().visit(self, ()),
            expr.argument().visit(self, ()),
        ))
    }

    fn visit_binary_operation(&mut self, expr: &BinaryOperation, (): ()) -> Expression {
        Expression::Binary(BinaryOperation::new(
            expr.operator().visit(self, ()),
            expr.left().visit(self, ()),
            expr.right().visit(self, ()),
        ))
    }

    fn visit_attribute(&mut self, expr: &Attribute, (): ()) -> Expression {
        Expression::Attribute(Attribute::new(
            expr.context().visit(self, ()),
            expr.owner_type_name(),
            expr.attribute_name(),
        ))
    }

    fn visit_reference(&mut self, expr: &Reference, (): ()) -> Expression {
        Expression::Reference(Reference::new(
            expr.context().visit(self, ()),
            expr.owner_type_name(),
            expr.attribute_name(),
            expr.access_part(),
        ))
    }

    fn visit_flex(&mut self, expr: &Flex, (): ()) -> Expression {
        Expression::Flex(Flex::new(
            expr.context().visit(self, ()),
            expr.value_type_name(),
            expr.name(),
        ))
    }

    fn visit_get_entry(&mut self, expr: &GetEntry, (): ()) -> Expression {
        Expression::GetEntry(GetEntry::new(expr.context().visit(self, ()), expr.index()))
    }

    fn visit_eval(&mut self, expr: &Eval, (): ()) -> Expression {
        Expression::Eval(Eval::new(
            expr.context().visit(self, ()),
            expr.expr().visit(self, ()),
        ))
    }

    fn visit_in_set(&mut self, expr: &InSet, (): ()) -> Expression {
        Expression::InSet(InSet::new(
            expr.context().visit(self, ()),
            expr.set().visit(self, ()),
        ))
    }

    fn visit_is_current(&mut self, expr: &IsCurrent, (): ()) -> Expression {
        Expression::IsCurrent(IsCurrent::new(expr.context().visit(self, ())))
    }

    fn visit_has_type(&mut self, expr: &TypeCheck, (): ()) -> Expression {
        Expression::HasType(TypeCheck::new(
            expr.context().visit(self, ()),
            expr.checked_type_name(),
        ))
    }

    fn visit_instance_of(&mut self, expr: &TypeCheck, (): ()) -> Expression {
        Expression::InstanceOf(TypeCheck::new(
            expr.context().visit(self, ()),
            expr.checked_type_name(),
        ))
    }

    fn visit_tuple(&mut self, expr: &ExpressionTuple, (): ()) -> Expression {
        let entries = expr.expressions().iter().map(|e| e.visit(self, ())).collect();
        Expression::Tuple(ExpressionTuple::from_copies(entries))
    }

    fn visit_matches(&mut self, expr: &Matches, (): ()) -> Expression {
        Expression::Matches(Matches::new(expr.regex(), expr.expr().visit(self, ())))
    }
}

impl Copier {
    fn set_operation(&mut self, op: &SetOperation) -> SetOperation {
        SetOperation::new(op.left().visit(self, ()), op.right().visit(self, ()))
    }

    fn order_spec(&mut self, spec: &OrderSpec) -> OrderSpec {
        OrderSpec::new(spec.order_expr().visit(self, ()), spec.is_descending())
    }
}

impl SetExpressionVisitor<()> for Copier {
    type SetOutput = SetExpression;

    fn visit_none(&mut self, _id: NodeId, (): ()) -> SetExpression {
        SetExpression::None(NodeId::fresh())
    }

    fn visit_set_literal(&mut self, expr: &SetLiteral, (): ()) -> SetExpression {
        SetExpression::SetLiteral(expr.fresh_copy())
    }

    fn visit_set_parameter(&mut self, expr: &SetParameter, (): ()) -> SetExpression {
        SetExpression::SetParameter(SetParameter::new(expr.name()))
    }

    fn visit_all_of(&mut self, expr: &TypeSource, (): ()) -> SetExpression {
        SetExpression::AllOf(TypeSource::new(expr.source_type_name()))
    }

    fn visit_any_of(&mut self, expr: &TypeSource, (): ()) -> SetExpression {
        SetExpression::AnyOf(TypeSource::new(expr.source_type_name()))
    }

    fn visit_filter(&mut self, expr: &Filter, (): ()) -> SetExpression {
        SetExpression::Filter(Filter::new(
            expr.source().visit(self, ()),
            expr.filter().visit(self, ()),
        ))
    }

    fn visit_map_to(&mut self, expr: &MapTo, (): ()) -> SetExpression {
        SetExpression::MapTo(MapTo::new(
            expr.source().visit(self, ()),
            expr.mapping().visit(self, ()),
        ))
    }

    fn visit_partition(&mut self, expr: &Partition, (): ()) -> SetExpression {
        SetExpression::Partition(Partition::new(
            expr.source().visit(self, ()),
            expr.equivalence().visit(self, ()),
            expr.representative().visit(self, ()),
        ))
    }

    fn visit_cross_product(&mut self, expr: &CrossProduct, (): ()) -> SetExpression {
        let sources = expr.sources().iter().map(|s| s.visit(self, ())).collect();
        SetExpression::CrossProduct(CrossProduct::from_copies(sources))
    }

    fn visit_union(&mut self, expr: &SetOperation, (): ()) -> SetExpression {
        SetExpression::Union(self.set_operation(expr))
    }

    fn visit_intersection(&mut self, expr: &SetOperation, (): ()) -> SetExpression {
        SetExpression::Intersection(self.set_operation(expr))
    }

    fn visit_substraction(&mut self, expr: &SetOperation, (): ()) -> SetExpression {
        SetExpression::Substraction(self.set_operation(expr))
    }
}

impl FunctionVisitor<()> for Copier {
    type FunctionOutput = Function;

    fn visit_count(&mut self, _id: NodeId, (): ()) -> Function {
        Function::Count(NodeId::fresh())
    }

    fn visit_sum(&mut self, f: &Aggregate, (): ()) -> Function {
        Function::Sum(Aggregate::new(f.expr().visit(self, ())))
    }

    fn visit_min(&mut self, f: &Aggregate, (): ()) -> Function {
        Function::Min(Aggregate::new(f.expr().visit(self, ())))
    }

    fn visit_max(&mut self, f: &Aggregate, (): ()) -> Function {
        Function::Max(Aggregate::new(f.expr().visit(self, ())))
    }
}

impl OrderVisitor<()> for Copier {
    type OrderOutput = Order;

    fn visit_order_spec(&mut self, spec: &OrderSpec, (): ()) -> Order {
        Order::Spec(self.order_spec(spec))
    }

    fn visit_order_tuple(&mut self, tuple: &OrderTuple, (): ()) -> Order {
        let specs = tuple.specs().iter().map(|s| self.order_spec(s)).collect();
        Order::Tuple(OrderTuple::new(specs))
    }
}

// Operators carry no node identity and copy as themselves.
impl OperatorVisitor<()> for Copier {
    type Output = Operator;

    fn visit_not(&mut self, (): ()) -> Operator {
        Operator::Not
    }

    fn visit_is_null(&mut self, (): ()) -> Operator {
        Operator::IsNull
    }

    fn visit_and(&mut self, (): ()) -> Operator {
        Operator::And
    }

    fn visit_or(&mut self, (): ()) -> Operator {
        Operator::Or
    }

    fn visit_le(&mut self, (): ()) -> Operator {
        Operator::Le
    }

    fn visit_ge(&mut self, (): ()) -> Operator {
        Operator::Ge
    }

    fn visit_lt(&mut self, (): ()) -> Operator {
        Operator::Lt
    }

    fn visit_gt(&mut self, (): ()) -> Operator {
        Operator::Gt
    }

    fn visit_eq_binary(&mut self, (): ()) -> Operator {
        Operator::EqBinary
    }

    fn visit_eq_ci(&mut self, (): ()) -> Operator {
        Operator::EqCi
    }

    fn visit_branch(&mut self, (): ()) -> Operator {
        Operator::Branch
    }

    fn visit_revision(&mut self, (): ()) -> Operator {
        Operator::Revision
    }

    fn visit_history_context(&mut self, (): ()) -> Operator {
        Operator::HistoryContext
    }

    fn visit_identifier(&mut self, (): ()) -> Operator {
        Operator::Identifier
    }

    fn visit_type_name(&mut self, (): ()) -> Operator {
        Operator::TypeName
    }
}

impl DeepClone for Expression {
    fn deep_clone(&self) -> Self {
        self.visit(&mut Copier, ())
    }
}

impl DeepClone for SetExpression {
    fn deep_clone(&self) -> Self {
        self.visit(&mut Copier, ())
    }
}

impl DeepClone for Function {
    fn deep_clone(&self) -> Self {
        self.visit(&mut Copier, ())
    }
}

impl DeepClone for Order {
    fn deep_clone(&self) -> Self {
        self.visit(&mut Copier, ())
    }
}

impl DeepClone for OrderSpec {
    fn deep_clone(&self) -> Self {
        Copier.order_spec(self)
    }
}

impl DeepClone for ParameterDeclaration {
    fn deep_clone(&self) -> Self {
        ParameterDeclaration::new(self.declared_type_name(), self.name())
    }
}

impl DeepClone for QueryCore {
    fn deep_clone(&self) -> Self {
        // Names are unique in the original, so the copy reuses its index.
        let mut copy = self.clone();
        copy.replace_nodes(
            self.parameters().iter().map(DeepClone::deep_clone).collect(),
            self.search().deep_clone(),
        );
        copy
    }
}

impl<E> DeepClone for RevisionQuery<E> {
    fn deep_clone(&self) -> Self {
        RevisionQuery::new(
            self.core().deep_clone(),
            self.order().map(DeepClone::deep_clone),
            self.resolve(),
            self.load_strategy(),
        )
    }
}

impl DeepClone for HistoryQuery {
    fn deep_clone(&self) -> Self {
        HistoryQuery::new(self.core().deep_clone(), self.revision_param())
    }
}
