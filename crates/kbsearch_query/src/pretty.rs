//! Human-readable rendering of query trees.
//!
//! Attribute and type accesses on the implicit context object omit the
//! context; accesses on any other value are prefixed with `value->`.

use std::fmt;

use crate::expr::{
    Attribute, BinaryOperation, Eval, Expression, ExpressionTuple, ExpressionVisitor, Flex,
    GetEntry, InSet, IsCurrent, Literal, Matches, Parameter, Reference, TypeCheck, UnaryOperation,
};
use crate::function::{Aggregate, Function, FunctionVisitor};
use crate::node::NodeId;
use crate::order::{Order, OrderSpec, OrderTuple, OrderVisitor};
use crate::query::{HistoryQuery, ParameterDeclaration, RevisionQuery, SearchQuery};
use crate::set::{
    CrossProduct, Filter, MapTo, Partition, SetExpression, SetExpressionVisitor, SetLiteral,
    SetOperation, SetParameter, TypeSource,
};

struct Printer<'a, 'b>(&'a mut fmt::Formatter<'b>);

impl Printer<'_, '_> {
    fn context_prefix(&mut self, context: &Expression) -> fmt::Result {
        if matches!(context, Expression::ContextAccess(_)) {
            Ok(())
        } else {
            context.visit(self, ())?;
            self.0.write_str("->")
        }
    }

    fn type_check(&mut self, name: &str, expr: &TypeCheck) -> fmt::Result {
        write!(self.0, "{name}(")?;
        if !matches!(expr.context(), Expression::ContextAccess(_)) {
            expr.context().visit(self, ())?;
            self.0.write_str(", ")?;
        }
        write!(self.0, "{})", expr.checked_type_name())
    }

    fn set_operation(&mut self, name: &str, op: &SetOperation) -> fmt::Result {
        write!(self.0, "{name}(")?;
        op.left().visit(self, ())?;
        self.0.write_str(", ")?;
        op.right().visit(self, ())?;
        self.0.write_str(")")
    }

    fn aggregate(&mut self, name: &str, f: &Aggregate) -> fmt::Result {
        write!(self.0, "{name}(")?;
        f.expr().visit(self, ())?;
        self.0.write_str(")")
    }
}

impl ExpressionVisitor<()> for Printer<'_, '_> {
    type ExprOutput = fmt::Result;

    fn visit_literal(&mut self, expr: &Literal, (): ()) -> fmt::Result {
        write!(self.0, "{}", expr.value())
    }

    fn visit_parameter(&mut self, expr: &Parameter, (): ()) -> fmt::Result {
        write!(self.0, "${}", expr.name())
    }

    fn visit_context_access(&mut self, _id: NodeId, (): ()) -> fmt::Result {
        self.0.write_str("context")
    }

    fn visit_requested_history_context(&mut self, _id: NodeId, (): ()) -> fmt::Result {
        self.0.write_str("requested-history-context")
    }

    fn visit_unary_operation(&mut self, expr: &UnaryOperation, (): ()) -> fmt::Result {
        write!(self.0, "{}(", expr.operator())?;
        expr.argument().visit(self, ())?;
        self.0.write_str(")")
    }

    fn visit_binary_operation(&mut self, expr: &BinaryOperation, (): ()) -> fmt::Result {
        self.0.write_str("(")?;
        expr.left().visit(self, ())?;
        write!(self.0, " {} ", expr.operator())?;
        expr.right().visit(self, ())?;
        self.0.write_str(")")
    }

    fn visit_attribute(&mut self, expr: &Attribute, (): ()) -> fmt::Result {
        self.context_prefix(expr.context())?;
        write!(self.0, "{}.{}", expr.owner_type_name(), expr.attribute_name())
    }

    fn visit_reference(&mut self, expr: &Reference, (): ()) -> fmt::Result {
        self.context_prefix(expr.context())?;
        write!(self.0, "{}.{}", expr.owner_type_name(), expr.attribute_name())?;
        match expr.access_part() {
            Some(part) => write!(self.0, "#{}", part.name()),
            None => Ok(()),
        }
    }

    fn visit_flex(&mut self, expr: &Flex, (): ()) -> fmt::Result {
        self.context_prefix(expr.context())?;
        write!(self.0, "flex({}.{})", expr.value_type_name(), expr.name())
    }

    fn visit_get_entry(&mut self, expr: &GetEntry, (): ()) -> fmt::Result {
        self.context_prefix(expr.context())?;
        write!(self.0, "[{}]", expr.index())
    }

    fn visit_eval(&mut self, expr: &Eval, (): ()) -> fmt::Result {
        self.0.write_str("eval(")?;
        expr.context().visit(self, ())?;
        self.0.write_str(", ")?;
        expr.expr().visit(self, ())?;
        self.0.write_str(")")
    }

    fn visit_in_set(&mut self, expr: &InSet, (): ()) -> fmt::Result {
        self.0.write_str("(")?;
        expr.context().visit(self, ())?;
        self.0.write_str(" in ")?;
        expr.set().visit(self, ())?;
        self.0.write_str(")")
    }

    fn visit_is_current(&mut self, expr: &IsCurrent, (): ()) -> fmt::Result {
        self.0.write_str("is-current(")?;
        expr.context().visit(self, ())?;
        self.0.write_str(")")
    }

    fn visit_has_type(&mut self, expr: &TypeCheck, (): ()) -> fmt::Result {
        self.type_check("has-type", expr)
    }

    fn visit_instance_of(&mut self, expr: &TypeCheck, (): ()) -> fmt::Result {
        self.type_check("instance-of", expr)
    }

    fn visit_tuple(&mut self, expr: &ExpressionTuple, (): ()) -> fmt::Result {
        self.0.write_str("tuple(")?;
        for (i, entry) in expr.expressions().iter().enumerate() {
            if i > 0 {
                self.0.write_str(", ")?;
            }
            entry.visit(self, ())?;
        }
        self.0.write_str(")")
    }

    fn visit_matches(&mut self, expr: &Matches, (): ()) -> fmt::Result {
        write!(self.0, "matches({:?}, ", expr.regex())?;
        expr.expr().visit(self, ())?;
        self.0.write_str(")")
    }
}

impl SetExpressionVisitor<()> for Printer<'_, '_> {
    type SetOutput = fmt::Result;

    fn visit_none(&mut self, _id: NodeId, (): ()) -> fmt::Result {
        self.0.write_str("none")
    }

    fn visit_set_literal(&mut self, expr: &SetLiteral, (): ()) -> fmt::Result {
        self.0.write_str("{")?;
        for (i, value) in expr.values().iter().enumerate() {
            if i > 0 {
                self.0.write_str(", ")?;
            }
            write!(self.0, "{value}")?;
        }
        self.0.write_str("}")
    }

    fn visit_set_parameter(&mut self, expr: &SetParameter, (): ()) -> fmt::Result {
        write!(self.0, "${}", expr.name())
    }

    fn visit_all_of(&mut self, expr: &TypeSource, (): ()) -> fmt::Result {
        write!(self.0, "all-of({})", expr.source_type_name())
    }

    fn visit_any_of(&mut self, expr: &TypeSource, (): ()) -> fmt::Result {
        write!(self.0, "any-of({})", expr.source_type_name())
    }

    fn visit_filter(&mut self, expr: &Filter, (): ()) -> fmt::Result {
        self.0.write_str("filter(")?;
        expr.source().visit(self, ())?;
        self.0.write_str(", ")?;
        expr.filter().visit(self, ())?;
        self.0.write_str(")")
    }

    fn visit_map_to(&mut self, expr: &MapTo, (): ()) -> fmt::Result {
        self.0.write_str("map(")?;
        expr.source().visit(self, ())?;
        self.0.write_str(", ")?;
        expr.mapping().visit(self, ())?;
        self.0.write_str(")")
    }

    fn visit_partition(&mut self, expr: &Partition, (): ()) -> fmt::Result {
        self.0.write_str("partition(")?;
        expr.source().visit(self, ())?;
        self.0.write_str(", ")?;
        expr.equivalence().visit(self, ())?;
        self.0.write_str(", ")?;
        expr.representative().visit(self, ())?;
        self.0.write_str(")")
    }

    fn visit_cross_product(&mut self, expr: &CrossProduct, (): ()) -> fmt::Result {
        self.0.write_str("cross-product(")?;
        for (i, source) in expr.sources().iter().enumerate() {
            if i > 0 {
                self.0.write_str(", ")?;
            }
            source.visit(self, ())?;
        }
        self.0.write_str(")")
    }

    fn visit_union(&mut self, expr: &SetOperation, (): ()) -> fmt::Result {
        self.set_operation("union", expr)
    }

    fn visit_intersection(&mut self, expr: &SetOperation, (): ()) -> fmt::Result {
        self.set_operation("intersection", expr)
    }

    fn visit_substraction(&mut self, expr: &SetOperation, (): ()) -> fmt::Result {
        self.set_operation("substraction", expr)
    }
}

impl FunctionVisitor<()> for Printer<'_, '_> {
    type FunctionOutput = fmt::Result;

    fn visit_count(&mut self, _id: NodeId, (): ()) -> fmt::Result {
        self.0.write_str("count()")
    }

    fn visit_sum(&mut self, f: &Aggregate, (): ()) -> fmt::Result {
        self.aggregate("sum", f)
    }

    fn visit_min(&mut self, f: &Aggregate, (): ()) -> fmt::Result {
        self.aggregate("min", f)
    }

    fn visit_max(&mut self, f: &Aggregate, (): ()) -> fmt::Result {
        self.aggregate("max", f)
    }
}

impl OrderVisitor<()> for Printer<'_, '_> {
    type OrderOutput = fmt::Result;

    fn visit_order_spec(&mut self, spec: &OrderSpec, (): ()) -> fmt::Result {
        spec.order_expr().visit(self, ())?;
        self.0
            .write_str(if spec.is_descending() { " desc" } else { " asc" })
    }

    fn visit_order_tuple(&mut self, tuple: &OrderTuple, (): ()) -> fmt::Result {
        for (i, spec) in tuple.specs().iter().enumerate() {
            if i > 0 {
                self.0.write_str(", ")?;
            }
            self.visit_order_spec(spec, ())?;
        }
        Ok(())
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.visit(&mut Printer(f), ())
    }
}

impl fmt::Display for SetExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.visit(&mut Printer(f), ())
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.visit(&mut Printer(f), ())
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.visit(&mut Printer(f), ())
    }
}

impl fmt::Display for OrderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Printer(f).visit_order_spec(self, ())
    }
}

impl fmt::Display for ParameterDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.declared_type_name(), self.name())
    }
}

fn write_query(f: &mut fmt::Formatter<'_>, keyword: &str, query: &impl SearchQuery) -> fmt::Result {
    write!(f, "{keyword} {}", query.search())?;
    if !query.parameters().is_empty() {
        f.write_str(" with (")?;
        for (i, decl) in query.parameters().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{decl}")?;
        }
        f.write_str(")")?;
    }
    Ok(())
}

impl<E> fmt::Display for RevisionQuery<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_query(f, if self.resolve() { "select" } else { "select-ids" }, self)?;
        if let Some(order) = self.order() {
            write!(f, " order by {order}")?;
        }
        Ok(())
    }
}

impl fmt::Display for HistoryQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_query(f, "history", self)
    }
}
