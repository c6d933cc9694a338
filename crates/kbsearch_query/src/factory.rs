//! Construction API for query trees.
//!
//! Every node is built through the functions in this module. Some of them
//! simplify at construction time: [`and`] and [`or`] fold boolean literals
//! and absent operands, [`filter`] drops a literal-true predicate, and
//! [`attribute_range`] collapses an empty range to `false`.
//!
//! ```
//! use kbsearch_query::factory as f;
//!
//! let adults = f::filter(
//!     f::any_of("Person"),
//!     f::ge(f::attribute("Person", "age"), f::literal(18).unwrap()),
//! );
//! assert_eq!(adults.to_string(), "filter(any-of(Person), (Person.age >= 18))");
//! ```

use std::cmp::Ordering;
use std::sync::Arc;

use kbsearch_foundation::types::{
    ASSOCIATION_TYPE_NAME, META_ELEMENT_NAME_ATTR, META_ELEMENT_TYPE_NAME, OBJECT_TYPE_NAME,
    REFERENCE_DEST_NAME, REFERENCE_SOURCE_NAME, TYPE_REF_NAME,
};
use kbsearch_foundation::{Error, Identified, MetaAttribute, Result, Value};
use tracing::trace;

use crate::arguments::{HistoryQueryArguments, RevisionQueryArguments};
use crate::expr::{
    Attribute, BinaryOperation, Eval, Expression, ExpressionTuple, Flex, GetEntry, InSet,
    IsCurrent, Literal, Matches, Parameter, Reference, ReferencePart, TypeCheck, UnaryOperation,
};
use crate::function::{Aggregate, Function};
use crate::node::NodeId;
use crate::operator::Operator;
use crate::order::{Order, OrderSpec, OrderTuple};
use crate::query::{
    BranchParam, HistoryQuery, LoadStrategy, ParameterDeclaration, QueryCore, RangeParam,
    RevisionParam, RevisionQuery,
};
use crate::set::{
    CrossProduct, Filter, MapTo, Partition, SetExpression, SetLiteral, SetOperation, SetParameter,
    TypeSource,
};

pub use crate::copy::deep_clone;

// =============================================================================
// Leaves
// =============================================================================

/// A constant value.
///
/// Object references are stored as their persistent key.
///
/// # Errors
///
/// Returns an invalid argument error if `value` is null.
pub fn literal(value: impl Into<Value>) -> Result<Expression> {
    Literal::new(value.into()).map(Expression::Literal)
}

/// A boolean constant.
#[must_use]
pub fn literal_bool(value: bool) -> Expression {
    Expression::Literal(Literal::boolean(value))
}

/// Returns true if `expr` is the literal `true`.
#[must_use]
pub fn is_literal_true(expr: &Expression) -> bool {
    expr.is_literal_true()
}

/// Returns true if `expr` is the literal `false`.
#[must_use]
pub fn is_literal_false(expr: &Expression) -> bool {
    expr.is_literal_false()
}

/// A named parameter.
#[must_use]
pub fn param(name: impl Into<Arc<str>>) -> Expression {
    Expression::Parameter(Parameter::new(name))
}

/// The current context object.
#[must_use]
pub fn context() -> Expression {
    Expression::ContextAccess(NodeId::fresh())
}

/// The revision the query is executed for.
#[must_use]
pub fn requested_history_context() -> Expression {
    Expression::RequestedHistoryContext(NodeId::fresh())
}

// =============================================================================
// Operations
// =============================================================================

/// Applies a unary operator.
///
/// # Errors
///
/// Returns an invalid argument error if `operator` does not take exactly one
/// argument.
pub fn unary_operation(operator: Operator, expr: Expression) -> Result<Expression> {
    if operator.expected_arguments() == 1 {
        Ok(unary(operator, expr))
    } else {
        Err(Error::invalid_argument(format!("operator '{operator}' is not unary")))
    }
}

/// Applies a binary operator without simplification.
///
/// # Errors
///
/// Returns an invalid argument error if `operator` does not take exactly two
/// arguments.
pub fn binary_operation(operator: Operator, left: Expression, right: Expression) -> Result<Expression> {
    if operator.expected_arguments() == 2 {
        Ok(binary(operator, left, right))
    } else {
        Err(Error::invalid_argument(format!("operator '{operator}' is not binary")))
    }
}

fn unary(operator: Operator, expr: Expression) -> Expression {
    Expression::Unary(UnaryOperation::new(operator, expr))
}

fn binary(operator: Operator, left: Expression, right: Expression) -> Expression {
    Expression::Binary(BinaryOperation::new(operator, left, right))
}

/// Boolean negation.
#[must_use]
pub fn not(expr: Expression) -> Expression {
    unary(Operator::Not, expr)
}

/// Test for the absent value.
#[must_use]
pub fn is_null(expr: Expression) -> Expression {
    unary(Operator::IsNull, expr)
}

/// Conjunction, simplified at construction time.
///
/// An absent operand counts as `true`. A literal `true` operand yields the
/// other operand, a literal `false` operand yields `false`.
#[must_use]
pub fn and(left: impl Into<Option<Expression>>, right: impl Into<Option<Expression>>) -> Expression {
    junction(Operator::And, true, left.into(), right.into())
}

/// Disjunction, simplified at construction time.
///
/// An absent operand counts as `false`. A literal `false` operand yields the
/// other operand, a literal `true` operand yields `true`.
#[must_use]
pub fn or(left: impl Into<Option<Expression>>, right: impl Into<Option<Expression>>) -> Expression {
    junction(Operator::Or, false, left.into(), right.into())
}

/// `identity` is the neutral element of `operator`; its negation absorbs.
fn junction(
    operator: Operator,
    identity: bool,
    left: Option<Expression>,
    right: Option<Expression>,
) -> Expression {
    let is_identity = |e: &Option<Expression>| {
        e.as_ref()
            .is_none_or(|e| matches!(e.literal_value(), Some(Value::Bool(b)) if *b == identity))
    };

    if is_identity(&left) {
        trace!(%operator, side = "left", "dropped neutral operand");
        return right.unwrap_or_else(|| literal_bool(identity));
    }
    if is_identity(&right) {
        trace!(%operator, side = "right", "dropped neutral operand");
        return left.unwrap_or_else(|| literal_bool(identity));
    }
    match (left, right) {
        (Some(left), Some(right)) => {
            let absorbs =
                |e: &Expression| matches!(e.literal_value(), Some(Value::Bool(b)) if *b != identity);
            if absorbs(&left) || absorbs(&right) {
                trace!(%operator, "folded to constant");
                literal_bool(!identity)
            } else {
                binary(operator, left, right)
            }
        }
        // Both sides were checked for absence above.
        (left, right) => left.or(right).unwrap_or_else(|| literal_bool(identity)),
    }
}

/// Less than or equal.
#[must_use]
pub fn le(left: Expression, right: Expression) -> Expression {
    binary(Operator::Le, left, right)
}

/// Greater than or equal.
#[must_use]
pub fn ge(left: Expression, right: Expression) -> Expression {
    binary(Operator::Ge, left, right)
}

/// Less than.
#[must_use]
pub fn lt(left: Expression, right: Expression) -> Expression {
    binary(Operator::Lt, left, right)
}

/// Greater than.
#[must_use]
pub fn gt(left: Expression, right: Expression) -> Expression {
    binary(Operator::Gt, left, right)
}

/// Exact equality.
#[must_use]
pub fn eq_binary(left: Expression, right: Expression) -> Expression {
    binary(Operator::EqBinary, left, right)
}

/// Case-insensitive equality.
#[must_use]
pub fn eq_ci(left: Expression, right: Expression) -> Expression {
    binary(Operator::EqCi, left, right)
}

/// Exact (`binary == true`) or case-insensitive equality.
#[must_use]
pub fn eq(binary: bool, left: Expression, right: Expression) -> Expression {
    if binary {
        eq_binary(left, right)
    } else {
        eq_ci(left, right)
    }
}

/// Exact equality with a constant; a null constant tests for absence.
///
/// # Errors
///
/// Propagates literal construction failures.
pub fn eq_binary_literal(expr: Expression, value: impl Into<Value>) -> Result<Expression> {
    let value = value.into();
    if value.is_null() {
        Ok(is_null(expr))
    } else {
        Ok(eq_binary(expr, literal(value)?))
    }
}

/// Exact equality of an attribute of the context with a constant.
///
/// # Errors
///
/// Propagates literal construction failures.
pub fn attribute_eq_binary(
    owner_type_name: &str,
    attribute_name: &str,
    value: impl Into<Value>,
) -> Result<Expression> {
    eq_binary_literal(attribute(owner_type_name, attribute_name), value)
}

/// Case-insensitive equality of an attribute of the context with a
/// constant; a null constant tests for absence.
///
/// # Errors
///
/// Propagates literal construction failures.
pub fn attribute_eq_ci(
    owner_type_name: &str,
    attribute_name: &str,
    value: impl Into<Value>,
) -> Result<Expression> {
    let attr = attribute(owner_type_name, attribute_name);
    let value = value.into();
    if value.is_null() {
        Ok(is_null(attr))
    } else {
        Ok(eq_ci(attr, literal(value)?))
    }
}

/// `start <= attribute < stop`, or the literal `false` if the range is empty.
///
/// # Errors
///
/// Returns an invalid argument error if a bound is null.
pub fn attribute_range(
    owner_type_name: &str,
    attribute_name: &str,
    start: impl Into<Value>,
    stop: impl Into<Value>,
) -> Result<Expression> {
    let start = start.into();
    let stop = stop.into();
    if start.is_null() || stop.is_null() {
        return Err(Error::invalid_argument("range bounds must not be 'null'"));
    }
    if start.total_cmp(&stop) != Ordering::Less {
        trace!(%start, %stop, "empty attribute range");
        return Ok(literal_bool(false));
    }
    Ok(and(
        ge(attribute(owner_type_name, attribute_name), literal(start)?),
        lt(attribute(owner_type_name, attribute_name), literal(stop)?),
    ))
}

/// Branch of an object.
#[must_use]
pub fn branch(expr: Expression) -> Expression {
    unary(Operator::Branch, expr)
}

/// Revision of an object.
#[must_use]
pub fn revision(expr: Expression) -> Expression {
    unary(Operator::Revision, expr)
}

/// History context of an object key.
#[must_use]
pub fn history_context(expr: Expression) -> Expression {
    unary(Operator::HistoryContext, expr)
}

/// Identifier of an object.
#[must_use]
pub fn identifier(expr: Expression) -> Expression {
    unary(Operator::Identifier, expr)
}

/// Name of the concrete type of an object.
#[must_use]
pub fn type_(expr: Expression) -> Expression {
    unary(Operator::TypeName, expr)
}

// =============================================================================
// Context-relative nodes
// =============================================================================

/// A primitive attribute of the context object.
#[must_use]
pub fn attribute(owner_type_name: &str, attribute_name: &str) -> Expression {
    attribute_on(context(), owner_type_name, attribute_name)
}

/// A primitive attribute of the value of `context`.
#[must_use]
pub fn attribute_on(context: Expression, owner_type_name: &str, attribute_name: &str) -> Expression {
    Expression::Attribute(Attribute::new(context, owner_type_name, attribute_name))
}

/// An access to a resolved attribute of the context object.
#[must_use]
pub fn attribute_of(attr: &MetaAttribute) -> Expression {
    if attr.is_reference() {
        reference(attr.owner(), attr.name())
    } else {
        attribute(attr.owner(), attr.name())
    }
}

/// The object referenced by the context object.
#[must_use]
pub fn reference(owner_type_name: &str, attribute_name: &str) -> Expression {
    reference_on(context(), owner_type_name, attribute_name, None)
}

/// One part of the reference held by the context object.
#[must_use]
pub fn reference_part(owner_type_name: &str, attribute_name: &str, part: ReferencePart) -> Expression {
    reference_on(context(), owner_type_name, attribute_name, Some(part))
}

/// A reference of the value of `context`.
#[must_use]
pub fn reference_on(
    context: Expression,
    owner_type_name: &str,
    attribute_name: &str,
    access_part: Option<ReferencePart>,
) -> Expression {
    Expression::Reference(Reference::new(
        context,
        owner_type_name,
        attribute_name,
        access_part,
    ))
}

/// A dynamically typed attribute of the context object.
#[must_use]
pub fn flex(type_name: &str, name: &str) -> Expression {
    flex_on(context(), type_name, name)
}

/// A dynamically typed attribute of the value of `context`.
#[must_use]
pub fn flex_on(context: Expression, type_name: &str, name: &str) -> Expression {
    Expression::Flex(Flex::new(context, type_name, name))
}

/// Exact type test of the context object.
#[must_use]
pub fn has_type(type_name: &str) -> Expression {
    has_type_on(context(), type_name)
}

/// Exact type test of the value of `context`.
#[must_use]
pub fn has_type_on(context: Expression, type_name: &str) -> Expression {
    Expression::HasType(TypeCheck::new(context, type_name))
}

/// Type test of the context object, including subtypes.
#[must_use]
pub fn instance_of(type_name: &str) -> Expression {
    instance_of_on(context(), type_name)
}

/// Type test of the value of `context`, including subtypes.
#[must_use]
pub fn instance_of_on(context: Expression, type_name: &str) -> Expression {
    Expression::InstanceOf(TypeCheck::new(context, type_name))
}

/// Evaluates `expr` with the value of `context` as context object.
#[must_use]
pub fn eval(context: Expression, expr: Expression) -> Expression {
    Expression::Eval(Eval::new(context, expr))
}

/// An entry of the tuple-valued context object.
#[must_use]
pub fn get_entry(index: usize) -> Expression {
    get_entry_on(context(), index)
}

/// An entry of the tuple value of `context`.
#[must_use]
pub fn get_entry_on(context: Expression, index: usize) -> Expression {
    Expression::GetEntry(GetEntry::new(context, index))
}

/// Whether the value of `context` is the current version of its object.
#[must_use]
pub fn is_current(context: Expression) -> Expression {
    Expression::IsCurrent(IsCurrent::new(context))
}

/// Membership of the value of `expr` in `set`.
#[must_use]
pub fn in_set(expr: Expression, set: SetExpression) -> Expression {
    Expression::InSet(InSet::new(expr, set))
}

/// Membership of the value of `expr` in a literal collection.
///
/// # Errors
///
/// Returns an invalid argument error if any value is null.
pub fn in_literal_set<V: Into<Value>>(
    expr: Expression,
    values: impl IntoIterator<Item = V>,
) -> Result<Expression> {
    Ok(in_set(expr, set_literal(values)?))
}

/// Regular expression match.
#[must_use]
pub fn matches(regex: &str, expr: Expression) -> Expression {
    Expression::Matches(Matches::new(regex, expr))
}

/// A tuple of expressions.
///
/// # Errors
///
/// Returns an invalid argument error if `expressions` is empty.
pub fn tuple(expressions: Vec<Expression>) -> Result<Expression> {
    ExpressionTuple::new(expressions).map(Expression::Tuple)
}

/// The source object of the context association.
#[must_use]
pub fn source() -> Expression {
    reference(ASSOCIATION_TYPE_NAME, REFERENCE_SOURCE_NAME)
}

/// The destination object of the context association.
#[must_use]
pub fn destination() -> Expression {
    reference(ASSOCIATION_TYPE_NAME, REFERENCE_DEST_NAME)
}

/// The model type object of the context object.
#[must_use]
pub fn type_ref() -> Expression {
    reference(OBJECT_TYPE_NAME, TYPE_REF_NAME)
}

/// The name of the model type of the context object.
#[must_use]
pub fn type_name() -> Expression {
    attribute_on(type_ref(), META_ELEMENT_TYPE_NAME, META_ELEMENT_NAME_ATTR)
}

// =============================================================================
// Sets
// =============================================================================

/// The empty set.
#[must_use]
pub fn none() -> SetExpression {
    SetExpression::None(NodeId::fresh())
}

/// All instances of a type, excluding subtypes.
#[must_use]
pub fn all_of(type_name: &str) -> SetExpression {
    SetExpression::AllOf(TypeSource::new(type_name))
}

/// All instances of a type, including subtypes.
#[must_use]
pub fn any_of(type_name: &str) -> SetExpression {
    SetExpression::AnyOf(TypeSource::new(type_name))
}

/// A literal collection.
///
/// # Errors
///
/// Returns an invalid argument error if any value is null.
pub fn set_literal<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Result<SetExpression> {
    SetLiteral::new(values.into_iter().map(Into::into)).map(SetExpression::SetLiteral)
}

/// A literal collection of the given entries.
///
/// # Errors
///
/// Returns an invalid argument error if any value is null.
pub fn set_literal_of_entries(values: &[Value]) -> Result<SetExpression> {
    set_literal(values.iter().cloned())
}

/// A named collection parameter.
#[must_use]
pub fn set_param(name: impl Into<Arc<str>>) -> SetExpression {
    SetExpression::SetParameter(SetParameter::new(name))
}

/// Elements of `source` satisfying `filter`; a literal-true filter yields
/// `source` itself.
#[must_use]
pub fn filter(source: SetExpression, filter: Expression) -> SetExpression {
    if filter.is_literal_true() {
        trace!(source = source.kind_name(), "dropped literal-true filter");
        return source;
    }
    SetExpression::Filter(Filter::new(source, filter))
}

/// `projection` applied to every element of `source`.
#[must_use]
pub fn map(source: SetExpression, projection: Expression) -> SetExpression {
    SetExpression::MapTo(MapTo::new(source, projection))
}

/// One representative per equivalence class of `source`.
#[must_use]
pub fn partition(source: SetExpression, equivalence: Expression, representative: Function) -> SetExpression {
    SetExpression::Partition(Partition::new(source, equivalence, representative))
}

/// Tuples of elements of the given sources.
///
/// # Errors
///
/// Returns an invalid argument error if `sources` is empty.
pub fn cross_product(sources: Vec<SetExpression>) -> Result<SetExpression> {
    CrossProduct::new(sources).map(SetExpression::CrossProduct)
}

/// Elements in either set.
#[must_use]
pub fn union(left: SetExpression, right: SetExpression) -> SetExpression {
    SetExpression::Union(SetOperation::new(left, right))
}

/// Elements in both sets.
#[must_use]
pub fn intersection(left: SetExpression, right: SetExpression) -> SetExpression {
    SetExpression::Intersection(SetOperation::new(left, right))
}

/// Elements of `left` not in `right`.
#[must_use]
pub fn substraction(left: SetExpression, right: SetExpression) -> SetExpression {
    SetExpression::Substraction(SetOperation::new(left, right))
}

/// Objects linked to `from` through `links`, restricted by `filter`.
///
/// Forward navigation follows links from their source to their
/// destination; backward navigation the other way round.
#[must_use]
pub fn navigate(backwards: bool, from: SetExpression, links: SetExpression, filter: Expression) -> SetExpression {
    let (near, far) = if backwards {
        (destination(), source())
    } else {
        (source(), destination())
    };
    self::filter(map(self::filter(links, in_set(near, from)), far), filter)
}

/// Objects of `expected_type_name` linked to `from` through `links`.
#[must_use]
pub fn navigate_links(
    backwards: bool,
    from: SetExpression,
    links: SetExpression,
    expected_type_name: &str,
) -> SetExpression {
    navigate(backwards, from, links, instance_of(expected_type_name))
}

/// Destinations of `association_name` links starting at `from`.
#[must_use]
pub fn navigate_forwards(from: SetExpression, association_name: &str, expected_type_name: &str) -> SetExpression {
    navigate_links(false, from, any_of(association_name), expected_type_name)
}

/// Sources of `association_name` links ending at `from`.
#[must_use]
pub fn navigate_backwards(from: SetExpression, association_name: &str, expected_type_name: &str) -> SetExpression {
    navigate_links(true, from, any_of(association_name), expected_type_name)
}

// =============================================================================
// Functions and orders
// =============================================================================

/// Number of elements.
#[must_use]
pub fn count() -> Function {
    Function::Count(NodeId::fresh())
}

/// Sum of `expr`.
#[must_use]
pub fn sum(expr: Expression) -> Function {
    Function::Sum(Aggregate::new(expr))
}

/// Minimum of `expr`.
#[must_use]
pub fn min(expr: Expression) -> Function {
    Function::Min(Aggregate::new(expr))
}

/// Maximum of `expr`.
#[must_use]
pub fn max(expr: Expression) -> Function {
    Function::Max(Aggregate::new(expr))
}

/// Ascending order by `expr`.
#[must_use]
pub fn order(expr: Expression) -> OrderSpec {
    OrderSpec::new(expr, false)
}

/// Descending order by `expr`.
#[must_use]
pub fn order_desc(expr: Expression) -> OrderSpec {
    OrderSpec::new(expr, true)
}

/// Order by `expr` in the given direction.
#[must_use]
pub fn order_by(expr: Expression, descending: bool) -> OrderSpec {
    OrderSpec::new(expr, descending)
}

/// Lexicographic order by several keys, most significant first.
#[must_use]
pub fn orders(specs: Vec<OrderSpec>) -> Order {
    Order::Tuple(OrderTuple::new(specs))
}

// =============================================================================
// Queries
// =============================================================================

/// Collects parameter declarations.
#[must_use]
pub fn params(decls: impl IntoIterator<Item = ParameterDeclaration>) -> Vec<ParameterDeclaration> {
    decls.into_iter().collect()
}

/// Declares a parameter `name` of type `type_name`.
#[must_use]
pub fn param_decl(type_name: &str, name: &str) -> ParameterDeclaration {
    ParameterDeclaration::new(type_name, name)
}

/// Arguments for a revision query.
#[must_use]
pub fn revision_args() -> RevisionQueryArguments {
    RevisionQueryArguments::new()
}

/// Arguments for a history query.
#[must_use]
pub fn history_args() -> HistoryQueryArguments {
    HistoryQueryArguments::new()
}

/// A single-branch query returning identifiers of type `E`.
#[must_use]
pub fn query_unresolved<E>(search: SetExpression) -> RevisionQuery<E> {
    revision_query(search, None, false)
}

/// A single-branch query returning identifiers of type `E`, ordered.
#[must_use]
pub fn query_unresolved_ordered<E>(search: SetExpression, order: impl Into<Order>) -> RevisionQuery<E> {
    revision_query(search, Some(order.into()), false)
}

/// A parameterized single-branch query returning identifiers.
///
/// # Errors
///
/// Returns a duplicate parameter error if two declarations share a name.
pub fn query_unresolved_with<E>(
    params: Vec<ParameterDeclaration>,
    search: SetExpression,
    order: Option<Order>,
) -> Result<RevisionQuery<E>> {
    query_unresolved_in(BranchParam::Single, RangeParam::Complete, params, search, order)
}

/// A fully specified query returning identifiers.
///
/// # Errors
///
/// Returns a duplicate parameter error if two declarations share a name.
pub fn query_unresolved_in<E>(
    branch_param: BranchParam,
    range_param: RangeParam,
    params: Vec<ParameterDeclaration>,
    search: SetExpression,
    order: Option<Order>,
) -> Result<RevisionQuery<E>> {
    let core = QueryCore::new(branch_param, range_param, params, search)?;
    Ok(RevisionQuery::new(core, order, false, LoadStrategy::Default))
}

/// A single-branch query returning resolved objects of type `E`.
#[must_use]
pub fn query_resolved<E: Identified>(search: SetExpression) -> RevisionQuery<E> {
    revision_query(search, None, true)
}

/// A single-branch query returning resolved objects, ordered.
#[must_use]
pub fn query_resolved_ordered<E: Identified>(search: SetExpression, order: impl Into<Order>) -> RevisionQuery<E> {
    revision_query(search, Some(order.into()), true)
}

/// A parameterized single-branch query returning resolved objects.
///
/// # Errors
///
/// Returns a duplicate parameter error if two declarations share a name.
pub fn query_resolved_with<E: Identified>(
    params: Vec<ParameterDeclaration>,
    search: SetExpression,
    order: Option<Order>,
) -> Result<RevisionQuery<E>> {
    query_resolved_in(BranchParam::Single, RangeParam::Complete, params, search, order)
}

/// A fully specified query returning resolved objects.
///
/// # Errors
///
/// Returns a duplicate parameter error if two declarations share a name.
pub fn query_resolved_in<E: Identified>(
    branch_param: BranchParam,
    range_param: RangeParam,
    params: Vec<ParameterDeclaration>,
    search: SetExpression,
    order: Option<Order>,
) -> Result<RevisionQuery<E>> {
    let core = QueryCore::new(branch_param, range_param, params, search)?;
    Ok(RevisionQuery::new(core, order, true, LoadStrategy::Default))
}

/// A query for association links; every result is expected to be a link.
#[must_use]
pub fn association_query<E>(search: SetExpression) -> RevisionQuery<E> {
    revision_query(search, None, false)
}

fn revision_query<E>(search: SetExpression, order: Option<Order>, resolve: bool) -> RevisionQuery<E> {
    let core = QueryCore::without_parameters(BranchParam::Single, RangeParam::Complete, search);
    RevisionQuery::new(core, order, resolve, LoadStrategy::Default)
}

/// A search over the complete history of the current branch.
#[must_use]
pub fn history_query(search: SetExpression) -> HistoryQuery {
    let core = QueryCore::without_parameters(BranchParam::Single, RangeParam::Complete, search);
    HistoryQuery::new(core, RevisionParam::All)
}

/// A parameterized search over the complete history of the current branch.
///
/// # Errors
///
/// Returns a duplicate parameter error if two declarations share a name.
pub fn history_query_with(params: Vec<ParameterDeclaration>, search: SetExpression) -> Result<HistoryQuery> {
    history_query_in(
        BranchParam::Single,
        RevisionParam::All,
        RangeParam::Complete,
        params,
        search,
    )
}

/// A fully specified history query.
///
/// # Errors
///
/// Returns a duplicate parameter error if two declarations share a name.
pub fn history_query_in(
    branch_param: BranchParam,
    revision_param: RevisionParam,
    range_param: RangeParam,
    params: Vec<ParameterDeclaration>,
    search: SetExpression,
) -> Result<HistoryQuery> {
    let core = QueryCore::new(branch_param, range_param, params, search)?;
    Ok(HistoryQuery::new(core, revision_param))
}
