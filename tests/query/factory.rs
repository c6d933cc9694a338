//! Integration tests for the construction helpers
//!
//! Covers the simplifications applied while building expressions.

use kbsearch_foundation::{ErrorKind, Value};
use kbsearch_query::factory as f;
use kbsearch_query::{Expression, Operator, SetExpression};

fn predicate() -> Expression {
    f::gt(f::attribute("Person", "age"), f::literal(18).unwrap())
}

// =============================================================================
// Boolean Simplification
// =============================================================================

#[test]
fn and_with_true_yields_other_operand() {
    let x = predicate();
    let printed = x.to_string();
    assert_eq!(f::and(f::literal_bool(true), x).to_string(), printed);
    assert_eq!(f::and(predicate(), f::literal_bool(true)).to_string(), printed);
}

#[test]
fn and_with_false_is_false() {
    assert!(f::and(predicate(), f::literal_bool(false)).is_literal_false());
    assert!(f::and(f::literal_bool(false), predicate()).is_literal_false());
}

#[test]
fn or_with_true_is_true() {
    assert!(f::or(predicate(), f::literal_bool(true)).is_literal_true());
    assert!(f::or(f::literal_bool(true), predicate()).is_literal_true());
}

#[test]
fn or_with_false_yields_other_operand() {
    let printed = predicate().to_string();
    assert_eq!(f::or(f::literal_bool(false), predicate()).to_string(), printed);
}

#[test]
fn absent_operands_are_neutral() {
    assert!(f::and(None, None).is_literal_true());
    assert!(f::or(None, None).is_literal_false());
    assert_eq!(f::and(None, predicate()).to_string(), predicate().to_string());
    assert_eq!(f::or(predicate(), None).to_string(), predicate().to_string());
}

#[test]
fn non_boolean_literals_are_not_folded() {
    let expr = f::and(f::literal(1).unwrap(), predicate());
    match expr {
        Expression::Binary(op) => assert_eq!(op.operator(), Operator::And),
        other => panic!("expected a conjunction, got {other}"),
    }
}

#[test]
fn literal_true_filter_is_dropped() {
    let set = f::filter(f::all_of("Person"), f::literal_bool(true));
    assert!(matches!(set, SetExpression::AllOf(_)));
}

// =============================================================================
// Literals and Ranges
// =============================================================================

#[test]
fn null_literals_are_rejected() {
    let err = f::literal(Value::Null).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidArgument(_)));
    assert!(f::set_literal([Value::from(1), Value::Null]).is_err());
}

#[test]
fn null_equality_tests_for_absence() {
    let expr = f::attribute_eq_binary("Person", "name", None::<&str>).unwrap();
    assert_eq!(expr.to_string(), "is-null(Person.name)");
    let expr = f::attribute_eq_ci("Person", "name", "bob").unwrap();
    assert_eq!(expr.to_string(), "(Person.name =ci \"bob\")");
}

#[test]
fn empty_range_is_false() {
    assert!(f::attribute_range("Person", "age", 10, 10).unwrap().is_literal_false());
    assert!(f::attribute_range("Person", "age", 20, 10).unwrap().is_literal_false());
}

#[test]
fn range_between_mixed_numbers_is_not_empty() {
    let edge = 1i64 << 53;
    #[allow(clippy::cast_precision_loss)]
    let start = edge as f64;
    let expr = f::attribute_range("Person", "age", start, edge + 1).unwrap();
    assert!(!expr.is_literal_false());
    assert!(f::attribute_range("Person", "age", edge + 1, start).unwrap().is_literal_false());
}

#[test]
fn range_is_half_open() {
    let expr = f::attribute_range("Person", "age", 10, 20).unwrap();
    assert_eq!(expr.to_string(), "((Person.age >= 10) and (Person.age < 20))");
}

#[test]
fn range_rejects_null_bounds() {
    assert!(f::attribute_range("Person", "age", Value::Null, 20).is_err());
}

#[test]
fn operator_arity_is_checked() {
    assert!(f::unary_operation(Operator::Not, predicate()).is_ok());
    assert!(f::unary_operation(Operator::And, predicate()).is_err());
    assert!(f::binary_operation(Operator::IsNull, predicate(), predicate()).is_err());
}

#[test]
fn cross_product_needs_sources() {
    assert!(f::cross_product(Vec::new()).is_err());
    assert!(f::tuple(Vec::new()).is_err());
}

// =============================================================================
// Navigation
// =============================================================================

#[test]
fn navigate_forwards_follows_links() {
    let set = f::navigate_forwards(f::all_of("Person"), "worksFor", "Company");
    assert_eq!(
        set.to_string(),
        "filter(map(filter(any-of(worksFor), (Association.source in all-of(Person))), \
         Association.dest), instance-of(Company))"
    );
}

#[test]
fn navigate_backwards_swaps_ends() {
    let set = f::navigate_backwards(f::all_of("Company"), "worksFor", "Person");
    assert_eq!(
        set.to_string(),
        "filter(map(filter(any-of(worksFor), (Association.dest in all-of(Company))), \
         Association.source), instance-of(Person))"
    );
}
