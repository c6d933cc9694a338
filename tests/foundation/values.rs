//! Integration tests for Value

use std::cmp::Ordering;
use std::sync::Arc;

use kbsearch_foundation::{Identified, ObjectKey, Value};

#[derive(Debug)]
struct Person(u64);

impl Identified for Person {
    fn object_key(&self) -> ObjectKey {
        ObjectKey::current("Person", self.0)
    }
}

// =============================================================================
// Normalization
// =============================================================================

#[test]
fn objects_normalize_to_keys() {
    let value = Value::object(Arc::new(Person(3))).normalize();
    assert!(matches!(value, Value::Key(_)));
    assert_eq!(value.as_key(), Some(ObjectKey::current("Person", 3)));
}

#[test]
fn object_and_key_are_equal() {
    let object = Value::object(Arc::new(Person(3)));
    let key = Value::from(ObjectKey::current("Person", 3));
    assert_eq!(object, key);
    assert!(object.is_identifier());
}

#[test]
fn lists_normalize_recursively() {
    let list = Value::list([Value::object(Arc::new(Person(1))), Value::from(2)]).normalize();
    let items = list.as_list().unwrap();
    assert!(matches!(items[0], Value::Key(_)));
    assert_eq!(items[1], Value::Int(2));
}

// =============================================================================
// Ordering and Display
// =============================================================================

#[test]
fn total_order_across_kinds() {
    assert_eq!(Value::Null.total_cmp(&Value::from(false)), Ordering::Less);
    assert_eq!(Value::from(2).total_cmp(&Value::from(1.5)), Ordering::Greater);
    assert_eq!(Value::from("a").total_cmp(&Value::from("b")), Ordering::Less);
}

#[test]
fn display_quotes_strings() {
    assert_eq!(Value::from("x").to_string(), "\"x\"");
    assert_eq!(Value::from(42).to_string(), "42");
    assert_eq!(Value::from(None::<i64>).to_string(), "null");
}

// =============================================================================
// Properties
// =============================================================================

mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn value() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            any::<i64>().prop_map(Value::from),
            (-1.0e6..1.0e6_f64).prop_map(Value::from),
            "[a-z]{0,6}".prop_map(Value::from),
            (0_u64..50).prop_map(|id| Value::from(ObjectKey::current("T", id))),
        ]
    }

    proptest! {
        #[test]
        fn total_cmp_is_antisymmetric(a in value(), b in value()) {
            prop_assert_eq!(a.total_cmp(&b), b.total_cmp(&a).reverse());
        }

        #[test]
        fn null_is_least(a in value()) {
            prop_assert_ne!(Value::Null.total_cmp(&a), Ordering::Greater);
        }
    }
}
