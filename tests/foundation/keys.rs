//! Integration tests for object identity and type descriptors

use kbsearch_foundation::{
    BranchId, Identified, MetaAttribute, MetaKind, MetaObject, ObjectId, ObjectKey, PrimitiveKind,
    Revision,
};

// =============================================================================
// Object Keys
// =============================================================================

#[test]
fn current_key_is_on_trunk() {
    let key = ObjectKey::current("Person", 7);
    assert_eq!(key.branch(), BranchId::TRUNK);
    assert!(key.history_context().is_current());
    assert_eq!(key.object_id(), ObjectId::new(7));
    assert_eq!(key.object_type(), "Person");
}

#[test]
fn keys_order_by_branch_first() {
    let trunk = ObjectKey::new(BranchId::TRUNK, Revision::CURRENT, "Z", ObjectId::new(9));
    let other = ObjectKey::new(BranchId::new(2), Revision::CURRENT, "A", ObjectId::new(1));
    assert!(trunk < other);
}

#[test]
fn key_identifies_itself() {
    let key = ObjectKey::current("A", 1);
    assert_eq!(key.object_key(), key);
}

#[test]
fn revisions_are_ordered() {
    assert!(Revision::INITIAL < Revision::new(2));
    assert!(Revision::new(2) < Revision::CURRENT);
}

// =============================================================================
// Type Descriptors
// =============================================================================

#[test]
fn primitive_names() {
    assert_eq!(MetaObject::primitive(PrimitiveKind::Int).name(), "Long");
    assert_eq!(MetaObject::primitive(PrimitiveKind::String).name(), "String");
    assert!(MetaObject::primitive(PrimitiveKind::Bool).is_primitive());
}

#[test]
fn association_kind() {
    let links = MetaObject::association("links");
    assert_eq!(links.kind(), &MetaKind::Association);
    assert_eq!(links.super_type(), None);
}

#[test]
fn attribute_display_and_reference() {
    let attr = MetaAttribute::new("Person", "employer", MetaObject::class("Company"));
    assert_eq!(attr.to_string(), "Person.employer");
    assert!(attr.is_reference());
    assert_eq!(attr.value_type().name(), "Company");
}
