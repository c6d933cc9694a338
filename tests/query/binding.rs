//! Integration tests for type binding and in-memory ordering

use std::cmp::Ordering;

use kbsearch_foundation::{ErrorKind, MetaAttribute, MetaObject, ObjectKey, PrimitiveKind, Value};
use kbsearch_query::factory as f;
use kbsearch_query::{
    Annotations, Expression, OrderComparator, OrderSubject, RevisionQuery, SchemaResolver,
    SearchQuery, SetExpression, TypeBinder,
};

fn schema() -> SchemaResolver {
    let string = MetaObject::primitive(PrimitiveKind::String);
    let long = MetaObject::primitive(PrimitiveKind::Int);
    SchemaResolver::new()
        .with_type(string.clone())
        .with_type(long.clone())
        .with_type(MetaObject::class("Person"))
        .with_type(MetaObject::subclass("Employee", "Person"))
        .with_attribute(MetaAttribute::new("Person", "name", string))
        .with_attribute(MetaAttribute::new("Person", "age", long))
}

// =============================================================================
// Type Binding
// =============================================================================

#[test]
fn binds_declarations_sources_and_attributes() {
    let query: RevisionQuery<ObjectKey> = f::query_unresolved_with(
        f::params([f::param_decl("String", "n")]),
        f::filter(
            f::any_of("Employee"),
            f::eq_binary(f::attribute("Person", "name"), f::param("n")),
        ),
        Some(f::order(f::attribute("Person", "age")).into()),
    )
    .unwrap();

    let schema = schema();
    let mut annotations = Annotations::new();
    let mut binder = TypeBinder::new(&schema, &mut annotations);
    binder.bind_revision_query(&query).unwrap();
    assert!(binder.bound_count() >= 5);

    let decl = &query.parameters()[0];
    assert_eq!(annotations.declared_type(decl).unwrap().name(), "String");

    let SetExpression::Filter(filter) = query.search() else {
        panic!("expected a filter");
    };
    let SetExpression::AnyOf(source) = filter.source() else {
        panic!("expected a type source");
    };
    assert_eq!(annotations.declared_type(source).unwrap().name(), "Employee");

    let Expression::Binary(eq) = filter.filter() else {
        panic!("expected a comparison");
    };
    let attribute = annotations.resolved_attribute(eq.left().id()).unwrap();
    assert_eq!(attribute.value_type().name(), "String");
    let param_type = annotations.polymorphic_type(eq.right().id()).unwrap();
    assert_eq!(param_type.name(), "String");
}

#[test]
fn attributes_are_inherited() {
    let schema = schema();
    let mut annotations = Annotations::new();
    let expr = f::attribute("Employee", "age");
    TypeBinder::new(&schema, &mut annotations).bind_expression(&expr).unwrap();
    assert_eq!(annotations.resolved_attribute(expr.id()).unwrap().owner(), "Person");
}

#[test]
fn unknown_names_fail() {
    let schema = schema();
    let mut annotations = Annotations::new();
    let mut binder = TypeBinder::new(&schema, &mut annotations);

    let err = binder.bind_set(&f::all_of("Robot")).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::TypeNotFound(_)));

    let err = binder.bind_expression(&f::attribute("Person", "height")).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::AttributeNotFound { .. }));

    let err = binder.bind_expression(&f::param("undeclared")).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownParameter(_)));
}

#[test]
fn unbound_nodes_report_illegal_state() {
    let annotations = Annotations::new();
    let decl = f::param_decl("String", "n");
    let err = annotations.declared_type(&decl).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::IllegalState(_)));
}

#[test]
fn subtype_walk() {
    let schema = schema();
    assert!(schema.is_subtype("Employee", "Person").unwrap());
    assert!(!schema.is_subtype("Person", "Employee").unwrap());
}

// =============================================================================
// In-memory Ordering
// =============================================================================

#[derive(Debug)]
struct Row {
    name: &'static str,
    age: i64,
}

impl OrderSubject for Row {
    fn attribute_value(&self, _owner: &str, attribute: &str) -> Option<Value> {
        match attribute {
            "name" => Some(Value::from(self.name)),
            "age" => Some(Value::from(self.age)),
            _ => None,
        }
    }
}

#[test]
fn comparator_sorts_by_keys_in_order() {
    let order = f::orders(vec![
        f::order_desc(f::attribute("Person", "age")),
        f::order(f::attribute("Person", "name")),
    ]);
    let comparator = OrderComparator::create_comparator(&order).unwrap();
    assert_eq!(comparator.key_count(), 2);

    let mut rows = vec![
        Row { name: "carl", age: 30 },
        Row { name: "anna", age: 30 },
        Row { name: "bob", age: 40 },
    ];
    comparator.sort(&mut rows);
    let names: Vec<_> = rows.iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["bob", "anna", "carl"]);
    assert_eq!(comparator.compare(&rows[1], &rows[2]), Ordering::Less);
}

#[test]
fn comparator_rejects_computed_keys() {
    let order = f::order(f::attribute_on(f::get_entry(0), "Person", "age")).into();
    let err = OrderComparator::create_comparator(&order).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Unsupported(_)));
}
