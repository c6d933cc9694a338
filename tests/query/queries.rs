//! Integration tests for queries, parameters, and arguments

use kbsearch_foundation::{BranchId, ErrorKind, ObjectKey, Revision, Value};
use kbsearch_query::arguments::{BranchSelection, RowWindow};
use kbsearch_query::factory as f;
use kbsearch_query::{
    BranchParam, DeepClone, QueryArguments, RangeParam, RevisionQuery, RevisionQueryArguments,
    SearchQuery,
};

fn named_query() -> RevisionQuery<ObjectKey> {
    f::query_unresolved_with(
        f::params([f::param_decl("String", "n"), f::param_decl("Long", "min")]),
        f::filter(
            f::all_of("Person"),
            f::and(
                f::eq_binary(f::attribute("Person", "name"), f::param("n")),
                f::ge(f::attribute("Person", "age"), f::param("min")),
            ),
        ),
        Some(f::order(f::attribute("Person", "age")).into()),
    )
    .unwrap()
}

// =============================================================================
// Parameters
// =============================================================================

#[test]
fn parameters_are_indexed_by_position() {
    let query = named_query();
    assert_eq!(query.parameter_index("n"), Some(0));
    assert_eq!(query.parameter_index("min"), Some(1));
    assert_eq!(query.parameter_index("other"), None);
}

#[test]
fn duplicate_parameters_are_rejected() {
    let result: kbsearch_foundation::Result<RevisionQuery<ObjectKey>> = f::query_unresolved_with(
        f::params([f::param_decl("String", "n"), f::param_decl("Long", "n")]),
        f::all_of("Person"),
        None,
    );
    assert!(matches!(result.unwrap_err().kind, ErrorKind::DuplicateParameter(_)));
}

#[test]
fn failed_parameter_replacement_keeps_query() {
    let mut query = named_query();
    let result = query.set_parameters(vec![f::param_decl("String", "a"), f::param_decl("String", "a")]);
    assert!(result.is_err());
    assert_eq!(query.parameters().len(), 2);
    assert_eq!(query.parameter_index("min"), Some(1));
}

#[test]
fn argument_count_is_checked() {
    let query = named_query();
    let args = QueryArguments::new().with_arguments(["bob"]).unwrap();
    let err = query.check_arguments(&args).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::ArgumentCountMismatch {
            expected: 2,
            actual: 1
        }
    ));

    let args = QueryArguments::new()
        .with_arguments([Value::from("bob"), Value::from(30)])
        .unwrap();
    assert!(query.check_arguments(&args).is_ok());
}

#[test]
fn null_arguments_are_rejected() {
    let err = QueryArguments::new().with_arguments([None::<i64>]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidArgument(_)));
}

// =============================================================================
// Branches and Rows
// =============================================================================

#[test]
fn single_branch_defaults_to_context() {
    let args = QueryArguments::new();
    let selection = args.resolve_branch(BranchParam::Single, BranchId::new(4)).unwrap();
    assert_eq!(selection, BranchSelection::Single(BranchId::new(4)));

    let args = args.with_requested_branch(BranchId::TRUNK);
    let selection = args.resolve_branch(BranchParam::Single, BranchId::new(4)).unwrap();
    assert_eq!(selection, BranchSelection::Single(BranchId::TRUNK));
}

#[test]
fn branch_sets_are_unsupported() {
    let args = QueryArguments::new();
    for param in [BranchParam::Set, BranchParam::Without] {
        let err = args.resolve_branch(param, BranchId::TRUNK).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Unsupported(_)));
    }
    assert_eq!(
        args.resolve_branch(BranchParam::All, BranchId::TRUNK).unwrap(),
        BranchSelection::All
    );
}

#[test]
fn row_windows_follow_range_param() {
    let args = RevisionQueryArguments::new().with_start_row(2).with_stop_row(5);
    assert_eq!(args.row_window(RangeParam::Complete), RowWindow::ALL);
    assert_eq!(args.row_window(RangeParam::First).apply(10..20).collect::<Vec<_>>(), vec![10]);
    assert_eq!(args.row_window(RangeParam::Head).apply(0..10).collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
    assert_eq!(args.row_window(RangeParam::Range).apply(0..10).collect::<Vec<_>>(), vec![2, 3, 4]);
}

#[test]
fn revision_defaults_to_current() {
    let args = RevisionQueryArguments::new();
    assert!(args.requested_revision().is_current());
    let args = args.with_requested_revision(Revision::new(3));
    assert_eq!(args.requested_revision(), Revision::new(3));
}

// =============================================================================
// Copies and Printing
// =============================================================================

#[test]
fn copies_print_like_originals() {
    let query = named_query();
    let copy = query.deep_clone();
    assert_eq!(copy.to_string(), query.to_string());
    assert_ne!(copy.search().id(), query.search().id());
}

#[test]
fn printed_query_shows_parameters_and_order() {
    assert_eq!(
        named_query().to_string(),
        "select-ids filter(all-of(Person), ((Person.name = $n) and (Person.age >= $min))) \
         with (String n, Long min) order by Person.age asc"
    );
}

#[test]
fn history_queries_print_their_keyword() {
    let query = f::history_query(f::all_of("Person"));
    assert_eq!(query.to_string(), "history all-of(Person)");
}
