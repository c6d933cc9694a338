//! Integration tests for Error types
//!
//! Tests error construction, display, context, and error kinds.

use kbsearch_foundation::{Error, ErrorContext, ErrorKind, SemanticLimit};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_duplicate_parameter() {
    let err = Error::duplicate_parameter("n");
    assert!(matches!(err.kind, ErrorKind::DuplicateParameter(_)));
    assert_eq!(format!("{err}"), "duplicate parameter declaration: n");
}

#[test]
fn error_unknown_parameter() {
    let err = Error::unknown_parameter("missing");
    assert!(matches!(err.kind, ErrorKind::UnknownParameter(_)));
    assert!(format!("{err}").contains("missing"));
}

#[test]
fn error_attribute_not_found() {
    let err = Error::attribute_not_found("Person", "age");
    let msg = format!("{err}");
    assert!(msg.contains("Person"));
    assert!(msg.contains("age"));
}

#[test]
fn error_unsupported() {
    let err = Error::unsupported("branch sets");
    assert!(matches!(err.kind, ErrorKind::Unsupported(_)));
}

#[test]
fn error_internal() {
    let err = Error::internal("unreachable state");
    assert!(matches!(err.kind, ErrorKind::Internal(_)));
    assert!(!err.is_store_failure());
}

// =============================================================================
// Error Display
// =============================================================================

#[test]
fn error_display_argument_count() {
    let err = Error::argument_count_mismatch(2, 3);
    let msg = format!("{err}");
    assert!(msg.contains('2'));
    assert!(msg.contains('3'));
}

#[test]
fn error_display_limit() {
    let err = Error::limit_exceeded(SemanticLimit::MaxBufferedResults { limit: 500 });
    assert!(format!("{err}").contains("500"));
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn error_context_display() {
    let ctx = ErrorContext::new()
        .with_source("select all-of(A)")
        .with_frame("filter")
        .with_frame("all-of");
    let msg = format!("{ctx}");
    assert!(msg.contains("select all-of(A)"));
    assert!(msg.contains("at filter"));
    assert!(msg.contains("at all-of"));
}

#[test]
fn store_errors_are_recognized() {
    assert!(Error::store("connection reset").is_store_failure());
    assert!(!Error::illegal_state("unbound").is_store_failure());
}
