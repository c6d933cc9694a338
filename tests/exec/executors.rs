//! Integration tests for the single-backend executors

use std::sync::Arc;
use std::sync::atomic::Ordering;

use kbsearch_exec::{CompiledQuery, EmptyCompiledQuery, SearchConfig, drain};
use kbsearch_foundation::{ErrorKind, Result};
use kbsearch_query::RevisionQueryArguments;

use crate::support::{Rows, TrackingPool, buffered, streaming};

fn collect(query: &dyn CompiledQuery<i64, TrackingPool>) -> Result<Vec<i64>> {
    let mut cursor = query.search_stream()?;
    drain(&mut cursor, &SearchConfig::DEFAULT)
}

// =============================================================================
// Buffered and Streamed Results Agree
// =============================================================================

#[test]
fn buffered_search_matches_stream() {
    let pool = TrackingPool::shared();
    let query = buffered(&pool, &[4, 1, 3]);
    assert_eq!(query.search().unwrap(), vec![4, 1, 3]);
    assert_eq!(collect(query.as_ref()).unwrap(), vec![4, 1, 3]);
    assert_eq!(pool.outstanding(), 0);
}

#[test]
fn streaming_search_matches_stream() {
    let pool = TrackingPool::shared();
    let backend = Rows::new(&[7, 8, 9]);
    let closed = Arc::clone(&backend.closed);
    let query = streaming(&pool, backend);

    assert_eq!(query.search().unwrap(), vec![7, 8, 9]);
    assert_eq!(collect(&query).unwrap(), vec![7, 8, 9]);
    assert_eq!(closed.load(Ordering::SeqCst), 2);
    assert_eq!(pool.outstanding(), 0);
}

#[test]
fn empty_query_matches_stream() {
    let query = EmptyCompiledQuery;
    let search: Vec<i64> = CompiledQuery::<i64, TrackingPool>::search(&query).unwrap();
    assert!(search.is_empty());
    assert!(collect(&query).unwrap().is_empty());
}

#[test]
fn explicit_connection_is_not_released() {
    let pool = TrackingPool::shared();
    let query = streaming(&pool, Rows::new(&[1]));
    let connection = kbsearch_exec::PooledConnection::new(99_usize);
    let args = RevisionQueryArguments::new();

    assert_eq!(query.search_with(&connection, &args).unwrap(), vec![1]);
    let cursor = query.search_stream_with(&connection, &args).unwrap();
    drop(cursor);
    assert_eq!(pool.borrowed(), 0);
}

// =============================================================================
// Limits
// =============================================================================

#[test]
fn buffered_limit_applies_to_search_only() {
    let pool = TrackingPool::shared();
    let query = streaming(&pool, Rows::new(&[1, 2, 3])).with_config(SearchConfig::bounded(2));

    let err = query.search().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::LimitExceeded(_)));

    let rows: Vec<_> = query.search_stream().unwrap().collect::<Result<_>>().unwrap();
    assert_eq!(rows, vec![1, 2, 3]);
    assert_eq!(pool.outstanding(), 0);
}
