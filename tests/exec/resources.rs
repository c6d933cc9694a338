//! Integration tests for connection and cursor accounting

use std::sync::Arc;
use std::sync::atomic::Ordering;

use kbsearch_exec::{CloseableIterator, CompiledQuery};

use crate::support::{Rows, TrackingPool, broken, buffered, streaming};

// =============================================================================
// Connection Release
// =============================================================================

#[test]
fn each_search_borrows_once() {
    let pool = TrackingPool::shared();
    let query = buffered(&pool, &[1, 2]);
    for _ in 0..3 {
        query.search().unwrap();
    }
    assert_eq!(pool.borrowed(), 3);
    assert_eq!(pool.outstanding(), 0);
}

#[test]
fn failed_search_releases() {
    let pool = TrackingPool::shared();
    let query = broken(&pool);
    assert!(query.search().unwrap_err().is_store_failure());
    assert!(query.search_stream().is_err());
    assert_eq!(pool.borrowed(), 2);
    assert_eq!(pool.outstanding(), 0);
}

#[test]
fn failed_cursor_open_releases() {
    let pool = TrackingPool::shared();
    let mut backend = Rows::new(&[1]);
    backend.fail_open = true;
    let query = streaming(&pool, backend);

    assert!(query.search_stream().is_err());
    assert!(query.search().is_err());
    assert_eq!(pool.outstanding(), 0);
}

#[test]
fn exhausted_pool_fails_without_release() {
    let pool = TrackingPool::shared();
    pool.exhausted.store(true, Ordering::SeqCst);
    let query = buffered(&pool, &[1]);
    assert!(query.search().unwrap_err().is_store_failure());
    assert_eq!(pool.borrowed(), 0);
    assert_eq!(pool.outstanding(), 0);
}

// =============================================================================
// Cursor Lifetime
// =============================================================================

#[test]
fn stream_holds_connection_until_closed() {
    let pool = TrackingPool::shared();
    let backend = Rows::new(&[1, 2, 3]);
    let closed = Arc::clone(&backend.closed);
    let query = streaming(&pool, backend);

    let mut cursor = query.search_stream().unwrap();
    assert_eq!(cursor.next().unwrap().unwrap(), 1);
    assert_eq!(pool.outstanding(), 1);

    cursor.close().unwrap();
    assert_eq!(pool.outstanding(), 0);
    assert_eq!(closed.load(Ordering::SeqCst), 1);
    assert!(cursor.next().is_none());

    cursor.close().unwrap();
    drop(cursor);
    assert_eq!(pool.outstanding(), 0);
    assert_eq!(closed.load(Ordering::SeqCst), 1);
}

#[test]
fn dropped_stream_releases() {
    let pool = TrackingPool::shared();
    let backend = Rows::new(&[1, 2, 3]);
    let closed = Arc::clone(&backend.closed);
    let query = streaming(&pool, backend);

    let mut cursor = query.search_stream().unwrap();
    cursor.next();
    drop(cursor);
    assert_eq!(pool.outstanding(), 0);
    assert_eq!(closed.load(Ordering::SeqCst), 1);
}
