//! Integration tests for concatenated compiled queries

use std::sync::Arc;

use kbsearch_exec::{
    CompiledQuery, ConcatenatedCompiledQuery, DynCompiledQuery, EmptyCompiledQuery, SearchConfig,
};
use kbsearch_foundation::{ErrorKind, Result};

use crate::support::{Rows, TrackingPool, broken, buffered, streaming};

fn concat(
    pool: &Arc<TrackingPool>,
    sources: Vec<DynCompiledQuery<i64, TrackingPool>>,
) -> ConcatenatedCompiledQuery<i64, TrackingPool> {
    ConcatenatedCompiledQuery::new(Arc::clone(pool), sources)
}

// =============================================================================
// Ordering
// =============================================================================

#[test]
fn results_are_source_major() {
    let pool = TrackingPool::shared();
    let a = buffered(&pool, &[1, 2]);
    let b = buffered(&pool, &[3]);

    let ab = concat(&pool, vec![Arc::clone(&a), Arc::clone(&b)]);
    assert_eq!(ab.search().unwrap(), vec![1, 2, 3]);

    let ba = concat(&pool, vec![b, a]);
    assert_eq!(ba.search().unwrap(), vec![3, 1, 2]);
    let streamed: Vec<_> = ba.search_stream().unwrap().collect::<Result<_>>().unwrap();
    assert_eq!(streamed, vec![3, 1, 2]);
    assert_eq!(pool.outstanding(), 0);
}

#[test]
fn mixed_sources_share_one_connection() {
    let pool = TrackingPool::shared();
    let query = concat(
        &pool,
        vec![
            Arc::new(streaming(&pool, Rows::new(&[1]))),
            Arc::new(EmptyCompiledQuery),
            buffered(&pool, &[2, 3]),
        ],
    );

    let streamed: Vec<_> = query.search_stream().unwrap().collect::<Result<_>>().unwrap();
    assert_eq!(streamed, vec![1, 2, 3]);
    assert_eq!(pool.borrowed(), 1);
    assert_eq!(pool.outstanding(), 0);
}

// =============================================================================
// Failures and Limits
// =============================================================================

#[test]
fn failing_source_surfaces_in_stream() {
    let pool = TrackingPool::shared();
    let query = concat(&pool, vec![buffered(&pool, &[1]), broken(&pool), buffered(&pool, &[2])]);

    let items: Vec<Result<i64>> = query.search_stream().unwrap().collect();
    assert_eq!(items.len(), 2);
    assert_eq!(*items[0].as_ref().unwrap(), 1);
    assert!(items[1].as_ref().unwrap_err().is_store_failure());
    assert_eq!(pool.outstanding(), 0);
}

#[test]
fn limit_spans_sources() {
    let pool = TrackingPool::shared();
    let query = concat(&pool, vec![buffered(&pool, &[1, 2]), buffered(&pool, &[3, 4])])
        .with_config(SearchConfig::bounded(3));
    let err = query.search().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::LimitExceeded(_)));
    assert_eq!(pool.outstanding(), 0);
}

#[test]
fn nested_concatenation_flattens() {
    let pool = TrackingPool::shared();
    let inner = concat(&pool, vec![buffered(&pool, &[2]), buffered(&pool, &[3])]);
    let outer = concat(&pool, vec![buffered(&pool, &[1]), Arc::new(inner)]);
    assert_eq!(outer.search().unwrap(), vec![1, 2, 3]);
    assert_eq!(outer.sources().len(), 2);
}
