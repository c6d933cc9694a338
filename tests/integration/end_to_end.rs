//! End-to-end tests: build, bind, compile, and execute queries

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use kbsearch_exec::{
    BufferedCompiledQuery, CompiledQuery, ConcatenatedCompiledQuery, ConnectionPool,
    DynCompiledQuery, PooledConnection, StreamingCompiledQuery,
};
use kbsearch_foundation::{ErrorKind, ObjectKey, Result};
use kbsearch_query::factory as f;
use kbsearch_query::{RangeParam, RevisionQuery, RevisionQueryArguments, SearchQuery, SetExpression};

use crate::store::{QueryStore, people};

// =============================================================================
// Test Harness
// =============================================================================

#[derive(Default)]
struct Pool {
    open: AtomicUsize,
}

impl ConnectionPool for Pool {
    type Connection = usize;

    fn borrow_read_connection(&self) -> Result<PooledConnection<usize>> {
        Ok(PooledConnection::new(self.open.fetch_add(1, Ordering::SeqCst)))
    }

    fn release_read_connection(&self, _connection: PooledConnection<usize>) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}

fn compile(pool: &Arc<Pool>, query: RevisionQuery<ObjectKey>) -> StreamingCompiledQuery<ObjectKey, Pool, QueryStore> {
    let store = QueryStore::compile(people(), query).unwrap();
    StreamingCompiledQuery::new(Arc::clone(pool), store)
}

fn ids(keys: &[ObjectKey]) -> Vec<u64> {
    keys.iter().map(|k| k.object_id().value()).collect()
}

fn adults() -> RevisionQuery<ObjectKey> {
    f::query_unresolved_with(
        f::params([f::param_decl("Long", "min")]),
        f::filter(f::any_of("Person"), f::ge(f::attribute("Person", "age"), f::param("min"))),
        Some(f::order_desc(f::attribute("Person", "age")).into()),
    )
    .unwrap()
}

fn min_age(age: i64) -> RevisionQueryArguments {
    RevisionQueryArguments::new().with_arguments([age]).unwrap()
}

// =============================================================================
// Search Semantics
// =============================================================================

#[test]
fn parameterized_ordered_search() {
    let pool = Arc::new(Pool::default());
    let query = compile(&pool, adults());

    assert_eq!(ids(&query.search_args(&min_age(21)).unwrap()), vec![3, 1, 5]);
    assert_eq!(ids(&query.search_args(&min_age(35)).unwrap()), vec![3]);
    assert_eq!(pool.open.load(Ordering::SeqCst), 0);
}

#[test]
fn all_of_excludes_subtypes() {
    let pool = Arc::new(Pool::default());
    let exact = compile(&pool, f::query_unresolved_ordered(f::all_of("Person"), f::order(f::identifier(f::context()))));
    let any = compile(&pool, f::query_unresolved_ordered(f::any_of("Person"), f::order(f::identifier(f::context()))));

    assert_eq!(ids(&exact.search().unwrap()), vec![1, 2, 5]);
    // Keys order by type name before ID.
    assert_eq!(ids(&any.search().unwrap()), vec![3, 4, 1, 2, 5]);
}

#[test]
fn case_insensitive_match_and_absent_values() {
    let pool = Arc::new(Pool::default());
    let anna = compile(
        &pool,
        f::query_unresolved_ordered(
            f::filter(f::any_of("Person"), f::attribute_eq_ci("Person", "name", "ANNA").unwrap()),
            f::order(f::identifier(f::context())),
        ),
    );
    assert_eq!(ids(&anna.search().unwrap()), vec![1, 5]);

    let ageless = compile(
        &pool,
        f::query_unresolved(f::filter(
            f::any_of("Person"),
            f::attribute_eq_binary("Person", "age", None::<i64>).unwrap(),
        )),
    );
    assert_eq!(ids(&ageless.search().unwrap()), vec![4]);
}

#[test]
fn null_sorts_first() {
    let pool = Arc::new(Pool::default());
    let query = compile(
        &pool,
        f::query_unresolved_ordered(f::all_of("Employee"), f::order(f::attribute("Person", "age"))),
    );
    assert_eq!(ids(&query.search().unwrap()), vec![4, 3]);
}

#[test]
fn row_window_limits_results() {
    let pool = Arc::new(Pool::default());
    let mut query = adults();
    query.set_range_param(RangeParam::Range);
    let query = compile(&pool, query);

    let args = min_age(0).with_start_row(1).with_stop_row(3);
    assert_eq!(ids(&query.search_args(&args).unwrap()), vec![1, 5]);

    let streamed: Vec<_> = query.search_stream_args(&args).unwrap().collect::<Result<_>>().unwrap();
    assert_eq!(ids(&streamed), vec![1, 5]);
    assert_eq!(pool.open.load(Ordering::SeqCst), 0);
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn unknown_type_fails_before_execution() {
    let result = QueryStore::compile(people(), f::query_unresolved(f::all_of("Robot")));
    assert!(matches!(result.err().unwrap().kind, ErrorKind::TypeNotFound(_)));
}

#[test]
fn missing_arguments_fail_and_release() {
    let pool = Arc::new(Pool::default());
    let query = compile(&pool, adults());

    let err = query.search().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ArgumentCountMismatch { expected: 1, actual: 0 }));
    assert!(query.search_stream().is_err());
    assert_eq!(pool.open.load(Ordering::SeqCst), 0);
}

// =============================================================================
// Composition
// =============================================================================

#[test]
fn buffered_and_streaming_executors_agree() {
    let pool = Arc::new(Pool::default());
    let store = Arc::new(QueryStore::compile(people(), adults()).unwrap());
    let backend = Arc::clone(&store);
    let buffered = BufferedCompiledQuery::new(
        Arc::clone(&pool),
        move |_: &PooledConnection<usize>, args: &RevisionQueryArguments| backend.run(args),
    );
    let streaming = compile(&pool, adults());

    let args = min_age(20);
    assert_eq!(buffered.search_args(&args).unwrap(), streaming.search_args(&args).unwrap());
}

#[test]
fn concatenated_queries_keep_source_order() {
    let pool = Arc::new(Pool::default());
    let by_id = |set: SetExpression| f::query_unresolved_ordered(set, f::order(f::identifier(f::context())));
    let employees: DynCompiledQuery<ObjectKey, Pool> = Arc::new(compile(&pool, by_id(f::all_of("Employee"))));
    let persons: DynCompiledQuery<ObjectKey, Pool> = Arc::new(compile(&pool, by_id(f::all_of("Person"))));

    let query = ConcatenatedCompiledQuery::new(Arc::clone(&pool), vec![employees, persons]);
    assert_eq!(ids(&query.search().unwrap()), vec![3, 4, 1, 2, 5]);

    let streamed: Vec<_> = query.search_stream().unwrap().collect::<Result<_>>().unwrap();
    assert_eq!(ids(&streamed), vec![3, 4, 1, 2, 5]);
    assert_eq!(pool.open.load(Ordering::SeqCst), 0);
}
