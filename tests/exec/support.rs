//! Shared pool and backends for execution tests

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use kbsearch_exec::{
    BufferedCompiledQuery, CloseableIterator, ConnectionPool, DynCompiledQuery, PooledConnection,
    SearchCursor, StreamingCompiledQuery, StreamingSearch,
};
use kbsearch_foundation::{Error, Result};
use kbsearch_query::RevisionQueryArguments;

/// Counts borrows and releases; every borrow hands out a new connection.
#[derive(Debug, Default)]
pub struct TrackingPool {
    borrowed: AtomicUsize,
    released: AtomicUsize,
    pub exhausted: AtomicBool,
}

impl TrackingPool {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn borrowed(&self) -> usize {
        self.borrowed.load(Ordering::SeqCst)
    }

    pub fn outstanding(&self) -> usize {
        self.borrowed() - self.released.load(Ordering::SeqCst)
    }
}

impl ConnectionPool for TrackingPool {
    type Connection = usize;

    fn borrow_read_connection(&self) -> Result<PooledConnection<usize>> {
        if self.exhausted.load(Ordering::SeqCst) {
            return Err(Error::store("no read connection available"));
        }
        Ok(PooledConnection::new(self.borrowed.fetch_add(1, Ordering::SeqCst)))
    }

    fn release_read_connection(&self, _connection: PooledConnection<usize>) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn buffered(pool: &Arc<TrackingPool>, rows: &[i64]) -> DynCompiledQuery<i64, TrackingPool> {
    let rows = rows.to_vec();
    Arc::new(BufferedCompiledQuery::new(
        Arc::clone(pool),
        move |_: &PooledConnection<usize>, _: &RevisionQueryArguments| -> Result<Vec<i64>> {
            Ok(rows.clone())
        },
    ))
}

pub fn broken(pool: &Arc<TrackingPool>) -> DynCompiledQuery<i64, TrackingPool> {
    Arc::new(BufferedCompiledQuery::new(
        Arc::clone(pool),
        |_: &PooledConnection<usize>, _: &RevisionQueryArguments| -> Result<Vec<i64>> {
            Err(Error::store("table is locked"))
        },
    ))
}

// =============================================================================
// Streaming Backend
// =============================================================================

/// Streams fixed rows, optionally failing to open, and counts closed cursors.
pub struct Rows {
    pub rows: Vec<i64>,
    pub fail_open: bool,
    pub closed: Arc<AtomicUsize>,
}

impl Rows {
    pub fn new(rows: &[i64]) -> Self {
        Self {
            rows: rows.to_vec(),
            fail_open: false,
            closed: Arc::new(AtomicUsize::new(0)),
        }
    }
}

pub struct RowsCursor {
    rows: std::vec::IntoIter<i64>,
    closed: Option<Arc<AtomicUsize>>,
}

impl Iterator for RowsCursor {
    type Item = Result<i64>;

    fn next(&mut self) -> Option<Self::Item> {
        self.closed.as_ref()?;
        self.rows.next().map(Ok)
    }
}

impl CloseableIterator for RowsCursor {
    fn close(&mut self) -> Result<()> {
        if let Some(closed) = self.closed.take() {
            closed.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

impl StreamingSearch<i64, usize> for Rows {
    fn open<'a>(
        &'a self,
        _connection: &PooledConnection<usize>,
        _args: &RevisionQueryArguments,
    ) -> Result<SearchCursor<'a, i64>>
    where
        i64: 'a,
    {
        if self.fail_open {
            return Err(Error::store("cursor could not be opened"));
        }
        Ok(Box::new(RowsCursor {
            rows: self.rows.clone().into_iter(),
            closed: Some(Arc::clone(&self.closed)),
        }))
    }
}

pub fn streaming(pool: &Arc<TrackingPool>, backend: Rows) -> StreamingCompiledQuery<i64, TrackingPool, Rows> {
    StreamingCompiledQuery::new(Arc::clone(pool), backend)
}
