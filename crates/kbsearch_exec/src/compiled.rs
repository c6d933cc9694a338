//! The execution contract of a compiled revision query.
//!
//! A compiled query runs against a [`ConnectionPool`]. Each execution goes
//! through **borrow → buffered or streaming search → release**:
//!
//! - [`CompiledQuery::search_args`] borrows a connection, runs
//!   [`CompiledQuery::search_with`], and releases the connection before it
//!   returns, on every path.
//! - [`CompiledQuery::search_stream_args`] borrows a connection and opens a
//!   cursor whose `close` (or drop) releases it. If the cursor cannot be
//!   opened, the connection is released before the error is returned.
//!
//! Callers that manage connections themselves use the `*_with` variants.
//! Pool-backed executors implement the borrowing variants with
//! [`search_pooled`] and [`stream_pooled`].

use kbsearch_foundation::Result;
use kbsearch_query::RevisionQueryArguments;
use tracing::warn;

use crate::config::SearchConfig;
use crate::cursor::{ReleasingCursor, SearchCursor};
use crate::pool::{ConnectionGuard, ConnectionPool, PooledConnection};

/// A revision query compiled for a backend, producing results of type `E`.
pub trait CompiledQuery<E, P: ConnectionPool>: Send + Sync {
    /// Runs the query on a caller-owned connection and buffers all results.
    ///
    /// # Errors
    ///
    /// Returns store errors unchanged, or a limit exceeded error if the
    /// result is larger than the configured buffer.
    fn search_with(&self, connection: &PooledConnection<P::Connection>, args: &RevisionQueryArguments) -> Result<Vec<E>>;

    /// Opens a cursor on a caller-owned connection.
    ///
    /// The cursor must not outlive the caller's ownership of `connection`.
    ///
    /// # Errors
    ///
    /// Returns store errors unchanged.
    fn search_stream_with<'a>(
        &'a self,
        connection: &PooledConnection<P::Connection>,
        args: &RevisionQueryArguments,
    ) -> Result<SearchCursor<'a, E>>
    where
        E: 'a;

    /// Runs the query on a pooled connection and buffers all results.
    ///
    /// # Errors
    ///
    /// Returns pool and store errors unchanged, after the connection was
    /// released.
    fn search_args(&self, args: &RevisionQueryArguments) -> Result<Vec<E>>;

    /// Opens a cursor owning a pooled connection.
    ///
    /// # Errors
    ///
    /// Returns pool and store errors unchanged, after the connection was
    /// released.
    fn search_stream_args<'a>(&'a self, args: &RevisionQueryArguments) -> Result<SearchCursor<'a, E>>
    where
        E: 'a;

    /// Runs the query with default arguments and buffers all results.
    ///
    /// # Errors
    ///
    /// See [`CompiledQuery::search_args`].
    fn search(&self) -> Result<Vec<E>> {
        self.search_args(&RevisionQueryArguments::default())
    }

    /// Opens a cursor with default arguments.
    ///
    /// # Errors
    ///
    /// See [`CompiledQuery::search_stream_args`].
    fn search_stream<'a>(&'a self) -> Result<SearchCursor<'a, E>>
    where
        E: 'a,
    {
        self.search_stream_args(&RevisionQueryArguments::default())
    }
}

/// Runs `search` on a connection borrowed from `pool`, releasing it on every
/// path.
///
/// # Errors
///
/// Returns the pool's or the search's error unchanged.
pub fn search_pooled<P, E, F>(pool: &P, config: &SearchConfig, search: F) -> Result<Vec<E>>
where
    P: ConnectionPool + ?Sized,
    F: FnOnce(&PooledConnection<P::Connection>) -> Result<Vec<E>>,
{
    let guard = ConnectionGuard::acquire(pool, config)?;
    let result = search(guard.connection());
    guard.release();
    result.inspect_err(|e| warn!(error = %e, "buffered search failed"))
}

/// Opens a cursor with `open` on a connection borrowed from `pool`.
///
/// The returned cursor owns the connection. If `open` fails, the connection
/// is released before the error is returned.
///
/// # Errors
///
/// Returns the pool's or the open's error unchanged.
pub fn stream_pooled<'a, P, E, F>(pool: &'a P, config: &SearchConfig, open: F) -> Result<SearchCursor<'a, E>>
where
    P: ConnectionPool + ?Sized,
    E: 'a,
    F: FnOnce(&PooledConnection<P::Connection>) -> Result<SearchCursor<'a, E>>,
{
    let guard = ConnectionGuard::acquire(pool, config)?;
    match open(guard.connection()) {
        Ok(cursor) => Ok(Box::new(ReleasingCursor::new(cursor, guard))),
        Err(e) => {
            warn!(error = %e, "failed to open search cursor");
            guard.release();
            Err(e)
        }
    }
}
