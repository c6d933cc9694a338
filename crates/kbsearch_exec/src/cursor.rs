//! Closeable result cursors.

use std::fmt;
use std::vec;

use kbsearch_foundation::{Error, Result, SemanticLimit};
use tracing::warn;

use crate::config::SearchConfig;
use crate::pool::{ConnectionGuard, ConnectionPool};

/// An iterator holding resources that must be given back explicitly.
///
/// `close` is idempotent. Implementations also close on drop, but only an
/// explicit `close` reports failures.
pub trait CloseableIterator: Iterator {
    /// Releases the resources held by the iterator. Further calls to `next`
    /// return `None`.
    ///
    /// # Errors
    ///
    /// Returns the store's error if releasing failed.
    fn close(&mut self) -> Result<()>;
}

impl<I: CloseableIterator + ?Sized> CloseableIterator for Box<I> {
    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

/// A streamed search result.
pub type SearchCursor<'a, E> = Box<dyn CloseableIterator<Item = Result<E>> + Send + 'a>;

// =============================================================================
// Buffered cursor
// =============================================================================

/// A cursor over an already materialized result.
pub struct VecCursor<E> {
    rows: vec::IntoIter<E>,
}

impl<E> VecCursor<E> {
    /// Streams `rows` in order.
    #[must_use]
    pub fn new(rows: Vec<E>) -> Self {
        Self {
            rows: rows.into_iter(),
        }
    }

    /// A cursor without results.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl<E> Iterator for VecCursor<E> {
    type Item = Result<E>;

    fn next(&mut self) -> Option<Self::Item> {
        self.rows.next().map(Ok)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl<E> CloseableIterator for VecCursor<E> {
    fn close(&mut self) -> Result<()> {
        self.rows = Vec::new().into_iter();
        Ok(())
    }
}

impl<E> fmt::Debug for VecCursor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VecCursor")
            .field("remaining", &self.rows.len())
            .finish()
    }
}

// =============================================================================
// Releasing cursor
// =============================================================================

/// A cursor that owns the connection it reads from.
///
/// Closing (or dropping) it closes the inner cursor first and then releases
/// the connection, exactly once.
pub struct ReleasingCursor<'a, E, P: ConnectionPool + ?Sized> {
    cursor: SearchCursor<'a, E>,
    guard: Option<ConnectionGuard<'a, P>>,
}

impl<'a, E, P: ConnectionPool + ?Sized> ReleasingCursor<'a, E, P> {
    /// Ties `cursor` to the connection held by `guard`.
    #[must_use]
    pub fn new(cursor: SearchCursor<'a, E>, guard: ConnectionGuard<'a, P>) -> Self {
        Self {
            cursor,
            guard: Some(guard),
        }
    }

    /// Returns true once the connection has been released.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.guard.is_none()
    }
}

impl<E, P: ConnectionPool + ?Sized> Iterator for ReleasingCursor<'_, E, P> {
    type Item = Result<E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.guard.is_none() {
            return None;
        }
        self.cursor.next()
    }
}

impl<E, P: ConnectionPool + ?Sized> CloseableIterator for ReleasingCursor<'_, E, P> {
    fn close(&mut self) -> Result<()> {
        match self.guard.take() {
            Some(guard) => {
                let closed = self.cursor.close();
                guard.release();
                closed
            }
            None => Ok(()),
        }
    }
}

impl<E, P: ConnectionPool + ?Sized> Drop for ReleasingCursor<'_, E, P> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(error = %e, "closing dropped search cursor failed");
        }
    }
}

// =============================================================================
// Draining
// =============================================================================

/// Closes the borrowed cursor when dropped, so every exit path of a drain
/// closes it. [`CloseGuard::close`] disarms the guard.
struct CloseGuard<'c, I: CloseableIterator + ?Sized> {
    cursor: &'c mut I,
    armed: bool,
}

impl<'c, I: CloseableIterator + ?Sized> CloseGuard<'c, I> {
    fn new(cursor: &'c mut I) -> Self {
        Self { cursor, armed: true }
    }

    fn close(mut self) -> Result<()> {
        self.armed = false;
        self.cursor.close()
    }
}

impl<I: CloseableIterator + ?Sized> Drop for CloseGuard<'_, I> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = self.cursor.close() {
            warn!(error = %e, "closing cursor after failed drain failed");
        }
    }
}

/// Collects the remaining results of `cursor` and closes it.
///
/// # Errors
///
/// Returns the first error produced by the cursor, a limit exceeded error if
/// the result grows past `config.max_buffered_results`, or the error of the
/// final close. The cursor is closed in every case.
pub fn drain<E, I>(cursor: &mut I, config: &SearchConfig) -> Result<Vec<E>>
where
    I: CloseableIterator<Item = Result<E>> + ?Sized,
{
    let mut guard = CloseGuard::new(cursor);
    let mut results = Vec::new();
    while let Some(item) = guard.cursor.next() {
        results.push(item?);
        if config.exceeds_buffer(results.len()) {
            return Err(buffer_limit(config));
        }
    }
    guard.close()?;
    Ok(results)
}

/// Fails if a buffered result is larger than the configured limit.
///
/// # Errors
///
/// Returns a limit exceeded error naming the configured limit.
pub fn check_buffer_limit<E>(results: Vec<E>, config: &SearchConfig) -> Result<Vec<E>> {
    if config.exceeds_buffer(results.len()) {
        Err(buffer_limit(config))
    } else {
        Ok(results)
    }
}

fn buffer_limit(config: &SearchConfig) -> Error {
    Error::limit_exceeded(SemanticLimit::MaxBufferedResults {
        limit: config.max_buffered_results.unwrap_or_default(),
    })
}
