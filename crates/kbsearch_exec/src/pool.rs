//! Read connections and the guard that returns them to their pool.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use kbsearch_foundation::Result;
use tracing::{debug, trace, warn};

use crate::config::SearchConfig;

/// A pool of read connections to the store.
pub trait ConnectionPool: Send + Sync {
    /// The backend connection type.
    type Connection: Send + Sync;

    /// Borrows a read connection.
    ///
    /// # Errors
    ///
    /// Returns a store error if no connection can be obtained.
    fn borrow_read_connection(&self) -> Result<PooledConnection<Self::Connection>>;

    /// Returns a connection obtained from [`Self::borrow_read_connection`].
    fn release_read_connection(&self, connection: PooledConnection<Self::Connection>);
}

/// A shared handle to a borrowed connection.
///
/// Cursors that read lazily keep a clone of the handle; the connection goes
/// back to the pool when the execution that borrowed it ends, not when the
/// last handle is dropped.
pub struct PooledConnection<C> {
    inner: Arc<C>,
}

impl<C> PooledConnection<C> {
    /// Wraps a backend connection.
    pub fn new(connection: C) -> Self {
        Self {
            inner: Arc::new(connection),
        }
    }

    /// Returns true if both handles refer to the same connection.
    #[must_use]
    pub fn same_connection(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<C> Clone for PooledConnection<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> Deref for PooledConnection<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.inner
    }
}

impl<C: fmt::Debug> fmt::Debug for PooledConnection<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PooledConnection").field(&self.inner).finish()
    }
}

/// Owns one borrowed connection and releases it exactly once, on drop.
pub struct ConnectionGuard<'p, P: ConnectionPool + ?Sized> {
    pool: &'p P,
    connection: PooledConnection<P::Connection>,
    log_connections: bool,
}

impl<'p, P: ConnectionPool + ?Sized> ConnectionGuard<'p, P> {
    /// Borrows a read connection from `pool`.
    ///
    /// # Errors
    ///
    /// Returns the pool's error unchanged if borrowing fails. Nothing has to
    /// be released in that case.
    pub fn acquire(pool: &'p P, config: &SearchConfig) -> Result<Self> {
        let connection = pool.borrow_read_connection().inspect_err(|e| {
            warn!(error = %e, "failed to borrow read connection");
        })?;
        log_connection(config.log_connections, "borrow");
        Ok(Self {
            pool,
            connection,
            log_connections: config.log_connections,
        })
    }

    /// Returns the borrowed connection.
    #[must_use]
    pub fn connection(&self) -> &PooledConnection<P::Connection> {
        &self.connection
    }

    /// Releases the connection now.
    pub fn release(self) {
        drop(self);
    }
}

impl<P: ConnectionPool + ?Sized> Drop for ConnectionGuard<'_, P> {
    fn drop(&mut self) {
        log_connection(self.log_connections, "release");
        self.pool.release_read_connection(self.connection.clone());
    }
}

impl<P: ConnectionPool + ?Sized> fmt::Debug for ConnectionGuard<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionGuard")
            .field("log_connections", &self.log_connections)
            .finish_non_exhaustive()
    }
}

fn log_connection(verbose: bool, action: &'static str) {
    if verbose {
        debug!(action, "read connection");
    } else {
        trace!(action, "read connection");
    }
}
