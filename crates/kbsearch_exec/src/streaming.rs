//! Executors whose backend produces results through a cursor.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use kbsearch_foundation::Result;
use kbsearch_query::RevisionQueryArguments;

use crate::compiled::{CompiledQuery, search_pooled, stream_pooled};
use crate::config::SearchConfig;
use crate::cursor::{SearchCursor, drain};
use crate::pool::{ConnectionPool, PooledConnection};

/// A backend search that streams its result.
pub trait StreamingSearch<E, C>: Send + Sync {
    /// Opens a cursor on `connection`. Cursors that read lazily keep a clone
    /// of the connection handle.
    ///
    /// # Errors
    ///
    /// Returns store errors unchanged.
    fn open<'a>(&'a self, connection: &PooledConnection<C>, args: &RevisionQueryArguments) -> Result<SearchCursor<'a, E>>
    where
        E: 'a;
}

/// A compiled query over a [`StreamingSearch`]; buffers by draining the
/// cursor, closing it on every path.
pub struct StreamingCompiledQuery<E, P, S> {
    pool: Arc<P>,
    search: S,
    config: SearchConfig,
    result_type: PhantomData<fn() -> E>,
}

impl<E, P: ConnectionPool, S: StreamingSearch<E, P::Connection>> StreamingCompiledQuery<E, P, S> {
    /// Creates a query running `search` on connections from `pool`.
    pub fn new(pool: Arc<P>, search: S) -> Self {
        Self {
            pool,
            search,
            config: SearchConfig::default(),
            result_type: PhantomData,
        }
    }

    /// Builder method to set the execution configuration.
    #[must_use]
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the execution configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Returns the pool connections are borrowed from.
    pub fn connection_pool(&self) -> &P {
        &self.pool
    }
}

impl<E, P, S> CompiledQuery<E, P> for StreamingCompiledQuery<E, P, S>
where
    E: Send,
    P: ConnectionPool,
    S: StreamingSearch<E, P::Connection>,
{
    fn search_with(&self, connection: &PooledConnection<P::Connection>, args: &RevisionQueryArguments) -> Result<Vec<E>> {
        let mut cursor = self.search.open(connection, args)?;
        drain(&mut cursor, &self.config)
    }

    fn search_stream_with<'a>(
        &'a self,
        connection: &PooledConnection<P::Connection>,
        args: &RevisionQueryArguments,
    ) -> Result<SearchCursor<'a, E>>
    where
        E: 'a,
    {
        self.search.open(connection, args)
    }

    fn search_args(&self, args: &RevisionQueryArguments) -> Result<Vec<E>> {
        search_pooled(&*self.pool, &self.config, |connection| self.search_with(connection, args))
    }

    fn search_stream_args<'a>(&'a self, args: &RevisionQueryArguments) -> Result<SearchCursor<'a, E>>
    where
        E: 'a,
    {
        stream_pooled(&*self.pool, &self.config, |connection| self.search_stream_with(connection, args))
    }
}

impl<E, P, S> fmt::Debug for StreamingCompiledQuery<E, P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamingCompiledQuery")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
