//! Executors whose backend only produces complete result lists.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use kbsearch_foundation::Result;
use kbsearch_query::RevisionQueryArguments;

use crate::compiled::{CompiledQuery, search_pooled, stream_pooled};
use crate::config::SearchConfig;
use crate::cursor::{SearchCursor, VecCursor, check_buffer_limit};
use crate::pool::{ConnectionPool, PooledConnection};

/// A backend search that materializes its whole result.
pub trait BufferedSearch<E, C>: Send + Sync {
    /// Runs the search on `connection`.
    ///
    /// # Errors
    ///
    /// Returns store errors unchanged.
    fn search(&self, connection: &PooledConnection<C>, args: &RevisionQueryArguments) -> Result<Vec<E>>;
}

impl<E, C, F> BufferedSearch<E, C> for F
where
    F: Fn(&PooledConnection<C>, &RevisionQueryArguments) -> Result<Vec<E>> + Send + Sync,
{
    fn search(&self, connection: &PooledConnection<C>, args: &RevisionQueryArguments) -> Result<Vec<E>> {
        self(connection, args)
    }
}

/// A compiled query over a [`BufferedSearch`]; streams by iterating the
/// buffered list.
pub struct BufferedCompiledQuery<E, P, S> {
    pool: Arc<P>,
    search: S,
    config: SearchConfig,
    result_type: PhantomData<fn() -> E>,
}

impl<E, P: ConnectionPool, S: BufferedSearch<E, P::Connection>> BufferedCompiledQuery<E, P, S> {
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

impl<E, P, S> CompiledQuery<E, P> for BufferedCompiledQuery<E, P, S>
where
    E: Send,
    P: ConnectionPool,
    S: BufferedSearch<E, P::Connection>,
{
    fn search_with(&self, connection: &PooledConnection<P::Connection>, args: &RevisionQueryArguments) -> Result<Vec<E>> {
        check_buffer_limit(self.search.search(connection, args)?, &self.config)
    }

    fn search_stream_with<'a>(
        &'a self,
        connection: &PooledConnection<P::Connection>,
        args: &RevisionQueryArguments,
    ) -> Result<SearchCursor<'a, E>>
    where
        E: 'a,
    {
        Ok(Box::new(VecCursor::new(self.search_with(connection, args)?)))
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

impl<E, P, S> fmt::Debug for BufferedCompiledQuery<E, P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BufferedCompiledQuery")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
