//! Source-major concatenation of compiled queries sharing one pool.

use std::fmt;
use std::sync::Arc;

use kbsearch_foundation::Result;
use kbsearch_query::RevisionQueryArguments;
use tracing::{trace, warn};

use crate::compiled::{CompiledQuery, search_pooled, stream_pooled};
use crate::config::SearchConfig;
use crate::cursor::{CloseableIterator, SearchCursor, check_buffer_limit};
use crate::pool::{ConnectionPool, PooledConnection};

/// A shared, type-erased compiled query.
pub type DynCompiledQuery<E, P> = Arc<dyn CompiledQuery<E, P>>;

/// The results of all sources, in source order, read over one connection.
pub struct ConcatenatedCompiledQuery<E, P> {
    pool: Arc<P>,
    sources: Vec<DynCompiledQuery<E, P>>,
    config: SearchConfig,
}

impl<E, P: ConnectionPool> ConcatenatedCompiledQuery<E, P> {
    /// Concatenates `sources`, which borrow connections from `pool`.
    pub fn new(pool: Arc<P>, sources: Vec<DynCompiledQuery<E, P>>) -> Self {
        Self {
            pool,
            sources,
            config: SearchConfig::default(),
        }
    }

    /// Builder method to set the execution configuration.
    #[must_use]
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the concatenated sources.
    pub fn sources(&self) -> &[DynCompiledQuery<E, P>] {
        &self.sources
    }
}

impl<E, P> CompiledQuery<E, P> for ConcatenatedCompiledQuery<E, P>
where
    E: Send,
    P: ConnectionPool,
{
    fn search_with(&self, connection: &PooledConnection<P::Connection>, args: &RevisionQueryArguments) -> Result<Vec<E>> {
        let mut results = Vec::new();
        for source in &self.sources {
            results.extend(source.search_with(connection, args)?);
            results = check_buffer_limit(results, &self.config)?;
        }
        Ok(results)
    }

    fn search_stream_with<'a>(
        &'a self,
        connection: &PooledConnection<P::Connection>,
        args: &RevisionQueryArguments,
    ) -> Result<SearchCursor<'a, E>>
    where
        E: 'a,
    {
        Ok(Box::new(ConcatenatedCursor {
            sources: &self.sources,
            connection: connection.clone(),
            args: args.clone(),
            next_source: 0,
            current: None,
        }))
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

impl<E, P> fmt::Debug for ConcatenatedCompiledQuery<E, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcatenatedCompiledQuery")
            .field("sources", &self.sources.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Opens the cursor of source `i + 1` only after source `i` is exhausted.
struct ConcatenatedCursor<'a, E, P: ConnectionPool> {
    sources: &'a [DynCompiledQuery<E, P>],
    connection: PooledConnection<P::Connection>,
    args: RevisionQueryArguments,
    next_source: usize,
    current: Option<SearchCursor<'a, E>>,
}

impl<'a, E: 'a, P: ConnectionPool> ConcatenatedCursor<'a, E, P> {
    fn open_next(&mut self) -> Option<Result<()>> {
        let sources = self.sources;
        let source = sources.get(self.next_source)?;
        trace!(source = self.next_source, total = self.sources.len(), "switching concatenated source");
        self.next_source += 1;
        match source.search_stream_with(&self.connection, &self.args) {
            Ok(cursor) => {
                self.current = Some(cursor);
                Some(Ok(()))
            }
            Err(e) => {
                warn!(error = %e, source = self.next_source - 1, "failed to open concatenated source");
                self.next_source = self.sources.len();
                Some(Err(e))
            }
        }
    }
}

impl<'a, E: 'a, P: ConnectionPool> Iterator for ConcatenatedCursor<'a, E, P> {
    type Item = Result<E>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(cursor) = self.current.as_mut() {
                if let Some(item) = cursor.next() {
                    return Some(item);
                }
                let closed = cursor.close();
                self.current = None;
                if let Err(e) = closed {
                    self.next_source = self.sources.len();
                    return Some(Err(e));
                }
            }
            match self.open_next()? {
                Ok(()) => {}
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

impl<'a, E: 'a, P: ConnectionPool> CloseableIterator for ConcatenatedCursor<'a, E, P> {
    fn close(&mut self) -> Result<()> {
        self.next_source = self.sources.len();
        match self.current.take() {
            Some(mut cursor) => cursor.close(),
            None => Ok(()),
        }
    }
}

impl<E, P: ConnectionPool> Drop for ConcatenatedCursor<'_, E, P> {
    fn drop(&mut self) {
        if let Some(mut cursor) = self.current.take() {
            if let Err(e) = cursor.close() {
                warn!(error = %e, "closing dropped concatenated cursor failed");
            }
        }
    }
}
