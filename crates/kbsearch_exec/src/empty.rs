//! The compiled query of a search known to have no results.

use kbsearch_foundation::Result;
use kbsearch_query::RevisionQueryArguments;

use crate::compiled::CompiledQuery;
use crate::cursor::{SearchCursor, VecCursor};
use crate::pool::{ConnectionPool, PooledConnection};

/// Returns nothing for every overload and never touches a pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EmptyCompiledQuery;

impl<E: Send, P: ConnectionPool> CompiledQuery<E, P> for EmptyCompiledQuery {
    fn search_with(&self, _connection: &PooledConnection<P::Connection>, _args: &RevisionQueryArguments) -> Result<Vec<E>> {
        Ok(Vec::new())
    }

    fn search_stream_with<'a>(
        &'a self,
        _connection: &PooledConnection<P::Connection>,
        _args: &RevisionQueryArguments,
    ) -> Result<SearchCursor<'a, E>>
    where
        E: 'a,
    {
        Ok(Box::new(VecCursor::empty()))
    }

    fn search_args(&self, _args: &RevisionQueryArguments) -> Result<Vec<E>> {
        Ok(Vec::new())
    }

    fn search_stream_args<'a>(&'a self, _args: &RevisionQueryArguments) -> Result<SearchCursor<'a, E>>
    where
        E: 'a,
    {
        Ok(Box::new(VecCursor::empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::testing::CountingPool;

    #[test]
    fn every_overload_is_empty() {
        let query = EmptyCompiledQuery;
        let args = RevisionQueryArguments::new().with_stop_row(10);
        let connection = PooledConnection::new(0_usize);

        assert!(CompiledQuery::<u8, CountingPool>::search(&query).unwrap().is_empty());
        assert!(CompiledQuery::<u8, CountingPool>::search_args(&query, &args).unwrap().is_empty());
        assert!(CompiledQuery::<u8, CountingPool>::search_with(&query, &connection, &args).unwrap().is_empty());
        assert!(CompiledQuery::<u8, CountingPool>::search_stream(&query).unwrap().next().is_none());
        assert!(CompiledQuery::<u8, CountingPool>::search_stream_args(&query, &args).unwrap().next().is_none());
        assert!(CompiledQuery::<u8, CountingPool>::search_stream_with(&query, &connection, &args).unwrap().next().is_none());
    }

    #[test]
    fn is_zero_sized() {
        assert_eq!(std::mem::size_of::<EmptyCompiledQuery>(), 0);
    }
}
