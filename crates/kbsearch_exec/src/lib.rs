//! Compiled query execution against pooled read connections.
//!
//! This crate provides:
//! - [`CompiledQuery`] - The six-operation execution contract
//! - [`ConnectionPool`], [`ConnectionGuard`] - Borrowing and releasing read connections
//! - [`CloseableIterator`], [`SearchCursor`] - Streamed results that own resources
//! - [`BufferedCompiledQuery`], [`StreamingCompiledQuery`] - Executors over one backend primitive
//! - [`ConcatenatedCompiledQuery`], [`EmptyCompiledQuery`] - Composite and trivial executors
//! - [`SearchConfig`] - Execution limits and logging

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod buffered;
pub mod compiled;
pub mod concat;
pub mod config;
pub mod cursor;
pub mod empty;
pub mod pool;
pub mod streaming;

pub use buffered::{BufferedCompiledQuery, BufferedSearch};
pub use compiled::{CompiledQuery, search_pooled, stream_pooled};
pub use concat::{ConcatenatedCompiledQuery, DynCompiledQuery};
pub use config::SearchConfig;
pub use cursor::{CloseableIterator, ReleasingCursor, SearchCursor, VecCursor, drain};
pub use empty::EmptyCompiledQuery;
pub use pool::{ConnectionGuard, ConnectionPool, PooledConnection};
pub use streaming::{StreamingCompiledQuery, StreamingSearch};
