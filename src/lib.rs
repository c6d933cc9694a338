//! kbsearch - Query algebra and execution contract for a versioned, branched object store
//!
//! This crate re-exports all layers of the kbsearch system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: kbsearch_exec        - Compiled queries, pooled connections, cursors
//! Layer 1: kbsearch_query       - ASTs, factory, query model, type binding
//! Layer 0: kbsearch_foundation  - Core types (Value, ObjectKey, MetaObject, Error)
//! ```

pub use kbsearch_exec as exec;
pub use kbsearch_foundation as foundation;
pub use kbsearch_query as query;
