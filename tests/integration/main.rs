//! Integration tests across all layers
//!
//! Runs queries built with the factory through compiled query executors
//! against an in-memory store.

mod end_to_end;
mod store;
