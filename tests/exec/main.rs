//! Integration tests for Layer 2: Execution
//!
//! Tests for compiled query executors and connection accounting.

mod concat;
mod executors;
mod resources;
mod support;
