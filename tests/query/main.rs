//! Integration tests for Layer 1: Query
//!
//! Tests for query construction, simplification, binding, and printing.

mod binding;
mod factory;
mod queries;
