//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: Value, ObjectKey, MetaObject, and Error.

mod errors;
mod keys;
mod values;
