//! Core values, object keys, type descriptors, and errors for kbsearch.
//!
//! This crate provides:
//! - [`Value`] - Literal and argument values, with object references
//!   normalized to [`ObjectKey`]s
//! - [`ObjectKey`], [`BranchId`], [`Revision`] - Identity of a versioned object
//! - [`MetaObject`], [`MetaAttribute`] - Resolved type descriptors
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod key;
pub mod types;
pub mod value;

pub use error::{Error, ErrorContext, ErrorKind, SemanticLimit};
pub use key::{BranchId, Identified, ObjectId, ObjectKey, Revision};
pub use types::{MetaAttribute, MetaKind, MetaObject, PrimitiveKind};
pub use value::Value;

/// Result type alias using the kbsearch [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
