//! Error types for the kbsearch system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

/// The main error type for kbsearch operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an invalid argument error (a caller bug detected at construction).
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument(message.into()))
    }

    /// Creates an illegal state error (an analysis pass ran out of order).
    #[must_use]
    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IllegalState(message.into()))
    }

    /// Creates an error for a declared but unimplemented feature.
    #[must_use]
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unsupported(message.into()))
    }

    /// Creates a duplicate parameter declaration error.
    #[must_use]
    pub fn duplicate_parameter(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateParameter(name.into()))
    }

    /// Creates an unknown parameter error.
    #[must_use]
    pub fn unknown_parameter(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownParameter(name.into()))
    }

    /// Creates an argument count mismatch error.
    #[must_use]
    pub fn argument_count_mismatch(expected: usize, actual: usize) -> Self {
        Self::new(ErrorKind::ArgumentCountMismatch { expected, actual })
    }

    /// Creates a type not found error.
    #[must_use]
    pub fn type_not_found(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeNotFound(name.into()))
    }

    /// Creates an attribute not found error.
    #[must_use]
    pub fn attribute_not_found(owner: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::new(ErrorKind::AttributeNotFound {
            owner: owner.into(),
            attribute: attribute.into(),
        })
    }

    /// Creates a store or connection failure.
    #[must_use]
    pub fn store(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Store(message.into()))
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }

    /// Creates a semantic limit exceeded error.
    #[must_use]
    pub fn limit_exceeded(limit: SemanticLimit) -> Self {
        Self::new(ErrorKind::LimitExceeded(limit))
    }

    /// Returns true if this error was raised by the store or connection layer.
    #[must_use]
    pub const fn is_store_failure(&self) -> bool {
        matches!(self.kind, ErrorKind::Store(_))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Argument validation failed while building a query part.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A value was read before the pass that produces it ran.
    #[error("illegal state: {0}")]
    IllegalState(String),

    /// The requested feature is declared but not implemented.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// Two parameter declarations of one query share a name.
    #[error("duplicate parameter declaration: {0}")]
    DuplicateParameter(String),

    /// A parameter is referenced but never declared.
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    /// The number of actual arguments differs from the declared parameters.
    #[error("argument count mismatch: expected {expected}, got {actual}")]
    ArgumentCountMismatch {
        /// Number of declared parameters.
        expected: usize,
        /// Number of supplied arguments.
        actual: usize,
    },

    /// A type name could not be resolved.
    #[error("type not found: {0}")]
    TypeNotFound(String),

    /// An attribute could not be resolved on its owner type.
    #[error("attribute not found: {attribute} on type {owner}")]
    AttributeNotFound {
        /// The owner type that was searched.
        owner: String,
        /// The attribute name that was not found.
        attribute: String,
    },

    /// Failure reported by the underlying store or connection.
    #[error("store failure: {0}")]
    Store(String),

    /// Semantic limit exceeded.
    #[error("limit exceeded: {0}")]
    LimitExceeded(SemanticLimit),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Semantic limits that can be exceeded during execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticLimit {
    /// Maximum number of results materialized by a buffered search.
    MaxBufferedResults {
        /// The configured limit.
        limit: usize,
    },
}

impl fmt::Display for SemanticLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxBufferedResults { limit } => {
                write!(f, "max buffered results ({limit}) exceeded")
            }
        }
    }
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Description of the query or pass that failed.
    pub source: Option<String>,
    /// Stack of nested query parts being processed.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source description.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Adds a stack frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "in {source}")?;
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  at {frame}")?;
            }
        }
        Ok(())
    }
}
