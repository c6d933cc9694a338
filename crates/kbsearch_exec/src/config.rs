//! Configuration for compiled query execution.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration shared by the executions of one compiled query.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SearchConfig {
    /// Maximum number of results a buffered search may materialize
    /// (`None` = unlimited). Draining a stream into a buffer counts too.
    pub max_buffered_results: Option<usize>,

    /// Emit connection borrow/release events at `debug` instead of `trace`.
    pub log_connections: bool,
}

impl SearchConfig {
    /// Unlimited buffering, connection events at `trace`.
    pub const DEFAULT: Self = Self {
        max_buffered_results: None,
        log_connections: false,
    };

    /// Creates a configuration that fails buffered searches past `limit`
    /// results.
    #[must_use]
    pub const fn bounded(limit: usize) -> Self {
        Self {
            max_buffered_results: Some(limit),
            ..Self::DEFAULT
        }
    }

    /// Creates a configuration for debugging connection leaks.
    #[must_use]
    pub const fn debug() -> Self {
        Self {
            log_connections: true,
            ..Self::DEFAULT
        }
    }

    /// Builder method to set the buffered result limit.
    #[must_use]
    pub const fn with_max_buffered_results(mut self, limit: Option<usize>) -> Self {
        self.max_buffered_results = limit;
        self
    }

    /// Builder method to enable/disable connection logging at `debug`.
    #[must_use]
    pub const fn with_log_connections(mut self, log: bool) -> Self {
        self.log_connections = log;
        self
    }

    /// Returns true if `count` results exceed the buffered result limit.
    #[must_use]
    pub fn exceeds_buffer(&self, count: usize) -> bool {
        self.max_buffered_results.is_some_and(|limit| count > limit)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
