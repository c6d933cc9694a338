//! Actual values for a query's declared parameters.
//!
//! Argument values are built with consuming `with_*` builders:
//!
//! ```
//! use kbsearch_foundation::{BranchId, Revision};
//! use kbsearch_query::RevisionQueryArguments;
//!
//! let args = RevisionQueryArguments::new()
//!     .with_arguments(["Alice"])
//!     .unwrap()
//!     .with_requested_branch(BranchId::new(2))
//!     .with_requested_revision(Revision::new(10))
//!     .with_stop_row(5);
//! assert_eq!(args.values().len(), 1);
//! ```

use std::ops::Deref;

use kbsearch_foundation::{BranchId, Error, Result, Revision, Value};

use crate::query::{BranchParam, RangeParam, RevisionParam};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Branches a query execution is restricted to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BranchSelection {
    /// Exactly one branch.
    Single(BranchId),
    /// No restriction.
    All,
}

/// Arguments common to every query kind.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryArguments {
    values: Vec<Value>,
    requested_branch: Option<BranchId>,
}

impl QueryArguments {
    /// Creates arguments without values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the actual parameter values, in declaration order.
    ///
    /// Object references are normalized to their keys.
    ///
    /// # Errors
    ///
    /// Returns an invalid argument error if any value is null.
    pub fn with_arguments<V: Into<Value>>(mut self, values: impl IntoIterator<Item = V>) -> Result<Self> {
        self.values = values
            .into_iter()
            .enumerate()
            .map(|(position, value)| {
                let value = value.into();
                if value.is_null() {
                    Err(Error::invalid_argument(format!(
                        "argument {position} must not be 'null'"
                    )))
                } else {
                    Ok(value.normalize())
                }
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(self)
    }

    /// Requests a specific branch for [`BranchParam::Single`] queries.
    #[must_use]
    pub const fn with_requested_branch(mut self, branch: BranchId) -> Self {
        self.requested_branch = Some(branch);
        self
    }

    /// Returns the actual parameter values.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Returns the value at a parameter position.
    #[must_use]
    pub fn value(&self, position: usize) -> Option<&Value> {
        self.values.get(position)
    }

    /// Returns the explicitly requested branch, if any.
    #[must_use]
    pub const fn requested_branch(&self) -> Option<BranchId> {
        self.requested_branch
    }

    /// Resolves the branches to search under `branch_param`.
    ///
    /// A single-branch query searches the requested branch, or
    /// `default_branch` (typically the branch of the calling context) if
    /// none was requested.
    ///
    /// # Errors
    ///
    /// Returns an unsupported error for [`BranchParam::Set`] and
    /// [`BranchParam::Without`].
    pub fn resolve_branch(
        &self,
        branch_param: BranchParam,
        default_branch: BranchId,
    ) -> Result<BranchSelection> {
        match branch_param {
            BranchParam::Single => Ok(BranchSelection::Single(
                self.requested_branch.unwrap_or(default_branch),
            )),
            BranchParam::All => Ok(BranchSelection::All),
            BranchParam::Set | BranchParam::Without => Err(Error::unsupported(format!(
                "branch parameter {branch_param:?}"
            ))),
        }
    }
}

// =============================================================================
// Row windows
// =============================================================================

/// A window `[start, stop)` of result rows.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RowWindow {
    /// First row, zero-based.
    pub start: usize,
    /// Row after the last one, or None for no upper bound.
    pub stop: Option<usize>,
}

impl RowWindow {
    /// The window containing every row.
    pub const ALL: RowWindow = RowWindow {
        start: 0,
        stop: None,
    };

    /// Returns true if row `index` lies in the window.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && self.stop.is_none_or(|stop| index < stop)
    }

    /// Restricts an iterator to the window.
    pub fn apply<I: Iterator>(self, rows: I) -> impl Iterator<Item = I::Item> {
        let take = self
            .stop
            .map_or(usize::MAX, |stop| stop.saturating_sub(self.start));
        rows.skip(self.start).take(take)
    }
}

/// Arguments of a [`crate::RevisionQuery`] execution.
#[derive(Clone, Debug, PartialEq)]
pub struct RevisionQueryArguments {
    base: QueryArguments,
    requested_revision: Revision,
    start_row: usize,
    stop_row: Option<usize>,
}

impl Default for RevisionQueryArguments {
    fn default() -> Self {
        Self {
            base: QueryArguments::default(),
            requested_revision: Revision::CURRENT,
            start_row: 0,
            stop_row: None,
        }
    }
}

impl RevisionQueryArguments {
    /// Creates arguments searching the current revision without a window.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the actual parameter values, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns an invalid argument error if any value is null.
    pub fn with_arguments<V: Into<Value>>(mut self, values: impl IntoIterator<Item = V>) -> Result<Self> {
        self.base = self.base.with_arguments(values)?;
        Ok(self)
    }

    /// Requests a specific branch.
    #[must_use]
    pub fn with_requested_branch(mut self, branch: BranchId) -> Self {
        self.base = self.base.with_requested_branch(branch);
        self
    }

    /// Requests a historic revision instead of the current one.
    #[must_use]
    pub const fn with_requested_revision(mut self, revision: Revision) -> Self {
        self.requested_revision = revision;
        self
    }

    /// Sets the first row of a [`RangeParam::Range`] window.
    #[must_use]
    pub const fn with_start_row(mut self, start_row: usize) -> Self {
        self.start_row = start_row;
        self
    }

    /// Sets the end of a [`RangeParam::Head`] or [`RangeParam::Range`] window.
    #[must_use]
    pub const fn with_stop_row(mut self, stop_row: usize) -> Self {
        self.stop_row = Some(stop_row);
        self
    }

    /// Returns the requested revision.
    #[must_use]
    pub const fn requested_revision(&self) -> Revision {
        self.requested_revision
    }

    /// Returns the requested start row.
    #[must_use]
    pub const fn start_row(&self) -> usize {
        self.start_row
    }

    /// Returns the requested stop row.
    #[must_use]
    pub const fn stop_row(&self) -> Option<usize> {
        self.stop_row
    }

    /// Returns the rows selected under `range_param`.
    #[must_use]
    pub const fn row_window(&self, range_param: RangeParam) -> RowWindow {
        match range_param {
            RangeParam::Complete => RowWindow::ALL,
            RangeParam::First => RowWindow {
                start: 0,
                stop: Some(1),
            },
            RangeParam::Head => RowWindow {
                start: 0,
                stop: self.stop_row,
            },
            RangeParam::Range => RowWindow {
                start: self.start_row,
                stop: self.stop_row,
            },
        }
    }
}

impl Deref for RevisionQueryArguments {
    type Target = QueryArguments;

    fn deref(&self) -> &QueryArguments {
        &self.base
    }
}

// =============================================================================
// History arguments
// =============================================================================

/// Arguments of a [`crate::HistoryQuery`] execution.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryQueryArguments {
    base: QueryArguments,
    start_revision: Revision,
    stop_revision: Revision,
}

impl Default for HistoryQueryArguments {
    fn default() -> Self {
        Self {
            base: QueryArguments::default(),
            start_revision: Revision::INITIAL,
            stop_revision: Revision::CURRENT,
        }
    }
}

impl HistoryQueryArguments {
    /// Creates arguments covering the complete history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the actual parameter values, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns an invalid argument error if any value is null.
    pub fn with_arguments<V: Into<Value>>(mut self, values: impl IntoIterator<Item = V>) -> Result<Self> {
        self.base = self.base.with_arguments(values)?;
        Ok(self)
    }

    /// Requests a specific branch.
    #[must_use]
    pub fn with_requested_branch(mut self, branch: BranchId) -> Self {
        self.base = self.base.with_requested_branch(branch);
        self
    }

    /// Sets the first revision of a [`RevisionParam::Range`] selection.
    #[must_use]
    pub const fn with_start_revision(mut self, revision: Revision) -> Self {
        self.start_revision = revision;
        self
    }

    /// Sets the last revision of a [`RevisionParam::Range`] selection.
    #[must_use]
    pub const fn with_stop_revision(mut self, revision: Revision) -> Self {
        self.stop_revision = revision;
        self
    }

    /// Returns the requested start revision.
    #[must_use]
    pub const fn start_revision(&self) -> Revision {
        self.start_revision
    }

    /// Returns the requested stop revision.
    #[must_use]
    pub const fn stop_revision(&self) -> Revision {
        self.stop_revision
    }

    /// Returns the inclusive revision bounds selected under `revision_param`.
    #[must_use]
    pub const fn revision_window(&self, revision_param: RevisionParam) -> (Revision, Revision) {
        match revision_param {
            RevisionParam::All => (Revision::INITIAL, Revision::CURRENT),
            RevisionParam::Range => (self.start_revision, self.stop_revision),
        }
    }
}

impl Deref for HistoryQueryArguments {
    type Target = QueryArguments;

    fn deref(&self) -> &QueryArguments {
        &self.base
    }
}
