//! Identity of objects in a versioned, branched store.
//!
//! An [`ObjectKey`] names one object on one branch, as seen from one history
//! context. The history context is the revision the key was taken in, which
//! is distinct from the revision a query requests.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of a branch (an independent, forkable line of history).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BranchId(u64);

impl BranchId {
    /// The trunk branch every store starts with.
    pub const TRUNK: BranchId = BranchId(1);

    /// Creates a new branch ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BranchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "branch-{}", self.0)
    }
}

/// A point in the linear history of a branch.
///
/// [`Revision::CURRENT`] is a sentinel meaning "the latest state", which is
/// what queries target unless a fixed historical revision is requested.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Revision(u64);

impl Revision {
    /// The first revision of every branch.
    pub const INITIAL: Revision = Revision(1);

    /// Sentinel for the current (latest) state.
    pub const CURRENT: Revision = Revision(u64::MAX);

    /// Creates a revision from its commit number.
    #[must_use]
    pub const fn new(commit_number: u64) -> Self {
        Self(commit_number)
    }

    /// Returns the commit number.
    #[must_use]
    pub const fn commit_number(self) -> u64 {
        self.0
    }

    /// Returns true if this is the [`Revision::CURRENT`] sentinel.
    #[must_use]
    pub const fn is_current(self) -> bool {
        self.0 == u64::MAX
    }
}

impl Default for Revision {
    fn default() -> Self {
        Self::CURRENT
    }
}

impl fmt::Debug for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_current() {
            write!(f, "Revision(current)")
        } else {
            write!(f, "Revision({})", self.0)
        }
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_current() {
            write!(f, "current")
        } else {
            write!(f, "r{}", self.0)
        }
    }
}

/// Store-wide object identifier, stable across revisions and branches.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObjectId(u64);

impl ObjectId {
    /// Creates a new object ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Persistent key of an object.
///
/// Keys order by branch, history context, type name and finally object ID,
/// which gives in-memory sorts a deterministic tie-breaker.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObjectKey {
    branch: BranchId,
    history_context: Revision,
    object_type: Arc<str>,
    object_id: ObjectId,
}

impl ObjectKey {
    /// Creates a new object key.
    #[must_use]
    pub fn new(
        branch: BranchId,
        history_context: Revision,
        object_type: impl Into<Arc<str>>,
        object_id: ObjectId,
    ) -> Self {
        Self {
            branch,
            history_context,
            object_type: object_type.into(),
            object_id,
        }
    }

    /// Creates a key for the current state of an object on the trunk.
    #[must_use]
    pub fn current(object_type: impl Into<Arc<str>>, object_id: u64) -> Self {
        Self::new(
            BranchId::TRUNK,
            Revision::CURRENT,
            object_type,
            ObjectId::new(object_id),
        )
    }

    /// Returns the branch of the object.
    #[must_use]
    pub const fn branch(&self) -> BranchId {
        self.branch
    }

    /// Returns the revision the key was taken in.
    #[must_use]
    pub const fn history_context(&self) -> Revision {
        self.history_context
    }

    /// Returns the name of the object's concrete type.
    #[must_use]
    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    /// Returns the object ID.
    #[must_use]
    pub const fn object_id(&self) -> ObjectId {
        self.object_id
    }

    /// Returns a key for the same object seen from another history context.
    #[must_use]
    pub fn in_revision(&self, history_context: Revision) -> Self {
        Self {
            history_context,
            ..self.clone()
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{}@{}/{}",
            self.object_type,
            self.object_id.0,
            self.branch.0,
            self.history_context
        )
    }
}

/// Something that carries the persistent key of a store object.
///
/// Values implementing this trait are normalized to their [`ObjectKey`]
/// whenever they are used as literal values or query arguments.
pub trait Identified: fmt::Debug + Send + Sync {
    /// Returns the persistent key of this object.
    fn object_key(&self) -> ObjectKey;
}

impl Identified for ObjectKey {
    fn object_key(&self) -> ObjectKey {
        self.clone()
    }
}
