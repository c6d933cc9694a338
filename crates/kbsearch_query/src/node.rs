//! Node identity and per-pass annotations.
//!
//! Query trees are immutable once built. Everything an analysis pass learns
//! about a node (its inferred type, the concrete types it may produce, a
//! backend symbol, a type binding) is stored in an [`Annotations`] side table
//! keyed by the node's [`NodeId`]. Each pass owns its table, so a bound tree
//! can be shared between threads and executed concurrently.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use kbsearch_foundation::{Error, MetaAttribute, MetaObject, Result};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of one query part.
///
/// IDs are unique per process. Cloning a node with [`Clone`] keeps its ID;
/// a deep copy made by the factory assigns fresh IDs.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Allocates a fresh, never used ID.
    #[must_use]
    pub fn fresh() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// Opaque value a backend attaches to a query part (e.g. a table alias).
#[derive(Clone)]
pub struct Symbol(Arc<dyn Any + Send + Sync>);

impl Symbol {
    /// Wraps a backend value.
    #[must_use]
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Returns the backend value if it has type `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Symbol(..)")
    }
}

/// A query part whose meaning depends on a named type.
pub trait TypeSystemDependent {
    /// Returns the identity of the node.
    fn node_id(&self) -> NodeId;

    /// Returns the name of the type the node depends on.
    ///
    /// Parameters have no syntactic type name; they take their type from the
    /// matching [`crate::ParameterDeclaration`].
    fn type_name(&self) -> Option<&str>;
}

/// Side table of analysis results for one query tree.
///
/// Backed by persistent maps, so snapshotting a table before a speculative
/// pass is O(1).
#[derive(Clone, Debug, Default)]
pub struct Annotations {
    polymorphic_types: im::HashMap<NodeId, MetaObject>,
    concrete_types: im::HashMap<NodeId, im::HashSet<MetaObject>>,
    symbols: im::HashMap<NodeId, Symbol>,
    declared_types: im::HashMap<NodeId, MetaObject>,
    attributes: im::HashMap<NodeId, MetaAttribute>,
}

impl Annotations {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the inferred return or content type of a node.
    #[must_use]
    pub fn polymorphic_type(&self, node: NodeId) -> Option<&MetaObject> {
        self.polymorphic_types.get(&node)
    }

    /// Records the inferred type of a node.
    pub fn set_polymorphic_type(&mut self, node: NodeId, meta: MetaObject) {
        self.polymorphic_types.insert(node, meta);
    }

    /// Returns the concrete runtime types a node may produce.
    #[must_use]
    pub fn concrete_types(&self, node: NodeId) -> Option<&im::HashSet<MetaObject>> {
        self.concrete_types.get(&node)
    }

    /// Records the concrete runtime types a node may produce.
    pub fn set_concrete_types(
        &mut self,
        node: NodeId,
        types: impl IntoIterator<Item = MetaObject>,
    ) {
        self.concrete_types.insert(node, types.into_iter().collect());
    }

    /// Returns the backend symbol attached to a node.
    #[must_use]
    pub fn symbol(&self, node: NodeId) -> Option<&Symbol> {
        self.symbols.get(&node)
    }

    /// Attaches a backend symbol to a node.
    pub fn set_symbol(&mut self, node: NodeId, symbol: Symbol) {
        self.symbols.insert(node, symbol);
    }

    /// Returns the declared type bound to a type-dependent node.
    ///
    /// # Errors
    ///
    /// Returns an illegal state error if no binding pass has bound the node.
    pub fn declared_type(&self, node: &impl TypeSystemDependent) -> Result<&MetaObject> {
        self.declared_types.get(&node.node_id()).ok_or_else(|| {
            Error::illegal_state(format!(
                "type '{}' accessed before type binding",
                node.type_name().unwrap_or("<parameter>")
            ))
        })
    }

    /// Binds the declared type of a type-dependent node.
    pub fn set_declared_type(&mut self, node: &impl TypeSystemDependent, meta: MetaObject) {
        self.declared_types.insert(node.node_id(), meta);
    }

    /// Returns true if the node already has a declared type.
    #[must_use]
    pub fn has_type_binding(&self, node: &impl TypeSystemDependent) -> bool {
        self.declared_types.contains_key(&node.node_id())
    }

    /// Returns the attribute an attribute or reference access was resolved to.
    ///
    /// # Errors
    ///
    /// Returns an illegal state error if the access has not been resolved.
    pub fn resolved_attribute(&self, node: NodeId) -> Result<&MetaAttribute> {
        self.attributes
            .get(&node)
            .ok_or_else(|| Error::illegal_state("attribute accessed before type binding"))
    }

    /// Records the attribute an access was resolved to.
    pub fn set_resolved_attribute(&mut self, node: NodeId, attribute: MetaAttribute) {
        self.attributes.insert(node, attribute);
    }

    /// Returns true if the access has been resolved.
    #[must_use]
    pub fn has_resolved_attribute(&self, node: NodeId) -> bool {
        self.attributes.contains_key(&node)
    }

    /// Returns the number of nodes with a declared type.
    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.declared_types.len()
    }
}
