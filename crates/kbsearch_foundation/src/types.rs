//! Resolved type descriptors.
//!
//! Query trees reference types and attributes by name. A binding pass turns
//! those names into [`MetaObject`]s and [`MetaAttribute`]s; how the names are
//! resolved is up to the type system behind the store.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Name of the association type whose instances link two objects.
pub const ASSOCIATION_TYPE_NAME: &str = "Association";

/// Name of the reference from an association to its source object.
pub const REFERENCE_SOURCE_NAME: &str = "source";

/// Name of the reference from an association to its destination object.
pub const REFERENCE_DEST_NAME: &str = "dest";

/// Name of the root type of all persistent objects.
pub const OBJECT_TYPE_NAME: &str = "Object";

/// Name of the reference from an object to its model type.
pub const TYPE_REF_NAME: &str = "tType";

/// Name of the model type object type.
pub const META_ELEMENT_TYPE_NAME: &str = "MetaElement";

/// Name of the attribute holding the name of a model type.
pub const META_ELEMENT_NAME_ATTR: &str = "name";

/// Primitive value types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PrimitiveKind {
    /// Boolean values.
    Bool,
    /// 64-bit signed integers.
    Int,
    /// 64-bit floating point numbers.
    Float,
    /// Strings.
    String,
}

impl PrimitiveKind {
    /// Checks whether a value belongs to this primitive type.
    ///
    /// Null is accepted by every primitive type.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (_, Value::Null)
                | (Self::Bool, Value::Bool(_))
                | (Self::Int | Self::Float, Value::Int(_))
                | (Self::Float, Value::Float(_))
                | (Self::String, Value::String(_))
        )
    }
}

/// Kind of a [`MetaObject`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MetaKind {
    /// An object type, optionally specializing a super type.
    Class {
        /// Name of the direct super type.
        super_type: Option<Arc<str>>,
        /// Whether the type has no direct instances.
        is_abstract: bool,
    },
    /// An association type linking a source to a destination.
    Association,
    /// A primitive value type.
    Primitive(PrimitiveKind),
    /// A tuple of element types.
    Tuple(Vec<MetaObject>),
}

/// A resolved type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MetaObject {
    name: Arc<str>,
    kind: MetaKind,
}

impl MetaObject {
    /// Creates a concrete class without a super type.
    #[must_use]
    pub fn class(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            kind: MetaKind::Class {
                super_type: None,
                is_abstract: false,
            },
        }
    }

    /// Creates a class specializing `super_type`.
    #[must_use]
    pub fn subclass(name: impl Into<Arc<str>>, super_type: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            kind: MetaKind::Class {
                super_type: Some(super_type.into()),
                is_abstract: false,
            },
        }
    }

    /// Creates an association type.
    #[must_use]
    pub fn association(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            kind: MetaKind::Association,
        }
    }

    /// Creates a primitive type.
    #[must_use]
    pub fn primitive(kind: PrimitiveKind) -> Self {
        let name = match kind {
            PrimitiveKind::Bool => "Boolean",
            PrimitiveKind::Int => "Long",
            PrimitiveKind::Float => "Double",
            PrimitiveKind::String => "String",
        };
        Self {
            name: name.into(),
            kind: MetaKind::Primitive(kind),
        }
    }

    /// Creates a tuple type.
    #[must_use]
    pub fn tuple(elements: Vec<MetaObject>) -> Self {
        let name = elements
            .iter()
            .map(MetaObject::name)
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            name: format!("({name})").into(),
            kind: MetaKind::Tuple(elements),
        }
    }

    /// Marks this class as abstract.
    #[must_use]
    pub fn into_abstract(mut self) -> Self {
        if let MetaKind::Class { is_abstract, .. } = &mut self.kind {
            *is_abstract = true;
        }
        self
    }

    /// Returns the type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the kind of this type.
    #[must_use]
    pub const fn kind(&self) -> &MetaKind {
        &self.kind
    }

    /// Returns the name of the direct super type, if any.
    #[must_use]
    pub fn super_type(&self) -> Option<&str> {
        match &self.kind {
            MetaKind::Class { super_type, .. } => super_type.as_deref(),
            _ => None,
        }
    }

    /// Returns true if this is an abstract class.
    #[must_use]
    pub const fn is_abstract(&self) -> bool {
        matches!(
            self.kind,
            MetaKind::Class {
                is_abstract: true,
                ..
            }
        )
    }

    /// Returns true if this is a primitive type.
    #[must_use]
    pub const fn is_primitive(&self) -> bool {
        matches!(self.kind, MetaKind::Primitive(_))
    }
}

impl fmt::Display for MetaObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A resolved attribute of an owner type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MetaAttribute {
    owner: Arc<str>,
    name: Arc<str>,
    value_type: MetaObject,
}

impl MetaAttribute {
    /// Creates a new attribute descriptor.
    #[must_use]
    pub fn new(owner: impl Into<Arc<str>>, name: impl Into<Arc<str>>, value_type: MetaObject) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            value_type,
        }
    }

    /// Returns the name of the owner type.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Returns the attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the type of the attribute's values.
    #[must_use]
    pub const fn value_type(&self) -> &MetaObject {
        &self.value_type
    }

    /// Returns true if the attribute holds references to other objects.
    #[must_use]
    pub const fn is_reference(&self) -> bool {
        matches!(
            self.value_type.kind,
            MetaKind::Class { .. } | MetaKind::Association
        )
    }
}

impl fmt::Display for MetaAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_accepts() {
        assert!(PrimitiveKind::Int.accepts(&Value::Int(1)));
        assert!(PrimitiveKind::Float.accepts(&Value::Int(1)));
        assert!(!PrimitiveKind::Int.accepts(&Value::Float(1.0)));
        assert!(PrimitiveKind::String.accepts(&Value::Null));
    }

    #[test]
    fn class_hierarchy_accessors() {
        let a = MetaObject::class("A").into_abstract();
        let b = MetaObject::subclass("B", "A");
        assert!(a.is_abstract());
        assert!(!b.is_abstract());
        assert_eq!(b.super_type(), Some("A"));
        assert_eq!(a.super_type(), None);
    }

    #[test]
    fn tuple_name_lists_elements() {
        let t = MetaObject::tuple(vec![MetaObject::class("A"), MetaObject::class("B")]);
        assert_eq!(t.name(), "(A, B)");
    }

    #[test]
    fn reference_attribute() {
        let attr = MetaAttribute::new("E", "ref", MetaObject::class("A"));
        let plain = MetaAttribute::new("E", "n", MetaObject::primitive(PrimitiveKind::Int));
        assert!(attr.is_reference());
        assert!(!plain.is_reference());
        assert_eq!(format!("{attr}"), "E.ref");
    }
}
