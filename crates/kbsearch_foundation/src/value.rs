//! Literal and argument values.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::key::{Identified, ObjectKey};

/// A value stored in the knowledge base, used as a literal or argument.
///
/// Values are cheaply cloneable. References to live store objects
/// ([`Value::Object`]) are normalized to their persistent key with
/// [`Value::normalize`] before they enter a query tree.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    /// The absent value. Never allowed as a literal or argument.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// String value.
    String(Arc<str>),
    /// Persistent key of a store object.
    Key(ObjectKey),
    /// A live object carrying a persistent key.
    #[cfg_attr(feature = "serde", serde(skip))]
    Object(Arc<dyn Identified>),
    /// Ordered collection of values.
    List(Vec<Value>),
}

impl Value {
    /// Wraps a live object.
    #[must_use]
    pub fn object(object: Arc<dyn Identified>) -> Self {
        Self::Object(object)
    }

    /// Creates a list value.
    #[must_use]
    pub fn list(values: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }

    /// Replaces object references by their persistent keys, recursively.
    #[must_use]
    pub fn normalize(self) -> Self {
        match self {
            Self::Object(object) => Self::Key(object.object_key()),
            Self::List(values) => Self::List(values.into_iter().map(Self::normalize).collect()),
            other => other,
        }
    }

    /// Returns true if this value is null.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns true if this value identifies a store object.
    #[must_use]
    pub const fn is_identifier(&self) -> bool {
        matches!(self, Self::Key(_) | Self::Object(_))
    }

    /// Attempts to extract a boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Attempts to extract an integer value.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the object key, normalizing an object reference.
    #[must_use]
    pub fn as_key(&self) -> Option<ObjectKey> {
        match self {
            Self::Key(key) => Some(key.clone()),
            Self::Object(object) => Some(object.object_key()),
            _ => None,
        }
    }

    /// Attempts to extract the elements of a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }

    /// A human-readable name for the kind of this value.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Key(_) | Self::Object(_) => "object",
            Self::List(_) => "list",
        }
    }

    /// Total order used for in-memory sorting.
    ///
    /// Null sorts before everything else, integers and floats compare
    /// numerically, and values of unrelated kinds order by kind.
    #[must_use]
    pub fn total_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Self::Null, Self::Null) => Ordering::Equal,
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b).unwrap_or_else(|| a.total_cmp(b)),
            (Self::Int(a), Self::Float(b)) => cmp_int_float(*a, *b),
            (Self::Float(a), Self::Int(b)) => cmp_int_float(*b, *a).reverse(),
            (Self::String(a), Self::String(b)) => a.cmp(b),
            (Self::List(a), Self::List(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    let cmp = x.total_cmp(y);
                    if cmp != Ordering::Equal {
                        return cmp;
                    }
                }
                a.len().cmp(&b.len())
            }
            (a, b) => match (a.as_key(), b.as_key()) {
                (Some(ka), Some(kb)) => ka.cmp(&kb),
                _ => a.rank().cmp(&b.rank()),
            },
        }
    }

    const fn rank(&self) -> u8 {
        match self {
            Self::Null => 0,
            Self::Bool(_) => 1,
            Self::Int(_) | Self::Float(_) => 2,
            Self::String(_) => 3,
            Self::Key(_) | Self::Object(_) => 4,
            Self::List(_) => 5,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            #[allow(clippy::float_cmp)]
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (a, b) => match (a.as_key(), b.as_key()) {
                (Some(ka), Some(kb)) => ka == kb,
                _ => false,
            },
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "Null"),
            Self::Bool(b) => write!(f, "Bool({b})"),
            Self::Int(n) => write!(f, "Int({n})"),
            Self::Float(n) => write!(f, "Float({n})"),
            Self::String(s) => write!(f, "String({s:?})"),
            Self::Key(key) => write!(f, "Key({key})"),
            Self::Object(object) => write!(f, "Object({})", object.object_key()),
            Self::List(values) => f.debug_list().entries(values).finish(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s:?}"),
            Self::Key(key) => write!(f, "{key}"),
            Self::Object(object) => write!(f, "{}", object.object_key()),
            Self::List(values) => {
                write!(f, "[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s.into())
    }
}

impl From<ObjectKey> for Value {
    fn from(key: ObjectKey) -> Self {
        Self::Key(key)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Self::List(values)
    }
}

/// Compares an integer with a float without rounding the integer.
///
/// NaN sorts the way `f64::total_cmp` places it: positive NaN above every
/// number, negative NaN below.
fn cmp_int_float(int: i64, float: f64) -> Ordering {
    // 2^63, the first float above i64::MAX.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;

    if float.is_nan() {
        return if float.is_sign_negative() {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    }
    if float >= LIMIT {
        return Ordering::Less;
    }
    if float < -LIMIT {
        return Ordering::Greater;
    }
    let whole = float.trunc();
    // In range and integral, so the cast is exact.
    #[allow(clippy::cast_possible_truncation)]
    let truncated = whole as i64;
    match int.cmp(&truncated) {
        Ordering::Equal => {
            let fraction = float - whole;
            if fraction > 0.0 {
                Ordering::Less
            } else if fraction < 0.0 {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        }
        other => other,
    }
}
