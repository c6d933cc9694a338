//! In-memory realization of an [`Order`].
//!
//! Backends push orders down when they can. When they cannot (a streamed
//! union of sources, a cached result), [`OrderComparator`] sorts the
//! materialized objects instead. Only keys that read a property of the
//! result object itself are supported; anything else is rejected when the
//! comparator is created, never while sorting.

use std::cmp::Ordering;
use std::sync::Arc;

use kbsearch_foundation::{Error, ObjectKey, Result, Value};

use crate::expr::Expression;
use crate::operator::Operator;
use crate::order::{Order, OrderSpec};

/// An object that can be sorted by an [`OrderComparator`].
pub trait OrderSubject {
    /// Returns the value of an attribute, a reference or a flex attribute.
    ///
    /// `None` is treated like a null value and sorts first.
    fn attribute_value(&self, owner_type_name: &str, attribute_name: &str) -> Option<Value>;

    /// Returns the persistent key of the object, if it has one.
    fn identifier(&self) -> Option<ObjectKey> {
        None
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum SortKey {
    Attribute {
        owner: Arc<str>,
        name: Arc<str>,
    },
    Identifier,
}

impl SortKey {
    fn from_expression(expr: &Expression) -> Result<Self> {
        let on_context = matches!(expr.context(), Some(Expression::ContextAccess(_)));
        match expr {
            Expression::Attribute(attr) if on_context => Ok(Self::Attribute {
                owner: attr.owner_type_name().into(),
                name: attr.attribute_name().into(),
            }),
            Expression::Reference(reference) if on_context && reference.access_part().is_none() => {
                Ok(Self::Attribute {
                    owner: reference.owner_type_name().into(),
                    name: reference.attribute_name().into(),
                })
            }
            Expression::Flex(flex) if on_context => Ok(Self::Attribute {
                owner: flex.value_type_name().into(),
                name: flex.name().into(),
            }),
            Expression::Unary(op)
                if op.operator() == Operator::Identifier
                    && matches!(op.argument(), Expression::ContextAccess(_)) =>
            {
                Ok(Self::Identifier)
            }
            other => Err(Error::unsupported(format!(
                "order key '{other}' cannot be evaluated in memory"
            ))),
        }
    }

    fn extract<S: OrderSubject + ?Sized>(&self, subject: &S) -> Value {
        let value = match self {
            Self::Attribute { owner, name } => subject.attribute_value(owner, name),
            Self::Identifier => subject.identifier().map(Value::Key),
        };
        value.unwrap_or(Value::Null)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct CompiledSpec {
    key: SortKey,
    descending: bool,
}

/// Lexicographic comparator over the specs of an [`Order`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderComparator {
    specs: Vec<CompiledSpec>,
}

impl OrderComparator {
    /// Compiles `order` into a comparator.
    ///
    /// # Errors
    ///
    /// Returns an unsupported error if a key is not a property of the result
    /// object (an attribute, reference, flex attribute or identifier of the
    /// context object).
    pub fn create_comparator(order: &Order) -> Result<Self> {
        let specs = order
            .specs()
            .iter()
            .map(|spec: &OrderSpec| {
                Ok(CompiledSpec {
                    key: SortKey::from_expression(spec.order_expr())?,
                    descending: spec.is_descending(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { specs })
    }

    /// Returns the number of sort keys.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.specs.len()
    }

    /// Compares two subjects.
    pub fn compare<S: OrderSubject + ?Sized>(&self, left: &S, right: &S) -> Ordering {
        for spec in &self.specs {
            let ordering = spec.key.extract(left).total_cmp(&spec.key.extract(right));
            let ordering = if spec.descending { ordering.reverse() } else { ordering };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }

    /// Sorts `items` in place. Equal items keep their relative order.
    pub fn sort<S: OrderSubject>(&self, items: &mut [S]) {
        items.sort_by(|a, b| self.compare(a, b));
    }
}
