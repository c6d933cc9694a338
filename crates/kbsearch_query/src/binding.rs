//! Type binding pass.
//!
//! Binding resolves every type name of a query tree through a
//! [`TypeResolver`] and records the result in an [`Annotations`] table:
//! declared types of type-dependent nodes, and the attributes behind
//! attribute and reference accesses. Parameters take the type of their
//! declaration. Binding an already bound node is a no-op, so running the
//! pass twice over the same tree and table is harmless.

use std::collections::HashMap;
use std::sync::Arc;

use kbsearch_foundation::{Error, MetaAttribute, MetaObject, Result};
use tracing::trace;

use crate::expr::Expression;
use crate::node::{Annotations, TypeSystemDependent};
use crate::query::{ParameterDeclaration, RevisionQuery, SearchQuery};
use crate::set::SetExpression;
use crate::visitor::{PartVisitor, QueryPart, walk_expression, walk_order, walk_query, walk_set};

/// Resolves type and attribute names of the store's type system.
pub trait TypeResolver {
    /// Resolves a type name.
    ///
    /// # Errors
    ///
    /// Returns a type-not-found error for unknown names.
    fn resolve_type(&self, type_name: &str) -> Result<MetaObject>;

    /// Resolves an attribute of an owner type.
    ///
    /// # Errors
    ///
    /// Returns an attribute-not-found error if the owner has no such
    /// attribute.
    fn resolve_attribute(&self, owner_type_name: &str, attribute_name: &str) -> Result<MetaAttribute>;
}

/// Binds the types of a query tree into an annotation table.
pub struct TypeBinder<'a, R: TypeResolver + ?Sized> {
    resolver: &'a R,
    annotations: &'a mut Annotations,
    declarations: HashMap<Arc<str>, MetaObject>,
    bound: usize,
}

impl<'a, R: TypeResolver + ?Sized> TypeBinder<'a, R> {
    /// Creates a binder writing into `annotations`.
    pub fn new(resolver: &'a R, annotations: &'a mut Annotations) -> Self {
        Self {
            resolver,
            annotations,
            declarations: HashMap::new(),
            bound: 0,
        }
    }

    /// Returns the number of bindings added so far.
    #[must_use]
    pub const fn bound_count(&self) -> usize {
        self.bound
    }

    /// Binds parameter declarations, making their names available to
    /// parameters bound afterwards.
    ///
    /// # Errors
    ///
    /// Propagates resolver failures.
    pub fn bind_declarations(&mut self, declarations: &[ParameterDeclaration]) -> Result<()> {
        for decl in declarations {
            let meta = self.bind_dependent(decl)?;
            self.declarations.insert(decl.name().into(), meta);
        }
        Ok(())
    }

    /// Binds the declarations and search expression of a query.
    ///
    /// Only the query's own declarations are in scope; declarations from
    /// earlier calls are forgotten.
    ///
    /// # Errors
    ///
    /// Propagates resolver failures; returns an unknown parameter error for
    /// parameters without a declaration.
    pub fn bind_query<Q: SearchQuery + ?Sized>(&mut self, query: &Q) -> Result<()> {
        self.declarations.clear();
        self.bind_declarations(query.parameters())?;
        walk_query(self, query)
    }

    /// Binds a revision query including its order.
    ///
    /// # Errors
    ///
    /// See [`TypeBinder::bind_query`].
    pub fn bind_revision_query<E>(&mut self, query: &RevisionQuery<E>) -> Result<()> {
        self.bind_query(query)?;
        match query.order() {
            Some(order) => walk_order(self, order),
            None => Ok(()),
        }
    }

    /// Binds a set expression.
    ///
    /// # Errors
    ///
    /// See [`TypeBinder::bind_query`].
    pub fn bind_set(&mut self, set: &SetExpression) -> Result<()> {
        walk_set(self, set)
    }

    /// Binds an expression.
    ///
    /// # Errors
    ///
    /// See [`TypeBinder::bind_query`].
    pub fn bind_expression(&mut self, expr: &Expression) -> Result<()> {
        walk_expression(self, expr)
    }

    fn bind_dependent(&mut self, node: &impl TypeSystemDependent) -> Result<MetaObject> {
        if self.annotations.has_type_binding(node) {
            return self.annotations.declared_type(node).cloned();
        }
        let name = node
            .type_name()
            .ok_or_else(|| Error::internal("type-dependent node without type name"))?;
        let meta = self.resolver.resolve_type(name)?;
        trace!(node = node.node_id().value(), type_name = name, "bound type");
        self.annotations.set_declared_type(node, meta.clone());
        self.bound += 1;
        Ok(meta)
    }

    fn bind_parameter(&mut self, node: &impl TypeSystemDependent, name: &str) -> Result<()> {
        if self.annotations.has_type_binding(node) {
            return Ok(());
        }
        let meta = self
            .declarations
            .get(name)
            .cloned()
            .ok_or_else(|| Error::unknown_parameter(name))?;
        trace!(node = node.node_id().value(), parameter = name, "bound parameter");
        self.annotations.set_polymorphic_type(node.node_id(), meta.clone());
        self.annotations.set_declared_type(node, meta);
        self.bound += 1;
        Ok(())
    }

    fn bind_attribute(&mut self, node: &Expression, owner: &str, name: &str) -> Result<()> {
        let id = node.id();
        if self.annotations.has_resolved_attribute(id) {
            return Ok(());
        }
        let attribute = self.resolver.resolve_attribute(owner, name)?;
        trace!(node = id.value(), %attribute, "resolved attribute");
        self.annotations
            .set_polymorphic_type(id, attribute.value_type().clone());
        self.annotations.set_resolved_attribute(id, attribute);
        self.bound += 1;
        Ok(())
    }
}

impl<R: TypeResolver + ?Sized> PartVisitor for TypeBinder<'_, R> {
    fn enter_part(&mut self, part: QueryPart<'_>) -> Result<()> {
        match part {
            QueryPart::Expression(expr) => match expr {
                Expression::Parameter(p) => self.bind_parameter(p, p.name()),
                Expression::Attribute(a) => {
                    self.bind_attribute(expr, a.owner_type_name(), a.attribute_name())
                }
                Expression::Reference(r) => {
                    self.bind_attribute(expr, r.owner_type_name(), r.attribute_name())
                }
                Expression::Flex(flex) => self.bind_dependent(flex).map(drop),
                Expression::HasType(check) | Expression::InstanceOf(check) => {
                    self.bind_dependent(check).map(drop)
                }
                _ => Ok(()),
            },
            QueryPart::Set(set) => match set {
                SetExpression::SetParameter(p) => self.bind_parameter(p, p.name()),
                SetExpression::AllOf(source) | SetExpression::AnyOf(source) => {
                    let meta = self.bind_dependent(source)?;
                    self.annotations.set_polymorphic_type(source.node_id(), meta);
                    Ok(())
                }
                _ => Ok(()),
            },
            QueryPart::Declaration(decl) => self.bind_dependent(decl).map(drop),
            QueryPart::Function(_) | QueryPart::Order(_) | QueryPart::OrderSpec(_) => Ok(()),
        }
    }
}

// =============================================================================
// In-memory schema
// =============================================================================

/// A [`TypeResolver`] over an explicitly registered schema.
#[derive(Clone, Debug, Default)]
pub struct SchemaResolver {
    types: im::HashMap<Arc<str>, MetaObject>,
    attributes: im::HashMap<(Arc<str>, Arc<str>), MetaAttribute>,
}

impl SchemaResolver {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type.
    #[must_use]
    pub fn with_type(mut self, meta: MetaObject) -> Self {
        self.types.insert(meta.name().into(), meta);
        self
    }

    /// Registers an attribute of an already registered owner type.
    #[must_use]
    pub fn with_attribute(mut self, attribute: MetaAttribute) -> Self {
        let key = (Arc::from(attribute.owner()), Arc::from(attribute.name()));
        self.attributes.insert(key, attribute);
        self
    }

    /// Returns true if `type_name` is `ancestor` or one of its subtypes.
    ///
    /// # Errors
    ///
    /// Returns an illegal state error if the super types of `type_name`
    /// form a cycle.
    pub fn is_subtype(&self, type_name: &str, ancestor: &str) -> Result<bool> {
        let found = self.find_in_lineage(type_name, |name| (name == ancestor).then_some(()))?;
        Ok(found.is_some())
    }

    /// Walks `type_name` and its super types, returning the first result
    /// `check` yields.
    ///
    /// An acyclic lineage names every registered type at most once, plus one
    /// unregistered root, so a longer walk has met a cycle.
    fn find_in_lineage<T>(&self, type_name: &str, mut check: impl FnMut(&str) -> Option<T>) -> Result<Option<T>> {
        let mut remaining = self.types.len() + 1;
        let mut current = Some(type_name);
        while let Some(name) = current {
            if remaining == 0 {
                return Err(Error::illegal_state(format!("cyclic super types above '{type_name}'")));
            }
            remaining -= 1;
            if let Some(found) = check(name) {
                return Ok(Some(found));
            }
            current = self.types.get(name).and_then(MetaObject::super_type);
        }
        Ok(None)
    }
}

impl TypeResolver for SchemaResolver {
    fn resolve_type(&self, type_name: &str) -> Result<MetaObject> {
        self.types
            .get(type_name)
            .cloned()
            .ok_or_else(|| Error::type_not_found(type_name))
    }

    fn resolve_attribute(&self, owner_type_name: &str, attribute_name: &str) -> Result<MetaAttribute> {
        // Attributes are inherited from super types.
        self.find_in_lineage(owner_type_name, |name| {
            let key = (Arc::from(name), Arc::from(attribute_name));
            self.attributes.get(&key).cloned()
        })?
        .ok_or_else(|| Error::attribute_not_found(owner_type_name, attribute_name))
    }
}
