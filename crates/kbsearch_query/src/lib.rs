//! Query algebra for a versioned, branched object store.
//!
//! Queries are immutable trees built through the [`factory`]. A revision
//! query selects objects (or their identifiers) from one revision of one or
//! all branches; a history query selects object versions across revisions.
//!
//! # Architecture
//!
//! ```text
//! factory::*  ──▶  SetExpression / Expression / Function / Order
//!                          │
//!                          ▼
//!               RevisionQuery<E> / HistoryQuery
//!                          │
//!                          ▼
//! TypeBinder   ──▶  Annotations (declared types, resolved attributes)
//!                          │
//!                          ▼
//!               backend compiler (kbsearch_exec::CompiledQuery)
//! ```
//!
//! # Modules
//!
//! - [`node`] - Node identity and per-pass annotation tables
//! - [`operator`] - Unary and binary operators
//! - [`expr`] - Scalar expressions
//! - [`set`] - Set expressions
//! - [`function`] - Aggregate functions
//! - [`order`] - Result orders
//! - [`visitor`] - Exhaustive visitors and generic tree walks
//! - [`factory`] - Construction API with simplification
//! - [`internal`] - Construction helpers for backends
//! - [`copy`] - Deep copies with fresh node identities
//! - [`pretty`] - `Display` implementations
//! - [`binding`] - Type binding pass
//! - [`query`] - Revision and history queries
//! - [`arguments`] - Actual arguments and row/revision windows
//! - [`comparator`] - In-memory ordering of results

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arguments;
pub mod binding;
pub mod comparator;
pub mod copy;
pub mod expr;
pub mod factory;
pub mod function;
pub mod internal;
pub mod node;
pub mod operator;
pub mod order;
pub mod pretty;
pub mod query;
pub mod set;
pub mod visitor;

// Re-export main types for convenience
pub use arguments::{
    BranchSelection, HistoryQueryArguments, QueryArguments, RevisionQueryArguments, RowWindow,
};
pub use binding::{SchemaResolver, TypeBinder, TypeResolver};
pub use comparator::{OrderComparator, OrderSubject};
pub use copy::DeepClone;
pub use expr::{
    Attribute, BinaryOperation, Eval, Expression, ExpressionTuple, ExpressionVisitor, Flex,
    GetEntry, InSet, IsCurrent, Literal, Matches, Parameter, Reference, ReferencePart, TypeCheck,
    UnaryOperation,
};
pub use function::{Aggregate, Function, FunctionVisitor};
pub use node::{Annotations, NodeId, Symbol, TypeSystemDependent};
pub use operator::{Operator, OperatorVisitor};
pub use order::{Order, OrderSpec, OrderTuple, OrderVisitor};
pub use query::{
    BranchParam, HistoryQuery, LoadStrategy, ParameterDeclaration, QueryCore, RangeParam,
    RevisionParam, RevisionQuery, SearchQuery,
};
pub use set::{
    CrossProduct, Filter, MapTo, Partition, SetExpression, SetExpressionVisitor, SetLiteral,
    SetOperation, SetParameter, TypeSource,
};
pub use visitor::{PartVisitor, QueryPart, QueryVisitor};
