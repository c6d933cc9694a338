//! A small in-memory object store that evaluates revision queries

use std::collections::HashMap;
use std::sync::Arc;

use kbsearch_exec::{PooledConnection, SearchCursor, StreamingSearch, VecCursor};
use kbsearch_foundation::{
    Error, Identified, MetaAttribute, MetaObject, ObjectKey, PrimitiveKind, Result, Value,
};
use kbsearch_query::{
    Annotations, Expression, Operator, OrderComparator, OrderSubject, RevisionQuery,
    RevisionQueryArguments, SchemaResolver, SearchQuery, SetExpression, TypeBinder,
};

// =============================================================================
// Records
// =============================================================================

#[derive(Clone, Debug)]
pub struct Record {
    key: ObjectKey,
    attributes: HashMap<&'static str, Value>,
}

impl Record {
    pub fn new(type_name: &str, id: u64, attributes: &[(&'static str, Value)]) -> Self {
        Self {
            key: ObjectKey::current(type_name, id),
            attributes: attributes.iter().cloned().collect(),
        }
    }
}

impl Identified for Record {
    fn object_key(&self) -> ObjectKey {
        self.key.clone()
    }
}

impl OrderSubject for Record {
    fn attribute_value(&self, _owner: &str, attribute: &str) -> Option<Value> {
        self.attributes.get(attribute).cloned()
    }

    fn identifier(&self) -> Option<ObjectKey> {
        Some(self.key.clone())
    }
}

pub fn schema() -> SchemaResolver {
    let string = MetaObject::primitive(PrimitiveKind::String);
    let long = MetaObject::primitive(PrimitiveKind::Int);
    SchemaResolver::new()
        .with_type(string.clone())
        .with_type(long.clone())
        .with_type(MetaObject::class("Person"))
        .with_type(MetaObject::subclass("Employee", "Person"))
        .with_attribute(MetaAttribute::new("Person", "name", string))
        .with_attribute(MetaAttribute::new("Person", "age", long))
}

pub fn people() -> Arc<Vec<Record>> {
    Arc::new(vec![
        Record::new("Person", 1, &[("name", "anna".into()), ("age", 34.into())]),
        Record::new("Person", 2, &[("name", "bob".into()), ("age", 19.into())]),
        Record::new("Employee", 3, &[("name", "carl".into()), ("age", 41.into())]),
        Record::new("Employee", 4, &[("name", "dora".into())]),
        Record::new("Person", 5, &[("name", "Anna".into()), ("age", 27.into())]),
    ])
}

// =============================================================================
// Evaluation
// =============================================================================

struct Evaluator<'q> {
    schema: &'q SchemaResolver,
    query: &'q RevisionQuery<ObjectKey>,
    args: &'q RevisionQueryArguments,
}

impl Evaluator<'_> {
    fn select(&self, set: &SetExpression, records: &[Record]) -> Result<Vec<Record>> {
        match set {
            SetExpression::None(_) => Ok(Vec::new()),
            SetExpression::AllOf(source) => Ok(records
                .iter()
                .filter(|r| r.key.object_type() == source.source_type_name())
                .cloned()
                .collect()),
            SetExpression::AnyOf(source) => {
                let mut selected = Vec::new();
                for record in records {
                    if self.schema.is_subtype(record.key.object_type(), source.source_type_name())? {
                        selected.push(record.clone());
                    }
                }
                Ok(selected)
            }
            SetExpression::Filter(filter) => {
                let mut selected = Vec::new();
                for record in self.select(filter.source(), records)? {
                    if self.value(filter.filter(), &record)?.as_bool() == Some(true) {
                        selected.push(record);
                    }
                }
                Ok(selected)
            }
            other => Err(Error::unsupported(format!("set '{other}'"))),
        }
    }

    fn value(&self, expr: &Expression, record: &Record) -> Result<Value> {
        match expr {
            Expression::Literal(literal) => Ok(literal.value().clone()),
            Expression::Parameter(param) => self
                .query
                .parameter_index(param.name())
                .and_then(|i| self.args.value(i).cloned())
                .ok_or_else(|| Error::unknown_parameter(param.name())),
            Expression::Attribute(attr) if matches!(attr.context(), Expression::ContextAccess(_)) => {
                Ok(record.attributes.get(attr.attribute_name()).cloned().unwrap_or(Value::Null))
            }
            Expression::InstanceOf(check) => Ok(Value::Bool(
                self.schema.is_subtype(record.key.object_type(), check.checked_type_name())?,
            )),
            Expression::Unary(op) => {
                let argument = self.value(op.argument(), record)?;
                match op.operator() {
                    Operator::Not => Ok(argument.as_bool().map_or(Value::Null, |b| Value::Bool(!b))),
                    Operator::IsNull => Ok(Value::Bool(argument.is_null())),
                    other => Err(Error::unsupported(format!("operator '{other}'"))),
                }
            }
            Expression::Binary(op) => {
                let left = self.value(op.left(), record)?;
                let right = self.value(op.right(), record)?;
                binary(op.operator(), &left, &right)
            }
            other => Err(Error::unsupported(format!("expression '{other}'"))),
        }
    }
}

fn binary(operator: Operator, left: &Value, right: &Value) -> Result<Value> {
    use std::cmp::Ordering::{Greater, Less};

    if let (Operator::And | Operator::Or, Some(l), Some(r)) = (operator, left.as_bool(), right.as_bool()) {
        return Ok(Value::Bool(if operator == Operator::And { l && r } else { l || r }));
    }
    if left.is_null() || right.is_null() {
        return Ok(Value::Bool(false));
    }
    let ordering = left.total_cmp(right);
    let result = match operator {
        Operator::Lt => ordering == Less,
        Operator::Le => ordering != Greater,
        Operator::Gt => ordering == Greater,
        Operator::Ge => ordering != Less,
        Operator::EqBinary => left == right,
        Operator::EqCi => match (left.as_str(), right.as_str()) {
            (Some(l), Some(r)) => l.eq_ignore_ascii_case(r),
            _ => left == right,
        },
        other => return Err(Error::unsupported(format!("operator '{other}'"))),
    };
    Ok(Value::Bool(result))
}

// =============================================================================
// Backend
// =============================================================================

/// Evaluates one bound query against the records.
pub struct QueryStore {
    records: Arc<Vec<Record>>,
    schema: SchemaResolver,
    query: RevisionQuery<ObjectKey>,
    comparator: Option<OrderComparator>,
}

impl QueryStore {
    /// Binds `query` and prepares its comparator.
    pub fn compile(records: Arc<Vec<Record>>, query: RevisionQuery<ObjectKey>) -> Result<Self> {
        let schema = schema();
        let mut annotations = Annotations::new();
        TypeBinder::new(&schema, &mut annotations).bind_revision_query(&query)?;
        let comparator = query.order().map(OrderComparator::create_comparator).transpose()?;
        Ok(Self {
            records,
            schema,
            query,
            comparator,
        })
    }

    pub fn run(&self, args: &RevisionQueryArguments) -> Result<Vec<ObjectKey>> {
        self.query.check_arguments(args)?;
        let evaluator = Evaluator {
            schema: &self.schema,
            query: &self.query,
            args,
        };
        let mut selected = evaluator.select(self.query.search(), &self.records)?;
        if let Some(comparator) = &self.comparator {
            comparator.sort(&mut selected);
        }
        let window = args.row_window(self.query.range_param());
        Ok(window.apply(selected.into_iter()).map(|r| r.key).collect())
    }
}

impl StreamingSearch<ObjectKey, usize> for QueryStore {
    fn open<'a>(
        &'a self,
        _connection: &PooledConnection<usize>,
        args: &RevisionQueryArguments,
    ) -> Result<SearchCursor<'a, ObjectKey>>
    where
        ObjectKey: 'a,
    {
        Ok(Box::new(VecCursor::new(self.run(args)?)))
    }
}
