//! In-memory data source

use std::cmp::Ordering;
use std::collections::HashMap;

use log::trace;
use rust_decimal::prelude::ToPrimitive;

use crate::error::SourceError;
use crate::model::Record;
use crate::model::Value;
use crate::query::Direction;
use crate::query::Expr;
use crate::query::OrderBy;
use crate::query::Predicate;
use crate::query::Query;

use super::DataSource;

/// Records held in memory, keyed by entity name.
///
/// Predicates follow SQL semantics: null never equals or contains anything.
/// Numbers compare by value across types and against numeric text, so a
/// choice `"1"` matches an integer `1`. Sorting is stable with nulls first.
///
/// # Example
///
/// ```
/// use dodotable_lib::model::Entity;
/// use dodotable_lib::model::Record;
/// use dodotable_lib::query::Predicate;
/// use dodotable_lib::query::Query;
/// use dodotable_lib::source::DataSource;
/// use dodotable_lib::source::MemorySource;
///
/// let source = MemorySource::new().with_records(
///     "Music",
///     [Record::new().set("year", 1957), Record::new().set("year", 1959)],
/// );
/// let query = Query::new(Entity::new("Music")).filter(Predicate::eq("year", "1959"));
/// assert_eq!(source.count(&query).unwrap(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entities: HashMap<String, Vec<Record>>,
}

impl MemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds records for an entity (builder pattern).
    pub fn with_records(
        mut self,
        entity: impl Into<String>,
        records: impl IntoIterator<Item = Record>,
    ) -> Self {
        self.insert(entity, records);
        self
    }

    /// Adds records for an entity.
    pub fn insert(&mut self, entity: impl Into<String>, records: impl IntoIterator<Item = Record>) {
        self.entities
            .entry(entity.into())
            .or_default()
            .extend(records);
    }

    /// Returns the records of an entity.
    pub fn records(&self, entity: &str) -> Option<&[Record]> {
        self.entities.get(entity).map(Vec::as_slice)
    }

    fn matching<'s>(&'s self, query: &Query) -> Result<Vec<&'s Record>, SourceError> {
        let name = query.entity.name();
        let records = self
            .entities
            .get(name)
            .ok_or_else(|| SourceError::UnknownEntity(name.to_string()))?;
        Ok(records
            .iter()
            .filter(|record| query.predicates.iter().all(|p| matches(p, record)))
            .collect())
    }
}

impl DataSource for MemorySource {
    fn count(&self, query: &Query) -> Result<usize, SourceError> {
        Ok(self.matching(query)?.len())
    }

    fn fetch(&self, query: &Query) -> Result<Vec<Record>, SourceError> {
        let mut records = self.matching(query)?;
        sort(&mut records, &query.order_by);
        let records: Vec<Record> = records
            .into_iter()
            .skip(query.offset.unwrap_or(0))
            .take(query.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();
        trace!("Fetched {} record(s) of {}", records.len(), query.entity);
        Ok(records)
    }
}

// ============================================================================
// Evaluation
// ============================================================================

fn evaluate(expr: &Expr, record: &Record) -> Value {
    match expr {
        Expr::Attribute(path) => record.lookup_or(path, &Value::Null).clone(),
        Expr::Literal(value) => value.clone(),
        Expr::Concat(parts) => {
            let mut text = String::new();
            for part in parts {
                match evaluate(part, record) {
                    Value::Null => return Value::Null,
                    value => text.push_str(&value.to_string()),
                }
            }
            Value::String(text)
        }
        Expr::Coalesce(parts) => parts
            .iter()
            .map(|part| evaluate(part, record))
            .find(|value| !value.is_null())
            .unwrap_or(Value::Null),
    }
}

fn matches(predicate: &Predicate, record: &Record) -> bool {
    match predicate {
        Predicate::Eq(expr, value) => loose_eq(&evaluate(expr, record), value),
        Predicate::In(expr, values) => {
            let actual = evaluate(expr, record);
            values.iter().any(|value| loose_eq(&actual, value))
        }
        Predicate::Contains(expr, word) => match evaluate(expr, record) {
            Value::Null => false,
            value => value
                .to_string()
                .to_lowercase()
                .contains(&word.to_lowercase()),
        },
        Predicate::IsNull(expr) => evaluate(expr, record).is_null(),
        Predicate::IsNotNull(expr) => !evaluate(expr, record).is_null(),
        Predicate::And(predicates) => predicates.iter().all(|p| matches(p, record)),
        Predicate::Or(predicates) => predicates.iter().any(|p| matches(p, record)),
        Predicate::False => false,
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Int(n) => Some(*n as f64),
        Value::Float(n) => Some(*n),
        Value::Decimal(d) => d.to_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn loose_eq(a: &Value, b: &Value) -> bool {
    if a.is_null() || b.is_null() {
        return false;
    }
    if let (Some(x), Some(y)) = (numeric(a), numeric(b)) {
        return x == y;
    }
    if a.type_name() == b.type_name() {
        a == b
    } else {
        a.to_string() == b.to_string()
    }
}

/// Sorts nulls first, then numeric values (numeric text included) by value,
/// then everything else grouped by type.
fn rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        _ if numeric(value).is_some() => 1,
        Value::String(_) => 2,
        Value::Bool(_) => 3,
        Value::Guid(_) => 4,
        Value::Date(_) => 5,
        Value::DateTime(_) => 6,
        _ => 7,
    }
}

fn compare(a: &Value, b: &Value) -> Ordering {
    rank(a).cmp(&rank(b)).then_with(|| {
        if let (Some(x), Some(y)) = (numeric(a), numeric(b)) {
            return x.total_cmp(&y);
        }
        match (a, b) {
            (Value::String(x), Value::String(y)) => x.cmp(y),
            (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
            (Value::Guid(x), Value::Guid(y)) => x.cmp(y),
            (Value::Date(x), Value::Date(y)) => x.cmp(y),
            (Value::DateTime(x), Value::DateTime(y)) => x.cmp(y),
            _ => a.to_string().cmp(&b.to_string()),
        }
    })
}

fn sort(records: &mut [&Record], order: &OrderBy) {
    if order.is_empty() {
        return;
    }
    records.sort_by(|a, b| {
        for (expr, direction) in order.fields() {
            let ordering = compare(&evaluate(expr, a), &evaluate(expr, b));
            let ordering = match direction {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}
