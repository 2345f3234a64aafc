//! SQL generation for SQLite.
//!
//! Values are never inlined: every literal becomes a `?` placeholder and is
//! appended to the parameter list in placeholder order.

use rusqlite::Connection;
use rusqlite::functions::Context;
use rusqlite::functions::FunctionFlags;
use rusqlite::types::Value as SqlValue;
use rusqlite::types::ValueRef;

use crate::error::SourceError;
use crate::model::EntityBase;
use crate::model::Value;
use crate::query::Direction;
use crate::query::Expr;
use crate::query::OrderBy;
use crate::query::Predicate;
use crate::query::Query;

/// Name of the scalar function lowercasing text for substring matches.
///
/// SQLite's own `lower()` only folds ASCII letters.
const LOWER: &str = "unicode_lower";

/// Registers the scalar functions generated statements rely on.
pub fn register_functions(conn: &Connection) -> Result<(), SourceError> {
    conn.create_scalar_function(
        LOWER,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        unicode_lower,
    )?;
    Ok(())
}

fn unicode_lower(ctx: &Context<'_>) -> rusqlite::Result<Option<String>> {
    let text = match ctx.get_raw(0) {
        ValueRef::Null => return Ok(None),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => String::from_utf8_lossy(bytes).into_owned(),
    };
    Ok(Some(text.to_lowercase()))
}

/// A SQL statement with its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

/// Builds the statement fetching a query's rows.
pub fn select_statement(query: &Query) -> Result<Statement, SourceError> {
    let mut params = Vec::new();
    let mut sql = format!("SELECT * FROM {}", from_to_sql(query.entity.base()));
    sql.push_str(&where_to_sql(query, &mut params)?);
    if !query.order_by.is_empty() {
        sql.push_str(" ORDER BY ");
        sql.push_str(&order_to_sql(&query.order_by, &mut params)?);
    }
    match (query.limit, query.offset) {
        (None, None) => {}
        (limit, offset) => {
            sql.push_str(" LIMIT ? OFFSET ?");
            params.push(SqlValue::Integer(limit.map_or(-1, to_i64)));
            params.push(SqlValue::Integer(offset.map_or(0, to_i64)));
        }
    }
    Ok(Statement { sql, params })
}

/// Builds the statement counting a query's rows. Ordering and slicing are ignored.
pub fn count_statement(query: &Query) -> Result<Statement, SourceError> {
    let mut params = Vec::new();
    let mut sql = format!("SELECT COUNT(*) FROM {}", from_to_sql(query.entity.base()));
    sql.push_str(&where_to_sql(query, &mut params)?);
    Ok(Statement { sql, params })
}

fn to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn from_to_sql(base: &EntityBase) -> String {
    match base {
        EntityBase::Table(table) => quote_ident(table),
        EntityBase::Subquery(sql) => format!("({}) AS base", sql),
    }
}

fn where_to_sql(query: &Query, params: &mut Vec<SqlValue>) -> Result<String, SourceError> {
    match query.combined_predicate() {
        Some(predicate) => Ok(format!(" WHERE {}", predicate_to_sql(&predicate, params)?)),
        None => Ok(String::new()),
    }
}

/// Converts a `Predicate` to a SQL condition.
pub fn predicate_to_sql(
    predicate: &Predicate,
    params: &mut Vec<SqlValue>,
) -> Result<String, SourceError> {
    let sql = match predicate {
        Predicate::Eq(expr, value) => {
            let expr = expr_to_sql(expr, params)?;
            params.push(value_to_sql(value, "equality")?);
            format!("{} = ?", expr)
        }
        Predicate::In(_, values) if values.is_empty() => "0 = 1".to_string(),
        Predicate::In(expr, values) => {
            let expr = expr_to_sql(expr, params)?;
            for value in values {
                params.push(value_to_sql(value, "membership")?);
            }
            let placeholders = vec!["?"; values.len()].join(", ");
            format!("{} IN ({})", expr, placeholders)
        }
        Predicate::Contains(expr, word) => {
            let expr = expr_to_sql(expr, params)?;
            params.push(SqlValue::Text(format!("%{}%", escape_like(word))));
            format!("{LOWER}({expr}) LIKE {LOWER}(?) ESCAPE '\\'")
        }
        Predicate::IsNull(expr) => format!("{} IS NULL", expr_to_sql(expr, params)?),
        Predicate::IsNotNull(expr) => format!("{} IS NOT NULL", expr_to_sql(expr, params)?),
        Predicate::And(predicates) if predicates.is_empty() => "1 = 1".to_string(),
        Predicate::And(predicates) => join(predicates, " AND ", params)?,
        Predicate::Or(predicates) if predicates.is_empty() => "0 = 1".to_string(),
        Predicate::Or(predicates) => join(predicates, " OR ", params)?,
        Predicate::False => "0 = 1".to_string(),
    };
    Ok(sql)
}

fn join(
    predicates: &[Predicate],
    separator: &str,
    params: &mut Vec<SqlValue>,
) -> Result<String, SourceError> {
    let parts = predicates
        .iter()
        .map(|p| predicate_to_sql(p, params))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!("({})", parts.join(separator)))
}

/// Converts an `Expr` to a SQL expression.
pub fn expr_to_sql(expr: &Expr, params: &mut Vec<SqlValue>) -> Result<String, SourceError> {
    let sql = match expr {
        Expr::Attribute(path) => quote_ident(path),
        Expr::Literal(value) => {
            params.push(value_to_sql(value, "literal")?);
            "?".to_string()
        }
        Expr::Concat(parts) => format!("({})", exprs_to_sql(parts, params)?.join(" || ")),
        Expr::Coalesce(parts) => format!("COALESCE({})", exprs_to_sql(parts, params)?.join(", ")),
    };
    Ok(sql)
}

fn exprs_to_sql(parts: &[Expr], params: &mut Vec<SqlValue>) -> Result<Vec<String>, SourceError> {
    parts.iter().map(|part| expr_to_sql(part, params)).collect()
}

/// Converts an `OrderBy` to the body of an `ORDER BY` clause.
pub fn order_to_sql(order: &OrderBy, params: &mut Vec<SqlValue>) -> Result<String, SourceError> {
    let parts = order
        .fields()
        .iter()
        .map(|(expr, direction)| {
            let direction = match direction {
                Direction::Asc => "ASC",
                Direction::Desc => "DESC",
            };
            Ok(format!("{} {}", expr_to_sql(expr, params)?, direction))
        })
        .collect::<Result<Vec<_>, SourceError>>()?;
    Ok(parts.join(", "))
}

/// Converts a `Value` to a bound SQLite parameter.
///
/// Types without a native SQLite representation are bound as text.
pub fn value_to_sql(value: &Value, context: &str) -> Result<SqlValue, SourceError> {
    let value = match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Int(n) => SqlValue::Integer(*n),
        Value::Float(n) => SqlValue::Real(*n),
        Value::String(s) => SqlValue::Text(s.clone()),
        Value::Decimal(_) | Value::Guid(_) | Value::Date(_) | Value::DateTime(_) => {
            SqlValue::Text(value.to_string())
        }
        Value::Record(_) => return Err(SourceError::unsupported(value.type_name(), context)),
    };
    Ok(value)
}

/// Converts a SQLite column value back into a `Value`.
pub fn value_from_sql(value: SqlValue, column: &str) -> Result<Value, SourceError> {
    match value {
        SqlValue::Null => Ok(Value::Null),
        SqlValue::Integer(n) => Ok(Value::Int(n)),
        SqlValue::Real(n) => Ok(Value::Float(n)),
        SqlValue::Text(s) => Ok(Value::String(s)),
        SqlValue::Blob(_) => Err(SourceError::unsupported("blob", format!("column {}", column))),
    }
}

/// Quotes an identifier. Dotted paths stay one identifier.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Escapes `LIKE` wildcards with a backslash.
pub fn escape_like(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
