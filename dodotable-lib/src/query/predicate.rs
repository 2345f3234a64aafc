//! Predicates combined into a query filter

use super::Expr;
use crate::model::Value;

/// A boolean condition over a row, evaluated by the data source.
///
/// Filters produce predicates; the table AND-s them together into a
/// [`Query`](super::Query).
///
/// # Example
///
/// ```
/// use dodotable_lib::query::Predicate;
///
/// let predicate = Predicate::and([
///     Predicate::eq("genre", "jazz"),
///     Predicate::contains("title", "blue"),
/// ]);
///
/// let either = Predicate::or([
///     Predicate::contains("title", "blue"),
///     Predicate::contains("artist.name", "blue"),
/// ]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Equality: `expr = value`
    Eq(Expr, Value),
    /// Membership: `expr IN (values)`
    In(Expr, Vec<Value>),
    /// Case-insensitive substring match.
    Contains(Expr, String),
    /// `expr IS NULL`
    IsNull(Expr),
    /// `expr IS NOT NULL`
    IsNotNull(Expr),
    /// Logical AND of multiple predicates. Empty means true.
    And(Vec<Predicate>),
    /// Logical OR of multiple predicates. Empty means false.
    Or(Vec<Predicate>),
    /// Matches no row.
    False,
}

impl Predicate {
    /// Creates an equality predicate.
    pub fn eq(expr: impl Into<Expr>, value: impl Into<Value>) -> Self {
        Predicate::Eq(expr.into(), value.into())
    }

    /// Creates a membership predicate.
    pub fn is_in<V: Into<Value>>(expr: impl Into<Expr>, values: impl IntoIterator<Item = V>) -> Self {
        Predicate::In(expr.into(), values.into_iter().map(Into::into).collect())
    }

    /// Creates a case-insensitive contains predicate.
    pub fn contains(expr: impl Into<Expr>, word: impl Into<String>) -> Self {
        Predicate::Contains(expr.into(), word.into())
    }

    /// Creates an is-null predicate.
    pub fn is_null(expr: impl Into<Expr>) -> Self {
        Predicate::IsNull(expr.into())
    }

    /// Creates an is-not-null predicate.
    pub fn is_not_null(expr: impl Into<Expr>) -> Self {
        Predicate::IsNotNull(expr.into())
    }

    /// Creates a logical AND of multiple predicates.
    pub fn and(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        Predicate::And(predicates.into_iter().collect())
    }

    /// Creates a logical OR of multiple predicates.
    pub fn or(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        Predicate::Or(predicates.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_in_converts_values() {
        assert_eq!(
            Predicate::is_in("genre", ["all", "jazz"]),
            Predicate::In(
                Expr::attr("genre"),
                vec![Value::from("all"), Value::from("jazz")]
            )
        );
    }
}
