//! Ordering types and request-driven order resolution

use serde::Serialize;

use super::Expr;

/// Sort direction for ordering results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl Direction {
    /// Returns the suffix used in `order_by` tokens.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }

    /// Returns the `order_by` token requesting this direction on `attribute`.
    ///
    /// ```
    /// use dodotable_lib::query::Direction;
    ///
    /// assert_eq!(Direction::Asc.token("title"), "title.asc");
    /// ```
    pub fn token(&self, attribute: &str) -> String {
        format!("{}.{}", attribute, self.as_str())
    }
}

/// Derives the sort direction for one attribute from an `order_by` value.
///
/// The value is a comma-separated list of `<attribute>.asc` and
/// `<attribute>.desc` tokens. Tokens for other attributes are ignored; when
/// the same attribute appears more than once, the last token wins.
///
/// ```
/// use dodotable_lib::query::Direction;
/// use dodotable_lib::query::resolve_order;
///
/// assert_eq!(resolve_order("name", Some("name.asc,other.desc")), Some(Direction::Asc));
/// assert_eq!(resolve_order("name", Some("")), None);
/// assert_eq!(resolve_order("name", None), None);
/// ```
pub fn resolve_order(attribute: &str, order_by: Option<&str>) -> Option<Direction> {
    let order_by = order_by.filter(|value| !value.is_empty())?;
    let asc = Direction::Asc.token(attribute);
    let desc = Direction::Desc.token(attribute);
    let mut direction = None;
    for token in order_by.split(',').map(str::trim) {
        if token == asc {
            direction = Some(Direction::Asc);
        } else if token == desc {
            direction = Some(Direction::Desc);
        }
    }
    direction
}

/// Specifies the ordering of query results.
///
/// Multiple expressions can be chained for secondary, tertiary, etc. sorting.
///
/// # Example
///
/// ```
/// use dodotable_lib::query::OrderBy;
///
/// let order = OrderBy::desc("year").then_asc("title");
/// assert_eq!(order.fields().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderBy {
    fields: Vec<(Expr, Direction)>,
}

impl OrderBy {
    /// Creates an empty ordering.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an ascending order on an expression.
    pub fn asc(expr: impl Into<Expr>) -> Self {
        Self {
            fields: vec![(expr.into(), Direction::Asc)],
        }
    }

    /// Creates a descending order on an expression.
    pub fn desc(expr: impl Into<Expr>) -> Self {
        Self {
            fields: vec![(expr.into(), Direction::Desc)],
        }
    }

    /// Adds a secondary ascending order.
    pub fn then_asc(self, expr: impl Into<Expr>) -> Self {
        self.then(expr, Direction::Asc)
    }

    /// Adds a secondary descending order.
    pub fn then_desc(self, expr: impl Into<Expr>) -> Self {
        self.then(expr, Direction::Desc)
    }

    /// Adds a secondary order in the given direction.
    pub fn then(mut self, expr: impl Into<Expr>, direction: Direction) -> Self {
        self.fields.push((expr.into(), direction));
        self
    }

    /// Returns the ordered expressions with their directions.
    pub fn fields(&self) -> &[(Expr, Direction)] {
        &self.fields
    }

    /// Returns `true` if no ordering is applied.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_single_token() {
        assert_eq!(resolve_order("name", Some("name.asc")), Some(Direction::Asc));
        assert_eq!(resolve_order("name", Some("name.desc")), Some(Direction::Desc));
    }

    #[test]
    fn test_resolve_ignores_other_attributes() {
        assert_eq!(
            resolve_order("name", Some("name.asc,other.desc")),
            Some(Direction::Asc)
        );
        assert_eq!(resolve_order("other", Some("name.asc")), None);
        assert_eq!(resolve_order("name", Some("username.asc")), None);
    }

    #[test]
    fn test_resolve_later_token_wins() {
        assert_eq!(
            resolve_order("name", Some("name.asc, name.desc")),
            Some(Direction::Desc)
        );
    }

    #[test]
    fn test_resolve_absent_or_empty() {
        assert_eq!(resolve_order("name", Some("")), None);
        assert_eq!(resolve_order("name", None), None);
        assert_eq!(resolve_order("name", Some("name")), None);
    }

    #[test]
    fn test_dotted_attribute() {
        assert_eq!(
            resolve_order("artist.name", Some("artist.name.desc")),
            Some(Direction::Desc)
        );
    }
}
