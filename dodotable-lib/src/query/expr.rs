//! Expressions that predicates and orderings apply to

use crate::model::Value;

/// A value computed from a row.
///
/// Most filters target a plain attribute. Alias filters target an arbitrary
/// named expression, for example a concatenation of two columns or a
/// coalesced fallback.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A dotted attribute path into the row.
    Attribute(String),
    /// A constant.
    Literal(Value),
    /// String concatenation. Null if any part is null.
    Concat(Vec<Expr>),
    /// The first non-null part.
    Coalesce(Vec<Expr>),
}

impl Expr {
    /// Creates an attribute expression.
    pub fn attr(path: impl Into<String>) -> Self {
        Expr::Attribute(path.into())
    }

    /// Creates a literal expression.
    pub fn literal(value: impl Into<Value>) -> Self {
        Expr::Literal(value.into())
    }

    /// Creates a concatenation of several expressions.
    pub fn concat(parts: impl IntoIterator<Item = Expr>) -> Self {
        Expr::Concat(parts.into_iter().collect())
    }

    /// Creates a coalesce over several expressions.
    pub fn coalesce(parts: impl IntoIterator<Item = Expr>) -> Self {
        Expr::Coalesce(parts.into_iter().collect())
    }
}

impl From<&str> for Expr {
    fn from(path: &str) -> Self {
        Expr::attr(path)
    }
}

impl From<String> for Expr {
    fn from(path: String) -> Self {
        Expr::Attribute(path)
    }
}

/// A named expression.
///
/// The name is what a search request selects through its `type` parameter.
///
/// # Example
///
/// ```
/// use dodotable_lib::query::Alias;
/// use dodotable_lib::query::Expr;
///
/// let full_name = Alias::new(
///     "full_name",
///     Expr::concat([Expr::attr("first"), Expr::literal(" "), Expr::attr("last")]),
/// );
/// assert_eq!(full_name.name(), "full_name");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Alias {
    name: String,
    expr: Expr,
}

impl Alias {
    /// Creates a new alias.
    pub fn new(name: impl Into<String>, expr: impl Into<Expr>) -> Self {
        Self {
            name: name.into(),
            expr: expr.into(),
        }
    }

    /// Returns the alias name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the aliased expression.
    pub fn expr(&self) -> &Expr {
        &self.expr
    }
}
