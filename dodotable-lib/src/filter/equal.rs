//! Typed equality search filters

use chrono::NaiveDate;
use log::trace;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use super::SearchParams;
use crate::error::CoercionError;
use crate::model::Entity;
use crate::model::RequestParams;
use crate::model::Value;
use crate::query::Alias;
use crate::query::Expr;
use crate::query::Predicate;

/// The type a search word is read as before comparing for equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// 64-bit integer.
    Int,
    /// 64-bit float.
    Float,
    /// Arbitrary precision decimal.
    Decimal,
    /// `true`/`false`, `1`/`0`, `yes`/`no`.
    Bool,
    /// Hyphenated or simple UUID.
    Uuid,
    /// `YYYY-MM-DD`.
    Date,
    /// The word as-is.
    Text,
}

impl ValueType {
    /// Returns the type name.
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Decimal => "decimal",
            ValueType::Bool => "bool",
            ValueType::Uuid => "uuid",
            ValueType::Date => "date",
            ValueType::Text => "text",
        }
    }

    /// Reads `word` as a value of this type.
    ///
    /// ```
    /// use dodotable_lib::filter::ValueType;
    /// use dodotable_lib::model::Value;
    ///
    /// assert_eq!(ValueType::Int.coerce(" 42 "), Ok(Value::Int(42)));
    /// assert!(ValueType::Int.coerce("abc").is_err());
    /// ```
    pub fn coerce(&self, word: &str) -> Result<Value, CoercionError> {
        let fail = || CoercionError::new(word, self.name());
        let trimmed = word.trim();
        match self {
            ValueType::Int => trimmed.parse::<i64>().map(Value::Int).map_err(|_| fail()),
            ValueType::Float => trimmed.parse::<f64>().map(Value::Float).map_err(|_| fail()),
            ValueType::Decimal => trimmed
                .parse::<Decimal>()
                .map(Value::Decimal)
                .map_err(|_| fail()),
            ValueType::Bool => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(Value::Bool(true)),
                "false" | "0" | "no" => Ok(Value::Bool(false)),
                _ => Err(fail()),
            },
            ValueType::Uuid => Uuid::parse_str(trimmed).map(Value::Guid).map_err(|_| fail()),
            ValueType::Date => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .map(Value::Date)
                .map_err(|_| fail()),
            ValueType::Text => Ok(Value::String(word.to_string())),
        }
    }
}

/// Builds the equality predicate, or an always-false one if `word` is unreadable.
fn typed_equality(target: Expr, value_type: ValueType, word: Option<&str>) -> Predicate {
    let coerced = word
        .ok_or_else(|| CoercionError::new("", value_type.name()))
        .and_then(|w| value_type.coerce(w));
    match coerced {
        Ok(value) => Predicate::Eq(target, value),
        Err(e) => {
            trace!("Equality search excludes all rows: {}", e);
            Predicate::False
        }
    }
}

/// Exact match on one attribute, with the search word read as a typed value.
///
/// Uses the same activation rule as [`SubstringFilter`](super::SubstringFilter).
/// A word that cannot be read as the declared type matches no rows rather
/// than failing the query.
///
/// # Example
///
/// ```
/// use dodotable_lib::filter::EqualityFilter;
/// use dodotable_lib::filter::ValueType;
/// use dodotable_lib::model::Entity;
/// use dodotable_lib::model::RequestParams;
/// use dodotable_lib::query::Predicate;
///
/// let params = RequestParams::parse("search_music.word=abc&search_music.type=year");
/// let filter = EqualityFilter::new(&Entity::new("Music"), "year", ValueType::Int, &params);
/// assert_eq!(filter.evaluate(), Some(Predicate::False));
/// ```
#[derive(Debug, Clone)]
pub struct EqualityFilter<'a> {
    attribute: String,
    value_type: ValueType,
    search: SearchParams,
    params: &'a RequestParams,
}

impl<'a> EqualityFilter<'a> {
    /// Creates an equality filter on an attribute of `entity`.
    pub fn new(
        entity: &Entity,
        attribute: impl Into<String>,
        value_type: ValueType,
        params: &'a RequestParams,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            value_type,
            search: SearchParams::for_entity(entity),
            params,
        }
    }

    /// Returns the searched attribute.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Returns the declared value type.
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Returns the request parameter names this filter reads.
    pub fn search_params(&self) -> &SearchParams {
        &self.search
    }

    /// Returns an equality predicate when the request targets this attribute.
    pub fn evaluate(&self) -> Option<Predicate> {
        if self.search.search_type(self.params) != Some(self.attribute.as_str()) {
            return None;
        }
        Some(typed_equality(
            self.attribute.as_str().into(),
            self.value_type,
            self.search.word(self.params),
        ))
    }
}

/// Exact match on a named expression, with the word read as a typed value.
///
/// Active only when the word is non-empty and the search type equals the
/// alias name.
#[derive(Debug, Clone)]
pub struct EqualityAlias<'a> {
    alias: Alias,
    value_type: ValueType,
    search: SearchParams,
    params: &'a RequestParams,
}

impl<'a> EqualityAlias<'a> {
    /// Creates an equality filter on an alias, reading `search_<identifier>.*`.
    pub fn new(identifier: &str, alias: Alias, value_type: ValueType, params: &'a RequestParams) -> Self {
        Self {
            alias,
            value_type,
            search: SearchParams::new(identifier),
            params,
        }
    }

    /// Returns the searched alias.
    pub fn alias(&self) -> &Alias {
        &self.alias
    }

    /// Returns the declared value type.
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Returns the request parameter names this filter reads.
    pub fn search_params(&self) -> &SearchParams {
        &self.search
    }

    /// Returns an equality predicate when the request targets this alias.
    pub fn evaluate(&self) -> Option<Predicate> {
        let word = self.search.word(self.params).filter(|w| !w.is_empty())?;
        if self.search.search_type(self.params) != Some(self.alias.name()) {
            return None;
        }
        Some(typed_equality(
            self.alias.expr().clone(),
            self.value_type,
            Some(word),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn music() -> Entity {
        Entity::new("Music")
    }

    #[test]
    fn test_int_match() {
        let params = RequestParams::parse("search_music.word=1957&search_music.type=year");
        let filter = EqualityFilter::new(&music(), "year", ValueType::Int, &params);
        assert_eq!(filter.attribute(), "year");
        assert_eq!(filter.evaluate(), Some(Predicate::eq("year", 1957i64)));
    }

    #[test]
    fn test_unparsable_word_is_always_false() {
        let params = RequestParams::parse("search_music.word=abc&search_music.type=year");
        let filter = EqualityFilter::new(&music(), "year", ValueType::Int, &params);
        assert_eq!(filter.evaluate(), Some(Predicate::False));
    }

    #[test]
    fn test_missing_word_is_always_false() {
        let params = RequestParams::parse("search_music.type=year");
        let filter = EqualityFilter::new(&music(), "year", ValueType::Int, &params);
        assert_eq!(filter.evaluate(), Some(Predicate::False));
    }

    #[test]
    fn test_inactive_for_other_type() {
        let params = RequestParams::parse("search_music.word=1957&search_music.type=title");
        let filter = EqualityFilter::new(&music(), "year", ValueType::Int, &params);
        assert_eq!(filter.evaluate(), None);
    }

    #[test]
    fn test_coerce_types() {
        assert_eq!(ValueType::Float.coerce("1.5"), Ok(Value::Float(1.5)));
        assert_eq!(
            ValueType::Decimal.coerce("10.25"),
            Ok(Value::Decimal(Decimal::new(1025, 2)))
        );
        assert_eq!(ValueType::Bool.coerce("Yes"), Ok(Value::Bool(true)));
        assert_eq!(ValueType::Bool.coerce("0"), Ok(Value::Bool(false)));
        assert!(ValueType::Bool.coerce("maybe").is_err());
        assert_eq!(
            ValueType::Date.coerce("2024-02-29"),
            Ok(Value::Date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()))
        );
        assert!(ValueType::Date.coerce("2023-02-29").is_err());
        assert!(ValueType::Uuid.coerce("not-a-uuid").is_err());
        assert_eq!(ValueType::Text.coerce(" a "), Ok(Value::from(" a ")));
    }

    #[test]
    fn test_alias() {
        let alias = Alias::new("label_id", Expr::attr("label.id"));
        let params = RequestParams::parse("search_music.word=7&search_music.type=label_id");
        let filter = EqualityAlias::new("music", alias.clone(), ValueType::Int, &params);
        assert_eq!(filter.alias().name(), "label_id");
        assert_eq!(
            filter.evaluate(),
            Some(Predicate::Eq(Expr::attr("label.id"), Value::Int(7)))
        );

        let params = RequestParams::parse("search_music.word=x&search_music.type=label_id");
        let filter = EqualityAlias::new("music", alias.clone(), ValueType::Int, &params);
        assert_eq!(filter.evaluate(), Some(Predicate::False));

        let params = RequestParams::parse("search_music.type=label_id");
        let filter = EqualityAlias::new("music", alias, ValueType::Int, &params);
        assert_eq!(filter.evaluate(), None);
    }
}
