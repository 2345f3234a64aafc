//! Choice filter: restrict a column to one of a declared set of values

use log::trace;
use log::warn;
use serde::Deserialize;
use serde::Serialize;

use crate::error::InvalidChoice;
use crate::model::RequestParams;
use crate::query::Predicate;

/// Sentinel choice that disables the filter.
pub const ALL: &str = "all";

/// Sentinel choice selecting rows where the attribute is null.
pub const NULL: &str = "null";

/// Sentinel choice selecting rows where the attribute is not null.
pub const NOT_NULL: &str = "not-null";

/// One selectable option of a [`ChoiceFilter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// The value sent in the request and compared against the attribute.
    pub name: String,
    /// Human-readable label.
    pub description: String,
}

impl Choice {
    /// Creates a new choice.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// The implicit choice that turns the filter off.
    pub fn all() -> Self {
        Self::new(ALL, "All")
    }
}

/// Restricts an attribute to one value chosen through `select.<attribute>`.
///
/// - parameter absent or empty: rows must hold one of the declared values
/// - `all`: no restriction
/// - a declared value: rows must hold exactly that value
/// - anything else: [`InvalidChoice`]
///
/// A null-selectable filter additionally accepts `null` and `not-null`.
///
/// # Example
///
/// ```
/// use dodotable_lib::filter::Choice;
/// use dodotable_lib::filter::ChoiceFilter;
/// use dodotable_lib::model::RequestParams;
/// use dodotable_lib::query::Predicate;
///
/// let params = RequestParams::parse("select.genre=jazz");
/// let filter = ChoiceFilter::new("genre", [Choice::new("jazz", "Jazz")], &params);
/// assert_eq!(filter.evaluate(), Ok(Some(Predicate::eq("genre", "jazz"))));
/// ```
#[derive(Debug, Clone)]
pub struct ChoiceFilter<'a> {
    attribute: String,
    choices: Vec<Choice>,
    default: Option<String>,
    null_selectable: bool,
    params: &'a RequestParams,
}

impl<'a> ChoiceFilter<'a> {
    /// Creates a choice filter. The `all` choice is prepended implicitly.
    pub fn new(
        attribute: impl Into<String>,
        choices: impl IntoIterator<Item = Choice>,
        params: &'a RequestParams,
    ) -> Self {
        let choices = std::iter::once(Choice::all())
            .chain(choices.into_iter().filter(|c| c.name != ALL))
            .collect();
        Self {
            attribute: attribute.into(),
            choices,
            default: None,
            null_selectable: false,
            params,
        }
    }

    /// Creates a choice filter where the declared `null` and `not-null` choices
    /// select on nullness instead of equality.
    pub fn nullable(
        attribute: impl Into<String>,
        choices: impl IntoIterator<Item = Choice>,
        params: &'a RequestParams,
    ) -> Self {
        Self {
            null_selectable: true,
            ..Self::new(attribute, choices, params)
        }
    }

    /// Sets the value used when the request does not carry one.
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Returns the filtered attribute.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Returns the declared choices, starting with `all`.
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    /// Returns `true` if `null` and `not-null` are accepted.
    pub fn is_null_selectable(&self) -> bool {
        self.null_selectable
    }

    /// Returns the request parameter name, `select.<attribute>`.
    pub fn param_name(&self) -> String {
        format!("select.{}", self.attribute)
    }

    /// Returns the value currently selected, falling back to the default.
    pub fn selected(&self) -> Option<&str> {
        self.params
            .get(&self.param_name())
            .or(self.default.as_deref())
    }

    fn is_declared(&self, value: &str) -> bool {
        self.choices.iter().any(|c| c.name == value)
    }

    /// Turns the current selection into a predicate.
    pub fn evaluate(&self) -> Result<Option<Predicate>, InvalidChoice> {
        let attribute = self.attribute.as_str();
        let predicate = match self.selected() {
            None | Some("") => Some(Predicate::is_in(
                attribute,
                self.choices.iter().map(|c| c.name.as_str()),
            )),
            Some(value) if !self.is_declared(value) => {
                warn!("Rejected choice {:?} for {}", value, self.param_name());
                return Err(InvalidChoice::new(self.param_name(), value));
            }
            Some(NULL) if self.null_selectable => Some(Predicate::is_null(attribute)),
            Some(NOT_NULL) if self.null_selectable => Some(Predicate::is_not_null(attribute)),
            Some(ALL) => None,
            Some(value) => Some(Predicate::eq(attribute, value)),
        };
        trace!("Choice filter on {}: {:?}", attribute, predicate);
        Ok(predicate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choices() -> Vec<Choice> {
        vec![Choice::new("jazz", "Jazz"), Choice::new("rock", "Rock")]
    }

    #[test]
    fn test_absent_restricts_to_choice_set() {
        let params = RequestParams::new();
        let filter = ChoiceFilter::new("genre", choices(), &params);
        assert_eq!(
            filter.evaluate(),
            Ok(Some(Predicate::is_in("genre", ["all", "jazz", "rock"])))
        );
    }

    #[test]
    fn test_empty_restricts_to_choice_set() {
        let params = RequestParams::parse("select.genre=");
        let filter = ChoiceFilter::new("genre", choices(), &params);
        assert!(matches!(filter.evaluate(), Ok(Some(Predicate::In(_, _)))));
    }

    #[test]
    fn test_all_is_inert() {
        let params = RequestParams::parse("select.genre=all");
        let filter = ChoiceFilter::new("genre", choices(), &params);
        assert_eq!(filter.evaluate(), Ok(None));
    }

    #[test]
    fn test_declared_value() {
        let params = RequestParams::parse("select.genre=rock");
        let filter = ChoiceFilter::new("genre", choices(), &params);
        assert_eq!(filter.attribute(), "genre");
        assert_eq!(filter.evaluate(), Ok(Some(Predicate::eq("genre", "rock"))));
    }

    #[test]
    fn test_undeclared_value_fails() {
        let params = RequestParams::parse("select.genre=polka");
        let filter = ChoiceFilter::new("genre", choices(), &params);
        assert_eq!(
            filter.evaluate(),
            Err(InvalidChoice::new("select.genre", "polka"))
        );
    }

    #[test]
    fn test_default_used_when_absent() {
        let params = RequestParams::new();
        let filter = ChoiceFilter::new("genre", choices(), &params).with_default("jazz");
        assert_eq!(filter.evaluate(), Ok(Some(Predicate::eq("genre", "jazz"))));

        let params = RequestParams::parse("select.genre=rock");
        let filter = ChoiceFilter::new("genre", choices(), &params).with_default("jazz");
        assert_eq!(filter.evaluate(), Ok(Some(Predicate::eq("genre", "rock"))));
    }

    fn nullable_choices() -> Vec<Choice> {
        vec![
            Choice::new("jazz", "Jazz"),
            Choice::new(NULL, "No label"),
            Choice::new(NOT_NULL, "Any label"),
        ]
    }

    #[test]
    fn test_nullable_sentinels() {
        let params = RequestParams::parse("select.label=null");
        let filter = ChoiceFilter::nullable("label", nullable_choices(), &params);
        assert_eq!(filter.evaluate(), Ok(Some(Predicate::is_null("label"))));

        let params = RequestParams::parse("select.label=not-null");
        let filter = ChoiceFilter::nullable("label", nullable_choices(), &params);
        assert_eq!(filter.evaluate(), Ok(Some(Predicate::is_not_null("label"))));
    }

    #[test]
    fn test_nullable_undeclared_sentinel_fails() {
        let params = RequestParams::parse("select.label=null");
        let filter = ChoiceFilter::nullable("label", [Choice::new("a", "A")], &params);
        assert_eq!(
            filter.evaluate(),
            Err(InvalidChoice::new("select.label", "null"))
        );

        let params = RequestParams::parse("select.label=not-null");
        let filter = ChoiceFilter::nullable("label", [Choice::new("a", "A")], &params);
        assert!(filter.evaluate().is_err());
    }

    #[test]
    fn test_nullable_overrides_declared_equality() {
        let params = RequestParams::parse("select.label=null");
        let declared = [Choice::new("null", "Nothing")];
        let filter = ChoiceFilter::nullable("label", declared, &params);
        assert_eq!(filter.evaluate(), Ok(Some(Predicate::is_null("label"))));
    }

    #[test]
    fn test_null_sentinel_rejected_without_nullable() {
        let params = RequestParams::parse("select.label=null");
        let filter = ChoiceFilter::new("label", choices(), &params);
        assert!(filter.evaluate().is_err());
    }

    #[test]
    fn test_all_is_not_duplicated() {
        let params = RequestParams::new();
        let filter = ChoiceFilter::new("genre", [Choice::all(), Choice::new("jazz", "Jazz")], &params);
        assert_eq!(filter.choices().len(), 2);
        assert_eq!(filter.choices()[0].name, ALL);
    }
}
