//! InvalidChoice for choice filters

/// A request selected a value that a choice filter does not declare.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid choice for `{param}`: {value}")]
pub struct InvalidChoice {
    /// The request parameter that carried the value (e.g. `select.genre`).
    pub param: String,
    /// The rejected value.
    pub value: String,
}

impl InvalidChoice {
    /// Creates a new invalid choice error.
    pub fn new(param: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            param: param.into(),
            value: value.into(),
        }
    }
}

/// A search word could not be coerced into the type an equality filter expects.
///
/// Never leaves the filter: the filter substitutes an always-false predicate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Cannot read {word:?} as {expected}")]
pub struct CoercionError {
    pub word: String,
    pub expected: &'static str,
}

impl CoercionError {
    pub fn new(word: impl Into<String>, expected: &'static str) -> Self {
        Self {
            word: word.into(),
            expected,
        }
    }
}
