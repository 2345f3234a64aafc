//! Request-driven filters.
//!
//! Each filter reads the request parameters it cares about and produces an
//! optional [`Predicate`]:
//!
//! - [`ChoiceFilter`] - `select.<attribute>` restricted to a declared set
//! - [`SubstringFilter`] / [`SubstringAlias`] - case-insensitive search
//! - [`EqualityFilter`] / [`EqualityAlias`] - typed exact search
//! - [`CombinedSubstringFilter`] - OR of every active search on a table
//!
//! Column-level filters are wrapped in [`FilterPrimitive`]; the filters a
//! table applies are [`TableFilter`]s.

mod choice;
mod combined;
mod equal;
mod search;

pub use choice::ALL;
pub use choice::Choice;
pub use choice::ChoiceFilter;
pub use choice::NOT_NULL;
pub use choice::NULL;
pub use combined::CombinedSubstringFilter;
pub use equal::EqualityAlias;
pub use equal::EqualityFilter;
pub use equal::ValueType;
pub use search::SearchParams;
pub use search::SubstringAlias;
pub use search::SubstringFilter;

use crate::error::InvalidChoice;
use crate::query::Predicate;
use crate::table::Column;

/// A filter declared on a column.
#[derive(Debug, Clone)]
pub enum FilterPrimitive<'a> {
    Choice(ChoiceFilter<'a>),
    Substring(SubstringFilter<'a>),
    SubstringAlias(SubstringAlias<'a>),
    Equality(EqualityFilter<'a>),
    EqualityAlias(EqualityAlias<'a>),
}

impl FilterPrimitive<'_> {
    /// Turns the request into an optional predicate.
    pub fn evaluate(&self) -> Result<Option<Predicate>, InvalidChoice> {
        match self {
            Self::Choice(f) => f.evaluate(),
            _ => Ok(self.evaluate_search()),
        }
    }

    /// Returns `true` for filters driven by the `search_<identifier>.*` parameters.
    pub fn is_search(&self) -> bool {
        !matches!(self, Self::Choice(_))
    }

    /// Evaluates a search filter. Choice filters yield `None`.
    pub fn evaluate_search(&self) -> Option<Predicate> {
        match self {
            Self::Choice(_) => None,
            Self::Substring(f) => f.evaluate(),
            Self::SubstringAlias(f) => f.evaluate(),
            Self::Equality(f) => f.evaluate(),
            Self::EqualityAlias(f) => f.evaluate(),
        }
    }
}

impl<'a> From<ChoiceFilter<'a>> for FilterPrimitive<'a> {
    fn from(f: ChoiceFilter<'a>) -> Self {
        Self::Choice(f)
    }
}

impl<'a> From<SubstringFilter<'a>> for FilterPrimitive<'a> {
    fn from(f: SubstringFilter<'a>) -> Self {
        Self::Substring(f)
    }
}

impl<'a> From<SubstringAlias<'a>> for FilterPrimitive<'a> {
    fn from(f: SubstringAlias<'a>) -> Self {
        Self::SubstringAlias(f)
    }
}

impl<'a> From<EqualityFilter<'a>> for FilterPrimitive<'a> {
    fn from(f: EqualityFilter<'a>) -> Self {
        Self::Equality(f)
    }
}

impl<'a> From<EqualityAlias<'a>> for FilterPrimitive<'a> {
    fn from(f: EqualityAlias<'a>) -> Self {
        Self::EqualityAlias(f)
    }
}

/// A filter applied by a table.
///
/// Every active table filter contributes one AND-ed term to the query.
#[derive(Debug, Clone)]
pub enum TableFilter<'a> {
    /// A single filter.
    Primitive(FilterPrimitive<'a>),
    /// The OR of all active search filters on the table's columns.
    Combined(CombinedSubstringFilter<'a>),
}

impl TableFilter<'_> {
    /// Turns the request into an optional predicate, given the table's columns.
    pub fn evaluate(&self, columns: &[Column<'_>]) -> Result<Option<Predicate>, InvalidChoice> {
        match self {
            Self::Primitive(f) => f.evaluate(),
            Self::Combined(f) => Ok(f.evaluate(columns)),
        }
    }
}

impl<'a> From<FilterPrimitive<'a>> for TableFilter<'a> {
    fn from(f: FilterPrimitive<'a>) -> Self {
        Self::Primitive(f)
    }
}

impl<'a> From<ChoiceFilter<'a>> for TableFilter<'a> {
    fn from(f: ChoiceFilter<'a>) -> Self {
        Self::Primitive(f.into())
    }
}

impl<'a> From<SubstringFilter<'a>> for TableFilter<'a> {
    fn from(f: SubstringFilter<'a>) -> Self {
        Self::Primitive(f.into())
    }
}

impl<'a> From<SubstringAlias<'a>> for TableFilter<'a> {
    fn from(f: SubstringAlias<'a>) -> Self {
        Self::Primitive(f.into())
    }
}

impl<'a> From<EqualityFilter<'a>> for TableFilter<'a> {
    fn from(f: EqualityFilter<'a>) -> Self {
        Self::Primitive(f.into())
    }
}

impl<'a> From<EqualityAlias<'a>> for TableFilter<'a> {
    fn from(f: EqualityAlias<'a>) -> Self {
        Self::Primitive(f.into())
    }
}

impl<'a> From<CombinedSubstringFilter<'a>> for TableFilter<'a> {
    fn from(f: CombinedSubstringFilter<'a>) -> Self {
        Self::Combined(f)
    }
}
