//! OR-combination of every active search filter in a table

use log::trace;

use super::SearchParams;
use crate::model::Entity;
use crate::model::RequestParams;
use crate::query::Predicate;
use crate::table::Column;

/// Groups the search filters declared on a table's columns.
///
/// Every search-capable filter (substring or typed equality, on an attribute
/// or an alias) reachable from the columns, hidden ones included, contributes
/// its predicate when active. The contributions are OR-ed, and the result
/// takes part in the table's filter as one AND-ed term.
///
/// # Example
///
/// ```
/// use dodotable_lib::filter::CombinedSubstringFilter;
/// use dodotable_lib::filter::SubstringFilter;
/// use dodotable_lib::model::Entity;
/// use dodotable_lib::model::RequestParams;
/// use dodotable_lib::query::Predicate;
/// use dodotable_lib::table::Column;
///
/// let params = RequestParams::parse("search_music.word=blue&search_music.type=title");
/// let entity = Entity::new("Music");
/// let columns = vec![
///     Column::new("Title", "title").filter(SubstringFilter::new(&entity, "title", &params)),
///     Column::new("Artist", "artist").filter(SubstringFilter::new(&entity, "artist", &params)),
/// ];
///
/// let search = CombinedSubstringFilter::new(&entity, &params);
/// assert_eq!(
///     search.evaluate(&columns),
///     Some(Predicate::or([Predicate::contains("title", "blue")]))
/// );
/// ```
#[derive(Debug, Clone)]
pub struct CombinedSubstringFilter<'a> {
    search: SearchParams,
    params: &'a RequestParams,
}

impl<'a> CombinedSubstringFilter<'a> {
    /// Creates a combined search for an entity's search parameters.
    pub fn new(entity: &Entity, params: &'a RequestParams) -> Self {
        Self {
            search: SearchParams::for_entity(entity),
            params,
        }
    }

    /// Creates a combined search reading `search_<identifier>.*`.
    pub fn with_identifier(identifier: &str, params: &'a RequestParams) -> Self {
        Self {
            search: SearchParams::new(identifier),
            params,
        }
    }

    /// Returns the request parameter names a search form should submit.
    pub fn search_params(&self) -> &SearchParams {
        &self.search
    }

    /// Returns the current search word.
    pub fn word(&self) -> Option<&'a str> {
        self.search.word(self.params)
    }

    /// Returns the currently searched attribute or alias.
    pub fn search_type(&self) -> Option<&'a str> {
        self.search.search_type(self.params)
    }

    /// Returns the OR of all active search predicates, or `None` if none is active.
    pub fn evaluate(&self, columns: &[Column<'_>]) -> Option<Predicate> {
        let active: Vec<Predicate> = columns
            .iter()
            .flat_map(|column| column.filters())
            .filter_map(|filter| filter.evaluate_search())
            .collect();
        trace!("Combined search: {} active filter(s)", active.len());
        if active.is_empty() {
            None
        } else {
            Some(Predicate::Or(active))
        }
    }
}
