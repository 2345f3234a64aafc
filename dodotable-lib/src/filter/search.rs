//! Substring search filters driven by `search_<identifier>.*` parameters

use log::trace;

use crate::model::Entity;
use crate::model::RequestParams;
use crate::query::Alias;
use crate::query::Predicate;

/// The pair of request parameters shared by every search filter of a table.
///
/// `search_<identifier>.word` carries the search text and
/// `search_<identifier>.type` names the attribute (or alias) to search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    word: String,
    kind: String,
}

impl SearchParams {
    /// Creates the parameter names for a search identifier.
    ///
    /// ```
    /// use dodotable_lib::filter::SearchParams;
    ///
    /// let names = SearchParams::new("admin_role");
    /// assert_eq!(names.word_param(), "search_admin_role.word");
    /// assert_eq!(names.type_param(), "search_admin_role.type");
    /// ```
    pub fn new(identifier: &str) -> Self {
        Self {
            word: format!("search_{}.word", identifier),
            kind: format!("search_{}.type", identifier),
        }
    }

    /// Creates the parameter names for an entity's search identifier.
    pub fn for_entity(entity: &Entity) -> Self {
        Self::new(&entity.search_identifier())
    }

    /// Returns the name of the word parameter.
    pub fn word_param(&self) -> &str {
        &self.word
    }

    /// Returns the name of the type parameter.
    pub fn type_param(&self) -> &str {
        &self.kind
    }

    /// Reads the current word from the request.
    pub fn word<'p>(&self, params: &'p RequestParams) -> Option<&'p str> {
        params.get(&self.word)
    }

    /// Reads the current search type from the request.
    pub fn search_type<'p>(&self, params: &'p RequestParams) -> Option<&'p str> {
        params.get(&self.kind)
    }
}

/// Case-insensitive substring search on one attribute.
///
/// Active only when `search_<entity>.type` equals the attribute name, so a
/// single search box can target one column at a time.
///
/// # Example
///
/// ```
/// use dodotable_lib::filter::SubstringFilter;
/// use dodotable_lib::model::Entity;
/// use dodotable_lib::model::RequestParams;
/// use dodotable_lib::query::Predicate;
///
/// let params = RequestParams::parse("search_music.word=blue&search_music.type=title");
/// let entity = Entity::new("Music");
///
/// let title = SubstringFilter::new(&entity, "title", &params);
/// assert_eq!(title.evaluate(), Some(Predicate::contains("title", "blue")));
///
/// let artist = SubstringFilter::new(&entity, "artist", &params);
/// assert_eq!(artist.evaluate(), None);
/// ```
#[derive(Debug, Clone)]
pub struct SubstringFilter<'a> {
    attribute: String,
    search: SearchParams,
    params: &'a RequestParams,
}

impl<'a> SubstringFilter<'a> {
    /// Creates a substring filter on an attribute of `entity`.
    pub fn new(entity: &Entity, attribute: impl Into<String>, params: &'a RequestParams) -> Self {
        Self {
            attribute: attribute.into(),
            search: SearchParams::for_entity(entity),
            params,
        }
    }

    /// Returns the searched attribute.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Returns the request parameter names this filter reads.
    pub fn search_params(&self) -> &SearchParams {
        &self.search
    }

    /// Returns a contains predicate when the request targets this attribute.
    ///
    /// A missing word searches for the empty string, which matches every
    /// non-null value.
    pub fn evaluate(&self) -> Option<Predicate> {
        if self.search.search_type(self.params) != Some(self.attribute.as_str()) {
            return None;
        }
        let word = self.search.word(self.params).unwrap_or_default();
        trace!("Substring search on {}: {:?}", self.attribute, word);
        Some(Predicate::contains(self.attribute.as_str(), word))
    }
}

/// Case-insensitive substring search on a named expression.
///
/// Active only when the word is non-empty and `search_<identifier>.type`
/// equals the alias name.
#[derive(Debug, Clone)]
pub struct SubstringAlias<'a> {
    alias: Alias,
    search: SearchParams,
    params: &'a RequestParams,
}

impl<'a> SubstringAlias<'a> {
    /// Creates a substring filter on an alias, reading `search_<identifier>.*`.
    pub fn new(identifier: &str, alias: Alias, params: &'a RequestParams) -> Self {
        Self {
            alias,
            search: SearchParams::new(identifier),
            params,
        }
    }

    /// Returns the searched alias.
    pub fn alias(&self) -> &Alias {
        &self.alias
    }

    /// Returns the request parameter names this filter reads.
    pub fn search_params(&self) -> &SearchParams {
        &self.search
    }

    /// Returns a contains predicate when the request targets this alias.
    pub fn evaluate(&self) -> Option<Predicate> {
        let word = self.search.word(self.params).filter(|w| !w.is_empty())?;
        if self.search.search_type(self.params) != Some(self.alias.name()) {
            return None;
        }
        trace!("Substring search on alias {}: {:?}", self.alias.name(), word);
        Some(Predicate::Contains(self.alias.expr().clone(), word.to_string()))
    }
}
