//! Per-table request helpers

use crate::model::Entity;
use crate::model::RequestParams;

/// Reads the page size and offset a request asks for.
///
/// Several tables can share one request, so the parameters are scoped by the
/// table's search identifier: `limit_<identifier>` and `offset_<identifier>`.
/// Missing or unparsable values fall back to the configured defaults, as does
/// a zero limit.
///
/// # Example
///
/// ```
/// use dodotable_lib::helper::Limit;
/// use dodotable_lib::model::Entity;
/// use dodotable_lib::model::RequestParams;
///
/// let params = RequestParams::parse("limit_music_album=25&offset_music_album=50");
/// let limit = Limit::new(&Entity::new("MusicAlbum"), &params, 10, 0);
/// assert_eq!(limit.arg_name(), "limit_music_album");
/// assert_eq!(limit.limit(), 25);
/// assert_eq!(limit.offset(), 50);
/// ```
#[derive(Debug, Clone)]
pub struct Limit<'a> {
    identifier: String,
    params: &'a RequestParams,
    default_limit: usize,
    default_offset: usize,
}

impl<'a> Limit<'a> {
    /// Creates a helper for the entity's search identifier.
    pub fn new(
        entity: &Entity,
        params: &'a RequestParams,
        default_limit: usize,
        default_offset: usize,
    ) -> Self {
        Self::with_identifier(entity.search_identifier(), params, default_limit, default_offset)
    }

    /// Creates a helper for an explicit identifier.
    pub fn with_identifier(
        identifier: impl Into<String>,
        params: &'a RequestParams,
        default_limit: usize,
        default_offset: usize,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            params,
            default_limit,
            default_offset,
        }
    }

    /// Returns the name of the limit parameter.
    pub fn arg_name(&self) -> String {
        format!("limit_{}", self.identifier)
    }

    /// Returns the name of the offset parameter.
    pub fn offset_arg_name(&self) -> String {
        format!("offset_{}", self.identifier)
    }

    /// Returns the requested page size.
    pub fn limit(&self) -> usize {
        self.read(&self.arg_name())
            .filter(|&limit| limit > 0)
            .unwrap_or(self.default_limit)
    }

    /// Returns the requested offset.
    pub fn offset(&self) -> usize {
        self.read(&self.offset_arg_name())
            .unwrap_or(self.default_offset)
    }

    fn read(&self, name: &str) -> Option<usize> {
        self.params.get(name)?.trim().parse().ok()
    }
}
