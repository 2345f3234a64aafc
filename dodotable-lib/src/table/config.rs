//! Table configuration

use serde::Deserialize;
use serde::Serialize;

use crate::pager::DEFAULT_LIMIT;
use crate::pager::DEFAULT_OFFSET;
use crate::pager::DEFAULT_PADDING;

/// Environment-level settings shared by the tables of an application.
///
/// # Example
///
/// ```
/// use dodotable_lib::table::TableConfig;
///
/// let config = TableConfig::default()
///     .with_default_limit(25)
///     .with_padding(5);
/// assert_eq!(config.order_param, "order_by");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Rows per page when the request does not say.
    ///
    /// Default: 10
    pub default_limit: usize,

    /// First row when the request does not say.
    ///
    /// Default: 0
    pub default_offset: usize,

    /// Number of page links in the pager window.
    ///
    /// Default: 10
    pub padding: usize,

    /// Request parameter holding the ordering tokens.
    ///
    /// Default: `order_by`
    pub order_param: String,

    /// Noun used for a row in summaries ("12 rows").
    ///
    /// Default: `row`
    pub unit_label: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            default_offset: DEFAULT_OFFSET,
            padding: DEFAULT_PADDING,
            order_param: "order_by".to_string(),
            unit_label: "row".to_string(),
        }
    }
}

impl TableConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default limit.
    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    /// Sets the default offset.
    pub fn with_default_offset(mut self, offset: usize) -> Self {
        self.default_offset = offset;
        self
    }

    /// Sets the pager padding.
    pub fn with_padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    /// Sets the ordering parameter name.
    pub fn with_order_param(mut self, param: impl Into<String>) -> Self {
        self.order_param = param.into();
        self
    }

    /// Sets the default unit label.
    pub fn with_unit_label(mut self, label: impl Into<String>) -> Self {
        self.unit_label = label.into();
        self
    }
}
