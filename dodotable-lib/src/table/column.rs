//! Column descriptors

use std::fmt;
use std::sync::Arc;
use std::sync::LazyLock;

use regex::Captures;
use regex::Regex;

use super::row::Cell;
use super::row::Formatter;
use super::row::display_formatter;
use crate::filter::FilterPrimitive;
use crate::model::Record;
use crate::model::Value;
use crate::query::Direction;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([A-Za-z0-9_.]+)\}").expect("placeholder regex is valid")
});

/// Where a linked column points to.
#[derive(Clone)]
pub enum Endpoint {
    /// The same URL for every row.
    Static(String),
    /// A URL computed from the row.
    Dynamic(Arc<dyn Fn(&Record) -> String + Send + Sync>),
}

impl Endpoint {
    /// Creates an endpoint computed from the row.
    pub fn dynamic(f: impl Fn(&Record) -> String + Send + Sync + 'static) -> Self {
        Self::Dynamic(Arc::new(f))
    }

    /// Creates an endpoint from a template such as `/albums/{id}`.
    ///
    /// Every `{path}` placeholder is replaced by the display form of the
    /// value at that dotted path, or the empty string if it is missing.
    pub fn template(template: impl Into<String>) -> Self {
        let template = template.into();
        Self::dynamic(move |record| {
            PLACEHOLDER
                .replace_all(&template, |caps: &Captures<'_>| {
                    record.lookup_or(&caps[1], &Value::Null).to_string()
                })
                .into_owned()
        })
    }

    /// Computes the URL for a row.
    pub fn url(&self, record: &Record) -> String {
        match self {
            Self::Static(url) => url.clone(),
            Self::Dynamic(f) => f(record),
        }
    }
}

impl From<&str> for Endpoint {
    fn from(url: &str) -> Self {
        Self::Static(url.to_string())
    }
}

impl From<String> for Endpoint {
    fn from(url: String) -> Self {
        Self::Static(url)
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(url) => f.debug_tuple("Static").field(url).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// How a column turns a row into cell data.
#[derive(Debug, Clone, Default)]
pub enum CellSource {
    /// The value at the column's attribute path.
    #[default]
    Attribute,
    /// The whole row.
    Object,
    /// The value at the attribute path, linked to an endpoint.
    Link(Endpoint),
}

/// A column of a table.
///
/// Binds a label to a dotted attribute path, carries the column's filters
/// and holds the sort direction the request asked for.
///
/// # Example
///
/// ```
/// use dodotable_lib::model::Entity;
/// use dodotable_lib::model::RequestParams;
/// use dodotable_lib::filter::SubstringFilter;
/// use dodotable_lib::table::Column;
///
/// let entity = Entity::new("Music");
/// let params = RequestParams::new();
/// let column = Column::new("Artist", "artist.name")
///     .filter(SubstringFilter::new(&entity, "artist.name", &params))
///     .class("text-left");
///
/// assert_eq!(column.attribute(), "artist.name");
/// assert_eq!(column.filters().len(), 1);
/// assert!(column.is_visible());
/// assert_eq!(column.sort_direction(), None);
/// ```
#[derive(Clone)]
pub struct Column<'a> {
    label: String,
    attribute: String,
    filters: Vec<FilterPrimitive<'a>>,
    sort_direction: Option<Direction>,
    visible: bool,
    sortable: bool,
    editable: bool,
    classes: Vec<String>,
    formatter: Formatter,
    source: CellSource,
}

impl<'a> Column<'a> {
    /// Creates a visible, sortable column.
    pub fn new(label: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            attribute: attribute.into(),
            filters: Vec::new(),
            sort_direction: None,
            visible: true,
            sortable: true,
            editable: false,
            classes: Vec::new(),
            formatter: display_formatter(),
            source: CellSource::Attribute,
        }
    }

    /// Creates an invisible column. It still takes part in combined search.
    pub fn hidden(label: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::new(label, attribute).visible(false)
    }

    /// Creates a column whose cells hold the whole row.
    pub fn object(label: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::new(label, attribute).source(CellSource::Object)
    }

    /// Creates a column whose cells link to `endpoint`.
    pub fn linked(
        label: impl Into<String>,
        attribute: impl Into<String>,
        endpoint: impl Into<Endpoint>,
    ) -> Self {
        Self::new(label, attribute).source(CellSource::Link(endpoint.into()))
    }

    // ========================================================================
    // Builder
    // ========================================================================

    /// Adds a filter (builder pattern).
    pub fn filter(mut self, filter: impl Into<FilterPrimitive<'a>>) -> Self {
        self.filters.push(filter.into());
        self
    }

    /// Sets visibility (builder pattern).
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Sets whether the column renders sort controls (builder pattern).
    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    /// Sets whether the column renders as editable (builder pattern).
    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    /// Adds a class (builder pattern).
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Sets the cell formatter (builder pattern).
    pub fn formatter(mut self, f: impl Fn(&Value) -> String + Send + Sync + 'static) -> Self {
        self.formatter = Arc::new(f);
        self
    }

    /// Sets how cells are extracted (builder pattern).
    pub fn source(mut self, source: CellSource) -> Self {
        self.source = source;
        self
    }

    /// Adds a filter.
    pub fn add_filter(&mut self, filter: impl Into<FilterPrimitive<'a>>) {
        self.filters.push(filter.into());
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn filters(&self) -> &[FilterPrimitive<'a>] {
        &self.filters
    }

    /// Returns the direction the column is sorted in, if any.
    pub fn sort_direction(&self) -> Option<Direction> {
        self.sort_direction
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn cell_source(&self) -> &CellSource {
        &self.source
    }

    /// Returns the `order_by` token that sorts by this column in `direction`.
    pub fn order_token(&self, direction: Direction) -> String {
        direction.token(&self.attribute)
    }

    pub(crate) fn set_sort_direction(&mut self, direction: Option<Direction>) {
        self.sort_direction = direction;
    }

    /// Extracts the cell at position (`col`, `row`) from a record.
    ///
    /// Missing path segments yield a null cell.
    pub fn cell(&self, col: usize, row: usize, record: &Record) -> Cell {
        let data = match &self.source {
            CellSource::Object => Value::Record(Box::new(record.clone())),
            CellSource::Attribute | CellSource::Link(_) => {
                record.lookup_or(&self.attribute, &Value::Null).clone()
            }
        };
        let cell = Cell::new(col, row, data, Arc::clone(&self.formatter))
            .with_classes(self.classes.clone());
        match &self.source {
            CellSource::Link(endpoint) => cell.with_url(endpoint.url(record)),
            _ => cell,
        }
    }
}

impl fmt::Debug for Column<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("label", &self.label)
            .field("attribute", &self.attribute)
            .field("filters", &self.filters)
            .field("sort_direction", &self.sort_direction)
            .field("visible", &self.visible)
            .field("sortable", &self.sortable)
            .field("editable", &self.editable)
            .field("classes", &self.classes)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn album() -> Record {
        Record::new()
            .set("id", 7)
            .set("title", "Blue Train")
            .set("artist", Record::new().set("name", "Coltrane"))
    }

    #[test]
    fn test_attribute_cell() {
        let column = Column::new("Artist", "artist.name");
        let cell = column.cell(1, 2, &album());
        assert_eq!(cell.col(), 1);
        assert_eq!(cell.row(), 2);
        assert_eq!(cell.data(), &Value::from("Coltrane"));
        assert_eq!(cell.display(), "Coltrane");
        assert_eq!(cell.url(), None);
    }

    #[test]
    fn test_missing_path_is_null() {
        let column = Column::new("Label", "label.name");
        let cell = column.cell(0, 0, &album());
        assert!(cell.data().is_null());
        assert_eq!(cell.display(), "");
    }

    #[test]
    fn test_object_cell() {
        let column = Column::object("Album", "title");
        let cell = column.cell(0, 0, &album());
        assert_eq!(cell.data().as_record(), Some(&album()));
    }

    #[test]
    fn test_static_link() {
        let column = Column::linked("Title", "title", "/albums");
        let cell = column.cell(0, 0, &album());
        assert_eq!(cell.url(), Some("/albums"));
        assert_eq!(cell.display(), "Blue Train");
    }

    #[test]
    fn test_template_link() {
        let column = Column::linked("Title", "title", Endpoint::template("/albums/{id}?by={artist.name}"));
        let cell = column.cell(0, 0, &album());
        assert_eq!(cell.url(), Some("/albums/7?by=Coltrane"));
    }

    #[test]
    fn test_formatter_and_classes() {
        let column = Column::new("Title", "title")
            .formatter(|value| value.to_string().to_uppercase())
            .class("title")
            .class("wide");
        let cell = column.cell(0, 0, &album());
        assert_eq!(cell.display(), "BLUE TRAIN");
        assert_eq!(cell.classes(), ["title", "wide"]);
    }

    #[test]
    fn test_hidden() {
        let column = Column::hidden("Id", "id");
        assert!(!column.is_visible());
        assert!(column.is_sortable());
        assert!(!column.is_editable());
    }

    #[test]
    fn test_order_token() {
        let column = Column::new("Title", "title");
        assert_eq!(column.order_token(Direction::Desc), "title.desc");
    }
}
