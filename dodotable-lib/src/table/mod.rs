//! Tables: columns, filters, ordering and pagination over a data source
//!
//! A [`Table`] is built per request. It borrows the request parameters,
//! turns its filters into a [`Query`], fetches one page from its
//! [`DataSource`] and keeps the materialized [`Row`]s and [`Pager`] for
//! display.

mod column;
mod config;
mod definition;
mod row;

pub use column::CellSource;
pub use column::Column;
pub use column::Endpoint;
pub use config::TableConfig;
pub use definition::ColumnDefinition;
pub use definition::ColumnFilterDefinition;
pub use definition::ColumnKind;
pub use definition::ExprDefinition;
pub use definition::TableDefinition;
pub use definition::TableFilterDefinition;
pub use row::Cell;
pub use row::Formatter;
pub use row::Row;
pub use row::display_formatter;

use log::debug;

use crate::error::Error;
use crate::filter::TableFilter;
use crate::helper::Limit;
use crate::model::Entity;
use crate::model::RequestParams;
use crate::pager::Pager;
use crate::query::Direction;
use crate::query::OrderBy;
use crate::query::Predicate;
use crate::query::Query;
use crate::query::resolve_order;
use crate::source::DataSource;

// ============================================================================
// Table
// ============================================================================

/// A request-scoped table over a data source.
///
/// See the [crate-level example](crate) for typical use.
pub struct Table<'a, S> {
    entity: Entity,
    label: String,
    unit_label: String,
    columns: Vec<Column<'a>>,
    filters: Vec<TableFilter<'a>>,
    params: &'a RequestParams,
    source: S,
    config: TableConfig,
    rows: Vec<Row>,
    pager: Pager,
}

impl<'a, S: DataSource> Table<'a, S> {
    /// Starts building a table over `entity` for one request.
    pub fn builder(entity: Entity, params: &'a RequestParams) -> TableBuilder<'a, S> {
        TableBuilder::new(entity, params)
    }

    /// Appends a filter. Filters are not validated.
    pub fn add_filter(&mut self, filter: impl Into<TableFilter<'a>>) {
        self.filters.push(filter.into());
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Builds the filtered query, without ordering or slicing.
    ///
    /// Inactive filters are skipped. An invalid choice aborts.
    fn base_query(&self) -> Result<Query, Error> {
        let mut query = Query::new(self.entity.clone());
        for filter in &self.filters {
            if let Some(predicate) = filter.evaluate(&self.columns)? {
                query = query.filter(predicate);
            }
        }
        Ok(query)
    }

    /// Resolves the ordering the request asks for and records it on the columns.
    ///
    /// Only visible columns can be ordered by. Without any requested ordering
    /// the first visible column (or the first column, if none is visible) is
    /// sorted descending, and that direction is written back to the column.
    fn resolve_ordering(&mut self) -> OrderBy {
        let requested = self.params.get(&self.config.order_param);
        let mut order = OrderBy::new();
        for column in self.columns.iter_mut().filter(|c| c.is_visible()) {
            let direction = resolve_order(column.attribute(), requested);
            column.set_sort_direction(direction);
            if let Some(direction) = direction {
                order = order.then(column.attribute(), direction);
            }
        }

        if order.is_empty() {
            let fallback = self
                .columns
                .iter()
                .position(|c| c.is_visible())
                .or_else(|| (!self.columns.is_empty()).then_some(0));
            if let Some(index) = fallback {
                let column = &mut self.columns[index];
                column.set_sort_direction(Some(Direction::Desc));
                order = OrderBy::desc(column.attribute());
            }
        }
        order
    }

    /// Returns the composed query: filters and ordering, without slicing.
    ///
    /// Resolving the ordering updates the columns' sort directions.
    pub fn query(&mut self) -> Result<Query, Error> {
        let query = self.base_query()?;
        Ok(query.order_by(self.resolve_ordering()))
    }

    /// Returns the number of rows matching the filters.
    ///
    /// Recomputed on every call.
    pub fn count(&self) -> Result<usize, Error> {
        let query = self.base_query()?;
        Ok(self.source.count(&query)?)
    }

    /// Fetches `limit` rows starting at `offset` and rebuilds the pager.
    pub fn select(&mut self, offset: usize, limit: usize) -> Result<&mut Self, Error> {
        let query = self.query()?.offset(offset).limit(limit);
        debug!("Selecting from {}: {:?}", self.entity, query);

        let records = self.source.fetch(&query)?;
        let visible: Vec<&Column<'a>> = self.columns.iter().filter(|c| c.is_visible()).collect();
        self.rows = records
            .iter()
            .enumerate()
            .map(|(row, record)| {
                Row::new(
                    visible
                        .iter()
                        .enumerate()
                        .map(|(col, column)| column.cell(col, row, record)),
                )
            })
            .collect();

        let count = self.count()?;
        debug!("{} of {} row(s) selected from {}", self.rows.len(), count, self.entity);
        self.pager = Pager::new(limit, offset, count, self.config.padding);
        Ok(self)
    }

    /// Fetches the page the request asks for with `limit_<identifier>` and
    /// `offset_<identifier>`.
    pub fn select_page(&mut self) -> Result<&mut Self, Error> {
        let limit = self.limit();
        let (offset, limit) = (limit.offset(), limit.limit());
        self.select(offset, limit)
    }

    /// Returns the helper reading this table's page size from the request.
    pub fn limit(&self) -> Limit<'a> {
        Limit::new(
            &self.entity,
            self.params,
            self.config.default_limit,
            self.config.default_offset,
        )
    }

    /// Returns the predicates the active filters currently produce.
    pub fn predicates(&self) -> Result<Vec<Predicate>, Error> {
        Ok(self.base_query()?.predicates)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Returns the visible columns in declaration order.
    pub fn columns(&self) -> impl Iterator<Item = &Column<'a>> {
        self.columns.iter().filter(|c| c.is_visible())
    }

    /// Returns every column, hidden ones included.
    pub fn all_columns(&self) -> &[Column<'a>] {
        &self.columns
    }

    pub fn filters(&self) -> &[TableFilter<'a>] {
        &self.filters
    }

    /// Returns the rows of the last selection.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the pager of the last selection.
    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn unit_label(&self) -> &str {
        &self.unit_label
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn params(&self) -> &'a RequestParams {
        self.params
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`Table`].
pub struct TableBuilder<'a, S> {
    entity: Entity,
    params: &'a RequestParams,
    label: Option<String>,
    unit_label: Option<String>,
    columns: Vec<Column<'a>>,
    filters: Vec<TableFilter<'a>>,
    source: Option<S>,
    config: TableConfig,
}

impl<'a, S: DataSource> TableBuilder<'a, S> {
    /// Creates a builder for `entity`.
    pub fn new(entity: Entity, params: &'a RequestParams) -> Self {
        Self {
            entity,
            params,
            label: None,
            unit_label: None,
            columns: Vec::new(),
            filters: Vec::new(),
            source: None,
            config: TableConfig::default(),
        }
    }

    /// Sets the display label. Defaults to the entity name.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the row noun. Defaults to the configured unit label.
    pub fn unit_label(mut self, unit_label: impl Into<String>) -> Self {
        self.unit_label = Some(unit_label.into());
        self
    }

    /// Adds a column.
    pub fn column(mut self, column: Column<'a>) -> Self {
        self.columns.push(column);
        self
    }

    /// Adds several columns.
    pub fn columns(mut self, columns: impl IntoIterator<Item = Column<'a>>) -> Self {
        self.columns.extend(columns);
        self
    }

    /// Adds a filter.
    pub fn filter(mut self, filter: impl Into<TableFilter<'a>>) -> Self {
        self.filters.push(filter.into());
        self
    }

    /// Sets the data source.
    pub fn source(mut self, source: S) -> Self {
        self.source = Some(source);
        self
    }

    /// Sets the configuration.
    pub fn config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the table.
    ///
    /// Fails with [`Error::MissingDataSource`] if no source was set.
    pub fn build(self) -> Result<Table<'a, S>, Error> {
        let label = self.label.unwrap_or_else(|| self.entity.name().to_string());
        let source = self.source.ok_or_else(|| Error::MissingDataSource {
            table: label.clone(),
        })?;
        let unit_label = self
            .unit_label
            .unwrap_or_else(|| self.config.unit_label.clone());
        let pager = Pager::new(
            self.config.default_limit,
            self.config.default_offset,
            0,
            self.config.padding,
        );

        Ok(Table {
            entity: self.entity,
            label,
            unit_label,
            columns: self.columns,
            filters: self.filters,
            params: self.params,
            source,
            config: self.config,
            rows: Vec::new(),
            pager,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Choice;
    use crate::filter::ChoiceFilter;
    use crate::filter::CombinedSubstringFilter;
    use crate::filter::SubstringFilter;
    use crate::model::Record;
    use crate::model::Value;
    use crate::source::MemorySource;

    fn source() -> MemorySource {
        MemorySource::new().with_records(
            "Music",
            (1..=25).map(|i| {
                Record::new()
                    .set("id", i)
                    .set("title", format!("Track {i:02}"))
                    .set("genre", if i % 2 == 0 { "jazz" } else { "rock" })
            }),
        )
    }

    fn table<'a>(params: &'a RequestParams) -> Table<'a, MemorySource> {
        let entity = Entity::new("Music");
        Table::builder(entity.clone(), params)
            .column(Column::new("Id", "id"))
            .column(Column::new("Title", "title").filter(SubstringFilter::new(&entity, "title", params)))
            .column(Column::hidden("Genre", "genre"))
            .filter(ChoiceFilter::new(
                "genre",
                [Choice::new("jazz", "Jazz"), Choice::new("rock", "Rock")],
                params,
            ))
            .filter(CombinedSubstringFilter::new(&entity, params))
            .source(source())
            .build()
            .unwrap()
    }

    #[test]
    fn test_missing_source() {
        let params = RequestParams::new();
        let result = Table::<MemorySource>::builder(Entity::new("Music"), &params)
            .label("Songs")
            .build();
        assert!(matches!(
            result,
            Err(Error::MissingDataSource { table }) if table == "Songs"
        ));
    }

    #[test]
    fn test_defaults() {
        let params = RequestParams::new();
        let table = table(&params);
        assert_eq!(table.label(), "Music");
        assert_eq!(table.unit_label(), "row");
        assert_eq!(table.columns().count(), 2);
        assert_eq!(table.all_columns().len(), 3);
        assert!(table.rows().is_empty());
    }

    #[test]
    fn test_select_first_page() {
        let params = RequestParams::new();
        let mut table = table(&params);
        table.select(0, 10).unwrap();
        assert_eq!(table.rows().len(), 10);
        assert_eq!(table.rows()[0].len(), 2);
        assert_eq!(table.pager().count(), 25);
        assert_eq!(table.pager().page_count(), 3);
        // fallback ordering: first visible column, descending
        assert_eq!(table.rows()[0][0].data(), &Value::Int(25));
        assert_eq!(table.all_columns()[0].sort_direction(), Some(Direction::Desc));
    }

    #[test]
    fn test_select_is_idempotent() {
        let params = RequestParams::parse("order_by=title.asc");
        let mut table = table(&params);
        table.select(0, 10).unwrap();
        let first = table.rows().to_vec();
        table.select(0, 10).unwrap();
        assert_eq!(table.rows(), first.as_slice());
    }

    #[test]
    fn test_requested_ordering() {
        let params = RequestParams::parse("order_by=title.asc");
        let mut table = table(&params);
        table.select(0, 3).unwrap();
        assert_eq!(table.rows()[0][1].display(), "Track 01");
        assert_eq!(table.all_columns()[0].sort_direction(), None);
        assert_eq!(table.all_columns()[1].sort_direction(), Some(Direction::Asc));
    }

    #[test]
    fn test_hidden_columns_are_not_ordered() {
        let params = RequestParams::parse("order_by=genre.asc");
        let mut table = table(&params);
        let query = table.query().unwrap();
        assert_eq!(query.order_by, OrderBy::desc("id"));
        assert_eq!(table.all_columns()[2].sort_direction(), None);
    }

    #[test]
    fn test_choice_filter() {
        let params = RequestParams::parse("select.genre=jazz");
        let mut table = table(&params);
        table.select(0, 100).unwrap();
        assert_eq!(table.rows().len(), 12);
        assert_eq!(table.count().unwrap(), 12);
    }

    #[test]
    fn test_invalid_choice() {
        let params = RequestParams::parse("select.genre=polka");
        let mut table = table(&params);
        let err = table.select(0, 10).err().unwrap();
        assert!(err.is_client_error());
        assert!(matches!(err, Error::InvalidChoice(ref e) if e.value == "polka"));
    }

    #[test]
    fn test_combined_search() {
        let params = RequestParams::parse("search_music.word=track 1&search_music.type=title");
        let mut table = table(&params);
        table.select(0, 100).unwrap();
        // Track 10 .. Track 19
        assert_eq!(table.rows().len(), 10);
    }

    #[test]
    fn test_add_filter() {
        let params = RequestParams::parse("select.genre=rock");
        let mut table = table(&params);
        table.add_filter(ChoiceFilter::new("id", [Choice::new("1", "One")], &params));
        assert_eq!(table.filters().len(), 3);
        // select.id is absent: restricted to the declared set
        assert_eq!(table.count().unwrap(), 1);
    }

    #[test]
    fn test_select_page() {
        let params = RequestParams::parse("limit_music=5&offset_music=20");
        let mut table = table(&params);
        table.select_page().unwrap();
        assert_eq!(table.rows().len(), 5);
        assert_eq!(table.pager().current_page(), 5);
        assert_eq!(table.pager().limit(), 5);
    }

    #[test]
    fn test_select_page_with_huge_offset() {
        let params = RequestParams::parse("limit_music=1&offset_music=18446744073709551615");
        let mut table = table(&params);
        table.select_page().unwrap();
        assert!(table.rows().is_empty());
        let numbers: Vec<usize> = table.pager().pages().iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![1, 25]);
    }

    #[test]
    fn test_no_columns_no_ordering() {
        let params = RequestParams::new();
        let mut table = Table::builder(Entity::new("Music"), &params)
            .source(source())
            .build()
            .unwrap();
        let query = table.query().unwrap();
        assert!(query.order_by.is_empty());
    }

    #[test]
    fn test_config_padding() {
        let params = RequestParams::new();
        let mut table = Table::builder(Entity::new("Music"), &params)
            .column(Column::new("Id", "id"))
            .config(TableConfig::new().with_padding(2))
            .source(source())
            .build()
            .unwrap();
        table.select(0, 1).unwrap();
        assert_eq!(table.pager().padding(), 2);
        let numbers: Vec<_> = table.pager().pages().iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![1, 2, 25]);
    }
}
