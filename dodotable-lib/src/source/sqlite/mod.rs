//! SQLite-backed data source.

mod sql;

use std::borrow::Borrow;
use std::path::Path;

use log::debug;
use rusqlite::Connection;
use rusqlite::params_from_iter;
use rusqlite::types::Value as SqlValue;

use crate::error::SourceError;
use crate::model::Record;
use crate::query::Query;

use super::DataSource;

/// A data source reading from a SQLite connection.
///
/// Each entity maps to the table named by its [`EntityBase`](crate::model::EntityBase),
/// or to a subquery. Columns aliased with dotted names (`"artist.name"`) come
/// back as nested records.
///
/// The source owns its connection or borrows one the caller keeps:
///
/// ```
/// use rusqlite::Connection;
/// use dodotable_lib::model::Entity;
/// use dodotable_lib::query::Query;
/// use dodotable_lib::source::DataSource;
/// use dodotable_lib::source::SqliteSource;
///
/// let conn = Connection::open_in_memory().unwrap();
/// conn.execute_batch("CREATE TABLE music (title TEXT); INSERT INTO music VALUES ('Blue');")
///     .unwrap();
///
/// let source = SqliteSource::new(&conn).unwrap();
/// let query = Query::new(Entity::new("Music"));
/// assert_eq!(source.count(&query).unwrap(), 1);
/// ```
#[derive(Debug)]
pub struct SqliteSource<C = Connection> {
    conn: C,
}

impl SqliteSource {
    /// Opens a SQLite database at the specified path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        Self::new(Connection::open(path)?)
    }

    /// Opens an in-memory SQLite database.
    ///
    /// Useful for testing. Data is lost when the source is dropped.
    pub fn open_in_memory() -> Result<Self, SourceError> {
        Self::new(Connection::open_in_memory()?)
    }
}

impl<C: Borrow<Connection>> SqliteSource<C> {
    /// Wraps an owned or borrowed connection.
    ///
    /// Registers the scalar functions substring matching needs on it.
    pub fn new(conn: C) -> Result<Self, SourceError> {
        sql::register_functions(conn.borrow())?;
        Ok(Self { conn })
    }

    /// Returns the underlying connection.
    pub fn connection(&self) -> &Connection {
        self.conn.borrow()
    }
}

impl<C: Borrow<Connection>> DataSource for SqliteSource<C> {
    fn count(&self, query: &Query) -> Result<usize, SourceError> {
        let statement = sql::count_statement(query)?;
        debug!("{} {:?}", statement.sql, statement.params);
        let count: i64 = self.connection().query_row(
            &statement.sql,
            params_from_iter(statement.params.iter()),
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn fetch(&self, query: &Query) -> Result<Vec<Record>, SourceError> {
        let statement = sql::select_statement(query)?;
        debug!("{} {:?}", statement.sql, statement.params);

        let mut stmt = self.connection().prepare(&statement.sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let rows = stmt
            .query_map(params_from_iter(statement.params.iter()), |row| {
                (0..columns.len())
                    .map(|i| row.get::<_, SqlValue>(i))
                    .collect::<Result<Vec<_>, _>>()
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|values| {
                let pairs = columns
                    .iter()
                    .zip(values)
                    .map(|(column, value)| Ok((column, sql::value_from_sql(value, column)?)))
                    .collect::<Result<Vec<_>, SourceError>>()?;
                Ok(Record::from_flat(pairs))
            })
            .collect()
    }
}
