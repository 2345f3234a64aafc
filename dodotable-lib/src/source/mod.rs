//! Data sources tables read from
//!
//! - [`MemorySource`] - records held in memory, filtered and sorted in Rust
//! - [`SqliteSource`] - a SQLite connection, queried with generated SQL

mod memory;
mod sqlite;

pub use memory::MemorySource;
pub use sqlite::SqliteSource;

use crate::error::SourceError;
use crate::model::Record;
use crate::query::Query;

/// Something a table can count and fetch records from.
pub trait DataSource {
    /// Returns the number of records matching the query's predicates.
    ///
    /// Ordering and slicing are ignored.
    fn count(&self, query: &Query) -> Result<usize, SourceError>;

    /// Returns the records matching the query, ordered and sliced.
    fn fetch(&self, query: &Query) -> Result<Vec<Record>, SourceError>;
}

impl<T: DataSource + ?Sized> DataSource for &T {
    fn count(&self, query: &Query) -> Result<usize, SourceError> {
        (**self).count(query)
    }

    fn fetch(&self, query: &Query) -> Result<Vec<Record>, SourceError> {
        (**self).fetch(query)
    }
}

impl<T: DataSource + ?Sized> DataSource for Box<T> {
    fn count(&self, query: &Query) -> Result<usize, SourceError> {
        (**self).count(query)
    }

    fn fetch(&self, query: &Query) -> Result<Vec<Record>, SourceError> {
        (**self).fetch(query)
    }
}
