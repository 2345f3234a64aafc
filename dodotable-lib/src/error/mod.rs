//! Error types

mod choice;
mod definition;
mod source;

pub use choice::*;
pub use definition::*;
pub use source::*;

/// Errors that can abort building or running a table query.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A choice filter received a value outside its declared set.
    #[error(transparent)]
    InvalidChoice(#[from] InvalidChoice),

    /// The table was built without a data source.
    #[error("Table '{table}' has no data source")]
    MissingDataSource { table: String },

    /// The data source failed to count or fetch records.
    #[error("Data source error: {0}")]
    Source(#[from] SourceError),

    /// A declarative table definition could not be turned into a table.
    #[error("Invalid table definition: {0}")]
    Definition(#[from] DefinitionError),
}

impl Error {
    /// Returns `true` if this error was caused by bad client input.
    ///
    /// Client errors must be reported back to the requester and never retried.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidChoice(_))
    }
}
