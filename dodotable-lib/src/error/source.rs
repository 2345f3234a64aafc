//! Data source error types

/// Errors raised by a [`DataSource`](crate::source::DataSource) implementation.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// SQLite failed to prepare or run a statement.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The source holds no collection for the requested entity.
    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    /// A value cannot be represented by this source.
    #[error("Unsupported {type_name} value in {context}")]
    UnsupportedValue {
        type_name: &'static str,
        context: String,
    },
}

impl SourceError {
    /// Creates a new unsupported value error.
    pub fn unsupported(type_name: &'static str, context: impl Into<String>) -> Self {
        Self::UnsupportedValue {
            type_name,
            context: context.into(),
        }
    }
}
