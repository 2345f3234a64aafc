//! Declarative table definition errors

/// Errors found while turning a [`TableDefinition`](crate::table::TableDefinition)
/// into a table.
#[derive(Debug, thiserror::Error)]
pub enum DefinitionError {
    /// The definition JSON could not be parsed.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The definition declares no columns.
    #[error("Table '{0}' declares no columns")]
    NoColumns(String),

    /// A table-level filter refers to a column that is not declared.
    #[error("Filter refers to unknown column '{0}'")]
    UnknownColumn(String),

    /// Both a table name and a subquery were given.
    #[error("Entity '{0}' declares both a table and a subquery")]
    AmbiguousBase(String),
}
