//! Declarative table definitions
//!
//! A [`TableDefinition`] describes a table in JSON: its entity, columns and
//! filters. Formatters and computed endpoints cannot be expressed in JSON;
//! linked columns take an endpoint template instead.
//!
//! ```json
//! {
//!   "entity": "MusicAlbum",
//!   "columns": [
//!     { "label": "Title", "attribute": "title", "filters": [{ "kind": "substring" }] },
//!     { "label": "Year", "attribute": "year",
//!       "filters": [{ "kind": "equality", "value_type": "int" }] }
//!   ],
//!   "filters": [
//!     { "kind": "choice", "attribute": "genre",
//!       "choices": [{ "name": "jazz", "description": "Jazz" },
//!                   { "name": "null", "description": "None" }] },
//!     { "kind": "combined_search" }
//!   ]
//! }
//! ```

use serde::Deserialize;
use serde::Serialize;

use super::Column;
use super::Endpoint;
use super::Table;
use super::TableConfig;
use crate::error::DefinitionError;
use crate::error::Error;
use crate::filter::Choice;
use crate::filter::ChoiceFilter;
use crate::filter::CombinedSubstringFilter;
use crate::filter::EqualityAlias;
use crate::filter::EqualityFilter;
use crate::filter::FilterPrimitive;
use crate::filter::SubstringAlias;
use crate::filter::SubstringFilter;
use crate::filter::ValueType;
use crate::model::Entity;
use crate::model::RequestParams;
use crate::model::Value;
use crate::query::Alias;
use crate::query::Expr;
use crate::source::DataSource;

fn default_true() -> bool {
    true
}

/// A table described as data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDefinition {
    /// Entity name, in CamelCase.
    pub entity: String,
    /// Table holding the rows. Defaults to the snake_case entity name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    /// SQL subquery holding the rows, instead of a table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subquery: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_label: Option<String>,
    pub columns: Vec<ColumnDefinition>,
    #[serde(default)]
    pub filters: Vec<TableFilterDefinition>,
    #[serde(default)]
    pub config: TableConfig,
}

impl TableDefinition {
    /// Parses a definition from JSON.
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns the described entity.
    pub fn entity(&self) -> Result<Entity, DefinitionError> {
        let entity = Entity::new(&self.entity);
        match (&self.table, &self.subquery) {
            (Some(_), Some(_)) => Err(DefinitionError::AmbiguousBase(self.entity.clone())),
            (Some(table), None) => Ok(entity.table(table)),
            (None, Some(sql)) => Ok(entity.subquery(sql)),
            (None, None) => Ok(entity),
        }
    }

    /// Builds the table for one request.
    pub fn build<'a, S: DataSource>(
        &self,
        params: &'a RequestParams,
        source: S,
    ) -> Result<Table<'a, S>, Error> {
        if self.columns.is_empty() {
            return Err(DefinitionError::NoColumns(self.entity.clone()).into());
        }
        let entity = self.entity()?;
        let columns: Vec<Column<'a>> = self
            .columns
            .iter()
            .map(|column| column.to_column(&entity, params))
            .collect();

        let mut builder = Table::builder(entity.clone(), params)
            .config(self.config.clone())
            .source(source);
        if let Some(label) = &self.label {
            builder = builder.label(label);
        }
        if let Some(unit_label) = &self.unit_label {
            builder = builder.unit_label(unit_label);
        }

        for filter in &self.filters {
            match filter {
                TableFilterDefinition::Choice {
                    attribute,
                    choices,
                    nullable,
                    default,
                } => {
                    builder = builder.filter(choice_filter(
                        attribute,
                        choices,
                        *nullable,
                        default.as_deref(),
                        params,
                    ));
                }
                TableFilterDefinition::Search { column } => {
                    let found = columns
                        .iter()
                        .find(|c| c.attribute() == column)
                        .ok_or_else(|| DefinitionError::UnknownColumn(column.clone()))?;
                    for primitive in found.filters() {
                        builder = builder.filter(primitive.clone());
                    }
                }
                TableFilterDefinition::CombinedSearch { identifier } => {
                    let combined = match identifier {
                        Some(identifier) => {
                            CombinedSubstringFilter::with_identifier(identifier, params)
                        }
                        None => CombinedSubstringFilter::new(&entity, params),
                    };
                    builder = builder.filter(combined);
                }
            }
        }

        builder.columns(columns).build()
    }
}

/// A column described as data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub label: String,
    pub attribute: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_true")]
    pub sortable: bool,
    #[serde(default)]
    pub editable: bool,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub kind: ColumnKind,
    #[serde(default)]
    pub filters: Vec<ColumnFilterDefinition>,
}

impl ColumnDefinition {
    /// Builds the column, with its filters bound to `params`.
    pub fn to_column<'a>(&self, entity: &Entity, params: &'a RequestParams) -> Column<'a> {
        let mut column = match &self.kind {
            ColumnKind::Attribute => Column::new(&self.label, &self.attribute),
            ColumnKind::Object => Column::object(&self.label, &self.attribute),
            ColumnKind::Link { endpoint } => Column::linked(
                &self.label,
                &self.attribute,
                Endpoint::template(endpoint),
            ),
        }
        .visible(self.visible)
        .sortable(self.sortable)
        .editable(self.editable);

        for class in &self.classes {
            column = column.class(class);
        }
        for filter in &self.filters {
            column.add_filter(filter.to_filter(entity, &self.attribute, params));
        }
        column
    }
}

/// How a declared column extracts its cells.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnKind {
    #[default]
    Attribute,
    Object,
    /// Linked cells. The endpoint is a template such as `/albums/{id}`.
    Link { endpoint: String },
}

/// A filter declared on a column. It targets the column's attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnFilterDefinition {
    Choice {
        choices: Vec<Choice>,
        #[serde(default)]
        nullable: bool,
        #[serde(default)]
        default: Option<String>,
    },
    Substring,
    SubstringAlias {
        name: String,
        expr: ExprDefinition,
        #[serde(default)]
        identifier: Option<String>,
    },
    Equality {
        value_type: ValueType,
    },
    EqualityAlias {
        name: String,
        expr: ExprDefinition,
        value_type: ValueType,
        #[serde(default)]
        identifier: Option<String>,
    },
}

impl ColumnFilterDefinition {
    /// Builds the filter for `attribute`.
    ///
    /// Alias filters search under the entity's identifier unless they name
    /// their own.
    pub fn to_filter<'a>(
        &self,
        entity: &Entity,
        attribute: &str,
        params: &'a RequestParams,
    ) -> FilterPrimitive<'a> {
        let identifier = |own: &Option<String>| {
            own.clone()
                .unwrap_or_else(|| entity.search_identifier())
        };
        match self {
            Self::Choice {
                choices,
                nullable,
                default,
            } => choice_filter(attribute, choices, *nullable, default.as_deref(), params).into(),
            Self::Substring => SubstringFilter::new(entity, attribute, params).into(),
            Self::SubstringAlias {
                name,
                expr,
                identifier: own,
            } => SubstringAlias::new(
                &identifier(own),
                Alias::new(name, expr.to_expr()),
                params,
            )
            .into(),
            Self::Equality { value_type } => {
                EqualityFilter::new(entity, attribute, *value_type, params).into()
            }
            Self::EqualityAlias {
                name,
                expr,
                value_type,
                identifier: own,
            } => EqualityAlias::new(
                &identifier(own),
                Alias::new(name, expr.to_expr()),
                *value_type,
                params,
            )
            .into(),
        }
    }
}

/// A filter declared on the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TableFilterDefinition {
    /// A choice filter on any attribute.
    Choice {
        attribute: String,
        choices: Vec<Choice>,
        #[serde(default)]
        nullable: bool,
        #[serde(default)]
        default: Option<String>,
    },
    /// Applies each filter of the column with this attribute on its own.
    Search { column: String },
    /// The OR of every active search filter on the table's columns.
    CombinedSearch {
        #[serde(default)]
        identifier: Option<String>,
    },
}

/// An expression described as data.
///
/// ```json
/// { "concat": [{ "attribute": "first" }, { "literal": " " }, { "attribute": "last" }] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExprDefinition {
    Attribute(String),
    Literal(serde_json::Value),
    Concat(Vec<ExprDefinition>),
    Coalesce(Vec<ExprDefinition>),
}

impl ExprDefinition {
    pub fn to_expr(&self) -> Expr {
        match self {
            Self::Attribute(path) => Expr::attr(path),
            Self::Literal(value) => Expr::Literal(Value::from(value.clone())),
            Self::Concat(parts) => Expr::concat(parts.iter().map(Self::to_expr)),
            Self::Coalesce(parts) => Expr::coalesce(parts.iter().map(Self::to_expr)),
        }
    }
}

fn choice_filter<'a>(
    attribute: &str,
    choices: &[Choice],
    nullable: bool,
    default: Option<&str>,
    params: &'a RequestParams,
) -> ChoiceFilter<'a> {
    let choices = choices.iter().cloned();
    let filter = if nullable {
        ChoiceFilter::nullable(attribute, choices, params)
    } else {
        ChoiceFilter::new(attribute, choices, params)
    };
    match default {
        Some(default) => filter.with_default(default),
        None => filter,
    }
}
