//! Entity: the base collection a table queries

use std::fmt;

use crate::util::camel_to_underscore;

/// Where a data source reads an entity's rows from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityBase {
    /// A named table or collection.
    Table(String),
    /// A prepared SQL query used as the base relation.
    ///
    /// Columns reached through dotted attribute paths should be aliased with
    /// their full path, e.g. `SELECT artist.name AS "artist.name" ...`.
    Subquery(String),
}

/// The base entity of a table.
///
/// The entity name is written in CamelCase (e.g. `"AdminRole"`). Its snake_case
/// form is the search identifier used in request parameter names such as
/// `search_admin_role.word`, and the default table name.
///
/// # Examples
///
/// ```
/// use dodotable_lib::model::Entity;
/// use dodotable_lib::model::EntityBase;
///
/// let entity = Entity::new("AdminRole");
/// assert_eq!(entity.search_identifier(), "admin_role");
/// assert_eq!(entity.base(), &EntityBase::Table("admin_role".to_string()));
///
/// let entity = Entity::new("Music").table("tracks");
/// assert_eq!(entity.base(), &EntityBase::Table("tracks".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entity {
    name: String,
    base: EntityBase,
}

impl Entity {
    /// Creates an entity whose rows live in the table named after it.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let base = EntityBase::Table(camel_to_underscore(&name));
        Self { name, base }
    }

    /// Reads rows from an explicitly named table.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.base = EntityBase::Table(table.into());
        self
    }

    /// Reads rows from a SQL subquery instead of a table.
    pub fn subquery(mut self, sql: impl Into<String>) -> Self {
        self.base = EntityBase::Subquery(sql.into());
        self
    }

    /// Returns the entity name as declared.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the base relation.
    pub fn base(&self) -> &EntityBase {
        &self.base
    }

    /// Returns the snake_case identifier used in request parameter names.
    pub fn search_identifier(&self) -> String {
        camel_to_underscore(&self.name)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.base {
            EntityBase::Table(table) => write!(f, "{} ({})", self.name, table),
            EntityBase::Subquery(_) => write!(f, "{} (subquery)", self.name),
        }
    }
}
