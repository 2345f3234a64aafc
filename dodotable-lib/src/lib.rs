//! Declarative table query engine
//!
//! Turns request parameters into a filtered, ordered and paginated query
//! against a [`source::DataSource`], and exposes the metadata (visible
//! columns, active filters, page window) needed to drive a tabular display.
//!
//! # Example
//!
//! ```
//! use dodotable_lib::filter::ChoiceFilter;
//! use dodotable_lib::filter::Choice;
//! use dodotable_lib::model::Entity;
//! use dodotable_lib::model::Record;
//! use dodotable_lib::model::RequestParams;
//! use dodotable_lib::source::MemorySource;
//! use dodotable_lib::table::Column;
//! use dodotable_lib::table::Table;
//!
//! let source = MemorySource::new().with_records(
//!     "Music",
//!     [
//!         Record::new().set("title", "Blue").set("genre", "jazz"),
//!         Record::new().set("title", "Red").set("genre", "rock"),
//!     ],
//! );
//! let params = RequestParams::parse("select.genre=jazz");
//! let entity = Entity::new("Music");
//!
//! let mut table = Table::builder(entity, &params)
//!     .label("Music")
//!     .column(Column::new("Title", "title"))
//!     .filter(ChoiceFilter::new(
//!         "genre",
//!         [Choice::new("jazz", "Jazz"), Choice::new("rock", "Rock")],
//!         &params,
//!     ))
//!     .source(source)
//!     .build()
//!     .unwrap();
//!
//! table.select(0, 10).unwrap();
//! assert_eq!(table.rows().len(), 1);
//! assert_eq!(table.rows()[0][0].display(), "Blue");
//! ```

pub mod error;
pub mod filter;
pub mod helper;
pub mod model;
pub mod pager;
pub mod query;
pub mod source;
pub mod table;
pub mod util;

pub use error::Error;
pub use pager::Page;
pub use pager::Pager;
pub use table::Table;
