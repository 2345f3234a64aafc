//! Row values, records, entities and request parameters

mod entity;
mod params;
mod record;
mod value;

pub use entity::*;
pub use params::*;
pub use record::*;
pub use value::*;
