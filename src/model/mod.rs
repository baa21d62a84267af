//! Schema entity model

mod catalog;
mod elements;
mod object_type;
mod sql_type;

pub use catalog::Catalog;
pub use elements::*;
pub use object_type::{DbObjectType, SchemaObject, SchemaQualified};
pub use sql_type::SqlType;
