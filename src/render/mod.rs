//! Text renderings of record sets. Pure functions of the schema and records.

mod table;
mod text;

pub use table::table;
pub use text::{csv, list};
