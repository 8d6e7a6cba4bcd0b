pub mod codec;
mod file;
mod record;
pub mod slice;
mod value;

pub use file::{Records, TableFile, TableOptions};
pub use record::Record;
pub use value::Value;
