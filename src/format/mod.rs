mod field;
mod header;
pub(crate) mod layout;

pub use field::{FieldDescriptor, FieldSpec, FieldType};
pub use header::{Header, LastModified};
