//! Linear scans over decoded records. No indexes: every query walks the
//! records in index order.

mod compare;
mod search;
mod source;

pub use compare::{Comparator, equals, iendswith, istartswith};
pub use search::{DELETED_KEY, Search};
pub use source::{RecordSet, RecordSource};
