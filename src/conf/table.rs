use serde::{Deserialize, Serialize};

use crate::table::TableOptions;

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TableConfig {
    /// fsync after every mutation, not just flush.
    #[serde(default)]
    pub sync_writes: bool,
}

impl TableConfig {
    /// Options for opening tables, on the system clock.
    pub fn options(&self) -> TableOptions {
        TableOptions {
            sync_writes: self.sync_writes,
            ..TableOptions::default()
        }
    }
}
