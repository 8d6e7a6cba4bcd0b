use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::kv::{ToValue, Value};

use crate::format::FieldSpec;

#[derive(Parser, Debug, PartialEq)]
#[command(version, about)]
pub struct CliArgs {
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// File, size, last modified date and record count
    Info { path: PathBuf },
    /// Field names, types and widths
    Schema { path: PathBuf },
    /// All records as delimited text
    Csv {
        path: PathBuf,
        /// Start with a row of field names
        #[arg(long)]
        header: bool,
    },
    /// All records, fields joined by the list separator
    List { path: PathBuf },
    /// Records as a boxed table; bounds may be negative
    Table {
        path: PathBuf,
        #[arg(long, allow_negative_numbers = true)]
        start: Option<i64>,
        #[arg(long, allow_negative_numbers = true)]
        stop: Option<i64>,
        #[arg(long, allow_negative_numbers = true)]
        step: Option<i64>,
    },
    /// One record as JSON
    Get { path: PathBuf, index: usize },
    /// First record whose field matches, or every match with --all
    Search {
        path: PathBuf,
        field: String,
        value: String,
        #[arg(long)]
        all: bool,
    },
    /// Append a record, one value per field in schema order
    Append {
        path: PathBuf,
        #[arg(allow_hyphen_values = true)]
        values: Vec<String>,
    },
    /// Create an empty table; fails if the path exists
    Create {
        path: PathBuf,
        /// name:TYPE[:LEN[:DEC]], e.g. name:C:50 or age:N:3
        #[arg(short, long = "field", required = true)]
        fields: Vec<FieldSpec>,
    },
    /// Mark a record deleted, or clear the mark with --undelete
    Delete {
        path: PathBuf,
        index: usize,
        #[arg(long)]
        undelete: bool,
    },
    /// Drop deleted records
    Compact {
        path: PathBuf,
        /// Write the compacted table here instead of replacing the original
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl ToValue for CliArgs {
    fn to_value(&self) -> Value<'_> {
        Value::from_debug(self)
    }
}
