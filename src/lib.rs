pub mod cli;
pub mod conf;
pub mod core;
pub mod format;
pub mod query;
pub mod render;
pub mod table;

#[cfg(feature = "testutil")]
pub mod testutil;
