mod args;
mod clock;
mod error;
mod logger;

pub use args::{CliArgs, Command};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::DbfError;
pub use logger::setup_logging;
