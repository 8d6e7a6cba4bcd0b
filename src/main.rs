use std::io::Write;
use std::path::Path;

use clap::Parser;
use log::debug;

use dbase3::cli;
use dbase3::conf::Config;
use dbase3::core::{CliArgs, setup_logging};

fn main() -> anyhow::Result<()> {
    setup_logging();
    let args = CliArgs::parse();
    debug!(args = args; "dbase3 started");

    let conf = Config::load(args.config.as_deref().map(Path::new))?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    cli::run(args.command, &conf, &mut out)?;
    out.flush()?;
    Ok(())
}
