//! Reconcile CAMT.053 bank statements with the transactions kept in a ledger.

use clap::Parser;
use cli::{CliOpts, Command};
use log::LevelFilter;

mod cfg;
mod cli;
mod report;
mod run;

use crate::cfg::Config;

fn main() -> anyhow::Result<()> {
    // parse and validate the CLI arguments
    let opts = CliOpts::parse();
    init_logging(opts.verbosity());

    let conf = Config::try_from(&opts)?;

    match opts.command() {
        Command::Compare(args) => run::compare(&conf, args),
        Command::Reconcile(args) => run::reconcile(&conf, args),
        Command::Cancel { id } => run::cancel(&conf, *id),
    }
}

/// Log warnings by default, more with each `-v`. `RUST_LOG` takes precedence.
fn init_logging(verbosity: u64) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .format_timestamp(None)
        .init();
}
