//! Command line interface configuration.

use crate::cfg::utils::get_config_path;
use clap::{Args, Parser, Subcommand};
use lazy_static::lazy_static;
use std::path::{Path, PathBuf};

lazy_static! {
    static ref DEFAULT_CFG_PATH: PathBuf = get_config_path();
}

#[derive(Debug, Parser)]
#[clap(author, about, version)]
pub(crate) struct CliOpts {
    #[clap(
        name = "cfg",
        short,
        long,
        help = "Configuration file with the ledger location and matching options.",
        default_value_os = (*DEFAULT_CFG_PATH).as_os_str()
    )]
    config: PathBuf,

    #[clap(
        short,
        long,
        parse(from_occurrences),
        help = "Log more details, repeat for even more."
    )]
    verbose: u64,

    #[clap(subcommand)]
    command: Command,
}

impl CliOpts {
    /// Retrieve the config file path
    pub fn config(&self) -> &Path {
        &self.config
    }

    pub fn verbosity(&self) -> u64 {
        self.verbose
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Compare a statement file with the ledger and report every entry's disposition
    Compare(CompareArgs),
    /// Compare, then reconcile the linked entries and the chosen candidates
    Reconcile(ReconcileArgs),
    /// Cancel the reconciliation of a ledger record
    Cancel {
        #[clap(help = "Id of the ledger record.")]
        id: i64,
    },
}

/// Which statements to read and which ledger dates to compare them with
#[derive(Debug, Args)]
pub(crate) struct StatementArgs {
    #[clap(help = "CAMT.053 statement file, or a directory of them.")]
    pub path: PathBuf,

    #[clap(
        long,
        help = "First ledger date to compare with. Defaults to the earliest statement entry, less the date tolerance."
    )]
    pub from: Option<String>,

    #[clap(
        long,
        help = "Last ledger date to compare with. Defaults to the latest statement entry, plus the date tolerance."
    )]
    pub to: Option<String>,
}

#[derive(Debug, Args)]
pub(crate) struct CompareArgs {
    #[clap(flatten)]
    pub statements: StatementArgs,

    #[clap(long, help = "Print the report as JSON.")]
    pub json: bool,
}

#[derive(Debug, Args)]
pub(crate) struct ReconcileArgs {
    #[clap(flatten)]
    pub statements: StatementArgs,

    #[clap(
        long = "ref",
        value_name = "REF",
        help = "Statement reference (`YYYYMM`) or a period end date. Defaults to the statement's creation month."
    )]
    pub statement_ref: Option<String>,

    #[clap(
        long = "choose",
        value_name = "HASH=ID",
        multiple_occurrences = true,
        help = "Ledger record to reconcile with an entry that has several candidates."
    )]
    pub choices: Vec<String>,
}
