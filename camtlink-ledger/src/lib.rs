//! Ledger records, their statements, and their reconciliation with bank statements.

mod error;
mod loader;
mod reconciler;
mod store;
mod toml_ledger;
mod translate;

pub use error::LedgerError;
pub use loader::LedgerStatementLoader;
pub use reconciler::{generate_statement_ref, statement_ref_for, BatchOutcome, Reconciler};
pub use store::{LedgerAccount, LedgerRecord, LedgerStore, StoreLookup};
pub use toml_ledger::TomlLedger;
pub use translate::{display_label, NoTranslation, Translate};
