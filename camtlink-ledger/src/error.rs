//! Error types for this library.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum LedgerError {
    #[error("Ledger record `{0}` not found")]
    NotFound(String),
    #[error("Ledger store error: {0}")]
    Store(String),
    #[error("Invalid bank line ID `{0}`")]
    InvalidId(i64),
    #[error("Missing statement reference")]
    MissingStatementRef,
    #[error("Invalid date `{0}`.\nAccepted formats are `DD/MM/YYYY`, `YYYY-MM-DD`, and RFC 3339 timestamps.")]
    InvalidDate(String),
    #[error("Ledger file `{0}` could not be loaded: {1}")]
    InvalidLedgerFile(PathBuf, String),
}
