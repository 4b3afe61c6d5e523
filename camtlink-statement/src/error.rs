//! Errors and error-handling for the statements.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("Statement file declares XML entities, which are not allowed for security reasons.")]
    UnsafeInput,
    #[error("Statement file could not be parsed: {0}")]
    MalformedDocument(String),
    #[error("Statement file `{0}` not found.")]
    FileNotFound(PathBuf),
    #[error("Statement file could not be read: {0}")]
    Io(String),
}
