//! ISO 20022 CAMT.053 bank-to-customer statements.

mod document;
mod parser;

pub use parser::StatementFileParser;
