//! Parse bank statement files and match their entries with ledger entries.

mod camt;
mod entry;
mod error;
mod lookup;
mod ops;
mod provenance;
mod statement_collection;
mod statement_struct;

pub use camt::StatementFileParser;
pub use entry::{canonical_amount, EntryRecord, LedgerLink, StatementEntry};
pub use error::ParseError;
pub use lookup::{AccountLookup, NoLookup};
pub use ops::{
    AlreadyLinked, LinkedPair, MatchResult, MatchStatistics, MultipleMatch, StatementMatcher,
    DEFAULT_DATE_TOLERANCE,
};
pub use provenance::Provenance;
pub use statement_collection::StatementCollection;
pub use statement_struct::Statement;
