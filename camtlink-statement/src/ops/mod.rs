//! Operations across file and ledger `Statement`s.

pub mod matching;

pub use matching::{
    AlreadyLinked, LinkedPair, MatchResult, MatchStatistics, MultipleMatch, StatementMatcher,
    DEFAULT_DATE_TOLERANCE,
};
