//! Match statement file entries with ledger entries.

use crate::{canonical_amount, Provenance, Statement, StatementCollection, StatementEntry};
use chrono::NaiveDate;
use log::debug;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::convert::TryFrom;

/// Days two entries may be apart and still match, unless configured otherwise
pub const DEFAULT_DATE_TOLERANCE: u32 = 1;

/// A file entry with exactly one open ledger counterpart
#[derive(Clone, Debug, PartialEq)]
pub struct LinkedPair {
    pub file: StatementEntry,
    pub ledger: StatementEntry,
}

/// A file entry with several open ledger counterparts, one of which has to be chosen
#[derive(Clone, Debug, PartialEq)]
pub struct MultipleMatch {
    pub file: StatementEntry,
    pub candidates: Vec<StatementEntry>,
}

/// A ledger entry that is already reconciled.
/// `file` is empty when the statement file holds no counterpart.
#[derive(Clone, Debug, PartialEq)]
pub struct AlreadyLinked {
    pub file: Option<StatementEntry>,
    pub ledger: StatementEntry,
}

/// The disposition of every file and ledger entry of one account
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatchResult {
    pub linked: Vec<LinkedPair>,
    pub multiples: Vec<MultipleMatch>,
    pub unlinked: Vec<StatementEntry>,
    pub already_linked: Vec<AlreadyLinked>,
}

impl MatchResult {
    /// Count the entries in each bucket
    pub fn statistics(&self) -> MatchStatistics {
        MatchStatistics {
            linked: self.linked.len(),
            multiples: self.multiples.len(),
            unlinked: self.unlinked.len(),
            already_linked: self.already_linked.len(),
            total_to_process: self.linked.len() + self.multiples.len(),
        }
    }
}

/// Bucket sizes of a `MatchResult`.
/// `total_to_process` counts what still needs confirmation: linked pairs and multiples.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct MatchStatistics {
    pub linked: usize,
    pub multiples: usize,
    pub unlinked: usize,
    pub already_linked: usize,
    pub total_to_process: usize,
}

/// Compares file statements with ledger statements.
/// Amounts must be equal to the cent, dates may differ by up to `date_tolerance` days.
#[derive(Clone, Debug, PartialEq)]
pub struct StatementMatcher {
    date_tolerance: u32,
}

impl Default for StatementMatcher {
    fn default() -> Self {
        StatementMatcher::new(DEFAULT_DATE_TOLERANCE)
    }
}

impl StatementMatcher {
    pub fn new(date_tolerance: u32) -> Self {
        StatementMatcher { date_tolerance }
    }

    pub fn date_tolerance(&self) -> u32 {
        self.date_tolerance
    }

    /// Change the tolerance, negative values become 0
    pub fn set_date_tolerance(&mut self, days: i64) {
        self.date_tolerance = u32::try_from(days.max(0)).unwrap_or(u32::MAX);
    }

    /// Classify every entry of a file statement and a ledger statement of the same account.
    ///
    /// File entries are classified first, in order. A ledger entry claimed by an earlier
    /// file entry is no longer a candidate for later ones. Ledger entries that no file entry
    /// claimed are swept afterwards, so each entry of either side lands in one bucket.
    /// Candidates listed in `multiples` are not repeated in `unlinked`.
    pub fn compare(&self, file: &Statement, ledger: &Statement) -> MatchResult {
        let ledger_entries = ledger.entries();
        let mut result = MatchResult::default();

        // ledger entries claimed by `linked` or `multiples`
        let mut consumed = vec![false; ledger_entries.len()];
        // ledger entries already placed in `already_linked`
        let mut settled = vec![false; ledger_entries.len()];

        for file_entry in file.entries() {
            let matches: Vec<usize> = self
                .match_indices(file_entry, ledger_entries)
                .into_iter()
                .filter(|i| !consumed[*i] && !settled[*i])
                .collect();

            match matches.as_slice() {
                [] => result.unlinked.push(file_entry.clone()),
                [only] => {
                    let ledger_entry = &ledger_entries[*only];
                    if ledger_entry.is_reconciled() {
                        result.already_linked.push(AlreadyLinked {
                            file: Some(file_entry.clone()),
                            ledger: ledger_entry.clone(),
                        });
                        settled[*only] = true;
                    } else {
                        result.linked.push(LinkedPair {
                            file: file_entry.clone(),
                            ledger: ledger_entry.clone(),
                        });
                        consumed[*only] = true;
                    }
                }
                _ => {
                    let open: Vec<usize> = matches
                        .iter()
                        .copied()
                        .filter(|i| !ledger_entries[*i].is_reconciled())
                        .collect();

                    match open.as_slice() {
                        // every candidate is settled, report the first one
                        [] => {
                            result.already_linked.push(AlreadyLinked {
                                file: Some(file_entry.clone()),
                                ledger: ledger_entries[matches[0]].clone(),
                            });
                            settled[matches[0]] = true;
                        }
                        [only] => {
                            result.linked.push(LinkedPair {
                                file: file_entry.clone(),
                                ledger: ledger_entries[*only].clone(),
                            });
                            consumed[*only] = true;
                        }
                        _ => {
                            result.multiples.push(MultipleMatch {
                                file: file_entry.clone(),
                                candidates: open.iter().map(|i| ledger_entries[*i].clone()).collect(),
                            });
                            for i in open {
                                consumed[i] = true;
                            }
                        }
                    }
                }
            }
        }

        for (i, ledger_entry) in ledger_entries.iter().enumerate() {
            if consumed[i] || settled[i] {
                continue;
            }

            if ledger_entry.is_reconciled() {
                result.already_linked.push(AlreadyLinked {
                    file: None,
                    ledger: ledger_entry.clone(),
                });
            } else {
                result.unlinked.push(ledger_entry.clone());
            }
        }

        debug!(
            "Compared {} file entries with {} ledger entries: {:?}",
            file.entry_count(),
            ledger.entry_count(),
            result.statistics()
        );

        result
    }

    /// Compare statements account by account.
    /// An account missing on one side is compared against an empty statement.
    pub fn compare_multiple(
        &self,
        file: &StatementCollection,
        ledger: &StatementCollection,
    ) -> BTreeMap<i64, MatchResult> {
        let account_ids: BTreeSet<i64> = file
            .account_ids()
            .chain(ledger.account_ids())
            .copied()
            .collect();

        account_ids
            .into_iter()
            .map(|id| {
                let empty_file = Statement::new("", Some(id), Provenance::FromFile);
                let empty_ledger = Statement::new("", Some(id), Provenance::FromLedger);
                let file_stmt = file.get(id).unwrap_or(&empty_file);
                let ledger_stmt = ledger.get(id).unwrap_or(&empty_ledger);

                (id, self.compare(file_stmt, ledger_stmt))
            })
            .collect()
    }

    /// All candidates matching an entry, in candidate order
    pub fn find_matches<'a>(
        &self,
        entry: &StatementEntry,
        candidates: &'a [StatementEntry],
    ) -> Vec<&'a StatementEntry> {
        self.match_indices(entry, candidates)
            .into_iter()
            .map(|i| &candidates[i])
            .collect()
    }

    /// Whether the entry's ledger record is already reconciled
    pub fn is_reconciled(&self, entry: &StatementEntry) -> bool {
        entry.is_reconciled()
    }

    /// Count the entries in each bucket of a result
    pub fn statistics(&self, result: &MatchResult) -> MatchStatistics {
        result.statistics()
    }

    fn match_indices(&self, entry: &StatementEntry, candidates: &[StatementEntry]) -> Vec<usize> {
        // an entry without a usable date never matches
        let date = match entry.date() {
            Some(d) => d,
            None => return vec![],
        };
        let amount = canonical_amount(&entry.amount());

        candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| canonical_amount(&c.amount()) == amount)
            .filter(|(_, c)| c.date().map_or(false, |d| self.dates_match(date, d)))
            .map(|(i, _)| i)
            .collect()
    }

    /// Each pair of dates is judged on its own, nearby dates are not clustered
    fn dates_match(&self, a: NaiveDate, b: NaiveDate) -> bool {
        a == b || (a - b).num_days().abs() <= i64::from(self.date_tolerance)
    }
}
