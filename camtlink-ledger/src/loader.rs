//! Build statements from ledger records.

use crate::{display_label, LedgerError, LedgerRecord, LedgerStore, NoTranslation, Translate};
use camtlink_statement::{LedgerLink, Provenance, Statement, StatementEntry};
use camtlink_utils::{format_iban, parse_date_text};
use chrono::NaiveDate;
use log::{debug, info, warn};
use std::collections::BTreeMap;

/// Loads ledger records as one `Statement` per account.
pub struct LedgerStatementLoader<'s, S: LedgerStore, T: Translate = NoTranslation> {
    store: &'s S,
    translations: T,
}

impl<'s, S: LedgerStore> LedgerStatementLoader<'s, S, NoTranslation> {
    pub fn new(store: &'s S) -> Self {
        LedgerStatementLoader {
            store,
            translations: NoTranslation,
        }
    }
}

impl<'s, S: LedgerStore, T: Translate> LedgerStatementLoader<'s, S, T> {
    /// Loader that translates label keys into display names
    pub fn with_translations(store: &'s S, translations: T) -> Self {
        LedgerStatementLoader {
            store,
            translations,
        }
    }

    /// Load the records dated within `[start, end]`, keyed by account id.
    /// Any store error fails the whole load.
    pub fn load(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        account_id: Option<i64>,
    ) -> Result<BTreeMap<i64, Statement>, LedgerError> {
        let ids = self.store.list_transaction_ids(start, end, account_id)?;
        let mut stmts: BTreeMap<i64, Statement> = BTreeMap::new();
        let mut count = 0;

        for id in ids {
            let record = match self.store.fetch_transaction(id)? {
                Some(r) => r,
                None => {
                    warn!("Ledger record {} was listed but could not be fetched.", id);
                    continue;
                }
            };
            let date = match record.date {
                Some(d) => d,
                None => {
                    debug!("Skipping ledger record {} without a date.", id);
                    continue;
                }
            };

            let stmt = stmts.entry(record.account_id).or_insert_with(|| {
                Statement::new(
                    &self.account_iban(record.account_id),
                    Some(record.account_id),
                    Provenance::FromLedger,
                )
            });
            stmt.add_entry(self.entry_from_record(&record, date));
            count += 1;
        }

        info!(
            "Loaded {} ledger entries for {} account(s) between {} and {}.",
            count,
            stmts.len(),
            start,
            end
        );

        Ok(stmts)
    }

    /// Like `load`, with dates given as text
    pub fn load_between(
        &self,
        start: &str,
        end: &str,
        account_id: Option<i64>,
    ) -> Result<BTreeMap<i64, Statement>, LedgerError> {
        let start = parse_date_text(start).ok_or_else(|| LedgerError::InvalidDate(start.to_string()))?;
        let end = parse_date_text(end).ok_or_else(|| LedgerError::InvalidDate(end.to_string()))?;

        self.load(start, end, account_id)
    }

    /// All entries dated within `[start, end]` regardless of account, date ascending
    pub fn load_flat(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<StatementEntry>, LedgerError> {
        let mut entries: Vec<StatementEntry> = self
            .load(start, end, None)?
            .into_values()
            .flat_map(|stmt| stmt.entries().to_vec())
            .collect();
        entries.sort_by_key(|e| e.date());

        Ok(entries)
    }

    /// IBAN of an account, empty when it cannot be resolved
    fn account_iban(&self, account_id: i64) -> String {
        match self.store.fetch_account(account_id) {
            Ok(Some(account)) => format_iban(&account.iban),
            Ok(None) => String::new(),
            Err(e) => {
                warn!("Could not fetch ledger account {}: {}", account_id, e);
                String::new()
            }
        }
    }

    fn entry_from_record(&self, record: &LedgerRecord, date: NaiveDate) -> StatementEntry {
        let name = display_label(
            &record.label,
            record.link_label.as_deref(),
            &self.translations,
        );
        let mut entry = StatementEntry::new(
            record.amount,
            &date.format("%Y-%m-%d").to_string(),
            &name,
            "",
            None,
        );
        entry.set_ledger_link(Some(LedgerLink {
            id: record.id,
            reconciled: record.reconciled,
            amount: record.amount,
            date: Some(date),
            label: record.label.clone(),
        }));

        entry
    }
}
