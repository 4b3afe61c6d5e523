//! A ledger kept in a single TOML file.

use crate::{LedgerAccount, LedgerError, LedgerRecord, LedgerStore};
use camtlink_utils::read_file_string;
use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize, Serialize)]
struct LedgerFile {
    #[serde(default)]
    accounts: Vec<LedgerAccount>,
    #[serde(default)]
    transactions: Vec<LedgerRecord>,
}

/// File-backed ledger store.
///
/// ```toml
/// [[accounts]]
/// id = 1
/// iban = "BE71 0961 2345 6769"
///
/// [[transactions]]
/// id = 10
/// account_id = 1
/// amount = "1500.00"
/// date = "2024-01-15"
/// label = "(CustomerInvoicePayment)"
/// ```
///
/// Changes are kept in memory until `save` is called.
#[derive(Debug)]
pub struct TomlLedger {
    path: PathBuf,
    data: LedgerFile,
}

impl TomlLedger {
    /// Load the ledger file at `path`
    pub fn open(path: &Path) -> Result<Self, LedgerError> {
        let text = read_file_string(path)
            .map_err(|e| LedgerError::InvalidLedgerFile(path.to_path_buf(), e.to_string()))?;

        Self::from_toml(path, &text)
    }

    /// Build a ledger from TOML text that will be saved to `path`
    pub fn from_toml(path: &Path, text: &str) -> Result<Self, LedgerError> {
        let data: LedgerFile = toml::from_str(text)
            .map_err(|e| LedgerError::InvalidLedgerFile(path.to_path_buf(), e.to_string()))?;

        let mut ids = BTreeSet::new();
        for record in &data.transactions {
            if !ids.insert(record.id) {
                warn!("Ledger transaction id {} is used more than once, only the first is used.", record.id);
            }
        }
        debug!(
            "Loaded {} account(s) and {} transaction(s) from `{}`.",
            data.accounts.len(),
            data.transactions.len(),
            path.display()
        );

        Ok(TomlLedger {
            path: path.to_path_buf(),
            data,
        })
    }

    /// Write the ledger back to its file
    pub fn save(&self) -> Result<(), LedgerError> {
        let text = toml::to_string(&self.data).map_err(|e| LedgerError::Store(e.to_string()))?;
        fs::write(&self.path, text).map_err(|e| LedgerError::Store(e.to_string()))?;
        debug!("Saved ledger to `{}`.", self.path.display());

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn accounts(&self) -> &[LedgerAccount] {
        &self.data.accounts
    }

    pub fn transactions(&self) -> &[LedgerRecord] {
        &self.data.transactions
    }

    fn record(&self, id: i64) -> Option<&LedgerRecord> {
        self.data.transactions.iter().find(|r| r.id == id)
    }
}

impl LedgerStore for TomlLedger {
    fn list_transaction_ids(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        account_id: Option<i64>,
    ) -> Result<Vec<i64>, LedgerError> {
        let mut dated: Vec<(NaiveDate, i64)> = self
            .data
            .transactions
            .iter()
            .filter(|r| account_id.map_or(true, |id| r.account_id == id))
            .filter_map(|r| r.date.map(|d| (d, r.id)))
            .filter(|(d, _)| (start..=end).contains(d))
            .collect();
        dated.sort();
        let mut seen = BTreeSet::new();
        dated.retain(|(_, id)| seen.insert(*id));

        Ok(dated.into_iter().map(|(_, id)| id).collect())
    }

    fn fetch_transaction(&self, id: i64) -> Result<Option<LedgerRecord>, LedgerError> {
        Ok(self.record(id).cloned())
    }

    fn fetch_account(&self, id: i64) -> Result<Option<LedgerAccount>, LedgerError> {
        Ok(self.data.accounts.iter().find(|a| a.id == id).cloned())
    }

    fn find_account_by_iban(&self, iban: &str) -> Result<Option<i64>, LedgerError> {
        Ok(self
            .data
            .accounts
            .iter()
            .find(|a| a.iban.trim() == iban)
            .map(|a| a.id))
    }

    fn update_reconciliation(
        &mut self,
        id: i64,
        reconciled: bool,
        statement_ref: Option<&str>,
    ) -> Result<(), LedgerError> {
        let record = self
            .data
            .transactions
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))?;
        record.reconciled = reconciled;
        record.statement_ref = statement_ref.map(String::from);

        Ok(())
    }
}
