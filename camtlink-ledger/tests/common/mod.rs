#![allow(dead_code)]

use camtlink_ledger::{LedgerAccount, LedgerError, LedgerRecord, LedgerStore};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Ledger store kept in memory, with switches to make calls fail
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub accounts: Vec<LedgerAccount>,
    pub records: Vec<LedgerRecord>,
    pub fail_fetch: Option<i64>,
    pub fail_accounts: bool,
    pub fail_writes: bool,
}

impl MemoryStore {
    pub fn add_account(&mut self, id: i64, iban: &str) {
        self.accounts.push(LedgerAccount {
            id,
            iban: iban.to_string(),
            name: format!("account {}", id),
        });
    }

    pub fn add_record(&mut self, id: i64, account_id: i64, amount: &str, date: Option<&str>, label: &str) {
        self.records.push(LedgerRecord {
            id,
            account_id,
            amount: Decimal::from_str(amount).unwrap(),
            date: date.map(|d| NaiveDate::from_str(d).unwrap()),
            label: label.to_string(),
            link_label: None,
            reconciled: false,
            statement_ref: None,
        });
    }

    pub fn record(&self, id: i64) -> &LedgerRecord {
        self.records.iter().find(|r| r.id == id).unwrap()
    }
}

impl LedgerStore for MemoryStore {
    fn list_transaction_ids(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        account_id: Option<i64>,
    ) -> Result<Vec<i64>, LedgerError> {
        let mut dated: Vec<(Option<NaiveDate>, i64)> = self
            .records
            .iter()
            .filter(|r| account_id.map_or(true, |id| r.account_id == id))
            // undated records are listed too, the loader has to skip them
            .filter(|r| r.date.map_or(true, |d| start <= d && d <= end))
            .map(|r| (r.date, r.id))
            .collect();
        dated.sort();

        Ok(dated.into_iter().map(|(_, id)| id).collect())
    }

    fn fetch_transaction(&self, id: i64) -> Result<Option<LedgerRecord>, LedgerError> {
        if self.fail_fetch == Some(id) {
            return Err(LedgerError::Store("connection lost".to_string()));
        }

        Ok(self.records.iter().find(|r| r.id == id).cloned())
    }

    fn fetch_account(&self, id: i64) -> Result<Option<LedgerAccount>, LedgerError> {
        if self.fail_accounts {
            return Err(LedgerError::Store("accounts unavailable".to_string()));
        }

        Ok(self.accounts.iter().find(|a| a.id == id).cloned())
    }

    fn find_account_by_iban(&self, iban: &str) -> Result<Option<i64>, LedgerError> {
        Ok(self.accounts.iter().find(|a| a.iban == iban).map(|a| a.id))
    }

    fn update_reconciliation(
        &mut self,
        id: i64,
        reconciled: bool,
        statement_ref: Option<&str>,
    ) -> Result<(), LedgerError> {
        if self.fail_writes {
            return Err(LedgerError::Store("read-only".to_string()));
        }
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| LedgerError::NotFound(id.to_string()))?;
        record.reconciled = reconciled;
        record.statement_ref = statement_ref.map(String::from);

        Ok(())
    }
}
