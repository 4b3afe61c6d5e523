//! The ledger store that owns transaction records and accounts.

use crate::LedgerError;
use camtlink_statement::AccountLookup;
use camtlink_utils::{compact_iban, format_iban};
use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A bank transaction record as kept by the ledger
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct LedgerRecord {
    pub id: i64,
    pub account_id: i64,
    pub amount: Decimal,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub link_label: Option<String>,
    #[serde(default)]
    pub reconciled: bool,
    #[serde(default)]
    pub statement_ref: Option<String>,
}

/// A bank account known to the ledger
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct LedgerAccount {
    pub id: i64,
    #[serde(default)]
    pub iban: String,
    #[serde(default)]
    pub name: String,
}

/// Storage of ledger records and accounts.
pub trait LedgerStore {
    /// Ids of records dated within `[start, end]`, optionally for one account, date ascending
    fn list_transaction_ids(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        account_id: Option<i64>,
    ) -> Result<Vec<i64>, LedgerError>;

    fn fetch_transaction(&self, id: i64) -> Result<Option<LedgerRecord>, LedgerError>;

    fn fetch_account(&self, id: i64) -> Result<Option<LedgerAccount>, LedgerError>;

    /// Account id owning an IBAN, given exactly as stored
    fn find_account_by_iban(&self, iban: &str) -> Result<Option<i64>, LedgerError>;

    /// Set a record's reconciliation flag and statement reference
    fn update_reconciliation(
        &mut self,
        id: i64,
        reconciled: bool,
        statement_ref: Option<&str>,
    ) -> Result<(), LedgerError>;
}

/// Resolve statement IBANs through a ledger store.
/// Both the grouped and the compact form of the IBAN are tried.
pub struct StoreLookup<'a, S: LedgerStore>(pub &'a S);

impl<'a, S: LedgerStore> AccountLookup for StoreLookup<'a, S> {
    fn find_account_by_iban(&self, iban: &str) -> Option<i64> {
        let forms = [iban.trim().to_string(), format_iban(iban), compact_iban(iban)];

        for form in forms.iter().filter(|f| !f.is_empty()) {
            match self.0.find_account_by_iban(form) {
                Ok(Some(id)) => return Some(id),
                Ok(None) => continue,
                Err(e) => {
                    warn!("Could not look up IBAN `{}`: {}", form, e);
                    return None;
                }
            }
        }

        None
    }
}
