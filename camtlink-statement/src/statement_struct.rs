use crate::{Provenance, StatementEntry};
use camtlink_utils::{compact_iban, format_iban};
use rust_decimal::Decimal;
use std::fmt::Display;

/// All entries of one bank account, from a statement file or from the ledger.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Statement {
    iban: String,
    account_id: Option<i64>,
    entries: Vec<StatementEntry>,
    provenance: Provenance,
    creation_date: Option<String>,
}

impl Statement {
    /// Construct a new, empty Statement
    pub fn new(iban: &str, account_id: Option<i64>, provenance: Provenance) -> Statement {
        Statement {
            iban: iban.to_string(),
            account_id,
            entries: vec![],
            provenance,
            creation_date: None,
        }
    }

    /// Access the IBAN as stored
    pub fn iban(&self) -> &str {
        &self.iban
    }

    pub fn set_iban(&mut self, iban: &str) {
        self.iban = iban.to_string();
    }

    /// IBAN grouped in blocks of 4 characters
    pub fn formatted_iban(&self) -> String {
        format_iban(&self.iban)
    }

    /// IBAN without any spaces
    pub fn compact_iban(&self) -> String {
        compact_iban(&self.iban)
    }

    /// Access the ledger account this statement belongs to
    pub fn account_id(&self) -> Option<i64> {
        self.account_id
    }

    pub fn set_account_id(&mut self, account_id: Option<i64>) {
        self.account_id = account_id;
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    /// Change where the statement comes from, re-tagging every entry it holds
    pub fn set_provenance(&mut self, provenance: Provenance) {
        self.provenance = provenance;
        for entry in self.entries.iter_mut() {
            entry.set_provenance(provenance);
        }
    }

    pub fn is_from_file(&self) -> bool {
        self.provenance == Provenance::FromFile
    }

    /// Access the statement file's creation timestamp
    pub fn creation_date(&self) -> Option<&str> {
        self.creation_date.as_deref()
    }

    pub fn set_creation_date(&mut self, creation_date: Option<&str>) {
        self.creation_date = creation_date.map(String::from);
    }

    /// Add an entry, tagging it with this statement's provenance
    pub fn add_entry(&mut self, mut entry: StatementEntry) {
        entry.set_provenance(self.provenance);
        self.entries.push(entry);
    }

    /// Construct an entry and add it to the statement
    pub fn create_entry(
        &mut self,
        amount: Decimal,
        value_date: &str,
        name: &str,
        info: &str,
        hash: Option<String>,
    ) -> &mut StatementEntry {
        self.add_entry(StatementEntry::new(amount, value_date, name, info, hash));
        let last = self.entries.len() - 1;

        &mut self.entries[last]
    }

    /// Access the entries, in insertion order
    pub fn entries(&self) -> &[StatementEntry] {
        &self.entries
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn clear_entries(&mut self) {
        self.entries.clear();
    }

    /// Sum of all credits (positive amounts)
    pub fn total_credits(&self) -> Decimal {
        self.entries
            .iter()
            .filter(|e| e.is_credit())
            .fold(Decimal::new(0, 2), |sum, e| sum + e.amount())
    }

    /// Sum of all debits (negative amounts)
    pub fn total_debits(&self) -> Decimal {
        self.entries
            .iter()
            .filter(|e| e.is_debit())
            .fold(Decimal::new(0, 2), |sum, e| sum + e.amount())
    }

    /// Credits plus debits
    pub fn net_balance(&self) -> Decimal {
        self.entries
            .iter()
            .fold(Decimal::new(0, 2), |sum, e| sum + e.amount())
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.account_id {
            Some(id) => write!(f, "{} (account {})", self.formatted_iban(), id),
            None => write!(f, "{} (no account)", self.formatted_iban()),
        }
    }
}
