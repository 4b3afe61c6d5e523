//! A single transaction line of a statement.

use crate::Provenance;
use camtlink_utils::parse_date_text;
use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Snapshot of the ledger record an entry was built from.
/// The ledger store owns the record; `id` is the only thing that refers back to it.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct LedgerLink {
    pub id: i64,
    pub reconciled: bool,
    pub amount: Decimal,
    pub date: Option<NaiveDate>,
    pub label: String,
}

impl LedgerLink {
    /// Link to a record that only needs an id and a reconciliation flag
    pub fn new(id: i64, reconciled: bool) -> Self {
        LedgerLink {
            id,
            reconciled,
            amount: Decimal::ZERO,
            date: None,
            label: String::new(),
        }
    }
}

/// One transaction line, either read from a statement file or loaded from the ledger.
#[derive(Clone, Debug, PartialEq)]
pub struct StatementEntry {
    amount: Decimal,
    value_date: String,
    name: String,
    info: String,
    hash: String,
    provenance: Provenance,
    ledger_link: Option<LedgerLink>,
}

impl StatementEntry {
    /// Construct a new entry.
    /// Without a `hash`, the identity is derived from the entry's content.
    pub fn new(
        amount: Decimal,
        value_date: &str,
        name: &str,
        info: &str,
        hash: Option<String>,
    ) -> StatementEntry {
        let mut entry = StatementEntry {
            amount,
            value_date: value_date.to_string(),
            name: name.to_string(),
            info: info.to_string(),
            hash: String::new(),
            provenance: Provenance::default(),
            ledger_link: None,
        };
        entry.hash = match hash {
            Some(h) if !h.is_empty() => h,
            _ => entry.generate_hash(),
        };

        entry
    }

    /// Construct an entry from its serialisable form
    pub fn from_record(record: EntryRecord) -> StatementEntry {
        StatementEntry::new(
            record.amount,
            &record.value_date,
            &record.name,
            &record.info,
            record.hash,
        )
    }

    /// Digest of the entry's content, stable across repeated parses of the same entry.
    pub fn generate_hash(&self) -> String {
        let content = format!(
            "{}{}{}{}",
            canonical_amount(&self.amount),
            self.value_date,
            self.name,
            self.info
        );

        format!("{:x}", md5::compute(content.as_bytes()))
    }

    /// Access the signed amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Access the value date text, `YYYY-MM-DD` or empty
    pub fn value_date(&self) -> &str {
        &self.value_date
    }

    /// Parse the value date, if it is a date at all
    pub fn date(&self) -> Option<NaiveDate> {
        parse_date_text(&self.value_date)
    }

    /// Access the display label
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Access the supplementary information
    pub fn info(&self) -> &str {
        &self.info
    }

    /// Access the identity hash
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Override the identity hash
    pub fn set_hash(&mut self, hash: &str) {
        self.hash = hash.to_string();
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    pub(crate) fn set_provenance(&mut self, provenance: Provenance) {
        self.provenance = provenance;
    }

    pub fn is_from_file(&self) -> bool {
        self.provenance == Provenance::FromFile
    }

    /// Access the linked ledger record, if any
    pub fn ledger_link(&self) -> Option<&LedgerLink> {
        self.ledger_link.as_ref()
    }

    /// Attach (or detach) a ledger record
    pub fn set_ledger_link(&mut self, link: Option<LedgerLink>) {
        self.ledger_link = link;
    }

    /// Whether the linked ledger record is already reconciled.
    /// Entries without a link are never reconciled.
    pub fn is_reconciled(&self) -> bool {
        self.ledger_link.as_ref().map_or(false, |l| l.reconciled)
    }

    pub fn is_debit(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    pub fn is_credit(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }
}

impl Display for StatementEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {:>12} {}",
            self.value_date,
            canonical_amount(&self.amount),
            self.name.replace('\n', " / ")
        )
    }
}

/// Serialisable view of an entry, without provenance or ledger link.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct EntryRecord {
    pub amount: Decimal,
    pub value_date: String,
    pub name: String,
    #[serde(default)]
    pub info: String,
    #[serde(default)]
    pub hash: Option<String>,
}

impl From<&StatementEntry> for EntryRecord {
    fn from(entry: &StatementEntry) -> Self {
        EntryRecord {
            amount: entry.amount,
            value_date: entry.value_date.clone(),
            name: entry.name.clone(),
            info: entry.info.clone(),
            hash: Some(entry.hash.clone()),
        }
    }
}

/// Render an amount at currency-minor-unit precision, e.g. `1500.00`.
/// Two amounts are the same amount exactly when these renderings are equal.
pub fn canonical_amount(amount: &Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }

    rounded.to_string()
}
