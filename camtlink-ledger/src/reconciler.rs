//! Mark ledger records as reconciled with a bank statement.

use crate::{LedgerError, LedgerStore};
use camtlink_statement::LinkedPair;
use camtlink_utils::parse_date_text;
use chrono::{Local, NaiveDate};
use log::{debug, info, warn};

/// Prefix of form fields holding the ledger record chosen for an entry
const LINKED_FIELD_PREFIX: &str = "linked_";

/// Result of reconciling several records at once
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BatchOutcome {
    /// Number of records reconciled
    pub reconciled: usize,
    /// Failures with the statement entry's hash, in the order they were tried.
    /// Derived hashes may repeat, so each failure is kept.
    pub errors: Vec<(String, LedgerError)>,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of records that were tried
    pub fn attempted(&self) -> usize {
        self.reconciled + self.errors.len()
    }

    /// Failures of the entry with `hash`
    pub fn errors_for<'a>(&'a self, hash: &'a str) -> impl Iterator<Item = &'a LedgerError> + 'a {
        self.errors
            .iter()
            .filter(move |(h, _)| h == hash)
            .map(|(_, e)| e)
    }
}

/// Writes reconciliation state to a ledger store.
pub struct Reconciler<'s, S: LedgerStore> {
    store: &'s mut S,
}

impl<'s, S: LedgerStore> Reconciler<'s, S> {
    pub fn new(store: &'s mut S) -> Self {
        Reconciler { store }
    }

    /// Mark a ledger record as reconciled with the statement `statement_ref`
    pub fn reconcile(&mut self, id: i64, statement_ref: &str) -> Result<(), LedgerError> {
        if id <= 0 {
            return Err(LedgerError::InvalidId(id));
        }
        let statement_ref = statement_ref.trim();
        if statement_ref.is_empty() {
            return Err(LedgerError::MissingStatementRef);
        }
        if self.store.fetch_transaction(id)?.is_none() {
            return Err(LedgerError::NotFound(id.to_string()));
        }

        self.store.update_reconciliation(id, true, Some(statement_ref))?;
        debug!("Reconciled ledger record {} with statement {}.", id, statement_ref);

        Ok(())
    }

    /// Reconcile `(entry hash, ledger id)` pairs.
    /// Ids that are not positive are skipped, failures are collected without stopping.
    pub fn reconcile_multiple<'p, I>(&mut self, pairs: I, statement_ref: &str) -> BatchOutcome
    where
        I: IntoIterator<Item = (&'p str, i64)>,
    {
        let mut outcome = BatchOutcome::default();

        for (hash, id) in pairs {
            if id <= 0 {
                continue;
            }
            match self.reconcile(id, statement_ref) {
                Ok(()) => outcome.reconciled += 1,
                Err(e) => {
                    warn!("Entry {} could not be reconciled: {}", hash, e);
                    outcome.errors.push((hash.to_string(), e));
                }
            }
        }
        info!(
            "Reconciled {} of {} ledger record(s).",
            outcome.reconciled,
            outcome.attempted()
        );

        outcome
    }

    /// Reconcile confirmed pairs and the choices made for ambiguous entries.
    /// A choice is a field `linked_<hash>` whose value is the chosen ledger record id.
    pub fn reconcile_from_form<'f, F>(
        &mut self,
        linked: &[LinkedPair],
        fields: F,
        statement_ref: &str,
    ) -> BatchOutcome
    where
        F: IntoIterator<Item = (&'f str, &'f str)>,
    {
        let mut pairs: Vec<(String, i64)> = linked
            .iter()
            .filter_map(|pair| {
                pair.ledger
                    .ledger_link()
                    .map(|link| (pair.file.hash().to_string(), link.id))
            })
            .collect();

        for (name, value) in fields {
            let hash = match name.strip_prefix(LINKED_FIELD_PREFIX) {
                Some(h) if !h.is_empty() => h,
                _ => continue,
            };
            match value.trim().parse::<i64>() {
                Ok(id) if id > 0 => pairs.push((hash.to_string(), id)),
                _ => debug!("Ignoring choice `{}` for entry {}.", value, hash),
            }
        }

        self.reconcile_multiple(pairs.iter().map(|(h, id)| (h.as_str(), *id)), statement_ref)
    }

    /// Clear a record's reconciliation flag and statement reference
    pub fn cancel_reconciliation(&mut self, id: i64) -> Result<(), LedgerError> {
        if id <= 0 {
            return Err(LedgerError::InvalidId(id));
        }
        if self.store.fetch_transaction(id)?.is_none() {
            return Err(LedgerError::NotFound(id.to_string()));
        }

        self.store.update_reconciliation(id, false, None)?;
        debug!("Cancelled the reconciliation of ledger record {}.", id);

        Ok(())
    }

    /// Whether a record is reconciled. Unknown records are not.
    pub fn is_reconciled(&self, id: i64) -> bool {
        match self.store.fetch_transaction(id) {
            Ok(Some(record)) => record.reconciled,
            _ => false,
        }
    }
}

/// Statement reference (`YYYYMM`) of the period containing `date`
pub fn statement_ref_for(date: NaiveDate) -> String {
    date.format("%Y%m").to_string()
}

/// Statement reference for a period end date given as text.
/// Text that is not a date gives the current month.
pub fn generate_statement_ref(date: &str) -> String {
    let date = parse_date_text(date).unwrap_or_else(|| Local::now().naive_local().date());

    statement_ref_for(date)
}
