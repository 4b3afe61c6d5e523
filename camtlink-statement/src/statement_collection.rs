//! Statements of several accounts, keyed by ledger account id.

use log::{debug, warn};
use std::collections::btree_map::{self, BTreeMap};

use super::Statement;

/// One statement per ledger account
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatementCollection {
    inner: BTreeMap<i64, Statement>,
}

impl StatementCollection {
    /// Create a new collection of statements.
    pub fn new() -> Self {
        StatementCollection::default()
    }

    /// Access the statement belonging to an account
    pub fn get(&self, account_id: i64) -> Option<&Statement> {
        self.inner.get(&account_id)
    }

    /// Insert a statement into the collection
    pub fn insert(&mut self, account_id: i64, stmt: Statement) -> Option<Statement> {
        self.inner.insert(account_id, stmt)
    }

    /// Account ids present in the collection, in ascending order
    pub fn account_ids(&self) -> impl Iterator<Item = &i64> {
        self.inner.keys()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, i64, Statement> {
        self.inner.iter()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl From<Vec<Statement>> for StatementCollection {
    /// Key statements by their account.
    /// Statements of the same account are merged in order, statements whose
    /// account could not be resolved are left out.
    fn from(stmts: Vec<Statement>) -> Self {
        let mut sc = Self::new();

        for stmt in stmts {
            let id = match stmt.account_id() {
                Some(id) => id,
                None => {
                    warn!(
                        "No ledger account found for IBAN `{}`, its statement is left out.",
                        stmt.formatted_iban()
                    );
                    continue;
                }
            };

            match sc.inner.get_mut(&id) {
                Some(existing) => {
                    debug!("Merging another statement into account {}.", id);
                    for entry in stmt.entries() {
                        existing.add_entry(entry.clone());
                    }
                }
                None => {
                    sc.insert(id, stmt);
                }
            }
        }

        sc
    }
}

impl From<BTreeMap<i64, Statement>> for StatementCollection {
    fn from(inner: BTreeMap<i64, Statement>) -> Self {
        StatementCollection { inner }
    }
}

impl IntoIterator for StatementCollection {
    type Item = (i64, Statement);
    type IntoIter = btree_map::IntoIter<i64, Statement>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Provenance;
    use rust_decimal::Decimal;

    #[test]
    fn unresolved_statements_are_left_out() {
        let stmts = vec![
            Statement::new("BE71 0961 2345 6769", Some(2), Provenance::FromFile),
            Statement::new("FR76 3000 6000 0112 3456 7890 189", None, Provenance::FromFile),
            Statement::new("DE89 3704 0044 0532 0130 00", Some(1), Provenance::FromFile),
        ];
        let sc = StatementCollection::from(stmts);

        assert_eq!(2, sc.len());
        assert_eq!(vec![1, 2], sc.account_ids().copied().collect::<Vec<i64>>());
        assert_eq!("BE71 0961 2345 6769", sc.get(2).unwrap().iban());
    }

    #[test]
    fn statements_of_one_account_are_merged() {
        let mut january = Statement::new("BE71 0961 2345 6769", Some(1), Provenance::FromFile);
        january.create_entry(Decimal::new(1000, 2), "2024-01-31", "January", "", None);
        let mut february = Statement::new("BE71 0961 2345 6769", Some(1), Provenance::FromFile);
        february.create_entry(Decimal::new(2000, 2), "2024-02-29", "February", "", None);
        february.create_entry(Decimal::new(-500, 2), "2024-02-29", "Fee", "", None);

        let sc = StatementCollection::from(vec![january, february]);

        assert_eq!(1, sc.len());
        let names: Vec<&str> = sc.get(1).unwrap().entries().iter().map(|e| e.name()).collect();
        assert_eq!(vec!["January", "February", "Fee"], names);
    }
}
