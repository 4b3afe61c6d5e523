//! Resolve the ledger account that owns an IBAN.

/// Anything that can map an IBAN to a ledger account id.
/// Implementations should accept both the grouped (`BE71 0961 ...`) and compact forms.
pub trait AccountLookup {
    fn find_account_by_iban(&self, iban: &str) -> Option<i64>;
}

impl<F> AccountLookup for F
where
    F: Fn(&str) -> Option<i64>,
{
    fn find_account_by_iban(&self, iban: &str) -> Option<i64> {
        self(iban)
    }
}

/// A lookup that never resolves anything
#[derive(Clone, Copy, Debug, Default)]
pub struct NoLookup;

impl AccountLookup for NoLookup {
    fn find_account_by_iban(&self, _iban: &str) -> Option<i64> {
        None
    }
}
