//! Where an entry or statement comes from.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Provenance {
    FromFile,
    FromLedger,
}

impl Default for Provenance {
    fn default() -> Self {
        Provenance::FromLedger
    }
}

impl From<Provenance> for String {
    fn from(provenance: Provenance) -> String {
        match provenance {
            Provenance::FromFile => String::from("file"),
            Provenance::FromLedger => String::from("ledger"),
        }
    }
}
