//! Print comparison results.

use camtlink_statement::{
    canonical_amount, AlreadyLinked, EntryRecord, LinkedPair, MatchResult, MatchStatistics,
    MultipleMatch, StatementEntry,
};
use itertools::Itertools;
use serde::Serialize;
use std::collections::BTreeMap;

/// Results of one run, per ledger account
#[derive(Debug, Default)]
pub(crate) struct Comparison {
    pub ibans: BTreeMap<i64, String>,
    pub results: BTreeMap<i64, MatchResult>,
}

impl Comparison {
    pub fn linked(&self) -> Vec<LinkedPair> {
        self.results
            .values()
            .flat_map(|r| r.linked.iter().cloned())
            .collect()
    }

    pub fn statistics(&self) -> MatchStatistics {
        self.results
            .values()
            .map(MatchResult::statistics)
            .fold(MatchStatistics::default(), |sum, s| MatchStatistics {
                linked: sum.linked + s.linked,
                multiples: sum.multiples + s.multiples,
                unlinked: sum.unlinked + s.unlinked,
                already_linked: sum.already_linked + s.already_linked,
                total_to_process: sum.total_to_process + s.total_to_process,
            })
    }

    fn iban(&self, account_id: i64) -> &str {
        self.ibans.get(&account_id).map_or("", String::as_str)
    }
}

/// One line describing an entry
fn describe(entry: &StatementEntry) -> String {
    let source = match entry.ledger_link() {
        Some(link) => format!("ledger #{}", link.id),
        None => String::from("file"),
    };

    format!(
        "{:>12}  {:<10}  {:<10}  {}",
        canonical_amount(&entry.amount()),
        entry.value_date(),
        source,
        entry.name().lines().join(" / ")
    )
}

fn ledger_ref(entry: &StatementEntry) -> String {
    entry
        .ledger_link()
        .map_or_else(|| String::from("?"), |link| format!("#{}", link.id))
}

/// Render the report as text
pub(crate) fn render_text(comparison: &Comparison) -> String {
    let mut out = String::new();

    for (id, result) in &comparison.results {
        out.push_str(&format!("Account {} ({})\n", id, comparison.iban(*id)));

        out.push_str(&format!("  Linked ({})\n", result.linked.len()));
        for LinkedPair { file, ledger } in &result.linked {
            out.push_str(&format!("    {}  <->  {}\n", describe(file), ledger_ref(ledger)));
        }

        out.push_str(&format!("  To choose ({})\n", result.multiples.len()));
        for MultipleMatch { file, candidates } in &result.multiples {
            out.push_str(&format!(
                "    {}  [{}]  candidates: {}\n",
                describe(file),
                file.hash(),
                candidates.iter().map(ledger_ref).join(", ")
            ));
        }

        out.push_str(&format!("  Unlinked ({})\n", result.unlinked.len()));
        for entry in &result.unlinked {
            out.push_str(&format!("    {}\n", describe(entry)));
        }

        out.push_str(&format!("  Already reconciled ({})\n", result.already_linked.len()));
        for AlreadyLinked { file, ledger } in &result.already_linked {
            match file {
                Some(f) => out.push_str(&format!("    {}  <->  {}\n", describe(f), ledger_ref(ledger))),
                None => out.push_str(&format!("    {}\n", describe(ledger))),
            }
        }
    }

    let stats = comparison.statistics();
    out.push_str(&format!(
        "Linked {}, to choose {}, unlinked {}, already reconciled {}. {} to confirm.\n",
        stats.linked, stats.multiples, stats.unlinked, stats.already_linked, stats.total_to_process
    ));

    out
}

#[derive(Debug, Serialize)]
struct EntryReport {
    provenance: String,
    ledger_id: Option<i64>,
    reconciled: bool,
    #[serde(flatten)]
    entry: EntryRecord,
}

impl From<&StatementEntry> for EntryReport {
    fn from(entry: &StatementEntry) -> Self {
        EntryReport {
            provenance: String::from(entry.provenance()),
            ledger_id: entry.ledger_link().map(|l| l.id),
            reconciled: entry.is_reconciled(),
            entry: EntryRecord::from(entry),
        }
    }
}

#[derive(Debug, Serialize)]
struct PairReport {
    file: Option<EntryReport>,
    ledger: EntryReport,
}

#[derive(Debug, Serialize)]
struct MultipleReport {
    file: EntryReport,
    candidates: Vec<EntryReport>,
}

#[derive(Debug, Serialize)]
struct AccountReport<'a> {
    account_id: i64,
    iban: &'a str,
    linked: Vec<PairReport>,
    multiples: Vec<MultipleReport>,
    unlinked: Vec<EntryReport>,
    already_linked: Vec<PairReport>,
    statistics: MatchStatistics,
}

/// Render the report as JSON
pub(crate) fn render_json(comparison: &Comparison) -> serde_json::Result<String> {
    let accounts: Vec<AccountReport> = comparison
        .results
        .iter()
        .map(|(id, result)| AccountReport {
            account_id: *id,
            iban: comparison.iban(*id),
            linked: result
                .linked
                .iter()
                .map(|p| PairReport {
                    file: Some(EntryReport::from(&p.file)),
                    ledger: EntryReport::from(&p.ledger),
                })
                .collect(),
            multiples: result
                .multiples
                .iter()
                .map(|m| MultipleReport {
                    file: EntryReport::from(&m.file),
                    candidates: m.candidates.iter().map(EntryReport::from).collect(),
                })
                .collect(),
            unlinked: result.unlinked.iter().map(EntryReport::from).collect(),
            already_linked: result
                .already_linked
                .iter()
                .map(|a| PairReport {
                    file: a.file.as_ref().map(EntryReport::from),
                    ledger: EntryReport::from(&a.ledger),
                })
                .collect(),
            statistics: result.statistics(),
        })
        .collect();

    serde_json::to_string_pretty(&accounts)
}
