use camtlink_statement::{
    LedgerLink, MatchResult, MatchStatistics, Provenance, Statement, StatementCollection,
    StatementEntry, StatementMatcher,
};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn file_entry(amount: &str, date: &str, name: &str) -> StatementEntry {
    StatementEntry::new(dec(amount), date, name, "", None)
}

fn ledger_entry(id: i64, amount: &str, date: &str, reconciled: bool) -> StatementEntry {
    let mut entry = StatementEntry::new(dec(amount), date, &format!("ledger {}", id), "", None);
    entry.set_ledger_link(Some(LedgerLink::new(id, reconciled)));

    entry
}

fn statement(provenance: Provenance, entries: Vec<StatementEntry>) -> Statement {
    let mut stmt = Statement::new("BE71 0961 2345 6769", Some(1), provenance);
    for entry in entries {
        stmt.add_entry(entry);
    }

    stmt
}

fn ledger_id(entry: &StatementEntry) -> i64 {
    entry.ledger_link().unwrap().id
}

#[track_caller]
fn check_statistics(result: &MatchResult, expected: (usize, usize, usize, usize)) {
    let observed = result.statistics();
    assert_eq!(
        expected,
        (
            observed.linked,
            observed.multiples,
            observed.unlinked,
            observed.already_linked
        )
    );
}

/// Every input entry appears in exactly one bucket.
/// Entries are told apart by their hash, so inputs must not share hashes.
#[track_caller]
fn check_partition(file: &Statement, ledger: &Statement, result: &MatchResult) {
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    let mut count = |e: &StatementEntry| *seen.entry(e.hash().to_string()).or_default() += 1;

    for pair in &result.linked {
        count(&pair.file);
        count(&pair.ledger);
    }
    for multiple in &result.multiples {
        count(&multiple.file);
        multiple.candidates.iter().for_each(&mut count);
    }
    result.unlinked.iter().for_each(&mut count);
    for settled in &result.already_linked {
        if let Some(f) = &settled.file {
            count(f);
        }
        count(&settled.ledger);
    }

    let inputs: Vec<&StatementEntry> = file.entries().iter().chain(ledger.entries()).collect();
    assert_eq!(inputs.len(), seen.len());
    for entry in inputs {
        assert_eq!(Some(&1), seen.get(entry.hash()), "entry {} is not in exactly one bucket", entry);
    }
}

#[test]
fn exact_match_is_linked() {
    let file = statement(Provenance::FromFile, vec![file_entry("1500.00", "2024-01-15", "Invoice")]);
    let ledger = statement(
        Provenance::FromLedger,
        vec![ledger_entry(10, "1500.00", "2024-01-15", false)],
    );
    let result = StatementMatcher::default().compare(&file, &ledger);

    check_statistics(&result, (1, 0, 0, 0));
    assert_eq!(10, ledger_id(&result.linked[0].ledger));
    assert!(result.linked[0].file.is_from_file());
    assert!(!result.linked[0].ledger.is_from_file());
}

#[test]
fn match_within_tolerance_is_linked() {
    let file = statement(Provenance::FromFile, vec![file_entry("1500.00", "2024-01-15", "Invoice")]);
    let ledger = statement(
        Provenance::FromLedger,
        vec![ledger_entry(10, "1500.00", "2024-01-16", false)],
    );
    let result = StatementMatcher::new(1).compare(&file, &ledger);

    check_statistics(&result, (1, 0, 0, 0));
}

#[test]
fn one_cent_difference_never_matches() {
    let file = statement(Provenance::FromFile, vec![file_entry("1500.00", "2024-01-15", "Invoice")]);
    let ledger = statement(
        Provenance::FromLedger,
        vec![ledger_entry(10, "1500.01", "2024-01-15", false)],
    );
    let result = StatementMatcher::new(30).compare(&file, &ledger);

    check_statistics(&result, (0, 0, 2, 0));
    check_partition(&file, &ledger, &result);
}

#[test]
fn two_candidates_are_multiples() {
    let file = statement(Provenance::FromFile, vec![file_entry("1500.00", "2024-01-15", "Invoice")]);
    let ledger = statement(
        Provenance::FromLedger,
        vec![
            ledger_entry(10, "1500.00", "2024-01-15", false),
            ledger_entry(11, "1500.00", "2024-01-15", false),
        ],
    );
    let result = StatementMatcher::default().compare(&file, &ledger);

    check_statistics(&result, (0, 1, 0, 0));
    let ids: Vec<i64> = result.multiples[0].candidates.iter().map(ledger_id).collect();
    assert_eq!(vec![10, 11], ids);
    check_partition(&file, &ledger, &result);
}

#[test]
fn amounts_compare_at_cent_precision() {
    let file = statement(Provenance::FromFile, vec![file_entry("1500", "2024-01-15", "Invoice")]);
    let ledger = statement(
        Provenance::FromLedger,
        vec![ledger_entry(10, "1500.000", "2024-01-15", false)],
    );
    let result = StatementMatcher::default().compare(&file, &ledger);

    check_statistics(&result, (1, 0, 0, 0));
}

#[test]
fn debit_does_not_match_credit() {
    let file = statement(Provenance::FromFile, vec![file_entry("-250.00", "2024-01-20", "Rent")]);
    let ledger = statement(
        Provenance::FromLedger,
        vec![ledger_entry(10, "250.00", "2024-01-20", false)],
    );
    let result = StatementMatcher::default().compare(&file, &ledger);

    check_statistics(&result, (0, 0, 2, 0));
}

#[track_caller]
fn check_tolerance(tolerance: i64, ledger_date: &str, expected_linked: usize) {
    let mut matcher = StatementMatcher::default();
    matcher.set_date_tolerance(tolerance);
    let file = statement(Provenance::FromFile, vec![file_entry("99.99", "2024-01-15", "x")]);
    let ledger = statement(
        Provenance::FromLedger,
        vec![ledger_entry(1, "99.99", ledger_date, false)],
    );

    assert_eq!(expected_linked, matcher.compare(&file, &ledger).linked.len());
}

#[test]
fn tolerance_boundaries() {
    check_tolerance(1, "2024-01-16", 1);
    check_tolerance(1, "2024-01-14", 1);
    check_tolerance(1, "2024-01-17", 0);
    check_tolerance(0, "2024-01-15", 1);
    check_tolerance(0, "2024-01-16", 0);
    check_tolerance(-3, "2024-01-16", 0);
    check_tolerance(3, "2024-01-18", 1);
}

#[test]
fn unparseable_dates_never_match() {
    let file = statement(
        Provenance::FromFile,
        vec![file_entry("10.00", "", "no date"), file_entry("20.00", "2024-01-15", "bad ledger")],
    );
    let ledger = statement(
        Provenance::FromLedger,
        vec![
            ledger_entry(1, "10.00", "2024-01-15", false),
            ledger_entry(2, "20.00", "not a date", false),
        ],
    );
    let result = StatementMatcher::default().compare(&file, &ledger);

    check_statistics(&result, (0, 0, 4, 0));
    check_partition(&file, &ledger, &result);
}

#[test]
fn reconciled_unique_match_is_already_linked() {
    let file = statement(Provenance::FromFile, vec![file_entry("1500.00", "2024-01-15", "Invoice")]);
    let ledger = statement(
        Provenance::FromLedger,
        vec![ledger_entry(10, "1500.00", "2024-01-15", true)],
    );
    let result = StatementMatcher::default().compare(&file, &ledger);

    check_statistics(&result, (0, 0, 0, 1));
    assert!(result.already_linked[0].file.is_some());
    assert_eq!(10, ledger_id(&result.already_linked[0].ledger));
    check_partition(&file, &ledger, &result);
}

#[test]
fn partially_settled_candidates_link_the_open_one() {
    let file = statement(Provenance::FromFile, vec![file_entry("1500.00", "2024-01-15", "Invoice")]);
    let ledger = statement(
        Provenance::FromLedger,
        vec![
            ledger_entry(10, "1500.00", "2024-01-15", true),
            ledger_entry(11, "1500.00", "2024-01-15", false),
        ],
    );
    let result = StatementMatcher::default().compare(&file, &ledger);

    assert_eq!(1, result.linked.len());
    assert_eq!(11, ledger_id(&result.linked[0].ledger));
    assert!(result.multiples.is_empty());
    // the settled candidate is only reported as a ledger-side settlement
    assert_eq!(1, result.already_linked.len());
    assert!(result.already_linked[0].file.is_none());
    assert_eq!(10, ledger_id(&result.already_linked[0].ledger));
    check_partition(&file, &ledger, &result);
}

#[test]
fn fully_settled_candidates_report_the_first() {
    let file = statement(Provenance::FromFile, vec![file_entry("1500.00", "2024-01-15", "Invoice")]);
    let ledger = statement(
        Provenance::FromLedger,
        vec![
            ledger_entry(10, "1500.00", "2024-01-15", true),
            ledger_entry(11, "1500.00", "2024-01-16", true),
        ],
    );
    let result = StatementMatcher::default().compare(&file, &ledger);

    check_statistics(&result, (0, 0, 0, 2));
    assert_eq!(10, ledger_id(&result.already_linked[0].ledger));
    assert!(result.already_linked[0].file.is_some());
    assert!(result.already_linked[1].file.is_none());
    check_partition(&file, &ledger, &result);
}

#[test]
fn unclaimed_ledger_entries_are_swept() {
    let file = statement(Provenance::FromFile, vec![]);
    let ledger = statement(
        Provenance::FromLedger,
        vec![
            ledger_entry(1, "10.00", "2024-01-15", false),
            ledger_entry(2, "20.00", "2024-01-15", true),
        ],
    );
    let result = StatementMatcher::default().compare(&file, &ledger);

    check_statistics(&result, (0, 0, 1, 1));
    assert_eq!(1, ledger_id(&result.unlinked[0]));
    assert!(result.already_linked[0].file.is_none());
}

#[test]
fn mixed_statement() {
    let file = statement(
        Provenance::FromFile,
        vec![
            file_entry("1500.00", "2024-01-15", "Invoice"),
            file_entry("-250.00", "2024-01-20", "Rent"),
            file_entry("-75.25", "2024-01-25", "Groceries"),
            file_entry("42.00", "2024-01-28", "Refund"),
            file_entry("-9.99", "2024-01-30", "Unknown"),
        ],
    );
    let ledger = statement(
        Provenance::FromLedger,
        vec![
            ledger_entry(1, "1500.00", "2024-01-14", false),
            ledger_entry(2, "-250.00", "2024-01-20", false),
            ledger_entry(3, "-250.00", "2024-01-21", false),
            ledger_entry(4, "-75.25", "2024-01-25", true),
            ledger_entry(5, "42.00", "2024-01-28", true),
            ledger_entry(6, "42.00", "2024-01-29", false),
            ledger_entry(7, "300.00", "2024-01-02", false),
            ledger_entry(8, "12.00", "2024-01-03", true),
        ],
    );
    let result = StatementMatcher::new(1).compare(&file, &ledger);

    let linked: Vec<i64> = result.linked.iter().map(|p| ledger_id(&p.ledger)).collect();
    assert_eq!(vec![1, 6], linked);
    assert_eq!(1, result.multiples.len());
    assert_eq!("Rent", result.multiples[0].file.name());
    // file entries are classified before the ledger sweep
    assert_eq!(2, result.unlinked.len());
    assert_eq!("Unknown", result.unlinked[0].name());
    assert_eq!(7, ledger_id(&result.unlinked[1]));
    check_partition(&file, &ledger, &result);

    let expected = MatchStatistics {
        linked: 2,
        multiples: 1,
        unlinked: 2,
        already_linked: 3,
        total_to_process: 3,
    };
    assert_eq!(expected, StatementMatcher::new(1).statistics(&result));
}

fn referenced_entry(amount: &str, date: &str, reference: &str) -> StatementEntry {
    StatementEntry::new(dec(amount), date, "Card payment", "", Some(reference.to_string()))
}

#[test]
fn repeated_file_entries_claim_one_ledger_entry_each() {
    let file = statement(
        Provenance::FromFile,
        vec![
            referenced_entry("-9.99", "2024-01-15", "REF1"),
            referenced_entry("-9.99", "2024-01-15", "REF2"),
        ],
    );
    let ledger = statement(
        Provenance::FromLedger,
        vec![ledger_entry(10, "-9.99", "2024-01-15", false)],
    );
    let result = StatementMatcher::default().compare(&file, &ledger);

    check_statistics(&result, (1, 0, 1, 0));
    assert_eq!("REF1", result.linked[0].file.hash());
    assert_eq!(10, ledger_id(&result.linked[0].ledger));
    assert_eq!("REF2", result.unlinked[0].hash());
    check_partition(&file, &ledger, &result);
}

#[test]
fn repeated_file_entries_pair_with_repeated_ledger_entries() {
    let file = statement(
        Provenance::FromFile,
        vec![
            referenced_entry("-9.99", "2024-01-15", "REF1"),
            referenced_entry("-9.99", "2024-01-15", "REF2"),
            referenced_entry("-9.99", "2024-01-15", "REF3"),
        ],
    );
    let ledger = statement(
        Provenance::FromLedger,
        vec![
            ledger_entry(10, "-9.99", "2024-01-15", true),
            ledger_entry(11, "-9.99", "2024-01-15", false),
        ],
    );
    let result = StatementMatcher::default().compare(&file, &ledger);

    // REF1 sees the settled 10 and the open 11, so it links the open one
    assert_eq!(1, result.linked.len());
    assert_eq!("REF1", result.linked[0].file.hash());
    assert_eq!(11, ledger_id(&result.linked[0].ledger));
    // REF2 is left with the settled 10
    assert_eq!(1, result.already_linked.len());
    assert_eq!(Some("REF2"), result.already_linked[0].file.as_ref().map(|f| f.hash()));
    assert_eq!(10, ledger_id(&result.already_linked[0].ledger));
    // nothing is left for REF3
    assert_eq!(1, result.unlinked.len());
    assert_eq!("REF3", result.unlinked[0].hash());
    check_partition(&file, &ledger, &result);
}

#[test]
fn multiple_candidates_are_not_offered_twice() {
    let file = statement(
        Provenance::FromFile,
        vec![
            referenced_entry("-9.99", "2024-01-15", "REF1"),
            referenced_entry("-9.99", "2024-01-15", "REF2"),
        ],
    );
    let ledger = statement(
        Provenance::FromLedger,
        vec![
            ledger_entry(10, "-9.99", "2024-01-15", false),
            ledger_entry(11, "-9.99", "2024-01-16", false),
        ],
    );
    let result = StatementMatcher::default().compare(&file, &ledger);

    check_statistics(&result, (0, 1, 1, 0));
    assert_eq!("REF1", result.multiples[0].file.hash());
    assert_eq!("REF2", result.unlinked[0].hash());
    check_partition(&file, &ledger, &result);
}

#[test]
fn find_matches_scans_every_candidate() {
    let matcher = StatementMatcher::new(2);
    let entry = file_entry("5.00", "2024-01-10", "Coffee");
    let candidates = vec![
        ledger_entry(1, "5.00", "2024-01-08", false),
        ledger_entry(2, "5.00", "2024-01-13", false),
        ledger_entry(3, "5.00", "2024-01-12", true),
        ledger_entry(4, "5.01", "2024-01-10", false),
    ];
    let observed: Vec<i64> = matcher
        .find_matches(&entry, &candidates)
        .into_iter()
        .map(ledger_id)
        .collect();

    assert_eq!(vec![1, 3], observed);
}

#[test]
fn is_reconciled_reads_the_link() {
    let matcher = StatementMatcher::default();

    assert!(!matcher.is_reconciled(&file_entry("1.00", "2024-01-01", "no link")));
    assert!(!matcher.is_reconciled(&ledger_entry(1, "1.00", "2024-01-01", false)));
    assert!(matcher.is_reconciled(&ledger_entry(1, "1.00", "2024-01-01", true)));
}

#[test]
fn compare_accounts_on_either_side() {
    let mut file_stmt = Statement::new("BE71 0961 2345 6769", Some(1), Provenance::FromFile);
    file_stmt.add_entry(file_entry("100.00", "2024-01-05", "Only in file"));
    let mut ledger_one = Statement::new("BE71 0961 2345 6769", Some(1), Provenance::FromLedger);
    ledger_one.add_entry(ledger_entry(1, "100.00", "2024-01-05", false));
    let mut ledger_two = Statement::new("DE89 3704 0044 0532 0130 00", Some(2), Provenance::FromLedger);
    ledger_two.add_entry(ledger_entry(2, "7.00", "2024-01-06", false));

    let mut file_side = StatementCollection::new();
    file_side.insert(1, file_stmt);
    let mut file_only = Statement::new("FR76 3000 6000 0112 3456 7890 189", Some(3), Provenance::FromFile);
    file_only.add_entry(file_entry("8.00", "2024-01-07", "No ledger"));
    file_side.insert(3, file_only);

    let mut ledger_side = StatementCollection::new();
    ledger_side.insert(1, ledger_one);
    ledger_side.insert(2, ledger_two);

    let results = StatementMatcher::default().compare_multiple(&file_side, &ledger_side);

    assert_eq!(vec![1, 2, 3], results.keys().copied().collect::<Vec<i64>>());
    assert_eq!(1, results[&1].linked.len());
    assert_eq!(1, results[&2].unlinked.len());
    assert!(!results[&2].unlinked[0].is_from_file());
    assert_eq!(1, results[&3].unlinked.len());
    assert!(results[&3].unlinked[0].is_from_file());
}

#[test]
fn compare_nothing() {
    let results =
        StatementMatcher::default().compare_multiple(&StatementCollection::new(), &StatementCollection::new());

    assert!(results.is_empty());
}
