//! The commands: parse statements, load the ledger, compare, and apply.

use crate::cfg::Config;
use crate::cli::{CompareArgs, ReconcileArgs, StatementArgs};
use crate::report::{render_json, render_text, Comparison};
use anyhow::{bail, Context};
use camtlink_ledger::{
    generate_statement_ref, statement_ref_for, LedgerStatementLoader, Reconciler, StoreLookup,
    TomlLedger,
};
use camtlink_statement::{ParseError, Statement, StatementCollection, StatementFileParser};
use camtlink_utils::parse_date_text;
use chrono::{Duration, NaiveDate};
use log::{error, info};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Report how every statement entry relates to the ledger
pub(crate) fn compare(conf: &Config, args: &CompareArgs) -> anyhow::Result<()> {
    let ledger = conf.open_ledger()?;
    let comparison = compare_with_ledger(conf, &ledger, &args.statements)?.0;

    match args.json {
        true => println!("{}", render_json(&comparison)?),
        false => print!("{}", render_text(&comparison)),
    }

    Ok(())
}

/// Reconcile the linked entries and the chosen candidates, then save the ledger
pub(crate) fn reconcile(conf: &Config, args: &ReconcileArgs) -> anyhow::Result<()> {
    let mut ledger = conf.open_ledger()?;
    let (comparison, stmts) = compare_with_ledger(conf, &ledger, &args.statements)?;

    let statement_ref = match &args.statement_ref {
        Some(text) => resolve_statement_ref(text),
        None => default_statement_ref(&stmts, &comparison),
    };
    let choices = args
        .choices
        .iter()
        .map(|c| parse_choice(c))
        .collect::<anyhow::Result<Vec<(String, String)>>>()?;

    let linked = comparison.linked();
    let outcome = Reconciler::new(&mut ledger).reconcile_from_form(
        &linked,
        choices.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        &statement_ref,
    );

    if outcome.reconciled > 0 {
        ledger.save().with_context(|| {
            format!(
                "Error saving the ledger to `{}`.",
                ledger.path().display()
            )
        })?;
    }

    println!(
        "{} of {} reconciled with statement {}.",
        outcome.reconciled,
        outcome.attempted(),
        statement_ref
    );
    for (hash, e) in &outcome.errors {
        println!("  {}: {}", hash, e);
    }

    let stats = comparison.statistics();
    if stats.multiples > 0 {
        println!(
            "{} entries have several candidates, choose one with `--choose <HASH>=<ID>`.",
            stats.multiples
        );
    }

    Ok(())
}

/// Cancel a ledger record's reconciliation and save the ledger
pub(crate) fn cancel(conf: &Config, id: i64) -> anyhow::Result<()> {
    let mut ledger = conf.open_ledger()?;

    Reconciler::new(&mut ledger)
        .cancel_reconciliation(id)
        .with_context(|| format!("Error cancelling the reconciliation of ledger record {}.", id))?;
    ledger
        .save()
        .with_context(|| format!("Error saving the ledger to `{}`.", ledger.path().display()))?;
    println!("Cancelled the reconciliation of ledger record {}.", id);

    Ok(())
}

/// Parse the statements, load the ledger for their accounts and compare both
fn compare_with_ledger(
    conf: &Config,
    ledger: &TomlLedger,
    args: &StatementArgs,
) -> anyhow::Result<(Comparison, Vec<Statement>)> {
    let parser = StatementFileParser::new(StoreLookup(ledger));
    let mut stmts = Vec::new();
    for file in statement_files(&args.path)? {
        match parser.parse_file(&file) {
            Ok(parsed) => stmts.extend(parsed),
            Err(ParseError::UnsafeInput) => {
                error!("Refusing `{}`: it declares XML entities.", file.display());
                bail!("Statement file `{}` is unsafe to parse.", file.display());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Error parsing statement file `{}`.", file.display()))
            }
        }
    }

    let file_side = StatementCollection::from(stmts.clone());
    if file_side.is_empty() {
        bail!("None of the statements belongs to an account in the ledger.");
    }
    let (start, end) = date_window(&file_side, args, conf.matcher().date_tolerance())?;

    let loader = LedgerStatementLoader::with_translations(ledger, conf.translations().clone());
    let mut ledger_side = StatementCollection::new();
    for id in file_side.account_ids() {
        let loaded = loader
            .load(start, end, Some(*id))
            .with_context(|| format!("Error loading ledger entries of account {}.", id))?;
        for (account_id, stmt) in loaded {
            ledger_side.insert(account_id, stmt);
        }
    }
    info!("Comparing statements with ledger entries from {} to {}.", start, end);

    let comparison = Comparison {
        ibans: file_side
            .iter()
            .map(|(id, stmt)| (*id, stmt.formatted_iban()))
            .collect(),
        results: conf.matcher().compare_multiple(&file_side, &ledger_side),
    };

    Ok((comparison, stmts))
}

/// The statement file itself, or the `.xml` files directly inside a directory
fn statement_files(path: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if !path.exists() {
        bail!("Statement path `{}` does not exist.", path.display());
    }
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|p| p.ok())
        .map(|p| p.into_path())
        .filter(|p| p.is_file() && is_xml(p))
        .collect();
    files.sort();

    if files.is_empty() {
        bail!("No statement files found in `{}`.", path.display());
    }

    Ok(files)
}

fn is_xml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("xml"))
}

/// Ledger dates to compare with: the given bounds, else the span of the statement entries
fn date_window(
    stmts: &StatementCollection,
    args: &StatementArgs,
    tolerance: u32,
) -> anyhow::Result<(NaiveDate, NaiveDate)> {
    let dates: Vec<NaiveDate> = stmts
        .iter()
        .flat_map(|(_, stmt)| stmt.entries().iter().filter_map(|e| e.date()))
        .collect();
    // ledger records may lie up to `tolerance` days outside the statement's own dates
    let margin = Duration::days(i64::from(tolerance));

    let start = match &args.from {
        Some(text) => parse_date_text(text).with_context(|| format!("Invalid `--from` date `{}`.", text))?,
        None => match dates.iter().min() {
            Some(d) => d.checked_sub_signed(margin).unwrap_or(*d),
            None => bail!("The statements hold no dated entries, give `--from` and `--to`."),
        },
    };
    let end = match &args.to {
        Some(text) => parse_date_text(text).with_context(|| format!("Invalid `--to` date `{}`.", text))?,
        None => match dates.iter().max() {
            Some(d) => d.checked_add_signed(margin).unwrap_or(*d),
            None => bail!("The statements hold no dated entries, give `--from` and `--to`."),
        },
    };

    if start > end {
        bail!("The date window from {} to {} is empty.", start, end);
    }

    Ok((start, end))
}

/// A `YYYYMM` reference is kept as is, anything else is read as a date
fn resolve_statement_ref(text: &str) -> String {
    let text = text.trim();
    match text.len() == 6 && text.chars().all(|c| c.is_ascii_digit()) {
        true => text.to_string(),
        false => generate_statement_ref(text),
    }
}

/// Month of the statement file's creation, else of the last compared date
fn default_statement_ref(stmts: &[Statement], comparison: &Comparison) -> String {
    if let Some(created) = stmts.iter().find_map(|s| s.creation_date()) {
        return generate_statement_ref(created);
    }

    let last = comparison
        .results
        .values()
        .flat_map(|r| r.linked.iter().filter_map(|p| p.file.date()))
        .max();
    match last {
        Some(date) => statement_ref_for(date),
        None => generate_statement_ref(""),
    }
}

/// Read a `HASH=ID` choice as the form field selecting a candidate
fn parse_choice(choice: &str) -> anyhow::Result<(String, String)> {
    match choice.split_once('=') {
        Some((hash, id)) if !hash.trim().is_empty() && !id.trim().is_empty() => {
            Ok((format!("linked_{}", hash.trim()), id.trim().to_string()))
        }
        _ => bail!("Invalid choice `{}`, expected `<HASH>=<ID>`.", choice),
    }
}
