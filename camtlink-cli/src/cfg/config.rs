//! Ledger location and matching options.

use crate::cli::CliOpts;
use anyhow::{bail, Context};
use camtlink_ledger::TomlLedger;
use camtlink_statement::{StatementMatcher, DEFAULT_DATE_TOLERANCE};
use camtlink_utils::{expand_tilde, read_file_string};
use log::warn;
use std::collections::HashMap;
use std::convert::TryFrom;
use std::path::{Path, PathBuf};
use toml::{map::Map, Value};

/// Program configuration
#[derive(Debug)]
pub struct Config {
    /// Path of the config file
    path: PathBuf,

    /// Ledger file, relative paths resolved against the config file's directory
    ledger_path: PathBuf,

    /// Days a statement entry and a ledger entry may be apart
    date_tolerance: i64,

    /// Display text of translation keys in ledger labels
    translations: HashMap<String, String>,
}

impl Config {
    /// Get the path of the config file
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    pub fn ledger_path(&self) -> &Path {
        self.ledger_path.as_path()
    }

    pub fn translations(&self) -> &HashMap<String, String> {
        &self.translations
    }

    /// A matcher using the configured date tolerance
    pub fn matcher(&self) -> StatementMatcher {
        let mut matcher = StatementMatcher::default();
        matcher.set_date_tolerance(self.date_tolerance);

        matcher
    }

    /// Open the configured ledger
    pub fn open_ledger(&self) -> anyhow::Result<TomlLedger> {
        TomlLedger::open(self.ledger_path()).with_context(|| {
            format!(
                "Error opening the ledger configured in `{}`.",
                self.path().display()
            )
        })
    }

    /// Parse configuration text read from `path`
    pub fn from_toml_str(path: &Path, config_str: &str) -> anyhow::Result<Self> {
        let config_toml = match config_str.parse() {
            Ok(Value::Table(t)) => t,
            Ok(_) => bail!(
                "Error parsing configuration file `{}`.\nPlease check the configuration and try again.",
                path.display(),
            ),
            Err(e) => return Err(e).with_context(|| format!("Error parsing configuration file `{}`.\nPlease check the configuration and try again.", path.display())),
        };

        let ledger_path = match config_toml.get("Ledger") {
            Some(Value::Table(table)) => parse_ledger_path(path, table)?,
            Some(_) => bail!("Error parsing the `[Ledger]` table in configuration file `{}`.", path.display()),
            None => bail!(
                "No `[Ledger]` table found in configuration file `{}`.\nPlease check the configuration and try again.",
                path.display(),
            ),
        };

        let date_tolerance = match config_toml.get("Matching") {
            Some(Value::Table(table)) => parse_date_tolerance(table)?,
            Some(_) => bail!("Error parsing the `[Matching]` table in configuration file `{}`.", path.display()),
            None => i64::from(DEFAULT_DATE_TOLERANCE),
        };

        let translations = match config_toml.get("Translations") {
            Some(Value::Table(table)) => parse_translations(table),
            Some(_) => bail!("Error parsing the `[Translations]` table in configuration file `{}`.", path.display()),
            None => HashMap::new(),
        };

        Ok(Config {
            path: path.to_path_buf(),
            ledger_path,
            date_tolerance,
            translations,
        })
    }
}

/// Extract the ledger file location
fn parse_ledger_path(cfg_path: &Path, table: &Map<String, Value>) -> anyhow::Result<PathBuf> {
    let raw = match table.get("path") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim(),
        _ => bail!(
            "Missing ledger `path` in the `[Ledger]` table of configuration file `{}`.",
            cfg_path.display()
        ),
    };

    // replace any tildes
    let path = expand_tilde(raw).unwrap_or_else(|| PathBuf::from(raw));
    match path.is_absolute() {
        true => Ok(path),
        false => Ok(cfg_path
            .parent()
            .map(|dir| dir.join(&path))
            .unwrap_or(path)),
    }
}

/// Extract the matching date tolerance
fn parse_date_tolerance(table: &Map<String, Value>) -> anyhow::Result<i64> {
    match table.get("date_tolerance") {
        Some(Value::Integer(days)) => {
            if *days < 0 {
                warn!("Negative date tolerance {} is treated as 0.", days);
            }
            Ok(*days)
        }
        Some(v) => bail!("`date_tolerance` must be a whole number of days, not `{}`.", v),
        None => Ok(i64::from(DEFAULT_DATE_TOLERANCE)),
    }
}

/// Extract the label translations, skipping anything that is not text
fn parse_translations(table: &Map<String, Value>) -> HashMap<String, String> {
    table
        .iter()
        .filter_map(|(key, value)| match value {
            Value::String(text) => Some((key.to_string(), text.to_string())),
            _ => {
                warn!("Translation of `{}` is not text, ignoring it.", key);
                None
            }
        })
        .collect()
}

impl TryFrom<&CliOpts> for Config {
    type Error = anyhow::Error;

    fn try_from(value: &CliOpts) -> anyhow::Result<Self, Self::Error> {
        if !value.config().exists() {
            bail!(
                "Configuration file `{}` does not exist.",
                value.config().display()
            );
        }

        let config_str = read_file_string(value.config()).with_context(|| {
            format!(
                "Error reading contents of configuration file `{}`.\nPlease check the configuration and try again.",
                value.config().display()
            )
        })?;

        Config::from_toml_str(value.config(), &config_str)
    }
}
