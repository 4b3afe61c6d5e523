//! Various convenience and utility functions used throughout the codebase.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use dirs_next::home_dir;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Date formats accepted for free-form date text, tried in order.
const DATE_FORMATS: [&str; 3] = ["%d/%m/%Y", "%Y-%m-%d", "%Y%m%d"];

/// Datetime formats accepted for free-form date text, tried in order.
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// Read a text file (configuration, ledger) into a string.
pub fn read_file_string(path: &Path) -> io::Result<String> {
    // open the file for parsing
    let mut file = File::open(path)?;

    // read file contents into a string
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    Ok(contents)
}

/// Read a file's raw bytes, without assuming any encoding.
pub fn read_file_bytes(path: &Path) -> io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    Ok(bytes)
}

/// Replace the `~` character at the start of a path with the home directory.
/// See <https://stackoverflow.com/a/54306906/7416009>
pub fn expand_tilde<P: AsRef<Path>>(path: P) -> Option<PathBuf> {
    let p = path.as_ref();
    if !p.starts_with("~") {
        return Some(p.to_path_buf());
    }
    if p == Path::new("~") {
        return home_dir();
    }

    home_dir().and_then(|mut h| {
        if h == Path::new("/") {
            // base case: `h` root directory;
            // don't prepend extra `/`, just drop the tilde.
            p.strip_prefix("~").ok().map(Path::to_path_buf)
        } else {
            h.push(p.strip_prefix("~/").ok()?);
            Some(h)
        }
    })
}

/// Remove every space from an IBAN.
pub fn compact_iban(iban: &str) -> String {
    iban.chars().filter(|c| *c != ' ').collect()
}

/// Group an IBAN into blocks of 4 characters separated by a single space.
pub fn format_iban(iban: &str) -> String {
    let compact: Vec<char> = compact_iban(iban).chars().collect();

    compact
        .chunks(4)
        .map(|block| block.iter().collect::<String>())
        .collect::<Vec<String>>()
        .join(" ")
}

/// Parse date text in any of the shapes bank files and users tend to produce.
/// Returns `None` for empty or unrecognised text.
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(text, fmt) {
            return Some(d);
        }
    }

    // timestamps keep their local date, the offset is not applied
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local().date());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|dt| dt.date())
}
