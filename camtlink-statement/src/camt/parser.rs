//! Read CAMT.053 statement files into `Statement`s.

use super::document::{AccountStatement, Document, Entry};
use crate::{AccountLookup, ParseError, Provenance, Statement, StatementEntry};
use camtlink_utils::{format_iban, parse_date_text, read_file_bytes};
use encoding_rs::{Encoding, UTF_8};
use log::{debug, warn};
use quick_xml::de::from_str;
use rust_decimal::Decimal;
use std::borrow::Cow;
use std::path::Path;
use std::str::FromStr;

/// The only markup that can declare entities, internal or external
const ENTITY_DECLARATION: &[u8] = b"<!ENTITY";

/// Parses CAMT.053 files, resolving each statement's ledger account through `L`.
pub struct StatementFileParser<L: AccountLookup> {
    lookup: L,
}

impl<L: AccountLookup> StatementFileParser<L> {
    pub fn new(lookup: L) -> Self {
        StatementFileParser { lookup }
    }

    /// Parse the statement file at `path`
    pub fn parse_file(&self, path: &Path) -> Result<Vec<Statement>, ParseError> {
        if !path.is_file() {
            return Err(ParseError::FileNotFound(path.to_path_buf()));
        }
        let raw = read_file_bytes(path).map_err(|e| ParseError::Io(e.to_string()))?;

        self.parse(&raw)
    }

    /// Parse raw statement file content.
    /// Statements without an IBAN are skipped, everything else is returned in document order.
    pub fn parse(&self, raw: &[u8]) -> Result<Vec<Statement>, ParseError> {
        let xml = decode_document(raw)?;
        // must run before the content reaches any XML reader
        reject_entity_declarations(xml.as_bytes())?;

        let doc: Document =
            from_str(&xml).map_err(|e| ParseError::MalformedDocument(e.to_string()))?;
        let bank_to_customer = match doc.bank_to_customer {
            Some(b) if !b.statements.is_empty() => b,
            _ => {
                return Err(ParseError::MalformedDocument(String::from(
                    "invalid CAMT.053 structure: missing BkToCstmrStmt/Stmt",
                )))
            }
        };

        let creation_date = bank_to_customer
            .group_header
            .as_ref()
            .and_then(|h| h.created.as_deref())
            .map(str::trim)
            .filter(|d| !d.is_empty());

        let stmts: Vec<Statement> = bank_to_customer
            .statements
            .iter()
            .filter_map(|node| self.extract_statement(node, creation_date))
            .collect();
        debug!("Parsed {} account statement(s).", stmts.len());

        Ok(stmts)
    }

    fn extract_statement(
        &self,
        node: &AccountStatement,
        creation_date: Option<&str>,
    ) -> Option<Statement> {
        let iban = match node.iban() {
            Some(iban) => format_iban(iban),
            None => {
                debug!("Skipping an account statement without an IBAN.");
                return None;
            }
        };

        let account_id = self.lookup.find_account_by_iban(&iban);
        if account_id.is_none() {
            debug!("IBAN `{}` does not belong to any ledger account.", iban);
        }

        let mut stmt = Statement::new(&iban, account_id, Provenance::FromFile);
        stmt.set_creation_date(creation_date);
        for entry in &node.entries {
            stmt.add_entry(extract_entry(entry));
        }

        Some(stmt)
    }
}

/// Decode the content using its byte order mark, else its declared encoding, else UTF-8.
/// The byte order mark is dropped.
fn decode_document(raw: &[u8]) -> Result<Cow<'_, str>, ParseError> {
    // a declaration readable as ASCII cannot be UTF-16, whatever it says
    let encoding = declared_encoding(raw)
        .and_then(Encoding::for_label)
        .map(Encoding::output_encoding)
        .unwrap_or(UTF_8);
    let (text, used, had_errors) = encoding.decode(raw);
    if had_errors {
        return Err(ParseError::MalformedDocument(format!(
            "statement file is not valid {}",
            used.name()
        )));
    }
    if used != UTF_8 {
        debug!("Decoded the statement file from {}.", used.name());
    }

    Ok(text)
}

/// The `encoding` label of an ASCII-compatible XML declaration
fn declared_encoding(raw: &[u8]) -> Option<&[u8]> {
    let raw = raw.strip_prefix(b"\xef\xbb\xbf").unwrap_or(raw);
    if !raw.starts_with(b"<?xml") {
        return None;
    }
    let end = raw.windows(2).position(|w| w == b"?>")?;
    let decl = &raw[..end];

    let start = decl.windows(8).position(|w| w == b"encoding")? + 8;
    let rest = &decl[start..];
    let rest = &rest[rest.iter().position(|b| !b.is_ascii_whitespace())?..];
    let rest = rest.strip_prefix(b"=")?;
    let rest = &rest[rest.iter().position(|b| !b.is_ascii_whitespace())?..];
    let quote = *rest.first().filter(|q| **q == b'"' || **q == b'\'')?;
    let value = &rest[1..];

    value.iter().position(|b| *b == quote).map(|len| &value[..len])
}

/// Refuse content declaring entities before it is parsed
fn reject_entity_declarations(raw: &[u8]) -> Result<(), ParseError> {
    let declares_entity = raw
        .windows(ENTITY_DECLARATION.len())
        .any(|w| w.eq_ignore_ascii_case(ENTITY_DECLARATION));

    match declares_entity {
        true => Err(ParseError::UnsafeInput),
        false => Ok(()),
    }
}

fn extract_entry(node: &Entry) -> StatementEntry {
    let is_debit = node.is_debit();

    let declared = node.amount.as_ref().map_or("", |a| a.value.trim());
    let magnitude = match Decimal::from_str(declared) {
        Ok(amount) => amount.abs(),
        Err(_) => {
            warn!("Entry amount `{}` is not a number, using 0.", declared);
            Decimal::ZERO
        }
    };
    let amount = if is_debit { -magnitude } else { magnitude };

    // the booking date only stands in when the value date is absent or unparseable
    let value_date = [node.value_date.as_ref(), node.booking_date.as_ref()]
        .into_iter()
        .flatten()
        .filter_map(|d| d.text())
        .find_map(parse_date_text)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    let hash = node
        .service_ref
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(String::from);

    let tx = node.transaction();

    let remittance = tx
        .and_then(|t| t.remittance.as_ref())
        .map(|r| {
            r.unstructured
                .iter()
                .map(|line| line.trim())
                .filter(|line| !line.is_empty())
                .collect::<Vec<&str>>()
                .join(" ")
        })
        .unwrap_or_default();
    let party = tx
        .and_then(|t| t.related_parties.as_ref())
        .and_then(|p| match is_debit {
            true => p.debtor.as_ref(),
            false => p.creditor.as_ref(),
        })
        .and_then(|p| p.name())
        .unwrap_or("");
    let name = join_lines(&[remittance.as_str(), party]);

    let entry_info = node
        .additional_info
        .as_deref()
        .map(readable_info)
        .unwrap_or_default();
    let tx_info = tx
        .and_then(|t| t.additional_info.as_deref())
        .map(str::trim)
        .unwrap_or("");
    let info = join_lines(&[entry_info.as_str(), tx_info]);

    StatementEntry::new(amount, &value_date, &name, &info, hash)
}

/// Break additional entry information onto separate lines before its section markers
fn readable_info(info: &str) -> String {
    info.trim()
        .replace("COMMUNICATIONS", "\nCOMMUNICATIONS")
        .replace("REFERENCES", "\nREFERENCES")
}

/// Join the non-empty parts with line breaks
fn join_lines(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<&str>>()
        .join("\n")
}
