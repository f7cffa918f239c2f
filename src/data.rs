use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::Result;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use csv::{ByteRecord, StringRecord};
use log::{debug, error, info, warn};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::accounting::amount::try_parse_amount;
use crate::accounting::classifier::{Classifier, RowSignals};
use crate::accounting::{RowErrorKind, RowParseError, Transaction};
use crate::config::{ColumnMapping, StatementMapping};

const FALLBACK_DATE_FORMATS: [&str; 9] = [
    "%m/%d/%Y",
    "%Y-%m-%d",
    "%m/%d/%y",
    "%m-%d-%Y",
    "%m-%d-%y",
    "%Y/%m/%d",
    "%d %b %Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

const FALLBACK_DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M:%S"];

#[derive(Debug, Error)]
pub enum StatementError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Csv(#[from] csv::Error),
    #[error("missing expected columns: {}", .missing.join(", "))]
    SchemaMismatch { missing: Vec<String> },
    #[error("no transactions could be processed ({rows_skipped} rows skipped)")]
    EmptyResult { rows_skipped: usize },
}

impl StatementError {
    /// `EmptyResult` only means there is nothing to show.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, StatementError::EmptyResult { .. })
    }
}

/// Result of parsing one statement file.
#[derive(Debug)]
pub struct Statement {
    pub transactions: Vec<Transaction>,
    pub row_errors: Vec<RowParseError>,
}

struct ColumnIndex {
    details: usize,
    posting_date: usize,
    description: usize,
    amount: usize,
    transaction_type: usize,
    balance: usize,
    check_number: usize,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord, columns: &ColumnMapping) -> Result<ColumnIndex, StatementError> {
        let mut missing = Vec::new();
        let mut find = |name: &str| {
            headers.iter().position(|header| header.trim() == name).unwrap_or_else(|| {
                missing.push(name.to_string());
                usize::MAX
            })
        };

        let index = ColumnIndex {
            details: find(&columns.details),
            posting_date: find(&columns.posting_date),
            description: find(&columns.description),
            amount: find(&columns.amount),
            transaction_type: find(&columns.transaction_type),
            balance: find(&columns.balance),
            check_number: find(&columns.check_number),
        };

        if !missing.is_empty() {
            return Err(StatementError::SchemaMismatch { missing });
        }

        Ok(index)
    }
}

pub fn parse_file(file_path: impl AsRef<Path>, mapping: &StatementMapping) -> Result<Statement, StatementError> {
    let file_path = file_path.as_ref();
    info!("processing statement, path={}", file_path.display());

    let file = File::open(file_path)?;
    parse_reader(file, mapping)
}

/// Parses a statement export. Bad rows are skipped and reported in
/// [`Statement::row_errors`], a bad header rejects the whole input.
pub fn parse_reader<R: Read>(reader: R, mapping: &StatementMapping) -> Result<Statement, StatementError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let index = match ColumnIndex::resolve(&headers, &mapping.columns) {
        Ok(index) => index,
        Err(err) => {
            error!("rejecting statement, err={}, headers={:?}", err, headers);
            return Err(err);
        },
    };

    let classifier = Classifier::new();
    let mut transactions = Vec::new();
    let mut row_errors = Vec::new();

    for (row, record) in csv_reader.byte_records().enumerate() {
        let parsed = match record.map(StringRecord::from_byte_record) {
            Ok(Ok(record)) => parse_record(row, &record, &index, mapping, &classifier),
            Ok(Err(err)) => {
                let kind = RowErrorKind::Malformed(err.utf8_error().to_string());
                Err(RowParseError {
                    row,
                    raw: lossy_fields(&err.into_byte_record()),
                    kind,
                })
            },
            Err(err) => Err(RowParseError {
                row,
                raw: Vec::new(),
                kind: RowErrorKind::Malformed(err.to_string()),
            }),
        };

        match parsed {
            Ok(transaction) => transactions.push(transaction),
            Err(err) => {
                warn!("skipping row, err={}, raw={:?}", err, err.raw);
                row_errors.push(err);
            },
        }
    }

    if transactions.is_empty() {
        warn!("no transactions were processed, skipped={}", row_errors.len());
        return Err(StatementError::EmptyResult {
            rows_skipped: row_errors.len(),
        });
    }

    info!(
        "processed statement, transactions={}, skipped={}",
        transactions.len(),
        row_errors.len()
    );

    Ok(Statement {
        transactions,
        row_errors,
    })
}

fn parse_record(
    row: usize,
    record: &StringRecord,
    index: &ColumnIndex,
    mapping: &StatementMapping,
    classifier: &Classifier,
) -> Result<Transaction, RowParseError> {
    let fail = |kind: RowErrorKind| RowParseError {
        row,
        raw: record.iter().map(str::to_string).collect(),
        kind,
    };
    let field = |position: usize, name: &str| {
        record
            .get(position)
            .ok_or_else(|| fail(RowErrorKind::MissingField(name.to_string())))
    };

    let details = field(index.details, &mapping.columns.details)?.to_uppercase();

    let raw_date = field(index.posting_date, &mapping.columns.posting_date)?;
    let posting_date = parse_posting_date(raw_date, &mapping.date_format)
        .ok_or_else(|| fail(RowErrorKind::InvalidDate(raw_date.to_string())))?;

    let description = unquote(field(index.description, &mapping.columns.description)?);
    let amount = normalize_amount(row, &mapping.columns.amount, field(index.amount, &mapping.columns.amount)?);
    let type_code = field(index.transaction_type, &mapping.columns.transaction_type)?.to_uppercase();
    let balance = normalize_amount(row, &mapping.columns.balance, field(index.balance, &mapping.columns.balance)?);

    // short rows just have no check number
    let check_number = record.get(index.check_number).and_then(parse_check_number);

    let transaction_type = classifier.classify(&RowSignals {
        details: &details,
        type_code: type_code.trim(),
        amount,
    });

    Ok(Transaction::new(
        details,
        posting_date,
        description,
        amount,
        transaction_type,
        balance,
        check_number,
    ))
}

fn lossy_fields(record: &ByteRecord) -> Vec<String> {
    record
        .iter()
        .map(|field| String::from_utf8_lossy(field).into_owned())
        .collect()
}

fn normalize_amount(row: usize, column: &str, raw: &str) -> Decimal {
    if raw.trim().is_empty() {
        return Decimal::ZERO;
    }

    try_parse_amount(raw).unwrap_or_else(|| {
        warn!("unparseable amount, using zero, row={}, column={}, raw={:?}", row, column, raw);
        Decimal::ZERO
    })
}

/// Strict `format` first, then a list of common layouts. Never guesses.
pub fn parse_posting_date(raw: &str, format: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    parse_date_with(raw, format)
        .or_else(|| FALLBACK_DATE_FORMATS.iter().find_map(|fallback| parse_date_with(raw, fallback)))
        .or_else(|| {
            FALLBACK_DATETIME_FORMATS.iter().find_map(|fallback| {
                NaiveDateTime::parse_from_str(raw, fallback)
                    .ok()
                    .map(|datetime| datetime.date())
                    .filter(|date| full_year(date, fallback))
            })
        })
}

fn parse_date_with(raw: &str, format: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, format)
        .ok()
        .filter(|date| full_year(date, format))
}

// chrono's %Y takes any number of digits, so "03/15/24" would otherwise land in year 24
fn full_year(date: &NaiveDate, format: &str) -> bool {
    !format.contains("%Y") || date.year() >= 1000
}

fn unquote(value: &str) -> String {
    let value = value.trim();
    let value = value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|inner| inner.strip_suffix('\'')))
        .unwrap_or(value);

    value.trim().to_string()
}

fn parse_check_number(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() || raw.chars().all(|c| c == ',') {
        None
    } else {
        Some(raw.to_string())
    }
}

pub fn export_csv<W: Write>(transactions: &[Transaction], writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);
    for transaction in transactions {
        csv_writer.serialize(transaction)?;
    }

    csv_writer.flush()?;

    Ok(())
}

/// CSV files in `dir`, newest first.
pub fn statement_files(dir: impl AsRef<Path>) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<(SystemTime, PathBuf)> = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .is_some_and(|extension| extension.eq_ignore_ascii_case("csv"));
        if !path.is_file() || !is_csv {
            continue;
        }

        let modified = fs::metadata(&path)?.modified()?;
        files.push((modified, path));
    }

    files.sort_by(|a, b| b.0.cmp(&a.0));
    debug!("found statement files, count={}", files.len());

    Ok(files.into_iter().map(|(_, path)| path).collect())
}
