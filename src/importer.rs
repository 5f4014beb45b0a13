use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::{Result, TallyError};
use crate::models::{AccountType, Transaction};

pub const COL_ACCOUNT_NUMBER: &str = "Account Number";
pub const COL_POST_DATE: &str = "Post Date";
pub const COL_CHECK: &str = "Check";
pub const COL_DESCRIPTION: &str = "Description";
pub const COL_DEBIT: &str = "Debit";
pub const COL_CREDIT: &str = "Credit";
pub const COL_STATUS: &str = "Status";
pub const COL_BALANCE: &str = "Balance";
pub const COL_CLASSIFICATION: &str = "Classification";

pub const REQUIRED_COLUMNS: &[&str] = &[
    COL_ACCOUNT_NUMBER,
    COL_POST_DATE,
    COL_CHECK,
    COL_DESCRIPTION,
    COL_DEBIT,
    COL_CREDIT,
    COL_STATUS,
    COL_BALANCE,
    COL_CLASSIFICATION,
];

// ---------------------------------------------------------------------------
// Field parsers
// ---------------------------------------------------------------------------

/// Parse a money column. Blank is zero; `$` and thousands separators are ignored.
pub fn parse_amount(raw: &str) -> std::result::Result<f64, String> {
    let s = raw.trim().replace(['$', ','], "");
    if s.is_empty() {
        return Ok(0.0);
    }
    let value: f64 = s.parse().map_err(|_| "not a number".to_string())?;
    if !value.is_finite() {
        return Err("not a finite number".to_string());
    }
    if value < 0.0 {
        return Err("must not be negative".to_string());
    }
    Ok(value)
}

fn parse_mdy(raw: &str, sep: char) -> Option<NaiveDate> {
    let parts: Vec<&str> = raw.split(sep).collect();
    if parts.len() != 3 || parts[0].len() > 2 {
        return None;
    }
    let m: u32 = parts[0].parse().ok()?;
    let d: u32 = parts[1].parse().ok()?;
    let y: i32 = match parts[2].len() {
        2 => 2000 + parts[2].parse::<i32>().ok()?,
        4 => parts[2].parse().ok()?,
        _ => return None,
    };
    NaiveDate::from_ymd_opt(y, m, d)
}

const NAMED_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%b %d, %Y", "%B %d, %Y", "%d %b %Y"];

/// Parse the date formats banks commonly emit. Any trailing time of day is dropped.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Some(date) = parse_mdy(raw, '/').or_else(|| parse_mdy(raw, '-')) {
        return Some(date);
    }
    for fmt in NAMED_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(date);
        }
    }
    // "2026-01-28 00:00:00", "2026-01-28T09:30:00Z"
    let date_part = raw.split(['T', ' ']).next()?;
    if date_part.len() < raw.len() {
        for fmt in &NAMED_FORMATS[..2] {
            if let Ok(date) = NaiveDate::parse_from_str(date_part, fmt) {
                return Some(date);
            }
        }
        return parse_mdy(date_part, '/');
    }
    None
}

// ---------------------------------------------------------------------------
// Ingestion
// ---------------------------------------------------------------------------

/// Column positions of the required fields within one export's header row.
struct Columns {
    account_number: usize,
    post_date: usize,
    check: usize,
    description: usize,
    debit: usize,
    credit: usize,
    status: usize,
    balance: usize,
    classification: usize,
}

impl Columns {
    fn locate(headers: &csv::StringRecord) -> Result<Self> {
        let names: Vec<&str> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim())
            .collect();
        let find = |col: &str| names.iter().position(|n| *n == col);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|c| find(**c).is_none())
            .map(|c| (*c).to_string())
            .collect();
        if !missing.is_empty() {
            return Err(TallyError::Schema { missing });
        }

        let idx = |col: &str| find(col).unwrap_or_default();
        Ok(Self {
            account_number: idx(COL_ACCOUNT_NUMBER),
            post_date: idx(COL_POST_DATE),
            check: idx(COL_CHECK),
            description: idx(COL_DESCRIPTION),
            debit: idx(COL_DEBIT),
            credit: idx(COL_CREDIT),
            status: idx(COL_STATUS),
            balance: idx(COL_BALANCE),
            classification: idx(COL_CLASSIFICATION),
        })
    }
}

fn field<'r>(record: &'r csv::StringRecord, idx: usize) -> &'r str {
    record.get(idx).unwrap_or("").trim()
}

fn non_empty(raw: &str) -> Option<String> {
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

fn parse_error(line: u64, field: &str, value: &str, reason: impl Into<String>) -> TallyError {
    TallyError::Parse {
        line,
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Undecodable text is a field-level problem; everything else stays a CSV error.
fn row_error(e: csv::Error, headers: &csv::StringRecord) -> TallyError {
    if let csv::ErrorKind::Utf8 { pos, err } = e.kind() {
        let line = pos.as_ref().map(|p| p.line()).unwrap_or_default();
        let column = headers.get(err.field()).unwrap_or("field").trim();
        return parse_error(line, column, "", "not valid UTF-8");
    }
    e.into()
}

/// Parse one account's export into transactions, preserving source row order.
pub fn ingest<R: Read>(source: R, account_type: AccountType) -> Result<Vec<Transaction>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);
    let headers = rdr.headers()?.clone();
    let cols = Columns::locate(&headers)?;

    let mut out = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| row_error(e, &headers))?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        let raw_date = field(&record, cols.post_date);
        let post_date = parse_date(raw_date)
            .ok_or_else(|| parse_error(line, COL_POST_DATE, raw_date, "unrecognized date"))?;

        let raw_debit = field(&record, cols.debit);
        let debit_amount =
            parse_amount(raw_debit).map_err(|e| parse_error(line, COL_DEBIT, raw_debit, e))?;
        let raw_credit = field(&record, cols.credit);
        let credit_amount =
            parse_amount(raw_credit).map_err(|e| parse_error(line, COL_CREDIT, raw_credit, e))?;

        let raw_balance = field(&record, cols.balance);
        let balance = if raw_balance.is_empty() {
            None
        } else {
            let cleaned = raw_balance.replace(['$', ','], "");
            Some(
                cleaned
                    .parse::<f64>()
                    .map_err(|_| parse_error(line, COL_BALANCE, raw_balance, "not a number"))?,
            )
        };

        out.push(Transaction {
            account_number: field(&record, cols.account_number).to_string(),
            post_date,
            check: non_empty(field(&record, cols.check)),
            description: field(&record, cols.description).to_string(),
            debit_amount,
            credit_amount,
            status: field(&record, cols.status).to_string(),
            balance,
            category: non_empty(field(&record, cols.classification)),
            account_type,
            is_transfer: false,
        });
    }

    tracing::debug!(account = %account_type, rows = out.len(), "ingested source");
    Ok(out)
}

pub fn ingest_file(path: &Path, account_type: AccountType) -> Result<Vec<Transaction>> {
    let file = std::fs::File::open(path)?;
    ingest(std::io::BufReader::new(file), account_type)
}
