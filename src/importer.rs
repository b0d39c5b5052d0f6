use std::path::Path;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::error::{Result, RowError, VerifierError};
use crate::models::Transaction;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Amount in cents. Grouping commas are stripped before parsing.
pub fn parse_amount_cents(raw: &str) -> Option<i64> {
    let value: f64 = raw.replace(',', "").trim().parse().ok()?;
    let cents = (value * 100.0).round();
    // NaN and infinities fail both comparisons too.
    if !(cents >= i64::MIN as f64 && cents < i64::MAX as f64) {
        return None;
    }
    Some(cents as i64)
}

pub fn parse_date_mdy(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%m/%d/%Y").ok()
}

pub fn read_records(file_path: &Path) -> Result<Vec<Vec<String>>> {
    let file = std::fs::File::open(file_path).map_err(|source| VerifierError::Read {
        path: file_path.display().to_string(),
        source,
    })?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(std::io::BufReader::new(file));
    let mut records = Vec::new();
    // Byte records so a stray Latin-1 byte costs a replacement char, not the file.
    for result in rdr.byte_records() {
        let record = result?;
        records.push(
            record
                .iter()
                .map(|field| String::from_utf8_lossy(field).into_owned())
                .collect(),
        );
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Column layouts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnLayout {
    pub date: usize,
    pub description: usize,
    pub amount: usize,
    pub details: Option<usize>,
}

/// Budget exports always carry their header on row 0.
pub const BUDGET_LAYOUT: ColumnLayout = ColumnLayout {
    date: 0,
    description: 2,
    amount: 5,
    details: Some(3),
};

// ---------------------------------------------------------------------------
// Bank formats, dispatched on the header signature
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BankFormat {
    BofaDebit,
    BofaCredit,
    ChaseCredit,
}

const ALL_BANK_FORMATS: &[BankFormat] = &[
    BankFormat::BofaDebit,
    BankFormat::BofaCredit,
    BankFormat::ChaseCredit,
];

impl BankFormat {
    pub fn name(&self) -> &'static str {
        match self {
            Self::BofaDebit => "Bank of America Debit",
            Self::BofaCredit => "Bank of America Credit Card",
            Self::ChaseCredit => "Chase Credit Card",
        }
    }

    pub fn is_header(&self, record: &[String]) -> bool {
        let field = |i: usize| record[i].trim();
        match self {
            Self::BofaDebit => {
                record.len() > 3
                    && field(0) == "Date"
                    && field(1) == "Description"
                    && field(2) == "Amount"
            }
            Self::BofaCredit => {
                record.len() > 3
                    && field(0) == "Posted Date"
                    && field(1) == "Reference Number"
                    && field(2) == "Payee"
            }
            Self::ChaseCredit => {
                record.len() > 4
                    && field(0) == "Transaction Date"
                    && field(1) == "Post Date"
                    && field(3) == "Category"
            }
        }
    }

    /// Rows between the header and the first data row, header included.
    /// BofA debit exports put a "Beginning balance" line under the header.
    pub fn data_offset(&self) -> usize {
        match self {
            Self::BofaDebit => 2,
            Self::BofaCredit | Self::ChaseCredit => 1,
        }
    }

    pub fn layout(&self) -> ColumnLayout {
        match self {
            Self::BofaDebit => ColumnLayout { date: 0, description: 1, amount: 2, details: None },
            Self::BofaCredit => ColumnLayout { date: 0, description: 2, amount: 4, details: None },
            Self::ChaseCredit => ColumnLayout { date: 0, description: 2, amount: 5, details: None },
        }
    }
}

/// Scans every row; a later header overrides an earlier one, so preamble rows
/// that happen to look like a header don't win over the real one.
pub fn detect_bank_format(records: &[Vec<String>]) -> Option<(BankFormat, usize)> {
    let mut detected = None;
    for (i, record) in records.iter().enumerate() {
        if let Some(format) = ALL_BANK_FORMATS.iter().find(|f| f.is_header(record)) {
            detected = Some((*format, i + format.data_offset()));
        }
    }
    detected
}

// ---------------------------------------------------------------------------
// Row parsing
// ---------------------------------------------------------------------------

pub fn parse_transaction(
    record: &[String],
    layout: &ColumnLayout,
) -> std::result::Result<Transaction, RowError> {
    let field = |index: usize| {
        record.get(index).map(String::as_str).ok_or_else(|| RowError::MissingColumn {
            index,
            record: record.to_vec(),
        })
    };

    let raw_date = field(layout.date)?;
    let date = parse_date_mdy(raw_date).ok_or_else(|| RowError::InvalidDate {
        value: raw_date.to_string(),
        record: record.to_vec(),
    })?;

    let raw_amount = field(layout.amount)?;
    let amount = parse_amount_cents(raw_amount).ok_or_else(|| RowError::InvalidAmount {
        value: raw_amount.to_string(),
        record: record.to_vec(),
    })?;

    let description = field(layout.description)?;
    let details = match layout.details {
        Some(index) => Some(field(index)?),
        None => None,
    };

    Ok(Transaction::new(date, description, details, amount))
}

fn parse_rows(records: &[Vec<String>], start: usize, layout: &ColumnLayout, side: &str) -> Vec<Transaction> {
    records
        .iter()
        .skip(start)
        .filter_map(|record| match parse_transaction(record, layout) {
            Ok(t) => Some(t),
            Err(e) => {
                warn!("invalid {side} record, skipping: {e}");
                None
            }
        })
        .collect()
}

pub fn parse_bank_transactions(records: &[Vec<String>], source: &str) -> Result<Vec<Transaction>> {
    let (format, start) = detect_bank_format(records)
        .ok_or_else(|| VerifierError::UnrecognizedFormat(source.to_string()))?;
    debug!("{source}: detected {} export, data starts at row {start}", format.name());
    Ok(parse_rows(records, start, &format.layout(), "bank"))
}

pub fn parse_budget_transactions(records: &[Vec<String>]) -> Vec<Transaction> {
    parse_rows(records, 1, &BUDGET_LAYOUT, "budget")
}

// ---------------------------------------------------------------------------
// File entry points
// ---------------------------------------------------------------------------

pub fn import_bank_file(file_path: &Path) -> Result<Vec<Transaction>> {
    let records = read_records(file_path)?;
    let transactions = parse_bank_transactions(&records, &file_path.display().to_string())?;
    info!("parsed {} bank transactions from {}", transactions.len(), file_path.display());
    Ok(transactions)
}

pub fn import_budget_file(file_path: &Path) -> Result<Vec<Transaction>> {
    let records = read_records(file_path)?;
    let transactions = parse_budget_transactions(&records);
    info!("parsed {} budget transactions from {}", transactions.len(), file_path.display());
    Ok(transactions)
}
