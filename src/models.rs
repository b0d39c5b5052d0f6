use chrono::NaiveDate;
use serde::Deserialize;

/// One row of either export after normalization.
///
/// Bank and budget transactions live in two separate `Vec`s; `matching` holds
/// the index of the partner in the opposite list once the pair is claimed.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    pub details: Option<String>,
    /// Signed cents. Positive is a credit, negative a debit.
    pub amount: i64,
    pub matching: Option<usize>,
}

impl Transaction {
    pub fn new(date: NaiveDate, description: &str, details: Option<&str>, amount: i64) -> Self {
        Self {
            date,
            description: description.to_string(),
            details: details.map(str::to_string),
            amount,
            matching: None,
        }
    }
}

/// Exclusion rule loaded from the filter file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Filter {
    pub regex: String,
    /// Inclusive lower bound in cents.
    pub min: i64,
    /// Inclusive upper bound in cents.
    pub max: i64,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}
