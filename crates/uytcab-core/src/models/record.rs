//! Extracted series records and the ordered result set of a batch run.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::config::SeriesConfig;

/// One extracted observation: the effective date and its value.
///
/// Both fields are always present; documents that cannot supply both are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Date the value is "as of".
    pub date: NaiveDate,
    /// Signed integer value.
    pub value: i64,
}

impl ExtractionResult {
    pub fn new(date: NaiveDate, value: i64) -> Self {
        Self { date, value }
    }

    /// ISO-8601 calendar date (`YYYY-MM-DD`).
    pub fn iso_date(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// Two-key mapping: identifier label -> date, description label -> value.
    pub fn to_mapping(&self, series: &SeriesConfig) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(series.identifier.clone(), Value::String(self.iso_date()));
        map.insert(series.description.clone(), Value::from(self.value));
        map
    }

    /// Fields of the serialized data line, in column order.
    pub fn to_row(&self) -> [String; 2] {
        [self.iso_date(), self.value.to_string()]
    }
}

/// Results in document-processing order. Never sorted or deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    records: Vec<ExtractionResult>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record after all previously added ones.
    pub fn push(&mut self, record: ExtractionResult) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExtractionResult> {
        self.records.iter()
    }

    /// The two label rows that precede data rows in the serialized form.
    pub fn label_rows(series: &SeriesConfig) -> [[String; 2]; 2] {
        [
            [String::new(), series.identifier.clone()],
            [String::new(), series.description.clone()],
        ]
    }
}

impl Extend<ExtractionResult> for ResultSet {
    fn extend<T: IntoIterator<Item = ExtractionResult>>(&mut self, iter: T) {
        self.records.extend(iter);
    }
}

impl FromIterator<ExtractionResult> for ResultSet {
    fn from_iter<T: IntoIterator<Item = ExtractionResult>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
