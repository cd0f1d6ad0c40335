//! Date extraction for report pages and table cells.

use chrono::NaiveDate;
use regex::Regex;

use super::FieldExtractor;
use super::patterns::{DATE_DOTTED, DATE_JP_FULL, DATE_JP_MONTH_DAY, DATE_SLASHED};

/// Document date patterns in priority order. Each captures year, month, day.
fn document_date_patterns() -> [&'static Regex; 3] {
    [&*DATE_JP_FULL, &*DATE_DOTTED, &*DATE_SLASHED]
}

/// Publication date extractor for full page text.
pub struct DocumentDateExtractor;

impl DocumentDateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DocumentDateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DocumentDateExtractor {
    type Output = NaiveDate;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        document_date_patterns()
            .into_iter()
            .find_map(|pattern| first_ymd(pattern, text))
    }
}

/// Year-less `M月D日` extractor anchored to a reference year.
pub struct CellDateExtractor {
    year: i32,
}

impl CellDateExtractor {
    pub fn new(year: i32) -> Self {
        Self { year }
    }
}

impl FieldExtractor for CellDateExtractor {
    type Output = NaiveDate;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let caps = DATE_JP_MONTH_DAY.captures(text)?;
        let month: u32 = caps[1].parse().ok()?;
        let day: u32 = caps[2].parse().ok()?;
        NaiveDate::from_ymd_opt(self.year, month, day)
    }
}

/// Find the publication date in a page's text.
pub fn resolve_document_date(text: &str) -> Option<NaiveDate> {
    DocumentDateExtractor::new().extract(text)
}

/// Find a `M月D日` date in a cell, in the given year.
///
/// Returns `None` rather than clamping when the day does not exist in that
/// month and year.
pub fn resolve_cell_date(text: &str, year: i32) -> Option<NaiveDate> {
    CellDateExtractor::new(year).extract(text)
}

// The first match of a pattern decides; a calendar-invalid match makes the
// pattern fail so the next one is tried.
fn first_ymd(pattern: &Regex, text: &str) -> Option<NaiveDate> {
    let caps = pattern.captures(text)?;
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}
