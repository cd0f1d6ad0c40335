//! Keyword-driven location of a value and its date in report tables.
//!
//! The data row is found by a subject keyword, the column by a metric
//! keyword in a header row above it. A candidate only counts once both its
//! value normalizes and a date can be found near its header.

pub mod cascade;
mod extractor;
pub mod intersection;
pub mod rules;

pub use cascade::{resolve_value_date, ROWS_ABOVE, ROW_OFFSETS};
pub use extractor::{BatchReport, SeriesExtractor};
pub use intersection::{Intersection, IntersectionLocator};
