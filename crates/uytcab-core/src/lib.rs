//! Core library for the UYTCAB report extractor.
//!
//! This crate provides:
//! - PDF page text and table grid extraction
//! - Locale-aware numeric and date parsing (`▲` negatives, `10月3日` dates)
//! - Keyword-addressed lookup of a value and its effective date in report tables
//! - Series records and the ordered result set of a batch run

pub mod error;
pub mod locator;
pub mod models;
pub mod output;
pub mod pdf;

pub use error::{ExtractionError, PdfError, Result, UytcabError};
pub use locator::{BatchReport, Intersection, IntersectionLocator, SeriesExtractor};
pub use locator::rules::{normalize_number, resolve_cell_date, resolve_document_date, KeywordSet};
pub use models::{DateFallback, ExtractionResult, Grid, LocatorConfig, ResultSet};
pub use pdf::{Document, DocumentSource, MemoryDocument, MemoryPage, PdfExtractor};
