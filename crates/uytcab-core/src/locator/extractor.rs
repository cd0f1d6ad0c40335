//! Document-level series extraction and batch assembly.

use std::path::Path;

use tracing::{debug, info, warn};

use super::cascade::resolve_value_date;
use super::intersection::{Intersection, IntersectionLocator};
use super::rules::KeywordSet;
use crate::error::{ExtractionError, UytcabError};
use crate::models::{DateFallback, ExtractionResult, LocatorConfig, ResultSet};
use crate::pdf::{Document, DocumentSource, PdfExtractor};

/// Extracts one (date, value) observation per document.
#[derive(Debug, Clone)]
pub struct SeriesExtractor {
    locator: IntersectionLocator,
    max_pages: u32,
    min_table_rows: usize,
    date_fallback: DateFallback,
}

impl SeriesExtractor {
    pub fn new(locator: IntersectionLocator) -> Self {
        Self {
            locator,
            max_pages: 1,
            min_table_rows: 2,
            date_fallback: DateFallback::None,
        }
    }

    /// Build an extractor from the keyword and search sections of a config.
    pub fn from_config(config: &LocatorConfig) -> Self {
        let locator = IntersectionLocator::new(
            KeywordSet::new(config.keywords.subject.iter().cloned()),
            KeywordSet::new(config.keywords.metric.iter().cloned()),
        )
        .with_header_scan_rows(config.search.header_scan_rows);

        Self::new(locator)
            .with_max_pages(config.search.max_pages)
            .with_min_table_rows(config.search.min_table_rows)
            .with_date_fallback(config.search.date_fallback)
    }

    /// Set how many pages are searched for tables.
    pub fn with_max_pages(mut self, pages: u32) -> Self {
        self.max_pages = pages.max(1);
        self
    }

    /// Set the minimum row count for a grid to be searched.
    pub fn with_min_table_rows(mut self, rows: usize) -> Self {
        self.min_table_rows = rows;
        self
    }

    /// Set the policy for values whose date cannot be found in the table.
    pub fn with_date_fallback(mut self, fallback: DateFallback) -> Self {
        self.date_fallback = fallback;
        self
    }

    /// Extract the observation from an opened document.
    pub fn extract<S: DocumentSource>(
        &self,
        doc: &Document<S>,
    ) -> Result<ExtractionResult, ExtractionError> {
        let document_date = doc.publication_date();
        let mut first_undated: Option<Intersection> = None;

        let pages = doc.source().page_count().min(self.max_pages);
        for page in 1..=pages {
            let grids = match doc.source().page_grids(page) {
                Ok(grids) => grids,
                Err(e) => {
                    warn!("{}: skipping page {}: {}", doc.id(), page, e);
                    continue;
                }
            };

            for (idx, grid) in grids.iter().enumerate() {
                if grid.len() < self.min_table_rows {
                    continue;
                }

                for candidate in self.locator.candidates(grid) {
                    match resolve_value_date(grid, candidate.header_row, candidate.column, document_date) {
                        Some(date) => {
                            debug!(
                                "{}: page {} grid {} value {:?} -> {} dated {}",
                                doc.id(), page, idx, candidate.text, candidate.value, date
                            );
                            return Ok(ExtractionResult::new(date, candidate.value));
                        }
                        None => {
                            if first_undated.is_none() {
                                first_undated = Some(candidate);
                            }
                        }
                    }
                }
            }
        }

        match (self.date_fallback, first_undated, document_date) {
            (DateFallback::DocumentDate, Some(candidate), Some(date)) => {
                info!(
                    "{}: no dated header for value {}, using publication date {}",
                    doc.id(), candidate.value, date
                );
                Ok(ExtractionResult::new(date, candidate.value))
            }
            (_, Some(_), None) => Err(ExtractionError::NoDocumentDate(doc.id().to_string())),
            _ => Err(ExtractionError::NotFound(doc.id().to_string())),
        }
    }

    /// Open a PDF and extract its observation. The file is released before returning.
    pub fn extract_file(&self, path: &Path) -> crate::Result<ExtractionResult> {
        let doc = Document::<PdfExtractor>::open(path)?;
        Ok(self.extract(&doc)?)
    }

    /// Process documents in order, skipping failures.
    pub fn extract_batch<S, I>(&self, docs: I) -> BatchReport
    where
        S: DocumentSource,
        I: IntoIterator<Item = (String, crate::Result<Document<S>>)>,
    {
        self.extract_batch_with(docs, |_, _| {})
    }

    /// Like [`extract_batch`](Self::extract_batch), reporting each outcome to
    /// `on_outcome` before it is folded into the report.
    ///
    /// Documents are pulled from `docs` one at a time, so a lazily opening
    /// iterator holds at most one document open.
    pub fn extract_batch_with<S, I, F>(&self, docs: I, mut on_outcome: F) -> BatchReport
    where
        S: DocumentSource,
        I: IntoIterator<Item = (String, crate::Result<Document<S>>)>,
        F: FnMut(&str, &crate::Result<ExtractionResult>),
    {
        let mut report = BatchReport::default();
        for (id, doc) in docs {
            let outcome = doc.and_then(|doc| self.extract(&doc).map_err(UytcabError::from));
            on_outcome(&id, &outcome);
            report.record(id, outcome);
        }
        report
    }
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Successful records in processing order.
    pub results: ResultSet,
    /// Skipped documents with the reason.
    pub skipped: Vec<(String, UytcabError)>,
    /// Number of documents attempted.
    pub attempted: usize,
}

impl BatchReport {
    /// Fold one document's outcome into the report.
    pub fn record(&mut self, id: String, outcome: crate::Result<ExtractionResult>) {
        self.attempted += 1;
        match outcome {
            Ok(record) => self.results.push(record),
            Err(e) => {
                warn!("{}: skipped: {}", id, e);
                self.skipped.push((id, e));
            }
        }
    }

    /// At least one document was attempted but none produced a record.
    pub fn no_data(&self) -> bool {
        self.attempted > 0 && self.results.is_empty()
    }
}
