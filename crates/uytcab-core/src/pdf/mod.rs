//! Document sources: pages of raw text and row-major text grids.

mod extractor;
pub mod layout;
mod memory;
mod segment;

pub use extractor::PdfExtractor;
pub use layout::{fragments_to_grids, TextFragment};
pub use memory::{MemoryDocument, MemoryPage};
pub use segment::text_to_grids;

use std::cell::OnceCell;

use chrono::NaiveDate;
use tracing::debug;

use crate::error::PdfError;
use crate::locator::rules::resolve_document_date;
use crate::models::Grid;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for anything that can hand out page text and table grids.
///
/// Pages are 1-indexed.
pub trait DocumentSource {
    /// Get the number of pages in the document.
    fn page_count(&self) -> u32;

    /// Extract the raw text of a page.
    fn page_text(&self, page: u32) -> Result<String>;

    /// Extract zero or more grids from a page.
    fn page_grids(&self, page: u32) -> Result<Vec<Grid>>;
}

/// An opened document with its lazily resolved publication date.
pub struct Document<S> {
    id: String,
    source: S,
    publication_date: OnceCell<Option<NaiveDate>>,
}

impl<S: DocumentSource> Document<S> {
    /// Wrap a source under an identifier (file path or URL).
    pub fn new(id: impl Into<String>, source: S) -> Self {
        Self {
            id: id.into(),
            source,
            publication_date: OnceCell::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// The date printed on the first page, computed once per document.
    pub fn publication_date(&self) -> Option<NaiveDate> {
        *self.publication_date.get_or_init(|| {
            let text = match self.source.page_text(1) {
                Ok(text) => text,
                Err(e) => {
                    debug!("{}: cannot read first page text: {}", self.id, e);
                    return None;
                }
            };
            let date = resolve_document_date(&text);
            debug!("{}: publication date {:?}", self.id, date);
            date
        })
    }
}

impl Document<PdfExtractor> {
    /// Open a PDF file. The file handle is released before this returns.
    pub fn open(path: &std::path::Path) -> crate::Result<Self> {
        let data = std::fs::read(path)?;
        let mut extractor = PdfExtractor::new();
        extractor.load(&data)?;
        Ok(Self::new(path.display().to_string(), extractor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingSource {
        reads: Cell<u32>,
    }

    impl DocumentSource for CountingSource {
        fn page_count(&self) -> u32 {
            1
        }

        fn page_text(&self, _page: u32) -> Result<String> {
            self.reads.set(self.reads.get() + 1);
            Ok("発行日 2024年10月1日".to_string())
        }

        fn page_grids(&self, _page: u32) -> Result<Vec<Grid>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_publication_date_is_cached() {
        let doc = Document::new("counting", CountingSource { reads: Cell::new(0) });

        let expected = NaiveDate::from_ymd_opt(2024, 10, 1);
        assert_eq!(doc.publication_date(), expected);
        assert_eq!(doc.publication_date(), expected);
        assert_eq!(doc.source().reads.get(), 1);
    }

    #[test]
    fn test_open_missing_file() {
        let result = Document::open(std::path::Path::new("/nonexistent/report.pdf"));
        assert!(matches!(result, Err(crate::UytcabError::Io(_))));
    }
}
