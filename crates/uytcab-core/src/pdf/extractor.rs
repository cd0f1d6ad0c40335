//! PDF page text and grid extraction using lopdf and pdf-extract.

use std::cell::OnceCell;

use lopdf::Document;
use tracing::{debug, trace};

use super::layout::{fragments_to_grids, page_fragments};
use super::segment::text_to_grids;
use super::{DocumentSource, Result};
use crate::error::PdfError;
use crate::models::Grid;

/// PDF document source backed by lopdf.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
    /// Per-page text from pdf-extract, computed on first fallback.
    fallback_pages: OnceCell<Vec<String>>,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
            fallback_pages: OnceCell::new(),
        }
    }

    /// Load a PDF from bytes.
    pub fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract needs the decrypted bytes
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        self.fallback_pages = OnceCell::new();
        Ok(())
    }

    fn fallback_page_text(&self, page: u32) -> Result<String> {
        if self.fallback_pages.get().is_none() {
            let pages = pdf_extract::extract_text_from_mem_by_pages(&self.raw_data)
                .map_err(|e| PdfError::TextExtraction(e.to_string()))?;
            let _ = self.fallback_pages.set(pages);
        }

        let pages = self.fallback_pages.get().map(Vec::as_slice).unwrap_or_default();
        pages
            .get((page - 1) as usize)
            .cloned()
            .ok_or(PdfError::InvalidPage(page))
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentSource for PdfExtractor {
    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn page_text(&self, page: u32) -> Result<String> {
        let doc = self.document.as_ref().ok_or(PdfError::Parse("No document loaded".to_string()))?;

        if page == 0 || page > self.page_count() {
            return Err(PdfError::InvalidPage(page));
        }

        // lopdf keeps the content-stream order, which preserves table rows;
        // CID-keyed fonts without a ToUnicode map come back empty, so retry
        // with pdf-extract in that case.
        match doc.extract_text(&[page]) {
            Ok(text) if !text.trim().is_empty() => Ok(text),
            Ok(_) => {
                trace!("lopdf returned no text for page {}, using pdf-extract", page);
                self.fallback_page_text(page)
            }
            Err(e) => {
                trace!("lopdf text extraction failed on page {}: {}", page, e);
                self.fallback_page_text(page)
            }
        }
    }

    /// Grids from positioned text; page text is segmented only when the
    /// content stream yields no decodable positioned runs.
    fn page_grids(&self, page: u32) -> Result<Vec<Grid>> {
        let doc = self.document.as_ref().ok_or(PdfError::Parse("No document loaded".to_string()))?;
        let page_id = doc
            .get_pages()
            .get(&page)
            .copied()
            .ok_or(PdfError::InvalidPage(page))?;

        match page_fragments(doc, page_id) {
            Ok(fragments) if !fragments.is_empty() => {
                let grids = fragments_to_grids(fragments);
                debug!("Built {} grids from positioned text on page {}", grids.len(), page);
                return Ok(grids);
            }
            Ok(_) => trace!("no positioned text on page {}, segmenting page text", page),
            Err(e) => trace!("positioned text failed on page {}: {}", page, e),
        }

        let text = self.page_text(page)?;
        let grids = text_to_grids(&text);
        debug!("Segmented {} grids from page {} text", grids.len(), page);
        Ok(grids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_extractor_new() {
        let extractor = PdfExtractor::new();
        assert!(extractor.document.is_none());
        assert_eq!(extractor.page_count(), 0);
    }

    #[test]
    fn test_load_rejects_garbage() {
        let mut extractor = PdfExtractor::new();
        let result = extractor.load(b"not a pdf at all");
        assert!(matches!(result, Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_page_text_without_document() {
        let extractor = PdfExtractor::new();
        assert!(extractor.page_text(1).is_err());
    }
}
