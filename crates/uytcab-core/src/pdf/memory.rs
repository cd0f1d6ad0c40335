//! In-memory document source.

use super::{DocumentSource, Result};
use crate::error::PdfError;
use crate::models::Grid;

/// A page with pre-extracted text and grids.
#[derive(Debug, Clone, Default)]
pub struct MemoryPage {
    pub text: String,
    pub grids: Vec<Grid>,
}

impl MemoryPage {
    pub fn new(text: impl Into<String>, grids: Vec<Grid>) -> Self {
        Self {
            text: text.into(),
            grids,
        }
    }
}

/// Document source over pages already held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    pages: Vec<MemoryPage>,
}

impl MemoryDocument {
    pub fn new(pages: Vec<MemoryPage>) -> Self {
        Self { pages }
    }

    /// Single-page document.
    pub fn single_page(text: impl Into<String>, grids: Vec<Grid>) -> Self {
        Self::new(vec![MemoryPage::new(text, grids)])
    }

    fn page(&self, page: u32) -> Result<&MemoryPage> {
        page.checked_sub(1)
            .and_then(|idx| self.pages.get(idx as usize))
            .ok_or(PdfError::InvalidPage(page))
    }
}

impl DocumentSource for MemoryDocument {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_text(&self, page: u32) -> Result<String> {
        Ok(self.page(page)?.text.clone())
    }

    fn page_grids(&self, page: u32) -> Result<Vec<Grid>> {
        Ok(self.page(page)?.grids.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pages_are_one_indexed() {
        let doc = MemoryDocument::single_page("first", vec![]);
        assert_eq!(doc.page_text(1).unwrap(), "first");
        assert!(matches!(doc.page_text(0), Err(PdfError::InvalidPage(0))));
        assert!(matches!(doc.page_grids(2), Err(PdfError::InvalidPage(2))));
    }
}
