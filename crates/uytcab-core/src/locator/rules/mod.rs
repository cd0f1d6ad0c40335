//! Rule-based field extractors for report text.

pub mod dates;
pub mod keywords;
pub mod numeric;
pub mod patterns;

pub use dates::{resolve_cell_date, resolve_document_date, CellDateExtractor, DocumentDateExtractor};
pub use keywords::KeywordSet;
pub use numeric::{normalize_number, NEGATIVE_GLYPH};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;
}
