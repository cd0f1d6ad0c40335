//! Literal keyword matching over table cells.

use serde::{Deserialize, Serialize};

use crate::models::Cell;

/// Ordered set of literal substrings; a cell matches if it contains any of them.
///
/// Matching is case-sensitive and does no width or diacritic folding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(Into::into)
                .filter(|k: &String| !k.is_empty())
                .collect(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Whether present text contains any keyword.
    pub fn matches_text(&self, text: &str) -> bool {
        self.keywords.iter().any(|k| text.contains(k.as_str()))
    }

    /// Whether a cell is present and contains any keyword.
    pub fn matches(&self, cell: Option<&str>) -> bool {
        cell.is_some_and(|text| self.matches_text(text))
    }

    /// Column index of the first matching cell in a row.
    pub fn first_match(&self, row: &[Cell]) -> Option<usize> {
        row.iter().position(|cell| self.matches(cell.as_deref()))
    }

    /// Whether any cell in a row matches.
    pub fn matches_row(&self, row: &[Cell]) -> bool {
        self.first_match(row).is_some()
    }
}
