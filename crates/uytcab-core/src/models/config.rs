//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::UytcabError;

/// Main configuration for the uytcab pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// Output series labels.
    pub series: SeriesConfig,

    /// Row and column keyword sets.
    pub keywords: KeywordConfig,

    /// Table search limits and fallback policy.
    pub search: SearchConfig,

    /// Fetch-then-extract pipeline settings.
    pub pipeline: PipelineConfig,
}

/// Fixed labels attached to the output series.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesConfig {
    /// Stable series identifier; keys the date in the output mapping.
    pub identifier: String,

    /// Human-readable series description; keys the value in the output mapping.
    pub description: String,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            identifier: "UYTCAB.DEMANDFORECAST.CHANGECURRBAL.JPN.B".to_string(),
            description: "Supply and demand forecast: Change in current account balance"
                .to_string(),
        }
    }
}

/// Keyword sets used to address the target cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    /// Keywords identifying the data row.
    pub subject: Vec<String>,

    /// Keywords identifying the data column header.
    pub metric: Vec<String>,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            subject: vec!["財政".to_string()],
            metric: vec!["当社需給予想".to_string(), "需給予想".to_string()],
        }
    }
}

/// What to do when a value is found but no cell near its header carries a date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFallback {
    /// Skip the document.
    #[default]
    None,
    /// Use the document's publication date for the first value found.
    DocumentDate,
}

/// Table search configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of leading rows scanned for header candidates.
    pub header_scan_rows: usize,

    /// Pages scanned for tables, starting at page 1.
    pub max_pages: u32,

    /// Grids with fewer rows are ignored.
    pub min_table_rows: usize,

    /// Fallback when the date cascade fails for every candidate.
    pub date_fallback: DateFallback,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            header_scan_rows: 40,
            max_pages: 1,
            min_table_rows: 2,
            date_fallback: DateFallback::None,
        }
    }
}

/// Settings for the `pipeline` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Program and arguments that download the latest report into `download_dir`.
    pub fetch_command: Vec<String>,

    /// Directory scanned for report PDFs.
    pub download_dir: PathBuf,

    /// Batch output file.
    pub output: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fetch_command: Vec::new(),
            download_dir: PathBuf::from("downloads"),
            output: PathBuf::from("output_mapped_data.csv"),
        }
    }
}

impl LocatorConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Reject configurations that can never locate a cell.
    pub fn validate(&self) -> crate::Result<()> {
        let usable = |set: &[String]| set.iter().any(|k| !k.is_empty());
        if !usable(&self.keywords.subject) {
            return Err(UytcabError::Config("keywords.subject is empty".to_string()));
        }
        if !usable(&self.keywords.metric) {
            return Err(UytcabError::Config("keywords.metric is empty".to_string()));
        }
        if self.search.header_scan_rows == 0 {
            return Err(UytcabError::Config("search.header_scan_rows must be positive".to_string()));
        }
        Ok(())
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "search": { "date_fallback": "document_date" } }"#;
        let config: LocatorConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.search.date_fallback, DateFallback::DocumentDate);
        assert_eq!(config.search.header_scan_rows, 40);
        assert_eq!(config.keywords.subject, vec!["財政".to_string()]);
    }

    #[test]
    fn test_validate() {
        assert!(LocatorConfig::default().validate().is_ok());

        let mut config = LocatorConfig::default();
        config.keywords.metric = vec![String::new()];
        assert!(matches!(config.validate(), Err(UytcabError::Config(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = LocatorConfig::default();
        config.search.max_pages = 3;
        config.save(&path).unwrap();

        let loaded = LocatorConfig::from_file(&path).unwrap();
        assert_eq!(loaded.search.max_pages, 3);
        assert_eq!(loaded.series.identifier, config.series.identifier);
    }
}
