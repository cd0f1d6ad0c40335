//! Data models: grids, extracted records, configuration.

pub mod config;
pub mod grid;
pub mod record;

pub use config::{DateFallback, KeywordConfig, LocatorConfig, PipelineConfig, SearchConfig, SeriesConfig};
pub use grid::{Cell, Grid};
pub use record::{ExtractionResult, ResultSet};
