//! Series file serialization.
//!
//! The file has no ordinary header row. The first two lines carry the
//! series labels after an empty first column, then one `date,value` line
//! per record:
//!
//! ```text
//! ,UYTCAB.DEMANDFORECAST.CHANGECURRBAL.JPN.B
//! ,Supply and demand forecast: Change in current account balance
//! 2024-10-03,-1234
//! ```

use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::models::{ResultSet, SeriesConfig};

/// Write the label rows and every record to `writer`.
pub fn write_series<W: Write>(writer: W, results: &ResultSet, series: &SeriesConfig) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    for row in ResultSet::label_rows(series) {
        wtr.write_record(&row)?;
    }
    for record in results.iter() {
        wtr.write_record(&record.to_row())?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the series file to `path`, replacing any existing file.
pub fn write_series_file(path: &Path, results: &ResultSet, series: &SeriesConfig) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_series(file, results, series)?;
    debug!("Wrote {} records to {}", results.len(), path.display());
    Ok(())
}

/// Render the series file to a string.
pub fn series_to_string(results: &ResultSet, series: &SeriesConfig) -> Result<String> {
    let mut buf = Vec::new();
    write_series(&mut buf, results, series)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
