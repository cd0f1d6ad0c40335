//! Batch processing command for a folder of reports.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use uytcab_core::output::write_series_file;
use uytcab_core::{BatchReport, Document, LocatorConfig, PdfExtractor, SeriesExtractor};

use super::process::format_thousands;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Folder of reports, or a glob pattern
    #[arg(required = true)]
    input: String,

    /// Output series file (default: pipeline.output from config)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    let files = collect_inputs(&args.input)?;
    if files.is_empty() {
        anyhow::bail!("No PDF files found for input: {}", args.input);
    }

    let output = args.output.unwrap_or_else(|| config.pipeline.output.clone());
    run_batch(&files, &output, &config)?;
    Ok(())
}

/// Resolve the input to PDF paths in file-name order.
///
/// A directory contributes its `*.pdf` entries; anything else is treated as a
/// glob pattern.
pub fn collect_inputs(input: &str) -> anyhow::Result<Vec<PathBuf>> {
    let path = Path::new(input);
    let mut files: Vec<PathBuf> = if path.is_dir() {
        std::fs::read_dir(path)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file())
            .collect()
    } else {
        glob(input)?.filter_map(|r| r.ok()).collect()
    };

    files.retain(|p| {
        p.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
    });
    files.sort();
    Ok(files)
}

/// Extract from every file in order and write the series file.
///
/// The file is written even when no document yields data, so downstream
/// consumers always find the label rows.
pub fn run_batch(files: &[PathBuf], output: &Path, config: &LocatorConfig) -> anyhow::Result<BatchReport> {
    let start = Instant::now();

    println!(
        "{} Found {} PDF file(s) to process",
        style("ℹ").blue(),
        files.len()
    );

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let extractor = SeriesExtractor::from_config(config);
    let docs = files
        .iter()
        .map(|path| (path.display().to_string(), Document::<PdfExtractor>::open(path)));

    let report = extractor.extract_batch_with(docs, |id, outcome| {
        let name = Path::new(id)
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or(id);
        let line = match outcome {
            Ok(record) => format!(
                "{} {}: Date={}, Value={}",
                style("+").green(),
                name,
                record.iso_date(),
                format_thousands(record.value)
            ),
            Err(e) => format!(
                "{} {}: Failed to extract data ({})",
                style("-").red(),
                name,
                e
            ),
        };
        // println through the bar is dropped when the bar is hidden
        pb.suspend(|| println!("{}", line));
        pb.inc(1);
    });

    pb.finish_and_clear();

    write_series_file(output, &report.results, &config.series)?;
    debug!("Series file written to {}", output.display());

    if report.no_data() {
        warn!("No data extracted from any of {} PDF file(s)", report.attempted);
        println!(
            "{} No data extracted from any PDF; {} contains only the label rows",
            style("!").yellow(),
            output.display()
        );
    }

    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        report.attempted,
        start.elapsed()
    );
    println!(
        "   {} extracted, {} skipped",
        style(report.results.len()).green(),
        style(report.skipped.len()).red()
    );
    println!(
        "{} Saved to: {}",
        style("✓").green(),
        output.display()
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_inputs_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["ds241002.pdf", "ds241001.PDF", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }

        let files = collect_inputs(dir.path().to_str().unwrap()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["ds241001.PDF", "ds241002.pdf"]);
    }

    #[test]
    fn test_collect_inputs_from_glob() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.pdf"), b"").unwrap();
        std::fs::write(dir.path().join("b.txt"), b"").unwrap();

        let pattern = format!("{}/*", dir.path().display());
        let files = collect_inputs(&pattern).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_run_batch_writes_labels_when_nothing_extracted() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("broken.pdf");
        std::fs::write(&bad, b"not a pdf").unwrap();
        let output = dir.path().join("out.csv");

        let report = run_batch(&[bad], &output, &LocatorConfig::default()).unwrap();
        assert!(report.no_data());
        assert_eq!(report.skipped.len(), 1);

        let content = std::fs::read_to_string(&output).unwrap();
        assert_eq!(content.lines().count(), 2);
    }
}
