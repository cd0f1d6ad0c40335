//! Process command - extract the series value from a single report.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use uytcab_core::models::SeriesConfig;
use uytcab_core::{ExtractionResult, ResultSet, SeriesExtractor};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input report (PDF)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Exit with an error when no value/date pair is found
    #[arg(long)]
    strict: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON object keyed by the series labels
    Json,
    /// Series file layout (label rows, then the data row)
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = super::load_config(config_path)?;

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let extractor = SeriesExtractor::from_config(&config);
    let record = match extractor.extract_file(&args.input) {
        Ok(record) => record,
        Err(e) if args.strict => {
            anyhow::bail!("Could not extract data from {}: {}", args.input.display(), e);
        }
        Err(e) => {
            eprintln!(
                "{} Could not extract data from {}: {}",
                style("!").yellow(),
                args.input.display(),
                e
            );
            return Ok(());
        }
    };

    let output = format_record(&record, &config.series, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Render one record in the requested format.
pub fn format_record(
    record: &ExtractionResult,
    series: &SeriesConfig,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let output = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&record.to_mapping(series))?,
        OutputFormat::Csv => {
            let results: ResultSet = std::iter::once(*record).collect();
            uytcab_core::output::series_to_string(&results, series)?
        }
        OutputFormat::Text => format!(
            "{}: {}\n{}: {}",
            series.identifier,
            record.iso_date(),
            series.description,
            format_thousands(record.value)
        ),
    };
    Ok(output)
}

/// Format an integer with comma thousand separators.
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if value < 0 {
        formatted.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(c);
    }

    formatted
}
