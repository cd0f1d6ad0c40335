//! Pipeline command - fetch the latest report, then run batch extraction.

use std::path::PathBuf;

use chrono::Local;
use clap::Args;
use console::style;
use tokio::process::Command;
use tracing::{info, warn};

use super::batch::{collect_inputs, run_batch};

/// Arguments for the pipeline command.
#[derive(Args)]
pub struct PipelineArgs {
    /// Skip the fetch step and only extract
    #[arg(long)]
    skip_fetch: bool,

    /// Folder scanned for reports (default: pipeline.download_dir from config)
    #[arg(long)]
    download_dir: Option<PathBuf>,

    /// Output series file (default: pipeline.output from config)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn run(args: PipelineArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;
    let started = Local::now();

    println!("{}", style("UYTCAB pipeline").bold());
    println!("Start time: {}", started.format("%Y-%m-%d %H:%M:%S"));

    // Step 1: fetch
    if args.skip_fetch {
        info!("Fetch step skipped on request");
    } else if let Some((program, rest)) = config.pipeline.fetch_command.split_first() {
        println!(
            "{} Step 1: fetching latest report ({})",
            style("»").cyan(),
            config.pipeline.fetch_command.join(" ")
        );

        let status = Command::new(program)
            .args(rest)
            .status()
            .await
            .map_err(|e| anyhow::anyhow!("Pipeline failed at step 1: cannot run {}: {}", program, e))?;

        if !status.success() {
            anyhow::bail!("Pipeline failed at step 1: fetch command exited with {}", status);
        }
        println!("{} Fetch completed", style("✓").green());
    } else {
        warn!("pipeline.fetch_command is not configured; skipping fetch step");
    }

    // Step 2: extract
    let download_dir = args
        .download_dir
        .unwrap_or_else(|| config.pipeline.download_dir.clone());
    let output = args.output.unwrap_or_else(|| config.pipeline.output.clone());

    println!(
        "{} Step 2: extracting series from {}",
        style("»").cyan(),
        download_dir.display()
    );

    let files = collect_inputs(&download_dir.to_string_lossy())?;
    if files.is_empty() {
        anyhow::bail!(
            "Pipeline failed at step 2: no PDF files found in {}",
            download_dir.display()
        );
    }
    run_batch(&files, &output, &config)?;

    let finished = Local::now();
    let duration = (finished - started).num_milliseconds() as f64 / 1000.0;

    println!();
    println!("{} Pipeline completed", style("✓").green().bold());
    println!("End time: {}", finished.format("%Y-%m-%d %H:%M:%S"));
    println!("Total duration: {:.2} seconds", duration);
    println!("Output file: {}", output.display());

    Ok(())
}
