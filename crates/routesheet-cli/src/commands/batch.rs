//! Batch processing command for multiple receipt files.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use routesheet_core::{InputKind, ReceiptPipeline, ReceiptRecord};

use super::load_config;

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching receipt files
    #[arg(required = true)]
    input: String,

    /// Directory for the per-receipt JSON records (default: data dir from config)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Only extract records, do not fill route sheets
    #[arg(long)]
    no_sheet: bool,

    /// Also write summary.csv into the data directory
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Outcome of one receipt.
struct ReceiptOutcome {
    path: PathBuf,
    record: Option<ReceiptRecord>,
    record_path: PathBuf,
    sheet_path: Option<PathBuf>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(dir) = &args.data_dir {
        config.output.data_dir = dir.clone();
    }
    let data_dir = config.output.data_dir.clone();

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file() && InputKind::from_path(p).is_ok())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let pipeline = ReceiptPipeline::from_config(config);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} receipts")
            .unwrap()
            .progress_chars("=>-"),
    );

    // Receipts are handled one at a time, start to finish.
    let mut outcomes = Vec::with_capacity(files.len());
    for path in files {
        let file_start = Instant::now();
        let record_path = record_path_for(&data_dir, &path);

        let result = process_one(&pipeline, &path, &record_path, args.no_sheet);
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok((record, sheet_path)) => outcomes.push(ReceiptOutcome {
                path,
                record: Some(record),
                record_path,
                sheet_path,
                error: None,
                processing_time_ms,
            }),
            Err(e) => {
                let error_msg = e.to_string();
                if !args.continue_on_error {
                    pb.abandon();
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing {} failed: {}", path.display(), error_msg);
                }
                warn!("Failed to process {}: {}", path.display(), error_msg);
                outcomes.push(ReceiptOutcome {
                    path,
                    record: None,
                    record_path,
                    sheet_path: None,
                    error: Some(error_msg),
                    processing_time_ms,
                });
            }
        }

        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    if args.summary {
        let summary_path = data_dir.join("summary.csv");
        write_summary(&summary_path, &outcomes)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = outcomes.iter().filter(|o| o.error.is_some()).collect();

    println!();
    println!(
        "{} Processed {} receipts in {:?}",
        style("✓").green(),
        outcomes.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(outcomes.len() - failed.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for outcome in &failed {
            println!(
                "  - {}: {}",
                outcome.path.display(),
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// `<data_dir>/<input stem>.json`
fn record_path_for(data_dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("receipt");
    data_dir.join(format!("{}.json", stem))
}

fn process_one(
    pipeline: &ReceiptPipeline,
    path: &Path,
    record_path: &Path,
    no_sheet: bool,
) -> routesheet_core::Result<(ReceiptRecord, Option<PathBuf>)> {
    let record = pipeline.process(path, record_path)?;
    debug!("Record for {} saved to {}", path.display(), record_path.display());

    let sheet_path = if no_sheet {
        None
    } else {
        Some(pipeline.project(&record)?)
    };
    Ok((record, sheet_path))
}

fn write_summary(path: &Path, outcomes: &[ReceiptOutcome]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "district_name",
        "district_number",
        "local_unit_number",
        "program",
        "total_fees",
        "record",
        "route_sheet",
        "processing_time_ms",
        "error",
    ])?;

    for outcome in outcomes {
        let filename = outcome
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();
        let time = outcome.processing_time_ms.to_string();

        let row = match &outcome.record {
            Some(record) => vec![
                filename,
                "success".to_string(),
                record.district_name().unwrap_or_default().to_string(),
                record
                    .district_number()
                    .map(|n| n.to_string())
                    .unwrap_or_default(),
                record.local_unit_number().unwrap_or_default().to_string(),
                record
                    .program()
                    .map(|p| p.to_string())
                    .unwrap_or_default(),
                record.prices().total().to_string(),
                outcome.record_path.display().to_string(),
                outcome
                    .sheet_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
                time,
                String::new(),
            ],
            None => {
                let mut row = vec![filename, "error".to_string()];
                row.extend(std::iter::repeat_n(String::new(), 7));
                row.push(time);
                row.push(outcome.error.clone().unwrap_or_default());
                row
            }
        };
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
