//! Process command - extract a record from one receipt and fill its route sheet.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use routesheet_core::models::record::{FeeCategory, ReceiptRecord};
use routesheet_core::ReceiptPipeline;

use super::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF, image, or saved OCR text)
    #[arg(required = true)]
    input: PathBuf,

    /// Where to store the JSON record (default: from config)
    #[arg(short, long)]
    record: Option<PathBuf>,

    /// Only extract the record, do not fill the route sheet
    #[arg(long)]
    no_sheet: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let record_path = args.record.clone().unwrap_or_else(|| config.record_path());
    let pipeline = ReceiptPipeline::from_config(config);

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Reading receipt...");

    let record = match pipeline.process(&args.input, &record_path) {
        Ok(record) => record,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e.into());
        }
    };

    let sheet_path = if args.no_sheet {
        None
    } else {
        pb.set_message("Filling route sheet...");
        match pipeline.project(&record) {
            Ok(path) => Some(path),
            Err(e) => {
                pb.finish_and_clear();
                return Err(e.into());
            }
        }
    };

    pb.finish_and_clear();

    let output = format_record(&record, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    eprintln!(
        "{} Record saved to {}",
        style("✓").green(),
        record_path.display()
    );
    if let Some(path) = sheet_path {
        eprintln!(
            "{} Route sheet saved to {}",
            style("✓").green(),
            path.display()
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn format_record(record: &ReceiptRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

/// Column names of the CSV rendering.
pub(crate) fn csv_header() -> Vec<String> {
    let mut header: Vec<String> = [
        "council_number",
        "effective_date",
        "expiration_date",
        "term",
        "district_name",
        "district_number",
        "local_unit_number",
        "program",
        "charter_renewal",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    header.extend(FeeCategory::ALL.iter().map(|c| c.as_str().to_string()));
    header
}

/// One CSV row in [`csv_header`] order.
pub(crate) fn csv_row(record: &ReceiptRecord) -> Vec<String> {
    let mut row = vec![
        record.council_number().to_string(),
        record.effective_date().to_string(),
        record.expiration_date().to_string(),
        record.term().to_string(),
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
        record
            .charter_renewal()
            .map(|n| n.to_string())
            .unwrap_or_default(),
    ];
    row.extend(record.prices().iter().map(|(_, count)| count.to_string()));
    row
}

fn format_csv(record: &ReceiptRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(csv_header())?;
    wtr.write_record(csv_row(record))?;
    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &ReceiptRecord) -> String {
    let mut output = String::new();

    let district = match (record.district_name(), record.district_number()) {
        (Some(name), Some(number)) => format!("{} ({})", name, number),
        _ => "unknown".to_string(),
    };
    output.push_str(&format!("Council:  {}\n", record.council_number()));
    output.push_str(&format!("District: {}\n", district));
    output.push_str(&format!(
        "Unit:     {} {}\n",
        record.program().map(|p| p.as_str()).unwrap_or("Unknown Program"),
        record.local_unit_number().unwrap_or("?")
    ));
    output.push_str(&format!(
        "Term:     {} ({} to {})\n",
        record.term(),
        record.effective_date(),
        record.expiration_date()
    ));
    if let Some(quantity) = record.charter_renewal() {
        output.push_str(&format!("Charter renewal: {}\n", quantity));
    }
    output.push('\n');

    output.push_str("Fees:\n");
    for (category, count) in record.prices().iter().filter(|(_, count)| *count > 0) {
        output.push_str(&format!("  {:<26} {}\n", category.as_str(), count));
    }
    output.push_str(&format!("  {:<26} {}\n", "Total", record.prices().total()));

    output
}
