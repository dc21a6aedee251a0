//! Project command - fill the route sheet from a stored JSON record.

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use routesheet_core::ReceiptPipeline;

use super::load_config;

/// Arguments for the project command.
#[derive(Args)]
pub struct ProjectArgs {
    /// Record file (default: the configured record path)
    record: Option<PathBuf>,

    /// Directory for the generated route sheet (default: from config)
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

pub fn run(args: ProjectArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(dir) = args.output_dir {
        config.output.output_dir = dir;
    }

    let record_path = args.record.unwrap_or_else(|| config.record_path());
    if !record_path.exists() {
        anyhow::bail!("Record file not found: {}", record_path.display());
    }

    info!("Projecting {}", record_path.display());
    let pipeline = ReceiptPipeline::from_config(config);
    let (record, sheet_path) = pipeline.project_file(&record_path)?;

    println!(
        "{} Route sheet for {} {} saved to {}",
        style("✓").green(),
        record.district_name().unwrap_or("Unknown"),
        record.local_unit_number().unwrap_or("Unknown"),
        sheet_path.display()
    );

    Ok(())
}
