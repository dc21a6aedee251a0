//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod process;
pub mod project;

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use routesheet_core::RouteSheetConfig;

/// Per-user configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("routesheet")
        .join("config.json")
}

/// Configuration file in effect: `--config` if given, else the per-user file.
pub fn config_file_path(config_path: Option<&str>) -> PathBuf {
    config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

/// Load the configuration for a command.
///
/// An explicit `--config` must exist; the per-user file is optional and
/// defaults apply without it.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<RouteSheetConfig> {
    if let Some(path) = config_path {
        return read_config(Path::new(path));
    }

    let path = default_config_path();
    if path.exists() {
        read_config(&path)
    } else {
        debug!("No config file at {}, using defaults", path.display());
        Ok(RouteSheetConfig::default())
    }
}

fn read_config(path: &Path) -> anyhow::Result<RouteSheetConfig> {
    debug!("Loading config from {}", path.display());
    RouteSheetConfig::from_file(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}
