//! Settings resolution: file values first, then command-line overrides.

use std::path::Path;

use anyhow::{Context, Result};
use vaultstat_settings::{Settings, SettingsOverrides};
use vaultstat_types::OutputFormat;

use crate::cli::GlobalArgs;

/// Load the settings file for `root` (or `--config`) and apply flags.
pub(crate) fn resolve(
    root: &Path,
    global: &GlobalArgs,
    format: Option<OutputFormat>,
    interval_ms: Option<u64>,
) -> Result<Settings> {
    let base = match &global.config {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::discover(root).context("loading vault settings")?,
    };

    let overrides = SettingsOverrides {
        exclude: (!global.exclude.is_empty()).then(|| global.exclude.join(",")),
        drain_interval_ms: interval_ms,
        deletion: global.deletion,
        format,
    };
    base.merge(overrides).context("invalid command-line settings")
}
