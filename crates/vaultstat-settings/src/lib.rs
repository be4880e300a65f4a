//! # vaultstat-settings
//!
//! **Tier 0 (Pure Settings)**
//!
//! Clap-free settings for the engine and the CLI.
//!
//! ## What belongs here
//! * The `Settings` data type with serde defaults
//! * TOML loading and validation
//! * Merging command-line overrides
//!
//! ## What does NOT belong here
//! * Clap parsing (the `vaultstat` crate owns its arguments)
//! * Anything that touches the vault itself

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use vaultstat_exclude::ExcludeSet;

// Re-export the enums settings are made of
pub use vaultstat_types::{DeletionPolicy, OutputFormat};

/// Settings file looked up in the vault root.
pub const SETTINGS_FILE_NAME: &str = "vaultstat.toml";

/// Default delay between drain passes, in milliseconds.
pub const DEFAULT_DRAIN_INTERVAL_MS: u64 = 2000;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings TOML{}: {source}", location(.path))]
    Parse {
        path: Option<PathBuf>,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid settings: {0}")]
    Invalid(String),
}

fn location(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" in {}", p.display()))
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Excluded directory names, separated by commas or whitespace.
    pub exclude: String,

    /// Delay between drain passes while watching.
    pub drain_interval_ms: u64,

    /// What happens to a stored record whose file is gone.
    pub deletion: DeletionPolicy,

    /// Output format of `scan`.
    pub format: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            exclude: String::new(),
            drain_interval_ms: DEFAULT_DRAIN_INTERVAL_MS,
            deletion: DeletionPolicy::default(),
            format: OutputFormat::default(),
        }
    }
}

/// Values that replace the corresponding settings when present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    pub exclude: Option<String>,
    pub drain_interval_ms: Option<u64>,
    pub deletion: Option<DeletionPolicy>,
    pub format: Option<OutputFormat>,
}

impl Settings {
    /// Parse and validate settings from a TOML string.
    ///
    /// ```
    /// use vaultstat_settings::{DeletionPolicy, Settings};
    ///
    /// let settings = Settings::parse("deletion = \"retain\"").unwrap();
    /// assert_eq!(settings.deletion, DeletionPolicy::Retain);
    /// assert_eq!(settings.drain_interval_ms, 2000);
    /// ```
    pub fn parse(s: &str) -> Result<Self, SettingsError> {
        let settings: Self =
            toml::from_str(s).map_err(|source| SettingsError::Parse { path: None, source })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = toml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: Some(path.to_path_buf()),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load `vaultstat.toml` from `root` when it exists, defaults otherwise.
    pub fn discover(root: &Path) -> Result<Self, SettingsError> {
        let candidate = root.join(SETTINGS_FILE_NAME);
        if candidate.is_file() {
            Self::from_file(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.drain_interval_ms == 0 {
            return Err(SettingsError::Invalid(
                "drain_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply `overrides` and validate the result.
    pub fn merge(mut self, overrides: SettingsOverrides) -> Result<Self, SettingsError> {
        if let Some(exclude) = overrides.exclude {
            self.exclude = exclude;
        }
        if let Some(ms) = overrides.drain_interval_ms {
            self.drain_interval_ms = ms;
        }
        if let Some(deletion) = overrides.deletion {
            self.deletion = deletion;
        }
        if let Some(format) = overrides.format {
            self.format = format;
        }
        self.validate()?;
        Ok(self)
    }

    #[must_use]
    pub fn exclude_set(&self) -> ExcludeSet {
        ExcludeSet::parse(&self.exclude)
    }

    #[must_use]
    pub fn drain_interval(&self) -> Duration {
        Duration::from_millis(self.drain_interval_ms)
    }
}
