//! Configuration loading and typed config structures for Outfitter.
//!
//! The canonical configuration lives in `outfitter.yaml`. Every section is
//! optional and falls back to the standard economy:
//!
//! ```yaml
//! depreciation:
//!   min_value: 0.40
//!   max_value: 0.90
//!   loss_per_wear: 0.0020
//! wear:
//!   used: { min_fraction: 0.2, max_fraction: 0.5 }
//!   plundered: { min_fraction: 0.7, max_fraction: 0.9 }
//! logging:
//!   level: info
//! catalog:
//!   - name: Laser Cannon
//!     cost: 12000
//!     category: Guns
//!     attributes: { mass: 8 }
//! ```
//!
//! The `OUTFITTER_LOG` environment variable overrides `logging.level`.

use std::path::Path;

use rand::Rng;
use serde::Deserialize;

use outfitter_ledger::{DepreciationCurve, LedgerError, OutfitGroup, WearPreset, WearRange};
use outfitter_types::{Catalog, CatalogError, OutfitDefinition};

/// Environment variable overriding the configured log level.
pub const LOG_LEVEL_ENV: &str = "OUTFITTER_LOG";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A curve or wear range failed validation.
    #[error("invalid economy settings: {source}")]
    Economy {
        /// The underlying validation error.
        #[from]
        source: LedgerError,
    },

    /// A catalog entry could not be registered.
    #[error("invalid catalog entry: {source}")]
    Catalog {
        /// The underlying catalog error.
        #[from]
        source: CatalogError,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level Outfitter configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OutfitterConfig {
    /// Depreciation curve used to price every ledger.
    #[serde(default)]
    pub depreciation: DepreciationCurve,

    /// Starting-wear bands for second-hand acquisitions.
    #[serde(default)]
    pub wear: WearConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Outfit definitions to seed the catalog with.
    #[serde(default)]
    pub catalog: Vec<OutfitDefinition>,
}

impl OutfitterConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if it is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::parse(&contents)?;
        tracing::info!(path = %path.display(), outfits = config.catalog.len(), "Configuration loaded");
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.logging.apply_env_overrides();
        Ok(config)
    }

    /// Check the curve and wear bands.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Economy`] naming the first invalid setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.depreciation.validate()?;
        self.wear.used.validate()?;
        self.wear.plundered.validate()?;
        Ok(())
    }

    /// Register every configured outfit in a fresh catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Catalog`] for the first rejected definition.
    pub fn build_catalog(&self) -> Result<Catalog, ConfigError> {
        Ok(Catalog::from_definitions(self.catalog.iter().cloned())?)
    }

    /// An empty ledger priced on the configured curve.
    pub fn new_group(&self) -> OutfitGroup {
        OutfitGroup::with_curve(self.depreciation)
    }

    /// Draw a starting wear for an outfit acquired under `preset`.
    pub fn random_wear<R: Rng + ?Sized>(&self, rng: &mut R, preset: WearPreset) -> i32 {
        self.depreciation.random_wear(rng, self.wear.range(preset))
    }
}

/// Starting-wear bands, as fractions of full depreciation.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct WearConfig {
    /// Outfits bought from a used dealer (default: 20%--50%).
    #[serde(default = "default_used_range")]
    pub used: WearRange,

    /// Outfits captured from disabled ships (default: 70%--90%).
    #[serde(default = "default_plundered_range")]
    pub plundered: WearRange,
}

impl Default for WearConfig {
    fn default() -> Self {
        Self {
            used: default_used_range(),
            plundered: default_plundered_range(),
        }
    }
}

impl WearConfig {
    /// The configured band for `preset`.
    pub const fn range(&self, preset: WearPreset) -> WearRange {
        match preset {
            WearPreset::Used => self.used,
            WearPreset::Plundered => self.plundered,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl LoggingConfig {
    /// Replace the level with `OUTFITTER_LOG` when it is set.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides read through `lookup`, keyed by variable name.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup(LOG_LEVEL_ENV) {
            self.level = val;
        }
    }
}

const fn default_used_range() -> WearRange {
    WearPreset::Used.range()
}

const fn default_plundered_range() -> WearRange {
    WearPreset::Plundered.range()
}

fn default_log_level() -> String {
    "info".to_owned()
}
