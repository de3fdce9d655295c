//! # Quote Configuration
//!
//! Operator settings for `wyshkit-quote`.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     WYSHKIT_DB_PATH=/srv/wyshkit/catalog.db                            │
//! │     WYSHKIT_FREE_THRESHOLD_PAISE=300000                                │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <PATH>, or                                                │
//! │     ~/.config/wyshkit/quote.toml (Linux)                               │
//! │     ~/Library/Application Support/in.wyshkit.wyshkit/quote.toml (macOS)│
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     Threshold from the catalog, ₹50 fallback fee                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # quote.toml
//! database_path = "/srv/wyshkit/catalog.db"
//! log_filter = "info"
//!
//! [delivery]
//! free_threshold_paise = 300000   # overrides the catalog value
//! fallback_fee_paise = 5000
//! close_to_free_window_paise = 100000
//!
//! [[delivery.distance_bands]]
//! max_km = 5.0
//! surcharge_paise = 0
//!
//! [[delivery.distance_bands]]
//! surcharge_paise = 15000         # no max_km: everything beyond
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use wyshkit_core::{
    DeliveryFeeSchedule, DistanceBand, Money, DEFAULT_CLOSE_TO_FREE_WINDOW,
    DEFAULT_FALLBACK_DELIVERY_FEE,
};

// =============================================================================
// Errors
// =============================================================================

/// Configuration load errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Delivery Settings
// =============================================================================

/// A distance band as written in TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceBandConfig {
    /// Inclusive upper bound in km; omit for the catch-all band.
    #[serde(default)]
    pub max_km: Option<f64>,
    pub surcharge_paise: i64,
}

impl From<&DistanceBandConfig> for DistanceBand {
    fn from(band: &DistanceBandConfig) -> Self {
        DistanceBand {
            max_km: band.max_km,
            surcharge: Money::from_paise(band.surcharge_paise),
        }
    }
}

/// Delivery overrides layered onto the catalog schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliverySettings {
    /// When set, replaces the threshold stored in the catalog.
    #[serde(default)]
    pub free_threshold_paise: Option<i64>,

    /// Charged when no active tier covers the subtotal.
    /// Default: 5000 (₹50)
    #[serde(default = "default_fallback_fee")]
    pub fallback_fee_paise: i64,

    /// Gap below the threshold that shows the "close" banner.
    /// Default: 100000 (₹1,000)
    #[serde(default = "default_close_window")]
    pub close_to_free_window_paise: i64,

    /// Schedule-wide distance surcharges. Empty = none.
    #[serde(default)]
    pub distance_bands: Vec<DistanceBandConfig>,
}

fn default_fallback_fee() -> i64 {
    DEFAULT_FALLBACK_DELIVERY_FEE.paise()
}

fn default_close_window() -> i64 {
    DEFAULT_CLOSE_TO_FREE_WINDOW.paise()
}

impl Default for DeliverySettings {
    fn default() -> Self {
        DeliverySettings {
            free_threshold_paise: None,
            fallback_fee_paise: default_fallback_fee(),
            close_to_free_window_paise: default_close_window(),
            distance_bands: Vec::new(),
        }
    }
}

impl DeliverySettings {
    pub fn fallback_fee(&self) -> Money {
        Money::from_paise(self.fallback_fee_paise)
    }

    /// Layers these settings onto a schedule loaded from the catalog.
    pub fn apply_to(&self, schedule: DeliveryFeeSchedule) -> DeliveryFeeSchedule {
        let mut schedule = schedule
            .with_fallback_fee(self.fallback_fee())
            .with_close_to_free_window(Money::from_paise(self.close_to_free_window_paise))
            .with_distance_bands(self.distance_bands.iter().map(DistanceBand::from).collect());

        if let Some(threshold) = self.free_threshold_paise {
            schedule = schedule.with_free_threshold(Money::from_paise(threshold));
        }
        schedule
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteConfig {
    /// SQLite catalog file.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    #[serde(default)]
    pub delivery: DeliverySettings,
}

fn default_database_path() -> PathBuf {
    directories::ProjectDirs::from("in", "wyshkit", "wyshkit")
        .map(|dirs| dirs.data_dir().join("catalog.db"))
        .unwrap_or_else(|| PathBuf::from("./wyshkit.db"))
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for QuoteConfig {
    fn default() -> Self {
        QuoteConfig {
            database_path: default_database_path(),
            log_filter: default_log_filter(),
            delivery: DeliverySettings::default(),
        }
    }
}

fn parse_paise(key: &str, value: &str) -> ConfigResult<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| ConfigError::Invalid(format!("{key} must be a whole number of paise, got '{value}'")))
}

impl QuoteConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`path`, else the platform config dir)
    /// 3. Environment variables
    ///
    /// An explicit `path` that does not exist is an error; a missing file in
    /// the platform directory is not. Every other problem (unreadable file,
    /// bad TOML, bad `WYSHKIT_*` value, failed validation) is returned.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    fn load_with(path: Option<&Path>, lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(path = %path.display(), "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_overrides(lookup)?;
        config.validate()?;

        Ok(config)
    }

    fn from_file(path: &Path) -> ConfigResult<Self> {
        info!(path = %path.display(), "Loading quote config from file");
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.database_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database_path must not be empty".into()));
        }

        let delivery = &self.delivery;
        if delivery.free_threshold_paise.is_some_and(|paise| paise < 0) {
            return Err(ConfigError::Invalid(
                "delivery.free_threshold_paise cannot be negative".into(),
            ));
        }
        if delivery.fallback_fee_paise < 0 {
            return Err(ConfigError::Invalid(
                "delivery.fallback_fee_paise cannot be negative".into(),
            ));
        }
        if delivery.close_to_free_window_paise < 0 {
            return Err(ConfigError::Invalid(
                "delivery.close_to_free_window_paise cannot be negative".into(),
            ));
        }

        for band in &delivery.distance_bands {
            if band.surcharge_paise < 0 {
                return Err(ConfigError::Invalid(
                    "distance band surcharge cannot be negative".into(),
                ));
            }
            if band.max_km.is_some_and(|km| !km.is_finite() || km <= 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "distance band max_km must be a positive number, got {:?}",
                    band.max_km
                )));
            }
        }

        let catch_alls = delivery.distance_bands.iter().filter(|b| b.max_km.is_none()).count();
        if catch_alls > 1 {
            return Err(ConfigError::Invalid(
                "at most one distance band may omit max_km".into(),
            ));
        }

        Ok(())
    }

    /// Applies `WYSHKIT_*` overrides read through `lookup`.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<()> {
        if let Some(path) = lookup("WYSHKIT_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database_path = PathBuf::from(path);
        }

        if let Some(value) = lookup("WYSHKIT_FREE_THRESHOLD_PAISE") {
            self.delivery.free_threshold_paise = Some(parse_paise("WYSHKIT_FREE_THRESHOLD_PAISE", &value)?);
        }

        if let Some(value) = lookup("WYSHKIT_FALLBACK_FEE_PAISE") {
            self.delivery.fallback_fee_paise = parse_paise("WYSHKIT_FALLBACK_FEE_PAISE", &value)?;
        }

        if let Some(filter) = lookup("WYSHKIT_LOG") {
            self.log_filter = filter;
        }

        Ok(())
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("in", "wyshkit", "wyshkit")
            .map(|dirs| dirs.config_dir().join("quote.toml"))
    }
}
