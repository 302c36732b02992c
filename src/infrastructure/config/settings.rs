//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file; every section is optional and
//! falls back to its defaults. Secrets such as `HF_API_TOKEN` are read from
//! the environment only, never from the file.
//!
//! # Example
//!
//! ```no_run
//! use optedge::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;
use std::time::Duration as StdDuration;

use chrono::Duration;
use serde::Deserialize;

use super::logging::LoggingConfig;
use crate::adapter::outbound::classifier::huggingface::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use crate::application::classifier::{ModelPreference, ScorerLimits};
use crate::application::scan::ScanSettings;
use crate::application::sentiment::BlendSettings;
use crate::domain::score::ScoringParams;
use crate::error::{ConfigError, Result};

/// Longest accepted social window: ten years.
const MAX_WINDOW_HOURS: u64 = 24 * 365 * 10;

/// Option pricing inputs.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Continuously compounded risk-free rate.
    pub risk_free_rate: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.045,
        }
    }
}

/// Headline and social sentiment settings.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SentimentConfig {
    /// Which headline model to use.
    pub model: ModelPreference,
    /// Texts per classifier call.
    pub batch_size: usize,
    /// Characters kept per headline.
    pub max_chars: usize,
    /// Extremes kept in headline reports.
    pub top_n: usize,
    /// Share of the social signal in fused sentiment, in [0, 1].
    pub social_weight: f64,
    /// Trailing social window in hours.
    pub window_hours: u64,
    /// Consult the social store at all.
    pub social_enabled: bool,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            model: ModelPreference::Auto,
            batch_size: 32,
            max_chars: 512,
            top_n: 3,
            social_weight: 0.25,
            window_hours: 24,
            social_enabled: true,
        }
    }
}

/// Hosted classifier endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Inference API prefix; the model path is appended.
    pub endpoint: String,
    /// Model identifier.
    pub model: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Scan fan-out and output size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Tickers processed concurrently.
    pub workers: usize,
    /// Records kept per ticker.
    pub top_per_ticker: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            top_per_ticker: 25,
        }
    }
}

/// Main application configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub pricing: PricingConfig,

    #[serde(default)]
    pub sentiment: SentimentConfig,

    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Scoring engine constants.
    #[serde(default)]
    pub scoring: ScoringParams,

    #[serde(default)]
    pub scan: ScanConfig,

    /// Path to SQLite database file.
    ///
    /// Defaults to "optedge.db" in the current directory.
    #[serde(default = "default_database_path")]
    pub database: String,
}

fn default_database_path() -> String {
    "optedge.db".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            pricing: PricingConfig::default(),
            sentiment: SentimentConfig::default(),
            classifier: ClassifierConfig::default(),
            scoring: ScoringParams::default(),
            scan: ScanConfig::default(),
            database: default_database_path(),
        }
    }
}

fn invalid(field: &'static str, reason: &str) -> crate::error::Error {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
    .into()
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        if !self.pricing.risk_free_rate.is_finite() {
            return Err(invalid("risk_free_rate", "must be finite"));
        }

        let sentiment = &self.sentiment;
        if !(0.0..=1.0).contains(&sentiment.social_weight) {
            return Err(invalid("social_weight", "must be between 0 and 1"));
        }
        if sentiment.window_hours == 0 || sentiment.window_hours > MAX_WINDOW_HOURS {
            return Err(invalid("window_hours", "must be between 1 and 87600"));
        }
        if sentiment.batch_size == 0 {
            return Err(invalid("batch_size", "must be greater than 0"));
        }
        if sentiment.max_chars == 0 {
            return Err(invalid("max_chars", "must be greater than 0"));
        }

        if self.classifier.endpoint.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "endpoint" }.into());
        }
        if self.classifier.model.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "model" }.into());
        }
        if self.classifier.timeout_secs == 0 {
            return Err(invalid("timeout_secs", "must be greater than 0"));
        }

        let scoring = &self.scoring;
        for (field, value) in [
            ("gap_floor", scoring.gap_floor),
            ("max_spread_penalty", scoring.max_spread_penalty),
            ("scale_headroom", scoring.scale_headroom),
            ("min_scale", scoring.min_scale),
            ("iv_ceiling", scoring.iv_ceiling),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, "must be greater than 0"));
            }
        }
        if !(scoring.liquidity_weight.is_finite() && scoring.liquidity_weight >= 0.0) {
            return Err(invalid("liquidity_weight", "must be 0 or greater"));
        }
        if !(scoring.risk_spread_threshold.is_finite() && scoring.risk_spread_threshold >= 0.0) {
            return Err(invalid("risk_spread_threshold", "must be 0 or greater"));
        }

        if self.scan.workers == 0 {
            return Err(invalid("workers", "must be greater than 0"));
        }
        if self.scan.top_per_ticker == 0 {
            return Err(invalid("top_per_ticker", "must be greater than 0"));
        }

        if self.database.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }

        Ok(())
    }

    /// Initialize logging based on configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Trailing social window.
    #[must_use]
    pub fn social_window(&self) -> Duration {
        Duration::hours(i64::try_from(self.sentiment.window_hours).unwrap_or(24))
    }

    #[must_use]
    pub fn classifier_timeout(&self) -> StdDuration {
        StdDuration::from_secs(self.classifier.timeout_secs)
    }

    #[must_use]
    pub fn scorer_limits(&self) -> ScorerLimits {
        ScorerLimits {
            batch_size: self.sentiment.batch_size,
            max_chars: self.sentiment.max_chars,
        }
    }

    #[must_use]
    pub fn blend_settings(&self) -> BlendSettings {
        BlendSettings {
            weight: self.sentiment.social_weight,
            window: self.social_window(),
            enabled: self.sentiment.social_enabled,
        }
    }

    #[must_use]
    pub fn scan_settings(&self) -> ScanSettings {
        ScanSettings {
            risk_free_rate: self.pricing.risk_free_rate,
            workers: self.scan.workers,
            top_per_ticker: self.scan.top_per_ticker,
            preference: self.sentiment.model,
            top_headlines: self.sentiment.top_n,
        }
    }
}
