//! Canonical test configurations.
//!
//! Single source of truth for config values used across tests.

use crate::infrastructure::config::settings::Config;

/// A complete configuration file exercising every section.
pub const SAMPLE_TOML: &str = r#"
database = "optedge-test.db"

[logging]
level = "debug"
format = "json"

[pricing]
risk_free_rate = 0.05

[sentiment]
model = "auto"
batch_size = 8
max_chars = 256
top_n = 2
social_weight = 0.4
window_hours = 6
social_enabled = true

[classifier]
endpoint = "http://127.0.0.1:9/models"
model = "ProsusAI/finbert"
timeout_secs = 5

[scoring]
gap_floor = 0.01
max_spread_penalty = 5.0
liquidity_weight = 0.25
scale_headroom = 1.5
min_scale = 1e-6
risk_spread_threshold = 1.0
min_interest = 10
iv_ceiling = 5.0

[scan]
workers = 2
top_per_ticker = 10
"#;

/// Default configuration pointed at `database`.
pub fn with_database(database: impl Into<String>) -> Config {
    Config {
        database: database.into(),
        ..Config::default()
    }
}

/// Configuration with the social signal switched off.
pub fn headline_only() -> Config {
    let mut config = Config::default();
    config.sentiment.social_enabled = false;
    config
}
