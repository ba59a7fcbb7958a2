use serde::Deserialize;
use service_core::config::{self as core_config, get_env, is_production};
use service_core::error::AppError;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct IndexerConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub addok: AddokConfig,
    pub telemetry: TelemetryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddokConfig {
    /// Executable providing the `batch` and `ngrams` subcommands.
    pub bin: String,
    /// Input file handed to `batch`. Placed there by an external job.
    pub batch_file: String,
    /// Pause after each step before moving on.
    pub settle_delay_secs: u64,
}

impl AddokConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_secs)
    }
}

impl Default for AddokConfig {
    fn default() -> Self {
        Self {
            bin: "addok".to_string(),
            batch_file: "/daily/gtm.json".to_string(),
            settle_delay_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    pub log_level: String,
    /// When set, spans are exported to this OTLP collector.
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            otlp_endpoint: None,
        }
    }
}

impl IndexerConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common_config = core_config::Config::load()?;
        let is_prod = is_production();
        let defaults = AddokConfig::default();

        Ok(IndexerConfig {
            common: common_config,
            addok: AddokConfig {
                bin: get_env("ADDOK_BIN", Some(&defaults.bin), is_prod)?,
                batch_file: get_env("ADDOK_BATCH_FILE", Some(&defaults.batch_file), is_prod)?,
                settle_delay_secs: get_env(
                    "SETTLE_DELAY_SECS",
                    Some(&defaults.settle_delay_secs.to_string()),
                    is_prod,
                )?
                .parse()
                .map_err(|e| {
                    AppError::ConfigError(anyhow::anyhow!("Invalid SETTLE_DELAY_SECS: {}", e))
                })?,
            },
            telemetry: TelemetryConfig {
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
            },
        })
    }
}
