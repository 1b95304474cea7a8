//! Static configuration loaded once at startup.
//!
//! Values come from an optional `pihole-statsd.{toml,yaml,json}` file in the
//! working directory, overridden by `PIHOLE_STATSD_*` environment variables:
//!
//! ```toml
//! api_host = "192.168.1.28"
//! metrics_host = "192.168.1.128"
//! metrics_port = 8125
//! tag_prefix = "_t_"
//! poll_interval_ms = 1000
//! debug = false
//! ```

use std::path::Path;
use std::time::Duration;

use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;

use crate::metric::DEFAULT_TAG_PREFIX;
use crate::transport::DEFAULT_STATSD_PORT;
use crate::ExporterError;

const FILE_NAME: &str = "pihole-statsd";
const ENV_PREFIX: &str = "PIHOLE_STATSD";

/// Exporter settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Host (and optional port) of the Pi-hole admin interface.
    pub api_host: String,
    /// Host of the statsd aggregator.
    pub metrics_host: String,
    pub metrics_port: u16,
    pub tag_prefix: String,
    pub poll_interval_ms: u64,
    /// Print payloads instead of sending them.
    pub debug: bool,
}

impl Settings {
    /// Load from the default file (if present) and the environment.
    pub fn load() -> Result<Self, ExporterError> {
        let config = defaults()?
            .add_source(File::with_name(FILE_NAME).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;
        Self::from_config(config)
    }

    /// Load from a specific file, still honoring the environment.
    pub fn load_from(path: &Path) -> Result<Self, ExporterError> {
        let config = defaults()?
            .add_source(File::from(path))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;
        Self::from_config(config)
    }

    /// Deserialize and validate an already built config.
    pub fn from_config(config: Config) -> Result<Self, ExporterError> {
        let settings: Settings = config.try_deserialize()?;
        if settings.poll_interval_ms == 0 {
            return Err(ExporterError::Config(config::ConfigError::Message(
                "poll_interval_ms must be greater than zero".to_string(),
            )));
        }
        Ok(settings)
    }

    /// Time between two ticks.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ExporterError> {
    Ok(Config::builder()
        .set_default("metrics_port", i64::from(DEFAULT_STATSD_PORT))?
        .set_default("tag_prefix", DEFAULT_TAG_PREFIX)?
        .set_default("poll_interval_ms", 1000i64)?
        .set_default("debug", false)?)
}
