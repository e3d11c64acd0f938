//! Application configuration
//!
//! Split into focused sub-modules:
//! - `integrations`: OpenWeatherMap forecast provider, default location
//! - `chart`: chart rendering (label timezone)
//!
//! Sources are layered: an optional `trendcast.toml` in the working
//! directory, then `TRENDCAST_` environment variables using `__` for nesting
//! (e.g. `TRENDCAST_FORECAST__API_KEY`).

mod chart;
mod integrations;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use chart::ChartAppConfig;
pub use integrations::{ForecastAppConfig, GeoLocationConfig};

use crate::telemetry::TelemetryConfig;

/// Base name of the optional configuration file
const CONFIG_FILE_NAME: &str = "trendcast";

/// Prefix of overriding environment variables
const ENV_PREFIX: &str = "TRENDCAST";

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Forecast provider settings
    #[serde(default)]
    pub forecast: ForecastAppConfig,

    /// Chart settings
    #[serde(default)]
    pub chart: ChartAppConfig,

    /// Logging settings
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from `trendcast.toml` (if present) and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or does not deserialize.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::from_sources(
            config::File::with_name(CONFIG_FILE_NAME).required(false),
            environment(),
        )
    }

    /// Load configuration from an explicit file, then the environment
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable, or invalid.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading configuration file");
        Self::from_sources(config::File::from(path).required(true), environment())
    }

    fn from_sources<S>(file: S, env: config::Environment) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        config::Config::builder()
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
