//! Forecast provider configuration

use domain::{DomainError, GeoLocation};
use integration_openweather::ForecastConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;

/// OpenWeatherMap forecast configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ForecastAppConfig {
    /// API base URL, without the `/forecast` path
    #[serde(default = "default_forecast_base_url")]
    pub base_url: String,

    /// OpenWeatherMap API key
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Unit system passed as `units`
    #[serde(default = "default_units")]
    pub units: String,

    /// Language passed as `lang`
    #[serde(default = "default_lang")]
    pub lang: String,

    /// Request timeout in seconds (unset keeps the transport default)
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Location charted when the caller does not supply one
    #[serde(default)]
    pub default_location: GeoLocationConfig,
}

fn default_forecast_base_url() -> String {
    ForecastConfig::default().base_url
}

fn default_units() -> String {
    "metric".to_string()
}

fn default_lang() -> String {
    "zh_cn".to_string()
}

impl Default for ForecastAppConfig {
    fn default() -> Self {
        Self {
            base_url: default_forecast_base_url(),
            api_key: None,
            units: default_units(),
            lang: default_lang(),
            timeout_secs: None,
            default_location: GeoLocationConfig::default(),
        }
    }
}

impl fmt::Debug for ForecastAppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForecastAppConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("units", &self.units)
            .field("lang", &self.lang)
            .field("timeout_secs", &self.timeout_secs)
            .field("default_location", &self.default_location)
            .finish()
    }
}

impl ForecastAppConfig {
    /// Whether an API key has been configured
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|key| !key.expose_secret().is_empty())
    }

    /// Convert to the client configuration
    #[must_use]
    pub fn to_forecast_config(&self) -> ForecastConfig {
        ForecastConfig {
            base_url: self.base_url.clone(),
            api_key: self
                .api_key
                .as_ref()
                .map(|key| key.expose_secret().to_string())
                .unwrap_or_default(),
            units: self.units.clone(),
            lang: self.lang.clone(),
            timeout_secs: self.timeout_secs,
        }
    }

    /// The configured default location
    ///
    /// # Errors
    ///
    /// Returns an error if the configured coordinates are out of range.
    pub fn default_location(&self) -> Result<GeoLocation, DomainError> {
        self.default_location.to_geo_location()
    }
}

/// Geographic location configuration (latitude/longitude pair)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocationConfig {
    /// Latitude (-90.0 to 90.0)
    pub latitude: f64,
    /// Longitude (-180.0 to 180.0)
    pub longitude: f64,
}

impl Default for GeoLocationConfig {
    fn default() -> Self {
        let tokyo = GeoLocation::tokyo();
        Self {
            latitude: tokyo.latitude(),
            longitude: tokyo.longitude(),
        }
    }
}

impl GeoLocationConfig {
    /// Convert to domain `GeoLocation` value object
    ///
    /// # Errors
    ///
    /// Returns an error if the coordinates are out of range.
    pub fn to_geo_location(&self) -> Result<GeoLocation, DomainError> {
        GeoLocation::new(self.latitude, self.longitude)
    }
}
