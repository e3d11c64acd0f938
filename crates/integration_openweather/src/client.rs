//! OpenWeatherMap forecast client
//!
//! HTTP client for the OpenWeatherMap `/forecast` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use domain::ForecastResponse;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::models::ApiResponse;

/// Forecast client errors
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Connection to the forecast service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to the forecast service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The API key was rejected
    #[error("Unauthorized: the forecast service rejected the API key")]
    Unauthorized,

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Service is temporarily unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Failed to parse response from forecast service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Invalid coordinates provided
    #[error("Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates,
}

/// Forecast service configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// API base URL (default: <https://api.openweathermap.org/data/2.5>)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// OpenWeatherMap API key
    #[serde(default, skip_serializing)]
    pub api_key: String,

    /// Unit system (default: metric)
    #[serde(default = "default_units")]
    pub units: String,

    /// Language for textual fields (default: zh_cn)
    #[serde(default = "default_lang")]
    pub lang: String,

    /// Request timeout in seconds; `None` keeps the transport default
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_units() -> String {
    "metric".to_string()
}

fn default_lang() -> String {
    "zh_cn".to_string()
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            units: default_units(),
            lang: default_lang(),
            timeout_secs: None,
        }
    }
}

impl std::fmt::Debug for ForecastConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForecastConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("units", &self.units)
            .field("lang", &self.lang)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Forecast client trait for fetching 3-hour step forecasts
#[async_trait]
pub trait ForecastClient: Send + Sync {
    /// Fetch and decode the forecast for a location
    async fn fetch_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<ForecastResponse, ForecastError>;

    /// Fetch the forecast, degrading any failure to an empty response
    async fn fetch_or_empty(&self, latitude: f64, longitude: f64) -> ForecastResponse {
        match self.fetch_forecast(latitude, longitude).await {
            Ok(forecast) => forecast,
            Err(e) => {
                warn!(
                    error = %e,
                    lat = latitude,
                    lon = longitude,
                    "Forecast fetch failed, using empty forecast"
                );
                ForecastResponse::default()
            },
        }
    }
}

/// OpenWeatherMap HTTP client implementation
#[derive(Debug)]
pub struct OpenWeatherClient {
    client: Client,
    config: ForecastConfig,
}

impl OpenWeatherClient {
    /// Create a new client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: ForecastConfig) -> Result<Self, ForecastError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ForecastError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create a client with default configuration and the given API key
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_api_key(api_key: impl Into<String>) -> Result<Self, ForecastError> {
        Self::new(ForecastConfig {
            api_key: api_key.into(),
            ..ForecastConfig::default()
        })
    }

    /// The configuration this client was built with
    #[must_use]
    pub const fn config(&self) -> &ForecastConfig {
        &self.config
    }

    fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), ForecastError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(ForecastError::InvalidCoordinates);
        }
        Ok(())
    }

    fn forecast_url(&self) -> String {
        format!("{}/forecast", self.config.base_url.trim_end_matches('/'))
    }

    /// Query parameters in the order the endpoint documents them
    fn query_params(&self, latitude: f64, longitude: f64) -> [(&'static str, String); 5] {
        [
            ("appid", self.config.api_key.clone()),
            ("units", self.config.units.clone()),
            ("lat", latitude.to_string()),
            ("lon", longitude.to_string()),
            ("lang", self.config.lang.clone()),
        ]
    }

    /// The request URL carries the API key, so it is stripped before formatting
    fn map_transport_error(err: reqwest::Error) -> ForecastError {
        let err = err.without_url();
        if err.is_connect() || err.is_timeout() {
            ForecastError::ConnectionFailed(err.to_string())
        } else {
            ForecastError::RequestFailed(err.to_string())
        }
    }

    fn check_status(status: StatusCode) -> Result<(), ForecastError> {
        if status == StatusCode::UNAUTHORIZED {
            return Err(ForecastError::Unauthorized);
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ForecastError::RateLimitExceeded);
        }
        if status.is_server_error() {
            return Err(ForecastError::ServiceUnavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(ForecastError::RequestFailed(format!("HTTP {status}")));
        }
        Ok(())
    }
}

#[async_trait]
impl ForecastClient for OpenWeatherClient {
    #[instrument(skip(self), fields(lat = %latitude, lon = %longitude))]
    async fn fetch_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<ForecastResponse, ForecastError> {
        Self::validate_coordinates(latitude, longitude)?;

        let url = self.forecast_url();
        debug!(url = %url, "Fetching forecast");

        let response = self
            .client
            .get(&url)
            .query(&self.query_params(latitude, longitude))
            .send()
            .await
            .map_err(Self::map_transport_error)?;

        Self::check_status(response.status())?;

        let body = response
            .text()
            .await
            .map_err(Self::map_transport_error)?;

        let api_response: ApiResponse =
            serde_json::from_str(&body).map_err(|e| ForecastError::ParseError(e.to_string()))?;
        let forecast = api_response.into_forecast();

        debug!(
            points = forecast.points().len(),
            city = ?forecast.city.as_ref().map(|c| c.name.as_str()),
            "Decoded forecast"
        );

        Ok(forecast)
    }
}
