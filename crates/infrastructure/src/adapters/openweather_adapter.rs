//! OpenWeatherMap adapter - Implements ForecastPort using integration_openweather
//!
//! The port is synchronous while the HTTP client is async. The adapter owns a
//! small tokio runtime and blocks on it for each fetch; nothing outlives the
//! call.

use std::future::Future;

use application::error::ApplicationError;
use application::ports::ForecastPort;
use domain::{ForecastResponse, GeoLocation};
use integration_openweather::{ForecastClient, ForecastConfig, ForecastError, OpenWeatherClient};
use tokio::runtime::{Builder, Handle, Runtime};
use tracing::{debug, instrument, warn};

/// Blocking forecast adapter backed by the OpenWeatherMap client
pub struct OpenWeatherAdapter {
    client: OpenWeatherClient,
    runtime: FetchRuntime,
}

impl std::fmt::Debug for OpenWeatherAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherAdapter")
            .field("client", &"OpenWeatherClient")
            .field("base_url", &self.client.config().base_url)
            .finish_non_exhaustive()
    }
}

impl OpenWeatherAdapter {
    /// Create an adapter from client configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or the runtime fails to initialize.
    pub fn new(config: ForecastConfig) -> Result<Self, ApplicationError> {
        let client =
            OpenWeatherClient::new(config).map_err(|e| ApplicationError::Internal(e.to_string()))?;
        Self::with_client(client)
    }

    /// Wrap an existing client
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime fails to initialize.
    pub fn with_client(client: OpenWeatherClient) -> Result<Self, ApplicationError> {
        Ok(Self {
            client,
            runtime: FetchRuntime::new()?,
        })
    }

    /// Fetch the forecast, degrading any failure to an empty response
    #[instrument(skip(self), fields(lat = location.latitude(), lon = location.longitude()))]
    pub fn fetch_or_empty(&self, location: &GeoLocation) -> ForecastResponse {
        let result = self.runtime.block_on(
            self.client
                .fetch_or_empty(location.latitude(), location.longitude()),
        );

        match result {
            Ok(forecast) => forecast,
            Err(e) => {
                warn!(error = %e, "Forecast runtime failed, using empty forecast");
                ForecastResponse::default()
            },
        }
    }

    /// Map integration forecast error to application error
    fn map_error(err: ForecastError) -> ApplicationError {
        match err {
            ForecastError::ConnectionFailed(e)
            | ForecastError::RequestFailed(e)
            | ForecastError::ServiceUnavailable(e) => ApplicationError::ExternalService(e),
            ForecastError::ParseError(e) => ApplicationError::Internal(e),
            ForecastError::Unauthorized => ApplicationError::Configuration(
                "Forecast service rejected the API key".into(),
            ),
            ForecastError::InvalidCoordinates => {
                ApplicationError::InvalidOperation("Invalid coordinates".into())
            },
            ForecastError::RateLimitExceeded => ApplicationError::RateLimited,
        }
    }
}

impl ForecastPort for OpenWeatherAdapter {
    #[instrument(skip(self), fields(lat = location.latitude(), lon = location.longitude()))]
    fn fetch_forecast(&self, location: &GeoLocation) -> Result<ForecastResponse, ApplicationError> {
        let result = self
            .runtime
            .block_on(
                self.client
                    .fetch_forecast(location.latitude(), location.longitude()),
            )?
            .map_err(Self::map_error);

        match &result {
            Ok(forecast) => {
                debug!(points = forecast.points().len(), "Retrieved forecast");
            },
            Err(e) => {
                debug!(error = %e, "Failed to get forecast");
            },
        }

        result
    }
}

/// Runtime driving the async client to completion
struct FetchRuntime(Option<Runtime>);

impl FetchRuntime {
    fn new() -> Result<Self, ApplicationError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("forecast-fetch")
            .enable_all()
            .build()
            .map_err(|e| ApplicationError::Internal(format!("Failed to start runtime: {e}")))?;
        Ok(Self(Some(runtime)))
    }

    /// Block until `future` completes
    ///
    /// Inside an async context the wait moves to a scoped helper thread, since
    /// blocking a runtime thread on another runtime panics.
    fn block_on<F>(&self, future: F) -> Result<F::Output, ApplicationError>
    where
        F: Future + Send,
        F::Output: Send,
    {
        let runtime = self
            .0
            .as_ref()
            .ok_or_else(|| ApplicationError::Internal("Runtime already shut down".into()))?;

        if Handle::try_current().is_err() {
            return Ok(runtime.block_on(future));
        }

        std::thread::scope(|scope| {
            scope
                .spawn(move || runtime.block_on(future))
                .join()
                .map_err(|_| ApplicationError::Internal("Forecast fetch thread panicked".into()))
        })
    }
}

impl Drop for FetchRuntime {
    fn drop(&mut self) {
        // Dropping a runtime from async code panics; shut down without waiting.
        if let Some(runtime) = self.0.take() {
            runtime.shutdown_background();
        }
    }
}
