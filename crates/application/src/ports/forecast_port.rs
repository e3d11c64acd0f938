//! Forecast service port
//!
//! Defines the interface for forecast retrieval.

use domain::{ForecastResponse, GeoLocation};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for fetching a 3-hour step forecast
///
/// Calls are blocking: an implementation returns only once the upstream
/// exchange has completed or failed, and leaves no work in flight.
#[cfg_attr(test, automock)]
pub trait ForecastPort: Send + Sync {
    /// Fetch the forecast for a location
    fn fetch_forecast(&self, location: &GeoLocation) -> Result<ForecastResponse, ApplicationError>;
}
