//! Wiring of configured components

use std::sync::Arc;

use application::error::ApplicationError;
use application::services::ChartDataBuilder;
use tracing::{info, warn};

use crate::adapters::OpenWeatherAdapter;
use crate::config::AppConfig;

/// Build a chart builder backed by OpenWeatherMap from configuration
///
/// # Errors
///
/// Returns an error if the label timezone is invalid or the HTTP client
/// cannot be created.
pub fn chart_builder_from_config(config: &AppConfig) -> Result<ChartDataBuilder, ApplicationError> {
    if !config.forecast.has_api_key() {
        warn!("No forecast API key configured, requests will be rejected");
    }

    let timezone = config.chart.timezone()?;
    let adapter = OpenWeatherAdapter::new(config.forecast.to_forecast_config())?;

    info!(
        base_url = %config.forecast.base_url,
        timezone = %timezone,
        "Chart builder ready"
    );

    Ok(ChartDataBuilder::new(Arc::new(adapter)).with_timezone(timezone))
}
