//! Infrastructure layer - Adapters for external systems
//!
//! Implements the forecast port on top of the OpenWeatherMap client, and
//! provides configuration loading, logging setup and wiring.

pub mod adapters;
pub mod bootstrap;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use bootstrap::chart_builder_from_config;
pub use config::{AppConfig, ChartAppConfig, ForecastAppConfig, GeoLocationConfig};
pub use telemetry::{TelemetryConfig, TelemetryError, init_telemetry};
