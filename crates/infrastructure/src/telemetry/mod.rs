//! Logging infrastructure
//!
//! Installs the global `tracing` subscriber.

mod subscriber;

pub use subscriber::{TelemetryConfig, TelemetryError, init_telemetry};
