//! Application layer - Use cases and orchestration
//!
//! Defines the forecast port and the chart-building use case on top of it.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
