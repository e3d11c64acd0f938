//! Application services

mod chart_service;

pub use chart_service::{ChartDataBuilder, ChartError, chart_from_forecast};
