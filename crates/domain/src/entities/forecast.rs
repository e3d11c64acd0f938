//! Decoded forecast payload
//!
//! A 3-hour-step forecast for one location. Every top-level field may be
//! absent; `ForecastResponse::default()` is the empty response a failed
//! fetch degrades to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level decoded forecast
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    /// Upstream status code (e.g. `"200"`)
    pub cod: Option<String>,
    /// Upstream message counter
    pub message: Option<i64>,
    /// Number of points the upstream reported
    pub cnt: Option<u32>,
    /// Forecast points in chronological order
    pub points: Option<Vec<ForecastPoint>>,
    /// The city the forecast was resolved to
    pub city: Option<CityInfo>,
}

impl ForecastResponse {
    /// Forecast points, or an empty slice when absent
    #[must_use]
    pub fn points(&self) -> &[ForecastPoint] {
        self.points.as_deref().unwrap_or_default()
    }

    /// Whether the response carries no forecast points
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points().is_empty()
    }
}

/// One forecast step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Instant the forecast step is valid for
    pub timestamp: DateTime<Utc>,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Probability of precipitation (0.0 - 1.0)
    pub precipitation_probability: f64,
}

/// City metadata attached to a forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityInfo {
    pub id: i64,
    pub name: String,
    pub coord: Coord,
    pub country: String,
}

/// Raw coordinates as reported by the upstream
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}
