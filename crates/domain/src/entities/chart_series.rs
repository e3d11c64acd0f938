//! Chart-ready forecast series
//!
//! The value handed to a renderer: a fixed window of forecast points with
//! temperatures rescaled into `(0, 1)` and precipitation in reverse order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of forecast points in a chart window
pub const CHART_POINTS: usize = 8;

/// Chart-ready forecast series
///
/// An empty `city` marks the "no data" state: every sequence is empty and
/// `max == min == 0.0`. Otherwise every sequence holds exactly
/// [`CHART_POINTS`] values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    /// City name, empty when no forecast was available
    pub city: String,
    /// Highest raw temperature in the window (Celsius)
    pub max: f64,
    /// Lowest raw temperature in the window (Celsius)
    pub min: f64,
    /// Forecast instants, chronological
    pub timestamps: Vec<DateTime<Utc>>,
    /// Two-digit hour labels, chronological
    pub hour_labels: Vec<String>,
    /// Normalized temperatures in `(0, 1)`, chronological
    pub temperatures: Vec<f64>,
    /// Precipitation probabilities, reverse chronological
    pub precipitation: Vec<f64>,
}

impl ChartSeries {
    /// The "no data" series
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether this is the "no data" series
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.city.is_empty()
    }

    /// Maximum temperature as a whole-degree label, e.g. `"23°C"`
    #[must_use]
    pub fn max_label(&self) -> String {
        degrees_label(self.max)
    }

    /// Minimum temperature as a whole-degree label, e.g. `"17°C"`
    #[must_use]
    pub fn min_label(&self) -> String {
        degrees_label(self.min)
    }
}

fn degrees_label(value: f64) -> String {
    format!("{value:.0}°C")
}

/// Rescale a temperature into `(0, 1)` relative to the window's bounds
///
/// The coldest point maps to `1 / (max - min + 2)` and the hottest to
/// `(max - min + 1) / (max - min + 2)`, so no bar is ever zero-height or full.
/// A flat window (`max == min`) maps every point to `0.5`. Spreads too wide
/// for `f64` to tell `spread + 1` from `spread + 2` are clamped to the
/// nearest representable values inside the interval.
#[must_use]
pub fn normalize_temperature(temperature: f64, min: f64, max: f64) -> f64 {
    const BELOW_ONE: f64 = 1.0 - f64::EPSILON / 2.0;
    ((temperature - min + 1.0) / (max - min + 2.0)).clamp(f64::MIN_POSITIVE, BELOW_ONE)
}
