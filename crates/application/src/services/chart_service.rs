//! Chart data service
//!
//! Turns a 3-hour step forecast into the fixed-size series a trend chart
//! renders: the first [`CHART_POINTS`] steps, temperatures rescaled into
//! `(0, 1)`, hour labels, and precipitation in reverse order.

use std::{fmt, sync::Arc};

use domain::{
    CHART_POINTS, ChartSeries, ForecastResponse, GeoLocation, Timezone, normalize_temperature,
};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::{error::ApplicationError, ports::ForecastPort};

/// Reasons a chart series could not be built
#[derive(Debug, Error)]
pub enum ChartError {
    /// Fetching the forecast failed
    #[error("Forecast fetch failed: {0}")]
    Fetch(#[from] ApplicationError),

    /// The forecast carried no points
    #[error("Forecast contains no points")]
    NoForecast,

    /// The forecast carried points but no (or an unnamed) city
    #[error("Forecast has points but no city")]
    MissingCity,

    /// Fewer points than a chart window needs
    #[error("Forecast has {found} points, at least {needed} required")]
    InsufficientPoints { found: usize, needed: usize },
}

/// Builds chart series for a location
///
/// Stateless apart from its port and display timezone; concurrent callers
/// do not share anything mutable.
pub struct ChartDataBuilder {
    forecast: Arc<dyn ForecastPort>,
    timezone: Timezone,
}

impl fmt::Debug for ChartDataBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartDataBuilder")
            .field("timezone", &self.timezone)
            .finish_non_exhaustive()
    }
}

impl ChartDataBuilder {
    /// Create a builder that labels hours in the host's local time
    pub fn new(forecast: Arc<dyn ForecastPort>) -> Self {
        Self {
            forecast,
            timezone: Timezone::local(),
        }
    }

    /// Label hours in the given timezone instead
    #[must_use]
    pub fn with_timezone(mut self, timezone: Timezone) -> Self {
        self.timezone = timezone;
        self
    }

    /// Timezone used for hour labels
    #[must_use]
    pub const fn timezone(&self) -> Timezone {
        self.timezone
    }

    /// Build the chart series for a location
    ///
    /// Blocks until the forecast fetch completes. Every failure collapses to
    /// [`ChartSeries::empty`]; callers check [`ChartSeries::is_empty`].
    #[instrument(skip(self), fields(location = %location))]
    pub fn build(&self, location: &GeoLocation) -> ChartSeries {
        match self.try_build(location) {
            Ok(series) => series,
            Err(e) => {
                warn!(error = %e, "Chart data unavailable, returning empty series");
                ChartSeries::empty()
            },
        }
    }

    /// Build the chart series, keeping the reason for any failure
    pub fn try_build(&self, location: &GeoLocation) -> Result<ChartSeries, ChartError> {
        let forecast = self.forecast.fetch_forecast(location)?;
        let series = chart_from_forecast(&forecast, &self.timezone)?;
        debug!(city = %series.city, max = series.max, min = series.min, "Built chart series");
        Ok(series)
    }
}

/// Transform a decoded forecast into a chart series
///
/// Only the first [`CHART_POINTS`] points are used. Timestamps, labels and
/// temperatures keep chronological order; precipitation is reversed.
pub fn chart_from_forecast(
    forecast: &ForecastResponse,
    timezone: &Timezone,
) -> Result<ChartSeries, ChartError> {
    let points = forecast.points();
    if points.is_empty() {
        return Err(ChartError::NoForecast);
    }

    let city = forecast
        .city
        .as_ref()
        .filter(|c| !c.name.is_empty())
        .ok_or(ChartError::MissingCity)?;

    let window = points
        .get(..CHART_POINTS)
        .ok_or(ChartError::InsufficientPoints {
            found: points.len(),
            needed: CHART_POINTS,
        })?;

    let timestamps: Vec<_> = window.iter().map(|p| p.timestamp).collect();
    let raw: Vec<f64> = window.iter().map(|p| p.temperature).collect();
    let precipitation = window
        .iter()
        .rev()
        .map(|p| p.precipitation_probability)
        .collect();

    let max = raw.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = raw.iter().copied().fold(f64::INFINITY, f64::min);

    let temperatures = raw
        .iter()
        .map(|&t| normalize_temperature(t, min, max))
        .collect();
    let hour_labels = timestamps.iter().map(|t| timezone.hour_label(t)).collect();

    Ok(ChartSeries {
        city: city.name.clone(),
        max,
        min,
        timestamps,
        hour_labels,
        temperatures,
        precipitation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MockForecastPort;
    use chrono::{TimeZone, Utc};
    use domain::{CityInfo, Coord, ForecastPoint};

    const EPS: f64 = 1e-12;

    fn forecast(temps: &[f64], pops: &[f64]) -> ForecastResponse {
        let start = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let points = temps
            .iter()
            .zip(pops)
            .enumerate()
            .map(|(i, (&temperature, &pop))| ForecastPoint {
                timestamp: start + chrono::Duration::hours(3 * i as i64),
                temperature,
                precipitation_probability: pop,
            })
            .collect();

        ForecastResponse {
            cod: Some("200".into()),
            message: Some(0),
            cnt: Some(temps.len() as u32),
            points: Some(points),
            city: Some(CityInfo {
                id: 1_850_147,
                name: "Tokyo".into(),
                coord: Coord {
                    lat: 35.41,
                    lon: 139.42,
                },
                country: "JP".into(),
            }),
        }
    }

    fn scenario_a() -> ForecastResponse {
        forecast(
            &[20.0, 22.0, 21.0, 19.0, 18.0, 17.0, 19.0, 23.0],
            &[0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8],
        )
    }

    fn builder_returning(
        result: impl Fn() -> Result<ForecastResponse, ApplicationError> + Send + 'static,
    ) -> ChartDataBuilder {
        let mut mock = MockForecastPort::new();
        mock.expect_fetch_forecast().returning(move |_| result());
        ChartDataBuilder::new(Arc::new(mock)).with_timezone(Timezone::utc())
    }

    #[test]
    fn absent_points_yield_no_forecast() {
        let err = chart_from_forecast(&ForecastResponse::default(), &Timezone::utc()).unwrap_err();
        assert!(matches!(err, ChartError::NoForecast));
    }

    #[test]
    fn empty_points_yield_no_forecast() {
        let response = ForecastResponse {
            points: Some(Vec::new()),
            ..scenario_a()
        };
        let err = chart_from_forecast(&response, &Timezone::utc()).unwrap_err();
        assert!(matches!(err, ChartError::NoForecast));
    }

    #[test]
    fn scenario_a_bounds_and_normalization() {
        let series = chart_from_forecast(&scenario_a(), &Timezone::utc()).unwrap();

        assert_eq!(series.city, "Tokyo");
        assert!((series.max - 23.0).abs() < EPS);
        assert!((series.min - 17.0).abs() < EPS);
        assert!((series.temperatures[0] - 0.5).abs() < EPS);
        assert!((series.temperatures[7] - 0.875).abs() < EPS);
        assert!((series.temperatures[5] - 0.125).abs() < EPS);
    }

    #[test]
    fn scenario_b_flat_forecast_is_half() {
        let series = chart_from_forecast(&forecast(&[15.0; 8], &[0.0; 8]), &Timezone::utc())
            .unwrap();

        assert!((series.max - 15.0).abs() < EPS);
        assert!((series.min - 15.0).abs() < EPS);
        assert!(series.temperatures.iter().all(|&t| (t - 0.5).abs() < EPS));
    }

    #[test]
    fn scenario_d_precipitation_is_reversed() {
        let series = chart_from_forecast(&scenario_a(), &Timezone::utc()).unwrap();
        assert_eq!(
            series.precipitation,
            vec![0.8, 0.7, 0.6, 0.5, 0.4, 0.3, 0.2, 0.1]
        );
    }

    #[test]
    fn every_sequence_has_eight_entries() {
        let series = chart_from_forecast(&scenario_a(), &Timezone::utc()).unwrap();
        assert_eq!(series.timestamps.len(), CHART_POINTS);
        assert_eq!(series.hour_labels.len(), CHART_POINTS);
        assert_eq!(series.temperatures.len(), CHART_POINTS);
        assert_eq!(series.precipitation.len(), CHART_POINTS);
    }

    #[test]
    fn points_beyond_window_are_ignored() {
        let mut temps = vec![20.0, 22.0, 21.0, 19.0, 18.0, 17.0, 19.0, 23.0];
        temps.extend([99.0, -40.0]);
        let pops = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 1.0, 1.0];

        let long = chart_from_forecast(&forecast(&temps, &pops), &Timezone::utc()).unwrap();
        let exact = chart_from_forecast(&scenario_a(), &Timezone::utc()).unwrap();

        assert_eq!(long, exact);
    }

    #[test]
    fn timestamps_and_labels_are_chronological() {
        let series = chart_from_forecast(&scenario_a(), &Timezone::utc()).unwrap();
        assert!(series.timestamps.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(
            series.hour_labels,
            vec!["00", "03", "06", "09", "12", "15", "18", "21"]
        );
    }

    #[test]
    fn labels_follow_timezone() {
        let tokyo = Timezone::named("Asia/Tokyo").unwrap();
        let series = chart_from_forecast(&scenario_a(), &tokyo).unwrap();
        assert_eq!(
            series.hour_labels,
            vec!["09", "12", "15", "18", "21", "00", "03", "06"]
        );
    }

    #[test]
    fn fewer_than_eight_points_is_insufficient() {
        let response = forecast(&[20.0; 7], &[0.0; 7]);
        let err = chart_from_forecast(&response, &Timezone::utc()).unwrap_err();
        assert!(matches!(
            err,
            ChartError::InsufficientPoints {
                found: 7,
                needed: CHART_POINTS
            }
        ));
    }

    #[test]
    fn points_without_city_is_missing_city() {
        let response = ForecastResponse {
            city: None,
            ..scenario_a()
        };
        let err = chart_from_forecast(&response, &Timezone::utc()).unwrap_err();
        assert!(matches!(err, ChartError::MissingCity));
    }

    #[test]
    fn unnamed_city_is_missing_city() {
        let mut response = scenario_a();
        if let Some(city) = response.city.as_mut() {
            city.name.clear();
        }
        let err = chart_from_forecast(&response, &Timezone::utc()).unwrap_err();
        assert!(matches!(err, ChartError::MissingCity));
    }

    #[test]
    fn city_name_is_copied_verbatim() {
        let mut response = scenario_a();
        if let Some(city) = response.city.as_mut() {
            city.name = "东京".into();
        }
        let series = chart_from_forecast(&response, &Timezone::utc()).unwrap();
        assert_eq!(series.city, "东京");
    }

    #[test]
    fn build_returns_series_on_success() {
        let builder = builder_returning(|| Ok(scenario_a()));
        let series = builder.build(&GeoLocation::tokyo());

        assert!(!series.is_empty());
        assert_eq!(series.max_label(), "23°C");
        assert_eq!(series.min_label(), "17°C");
    }

    #[test]
    fn build_passes_location_to_port() {
        let mut mock = MockForecastPort::new();
        mock.expect_fetch_forecast()
            .withf(|loc| {
                (loc.latitude() - 35.41).abs() < EPS && (loc.longitude() - 139.42).abs() < EPS
            })
            .times(1)
            .returning(|_| Ok(scenario_a()));
        let builder = ChartDataBuilder::new(Arc::new(mock));

        assert!(!builder.build(&GeoLocation::tokyo()).is_empty());
    }

    #[test]
    fn build_collapses_fetch_error_to_empty() {
        let builder =
            builder_returning(|| Err(ApplicationError::ExternalService("HTTP 503".into())));
        let series = builder.build(&GeoLocation::tokyo());

        assert!(series.is_empty());
        assert_eq!(series, ChartSeries::empty());
    }

    #[test]
    fn build_collapses_empty_forecast_to_empty() {
        let builder = builder_returning(|| Ok(ForecastResponse::default()));
        assert_eq!(builder.build(&GeoLocation::tokyo()), ChartSeries::empty());
    }

    #[test]
    fn build_collapses_short_forecast_to_empty() {
        let builder = builder_returning(|| Ok(forecast(&[1.0; 3], &[0.0; 3])));
        assert_eq!(builder.build(&GeoLocation::tokyo()), ChartSeries::empty());
    }

    #[test]
    fn try_build_keeps_fetch_error() {
        let builder = builder_returning(|| Err(ApplicationError::RateLimited));
        let err = builder.try_build(&GeoLocation::tokyo()).unwrap_err();
        assert!(matches!(err, ChartError::Fetch(ApplicationError::RateLimited)));
    }

    #[test]
    fn builder_defaults_to_local_timezone() {
        let builder = ChartDataBuilder::new(Arc::new(MockForecastPort::new()));
        assert_eq!(builder.timezone(), Timezone::Local);
        assert!(format!("{builder:?}").contains("ChartDataBuilder"));
    }

    #[test]
    fn builder_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ChartDataBuilder>();
    }
}
