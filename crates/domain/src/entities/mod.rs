//! Domain entities - the decoded forecast and the chart series built from it

mod chart_series;
mod forecast;

pub use chart_series::{CHART_POINTS, ChartSeries, normalize_temperature};
pub use forecast::{CityInfo, Coord, ForecastPoint, ForecastResponse};
