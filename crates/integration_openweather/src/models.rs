//! Wire models
//!
//! Types mirroring the OpenWeatherMap `/forecast` JSON payload, and their
//! conversion into the domain forecast.

use chrono::{DateTime, Utc};
use domain::{CityInfo, Coord, ForecastPoint, ForecastResponse};
use serde::{Deserialize, Deserializer, de};

/// Raw API response from the `/forecast` endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse {
    #[serde(default, deserialize_with = "deserialize_status_code")]
    pub cod: Option<String>,
    #[serde(default)]
    pub message: Option<i64>,
    #[serde(default)]
    pub cnt: Option<u32>,
    #[serde(default)]
    pub list: Option<Vec<ApiPoint>>,
    #[serde(default)]
    pub city: Option<ApiCity>,
}

/// One 3-hour forecast step
#[derive(Debug, Deserialize)]
pub(crate) struct ApiPoint {
    #[serde(deserialize_with = "deserialize_instant")]
    pub dt: DateTime<Utc>,
    pub main: ApiMain,
    pub pop: f64,
}

/// Main readings of a forecast step
#[derive(Debug, Deserialize)]
pub(crate) struct ApiMain {
    pub temp: f64,
}

/// City block of the response
#[derive(Debug, Deserialize)]
pub(crate) struct ApiCity {
    pub id: i64,
    pub name: String,
    pub coord: ApiCoord,
    pub country: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiCoord {
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lon: f64,
}

impl ApiResponse {
    /// Convert into the domain forecast
    pub(crate) fn into_forecast(self) -> ForecastResponse {
        ForecastResponse {
            cod: self.cod,
            message: self.message,
            cnt: self.cnt,
            points: self.list.map(|list| {
                list.into_iter()
                    .map(|p| ForecastPoint {
                        timestamp: p.dt,
                        temperature: p.main.temp,
                        precipitation_probability: p.pop,
                    })
                    .collect()
            }),
            city: self.city.map(|c| CityInfo {
                id: c.id,
                name: c.name,
                coord: Coord {
                    lat: c.coord.lat,
                    lon: c.coord.lon,
                },
                country: c.country,
            }),
        }
    }
}

/// `cod` is a string on success (`"200"`) but a number in some error payloads
fn deserialize_status_code<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCode {
        Text(String),
        Number(i64),
    }

    Ok(
        Option::<RawCode>::deserialize(deserializer)?.map(|code| match code {
            RawCode::Text(s) => s,
            RawCode::Number(n) => n.to_string(),
        }),
    )
}

/// Accepts unix seconds (integer or fractional) or an RFC 3339 instant
fn deserialize_instant<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawInstant {
        Seconds(i64),
        Fractional(f64),
        Text(String),
    }

    match RawInstant::deserialize(deserializer)? {
        RawInstant::Seconds(secs) => DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| de::Error::custom(format!("timestamp out of range: {secs}"))),
        RawInstant::Fractional(secs) => {
            #[allow(clippy::cast_possible_truncation)]
            let millis = (secs * 1000.0).round() as i64;
            DateTime::from_timestamp_millis(millis)
                .ok_or_else(|| de::Error::custom(format!("timestamp out of range: {secs}")))
        },
        RawInstant::Text(s) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| de::Error::custom(format!("invalid instant {s}: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn decode(json: &str) -> ForecastResponse {
        serde_json::from_str::<ApiResponse>(json)
            .expect("should decode")
            .into_forecast()
    }

    #[test]
    fn decodes_full_payload() {
        let forecast = decode(
            r#"{
                "cod": "200",
                "message": 0,
                "cnt": 1,
                "list": [{"dt": 1705320000, "main": {"temp": 5.5, "humidity": 80}, "pop": 0.25}],
                "city": {"id": 1850147, "name": "Tokyo", "coord": {"lat": 35.41, "lon": 139.42}, "country": "JP"}
            }"#,
        );

        assert_eq!(forecast.cod.as_deref(), Some("200"));
        assert_eq!(forecast.message, Some(0));
        assert_eq!(forecast.cnt, Some(1));
        let point = forecast.points()[0];
        assert_eq!(
            point.timestamp,
            Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
        );
        assert!((point.temperature - 5.5).abs() < f64::EPSILON);
        assert!((point.precipitation_probability - 0.25).abs() < f64::EPSILON);

        let city = forecast.city.expect("city");
        assert_eq!(city.id, 1_850_147);
        assert_eq!(city.name, "Tokyo");
        assert_eq!(city.country, "JP");
        assert!((city.coord.lat - 35.41).abs() < f64::EPSILON);
    }

    #[test]
    fn all_fields_optional() {
        let forecast = decode("{}");
        assert_eq!(forecast, ForecastResponse::default());
    }

    #[test]
    fn numeric_status_code() {
        let forecast = decode(r#"{"cod": 401}"#);
        assert_eq!(forecast.cod.as_deref(), Some("401"));
    }

    #[test]
    fn rfc3339_instant() {
        let forecast = decode(
            r#"{"list": [{"dt": "2024-01-15T12:00:00Z", "main": {"temp": 1.0}, "pop": 0}]}"#,
        );
        assert_eq!(
            forecast.points()[0].timestamp,
            Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn fractional_seconds_instant() {
        let forecast =
            decode(r#"{"list": [{"dt": 1705320000.5, "main": {"temp": 1.0}, "pop": 0}]}"#);
        assert_eq!(
            forecast.points()[0].timestamp.timestamp_millis(),
            1_705_320_000_500
        );
    }

    #[test]
    fn missing_point_field_is_error() {
        let result = serde_json::from_str::<ApiResponse>(
            r#"{"list": [{"dt": 1705320000, "main": {"temp": 1.0}}]}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn garbage_instant_is_error() {
        let result = serde_json::from_str::<ApiResponse>(
            r#"{"list": [{"dt": "yesterday", "main": {"temp": 1.0}, "pop": 0}]}"#,
        );
        assert!(result.is_err());
    }
}
