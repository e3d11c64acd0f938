//! OpenWeatherMap forecast integration
//!
//! Client for the OpenWeatherMap 5 day / 3 hour forecast API
//! (<https://openweathermap.org/forecast5>).

pub mod client;
mod models;

pub use client::{ForecastClient, ForecastConfig, ForecastError, OpenWeatherClient};
