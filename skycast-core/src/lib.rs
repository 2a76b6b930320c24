//! Core library for the `skycast` weather screen.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weatherapi.com client behind the `WeatherApi` trait
//! - A small key-value store for the last selected city
//! - The debounced search coordinator and the forecast session that
//!   together drive what a view renders
//!
//! It is used by `skycast-cli`, but any other front end can drive a
//! `ForecastSession` and render its `SessionState`.

pub mod config;
pub mod debounce;
pub mod error;
pub mod icon;
pub mod model;
pub mod provider;
pub mod search;
pub mod session;
pub mod state;
pub mod store;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use error::SessionError;
pub use icon::icon_key;
pub use model::{CurrentConditions, DayForecast, ForecastBundle, Location};
pub use provider::{WeatherApi, api_from_config, weatherapi::WeatherApiClient};
pub use search::SearchCoordinator;
pub use session::{FORECAST_DAYS, FetchOutcome, ForecastSession, SessionSettings};
pub use state::{SessionState, StateHandle};
pub use store::{CITY_KEY, FileStore, KeyValueStore, MemoryStore};
