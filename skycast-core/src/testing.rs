//! In-process stand-ins for the weather API and the key-value store.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use parking_lot::Mutex;
use std::{collections::HashMap, time::Duration};

use crate::{
    model::{CurrentConditions, DayForecast, ForecastBundle, Location},
    provider::WeatherApi,
    store::KeyValueStore,
};

#[derive(Debug, Clone)]
struct Canned<T> {
    delay: Duration,
    result: Result<T, String>,
}

/// Scripted `WeatherApi` that records every call it receives.
#[derive(Debug, Default)]
pub(crate) struct FakeApi {
    searches: Mutex<HashMap<String, Canned<Vec<Location>>>>,
    forecasts: Mutex<HashMap<String, Canned<ForecastBundle>>>,
    search_calls: Mutex<Vec<String>>,
    forecast_calls: Mutex<Vec<(String, u8)>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locations(self, query: &str, found: Vec<Location>) -> Self {
        self.script_search(query, Duration::ZERO, Ok(found));
        self
    }

    pub fn with_slow_locations(self, query: &str, delay: Duration, found: Vec<Location>) -> Self {
        self.script_search(query, delay, Ok(found));
        self
    }

    pub fn with_failing_search(self, query: &str) -> Self {
        self.script_search(query, Duration::ZERO, Err("search backend unavailable".into()));
        self
    }

    pub fn with_forecast(self, city: &str, bundle: ForecastBundle) -> Self {
        self.script_forecast(city, Duration::ZERO, Ok(bundle));
        self
    }

    pub fn with_slow_forecast(self, city: &str, delay: Duration, bundle: ForecastBundle) -> Self {
        self.script_forecast(city, delay, Ok(bundle));
        self
    }

    pub fn script_search(
        &self,
        query: &str,
        delay: Duration,
        result: Result<Vec<Location>, String>,
    ) {
        self.searches.lock().insert(query.to_string(), Canned { delay, result });
    }

    pub fn script_forecast(
        &self,
        city: &str,
        delay: Duration,
        result: Result<ForecastBundle, String>,
    ) {
        self.forecasts.lock().insert(city.to_string(), Canned { delay, result });
    }

    pub fn search_calls(&self) -> Vec<String> {
        self.search_calls.lock().clone()
    }

    pub fn forecast_calls(&self) -> Vec<(String, u8)> {
        self.forecast_calls.lock().clone()
    }
}

#[async_trait]
impl WeatherApi for FakeApi {
    async fn search_locations(&self, query: &str) -> Result<Vec<Location>> {
        self.search_calls.lock().push(query.to_string());
        let canned = self.searches.lock().get(query).cloned();

        let Some(canned) = canned else {
            return Ok(Vec::new());
        };
        if !canned.delay.is_zero() {
            tokio::time::sleep(canned.delay).await;
        }
        canned.result.map_err(|e| anyhow!(e))
    }

    async fn get_forecast(&self, city: &str, days: u8) -> Result<ForecastBundle> {
        self.forecast_calls.lock().push((city.to_string(), days));
        let canned = self.forecasts.lock().get(city).cloned();

        let Some(canned) = canned else {
            return Err(anyhow!("status 400 Bad Request: No matching location found."));
        };
        if !canned.delay.is_zero() {
            tokio::time::sleep(canned.delay).await;
        }
        canned.result.map_err(|e| anyhow!(e))
    }
}

/// Store whose every operation fails, like an unavailable disk.
#[derive(Debug, Default)]
pub(crate) struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(anyhow!("storage unavailable"))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(anyhow!("storage unavailable"))
    }
}

pub(crate) fn location(name: &str, country: &str) -> Location {
    Location::new(name, country)
}

/// Seven days of forecast starting 2026-10-18, all at `temp_c`.
pub(crate) fn bundle(name: &str, country: &str, temp_c: f64) -> ForecastBundle {
    let start = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap_or_default();
    let days = (0..7)
        .filter_map(|i| start.checked_add_days(Days::new(i)))
        .map(|date| DayForecast {
            date,
            avg_temp_c: Some(temp_c),
            condition: Some("Sunny".into()),
        })
        .collect();

    ForecastBundle {
        location: location(name, country),
        current: CurrentConditions {
            temp_c: Some(temp_c),
            condition: Some("Sunny".into()),
            wind_kph: Some(9.0),
            humidity: Some(40),
            pressure_mb: Some(1015.0),
            last_updated: None,
        },
        days,
    }
}
