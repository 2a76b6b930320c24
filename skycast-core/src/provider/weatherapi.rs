use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::{Client, Response};
use serde::Deserialize;
use std::time::Duration;

use crate::model::{CurrentConditions, DayForecast, ForecastBundle, Location};

use super::WeatherApi;

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the weatherapi.com REST API.
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiClient {
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_options(api_key, DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }

    /// Client against a custom base URL (no trailing slash needed) with a
    /// per-request timeout.
    pub fn with_options(api_key: String, base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for WeatherAPI")?;

        Ok(Self { api_key, base_url: base_url.trim_end_matches('/').to_string(), http })
    }

    async fn read_body(res: Response, what: &str) -> Result<String> {
        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read WeatherAPI {what} response body"))?;

        if !status.is_success() {
            let detail = serde_json::from_str::<WaErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| truncate_body(&body));

            return Err(anyhow!("WeatherAPI {what} request failed with status {status}: {detail}"));
        }

        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct WaErrorDetail {
    message: String,
}

#[derive(Debug, Deserialize)]
struct WaErrorResponse {
    error: WaErrorDetail,
}

#[derive(Debug, Deserialize)]
struct WaSearchHit {
    id: Option<i64>,
    name: String,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    country: String,
}

#[derive(Debug, Default, Deserialize)]
struct WaCondition {
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WaCurrent {
    temp_c: Option<f64>,
    #[serde(default)]
    condition: WaCondition,
    wind_kph: Option<f64>,
    humidity: Option<u8>,
    pressure_mb: Option<f64>,
    last_updated_epoch: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct WaDay {
    avgtemp_c: Option<f64>,
    #[serde(default)]
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    date: NaiveDate,
    #[serde(default)]
    day: WaDay,
}

#[derive(Debug, Default, Deserialize)]
struct WaForecast {
    #[serde(default)]
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaForecastResponse {
    location: WaLocation,
    #[serde(default)]
    current: WaCurrent,
    #[serde(default)]
    forecast: WaForecast,
}

impl From<WaSearchHit> for Location {
    fn from(hit: WaSearchHit) -> Self {
        Location { name: hit.name, country: hit.country, region: non_empty(hit.region), id: hit.id }
    }
}

impl From<WaForecastResponse> for ForecastBundle {
    fn from(parsed: WaForecastResponse) -> Self {
        let location = Location {
            name: parsed.location.name,
            country: parsed.location.country,
            region: non_empty(parsed.location.region),
            id: None,
        };

        let current = CurrentConditions {
            temp_c: parsed.current.temp_c,
            condition: parsed.current.condition.text,
            wind_kph: parsed.current.wind_kph,
            humidity: parsed.current.humidity,
            pressure_mb: parsed.current.pressure_mb,
            last_updated: parsed.current.last_updated_epoch.and_then(unix_to_utc),
        };

        let days = parsed
            .forecast
            .forecastday
            .into_iter()
            .map(|fd| DayForecast {
                date: fd.date,
                avg_temp_c: fd.day.avgtemp_c,
                condition: fd.day.condition.text,
            })
            .collect();

        ForecastBundle { location, current, days }
    }
}

#[async_trait]
impl WeatherApi for WeatherApiClient {
    async fn search_locations(&self, query: &str) -> Result<Vec<Location>> {
        let url = format!("{}/search.json", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", query)])
            .send()
            .await
            .context("Failed to send request to WeatherAPI.com (search)")?;

        let body = Self::read_body(res, "search").await?;

        let hits: Vec<WaSearchHit> =
            serde_json::from_str(&body).context("Failed to parse WeatherAPI search JSON")?;

        Ok(hits.into_iter().map(Location::from).collect())
    }

    async fn get_forecast(&self, city: &str, days: u8) -> Result<ForecastBundle> {
        let url = format!("{}/forecast.json", self.base_url);
        let days = days.to_string();

        let res = self
            .http
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", city),
                ("days", days.as_str()),
            ])
            .send()
            .await
            .context("Failed to send request to WeatherAPI.com (forecast)")?;

        let body = Self::read_body(res, "forecast").await?;

        let parsed: WaForecastResponse =
            serde_json::from_str(&body).context("Failed to parse WeatherAPI forecast JSON")?;

        Ok(parsed.into())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
