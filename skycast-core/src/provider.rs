use crate::{Config, ForecastBundle, Location, provider::weatherapi::WeatherApiClient};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc, time::Duration};

pub mod weatherapi;

/// Remote weather service: location search plus multi-day forecasts.
#[async_trait]
pub trait WeatherApi: Send + Sync + Debug {
    /// Locations matching `query`, in the provider's relevance order.
    async fn search_locations(&self, query: &str) -> anyhow::Result<Vec<Location>>;

    /// Current conditions and `days` daily forecasts for `city`.
    async fn get_forecast(&self, city: &str, days: u8) -> anyhow::Result<ForecastBundle>;
}

/// Construct the weatherapi.com client from config.
pub fn api_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherApi>> {
    let api_key = config.api_key()?;
    let timeout = Duration::from_secs(config.request_timeout_secs());

    let client = WeatherApiClient::with_options(api_key.to_owned(), config.base_url(), timeout)?;

    Ok(Arc::new(client))
}
