//! Forecast session: owns the displayed forecast and drives the
//! startup and select-a-location fetch flows.

use parking_lot::Mutex;
use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use crate::{
    error::SessionError,
    icon::DEFAULT_ICON_KEY,
    model::Location,
    provider::{WeatherApi, weatherapi::DEFAULT_TIMEOUT},
    search::SearchCoordinator,
    state::{SessionState, StateHandle},
    store::{CITY_KEY, KeyValueStore},
};

/// Both the startup and the selection flow ask for this many days.
pub const FORECAST_DAYS: u8 = 7;
pub const DEFAULT_CITY: &str = "Islamabad";
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1200);
/// A query is looked up once its trimmed length exceeds this.
pub const DEFAULT_LOOKUP_AFTER_LEN: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    /// Shown on startup when no city has been persisted.
    pub default_city: String,
    /// Icon key for unknown conditions.
    pub fallback_icon: String,
    pub request_timeout: Duration,
    pub debounce: Duration,
    /// Trimmed length a query has to exceed before it is looked up.
    pub lookup_after_len: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            default_city: DEFAULT_CITY.to_string(),
            fallback_icon: DEFAULT_ICON_KEY.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
            debounce: DEFAULT_DEBOUNCE,
            lookup_after_len: DEFAULT_LOOKUP_AFTER_LEN,
        }
    }
}

/// How a fetch that did not fail ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The result replaced the displayed forecast.
    Applied,
    /// A newer fetch started meanwhile; this result was dropped.
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FetchRequest {
    city: String,
    /// Only user selections are remembered across launches.
    persist: bool,
}

#[derive(Debug)]
pub struct ForecastSession {
    api: Arc<dyn WeatherApi>,
    store: Arc<dyn KeyValueStore>,
    state: StateHandle,
    search: SearchCoordinator,
    settings: SessionSettings,
    fetch_seq: AtomicU64,
    last_request: Mutex<Option<FetchRequest>>,
}

impl ForecastSession {
    pub fn new(
        api: Arc<dyn WeatherApi>,
        store: Arc<dyn KeyValueStore>,
        settings: SessionSettings,
    ) -> Self {
        let state = StateHandle::default();
        let search = SearchCoordinator::new(api.clone(), state.clone(), &settings);

        Self {
            api,
            store,
            state,
            search,
            settings,
            fetch_seq: AtomicU64::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn state(&self) -> &StateHandle {
        &self.state
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.snapshot()
    }

    pub fn search(&self) -> &SearchCoordinator {
        &self.search
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Last selected city, or the default when none is stored or the store
    /// can't be read.
    pub fn persisted_city(&self) -> String {
        match self.store.get(CITY_KEY) {
            Ok(Some(city)) if !city.trim().is_empty() => city,
            Ok(_) => self.settings.default_city.clone(),
            Err(err) => {
                tracing::warn!(
                    error = %format!("{err:#}"),
                    fallback = %self.settings.default_city,
                    "could not read persisted city"
                );
                self.settings.default_city.clone()
            }
        }
    }

    /// Startup flow: show the forecast for the persisted (or default) city.
    /// Nothing is written back to the store.
    pub async fn initialize(&self) -> Result<FetchOutcome, SessionError> {
        let city = self.persisted_city();
        tracing::debug!(%city, "initializing forecast session");

        self.fetch(FetchRequest { city, persist: false }).await
    }

    /// Selection flow: blank to loading, close the search panel, fetch, and
    /// remember the city once its forecast has been applied.
    pub async fn select_location(&self, loc: &Location) -> Result<FetchOutcome, SessionError> {
        self.state.update(|s| s.loading = true);
        self.search.on_location_selected(loc);

        self.fetch(FetchRequest { city: loc.name.clone(), persist: true }).await
    }

    /// Re-run the most recent fetch with the same city and persist policy.
    pub async fn retry(&self) -> Result<FetchOutcome, SessionError> {
        let request = self.last_request.lock().clone().ok_or(SessionError::NothingToRetry)?;
        tracing::debug!(city = %request.city, "retrying forecast fetch");

        self.fetch(request).await
    }

    async fn fetch(&self, request: FetchRequest) -> Result<FetchOutcome, SessionError> {
        let token = self.fetch_seq.fetch_add(1, Ordering::SeqCst) + 1;
        *self.last_request.lock() = Some(request.clone());

        self.state.update(|s| {
            s.loading = true;
            s.error = None;
        });

        let timeout = self.settings.request_timeout;
        let result =
            match tokio::time::timeout(timeout, self.api.get_forecast(&request.city, FORECAST_DAYS))
                .await
            {
                Ok(Ok(bundle)) => Ok(bundle),
                Ok(Err(err)) => Err(SessionError::from(
                    err.context(format!("Failed to fetch forecast for '{}'", request.city)),
                )),
                Err(_) => Err(SessionError::Timeout(timeout)),
            };

        if self.fetch_seq.load(Ordering::SeqCst) != token {
            tracing::debug!(city = %request.city, token, "discarding superseded forecast");
            return Ok(FetchOutcome::Superseded);
        }

        let bundle = match result {
            Ok(bundle) => bundle,
            Err(err) => {
                tracing::warn!(city = %request.city, error = %err, "forecast fetch failed");
                self.state.update(|s| {
                    s.loading = false;
                    s.error = Some(err.to_string());
                });
                return Err(err);
            }
        };

        self.state.update(|s| {
            s.forecast = Some(bundle);
            s.loading = false;
            s.error = None;
        });

        if request.persist {
            match self.store.set(CITY_KEY, &request.city) {
                Ok(()) => tracing::info!(city = %request.city, "remembered last city"),
                Err(err) => tracing::warn!(
                    city = %request.city,
                    error = %format!("{err:#}"),
                    "could not persist last city"
                ),
            }
        }

        Ok(FetchOutcome::Applied)
    }
}
