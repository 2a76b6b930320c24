//! Debounced location search feeding the suggestion list.
//!
//! Keystrokes update the displayed query immediately; the lookup itself only
//! fires after the input has been quiet for the debounce period, and only
//! for queries longer than the lookup threshold. Every input change and every
//! selection takes a new sequence token; a lookup whose token is no longer
//! current neither calls the provider nor touches the suggestions, so a slow
//! response for an older query cannot overwrite suggestions for a newer one.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use crate::{
    debounce::Debouncer, model::Location, provider::WeatherApi, session::SessionSettings,
    state::StateHandle,
};

#[derive(Debug)]
pub struct SearchCoordinator {
    api: Arc<dyn WeatherApi>,
    state: StateHandle,
    debouncer: Debouncer,
    lookup_after_len: usize,
    request_timeout: Duration,
    lookup_seq: Arc<AtomicU64>,
}

impl SearchCoordinator {
    pub fn new(api: Arc<dyn WeatherApi>, state: StateHandle, settings: &SessionSettings) -> Self {
        Self {
            api,
            state,
            debouncer: Debouncer::new(settings.debounce),
            lookup_after_len: settings.lookup_after_len,
            request_timeout: settings.request_timeout,
            lookup_seq: Arc::new(AtomicU64::new(0)),
        }
    }

    /// True when `query`, once trimmed, is long enough to be looked up.
    pub fn is_searchable(&self, query: &str) -> bool {
        query.trim().chars().count() > self.lookup_after_len
    }

    /// Record the raw input and (re)arm the debounced lookup.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn on_query_changed(&self, text: &str) {
        self.state.update(|s| s.query = text.to_string());
        self.debouncer.schedule(self.lookup(text).run());
    }

    /// Build the lookup for `text`, superseding every earlier one.
    fn lookup(&self, text: &str) -> Lookup {
        let token = self.lookup_seq.fetch_add(1, Ordering::SeqCst) + 1;

        Lookup {
            api: self.api.clone(),
            state: self.state.clone(),
            seq: self.lookup_seq.clone(),
            token,
            searchable: self.is_searchable(text),
            query: text.trim().to_string(),
            timeout: self.request_timeout,
        }
    }

    /// Flip panel visibility; returns the new visibility. Suggestions are
    /// left alone either way.
    pub fn on_toggle_panel(&self) -> bool {
        self.state.update(|s| {
            s.search_panel_open = !s.search_panel_open;
            s.search_panel_open
        })
    }

    /// Hand-off to the forecast session: drop suggestions, query and any
    /// pending or in-flight lookup, and close the panel.
    pub fn on_location_selected(&self, loc: &Location) {
        self.debouncer.cancel();
        self.lookup_seq.fetch_add(1, Ordering::SeqCst);

        self.state.update(|s| {
            s.suggestions.clear();
            s.query.clear();
            s.search_panel_open = false;
        });

        tracing::debug!(location = %loc.label(), "search closed after selection");
    }

    /// True while a lookup is waiting out the debounce period.
    pub fn is_lookup_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn debounce(&self) -> Duration {
        self.debouncer.delay()
    }
}

struct Lookup {
    api: Arc<dyn WeatherApi>,
    state: StateHandle,
    seq: Arc<AtomicU64>,
    token: u64,
    searchable: bool,
    query: String,
    timeout: Duration,
}

impl Lookup {
    fn is_current(&self) -> bool {
        self.seq.load(Ordering::SeqCst) == self.token
    }

    async fn run(self) {
        // Short queries leave whatever suggestions are showing.
        if !self.searchable {
            tracing::debug!(query = %self.query, "query too short, skipping lookup");
            return;
        }

        if !self.is_current() {
            tracing::debug!(
                query = %self.query,
                token = self.token,
                "lookup superseded before it ran"
            );
            return;
        }

        let result =
            tokio::time::timeout(self.timeout, self.api.search_locations(&self.query)).await;

        if !self.is_current() {
            tracing::debug!(
                query = %self.query,
                token = self.token,
                "discarding superseded lookup result"
            );
            return;
        }

        match result {
            Ok(Ok(found)) => {
                tracing::debug!(query = %self.query, count = found.len(), "suggestions updated");
                self.state.update(|s| s.suggestions = found);
            }
            Ok(Err(err)) => {
                tracing::warn!(
                    query = %self.query,
                    error = %format!("{err:#}"),
                    "location search failed"
                );
            }
            Err(_) => {
                tracing::warn!(
                    query = %self.query,
                    timeout = ?self.timeout,
                    "location search timed out"
                );
            }
        }
    }
}
