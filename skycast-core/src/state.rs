//! In-memory session state shared by the search coordinator, the forecast
//! session and whatever view renders them.

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;

use crate::model::{ForecastBundle, Location};

/// Everything a view needs to render the screen.
///
/// While `loading` is set the view shows a loading indicator, never the
/// previous forecast.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub forecast: Option<ForecastBundle>,
    pub loading: bool,
    /// Last fetch failure, cleared when a new fetch starts.
    pub error: Option<String>,
    pub query: String,
    /// Provider order, never re-sorted.
    pub suggestions: Vec<Location>,
    pub search_panel_open: bool,
}

impl SessionState {
    /// The forecast, unless a fetch is in flight.
    pub fn displayable_forecast(&self) -> Option<&ForecastBundle> {
        if self.loading { None } else { self.forecast.as_ref() }
    }
}

/// Cloneable handle to the shared state. Every mutation bumps a revision
/// counter that subscribers can wait on.
#[derive(Debug, Clone)]
pub struct StateHandle {
    inner: Arc<Mutex<SessionState>>,
    revision: Arc<watch::Sender<u64>>,
}

impl Default for StateHandle {
    fn default() -> Self {
        Self::new(SessionState::default())
    }
}

impl StateHandle {
    pub fn new(initial: SessionState) -> Self {
        let (revision, _) = watch::channel(0);
        Self { inner: Arc::new(Mutex::new(initial)), revision: Arc::new(revision) }
    }

    pub fn snapshot(&self) -> SessionState {
        self.inner.lock().clone()
    }

    /// Read without cloning the whole state.
    pub fn read<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        f(&self.inner.lock())
    }

    /// Mutate under the lock, then notify subscribers.
    pub fn update<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let out = f(&mut self.inner.lock());
        self.revision.send_modify(|rev| *rev += 1);
        out
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }
}
