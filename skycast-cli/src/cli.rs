use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use inquire::{Confirm, Password, PasswordDisplayMode, Select, Text};
use skycast_core::{
    Config, FetchOutcome, FileStore, ForecastSession, KeyValueStore, MemoryStore, SessionError,
    api_from_config,
};
use std::sync::Arc;

use crate::render::{render_state, suggestion_label};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Current weather and 7-day forecast")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the weatherapi.com API key and an optional default city.
    Configure,

    /// Show the forecast for the last selected city (or the default city).
    Show,

    /// Search for a city, pick one and show its forecast.
    Search {
        /// City name or prefix; prompted for when absent.
        query: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show => show().await,
            Command::Search { query } => search(query).await,
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("weatherapi.com API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()?;
    config.set_api_key(api_key.trim().to_string());

    let city = Text::new("Default city:")
        .with_default(config.default_city())
        .with_help_message("Shown until you pick a city with `skycast search`")
        .prompt()?;
    config.set_default_city(&city);

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

fn open_session(config: &Config) -> Result<ForecastSession> {
    let api = api_from_config(config)?;

    let store: Arc<dyn KeyValueStore> = match FileStore::open_default() {
        Ok(store) => Arc::new(store),
        Err(err) => {
            tracing::warn!(
                error = %format!("{err:#}"),
                "no data directory, last city won't be remembered"
            );
            Arc::new(MemoryStore::new())
        }
    };

    Ok(ForecastSession::new(api, store, config.session_settings()))
}

async fn show() -> Result<()> {
    let config = Config::load()?;
    let session = open_session(&config)?;

    let result = session.initialize().await;
    finish(&session, result).await
}

async fn search(query: Option<String>) -> Result<()> {
    let config = Config::load()?;
    let session = open_session(&config)?;
    let search = session.search();
    search.on_toggle_panel();

    let query = match query {
        Some(query) => query,
        None => Text::new("Search city:").prompt()?,
    };

    if !search.is_searchable(&query) {
        bail!("Type more than {} characters to search.", session.settings().lookup_after_len);
    }

    let mut changes = session.state().subscribe();
    search.on_query_changed(&query);
    changes.borrow_and_update();

    let wait = search.debounce() + session.settings().request_timeout;
    if tokio::time::timeout(wait, changes.changed()).await.is_err() {
        tracing::debug!(query = %query.trim(), "no suggestions arrived in time");
    }

    let suggestions = session.state().read(|s| s.suggestions.clone());
    if suggestions.is_empty() {
        bail!("No locations match '{}'.", query.trim());
    }

    let labels: Vec<String> = suggestions.iter().map(suggestion_label).collect();
    let choice = Select::new("Pick a location:", labels).raw_prompt()?;
    let location = suggestions
        .get(choice.index)
        .ok_or_else(|| anyhow!("Selected location is no longer listed"))?;

    let result = session.select_location(location).await;
    finish(&session, result).await
}

/// Print the outcome, offering to retry while the fetch keeps failing.
async fn finish(
    session: &ForecastSession,
    mut result: Result<FetchOutcome, SessionError>,
) -> Result<()> {
    let fallback_icon = session.settings().fallback_icon.clone();

    loop {
        println!("{}", render_state(&session.snapshot(), &fallback_icon));

        let err = match result {
            Ok(_) => return Ok(()),
            Err(err) => err,
        };

        let retry = Confirm::new("Retry?").with_default(true).prompt()?;
        if !retry {
            return Err(err).context("Forecast unavailable");
        }

        result = session.retry().await;
    }
}
