//! Plain-text rendering of the session state.

use skycast_core::{ForecastBundle, Location, SessionState, icon_key};

pub fn render_state(state: &SessionState, fallback_icon: &str) -> String {
    if state.loading {
        return "Loading forecast...".to_string();
    }

    if let Some(err) = &state.error {
        return format!("Could not load forecast: {err}");
    }

    match state.displayable_forecast() {
        Some(bundle) => render_forecast(bundle, fallback_icon),
        None => "No forecast yet.".to_string(),
    }
}

pub fn render_forecast(bundle: &ForecastBundle, fallback_icon: &str) -> String {
    let current = &bundle.current;
    let mut out = format!("{}\n", bundle.location.label());

    out.push_str(&format!(
        "  [{}] {}  {}\n",
        icon_key(current.condition.as_deref(), fallback_icon),
        blank_or(current.temp_c, |t| format!("{t:.0}°")),
        current.condition.as_deref().unwrap_or(""),
    ));
    out.push_str(&format!(
        "  wind {}   humidity {}   pressure {}\n",
        blank_or(current.wind_kph, |w| format!("{w}km")),
        blank_or(current.humidity, |h| format!("{h}%")),
        blank_or(current.pressure_mb, |p| format!("{p}mb")),
    ));

    if !bundle.days.is_empty() {
        out.push_str("\nDaily forecast\n");
        for day in &bundle.days {
            out.push_str(&format!(
                "  {:<10} {:>5}  [{}]\n",
                day.weekday_name(),
                blank_or(day.avg_temp_c, |t| format!("{t:.0}°")),
                icon_key(day.condition.as_deref(), fallback_icon),
            ));
        }
    }

    out
}

/// Suggestion row: "name, country", plus region when the provider gave one.
pub fn suggestion_label(loc: &Location) -> String {
    match &loc.region {
        Some(region) => format!("{} ({region})", loc.label()),
        None => loc.label(),
    }
}

fn blank_or<T>(value: Option<T>, f: impl FnOnce(T) -> String) -> String {
    value.map(f).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use skycast_core::{CurrentConditions, DayForecast};

    fn london() -> ForecastBundle {
        ForecastBundle {
            location: Location::new("London", "United Kingdom"),
            current: CurrentConditions {
                temp_c: Some(12.0),
                condition: Some("Partly cloudy".into()),
                wind_kph: Some(19.1),
                humidity: Some(77),
                pressure_mb: Some(1012.0),
                last_updated: None,
            },
            days: vec![DayForecast {
                date: NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date"),
                avg_temp_c: Some(10.9),
                condition: Some("Volcanic ash".into()),
            }],
        }
    }

    #[test]
    fn renders_current_and_daily_rows() {
        let out = render_forecast(&london(), "other");

        assert!(out.starts_with("London, United Kingdom\n"));
        assert!(out.contains("[partly-cloudy] 12°  Partly cloudy"));
        assert!(out.contains("wind 19.1km   humidity 77%   pressure 1012mb"));
        assert!(out.contains("Monday"));
        assert!(out.contains("11°  [other]"));
    }

    #[test]
    fn missing_fields_render_blank() {
        let mut bundle = london();
        bundle.current = CurrentConditions::default();
        bundle.days.clear();

        let out = render_forecast(&bundle, "other");

        assert!(out.contains("wind    humidity    pressure "));
        assert!(!out.contains("Daily forecast"));
    }

    #[test]
    fn loading_and_error_take_precedence() {
        let mut state =
            SessionState { forecast: Some(london()), loading: true, ..Default::default() };
        assert_eq!(render_state(&state, "other"), "Loading forecast...");

        state.loading = false;
        state.error = Some("Weather API request timed out after 10s".into());
        assert_eq!(
            render_state(&state, "other"),
            "Could not load forecast: Weather API request timed out after 10s"
        );
    }

    #[test]
    fn suggestion_label_includes_region() {
        let mut loc = Location::new("London", "Canada");
        assert_eq!(suggestion_label(&loc), "London, Canada");

        loc.region = Some("Ontario".into());
        assert_eq!(suggestion_label(&loc), "London, Canada (Ontario)");
    }
}
