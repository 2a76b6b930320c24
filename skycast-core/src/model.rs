use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A place returned by the location search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub id: Option<i64>,
}

impl Location {
    pub fn new(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self { name: name.into(), country: country.into(), region: None, id: None }
    }

    /// "name, country", the way a suggestion row reads.
    pub fn label(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }
}

/// Current conditions. Every field is optional: a partial payload renders
/// blank instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temp_c: Option<f64>,
    pub condition: Option<String>,
    pub wind_kph: Option<f64>,
    pub humidity: Option<u8>,
    pub pressure_mb: Option<f64>,
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayForecast {
    pub date: NaiveDate,
    pub avg_temp_c: Option<f64>,
    pub condition: Option<String>,
}

impl DayForecast {
    /// Long weekday name, e.g. "Monday".
    pub fn weekday_name(&self) -> String {
        self.date.format("%A").to_string()
    }
}

/// Complete current + multi-day payload for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastBundle {
    pub location: Location,
    pub current: CurrentConditions,
    /// Chronological, starting today.
    pub days: Vec<DayForecast>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_joins_name_and_country() {
        let loc = Location::new("London", "United Kingdom");
        assert_eq!(loc.label(), "London, United Kingdom");
    }

    #[test]
    fn weekday_name_is_long_form() {
        let day = DayForecast {
            date: NaiveDate::from_ymd_opt(2026, 10, 19).expect("valid date"),
            avg_temp_c: Some(11.2),
            condition: None,
        };
        assert_eq!(day.weekday_name(), "Monday");
    }

    #[test]
    fn location_deserializes_without_optional_fields() {
        let loc: Location =
            serde_json::from_str(r#"{"name":"Lahore","country":"Pakistan"}"#).expect("parse");
        assert_eq!(loc.region, None);
        assert_eq!(loc.id, None);
    }
}
