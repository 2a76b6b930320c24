//! Maps provider condition text onto a small set of icon keys.

/// Icon key used when the condition text is absent or not recognised.
pub const DEFAULT_ICON_KEY: &str = "other";

const ICONS: &[(&str, &str)] = &[
    ("sunny", "sunny"),
    ("clear", "sunny"),
    ("partly cloudy", "partly-cloudy"),
    ("cloudy", "cloudy"),
    ("overcast", "cloudy"),
    ("mist", "mist"),
    ("fog", "mist"),
    ("freezing fog", "mist"),
    ("patchy rain possible", "rain"),
    ("patchy rain nearby", "rain"),
    ("light drizzle", "rain"),
    ("light rain", "rain"),
    ("light rain shower", "rain"),
    ("moderate rain", "rain"),
    ("moderate rain at times", "rain"),
    ("heavy rain", "heavy-rain"),
    ("heavy rain at times", "heavy-rain"),
    ("moderate or heavy rain shower", "heavy-rain"),
    ("torrential rain shower", "heavy-rain"),
    ("moderate or heavy freezing rain", "heavy-rain"),
    ("patchy snow possible", "snow"),
    ("light snow", "snow"),
    ("moderate snow", "snow"),
    ("heavy snow", "snow"),
    ("blizzard", "snow"),
    ("thundery outbreaks possible", "thunder"),
    ("patchy light rain with thunder", "thunder"),
    ("moderate or heavy rain with thunder", "thunder"),
    ("moderate or heavy snow with thunder", "thunder"),
];

/// Returns the icon key for `condition`, or `fallback` when there is no match.
pub fn icon_key<'a>(condition: Option<&str>, fallback: &'a str) -> &'a str {
    let Some(text) = condition.map(|c| c.trim().to_lowercase()) else {
        return fallback;
    };

    ICONS
        .iter()
        .find(|(name, _)| *name == text)
        .map(|(_, key)| *key)
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_case_insensitively() {
        assert_eq!(icon_key(Some("Partly Cloudy "), DEFAULT_ICON_KEY), "partly-cloudy");
        assert_eq!(icon_key(Some("Moderate rain"), DEFAULT_ICON_KEY), "rain");
    }

    #[test]
    fn unknown_or_missing_falls_back() {
        assert_eq!(icon_key(Some("Volcanic ash"), DEFAULT_ICON_KEY), "other");
        assert_eq!(icon_key(None, "blank"), "blank");
    }
}
