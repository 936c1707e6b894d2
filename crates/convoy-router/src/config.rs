//! Router configuration.
//!
//! One immutable [`RouterConfig`] is built at startup, either
//! programmatically or from the environment, and handed to
//! [`crate::CapabilityRouter::new`]. Business logic never reads the
//! environment on its own.
//!
//! # Environment variables
//!
//! - `TOOLS_ENABLED` - master switch for the whole router (default off)
//! - `TOOL_WEATHER_ENABLED` / `TOOL_WEATHER_API_URL` / `TOOL_WEATHER_TIMEOUT`
//! - `TOOL_QUOTES_ENABLED` / `TOOL_QUOTES_API_URL` / `TOOL_QUOTES_TIMEOUT`
//! - `TOOL_CALENDAR_ENABLED` / `TOOL_CALENDAR_API_URL` / `TOOL_CALENDAR_TIMEOUT`
//! - `TOOL_TIMEZONE` - IANA zone for calendar rendering (default
//!   `America/Denver`)
//!
//! Booleans accept `1`/`true`/`yes`/`on` (case-insensitive); timeouts
//! are in seconds and default to 10.

use std::time::Duration;

use chrono_tz::Tz;
use tracing::warn;

/// Timezone used when `TOOL_TIMEZONE` is unset or invalid.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Denver;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Enablement and connection settings for one provider.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    /// Whether the provider is switched on.
    pub enabled: bool,
    /// Base URL of the provider's backend.
    pub api_url: Option<String>,
    /// Per-call timeout.
    pub timeout: Duration,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            api_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ProviderSettings {
    /// Creates enabled settings pointing at `api_url`.
    pub fn enabled(api_url: impl Into<String>) -> Self {
        Self {
            enabled: true,
            api_url: Some(api_url.into()),
            ..Self::default()
        }
    }

    /// Builder method to set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured base URL, if any.
    pub fn api_url(&self) -> Option<&str> {
        self.api_url.as_deref()
    }
}

/// Immutable configuration for the capability router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Master switch; when off, no providers are registered at all.
    pub enabled: bool,
    /// Weather provider settings.
    pub weather: ProviderSettings,
    /// Quotes provider settings.
    pub quotes: ProviderSettings,
    /// Calendar provider settings.
    pub calendar: ProviderSettings,
    /// Timezone for calendar classification and rendering.
    pub timezone: Tz,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            weather: ProviderSettings::default(),
            quotes: ProviderSettings::default(),
            calendar: ProviderSettings::default(),
            timezone: DEFAULT_TIMEZONE,
        }
    }
}

impl RouterConfig {
    /// Builds the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// This is the seam `from_env` goes through; tests supply a map
    /// instead of mutating the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let timezone = match lookup("TOOL_TIMEZONE") {
            Some(name) => name.parse::<Tz>().unwrap_or_else(|_| {
                warn!(timezone = %name, "invalid TOOL_TIMEZONE, falling back to default");
                DEFAULT_TIMEZONE
            }),
            None => DEFAULT_TIMEZONE,
        };

        Self {
            enabled: lookup_bool(&lookup, "TOOLS_ENABLED", false),
            weather: provider_settings(&lookup, "WEATHER"),
            quotes: provider_settings(&lookup, "QUOTES"),
            calendar: provider_settings(&lookup, "CALENDAR"),
            timezone,
        }
    }

    /// Builder method to set the timezone.
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }
}

fn provider_settings(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> ProviderSettings {
    let timeout_key = format!("TOOL_{key}_TIMEOUT");
    let timeout_secs = match lookup(&timeout_key).map(|raw| raw.parse::<u64>()) {
        None => DEFAULT_TIMEOUT.as_secs(),
        Some(Ok(secs)) => secs,
        Some(Err(_)) => {
            warn!(key = %timeout_key, "invalid timeout value, using default");
            DEFAULT_TIMEOUT.as_secs()
        }
    };

    ProviderSettings {
        enabled: lookup_bool(lookup, &format!("TOOL_{key}_ENABLED"), false),
        api_url: lookup(&format!("TOOL_{key}_API_URL")).filter(|s| !s.is_empty()),
        timeout: Duration::from_secs(timeout_secs),
    }
}

/// Parses a boolean setting; accepts `1`/`true`/`yes`/`on`
/// (case-insensitive).
fn lookup_bool(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> bool {
    lookup(key)
        .map(|raw| {
            matches!(
                raw.to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        })
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = RouterConfig::from_lookup(|_| None);
        assert!(!config.enabled);
        assert!(!config.weather.enabled);
        assert!(config.weather.api_url.is_none());
        assert_eq!(config.weather.timeout, Duration::from_secs(10));
        assert_eq!(config.timezone, DEFAULT_TIMEZONE);
    }

    #[test]
    fn reads_provider_settings() {
        let config = RouterConfig::from_lookup(lookup_from(&[
            ("TOOLS_ENABLED", "true"),
            ("TOOL_WEATHER_ENABLED", "yes"),
            ("TOOL_WEATHER_API_URL", "http://weather.local:8000"),
            ("TOOL_WEATHER_TIMEOUT", "5"),
            ("TOOL_CALENDAR_ENABLED", "on"),
            ("TOOL_CALENDAR_API_URL", "https://ics.example.com"),
            ("TOOL_TIMEZONE", "Europe/Paris"),
        ]));

        assert!(config.enabled);
        assert!(config.weather.enabled);
        assert_eq!(
            config.weather.api_url(),
            Some("http://weather.local:8000")
        );
        assert_eq!(config.weather.timeout, Duration::from_secs(5));
        assert!(config.calendar.enabled);
        assert!(!config.quotes.enabled);
        assert_eq!(config.timezone, chrono_tz::Europe::Paris);
    }

    #[test]
    fn bool_parsing_accepts_common_forms() {
        for truthy in ["1", "true", "TRUE", "Yes", "on"] {
            let config =
                RouterConfig::from_lookup(lookup_from(&[("TOOLS_ENABLED", truthy)]));
            assert!(config.enabled, "expected {truthy:?} to enable");
        }
        for falsy in ["0", "false", "off", "banana"] {
            let config =
                RouterConfig::from_lookup(lookup_from(&[("TOOLS_ENABLED", falsy)]));
            assert!(!config.enabled, "expected {falsy:?} to disable");
        }
    }

    #[test]
    fn invalid_timeout_falls_back_to_default() {
        let config = RouterConfig::from_lookup(lookup_from(&[(
            "TOOL_WEATHER_TIMEOUT",
            "not-a-number",
        )]));
        assert_eq!(config.weather.timeout, Duration::from_secs(10));
    }

    #[test]
    fn invalid_timezone_falls_back_to_default() {
        let config =
            RouterConfig::from_lookup(lookup_from(&[("TOOL_TIMEZONE", "Mars/Olympus")]));
        assert_eq!(config.timezone, DEFAULT_TIMEZONE);
    }

    #[test]
    fn empty_api_url_counts_as_missing() {
        let config =
            RouterConfig::from_lookup(lookup_from(&[("TOOL_QUOTES_API_URL", "")]));
        assert!(config.quotes.api_url.is_none());
    }
}
