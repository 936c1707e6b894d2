//! CapabilityProvider trait definition.
//!
//! This module defines the [`CapabilityProvider`] trait, the core
//! abstraction for external data sources (weather, quotes, calendar,
//! generic REST backends).
//!
//! Providers are responsible for:
//! - Deciding whether a free-text query is theirs to answer
//! - Calling their backend with a bounded timeout
//! - Converting every failure into a structured [`ProviderResult`]
//! - Rendering their result as a labeled text block for an LLM context

use std::time::Duration;

use regex::Regex;
use tracing::debug;

use convoy_core::BoxFuture;

use crate::error::{ProviderError, ProviderErrorCode};
use crate::result::ProviderResult;

/// Default per-call timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Budget for health-check probes, independent of the call timeout.
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// The contract every capability provider implements.
///
/// Implementations must be `Send + Sync`; the router shares them across
/// concurrent `route` calls. Async methods return [`BoxFuture`] so the
/// trait stays object-safe.
///
/// # Execution contract
///
/// `execute` never fails out of its future: connection errors, HTTP
/// error statuses, timeouts, and malformed payloads are each mapped to a
/// failed [`ProviderResult`] with a distinct message. Callers can always
/// await the future and inspect `success`.
pub trait CapabilityProvider: Send + Sync {
    /// Unique registry name of this provider (e.g. "weather").
    fn name(&self) -> &str;

    /// One-line summary for status surfaces.
    fn description(&self) -> String;

    /// The lower-cased vocabulary that marks a query as relevant.
    ///
    /// Entries containing `.*` are treated as regex patterns, everything
    /// else as plain substrings.
    fn intent_keywords(&self) -> Vec<String>;

    /// Configuration keys that must be non-empty for the provider to be
    /// available.
    fn required_config(&self) -> Vec<&'static str> {
        Vec::new()
    }

    /// Whether the provider is switched on in configuration.
    fn is_enabled(&self) -> bool;

    /// True iff enabled and fully configured.
    fn is_available(&self) -> bool;

    /// Per-call timeout for `execute`.
    fn timeout(&self) -> Duration;

    /// Decides whether this provider should handle the query.
    ///
    /// Default: available, and the lower-cased query contains at least
    /// one keyword. Several providers may match the same query; all of
    /// them run.
    fn can_handle(&self, query: &str) -> bool {
        if !self.is_available() {
            return false;
        }
        match matched_keyword(query, &self.intent_keywords()) {
            Some(keyword) => {
                debug!(provider = self.name(), keyword = %keyword, "keyword match");
                true
            }
            None => false,
        }
    }

    /// Calls the backend and returns a structured result. Never fails.
    fn execute(&self, query: &str) -> BoxFuture<'_, ProviderResult>;

    /// Lightweight reachability probe of the backend.
    fn health_check(&self) -> BoxFuture<'_, bool>;

    /// Renders a result as a labeled block for LLM context injection.
    ///
    /// Must not panic on failed results; the default renders a short
    /// bracketed diagnostic.
    fn format_for_llm(&self, result: &ProviderResult) -> String {
        if !result.success {
            return format!("[{} tool error: {}]", self.name(), result.error_message());
        }
        let data = result
            .data
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_default();
        format!("[{} tool response: {}]", self.name(), data)
    }
}

/// Returns the first keyword matching the query, if any.
///
/// Keywords containing `.*` are evaluated as regular expressions against
/// the lower-cased query; plain keywords use substring containment.
pub fn matched_keyword(query: &str, keywords: &[String]) -> Option<String> {
    let query = query.to_lowercase();
    for keyword in keywords {
        if keyword.contains(".*") {
            if let Ok(re) = Regex::new(keyword) {
                if re.is_match(&query) {
                    return Some(keyword.clone());
                }
            }
        } else if query.contains(keyword.as_str()) {
            return Some(keyword.clone());
        }
    }
    None
}

/// Validates and normalizes a configured base URL.
///
/// Missing or empty URLs are not an error here: the provider is built in
/// an unavailable state and reports the missing configuration through
/// `is_available`. A present-but-invalid URL is a configuration error.
pub(crate) fn validate_base_url(
    provider: &str,
    api_url: Option<&str>,
) -> Result<Option<String>, ProviderError> {
    match api_url {
        None => Ok(None),
        Some(raw) if raw.is_empty() => Ok(None),
        Some(raw) => {
            let trimmed = raw.trim_end_matches('/');
            url::Url::parse(trimmed).map_err(|e| {
                ProviderError::configuration(format!("invalid {provider} API URL: {e}"))
                    .with_provider(provider)
            })?;
            Ok(Some(trimmed.to_string()))
        }
    }
}

/// Maps a reqwest transport failure onto the provider error taxonomy.
pub(crate) fn map_transport_error(
    provider: &str,
    base_url: &str,
    timeout: Duration,
    err: &reqwest::Error,
) -> ProviderError {
    let mapped = if err.is_timeout() {
        ProviderError::timeout(format!(
            "{provider} API request timed out after {} seconds",
            timeout.as_secs()
        ))
    } else if err.is_connect() {
        ProviderError::connection(format!("cannot connect to {provider} service at {base_url}"))
    } else {
        ProviderError::new(
            ProviderErrorCode::Upstream,
            format!("{provider} request failed: {err}"),
        )
    };
    mapped.with_provider(provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct StubProvider {
        available: bool,
    }

    impl CapabilityProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        fn description(&self) -> String {
            "stub provider".to_string()
        }

        fn intent_keywords(&self) -> Vec<String> {
            vec!["widget".to_string(), "what.*like outside".to_string()]
        }

        fn is_enabled(&self) -> bool {
            self.available
        }

        fn is_available(&self) -> bool {
            self.available
        }

        fn timeout(&self) -> Duration {
            DEFAULT_TIMEOUT
        }

        fn execute(&self, _query: &str) -> BoxFuture<'_, ProviderResult> {
            Box::pin(async { ProviderResult::success("stub", json!({"ok": true})) })
        }

        fn health_check(&self) -> BoxFuture<'_, bool> {
            Box::pin(async { true })
        }
    }

    #[test]
    fn default_can_handle_uses_substring_matching() {
        let provider = StubProvider { available: true };
        assert!(provider.can_handle("where is my WIDGET"));
        assert!(!provider.can_handle("unrelated"));
    }

    #[test]
    fn default_can_handle_supports_regex_keywords() {
        let provider = StubProvider { available: true };
        assert!(provider.can_handle("what's it like outside right now"));
    }

    #[test]
    fn unavailable_provider_never_matches() {
        let provider = StubProvider { available: false };
        assert!(!provider.can_handle("widget"));
    }

    #[test]
    fn default_formatting() {
        let provider = StubProvider { available: true };

        let ok = ProviderResult::success("stub", json!({"ok": true}));
        assert_eq!(
            provider.format_for_llm(&ok),
            r#"[stub tool response: {"ok":true}]"#
        );

        let failed = ProviderResult::failure("stub", "backend down");
        assert_eq!(
            provider.format_for_llm(&failed),
            "[stub tool error: backend down]"
        );
    }

    #[test]
    fn matched_keyword_reports_the_match() {
        let keywords = vec!["temperature".to_string()];
        assert_eq!(
            matched_keyword("TEMPERATURE please", &keywords).as_deref(),
            Some("temperature")
        );
        assert!(matched_keyword("humidity", &keywords).is_none());
    }
}
