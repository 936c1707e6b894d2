//! Calendar capability provider.
//!
//! A thin wrapper that exposes [`CalendarAnalyzer`] behind the
//! [`CapabilityProvider`] contract. The analyzer does the real work
//! (classification, repository dispatch, formatting); this wrapper maps
//! its [`AnalysisResult`] into the uniform provider result shape so the
//! router can treat the calendar like any other capability.

use std::sync::Arc;
use std::time::Duration;

use chrono_tz::Tz;
use serde_json::json;
use tracing::debug;

use convoy_calendar::{AnalysisResult, CalendarAnalyzer, IcsRepository};
use convoy_core::BoxFuture;

use crate::error::ProviderError;
use crate::provider::CapabilityProvider;
use crate::result::ProviderResult;

const NAME: &str = "calendar";

/// Provider for calendar events and schedule lookups.
pub struct CalendarProvider {
    analyzer: Option<CalendarAnalyzer>,
    timeout: Duration,
    enabled: bool,
}

impl CalendarProvider {
    /// Creates a provider around an existing analyzer.
    ///
    /// Passing `None` builds an unconfigured provider that reports
    /// itself unavailable.
    pub fn new(analyzer: Option<CalendarAnalyzer>, timeout: Duration, enabled: bool) -> Self {
        Self {
            analyzer,
            timeout,
            enabled,
        }
    }

    /// Creates a provider backed by an [`IcsRepository`] at `api_url`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the URL is present but
    /// invalid. A missing URL produces an unconfigured provider.
    pub fn from_settings(
        api_url: Option<&str>,
        timeout: Duration,
        enabled: bool,
        tz: Tz,
    ) -> Result<Self, ProviderError> {
        let analyzer = match api_url.filter(|u| !u.is_empty()) {
            Some(url) => {
                let repository = IcsRepository::new(url, timeout, tz)
                    .map_err(|e| ProviderError::configuration(e.to_string()).with_provider(NAME))?;
                Some(CalendarAnalyzer::new(Arc::new(repository), tz))
            }
            None => None,
        };
        Ok(Self::new(analyzer, timeout, enabled))
    }

    fn map_analysis(analysis: AnalysisResult) -> ProviderResult {
        if analysis.success {
            debug!(
                event_count = analysis.metadata.event_count,
                "calendar analysis succeeded"
            );
            ProviderResult::success(
                NAME,
                json!({
                    "intent": analysis.intent,
                    "events": analysis.events,
                    "event_count": analysis.metadata.event_count,
                    "formatted_text": analysis.formatted_text,
                }),
            )
        } else {
            let error = analysis
                .error
                .unwrap_or_else(|| "calendar analysis failed".to_string());
            ProviderResult::failure(NAME, error)
        }
    }
}

impl CapabilityProvider for CalendarProvider {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> String {
        "Calendar tool - retrieves events and schedules from the calendar service".to_string()
    }

    fn intent_keywords(&self) -> Vec<String> {
        [
            "calendar",
            "event",
            "events",
            "schedule",
            "appointment",
            "appointments",
            "meeting",
            "meetings",
            "agenda",
            "today",
            "tomorrow",
            "tonight",
            "this week",
            "next week",
            "this month",
            "next month",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn required_config(&self) -> Vec<&'static str> {
        vec!["api_url"]
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn is_available(&self) -> bool {
        self.enabled && self.analyzer.is_some()
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Delegates to the analyzer's broader matcher, which also accepts
    /// scheduling questions without a direct calendar keyword.
    fn can_handle(&self, query: &str) -> bool {
        self.enabled
            && self
                .analyzer
                .as_ref()
                .is_some_and(|analyzer| analyzer.can_handle(query))
    }

    fn execute(&self, query: &str) -> BoxFuture<'_, ProviderResult> {
        let query = query.to_string();
        Box::pin(async move {
            if !self.enabled {
                return ProviderResult::failure(NAME, "calendar tool is disabled");
            }
            let Some(analyzer) = &self.analyzer else {
                return ProviderResult::failure(NAME, "calendar API URL not configured");
            };
            Self::map_analysis(analyzer.analyze(&query).await)
        })
    }

    fn health_check(&self) -> BoxFuture<'_, bool> {
        Box::pin(async move {
            match &self.analyzer {
                Some(analyzer) if self.enabled => analyzer.check_health().await.is_healthy(),
                _ => false,
            }
        })
    }

    fn format_for_llm(&self, result: &ProviderResult) -> String {
        if !result.success {
            return format!("[calendar tool error: {}]", result.error_message());
        }

        match result
            .data
            .as_ref()
            .and_then(|data| data["formatted_text"].as_str())
        {
            Some(formatted) => format!("[Calendar Information]\n{formatted}"),
            None => format!("[{} tool response]", NAME),
        }
    }
}
