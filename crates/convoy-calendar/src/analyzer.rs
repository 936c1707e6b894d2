//! Calendar analysis orchestration.
//!
//! [`CalendarAnalyzer`] runs one query through classification, data
//! fetching, and formatting, independent of which
//! [`CalendarRepository`] implementation is injected.
//!
//! The analyzer is a hard error boundary: repository failures become
//! structured [`AnalysisResult`]s with `success == false`, never errors
//! or panics escaping [`CalendarAnalyzer::analyze`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::{debug, warn};

use convoy_core::Event;

use crate::error::CalendarError;
use crate::formatter::EventFormatter;
use crate::intent::{Intent, IntentKind, classify, is_calendar_query};
use crate::repository::{CalendarHealth, CalendarRepository};

/// Shown when the calendar backend fails outright.
const FAILURE_TEXT: &str = "Sorry, I couldn't check your calendar right now.";

/// Execution metadata attached to every analysis.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisMetadata {
    /// Number of events returned.
    pub event_count: usize,
    /// Identifier of the backing data source (e.g. "ics").
    pub data_source: String,
    /// IANA name of the timezone times were rendered in.
    pub timezone: String,
}

/// The outcome of analyzing one calendar query.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    /// Whether the lookup succeeded.
    pub success: bool,
    /// The classified intent the lookup was based on.
    pub intent: Intent,
    /// Matching events, sorted ascending by start time.
    pub events: Vec<Event>,
    /// Human-readable rendering, suitable for chat or TTS.
    pub formatted_text: String,
    /// Failure reason when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Execution metadata.
    pub metadata: AnalysisMetadata,
}

/// Orchestrates classification, fetching, and formatting for calendar
/// queries.
pub struct CalendarAnalyzer {
    repository: Arc<dyn CalendarRepository>,
    formatter: EventFormatter,
    tz: Tz,
    enabled: bool,
}

impl CalendarAnalyzer {
    /// Creates an analyzer over the given repository, rendering times in
    /// `tz`.
    pub fn new(repository: Arc<dyn CalendarRepository>, tz: Tz) -> Self {
        Self {
            repository,
            formatter: EventFormatter::new(tz),
            tz,
            enabled: true,
        }
    }

    /// Builder method to toggle the analyzer.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// The timezone used for classification and rendering.
    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Identifier of the backing data source.
    pub fn source_name(&self) -> &str {
        self.repository.source_name()
    }

    /// True when the query looks calendar-related and the analyzer is
    /// enabled.
    pub fn can_handle(&self, query: &str) -> bool {
        self.enabled && is_calendar_query(query)
    }

    /// Analyzes a calendar query relative to the current time.
    pub async fn analyze(&self, query: &str) -> AnalysisResult {
        self.analyze_at(query, Utc::now()).await
    }

    /// Analyzes a calendar query relative to an explicit `now`.
    ///
    /// Exposed so callers (and tests) can pin the reference time.
    pub async fn analyze_at(&self, query: &str, now: DateTime<Utc>) -> AnalysisResult {
        let intent = classify(query, now, self.tz);

        if !self.enabled {
            return self.failure(intent, "calendar analyzer is disabled");
        }

        debug!(
            kind = intent.kind.as_str(),
            timeframe = %intent.timeframe,
            "classified calendar query"
        );

        match self.fetch_for_intent(&intent, now).await {
            Ok(mut events) => {
                // Stable sort: equal start times keep repository order.
                events.sort_by(|a, b| a.start.cmp(&b.start));
                let formatted_text = self.formatter.format_events(&events, &intent);
                AnalysisResult {
                    success: true,
                    metadata: self.metadata(events.len()),
                    events,
                    formatted_text,
                    error: None,
                    intent,
                }
            }
            Err(err) => {
                warn!(error = %err, "calendar analysis failed");
                self.failure(intent, err.to_string())
            }
        }
    }

    /// Health of the backing repository.
    pub async fn check_health(&self) -> CalendarHealth {
        match self.repository.health().await {
            Ok(health) => health,
            Err(err) => CalendarHealth::unhealthy(err.to_string()),
        }
    }

    async fn fetch_for_intent(
        &self,
        intent: &Intent,
        now: DateTime<Utc>,
    ) -> Result<Vec<Event>, CalendarError> {
        match intent.kind {
            IntentKind::EventsToday => self.repository.events_today().await,
            IntentKind::EventsTomorrow => self.repository.events_tomorrow().await,
            IntentKind::EventsRange => self.repository.events_next_days(intent.days).await,
            IntentKind::NextEvent => {
                // The repository only answers day ranges; the first event
                // at or after now within the horizon is the "next" one.
                let mut events = self.repository.events_next_days(intent.days).await?;
                events.sort_by(|a, b| a.start.cmp(&b.start));
                let next = events.into_iter().find(|e| e.starts_at_or_after(&now));
                Ok(next.into_iter().collect())
            }
        }
    }

    fn failure(&self, intent: Intent, error: impl Into<String>) -> AnalysisResult {
        AnalysisResult {
            success: false,
            intent,
            events: Vec::new(),
            formatted_text: FAILURE_TEXT.to_string(),
            error: Some(error.into()),
            metadata: self.metadata(0),
        }
    }

    fn metadata(&self, event_count: usize) -> AnalysisMetadata {
        AnalysisMetadata {
            event_count,
            data_source: self.repository.source_name().to_string(),
            timezone: self.tz.name().to_string(),
        }
    }
}
