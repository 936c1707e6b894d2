//! The calendar backend abstraction.
//!
//! [`CalendarRepository`] is the contract every calendar data source
//! implements. The analyzer only talks to this trait, so swapping the
//! ICS HTTP backend for Google, Nextcloud, or a test double is a matter
//! of injecting a different implementation.
//!
//! Repositories are allowed to raise: network and payload failures come
//! back as [`CalendarError`]. Catching them is the analyzer's job.

use serde::{Deserialize, Serialize};

use convoy_core::{BoxFuture, Event};

use crate::error::CalendarError;

/// Health report for a calendar backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarHealth {
    /// Status string, `"healthy"` when the backend is reachable.
    pub status: String,
    /// Details when the backend is not healthy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CalendarHealth {
    /// A healthy report.
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            error: None,
        }
    }

    /// An unhealthy report with a reason.
    pub fn unhealthy(reason: impl Into<String>) -> Self {
        Self {
            status: "unhealthy".to_string(),
            error: Some(reason.into()),
        }
    }

    /// True when the backend reported itself healthy.
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// A source of calendar events for fixed timeframe queries.
///
/// Implementations should return events localized to their configured
/// timezone and must not silently swallow fetch failures: raising a
/// [`CalendarError`] lets the analyzer degrade gracefully with a proper
/// error message instead of pretending the calendar is empty.
pub trait CalendarRepository: Send + Sync {
    /// Short identifier of this data source (e.g. "ics", "google").
    fn source_name(&self) -> &str;

    /// All events on the local calendar day.
    fn events_today(&self) -> BoxFuture<'_, Result<Vec<Event>, CalendarError>>;

    /// All events on the following local calendar day.
    fn events_tomorrow(&self) -> BoxFuture<'_, Result<Vec<Event>, CalendarError>>;

    /// All events in the next `days` calendar days, today included.
    fn events_next_days(&self, days: u32) -> BoxFuture<'_, Result<Vec<Event>, CalendarError>>;

    /// Reachability probe for the backend.
    fn health(&self) -> BoxFuture<'_, Result<CalendarHealth, CalendarError>>;
}
