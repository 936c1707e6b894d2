//! ICS calendar repository.
//!
//! Implements [`CalendarRepository`] for ICS-style calendar query APIs
//! exposing:
//!
//! - `GET /calendar/events/today`
//! - `GET /calendar/events/tomorrow`
//! - `GET /calendar/events/next/{days}`
//! - `GET /calendar/health`
//!
//! The API returns JSON events whose `start`/`end` fields are
//! `"YYYY-MM-DD HH:MM"` strings already in local wall-clock time; this
//! repository attaches the configured timezone while mapping them into
//! [`Event`] values.

use std::time::Duration;

use chrono::NaiveDateTime;
use chrono_tz::Tz;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use convoy_core::{BoxFuture, Event};

use crate::error::CalendarError;
use crate::repository::{CalendarHealth, CalendarRepository};

const WIRE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Event list payload returned by the ICS API.
#[derive(Debug, Deserialize)]
struct EventsPayload {
    #[serde(default)]
    events: Vec<WireEvent>,
}

/// One event as the ICS API serializes it.
#[derive(Debug, Deserialize)]
struct WireEvent {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    start: Option<String>,
    #[serde(default)]
    end: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Repository backed by an ICS calendar query API.
#[derive(Debug)]
pub struct IcsRepository {
    client: Client,
    base_url: String,
    timeout: Duration,
    tz: Tz,
}

impl IcsRepository {
    /// Creates a new repository for the given API base URL.
    ///
    /// # Errors
    ///
    /// Returns [`CalendarError::Configuration`] if the URL does not parse
    /// or the HTTP client cannot be built.
    pub fn new(api_url: impl AsRef<str>, timeout: Duration, tz: Tz) -> Result<Self, CalendarError> {
        let api_url = api_url.as_ref().trim_end_matches('/').to_string();
        Url::parse(&api_url)
            .map_err(|e| CalendarError::Configuration(format!("invalid API URL: {e}")))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CalendarError::Configuration(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: api_url,
            timeout,
            tz,
        })
    }

    async fn fetch_events(&self, endpoint: &str) -> Result<Vec<Event>, CalendarError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(url = %url, "fetching calendar events");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_request_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CalendarError::Status(status.as_u16()));
        }

        let payload: EventsPayload = response
            .json()
            .await
            .map_err(|e| CalendarError::Malformed(e.to_string()))?;

        let events: Vec<Event> = payload
            .events
            .into_iter()
            .filter_map(|wire| self.map_event(wire))
            .collect();

        debug!(count = events.len(), endpoint = %endpoint, "retrieved events");
        Ok(events)
    }

    /// Maps a wire event into an [`Event`], localizing timestamps.
    ///
    /// Events without a parsable start time are dropped with a warning
    /// rather than failing the whole fetch; an unparsable end time only
    /// loses the end.
    fn map_event(&self, wire: WireEvent) -> Option<Event> {
        let summary = wire
            .summary
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "Untitled Event".to_string());

        let start = match wire.start.as_deref().map(|s| self.parse_local(s)) {
            Some(Ok(dt)) => dt,
            Some(Err(e)) => {
                warn!(summary = %summary, error = %e, "skipping event with bad start time");
                return None;
            }
            None => {
                warn!(summary = %summary, "skipping event without start time");
                return None;
            }
        };

        let end = match wire.end.as_deref().filter(|s| !s.is_empty()) {
            Some(raw) => match self.parse_local(raw) {
                Ok(dt) => Some(dt),
                Err(e) => {
                    warn!(summary = %summary, error = %e, "ignoring bad end time");
                    None
                }
            },
            None => None,
        };

        let mut event = Event::new(summary, start);
        if let Some(end) = end {
            event = event.with_end(end);
        }
        if let Some(location) = wire.location.filter(|s| !s.is_empty()) {
            event = event.with_location(location);
        }
        if let Some(description) = wire.description.filter(|s| !s.is_empty()) {
            event = event.with_description(description);
        }
        Some(event)
    }

    fn parse_local(&self, raw: &str) -> Result<chrono::DateTime<Tz>, CalendarError> {
        let naive = NaiveDateTime::parse_from_str(raw, WIRE_TIME_FORMAT)
            .map_err(|e| CalendarError::Malformed(format!("bad timestamp {raw:?}: {e}")))?;

        match naive.and_local_timezone(self.tz) {
            chrono::LocalResult::Single(dt) => Ok(dt),
            chrono::LocalResult::Ambiguous(first, _) => Ok(first),
            chrono::LocalResult::None => Err(CalendarError::Malformed(format!(
                "timestamp {raw:?} does not exist in {}",
                self.tz
            ))),
        }
    }

    fn map_request_error(&self, err: &reqwest::Error) -> CalendarError {
        if err.is_timeout() {
            CalendarError::Timeout(self.timeout.as_secs())
        } else {
            CalendarError::Connection(self.base_url.clone())
        }
    }
}

impl CalendarRepository for IcsRepository {
    fn source_name(&self) -> &str {
        "ics"
    }

    fn events_today(&self) -> BoxFuture<'_, Result<Vec<Event>, CalendarError>> {
        Box::pin(async move { self.fetch_events("/calendar/events/today").await })
    }

    fn events_tomorrow(&self) -> BoxFuture<'_, Result<Vec<Event>, CalendarError>> {
        Box::pin(async move { self.fetch_events("/calendar/events/tomorrow").await })
    }

    fn events_next_days(&self, days: u32) -> BoxFuture<'_, Result<Vec<Event>, CalendarError>> {
        Box::pin(async move {
            self.fetch_events(&format!("/calendar/events/next/{days}"))
                .await
        })
    }

    fn health(&self) -> BoxFuture<'_, Result<CalendarHealth, CalendarError>> {
        Box::pin(async move {
            let url = format!("{}/calendar/health", self.base_url);
            let response = self.client.get(&url).timeout(HEALTH_TIMEOUT).send().await;

            // A failed probe is a report, not an error: callers want to
            // know the backend is down, not handle a transport failure.
            let health = match response {
                Ok(resp) if resp.status().is_success() => resp
                    .json::<CalendarHealth>()
                    .await
                    .unwrap_or_else(|e| CalendarHealth::unhealthy(e.to_string())),
                Ok(resp) => CalendarHealth::unhealthy(format!("status {}", resp.status().as_u16())),
                Err(e) => CalendarHealth::unhealthy(e.to_string()),
            };
            Ok(health)
        })
    }
}
