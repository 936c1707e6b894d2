//! The calendar event entity.
//!
//! [`Event`] is the canonical representation of a single calendar entry
//! after it has been fetched from a backend and localized to the configured
//! timezone. Events are immutable value types: repositories produce them,
//! formatters and analyzers consume them, nothing mutates them in between.

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use serde::Serialize;

/// A single calendar event, localized to a named timezone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    /// The event title.
    pub summary: String,
    /// When the event starts, in the configured timezone.
    pub start: DateTime<Tz>,
    /// When the event ends. Some backends omit the end time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Tz>>,
    /// Where the event takes place, if stated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Free-form description, often HTML from invitation mails.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Event {
    /// Creates a new event with the required fields.
    pub fn new(summary: impl Into<String>, start: DateTime<Tz>) -> Self {
        Self {
            summary: summary.into(),
            start,
            end: None,
            location: None,
            description: None,
        }
    }

    /// Builder method to set the end time.
    pub fn with_end(mut self, end: DateTime<Tz>) -> Self {
        self.end = Some(end);
        self
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The calendar date the event starts on, in its own timezone.
    pub fn start_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// Duration in minutes, when an end time is known.
    pub fn duration_minutes(&self) -> Option<i64> {
        self.end.map(|end| (end - self.start).num_minutes())
    }

    /// True if the event starts at or after the given instant.
    ///
    /// Used to resolve "next event" queries against an already-fetched
    /// horizon of events.
    pub fn starts_at_or_after<T: chrono::TimeZone>(&self, instant: &DateTime<T>) -> bool {
        self.start >= instant.with_timezone(&self.start.timezone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::America::Denver;

    fn denver(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Tz> {
        Denver.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn basic_creation() {
        let event = Event::new("Standup", denver(2025, 1, 20, 9, 0));
        assert_eq!(event.summary, "Standup");
        assert!(event.end.is_none());
        assert!(event.location.is_none());
        assert!(event.duration_minutes().is_none());
    }

    #[test]
    fn builder_pattern() {
        let event = Event::new("Planning", denver(2025, 1, 20, 14, 0))
            .with_end(denver(2025, 1, 20, 15, 30))
            .with_location("Room 2")
            .with_description("Quarterly planning");

        assert_eq!(event.duration_minutes(), Some(90));
        assert_eq!(event.location.as_deref(), Some("Room 2"));
        assert_eq!(event.description.as_deref(), Some("Quarterly planning"));
    }

    #[test]
    fn start_date_uses_local_wall_clock() {
        // 23:30 in Denver is already the next day in UTC.
        let event = Event::new("Late call", denver(2025, 1, 20, 23, 30));
        assert_eq!(
            event.start_date(),
            NaiveDate::from_ymd_opt(2025, 1, 20).unwrap()
        );
    }

    #[test]
    fn starts_at_or_after() {
        let event = Event::new("Standup", denver(2025, 1, 20, 9, 0));
        assert!(event.starts_at_or_after(&denver(2025, 1, 20, 8, 0)));
        assert!(event.starts_at_or_after(&denver(2025, 1, 20, 9, 0)));
        assert!(!event.starts_at_or_after(&denver(2025, 1, 20, 9, 1)));
    }

    #[test]
    fn serializes_without_empty_fields() {
        let event = Event::new("Standup", denver(2025, 1, 20, 9, 0));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["summary"], "Standup");
        assert!(json.get("end").is_none());
        assert!(json.get("location").is_none());
    }
}
