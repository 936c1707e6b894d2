//! Timeframe classification for calendar queries.
//!
//! [`classify`] turns a free-text question ("what's on my calendar for the
//! next three days?") into a structured [`Intent`] with a resolved date
//! range. Classification is keyword and pattern driven, not full NLP, and
//! it never fails: anything unrecognized falls back to today's events.
//!
//! All date arithmetic happens in the caller's timezone; "today" is the
//! local calendar day, not the UTC day.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use regex::Regex;
use serde::Serialize;

use convoy_core::DateRange;

/// Horizon used to resolve "next event" queries, in days.
pub const NEXT_EVENT_HORIZON_DAYS: u32 = 30;

static NEXT_EVENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"when\s+is\s+(the|my)\s+next").expect("valid regex"));
static NEXT_WEEKS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"next\s+(\d+|one|two|three|four|five|six|seven|eight|nine|ten)\s+weeks?")
        .expect("valid regex")
});
static NEXT_DAYS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"next\s+(\d+|one|two|three|four|five|six|seven|eight|nine|ten)\s+days?")
        .expect("valid regex")
});

/// What kind of calendar lookup a query asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    /// Events on the local calendar day.
    EventsToday,
    /// Events on the following local calendar day.
    EventsTomorrow,
    /// Events over a multi-day range starting today.
    EventsRange,
    /// The first event at or after now.
    NextEvent,
}

impl IntentKind {
    /// Stable machine-readable tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EventsToday => "events_today",
            Self::EventsTomorrow => "events_tomorrow",
            Self::EventsRange => "events_range",
            Self::NextEvent => "next_event",
        }
    }
}

/// A classified calendar query. Created per query, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Intent {
    /// What kind of lookup to perform.
    pub kind: IntentKind,
    /// Human-readable timeframe label ("today", "next 3 days", ...).
    pub timeframe: String,
    /// Horizon in days for range lookups (1 for single-day intents).
    pub days: u32,
    /// Resolved inclusive date range; `None` for [`IntentKind::NextEvent`],
    /// which is bounded by time-of-day rather than calendar days.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<DateRange>,
}

/// Classifies a query into an [`Intent`], relative to `now` in `tz`.
///
/// Recognized phrases, checked in order: "when is the/my next ..." and
/// "next meeting"/"next event"; "next N days"/"next N weeks" with digits
/// or the words one through ten; "next month"; "this week"/"next week";
/// "tomorrow"; "today"/"tonight". Anything else, including an empty
/// query, defaults to today's events.
pub fn classify(query: &str, now: DateTime<Utc>, tz: Tz) -> Intent {
    let text = query.to_lowercase();
    let today = now.with_timezone(&tz).date_naive();

    if NEXT_EVENT_RE.is_match(&text)
        || text.contains("next meeting")
        || text.contains("next event")
    {
        return Intent {
            kind: IntentKind::NextEvent,
            timeframe: "upcoming".to_string(),
            days: NEXT_EVENT_HORIZON_DAYS,
            range: None,
        };
    }

    if let Some(caps) = NEXT_WEEKS_RE.captures(&text) {
        let weeks = parse_count(&caps[1]).max(1);
        let days = weeks * 7;
        return Intent {
            kind: IntentKind::EventsRange,
            timeframe: format!("next {weeks} week{}", plural(weeks)),
            days,
            range: Some(DateRange::spanning_days(today, days)),
        };
    }

    if let Some(caps) = NEXT_DAYS_RE.captures(&text) {
        let days = parse_count(&caps[1]).max(1);
        return Intent {
            kind: IntentKind::EventsRange,
            timeframe: format!("next {days} day{}", plural(days)),
            days,
            range: Some(DateRange::spanning_days(today, days)),
        };
    }

    if text.contains("next month") {
        return range_intent("next month", 30, today);
    }

    if text.contains("this week") {
        return range_intent("this week", 7, today);
    }

    if text.contains("next week") && !text.contains("weeks") {
        return range_intent("next week", 7, today);
    }

    if text.contains("tomorrow") {
        let tomorrow = today + Duration::days(1);
        return Intent {
            kind: IntentKind::EventsTomorrow,
            timeframe: "tomorrow".to_string(),
            days: 1,
            range: Some(DateRange::single_day(tomorrow)),
        };
    }

    // "today", "tonight", and the fallback all resolve to the local day.
    Intent {
        kind: IntentKind::EventsToday,
        timeframe: "today".to_string(),
        days: 1,
        range: Some(DateRange::single_day(today)),
    }
}

/// Returns true when a query looks calendar-related.
///
/// This is a broader matcher than the tool-routing keyword test: beside
/// the direct calendar vocabulary it accepts scheduling questions
/// ("when", "am i busy", "free") as long as the query is not about
/// documents or files.
pub fn is_calendar_query(query: &str) -> bool {
    const PRIMARY: &[&str] = &[
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
        "monday",
        "tuesday",
        "wednesday",
        "thursday",
        "friday",
        "saturday",
        "sunday",
    ];
    const SECONDARY: &[&str] = &["when", "what time", "am i busy", "free", "available"];
    const DOCUMENT_WORDS: &[&str] = &["document", "file", "pdf", "email", "attachment"];

    let text = query.to_lowercase();

    if PRIMARY.iter().any(|kw| text.contains(kw)) {
        return true;
    }

    // Scheduling questions count unless the query is about documents.
    if SECONDARY.iter().any(|kw| text.contains(kw))
        && !DOCUMENT_WORDS.iter().any(|kw| text.contains(kw))
    {
        return true;
    }

    NEXT_EVENT_RE.is_match(&text)
}

fn range_intent(timeframe: &str, days: u32, today: chrono::NaiveDate) -> Intent {
    Intent {
        kind: IntentKind::EventsRange,
        timeframe: timeframe.to_string(),
        days,
        range: Some(DateRange::spanning_days(today, days)),
    }
}

fn parse_count(token: &str) -> u32 {
    match token {
        "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        digits => digits.parse().unwrap_or(7),
    }
}

fn plural(n: u32) -> &'static str {
    if n == 1 { "" } else { "s" }
}
