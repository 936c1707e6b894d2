//! Event formatting for display and speech.
//!
//! [`EventFormatter`] renders event lists as readable text: a count and
//! timeframe header followed by one block per event. Times are rendered
//! in the configured timezone with its abbreviation so "9:00 AM MST"
//! reads the same in chat, TTS, or a dashboard. Formatting is a pure
//! function of its inputs.

use chrono::DateTime;
use chrono_tz::Tz;

use convoy_core::{Event, clean_description, extract_zoom_link, truncate_with_ellipsis};

use crate::intent::{Intent, IntentKind};

const MAX_DESCRIPTION_CHARS: usize = 200;
const SKIP_DESCRIPTION_OVER_CHARS: usize = 500;

/// Formats calendar events into human-readable text.
#[derive(Debug, Clone, Copy)]
pub struct EventFormatter {
    tz: Tz,
}

impl EventFormatter {
    /// Creates a formatter rendering times in the given timezone.
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// The timezone this formatter renders in.
    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Renders events for the given intent.
    ///
    /// Zero events always produce an explicit "no events" sentence,
    /// never an empty string.
    pub fn format_events(&self, events: &[Event], intent: &Intent) -> String {
        if events.is_empty() {
            return self.no_events_message(intent);
        }

        if intent.kind == IntentKind::NextEvent {
            return self.format_next_event(&events[0]);
        }

        self.format_event_list(events, intent)
    }

    fn no_events_message(&self, intent: &Intent) -> String {
        match intent.kind {
            IntentKind::NextEvent => "You have no upcoming events.".to_string(),
            IntentKind::EventsToday => "You have no events scheduled for today.".to_string(),
            IntentKind::EventsTomorrow => "You have no events scheduled for tomorrow.".to_string(),
            IntentKind::EventsRange => {
                if intent.timeframe.contains("week") {
                    format!("You have no events scheduled for the {}.", intent.timeframe)
                } else {
                    format!("You have no events in the {}.", intent.timeframe)
                }
            }
        }
    }

    fn format_event_list(&self, events: &[Event], intent: &Intent) -> String {
        let count = events.len();
        let plural = if count == 1 { "" } else { "s" };

        let header = match intent.kind {
            IntentKind::EventsToday => format!("You have {count} event{plural} today:"),
            IntentKind::EventsTomorrow => format!("You have {count} event{plural} tomorrow:"),
            _ => {
                if intent.timeframe.contains("week") {
                    format!("You have {count} event{plural} {}:", intent.timeframe)
                } else {
                    format!("You have {count} event{plural} in the {}:", intent.timeframe)
                }
            }
        };

        // Single-day views leave the date implied; ranges spell it out.
        let show_date = intent.kind == IntentKind::EventsRange;

        let mut lines = vec![header, String::new()];
        for event in events {
            self.push_event_lines(&mut lines, event, show_date);
            lines.push(String::new());
        }

        lines.join("\n")
    }

    fn push_event_lines(&self, lines: &mut Vec<String>, event: &Event, show_date: bool) {
        lines.push(format!("**{}**", event.summary));

        let start = event.start.with_timezone(&self.tz);
        if show_date {
            lines.push(format!("  📅 {}", start.format("%A, %b %-d")));
        }
        lines.push(format!("  🕒 {}", self.time_span(start, event.end)));

        if let Some(location) = &event.location {
            lines.push(format!("  📍 {location}"));
        }

        if let Some(description) = &event.description {
            if let Some(url) = extract_zoom_link(description) {
                lines.push(format!("  🔗 Zoom: {url}"));
            }

            let cleaned = clean_description(description);
            if !cleaned.is_empty()
                && cleaned.chars().count() < SKIP_DESCRIPTION_OVER_CHARS
                && !cleaned.starts_with("Hi there")
            {
                let short = truncate_with_ellipsis(&cleaned, MAX_DESCRIPTION_CHARS);
                lines.push(format!("  ℹ️ {short}"));
            }
        }
    }

    /// Single-event rendering for "next event" answers, with the full
    /// date since the event may be weeks away.
    fn format_next_event(&self, event: &Event) -> String {
        let start = event.start.with_timezone(&self.tz);

        let mut out = String::from("Your next event:\n\n");
        out.push_str(&format!("📌 {}\n", event.summary));
        out.push_str(&format!("📅 {}\n", start.format("%A, %B %-d, %Y")));
        out.push_str(&format!("🕒 {}\n", self.time_span(start, event.end)));

        if let Some(location) = &event.location {
            out.push_str(&format!("📍 {location}\n"));
        }

        if let Some(description) = &event.description {
            let cleaned = clean_description(description);
            if !cleaned.is_empty() && cleaned.chars().count() < MAX_DESCRIPTION_CHARS {
                out.push('\n');
                out.push_str(&cleaned);
            }
        }

        out
    }

    fn time_span(&self, start: DateTime<Tz>, end: Option<DateTime<Tz>>) -> String {
        match end {
            Some(end) => {
                let end = end.with_timezone(&self.tz);
                format!(
                    "{} - {}",
                    start.format("%-I:%M %p"),
                    end.format("%-I:%M %p %Z")
                )
            }
            None => start.format("%-I:%M %p %Z").to_string(),
        }
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

    fn intent(kind: IntentKind, timeframe: &str, days: u32) -> Intent {
        Intent {
            kind,
            timeframe: timeframe.to_string(),
            days,
            range: None,
        }
    }

    fn formatter() -> EventFormatter {
        EventFormatter::new(Denver)
    }

    #[test]
    fn formats_todays_events() {
        let events = vec![
            Event::new("Team Standup", denver(2025, 1, 20, 9, 0))
                .with_end(denver(2025, 1, 20, 9, 30))
                .with_location("Room 4"),
            Event::new("Lunch", denver(2025, 1, 20, 12, 0)),
        ];

        let text = formatter().format_events(&events, &intent(IntentKind::EventsToday, "today", 1));
        assert_eq!(
            text,
            "You have 2 events today:\n\
             \n\
             **Team Standup**\n  \
             🕒 9:00 AM - 9:30 AM MST\n  \
             📍 Room 4\n\
             \n\
             **Lunch**\n  \
             🕒 12:00 PM MST\n"
        );
    }

    #[test]
    fn single_event_header_is_singular() {
        let events = vec![Event::new("Standup", denver(2025, 1, 20, 9, 0))];
        let text =
            formatter().format_events(&events, &intent(IntentKind::EventsTomorrow, "tomorrow", 1));
        assert!(text.starts_with("You have 1 event tomorrow:"));
    }

    #[test]
    fn range_views_show_dates() {
        let events = vec![Event::new("Review", denver(2025, 1, 21, 15, 0))];
        let text = formatter().format_events(
            &events,
            &intent(IntentKind::EventsRange, "next 3 days", 3),
        );
        assert!(text.starts_with("You have 1 event in the next 3 days:"));
        assert!(text.contains("📅 Tuesday, Jan 21"));
    }

    #[test]
    fn week_timeframes_read_naturally() {
        let events = vec![Event::new("Review", denver(2025, 1, 21, 15, 0))];
        let text =
            formatter().format_events(&events, &intent(IntentKind::EventsRange, "this week", 7));
        assert!(text.starts_with("You have 1 event this week:"));
    }

    #[test]
    fn no_events_messages() {
        let f = formatter();
        assert_eq!(
            f.format_events(&[], &intent(IntentKind::EventsToday, "today", 1)),
            "You have no events scheduled for today."
        );
        assert_eq!(
            f.format_events(&[], &intent(IntentKind::EventsTomorrow, "tomorrow", 1)),
            "You have no events scheduled for tomorrow."
        );
        assert_eq!(
            f.format_events(&[], &intent(IntentKind::EventsRange, "next week", 7)),
            "You have no events scheduled for the next week."
        );
        assert_eq!(
            f.format_events(&[], &intent(IntentKind::EventsRange, "next 3 days", 3)),
            "You have no events in the next 3 days."
        );
        assert_eq!(
            f.format_events(&[], &intent(IntentKind::NextEvent, "upcoming", 30)),
            "You have no upcoming events."
        );
    }

    #[test]
    fn next_event_shows_the_full_date() {
        let events = vec![
            Event::new("Board Review", denver(2025, 1, 27, 14, 0))
                .with_end(denver(2025, 1, 27, 15, 0))
                .with_location("HQ"),
        ];
        let text =
            formatter().format_events(&events, &intent(IntentKind::NextEvent, "upcoming", 30));
        assert!(text.starts_with("Your next event:\n\n📌 Board Review"));
        assert!(text.contains("📅 Monday, January 27, 2025"));
        assert!(text.contains("🕒 2:00 PM - 3:00 PM MST"));
        assert!(text.contains("📍 HQ"));
    }

    #[test]
    fn descriptions_are_cleaned_and_zoom_links_extracted() {
        let events = vec![
            Event::new("Sync", denver(2025, 1, 20, 10, 0)).with_description(
                "<p>Agenda:&nbsp;planning</p> join https://us02web.zoom.us/j/991122",
            ),
        ];
        let text = formatter().format_events(&events, &intent(IntentKind::EventsToday, "today", 1));
        assert!(text.contains("🔗 Zoom: https://us02web.zoom.us/j/991122"));
        assert!(text.contains("ℹ️ Agenda: planning join https://us02web.zoom.us/j/991122"));
        assert!(!text.contains("<p>"));
    }

    #[test]
    fn boilerplate_descriptions_are_dropped() {
        let events = vec![
            Event::new("Webinar", denver(2025, 1, 20, 10, 0))
                .with_description("Hi there, thanks for registering!"),
        ];
        let text = formatter().format_events(&events, &intent(IntentKind::EventsToday, "today", 1));
        assert!(!text.contains("ℹ️"));
    }

    #[test]
    fn formatting_is_idempotent() {
        let events = vec![Event::new("Standup", denver(2025, 1, 20, 9, 0))];
        let intent = intent(IntentKind::EventsToday, "today", 1);
        let first = formatter().format_events(&events, &intent);
        let second = formatter().format_events(&events, &intent);
        assert_eq!(first, second);
    }
}
