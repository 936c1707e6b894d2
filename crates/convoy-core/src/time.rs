//! Date range arithmetic in a named timezone.
//!
//! Timeframe queries ("today", "next 3 days") resolve to an inclusive
//! range of calendar days. All boundary arithmetic happens in the
//! configured IANA timezone: a day runs from 00:00:00 to 23:59:59 local
//! wall-clock time, never a naive UTC shift.

use chrono::{DateTime, Duration, NaiveDate, TimeZone};
use chrono_tz::Tz;
use serde::Serialize;

/// An inclusive range of calendar days `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    /// First day of the range (inclusive).
    pub start: NaiveDate,
    /// Last day of the range (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range spanning from `start` to `end`, both inclusive.
    ///
    /// # Panics
    ///
    /// Panics if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        assert!(start <= end, "DateRange start must be <= end");
        Self { start, end }
    }

    /// Creates a range covering a single day.
    pub fn single_day(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// Creates a range covering `days` calendar days starting at `start`.
    ///
    /// `days` is clamped to at least 1, so `spanning_days(today, 1)` is
    /// the same as `single_day(today)`.
    pub fn spanning_days(start: NaiveDate, days: u32) -> Self {
        let span = i64::from(days.max(1)) - 1;
        Self {
            start,
            end: start + Duration::days(span),
        }
    }

    /// Number of calendar days covered, at least 1.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// True if the given day falls inside the range.
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Resolves the range to concrete timestamps in the given timezone:
    /// 00:00:00 on the first day through 23:59:59 on the last.
    pub fn bounds(&self, tz: Tz) -> (DateTime<Tz>, DateTime<Tz>) {
        (day_start(self.start, tz), day_end(self.end, tz))
    }
}

/// The first instant of `day` in `tz` (00:00:00 local).
///
/// When midnight does not exist (a DST spring-forward gap), the earliest
/// valid instant of the day is used instead.
pub fn day_start(day: NaiveDate, tz: Tz) -> DateTime<Tz> {
    resolve_local(day, 0, 0, 0, tz)
}

/// The last instant of `day` in `tz` (23:59:59 local).
pub fn day_end(day: NaiveDate, tz: Tz) -> DateTime<Tz> {
    resolve_local(day, 23, 59, 59, tz)
}

fn resolve_local(day: NaiveDate, h: u32, m: u32, s: u32, tz: Tz) -> DateTime<Tz> {
    let naive = day.and_hms_opt(h, m, s).expect("valid wall-clock time");
    match tz.from_local_datetime(&naive) {
        chrono::LocalResult::Single(dt) => dt,
        // Fall backward: two valid instants, take the first.
        chrono::LocalResult::Ambiguous(first, _) => first,
        // Spring forward: the wall-clock time is skipped. Walk forward
        // minute by minute until a valid local time appears.
        chrono::LocalResult::None => {
            let mut probe = naive;
            loop {
                probe = probe + Duration::minutes(1);
                if let chrono::LocalResult::Single(dt) = tz.from_local_datetime(&probe) {
                    return dt;
                }
            }
        }
    }
}
