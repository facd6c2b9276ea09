//! Calendar arithmetic over epoch-millisecond timestamps.
//!
//! # Responsibility
//! - Compute the current-year fetch window used by all store reads.
//! - Compare timestamps at local calendar-day granularity.
//! - Break a remaining time span into its largest display unit.
//!
//! # Invariants
//! - All timestamps are Unix epoch milliseconds.
//! - Window bounds are half-open: `[start_ms, end_ms)`.
//! - Day-granularity comparisons use the device-local time zone.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

const MS_PER_MINUTE: i64 = 60 * 1000;
const MINUTES_PER_HOUR: i64 = 60;
const MINUTES_PER_DAY: i64 = 24 * 60;

/// Marker string the original task tiles render for due-now/overdue state.
pub const UNAVAILABLE_MARKER: &str = "- -";

/// Current time as epoch milliseconds.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Half-open epoch-millisecond window, `[start_ms, end_ms)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl TimeWindow {
    /// Window spanning the current local calendar year:
    /// `[Jan 1 00:00, next Jan 1 00:00)`.
    ///
    /// The default views deliberately see one calendar year of history;
    /// records outside the window exist but stay invisible.
    pub fn current_year() -> Self {
        let year = Local::now().year();
        Self {
            start_ms: local_year_start_ms(year),
            end_ms: local_year_start_ms(year + 1),
        }
    }

    /// Whether `timestamp_ms` falls inside the window.
    pub fn contains(&self, timestamp_ms: i64) -> bool {
        timestamp_ms >= self.start_ms && timestamp_ms < self.end_ms
    }
}

/// Whether two timestamps fall on the same local calendar day.
pub fn is_same_local_day(a_ms: i64, b_ms: i64) -> bool {
    match (local_date(a_ms), local_date(b_ms)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Remaining time until a task deadline, reduced to its largest non-zero
/// display unit.
///
/// The original app collapsed both "exactly due" and "past due" into one
/// `- -` marker; those are distinct states here so callers can branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "unit", content = "amount")]
pub enum TimeRemaining {
    Days(i64),
    Hours(i64),
    Minutes(i64),
    /// Less than one minute remains, including exactly zero.
    DueNow,
    /// Deadline already passed.
    Overdue { minutes: i64 },
}

impl TimeRemaining {
    /// Whether the deadline has passed.
    pub fn is_overdue(&self) -> bool {
        matches!(self, Self::Overdue { .. })
    }
}

impl Display for TimeRemaining {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Days(amount) => write!(f, "{amount} day{}", plural_suffix(*amount)),
            Self::Hours(amount) => write!(f, "{amount} hour{}", plural_suffix(*amount)),
            Self::Minutes(amount) => write!(f, "{amount} minute{}", plural_suffix(*amount)),
            // Both terminal states keep the original tile string; branch on
            // the enum for distinct UI treatment.
            Self::DueNow | Self::Overdue { .. } => write!(f, "{UNAVAILABLE_MARKER}"),
        }
    }
}

/// Computes remaining time from `max(start_ms, now_ms)` to `end_ms`.
///
/// # Contract
/// - Returns whole days when at least one full day remains.
/// - Otherwise whole hours, otherwise whole minutes.
/// - Sub-minute positive remainder (including zero) is `DueNow`.
/// - Negative remainder is `Overdue` with whole minutes elapsed.
pub fn time_remaining(start_ms: i64, end_ms: i64, now_ms: i64) -> TimeRemaining {
    let anchor_ms = start_ms.max(now_ms);
    let remaining_ms = end_ms - anchor_ms;

    if remaining_ms < 0 {
        return TimeRemaining::Overdue {
            minutes: (-remaining_ms) / MS_PER_MINUTE,
        };
    }

    let minutes = remaining_ms / MS_PER_MINUTE;
    let days = minutes / MINUTES_PER_DAY;
    if days > 0 {
        return TimeRemaining::Days(days);
    }
    let hours = minutes / MINUTES_PER_HOUR;
    if hours > 0 {
        return TimeRemaining::Hours(hours);
    }
    if minutes > 0 {
        return TimeRemaining::Minutes(minutes);
    }
    TimeRemaining::DueNow
}

fn plural_suffix(amount: i64) -> &'static str {
    if amount == 1 {
        ""
    } else {
        "s"
    }
}

fn local_date(timestamp_ms: i64) -> Option<NaiveDate> {
    Local
        .timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt: DateTime<Local>| dt.date_naive())
}

fn local_year_start_ms(year: i32) -> i64 {
    let naive = NaiveDate::from_ymd_opt(year, 1, 1)
        .map(|date| date.and_time(NaiveTime::MIN))
        .unwrap_or(NaiveDateTime::MIN);

    // Midnight Jan 1 is never inside a DST gap for real-world zones, but the
    // fallback keeps this total anyway.
    naive
        .and_local_timezone(Local)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}
