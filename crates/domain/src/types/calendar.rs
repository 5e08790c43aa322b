//! Calendar event types

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::constants::EVENT_TIME_ZONE;

/// Start and end parsed from the first two body lines of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatePair {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// A naive timestamp paired with the named time zone it is read in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDateTime {
    pub date_time: NaiveDateTime,
    pub time_zone: String,
}

impl EventDateTime {
    pub fn new(date_time: NaiveDateTime, time_zone: impl Into<String>) -> Self {
        Self { date_time, time_zone: time_zone.into() }
    }

    /// Timestamp in the fixed event time zone.
    pub fn eastern(date_time: NaiveDateTime) -> Self {
        Self::new(date_time, EVENT_TIME_ZONE)
    }
}

/// Structured calendar entry created from (or listed in) a mailbox calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Remote identifier; `None` until the event exists remotely.
    pub id: Option<String>,
    pub subject: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
    /// Body reused as HTML content, unmodified.
    pub body_html: String,
}

/// Date window used when listing calendar events.
///
/// Matches events whose start is after `after` 00:00 and whose end is before
/// `before` 00:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRangeFilter {
    pub after: NaiveDate,
    pub before: NaiveDate,
}

impl DateRangeFilter {
    /// Window spanning `days_back` days before and `days_ahead` days after
    /// the date of `now`.
    pub fn around(now: NaiveDateTime, days_back: i64, days_ahead: i64) -> Self {
        let today = now.date();
        Self {
            after: today - Duration::days(days_back),
            before: today + Duration::days(days_ahead),
        }
    }

    /// Render as an OData `$filter` expression.
    pub fn to_odata_filter(&self) -> String {
        format!(
            "start/dateTime gt '{}T00:00' and end/dateTime lt '{}T00:00'",
            self.after.format("%Y-%m-%d"),
            self.before.format("%Y-%m-%d")
        )
    }
}
