//! Date line parser.
//!
//! Appointment mails carry their start and end as the first two body lines,
//! each in the exact form `YYYYMMDD HH:MM`:
//!
//! ```text
//! 20180902 09:00
//! 20180902 15:00
//! ```
//!
//! Every `T` is stripped before parsing, so `20180902 T09:00` and
//! `20180902T09:00` are read the same as the canonical form. Nothing else is
//! tolerated: single digit hours, seconds, dashes or offsets are rejected.
//! Timestamps come back naive; callers attach the fixed event time zone.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::constants::{DATE_LINE_FORMAT, DATE_LINE_LEN, DATE_LINE_SEPARATOR};
use crate::errors::MailCalError;
use crate::types::DatePair;

const DATE_PART_LEN: usize = 8;
const COLON_INDEX: usize = 11;

/// A body line that is not a `YYYYMMDD HH:MM` timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{input}' is not a YYYYMMDD HH:MM date line")]
pub struct DateParseError {
    /// The offending line, as received.
    pub input: String,
}

impl DateParseError {
    pub fn new(input: impl Into<String>) -> Self {
        Self { input: input.into() }
    }
}

impl From<DateParseError> for MailCalError {
    fn from(err: DateParseError) -> Self {
        MailCalError::DateParse(err.input)
    }
}

/// Parse one date line into a naive timestamp.
///
/// # Errors
/// Returns [`DateParseError`] carrying `line` when it does not match the
/// pattern or names an impossible date/time (e.g. `20180231 10:00`).
///
/// # Examples
///
/// ```
/// use mailcal_domain::parse_date_line;
///
/// let start = parse_date_line("20180902 09:00").unwrap();
/// assert_eq!(start.to_string(), "2018-09-02 09:00:00");
/// assert_eq!(parse_date_line("20180902T09:00").unwrap(), start);
/// assert!(parse_date_line("2018-09-02 09:00").is_err());
/// ```
pub fn parse_date_line(line: &str) -> Result<NaiveDateTime, DateParseError> {
    let mut cleaned: String = line.chars().filter(|c| *c != DATE_LINE_SEPARATOR).collect();

    // A bare `T` separator leaves no space behind; restore it.
    if cleaned.len() == DATE_LINE_LEN - 1 && cleaned.is_char_boundary(DATE_PART_LEN) {
        cleaned.insert(DATE_PART_LEN, ' ');
    }

    if !has_date_line_shape(&cleaned) {
        return Err(DateParseError::new(line));
    }

    NaiveDateTime::parse_from_str(&cleaned, DATE_LINE_FORMAT)
        .map_err(|_| DateParseError::new(line))
}

/// Parse the start and end lines of a message body.
///
/// # Errors
/// Returns the first [`DateParseError`] encountered; the start line is
/// checked before the end line.
pub fn parse_date_pair(start_line: &str, end_line: &str) -> Result<DatePair, DateParseError> {
    let start = parse_date_line(start_line)?;
    let end = parse_date_line(end_line)?;
    Ok(DatePair { start, end })
}

/// Format a timestamp as a date line.
///
/// Seconds are dropped, so the output always reads back through
/// [`parse_date_line`].
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use mailcal_domain::format_date_line;
///
/// let at = NaiveDate::from_ymd_opt(2018, 9, 2).unwrap().and_hms_opt(9, 0, 30).unwrap();
/// assert_eq!(format_date_line(&at), "20180902 09:00");
/// ```
#[must_use]
pub fn format_date_line(timestamp: &NaiveDateTime) -> String {
    timestamp.format(DATE_LINE_FORMAT).to_string()
}

fn has_date_line_shape(candidate: &str) -> bool {
    let bytes = candidate.as_bytes();
    bytes.len() == DATE_LINE_LEN
        && bytes.iter().enumerate().all(|(index, byte)| match index {
            DATE_PART_LEN => *byte == b' ',
            COLON_INDEX => *byte == b':',
            _ => byte.is_ascii_digit(),
        })
}
