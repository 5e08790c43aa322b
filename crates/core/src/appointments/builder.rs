//! Appointment builder
//!
//! Reads the start and end lines out of a message body and combines them with
//! the subject and the untouched body into a [`CalendarEvent`]. Pure
//! transform: submitting the event and removing the source message are the
//! caller's job.

use mailcal_domain::constants::EVENT_TIME_ZONE;
use mailcal_domain::{
    parse_date_pair, CalendarEvent, DatePair, DateParseError, EventDateTime, InboundMessage,
};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Why no event could be built from a message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppointmentError {
    #[error("body has {found} line(s); start and end lines are required")]
    TooFewLines { found: usize },

    #[error(transparent)]
    InvalidDate(#[from] DateParseError),
}

/// Builds calendar events from appointment mails.
#[derive(Debug, Clone)]
pub struct AppointmentBuilder {
    time_zone: String,
}

impl Default for AppointmentBuilder {
    fn default() -> Self {
        Self { time_zone: EVENT_TIME_ZONE.to_string() }
    }
}

impl AppointmentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time zone name attached to both ends of every built event.
    pub fn time_zone(&self) -> &str {
        &self.time_zone
    }

    /// Build an event, logging why when none can be built.
    ///
    /// A date parse failure is logged with the offending line; a body with
    /// fewer than two lines is dropped quietly (debug level only).
    pub fn build(&self, message: &InboundMessage) -> Option<CalendarEvent> {
        match self.try_build(message) {
            Ok(event) => {
                info!(
                    start = %event.start.date_time,
                    end = %event.end.date_time,
                    subject = %event.subject,
                    "AddAppointment"
                );
                Some(event)
            }
            Err(AppointmentError::TooFewLines { found }) => {
                debug!(message_id = %message.id, lines = found, "body too short for an appointment");
                None
            }
            Err(AppointmentError::InvalidDate(err)) => {
                warn!(
                    message_id = %message.id,
                    input = %err.input,
                    error = %err,
                    "Error AddAppointment: date line did not parse"
                );
                None
            }
        }
    }

    /// Build an event or report why it could not be built.
    ///
    /// # Errors
    /// [`AppointmentError::TooFewLines`] when the body has fewer than two
    /// lines, [`AppointmentError::InvalidDate`] when either of the first two
    /// lines is not a date line.
    pub fn try_build(&self, message: &InboundMessage) -> Result<CalendarEvent, AppointmentError> {
        let dates = extract_dates(&message.body)?;

        Ok(CalendarEvent {
            id: None,
            subject: message.subject.clone(),
            start: EventDateTime::new(dates.start, self.time_zone.clone()),
            end: EventDateTime::new(dates.end, self.time_zone.clone()),
            body_html: message.body.clone(),
        })
    }
}

/// Normalise the body (drop line feeds, split on carriage returns) and parse
/// its first two lines.
fn extract_dates(body: &str) -> Result<DatePair, AppointmentError> {
    let normalised = body.replace('\n', "");
    let lines: Vec<&str> = normalised.split('\r').collect();

    if lines.len() < 2 {
        return Err(AppointmentError::TooFewLines { found: lines.len() });
    }

    Ok(parse_date_pair(lines[0].trim(), lines[1].trim())?)
}
