//! Microsoft Graph wire types
//!
//! Only the fields the job reads or writes are modelled.

use chrono::{DateTime, NaiveDateTime, Utc};
use mailcal_domain::{CalendarEvent, EventDateTime, InboundMessage, SyntheticEmail};
use serde::{Deserialize, Serialize};

/// Format Graph uses for `dateTimeTimeZone.dateTime` on the way in.
const GRAPH_DATE_TIME_OUT: &str = "%Y-%m-%dT%H:%M:%S";
/// Graph answers with up to seven fractional digits.
const GRAPH_DATE_TIME_IN: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// One page of a collection response.
#[derive(Debug, Deserialize)]
pub(crate) struct Page<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ItemBody {
    pub content_type: String,
    #[serde(default)]
    pub content: String,
}

impl ItemBody {
    fn text(content: &str) -> Self {
        Self { content_type: "Text".into(), content: content.to_string() }
    }

    fn html(content: &str) -> Self {
        Self { content_type: "HTML".into(), content: content.to_string() }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmailAddress {
    address: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Recipient {
    email_address: EmailAddress,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OutgoingMessage {
    subject: String,
    body: ItemBody,
    from: Recipient,
    to_recipients: Vec<Recipient>,
}

/// Body of `POST /users/{id}/sendMail`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SendMailRequest {
    message: OutgoingMessage,
    save_to_sent_items: bool,
}

impl From<&SyntheticEmail> for SendMailRequest {
    fn from(email: &SyntheticEmail) -> Self {
        Self {
            message: OutgoingMessage {
                subject: email.subject.clone(),
                body: ItemBody::text(&email.body),
                from: Recipient { email_address: EmailAddress { address: email.from.to_string() } },
                to_recipients: vec![Recipient {
                    email_address: EmailAddress { address: email.to.to_string() },
                }],
            },
            save_to_sent_items: true,
        }
    }
}

/// Inbox message as listed by Graph.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GraphMessage {
    pub id: String,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body: Option<ItemBody>,
    #[serde(default)]
    pub sent_date_time: Option<DateTime<Utc>>,
}

impl From<GraphMessage> for InboundMessage {
    fn from(message: GraphMessage) -> Self {
        let body = message.body.map(|body| body.content).unwrap_or_default();
        let inbound = InboundMessage::new(message.id, message.subject.unwrap_or_default(), body);
        match message.sent_date_time {
            Some(sent_at) => inbound.with_sent_at(sent_at),
            None => inbound,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DateTimeTimeZone {
    pub date_time: String,
    pub time_zone: String,
}

impl From<&EventDateTime> for DateTimeTimeZone {
    fn from(value: &EventDateTime) -> Self {
        Self {
            date_time: value.date_time.format(GRAPH_DATE_TIME_OUT).to_string(),
            time_zone: value.time_zone.clone(),
        }
    }
}

impl DateTimeTimeZone {
    fn to_domain(&self) -> Option<EventDateTime> {
        let date_time = NaiveDateTime::parse_from_str(&self.date_time, GRAPH_DATE_TIME_IN).ok()?;
        Some(EventDateTime::new(date_time, self.time_zone.clone()))
    }
}

/// Calendar event in both directions.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GraphEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<ItemBody>,
    pub start: DateTimeTimeZone,
    pub end: DateTimeTimeZone,
}

impl From<&CalendarEvent> for GraphEvent {
    fn from(event: &CalendarEvent) -> Self {
        Self {
            id: None,
            subject: Some(event.subject.clone()),
            body: Some(ItemBody::html(&event.body_html)),
            start: (&event.start).into(),
            end: (&event.end).into(),
        }
    }
}

impl GraphEvent {
    /// Convert to the domain event; `None` when a timestamp is unreadable.
    pub fn into_domain(self) -> Option<CalendarEvent> {
        Some(CalendarEvent {
            start: self.start.to_domain()?,
            end: self.end.to_domain()?,
            id: self.id,
            subject: self.subject.unwrap_or_default(),
            body_html: self.body.map(|body| body.content).unwrap_or_default(),
        })
    }
}

/// Token endpoint answer for the client-credentials grant.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    3599
}
