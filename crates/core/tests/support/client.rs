use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mailcal_core::MailAndCalendarClient;
use mailcal_domain::{
    CalendarEvent, DateRangeFilter, InboundMessage, MailCalError, MailboxAddress,
    Result as DomainResult, SyntheticEmail,
};

/// One recorded port call, in the order it was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    SendMail { to: String, from: String, subject: String },
    ListInbox { mailbox: String },
    DeleteMessage { mailbox: String, message_id: String },
    CreateEvent { mailbox: String, subject: String },
    DeleteEvent { mailbox: String, event_id: String },
    ListCalendar { mailbox: String, filter: String },
}

impl Call {
    pub fn mailbox(&self) -> &str {
        match self {
            Self::SendMail { to, .. } => to,
            Self::ListInbox { mailbox }
            | Self::DeleteMessage { mailbox, .. }
            | Self::CreateEvent { mailbox, .. }
            | Self::DeleteEvent { mailbox, .. }
            | Self::ListCalendar { mailbox, .. } => mailbox,
        }
    }
}

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    inboxes: Vec<(String, Vec<InboundMessage>)>,
    events: Vec<(String, CalendarEvent)>,
    created: Vec<CalendarEvent>,
    fail_list_inbox: HashSet<String>,
    fail_create: bool,
    fail_delete: bool,
    fail_send_at: HashSet<usize>,
    sends: usize,
}

/// In-memory `MailAndCalendarClient` that records every call.
///
/// Inboxes and calendar listings are seeded per mailbox; individual
/// operations can be told to fail.
#[derive(Default, Clone)]
pub struct RecordingClient {
    state: Arc<Mutex<State>>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inbox(self, mailbox: &str, messages: Vec<InboundMessage>) -> Self {
        self.state.lock().unwrap().inboxes.push((mailbox.to_string(), messages));
        self
    }

    pub fn with_event(self, mailbox: &str, event: CalendarEvent) -> Self {
        self.state.lock().unwrap().events.push((mailbox.to_string(), event));
        self
    }

    pub fn failing_list_inbox(self, mailbox: &str) -> Self {
        self.state.lock().unwrap().fail_list_inbox.insert(mailbox.to_string());
        self
    }

    pub fn failing_create(self) -> Self {
        self.state.lock().unwrap().fail_create = true;
        self
    }

    pub fn failing_delete(self) -> Self {
        self.state.lock().unwrap().fail_delete = true;
        self
    }

    /// Fail the n-th send (zero based, counted across all mailboxes).
    pub fn failing_send_at(self, index: usize) -> Self {
        self.state.lock().unwrap().fail_send_at.insert(index);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn created_events(&self) -> Vec<CalendarEvent> {
        self.state.lock().unwrap().created.clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|call| matches(call)).count()
    }

    pub fn deleted_ids(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::DeleteMessage { message_id, .. } => Some(message_id),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl MailAndCalendarClient for RecordingClient {
    async fn send_mail(&self, message: &SyntheticEmail, from: &MailboxAddress) -> DomainResult<()> {
        self.record(Call::SendMail {
            to: message.to.to_string(),
            from: from.to_string(),
            subject: message.subject.clone(),
        });

        let mut state = self.state.lock().unwrap();
        let index = state.sends;
        state.sends += 1;
        if state.fail_send_at.contains(&index) {
            return Err(MailCalError::Network("send rejected".into()));
        }
        Ok(())
    }

    async fn list_inbox_messages(
        &self,
        mailbox: &MailboxAddress,
    ) -> DomainResult<Vec<InboundMessage>> {
        self.record(Call::ListInbox { mailbox: mailbox.to_string() });

        let state = self.state.lock().unwrap();
        if state.fail_list_inbox.contains(mailbox.as_str()) {
            return Err(MailCalError::Auth("token expired".into()));
        }
        Ok(state
            .inboxes
            .iter()
            .filter(|(owner, _)| owner == mailbox.as_str())
            .flat_map(|(_, messages)| messages.clone())
            .collect())
    }

    async fn delete_message(&self, message_id: &str, mailbox: &MailboxAddress) -> DomainResult<()> {
        self.record(Call::DeleteMessage {
            mailbox: mailbox.to_string(),
            message_id: message_id.to_string(),
        });

        if self.state.lock().unwrap().fail_delete {
            return Err(MailCalError::NotFound(format!("message {message_id}")));
        }
        Ok(())
    }

    async fn create_calendar_event(
        &self,
        event: &CalendarEvent,
        mailbox: &MailboxAddress,
    ) -> DomainResult<()> {
        self.record(Call::CreateEvent {
            mailbox: mailbox.to_string(),
            subject: event.subject.clone(),
        });

        let mut state = self.state.lock().unwrap();
        if state.fail_create {
            return Err(MailCalError::Network("calendar unavailable".into()));
        }
        state.created.push(event.clone());
        Ok(())
    }

    async fn delete_calendar_event(
        &self,
        event_id: &str,
        mailbox: &MailboxAddress,
    ) -> DomainResult<()> {
        self.record(Call::DeleteEvent {
            mailbox: mailbox.to_string(),
            event_id: event_id.to_string(),
        });
        Ok(())
    }

    async fn list_calendar_events(
        &self,
        mailbox: &MailboxAddress,
        range: &DateRangeFilter,
    ) -> DomainResult<Vec<CalendarEvent>> {
        self.record(Call::ListCalendar {
            mailbox: mailbox.to_string(),
            filter: range.to_odata_filter(),
        });

        Ok(self
            .state
            .lock()
            .unwrap()
            .events
            .iter()
            .filter(|(owner, _)| owner == mailbox.as_str())
            .map(|(_, event)| event.clone())
            .collect())
    }
}
