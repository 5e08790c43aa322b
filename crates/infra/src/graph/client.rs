//! Graph implementation of [`MailAndCalendarClient`]
//!
//! Every call is scoped to a mailbox through `/users/{mailbox}`. Collection
//! reads follow `@odata.nextLink` until exhausted, so callers always see the
//! complete inbox or calendar window.

use std::sync::Arc;

use async_trait::async_trait;
use mailcal_core::MailAndCalendarClient;
use mailcal_domain::{
    CalendarEvent, DateRangeFilter, InboundMessage, JobConfig, MailCalError, MailboxAddress,
    Result, SyntheticEmail,
};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::auth::{ClientCredentialsTokenProvider, TokenProvider};
use super::types::{GraphEvent, GraphMessage, Page, SendMailRequest};
use crate::errors::InfraError;
use crate::http::HttpClient;

const PREFER_TEXT_BODY: &str = r#"outlook.body-content-type="text""#;
const INBOX_PAGE_SIZE: &str = "50";
const INBOX_SELECT: &str = "id,subject,body,sentDateTime";
const EVENT_SELECT: &str = "id,subject,body,start,end";

/// Mail and calendar client backed by Microsoft Graph.
#[derive(Clone)]
pub struct GraphMailClient {
    http: HttpClient,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl GraphMailClient {
    pub fn new(http: HttpClient, base_url: impl Into<String>, tokens: Arc<dyn TokenProvider>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url, tokens }
    }

    /// Build a client authenticating with the configured app registration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: &JobConfig) -> Result<Self> {
        let http = HttpClient::new()?;
        let tokens = ClientCredentialsTokenProvider::new(
            http.clone(),
            &config.authority_url,
            config.credentials.clone(),
        );
        Ok(Self::new(http, config.graph_base_url.clone(), Arc::new(tokens)))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn user_url(&self, mailbox: &MailboxAddress, path: &str) -> String {
        format!("{}/users/{}/{}", self.base_url, mailbox, path)
    }

    async fn authorized(&self, method: Method, url: &str) -> Result<RequestBuilder> {
        let token = self.tokens.access_token().await?;
        Ok(self.http.request(method, url).bearer_auth(token))
    }

    /// Send and turn any non-success status into a domain error.
    async fn execute(&self, builder: RequestBuilder) -> Result<Response> {
        let response = self.http.send(builder).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = response.text().await.unwrap_or_default();
        Err(InfraError::from_status(status, detail.trim()).into())
    }

    /// Fetch every page of a collection starting at `url`.
    async fn collect_pages<T: DeserializeOwned>(
        &self,
        url: String,
        query: &[(&str, &str)],
        prefer: Option<&str>,
    ) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut next = Some(url);
        let mut first = true;

        while let Some(url) = next.take() {
            let mut request = self.authorized(Method::GET, &url).await?;
            if first {
                // nextLink already carries the query
                request = request.query(query);
                first = false;
            }
            if let Some(prefer) = prefer {
                request = request.header("Prefer", prefer);
            }

            let page: Page<T> = self
                .execute(request)
                .await?
                .json()
                .await
                .map_err(|err| MailCalError::from(InfraError::from(err)))?;

            debug!(items = page.value.len(), more = page.next_link.is_some(), "fetched Graph page");
            items.extend(page.value);
            next = page.next_link;
        }

        Ok(items)
    }
}

#[async_trait]
impl MailAndCalendarClient for GraphMailClient {
    #[instrument(skip(self, message), fields(to = %message.to, subject = %message.subject))]
    async fn send_mail(&self, message: &SyntheticEmail, from: &MailboxAddress) -> Result<()> {
        let url = self.user_url(from, "sendMail");
        let request = self.authorized(Method::POST, &url).await?.json(&SendMailRequest::from(message));
        self.execute(request).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_inbox_messages(&self, mailbox: &MailboxAddress) -> Result<Vec<InboundMessage>> {
        let url = self.user_url(mailbox, "mailFolders/inbox/messages");
        let query = [("$select", INBOX_SELECT), ("$top", INBOX_PAGE_SIZE)];

        let messages: Vec<GraphMessage> =
            self.collect_pages(url, &query, Some(PREFER_TEXT_BODY)).await?;
        Ok(messages.into_iter().map(InboundMessage::from).collect())
    }

    #[instrument(skip(self))]
    async fn delete_message(&self, message_id: &str, mailbox: &MailboxAddress) -> Result<()> {
        let url = self.user_url(mailbox, &format!("messages/{}", urlencoding::encode(message_id)));
        self.execute(self.authorized(Method::DELETE, &url).await?).await?;
        Ok(())
    }

    #[instrument(skip(self, event), fields(subject = %event.subject))]
    async fn create_calendar_event(
        &self,
        event: &CalendarEvent,
        mailbox: &MailboxAddress,
    ) -> Result<()> {
        let url = self.user_url(mailbox, "calendar/events");
        let request = self.authorized(Method::POST, &url).await?.json(&GraphEvent::from(event));
        self.execute(request).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_calendar_event(&self, event_id: &str, mailbox: &MailboxAddress) -> Result<()> {
        let url =
            self.user_url(mailbox, &format!("calendar/events/{}", urlencoding::encode(event_id)));
        self.execute(self.authorized(Method::DELETE, &url).await?).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_calendar_events(
        &self,
        mailbox: &MailboxAddress,
        range: &DateRangeFilter,
    ) -> Result<Vec<CalendarEvent>> {
        let url = self.user_url(mailbox, "calendar/events");
        let filter = range.to_odata_filter();
        let query = [("$filter", filter.as_str()), ("$select", EVENT_SELECT)];

        let events: Vec<GraphEvent> = self.collect_pages(url, &query, None).await?;
        Ok(events
            .into_iter()
            .filter_map(|event| {
                let id = event.id.clone();
                let converted = event.into_domain();
                if converted.is_none() {
                    warn!(event_id = ?id, "skipping calendar event with unreadable timestamps");
                }
                converted
            })
            .collect())
    }
}
