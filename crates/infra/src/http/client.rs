use std::time::Duration;

use mailcal_domain::MailCalError;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response, StatusCode};
use tracing::{debug, warn};

use crate::errors::InfraError;

/// Upper bound for a server supplied `Retry-After` delay.
const MAX_RETRY_AFTER: Duration = Duration::from_secs(60);

/// HTTP client with built-in retry and timeout support.
///
/// Connect failures, timeouts, 5xx and 429 responses are retried with
/// exponential backoff. A 429 carrying `Retry-After: <seconds>` waits for
/// that long instead. Once attempts run out the last response is returned
/// as-is; status handling is the caller's job.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    max_attempts: usize,
    base_backoff: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Convenience constructor with default configuration.
    pub fn new() -> Result<Self, MailCalError> {
        Self::builder().build()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder with retry semantics.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, MailCalError> {
        let attempts = self.max_attempts.max(1);

        for attempt in 1..=attempts {
            let request = builder
                .try_clone()
                .ok_or_else(|| {
                    MailCalError::Internal(
                        "request body cannot be cloned; buffer the body to enable retries".into(),
                    )
                })?
                .build()
                .map_err(|err| MailCalError::from(InfraError::from(err)))?;

            let method = request.method().clone();
            let url = request.url().clone();
            let last_attempt = attempt == attempts;
            debug!(attempt, %method, path = url.path(), "sending HTTP request");

            match self.client.execute(request).await {
                Ok(response) => {
                    let status = response.status();
                    debug!(attempt, %method, path = url.path(), %status, "received HTTP response");

                    if !last_attempt && is_retryable_status(status) {
                        let delay = retry_after(&response)
                            .unwrap_or_else(|| self.backoff_delay(attempt));
                        warn!(attempt, %status, delay_ms = delay.as_millis() as u64, "retrying HTTP request");
                        sleep(delay).await;
                        continue;
                    }

                    return Ok(response);
                }
                Err(err) => {
                    debug!(attempt, %method, path = url.path(), error = %err, "HTTP request failed");

                    if !last_attempt && should_retry_error(&err) {
                        sleep(self.backoff_delay(attempt)).await;
                        continue;
                    }

                    return Err(InfraError::from(err).into());
                }
            }
        }

        Err(MailCalError::Internal("http client exhausted retries without producing a result".into()))
    }

    fn backoff_delay(&self, retry_number: usize) -> Duration {
        let shift = retry_number.saturating_sub(1).min(8) as u32;
        self.base_backoff.saturating_mul(1u32 << shift)
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_attempts: usize,
    base_backoff: Duration,
    user_agent: Option<String>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_attempts: 3,
            base_backoff: Duration::from_millis(200),
            user_agent: Some(concat!("mailcal/", env!("CARGO_PKG_VERSION")).to_string()),
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configure the total number of attempts (initial try + retries).
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.base_backoff = backoff;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn build(self) -> Result<HttpClient, MailCalError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let client = builder.build().map_err(|err| MailCalError::from(InfraError::from(err)))?;

        Ok(HttpClient {
            client,
            max_attempts: self.max_attempts.max(1),
            base_backoff: self.base_backoff,
        })
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

/// Delay requested by a 429 response, when given in seconds.
fn retry_after(response: &Response) -> Option<Duration> {
    if response.status() != StatusCode::TOO_MANY_REQUESTS {
        return None;
    }
    let seconds = response.headers().get(RETRY_AFTER)?.to_str().ok()?.trim().parse::<u64>().ok()?;
    Some(Duration::from_secs(seconds).min(MAX_RETRY_AFTER))
}

fn should_retry_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}

async fn sleep(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
