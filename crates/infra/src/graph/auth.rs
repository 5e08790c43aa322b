//! Client-credentials token acquisition
//!
//! Tokens are requested from `{authority}/{tenant}/oauth2/v2.0/token` for the
//! Graph `.default` scope and cached in memory until shortly before expiry.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use mailcal_domain::{GraphCredentials, MailCalError, Result};
use reqwest::Method;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use super::types::TokenResponse;
use crate::errors::InfraError;
use crate::http::HttpClient;

/// Scope granting the app registration's configured Graph permissions.
pub const GRAPH_DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Tokens are treated as expired this long before Graph says so.
const EXPIRY_SKEW: Duration = Duration::from_secs(60);

/// Lifetime assumed when the advertised one does not fit in an `Instant`.
const FALLBACK_LIFETIME: Duration = Duration::from_secs(300);

/// Source of bearer tokens for Graph requests.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Return a valid access token, fetching a new one when needed.
    async fn access_token(&self) -> Result<String>;
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

impl CachedToken {
    fn new(value: String, issued_at: Instant, expires_in: u64) -> Self {
        let expires_at = issued_at
            .checked_add(Duration::from_secs(expires_in))
            .or_else(|| issued_at.checked_add(FALLBACK_LIFETIME))
            .unwrap_or(issued_at);
        Self { value, expires_at }
    }

    fn is_fresh(&self) -> bool {
        Instant::now()
            .checked_add(EXPIRY_SKEW)
            .is_some_and(|threshold| threshold < self.expires_at)
    }
}

/// OAuth2 client-credentials flow against the Microsoft identity platform.
pub struct ClientCredentialsTokenProvider {
    http: HttpClient,
    token_url: String,
    credentials: GraphCredentials,
    cache: Mutex<Option<CachedToken>>,
}

impl ClientCredentialsTokenProvider {
    pub fn new(http: HttpClient, authority_url: &str, credentials: GraphCredentials) -> Self {
        let token_url = format!(
            "{}/{}/oauth2/v2.0/token",
            authority_url.trim_end_matches('/'),
            urlencoding::encode(&credentials.tenant)
        );
        Self { http, token_url, credentials, cache: Mutex::new(None) }
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    async fn request_token(&self) -> Result<CachedToken> {
        let form = [
            ("client_id", self.credentials.app_id.as_str()),
            ("client_secret", self.credentials.secret.as_str()),
            ("scope", GRAPH_DEFAULT_SCOPE),
            ("grant_type", "client_credentials"),
        ];
        let response =
            self.http.send(self.http.request(Method::POST, &self.token_url).form(&form)).await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            // Any token endpoint refusal is an authentication problem.
            return Err(MailCalError::Auth(format!("token request failed ({status}): {detail}")));
        }

        let token: TokenResponse =
            response.json().await.map_err(|err| MailCalError::from(InfraError::from(err)))?;

        debug!(expires_in = token.expires_in, "acquired Graph access token");
        Ok(CachedToken::new(token.access_token, Instant::now(), token.expires_in))
    }
}

#[async_trait]
impl TokenProvider for ClientCredentialsTokenProvider {
    #[instrument(skip(self), fields(tenant = %self.credentials.tenant))]
    async fn access_token(&self) -> Result<String> {
        let mut cache = self.cache.lock().await;
        if let Some(token) = cache.as_ref().filter(|token| token.is_fresh()) {
            return Ok(token.value.clone());
        }

        let token = self.request_token().await?;
        let value = token.value.clone();
        *cache = Some(token);
        Ok(value)
    }
}

/// Fixed token, for tests and tools that obtain a token elsewhere.
pub struct StaticTokenProvider(String);

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}
