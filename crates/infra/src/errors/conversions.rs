//! Conversions from external infrastructure errors into domain errors.

use mailcal_domain::MailCalError;
use reqwest::Error as HttpError;
use reqwest::StatusCode;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub MailCalError);

impl From<InfraError> for MailCalError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<MailCalError> for InfraError {
    fn from(value: MailCalError) -> Self {
        InfraError(value)
    }
}

impl InfraError {
    /// Map a non-success HTTP status (plus response text) to a domain error.
    pub fn from_status(status: StatusCode, detail: &str) -> Self {
        let mut message =
            format!("HTTP {} {}", status.as_u16(), status.canonical_reason().unwrap_or("unknown status"));
        if !detail.is_empty() {
            message.push_str(": ");
            message.push_str(detail);
        }
        InfraError(map_status(status.as_u16(), message))
    }
}

fn map_status(code: u16, message: String) -> MailCalError {
    match code {
        401 | 403 => MailCalError::Auth(message),
        404 => MailCalError::NotFound(message),
        429 => MailCalError::Network(message),
        400..=499 => MailCalError::InvalidInput(message),
        _ => MailCalError::Network(message),
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoMailCalError {
    fn into_mailcal(self) -> MailCalError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → MailCalError */
/* -------------------------------------------------------------------------- */

impl IntoMailCalError for HttpError {
    fn into_mailcal(self) -> MailCalError {
        if self.is_timeout() {
            return MailCalError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return MailCalError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));
            return map_status(code, message);
        }

        if self.is_decode() {
            return MailCalError::InvalidInput(format!("unexpected response body: {self}"));
        }

        MailCalError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_mailcal())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use reqwest::Client;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn status_error(status: u16) -> HttpError {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err()
    }

    #[tokio::test]
    async fn http_status_401_maps_to_auth_error() {
        let mapped: MailCalError = InfraError::from(status_error(401).await).into();
        match mapped {
            MailCalError::Auth(msg) => assert!(msg.contains("401")),
            other => panic!("expected auth error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn http_status_404_maps_to_not_found() {
        let mapped: MailCalError = InfraError::from(status_error(404).await).into();
        assert!(matches!(mapped, MailCalError::NotFound(_)));
    }

    #[tokio::test]
    async fn http_status_503_maps_to_network() {
        let mapped: MailCalError = InfraError::from(status_error(503).await).into();
        assert!(mapped.is_remote());
        assert!(matches!(mapped, MailCalError::Network(_)));
    }

    #[test]
    fn status_mapping_keeps_detail() {
        let InfraError(err) = InfraError::from_status(StatusCode::BAD_REQUEST, "ErrorInvalidIdMalformed");
        match err {
            MailCalError::InvalidInput(msg) => {
                assert!(msg.starts_with("HTTP 400"));
                assert!(msg.ends_with("ErrorInvalidIdMalformed"));
            }
            other => panic!("expected invalid input, got {:?}", other),
        }
    }

    #[test]
    fn too_many_requests_is_a_network_error() {
        let InfraError(err) = InfraError::from_status(StatusCode::TOO_MANY_REQUESTS, "");
        assert_eq!(err, MailCalError::Network("HTTP 429 Too Many Requests".into()));
    }
}
