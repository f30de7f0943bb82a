//! The seam between the session and whatever answers `POST /check`.
use crate::types::{ClaimRequest, ClaimResult};
use async_trait::async_trait;
use claimcheck_common::{ClaimCheckError, Result};
use claimcheck_http::{HttpClient, HttpError, RequestOpts};
use std::time::Duration;

/// Everything a single check can end in, one variant per error class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// 2xx with a decodable body.
    Verified(ClaimResult),
    /// Non-2xx. `message` is the body's `error` field when it had one.
    Rejected {
        status: Option<u16>,
        message: Option<String>,
    },
    /// 2xx whose body did not decode as a [`ClaimResult`].
    Malformed { detail: String },
    /// No response at all: refused, reset, timed out.
    Unreachable { backend: String, detail: String },
}

#[async_trait]
pub trait ClaimBackend: Send + Sync {
    /// Issue exactly one check. Never retries.
    async fn check(&self, request: &ClaimRequest) -> CheckOutcome;

    /// Human-readable location of the backend, used in messages and the status bar.
    fn location(&self) -> String;
}

/// [`ClaimBackend`] speaking JSON over HTTP.
#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: HttpClient,
    check_path: String,
}

impl HttpBackend {
    /// ```
    /// use claimcheck_client::{ClaimBackend, HttpBackend};
    ///
    /// let backend = HttpBackend::new("http://localhost:3000", "/check").unwrap();
    /// assert_eq!(backend.location(), "http://localhost:3000/");
    /// assert!(HttpBackend::new("localhost:3000", "/check").is_err());
    ///
    /// // A path on the base URL is kept as a prefix.
    /// let prefixed = HttpBackend::new("http://gateway.example/factcheck", "/check").unwrap();
    /// assert_eq!(prefixed.location(), "http://gateway.example/factcheck/");
    /// ```
    pub fn new(base_url: &str, check_path: &str) -> Result<Self> {
        let client = HttpClient::new(base_url)
            .map_err(|e| ClaimCheckError::Config(format!("backend base_url {base_url:?}: {e}")))?;
        if client.base_url().cannot_be_a_base() {
            return Err(ClaimCheckError::Config(format!(
                "backend base_url {base_url:?} cannot be used as a base"
            )));
        }
        client
            .resolve(check_path)
            .map_err(|e| ClaimCheckError::Config(format!("backend check_path {check_path:?}: {e}")))?;
        Ok(Self {
            client,
            check_path: check_path.to_string(),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = self.client.with_timeout(timeout);
        self
    }
}

#[async_trait]
impl ClaimBackend for HttpBackend {
    async fn check(&self, request: &ClaimRequest) -> CheckOutcome {
        let sent = self
            .client
            .post_json::<_, ClaimResult>(&self.check_path, request, RequestOpts::default())
            .await;
        match sent {
            Ok(result) => CheckOutcome::Verified(result),
            Err(err) => outcome_from_error(err, self.location()),
        }
    }

    fn location(&self) -> String {
        self.client.base_url().to_string()
    }
}

fn outcome_from_error(err: HttpError, backend: String) -> CheckOutcome {
    match err {
        HttpError::Api {
            status, message, ..
        } => CheckOutcome::Rejected {
            status: Some(status.as_u16()),
            message,
        },
        HttpError::Decode(detail, _) => CheckOutcome::Malformed { detail },
        HttpError::Network(detail) | HttpError::Url(detail) | HttpError::Build(detail) => {
            CheckOutcome::Unreachable { backend, detail }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn api_errors_become_rejections() {
        let got = outcome_from_error(
            HttpError::Api {
                status: StatusCode::BAD_REQUEST,
                message: Some("Claim is required".into()),
                request_id: "-".into(),
            },
            "http://localhost:3000/".into(),
        );
        assert_eq!(
            got,
            CheckOutcome::Rejected {
                status: Some(400),
                message: Some("Claim is required".into())
            }
        );
    }

    #[test]
    fn network_errors_become_unreachable() {
        let got = outcome_from_error(
            HttpError::Network("connection refused".into()),
            "http://localhost:3000/".into(),
        );
        assert!(matches!(
            got,
            CheckOutcome::Unreachable { ref backend, .. } if backend == "http://localhost:3000/"
        ));
    }

    #[test]
    fn decode_errors_become_malformed() {
        let got = outcome_from_error(
            HttpError::Decode("missing field `explanation`".into(), "{}".into()),
            "-".into(),
        );
        assert!(matches!(got, CheckOutcome::Malformed { .. }));
    }

    #[test]
    fn rejects_unusable_base_urls() {
        assert!(HttpBackend::new("mailto:someone@example.com", "/check").is_err());
        assert!(HttpBackend::new("", "/check").is_err());
    }
}
