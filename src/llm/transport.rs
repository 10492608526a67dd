use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::RETRY_AFTER;
use std::time::Duration;

/// Status and raw body of one HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
    /// Server-requested wait from a `Retry-After: <seconds>` header.
    pub retry_after: Option<Duration>,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        HttpReply {
            status,
            body: body.into(),
            retry_after: None,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Rate limits and server-side failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        self.status == 429 || (500..600).contains(&self.status)
    }

    pub fn is_auth_failure(&self) -> bool {
        self.status == 401 || self.status == 403
    }
}

/// Sends one JSON POST. `Err` means no HTTP reply was received at all.
///
/// `deadline` is the most this attempt may take; implementations must give
/// up with an error once it passes.
pub trait Transport {
    fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &serde_json::Value,
        deadline: Duration,
    ) -> Result<HttpReply>;
}

/// Blocking reqwest transport with a per-request timeout.
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(HttpTransport { client, timeout })
    }
}

impl Transport for HttpTransport {
    fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &serde_json::Value,
        deadline: Duration,
    ) -> Result<HttpReply> {
        log::trace!("POST {url}: {body}");

        let resp = self
            .client
            .post(url)
            .timeout(self.timeout.min(deadline))
            .bearer_auth(api_key)
            .json(body)
            .send()
            .with_context(|| format!("failed to send request to {url}"))?;

        let status = resp.status().as_u16();
        let retry_after = resp
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_retry_after);
        let body = resp.text().context("failed to read response body")?;
        log::trace!("HTTP {status} from {url}: {body}");

        Ok(HttpReply {
            status,
            body,
            retry_after,
        })
    }
}

/// Only the delay-seconds form; HTTP dates are ignored.
fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}
