use anyhow::{anyhow, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::thread;
use std::time::{Duration, Instant};

use super::transport::{HttpReply, Transport};
use super::{truncate, AdvisoryRequest, Provider};
use crate::error::{AdvisorError, AdvisorResult};

/// Bounded retry with exponential backoff around the single chat call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff: Duration,
    /// Ceiling on time spent across all attempts and sleeps.
    pub max_elapsed: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: 2,
            initial_backoff: Duration::from_millis(500),
            max_elapsed: Duration::from_secs(20),
        }
    }
}

/// One configured client, built once per process after the credential check.
pub struct AdvisoryClient {
    transport: Box<dyn Transport>,
    provider: Provider,
    api_key: String,
    model: String,
    api_base_url: String,
    retry: RetryPolicy,
    progress: bool,
}

impl AdvisoryClient {
    pub fn new(
        transport: Box<dyn Transport>,
        provider: Provider,
        api_key: String,
        model: String,
        api_base_url: String,
        retry: RetryPolicy,
    ) -> Self {
        AdvisoryClient {
            transport,
            provider,
            api_key,
            model,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            retry,
            progress: false,
        }
    }

    /// Show a spinner on stderr while waiting for the reply.
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Ask the model and return its trimmed, non-empty reply.
    pub fn request_advice(&self, request: &AdvisoryRequest) -> AdvisorResult<String> {
        let body = self
            .provider
            .encode_request(&self.model, request)
            .map_err(AdvisorError::advisory)?;
        let url = self.provider.chat_url(&self.api_base_url);

        log::info!("Calling {} model {:?}", self.provider.label(), self.model);
        log::debug!("Advisory prompt:\n{}", truncate(request.prompt(), 3000));

        let spinner = self.spinner();
        let reply = self.send_with_retry(&url, &body);
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
        let reply = reply.map_err(AdvisorError::advisory)?;

        let text = self
            .provider
            .decode_response(&reply.body)
            .map_err(AdvisorError::advisory)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(AdvisorError::Advisory(format!(
                "{} returned an empty reply",
                self.provider.label()
            )));
        }

        log::debug!("Advisory reply:\n{}", truncate(text, 2000));
        Ok(text.to_string())
    }

    fn send_with_retry(&self, url: &str, body: &serde_json::Value) -> Result<HttpReply> {
        let started = Instant::now();
        let mut backoff = self.retry.initial_backoff;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let remaining = self.retry.max_elapsed.saturating_sub(started.elapsed());

            let outcome = self.transport.post_json(url, &self.api_key, body, remaining);
            let (err, wait) = match outcome {
                Ok(reply) if reply.is_success() => return Ok(reply),
                Ok(reply) => {
                    let err = self.status_error(&reply);
                    if !reply.is_retryable() {
                        return Err(err);
                    }
                    // A server-requested wait only ever lengthens the backoff.
                    let wait = reply.retry_after.map_or(backoff, |after| after.max(backoff));
                    (err, wait)
                }
                Err(e) => (e, backoff),
            };

            if attempt > self.retry.max_retries {
                return Err(err.context(format!("giving up after {attempt} attempt(s)")));
            }
            if started.elapsed() + wait >= self.retry.max_elapsed {
                return Err(err.context(format!(
                    "retry budget of {:?} exhausted after {attempt} attempt(s)",
                    self.retry.max_elapsed
                )));
            }

            log::warn!(
                "{err:#}; retrying in {}ms (attempt {}/{})",
                wait.as_millis(),
                attempt + 1,
                self.retry.max_retries + 1
            );
            thread::sleep(wait);
            backoff = backoff.saturating_mul(2);
        }
    }

    fn status_error(&self, reply: &HttpReply) -> anyhow::Error {
        let label = self.provider.label();
        let detail = truncate(reply.body.trim(), 500);
        if reply.is_auth_failure() {
            anyhow!(
                "{label} rejected the API key: HTTP {} - {detail}",
                reply.status
            )
        } else {
            anyhow!("{label} API error: HTTP {} - {detail}", reply.status)
        }
    }

    fn spinner(&self) -> Option<ProgressBar> {
        if !self.progress {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("Asking {}...", self.model));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }
}
