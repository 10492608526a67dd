pub mod client;
pub mod cohere;
pub mod openai;
pub mod prompt_builder;
pub mod prompts;
pub mod transport;

use anyhow::Result;
use clap::ValueEnum;
use serde::Deserialize;

use crate::context::ContextDocument;
use crate::error::{AdvisorError, AdvisorResult};

pub use client::{AdvisoryClient, RetryPolicy};
pub use transport::{HttpTransport, Transport};

/// Which hosted chat API we talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Cohere chat API (`/v1/chat`)
    #[default]
    Cohere,
    /// Any OpenAI-compatible chat completions API
    Openai,
}

impl Provider {
    pub fn label(&self) -> &'static str {
        match self {
            Provider::Cohere => "Cohere",
            Provider::Openai => "OpenAI",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Cohere => "command-r",
            Provider::Openai => "gpt-4o-mini",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::Cohere => "https://api.cohere.ai",
            Provider::Openai => "https://api.openai.com",
        }
    }

    /// Environment variable holding the API key for this provider.
    pub fn credential_var(&self) -> &'static str {
        match self {
            Provider::Cohere => "COHERE_API_KEY",
            Provider::Openai => "OPENAI_API_KEY",
        }
    }

    pub fn chat_url(&self, base_url: &str) -> String {
        match self {
            Provider::Cohere => cohere::chat_url(base_url),
            Provider::Openai => openai::chat_url(base_url),
        }
    }

    pub fn encode_request(&self, model: &str, request: &AdvisoryRequest) -> Result<serde_json::Value> {
        match self {
            Provider::Cohere => cohere::encode_request(model, request),
            Provider::Openai => openai::encode_request(model, request),
        }
    }

    pub fn decode_response(&self, body: &str) -> Result<String> {
        match self {
            Provider::Cohere => cohere::decode_response(body),
            Provider::Openai => openai::decode_response(body),
        }
    }
}

/// Generation knobs passed through to the provider when set.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AdviceOptions {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

/// One request to the advisory service. The prompt is never empty.
#[derive(Debug, Clone)]
pub struct AdvisoryRequest {
    prompt: String,
    preamble: Option<String>,
    documents: Vec<ContextDocument>,
    options: AdviceOptions,
}

impl AdvisoryRequest {
    pub fn new(
        prompt: impl Into<String>,
        documents: Vec<ContextDocument>,
        options: AdviceOptions,
    ) -> AdvisorResult<Self> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(AdvisorError::Format("advisory prompt must not be empty".into()));
        }

        Ok(AdvisoryRequest {
            prompt,
            preamble: None,
            documents,
            options,
        })
    }

    pub fn with_preamble(mut self, preamble: impl Into<String>) -> Self {
        self.preamble = Some(preamble.into());
        self
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn preamble(&self) -> Option<&str> {
        self.preamble.as_deref()
    }

    pub fn documents(&self) -> &[ContextDocument] {
        &self.documents
    }

    pub fn options(&self) -> AdviceOptions {
        self.options
    }
}

/// Join a base URL and an API path, tolerating a trailing `/v1` on the base.
fn join_api_path(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if base.ends_with("/v1") {
        format!("{base}/{path}")
    } else {
        format!("{base}/v1/{path}")
    }
}

/// Truncate long strings for debug logging.
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }

    let mut cut = max_len;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...\n[truncated {} chars]", &s[..cut], s.len() - cut)
}
