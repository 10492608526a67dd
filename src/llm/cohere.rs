//! Wire format for the Cohere chat API.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use super::{join_api_path, AdvisoryRequest};
use crate::context::ContextDocument;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    preamble: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    documents: Option<&'a [ContextDocument]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct ChatResponse {
    text: String,
}

pub fn chat_url(base_url: &str) -> String {
    join_api_path(base_url, "chat")
}

pub fn encode_request(model: &str, request: &AdvisoryRequest) -> Result<serde_json::Value> {
    let options = request.options();
    let body = ChatRequest {
        model,
        message: request.prompt(),
        preamble: request.preamble(),
        documents: Some(request.documents()).filter(|d| !d.is_empty()),
        max_tokens: options.max_tokens,
        temperature: options.temperature,
    };

    serde_json::to_value(&body).context("failed to encode Cohere request")
}

pub fn decode_response(body: &str) -> Result<String> {
    let resp: ChatResponse = serde_json::from_str(body)
        .map_err(|e| anyhow!("failed to parse Cohere response: {e}"))?;
    Ok(resp.text)
}
