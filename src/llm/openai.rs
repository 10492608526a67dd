use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use super::{join_api_path, AdvisoryRequest};
use crate::context::ContextDocument;

/// Minimal request/response structs for OpenAI Chat Completions API.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

pub fn chat_url(base_url: &str) -> String {
    join_api_path(base_url, "chat/completions")
}

/// Chat completions have no documents field, so they ride along in the system message.
pub fn encode_request(model: &str, request: &AdvisoryRequest) -> Result<serde_json::Value> {
    let mut system = request.preamble().unwrap_or_default().to_owned();
    let docs = render_documents(request.documents());
    if !docs.is_empty() {
        if !system.is_empty() {
            system.push_str("\n\n");
        }
        system.push_str(&docs);
    }

    let mut messages = Vec::with_capacity(2);
    if !system.is_empty() {
        messages.push(ChatMessage {
            role: "system".into(),
            content: system,
        });
    }
    messages.push(ChatMessage {
        role: "user".into(),
        content: request.prompt().to_owned(),
    });

    let options = request.options();
    let body = ChatRequest {
        model,
        messages,
        max_tokens: options.max_tokens,
        temperature: options.temperature,
    };

    serde_json::to_value(&body).context("failed to encode OpenAI request")
}

pub fn decode_response(body: &str) -> Result<String> {
    let chat_resp: ChatResponse =
        serde_json::from_str(body).context("failed to parse OpenAI response")?;

    if let Some(usage) = &chat_resp.usage {
        log::debug!(
            "Token usage: prompt={}, completion={}, total={}",
            usage.prompt_tokens,
            usage.completion_tokens,
            usage.total_tokens
        );
    }

    let choice = chat_resp
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("no choices returned from OpenAI"))?;

    // A null content is an empty reply, which the client rejects.
    Ok(choice.message.content.unwrap_or_default())
}

fn render_documents(docs: &[ContextDocument]) -> String {
    if docs.is_empty() {
        return String::new();
    }

    let mut out = String::from("Reference documents:\n");
    for doc in docs {
        out.push_str(&format!("\n## {}\n{}\n", doc.title, doc.snippet));
    }
    out
}
