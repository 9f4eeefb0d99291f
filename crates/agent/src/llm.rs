//! Chat-model abstraction and the Gemini HTTP client.
//!
//! `ChatModel` is the pluggable seam: one `generate` per conversational turn,
//! returning either free text or a single function call. Request building and
//! response parsing are free functions so the wire format is testable without
//! a network.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tierquote_core::config::LlmConfig;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub args: Value,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ModelReply {
    Text(String),
    FunctionCall(FunctionCall),
}

/// One entry in the per-message conversation. There is no cross-message
/// memory; the runtime rebuilds the turn list from scratch every request.
#[derive(Clone, Debug, PartialEq)]
pub enum Turn {
    User(String),
    ModelText(String),
    ModelCall(FunctionCall),
    FunctionResult { name: String, response: Value },
}

#[derive(Clone, Debug)]
pub struct ChatRequest<'a> {
    pub system_instruction: &'a str,
    pub turns: &'a [Turn],
    pub tool_declarations: &'a [Value],
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("model returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("model response was malformed: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn generate(&self, request: ChatRequest<'_>) -> Result<ModelReply, ModelError>;
}

/// Google Gemini `generateContent` client.
pub struct GeminiChatModel {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: SecretString,
}

impl GeminiChatModel {
    pub fn new(config: &LlmConfig) -> Result<Self, ModelError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone().unwrap_or_else(|| String::new().into()),
        })
    }
}

#[async_trait]
impl ChatModel for GeminiChatModel {
    async fn generate(&self, request: ChatRequest<'_>) -> Result<ModelReply, ModelError> {
        // The key rides in the query string, so the URL must never be logged.
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url,
            self.model,
            self.api_key.expose_secret()
        );

        let body = request_body(&request);
        tracing::debug!(
            event_name = "llm.request",
            model = %self.model,
            turns = request.turns.len(),
            "sending generateContent request"
        );

        let response = self.http_client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Status { status, body });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|error| ModelError::Malformed(format!("response is not JSON: {error}")))?;

        parse_reply(&payload)
    }
}

pub(crate) fn request_body(request: &ChatRequest<'_>) -> Value {
    let contents: Vec<Value> = request.turns.iter().map(turn_to_content).collect();

    let mut body = json!({
        "systemInstruction": { "parts": [{ "text": request.system_instruction }] },
        "contents": contents,
    });

    if !request.tool_declarations.is_empty() {
        body["tools"] = json!([{ "functionDeclarations": request.tool_declarations }]);
    }

    body
}

fn turn_to_content(turn: &Turn) -> Value {
    match turn {
        Turn::User(text) => json!({ "role": "user", "parts": [{ "text": text }] }),
        Turn::ModelText(text) => json!({ "role": "model", "parts": [{ "text": text }] }),
        Turn::ModelCall(call) => json!({
            "role": "model",
            "parts": [{ "functionCall": { "name": call.name, "args": call.args } }]
        }),
        Turn::FunctionResult { name, response } => json!({
            "role": "user",
            "parts": [{ "functionResponse": { "name": name, "response": response } }]
        }),
    }
}

/// A function-call part wins over text parts; multiple text parts are joined.
pub(crate) fn parse_reply(payload: &Value) -> Result<ModelReply, ModelError> {
    let parts = payload
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            ModelError::Malformed("missing candidates[0].content.parts".to_string())
        })?;

    for part in parts {
        if let Some(call) = part.get("functionCall") {
            let name = call
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| ModelError::Malformed("functionCall without a name".to_string()))?;
            let args = call.get("args").cloned().unwrap_or_else(|| json!({}));
            return Ok(ModelReply::FunctionCall(FunctionCall { name: name.to_string(), args }));
        }
    }

    let text: String =
        parts.iter().filter_map(|part| part.get("text").and_then(Value::as_str)).collect();

    if text.is_empty() {
        return Err(ModelError::Malformed("no text or functionCall parts".to_string()));
    }

    Ok(ModelReply::Text(text))
}
