use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ModelError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },
    #[error("Model returned an empty completion")]
    EmptyCompletion,
    #[error("Mock script exhausted")]
    ScriptExhausted,
}

/// Abstraction over a text-completion model.
///
/// The pipeline treats implementations as unreliable: they may return
/// malformed JSON, fenced markdown, or fail outright — callers must sanitize
/// and carry a deterministic fallback.
pub trait LanguageModel: Send + Sync {
    fn complete(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, ModelError>;
}

// ── Mock model (always available, used for tests) ─────────────────────────────

enum MockBehavior {
    Fixed(String),
    Failing(ModelError),
    Scripted(Mutex<VecDeque<Result<String, ModelError>>>),
}

/// Deterministic stand-in for a real model — a fixed reply, a scripted
/// sequence of replies, or a guaranteed failure.
pub struct MockModel {
    behavior: MockBehavior,
}

impl MockModel {
    pub fn new(text: impl Into<String>) -> Self {
        Self { behavior: MockBehavior::Fixed(text.into()) }
    }

    pub fn failing() -> Self {
        Self {
            behavior: MockBehavior::Failing(ModelError::Http("connection refused".to_string())),
        }
    }

    /// Replies are consumed in order; further calls fail.
    pub fn scripted(responses: Vec<Result<String, ModelError>>) -> Self {
        Self {
            behavior: MockBehavior::Scripted(Mutex::new(responses.into())),
        }
    }
}

impl LanguageModel for MockModel {
    fn complete(
        &self,
        _system: &str,
        _user: &str,
        _max_tokens: u32,
        _temperature: f32,
    ) -> Result<String, ModelError> {
        match &self.behavior {
            MockBehavior::Fixed(text) => Ok(text.clone()),
            MockBehavior::Failing(err) => Err(err.clone()),
            MockBehavior::Scripted(queue) => queue
                .lock()
                .expect("mock mutex poisoned")
                .pop_front()
                .unwrap_or(Err(ModelError::ScriptExhausted)),
        }
    }
}

// ── OpenAI-compatible chat-completions client ─────────────────────────────────

pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
const API_URL: &str = "https://api.openai.com/v1/chat/completions";
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Blocking client for an OpenAI-compatible chat-completions endpoint. The
/// pipeline is synchronous end-to-end, so the call blocks; timeouts and
/// failures surface as `ModelError` and are absorbed per-batch upstream.
pub struct OpenAiModel {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
}

impl OpenAiModel {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, ModelError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ModelError::Http(e.to_string()))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Configure from `OPENAI_API_KEY`; `None` when unset, which downgrades
    /// the pipeline to rule-based categorization only.
    pub fn from_env() -> Option<Self> {
        let key = std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty())?;
        Self::new(key, DEFAULT_CHAT_MODEL).ok()
    }
}

impl LanguageModel for OpenAiModel {
    fn complete(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, ModelError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            max_tokens,
            temperature,
            messages: vec![
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: user },
            ],
        };

        let response = self
            .client
            .post(API_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| ModelError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(ModelError::Api {
                status: status.as_u16(),
                body: text.chars().take(200).collect(),
            });
        }

        let data: ChatCompletionResponse = response
            .json()
            .map_err(|e| ModelError::Http(format!("response decode: {e}")))?;

        data.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(ModelError::EmptyCompletion)
    }
}

// ── Response sanitation ───────────────────────────────────────────────────────

/// Strip markdown code fences from a model reply, returning the inner text.
/// Handles both a fully fenced reply and a fenced block embedded in prose.
pub fn strip_code_fences(raw: &str) -> &str {
    let s = raw.trim();

    if let Some(start) = s.find("```json") {
        let rest = &s[start + 7..];
        if let Some(end) = rest.find("```") {
            return rest[..end].trim();
        }
        return rest.trim();
    }

    let s = s.strip_prefix("```").unwrap_or(s);
    let s = s.strip_suffix("```").unwrap_or(s);
    s.trim()
}
