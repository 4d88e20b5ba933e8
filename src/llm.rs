//! Chat-completion collaborator.
//!
//! The session only needs "messages in, assistant text out", expressed by
//! [`LanguageModel`]. [`ChatClient`] implements it against an OpenAI-compatible
//! `/chat/completions` endpoint with the blocking reqwest client.
//!
//! ```no_run
//! # use talkdata::llm::{ChatClient, ChatMessage, LanguageModel};
//! let client = ChatClient::new("sk-...", "gpt-4o-mini")?;
//! let reply = client.complete(&[ChatMessage::user("Merhaba")])?;
//! # Ok::<(), talkdata::Error>(())
//! ```

use crate::error::{Error, Result};
use log::{debug, warn};
use reqwest::blocking::{Client as HttpClient, Response};
use reqwest::redirect::Policy;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Pauses between attempts; a request is tried `len + 1` times at most.
const RETRY_BACKOFF_MS: [u64; 3] = [100, 300, 700];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Anything that answers a conversation with the next assistant message.
pub trait LanguageModel {
    fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}

impl<F> LanguageModel for F
where
    F: Fn(&[ChatMessage]) -> Result<String>,
{
    fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        self(messages)
    }
}

#[derive(Debug, Clone)]
pub struct ChatClient {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    api_key: String,
    http: HttpClient,
}

impl ChatClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .redirect(Policy::limited(5))
            .user_agent(concat!("talkdata/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: DEFAULT_BASE_URL.into(),
            model: model.into(),
            temperature: 0.0,
            api_key: api_key.into(),
            http,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn send(&self, url: &str, body: &Value) -> reqwest::Result<Response> {
        self.http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
    }

    fn post_json(&self, url: &str, body: &Value) -> Result<Value> {
        for (attempt, backoff_ms) in RETRY_BACKOFF_MS.iter().enumerate() {
            let reason = match self.send(url, body) {
                Ok(r) if r.status().is_success() => return Ok(r.json()?),
                Ok(r) if r.status().is_server_error() => format!("HTTP {}", r.status()),
                Ok(r) => return Err(status_error(r)),
                Err(e) => e.to_string(),
            };
            warn!(
                "chat request attempt {} failed ({}), retrying",
                attempt + 1,
                reason
            );
            std::thread::sleep(Duration::from_millis(*backoff_ms));
        }
        // Final attempt surfaces its own error.
        let r = self.send(url, body)?;
        if !r.status().is_success() {
            return Err(status_error(r));
        }
        Ok(r.json()?)
    }
}

fn status_error(r: Response) -> Error {
    let status = r.status();
    let text = r.text().unwrap_or_default();
    Error::Llm(format!("HTTP {}: {}", status, text.trim()))
}

/// First choice's message text of a chat-completions response.
pub fn parse_completion(v: &Value) -> Result<String> {
    if let Some(err) = v.get("error") {
        let msg = err
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Err(Error::Llm(msg.to_string()));
    }
    v.pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| Error::Llm("response has no choices[0].message.content".into()))
}

impl LanguageModel for ChatClient {
    fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = json!({
            "model": self.model,
            "temperature": self.temperature,
            "messages": messages,
        });
        debug!("POST {} ({} messages)", url, messages.len());
        let v = self.post_json(&url, &body)?;
        parse_completion(&v)
    }
}
