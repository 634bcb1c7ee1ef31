//! Chat Assistant Module
//!
//! Passes operator questions to a hosted language model and keeps the
//! per-session transcript.
//!
//! ## Architecture
//!
//! - **ChatBackend**: one completion call per prompt, no retries
//! - **GroqChat**: OpenAI-compatible `chat/completions` client
//! - **ChatHistory**: append-only transcript, cleared on request
//!
//! Only the current prompt is sent to the model; earlier turns stay local.

pub mod groq;

pub use groq::{GroqChat, GroqChatConfig};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Chat backend errors
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("LLM returned status {status}: {body}")]
    ServerError {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("LLM response contained no choices")]
    EmptyResponse,
}

/// Unified trait for chat completion backends
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Return the assistant's reply to `prompt`
    async fn complete(&self, prompt: &str) -> Result<String, ChatError>;

    /// Backend name for logging
    fn backend_name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Append-only conversation transcript for one operator session.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChatHistory {
    messages: Vec<ChatMessage>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, content: &str) {
        self.push(ChatRole::User, content);
    }

    pub fn push_assistant(&mut self, content: &str) {
        self.push(ChatRole::Assistant, content);
    }

    fn push(&mut self, role: ChatRole, content: &str) {
        self.messages.push(ChatMessage {
            role,
            content: content.to_string(),
            timestamp: Utc::now(),
        });
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

/// Backend that echoes a fixed reply or always fails. For tests.
pub struct CannedChat {
    reply: Option<String>,
}

impl CannedChat {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self { reply: None }
    }
}

#[async_trait]
impl ChatBackend for CannedChat {
    async fn complete(&self, _prompt: &str) -> Result<String, ChatError> {
        self.reply.clone().ok_or(ChatError::EmptyResponse)
    }

    fn backend_name(&self) -> &'static str {
        "Canned"
    }
}
