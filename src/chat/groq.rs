//! Groq chat client (OpenAI-compatible `chat/completions`)

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ChatBackend, ChatError};
use crate::config::LlmConfig;

/// Settings for [`GroqChat`]
#[derive(Debug, Clone)]
pub struct GroqChatConfig {
    /// API base URL (e.g. "https://api.groq.com/openai/v1")
    pub base_url: String,
    pub model: String,
    pub system_prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl From<&LlmConfig> for GroqChatConfig {
    fn from(cfg: &LlmConfig) -> Self {
        Self {
            base_url: cfg.base_url.clone(),
            model: cfg.model.clone(),
            system_prompt: cfg.system_prompt.clone(),
            temperature: cfg.temperature,
            max_tokens: cfg.max_tokens,
            timeout: Duration::from_secs(cfg.timeout_secs),
        }
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: [RequestMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Hosted LLM chat backend
pub struct GroqChat {
    http: reqwest::Client,
    api_key: SecretString,
    config: GroqChatConfig,
}

impl GroqChat {
    pub fn new(config: GroqChatConfig, api_key: SecretString) -> Result<Self, ChatError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            api_key,
            config,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ChatBackend for GroqChat {
    async fn complete(&self, prompt: &str) -> Result<String, ChatError> {
        let request = CompletionRequest {
            model: &self.config.model,
            messages: [
                RequestMessage {
                    role: "system",
                    content: &self.config.system_prompt,
                },
                RequestMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let start = std::time::Instant::now();
        let resp = self
            .http
            .post(self.completions_url())
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(%status, model = %self.config.model, "Chat completion rejected");
            return Err(ChatError::ServerError { status, body });
        }

        let parsed: CompletionResponse = resp.json().await?;
        let reply = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(ChatError::EmptyResponse)?;

        tracing::info!(
            model = %self.config.model,
            elapsed_ms = start.elapsed().as_millis() as u64,
            reply_len = reply.len(),
            "Chat completion received"
        );
        Ok(reply)
    }

    fn backend_name(&self) -> &'static str {
        "Groq"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn chat(url: &str) -> GroqChat {
        let mut config = GroqChatConfig::from(&LlmConfig::default());
        config.base_url = url.to_string();
        GroqChat::new(config, SecretString::from("gsk-test".to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_sends_fixed_prompt_and_settings() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer gsk-test")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "model": "llama-3.3-70b-versatile",
                "max_tokens": 500,
                "messages": [
                    {
                        "role": "system",
                        "content": "You are a professional emergency dispatch assistant. Be brief and tactical."
                    },
                    {"role": "user", "content": "Caller not breathing"}
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices": [{"index": 0, "message": {"role": "assistant", "content": "Start CPR now."}}]}"#,
            )
            .create_async()
            .await;

        let reply = chat(&server.url()).complete("Caller not breathing").await.unwrap();
        mock.assert_async().await;
        assert_eq!(reply, "Start CPR now.");
    }

    #[tokio::test]
    async fn test_error_status_is_surfaced() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body(r#"{"error": {"message": "Invalid API Key"}}"#)
            .create_async()
            .await;

        let err = chat(&server.url()).complete("hi").await.unwrap_err();
        assert!(err.to_string().contains("401"));
        assert!(err.to_string().contains("Invalid API Key"));
    }

    #[tokio::test]
    async fn test_no_choices_is_empty_response() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices": []}"#)
            .create_async()
            .await;

        let err = chat(&server.url()).complete("hi").await.unwrap_err();
        assert!(matches!(err, ChatError::EmptyResponse));
    }
}
