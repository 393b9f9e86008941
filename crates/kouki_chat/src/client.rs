use anyhow::{Context, Result};
use async_trait::async_trait;
use kouki_core::{BackendConfig, Turn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Reply generation backend.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Ask for a reply to `message`. `history` is the full conversation so far,
    /// already ending with the user turn for `message`.
    async fn reply(&self, message: &str, history: &[Turn]) -> Result<String>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatRequest<'a> {
    message: &'a str,
    conversation_history: &'a [Turn],
}

#[derive(Deserialize)]
struct ChatResponse {
    reply: String,
}

/// Chat backend over HTTP: `POST {message, conversationHistory}` → `{reply}`.
#[derive(Debug, Clone)]
pub struct HttpChatClient {
    client: Client,
    url: String,
}

impl HttpChatClient {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            url: url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        Self::new(&config.chat_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ChatClient for HttpChatClient {
    async fn reply(&self, message: &str, history: &[Turn]) -> Result<String> {
        let body = ChatRequest {
            message,
            conversation_history: history,
        };

        tracing::debug!(turns = history.len(), "Requesting reply");
        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .context("Failed to reach chat backend")?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("Chat backend error {}: {}", status, text);
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .context("Failed to parse chat backend response")?;
        Ok(parsed.reply)
    }
}
