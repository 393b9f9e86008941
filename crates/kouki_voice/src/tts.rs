//! Text-to-Speech (TTS) trait and the HTTP backend client

use anyhow::{Context, Result};
use async_trait::async_trait;
use kouki_core::BackendConfig;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// Text-to-Speech trait for synthesizing audio from text
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Synthesize text to encoded audio bytes (usually MP3)
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;

    /// Get the name of this TTS provider
    fn provider_name(&self) -> &'static str;
}

#[derive(Serialize)]
struct TtsRequest<'a> {
    text: &'a str,
}

/// TTS backend reached over HTTP: `POST {text}` returns the audio body.
#[derive(Debug, Clone)]
pub struct HttpTts {
    client: Client,
    url: String,
}

impl HttpTts {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            url: url.to_string(),
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        Self::new(&config.tts_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TextToSpeech for HttpTts {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .post(&self.url)
            .json(&TtsRequest { text })
            .send()
            .await
            .context("Failed to reach TTS backend")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("TTS backend error {}: {}", status, body);
        }

        let audio = response
            .bytes()
            .await
            .context("Failed to read TTS audio body")?;
        if audio.is_empty() {
            anyhow::bail!("TTS backend returned an empty clip");
        }
        tracing::debug!(bytes = audio.len(), "Synthesized reply audio");
        Ok(audio.to_vec())
    }

    fn provider_name(&self) -> &'static str {
        "http"
    }
}
