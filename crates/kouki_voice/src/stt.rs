//! Speech-to-Text (STT) trait definition

use async_trait::async_trait;
use kouki_core::SttError;

/// One-shot speech recognition: listen for a single utterance and return its
/// final transcript.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    async fn listen(&self) -> Result<String, SttError>;

    /// Get the name of this STT provider
    fn provider_name(&self) -> &'static str;
}

/// Stand-in for hosts without a recognizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedStt;

#[async_trait]
impl SpeechToText for UnsupportedStt {
    async fn listen(&self) -> Result<String, SttError> {
        Err(SttError::Unsupported)
    }

    fn provider_name(&self) -> &'static str {
        "unsupported"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unsupported_always_fails() {
        let stt = UnsupportedStt;
        assert_eq!(stt.listen().await, Err(SttError::Unsupported));
    }
}
