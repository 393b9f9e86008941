//! Mock chat client: deterministic replies for tests and offline runs.

use crate::client::ChatClient;
use anyhow::Result;
use async_trait::async_trait;
use kouki_core::Turn;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// Pops scripted replies in order; echoes the message once the script runs
/// out. A scripted `Err` simulates a backend failure.
#[derive(Debug, Default)]
pub struct MockChatClient {
    replies: Mutex<Vec<Result<String, String>>>,
    requests: Mutex<Vec<Vec<Turn>>>,
    call_count: AtomicUsize,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            ..Self::default()
        }
    }

    /// Queue a failure after whatever is already scripted.
    pub async fn push_failure(&self, reason: &str) {
        self.replies.lock().await.push(Err(reason.to_string()));
    }

    pub async fn push_reply(&self, reply: &str) {
        self.replies.lock().await.push(Ok(reply.to_string()));
    }

    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// History snapshots, one per request.
    pub async fn requests(&self) -> Vec<Vec<Turn>> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn reply(&self, message: &str, history: &[Turn]) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(history.to_vec());

        let mut queue = self.replies.lock().await;
        if queue.is_empty() {
            return Ok(format!("(mock) {message}"));
        }
        match queue.remove(0) {
            Ok(reply) => Ok(reply),
            Err(reason) => anyhow::bail!("mock backend failure: {}", reason),
        }
    }
}
