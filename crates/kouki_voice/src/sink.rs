//! Audio output.
//!
//! `play` resolves when playback has ended, which is when the session turns
//! the avatar's speaking state off again.

use anyhow::{Context, Result};
use async_trait::async_trait;
use kouki_core::AudioConfig;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[async_trait]
pub trait AudioSink: Send + Sync {
    async fn play(&self, clip: &[u8]) -> Result<()>;
}

/// Playing time of an encoded clip at a constant bitrate.
pub fn estimate_duration(bytes: usize, bytes_per_sec: u32, max_secs: f32) -> Duration {
    let secs = bytes as f32 / bytes_per_sec.max(1) as f32;
    Duration::from_secs_f32(secs.clamp(0.0, max_secs.max(0.0)))
}

/// Headless playback: holds for the clip's estimated length, optionally
/// keeping every clip on disk.
#[derive(Debug)]
pub struct ClipSink {
    clip_dir: Option<PathBuf>,
    bytes_per_sec: u32,
    max_secs: f32,
    played: AtomicUsize,
}

impl ClipSink {
    pub fn new(config: &AudioConfig) -> Self {
        Self {
            clip_dir: config.clip_dir.as_ref().map(PathBuf::from),
            bytes_per_sec: config.bytes_per_sec,
            max_secs: config.max_clip_secs,
            played: AtomicUsize::new(0),
        }
    }

    pub fn played(&self) -> usize {
        self.played.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AudioSink for ClipSink {
    async fn play(&self, clip: &[u8]) -> Result<()> {
        let n = self.played.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(dir) = &self.clip_dir {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create clip dir: {}", dir.display()))?;
            let path = dir.join(format!("reply-{n:04}.mp3"));
            tokio::fs::write(&path, clip)
                .await
                .with_context(|| format!("Failed to write clip: {}", path.display()))?;
            tracing::debug!("Clip saved to {}", path.display());
        }

        let duration = estimate_duration(clip.len(), self.bytes_per_sec, self.max_secs);
        tracing::debug!(bytes = clip.len(), ?duration, "Playing clip");
        tokio::time::sleep(duration).await;
        Ok(())
    }
}

/// Discards audio immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

#[async_trait]
impl AudioSink for NullSink {
    async fn play(&self, _clip: &[u8]) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_duration() {
        assert_eq!(estimate_duration(16_000, 16_000, 30.0), Duration::from_secs(1));
        assert_eq!(estimate_duration(0, 16_000, 30.0), Duration::ZERO);
        assert_eq!(estimate_duration(10_000_000, 16_000, 30.0), Duration::from_secs(30));
        // Zero bitrate is treated as one byte per second
        assert_eq!(estimate_duration(2, 0, 30.0), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clip_sink_waits_for_playback() {
        let sink = ClipSink::new(&AudioConfig::default());
        let start = tokio::time::Instant::now();
        sink.play(&[0u8; 8_000]).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(500));
        assert_eq!(sink.played(), 1);
    }

    #[tokio::test]
    async fn test_clip_sink_keeps_clips() {
        let dir = tempfile::tempdir().unwrap();
        let config = AudioConfig {
            clip_dir: Some(dir.path().join("clips").to_string_lossy().into_owned()),
            ..AudioConfig::default()
        };
        let sink = ClipSink::new(&config);
        sink.play(b"ID3fake").await.unwrap();
        sink.play(b"ID3fake2").await.unwrap();

        let saved = std::fs::read(dir.path().join("clips").join("reply-0002.mp3")).unwrap();
        assert_eq!(saved, b"ID3fake2");
    }
}
