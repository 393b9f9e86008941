use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

// ============================================================================
// Top-level config
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KoukiConfig {
    pub backend: BackendConfig,
    pub avatar: AvatarConfig,
    pub session: SessionConfig,
    pub frame: FrameConfig,
    pub audio: AudioConfig,
}

impl KoukiConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    /// After loading, env var overrides are applied.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let mut config: KoukiConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML config")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Try to load from path; if file doesn't exist, return defaults with env overrides.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::info!("Config file not found or invalid ({}), using defaults", e);
                let mut cfg = Self::default();
                cfg.apply_env_overrides();
                cfg
            }
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("KOUKI_CHAT_URL") {
            self.backend.chat_url = v;
        }
        if let Ok(v) = std::env::var("KOUKI_TTS_URL") {
            self.backend.tts_url = v;
        }
        if let Ok(v) = std::env::var("KOUKI_MODEL_PATH") {
            self.avatar.model_path = v;
        }
        if let Ok(v) = std::env::var("KOUKI_VOICE") {
            if let Ok(b) = v.parse() {
                self.session.voice_enabled = b;
                self.session.voice_override = Some(b);
            }
        }
        if let Ok(v) = std::env::var("KOUKI_FPS") {
            if let Ok(n) = v.parse() {
                self.frame.fps = n;
            }
        }
    }
}

// ============================================================================
// Sub-configs
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub chat_url: String,
    pub tts_url: String,
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            chat_url: "http://localhost:3000/api/chat".to_string(),
            tts_url: "http://localhost:3000/api/tts".to_string(),
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AvatarConfig {
    /// Path of the rig manifest describing joints and expression channels.
    pub model_path: String,
    /// Fixed RNG seed for blink/gesture timing. Random when unset.
    pub seed: Option<u64>,
    pub greeting_motion: GreetingMotion,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            model_path: "kouki.rig.json".to_string(),
            seed: None,
            greeting_motion: GreetingMotion::Wave,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GreetingMotion {
    #[default]
    Wave,
    HeadTilt,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Initial voice preference when nothing is persisted yet.
    pub voice_enabled: bool,
    /// Set from `KOUKI_VOICE`. Wins over the stored preference.
    #[serde(skip)]
    pub voice_override: Option<bool>,
    /// How long a reply's emotion stays on the face.
    pub expression_hold_secs: f32,
    /// How long the greeting's happy face stays on.
    pub greeting_hold_secs: f32,
    /// Synthetic lip-sync length per reply character when voice is off.
    pub synthetic_secs_per_char: f32,
    pub synthetic_cap_secs: f32,
    pub greeting_text: String,
    pub apology_text: String,
    pub no_speech_text: String,
    pub voice_failure_text: String,
    pub stt_unsupported_text: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            voice_enabled: true,
            voice_override: None,
            expression_hold_secs: 3.0,
            greeting_hold_secs: 3.5,
            synthetic_secs_per_char: 0.1,
            synthetic_cap_secs: 3.0,
            greeting_text: "やあ、コウキだよ。なんでも話しかけてね！".to_string(),
            apology_text: "申し訳ない。何かエラーが起きた。".to_string(),
            no_speech_text: "音声が聞こえませんでした。もう一度試してください。".to_string(),
            voice_failure_text: "音声再生に失敗しました".to_string(),
            stt_unsupported_text: "この環境は音声認識に対応していません。テキストで話しかけてね。"
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    pub fps: u32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self { fps: 60 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Where played clips are written. Nothing is kept when unset.
    pub clip_dir: Option<String>,
    /// Assumed encoded bitrate, used to estimate clip length.
    pub bytes_per_sec: u32,
    /// Longest a single clip is allowed to hold the mouth open.
    pub max_clip_secs: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            clip_dir: None,
            // 128 kbit/s MP3
            bytes_per_sec: 16_000,
            max_clip_secs: 30.0,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
