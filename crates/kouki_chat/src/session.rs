//! Conversation session.
//!
//! Owns the request history and the display transcript, and drives the
//! avatar through its [`AvatarHandle`]: emotion from each reply, speaking
//! around audio playback (or a synthetic window when voice is off), and the
//! one-time greeting.

use crate::client::ChatClient;
use anyhow::Result;
use kouki_core::{
    Emotion, EmotionClassifier, GreetingMotion, KeywordClassifier, KoukiConfig, Preferences,
    Role, SessionConfig, SttError, Turn,
};
use kouki_motion::primitives::{HEAD_TILT_SECS, WAVE_SECS};
use kouki_motion::{AvatarCommand, AvatarHandle};
use kouki_voice::{AudioSink, SpeechToText, TextToSpeech};
use std::path::PathBuf;
use std::sync::Arc;

/// Why a caption is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionKind {
    /// A turn that is also in the request history.
    Turn,
    Greeting,
    Apology,
    /// Status line such as "no speech heard".
    Notice,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caption {
    pub role: Role,
    pub kind: CaptionKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VoiceOutcome {
    /// Audio was synthesized and played to the end.
    Played,
    /// Voice is off; the mouth moved for this many seconds.
    Synthetic(f32),
    /// Synthesis or playback failed; the notice was shown.
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// Blank input. Nothing was sent.
    Ignored,
    Replied {
        reply: String,
        emotion: Emotion,
        voice: VoiceOutcome,
    },
    /// The backend could not be reached; the apology was shown instead.
    Failed { apology: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListenOutcome {
    Sent(SendOutcome),
    NoSpeech,
    /// No recognizer on this host. `alerted` is true the first time only.
    Unsupported { alerted: bool },
    Failed(String),
}

pub struct ConversationSession {
    client: Arc<dyn ChatClient>,
    avatar: AvatarHandle,
    classifier: Box<dyn EmotionClassifier>,
    tts: Option<Arc<dyn TextToSpeech>>,
    sink: Option<Arc<dyn AudioSink>>,
    config: SessionConfig,
    greeting_motion: GreetingMotion,
    prefs_path: Option<PathBuf>,

    history: Vec<Turn>,
    transcript: Vec<Caption>,
    voice_enabled: bool,
    greeted: bool,
    stt_available: bool,
}

impl ConversationSession {
    pub fn new(client: Arc<dyn ChatClient>, avatar: AvatarHandle, config: &KoukiConfig) -> Self {
        Self {
            client,
            avatar,
            classifier: Box::new(KeywordClassifier::new()),
            tts: None,
            sink: None,
            config: config.session.clone(),
            greeting_motion: config.avatar.greeting_motion,
            prefs_path: None,
            history: Vec::new(),
            transcript: Vec::new(),
            voice_enabled: config.session.voice_enabled,
            greeted: false,
            stt_available: true,
        }
    }

    /// Speak replies through `tts` and `sink` while voice is enabled.
    pub fn with_voice(mut self, tts: Arc<dyn TextToSpeech>, sink: Arc<dyn AudioSink>) -> Self {
        self.tts = Some(tts);
        self.sink = Some(sink);
        self
    }

    pub fn with_classifier(mut self, classifier: impl EmotionClassifier + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    /// Persist the voice toggle here. Stored preferences override the config
    /// file, but not `KOUKI_VOICE`.
    pub fn with_preferences(mut self, path: PathBuf) -> Self {
        if self.config.voice_override.is_none() {
            let fallback = Preferences {
                voice_enabled: self.voice_enabled,
            };
            self.voice_enabled = Preferences::load_or(Some(&path), fallback).voice_enabled;
        }
        self.prefs_path = Some(path);
        self
    }

    // ------------------------------------------------------------------
    // Chat
    // ------------------------------------------------------------------

    pub async fn send_message(&mut self, text: &str) -> SendOutcome {
        let message = text.trim();
        if message.is_empty() {
            return SendOutcome::Ignored;
        }

        self.history.push(Turn::user(message));
        self.caption(Role::User, CaptionKind::Turn, message);

        let reply = match self.client.reply(message, &self.history).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("Chat request failed: {:#}", e);
                let apology = self.config.apology_text.clone();
                self.caption(Role::Assistant, CaptionKind::Apology, &apology);
                return SendOutcome::Failed { apology };
            }
        };

        self.history.push(Turn::assistant(reply.clone()));
        self.caption(Role::Assistant, CaptionKind::Turn, &reply);

        let emotion = self.classifier.classify(&reply);
        tracing::debug!(%emotion, "Reply classified");
        self.avatar.set_expression(emotion);
        self.avatar.restore_neutral_after(self.config.expression_hold_secs);

        let voice = self.voice(&reply).await;
        SendOutcome::Replied {
            reply,
            emotion,
            voice,
        }
    }

    /// Greet once per session. Returns `false` if already greeted.
    pub async fn play_greeting(&mut self) -> bool {
        if self.greeted {
            return false;
        }
        self.greeted = true;

        self.avatar.set_expression(Emotion::Happy);
        let motion_secs = match self.greeting_motion {
            GreetingMotion::Wave => {
                self.avatar.send(AvatarCommand::Wave);
                WAVE_SECS
            }
            GreetingMotion::HeadTilt => {
                self.avatar.send(AvatarCommand::TiltHead);
                HEAD_TILT_SECS
            }
        };
        self.avatar.restore_neutral_after(self.config.greeting_hold_secs);
        self.avatar.send(AvatarCommand::ArmGesturesAfter(motion_secs));

        let greeting = self.config.greeting_text.clone();
        self.caption(Role::Assistant, CaptionKind::Greeting, &greeting);
        self.voice(&greeting).await;
        tracing::info!("Greeting played");
        true
    }

    /// Speak an existing line again, e.g. the last reply.
    pub async fn replay(&mut self, text: &str) -> VoiceOutcome {
        match (&self.tts, &self.sink) {
            (Some(tts), Some(sink)) => {
                let (tts, sink) = (Arc::clone(tts), Arc::clone(sink));
                self.speak_audio(tts.as_ref(), sink.as_ref(), text).await
            }
            _ => self.speak_synthetic(text),
        }
    }

    // ------------------------------------------------------------------
    // Speech input
    // ------------------------------------------------------------------

    /// Listen once and route the result.
    pub async fn listen(&mut self, stt: &dyn SpeechToText) -> ListenOutcome {
        if !self.stt_available {
            return ListenOutcome::Unsupported { alerted: false };
        }
        let result = stt.listen().await;
        self.handle_transcript(result).await
    }

    pub async fn handle_transcript(&mut self, result: Result<String, SttError>) -> ListenOutcome {
        match result {
            Ok(transcript) => ListenOutcome::Sent(self.send_message(&transcript).await),
            Err(SttError::NoSpeech) => {
                let notice = self.config.no_speech_text.clone();
                self.caption(Role::Assistant, CaptionKind::Notice, &notice);
                ListenOutcome::NoSpeech
            }
            Err(SttError::Unsupported) => {
                let alerted = self.stt_available;
                if alerted {
                    self.stt_available = false;
                    tracing::warn!("Speech recognition unsupported, disabling it");
                    let notice = self.config.stt_unsupported_text.clone();
                    self.caption(Role::Assistant, CaptionKind::Notice, &notice);
                }
                ListenOutcome::Unsupported { alerted }
            }
            Err(SttError::Failed(reason)) => {
                tracing::warn!("Speech recognition failed: {}", reason);
                ListenOutcome::Failed(reason)
            }
        }
    }

    // ------------------------------------------------------------------
    // Voice
    // ------------------------------------------------------------------

    /// Toggle spoken replies and persist the choice.
    pub fn set_voice_enabled(&mut self, enabled: bool) -> Result<()> {
        self.voice_enabled = enabled;
        tracing::info!(enabled, "Voice toggled");
        if let Some(path) = &self.prefs_path {
            Preferences {
                voice_enabled: enabled,
            }
            .save(path)?;
        }
        Ok(())
    }

    async fn voice(&mut self, text: &str) -> VoiceOutcome {
        if !self.voice_enabled {
            return self.speak_synthetic(text);
        }
        self.replay(text).await
    }

    async fn speak_audio(
        &mut self,
        tts: &dyn TextToSpeech,
        sink: &dyn AudioSink,
        text: &str,
    ) -> VoiceOutcome {
        let clip = match tts.synthesize(text).await {
            Ok(clip) => clip,
            Err(e) => return self.voice_failed(e),
        };

        self.avatar.start_speaking();
        let played = sink.play(&clip).await;
        self.avatar.stop_speaking();

        match played {
            Ok(()) => VoiceOutcome::Played,
            Err(e) => self.voice_failed(e),
        }
    }

    fn speak_synthetic(&self, text: &str) -> VoiceOutcome {
        let secs = synthetic_secs(text, &self.config);
        self.avatar.speak_for(secs);
        VoiceOutcome::Synthetic(secs)
    }

    fn voice_failed(&mut self, error: anyhow::Error) -> VoiceOutcome {
        tracing::warn!("Voice playback failed: {:#}", error);
        self.avatar.stop_speaking();
        let notice = self.config.voice_failure_text.clone();
        self.caption(Role::Assistant, CaptionKind::Notice, &notice);
        VoiceOutcome::Failed
    }

    fn caption(&mut self, role: Role, kind: CaptionKind, text: &str) {
        self.transcript.push(Caption {
            role,
            kind,
            text: text.to_string(),
        });
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn transcript(&self) -> &[Caption] {
        &self.transcript
    }

    /// Most recent reply from the backend, for replay.
    pub fn last_reply(&self) -> Option<&str> {
        self.history
            .iter()
            .rev()
            .find(|t| t.role == Role::Assistant)
            .map(|t| t.content.as_str())
    }

    pub fn voice_enabled(&self) -> bool {
        self.voice_enabled
    }

    pub fn has_greeted(&self) -> bool {
        self.greeted
    }

    pub fn stt_available(&self) -> bool {
        self.stt_available
    }
}

/// Mouth-movement window for a reply spoken without audio.
pub fn synthetic_secs(text: &str, config: &SessionConfig) -> f32 {
    let chars = text.chars().count() as f32;
    (chars * config.synthetic_secs_per_char).min(config.synthetic_cap_secs)
}
