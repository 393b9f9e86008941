//! # Kouki Core
//!
//! Shared vocabulary for the avatar companion: configuration, emotion tags,
//! the keyword classifier, conversation turns and the persisted preferences.

pub mod config;
pub mod conversation;
pub mod emotion;
pub mod error;
pub mod prefs;
pub mod sentiment;

pub use config::{AudioConfig, BackendConfig, GreetingMotion, KoukiConfig, SessionConfig};
pub use conversation::{Role, Turn};
pub use emotion::Emotion;
pub use error::{RigError, SttError};
pub use prefs::Preferences;
pub use sentiment::{EmotionClassifier, KeywordClassifier};
