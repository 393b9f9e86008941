//! Discrete emotion tags shown on the avatar's face.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A semantic facial emotion. Each maps to exactly one expression channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    #[default]
    Neutral,
    Happy,
    Sad,
    Angry,
    Surprised,
    Relaxed,
}

impl Emotion {
    /// All semantic emotions, in channel order.
    pub const ALL: [Emotion; 6] = [
        Emotion::Neutral,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Surprised,
        Emotion::Relaxed,
    ];

    /// Resolve a free-form name. Unknown names fall back to `Neutral`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "happy" => Self::Happy,
            "sad" => Self::Sad,
            "angry" => Self::Angry,
            "surprised" => Self::Surprised,
            "relaxed" => Self::Relaxed,
            _ => Self::Neutral,
        }
    }

    /// Name of the expression channel this emotion drives.
    pub fn channel(&self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Angry => "angry",
            Self::Surprised => "surprised",
            Self::Relaxed => "relaxed",
        }
    }

    /// Whether a channel name belongs to the semantic reset group.
    pub fn is_semantic_channel(channel: &str) -> bool {
        Self::ALL.iter().any(|e| e.channel() == channel)
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.channel())
    }
}
