//! Expression controller: one semantic emotion on the face at a time.
//!
//! Semantic channels (neutral..relaxed) form a reset group. Transient
//! channels such as `blink` and `aa` belong to other primitives and are
//! never touched here.

use crate::rig::ExpressionSurface;
use kouki_core::Emotion;

#[derive(Debug, Clone, Default)]
pub struct ExpressionController {
    current: Emotion,
}

impl ExpressionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last emotion requested, whether or not the model could show it.
    pub fn current(&self) -> Emotion {
        self.current
    }

    /// Apply an emotion by name. Unknown names resolve to neutral.
    pub fn set_expression(&mut self, surface: &mut dyn ExpressionSurface, name: &str) -> Emotion {
        let emotion = Emotion::from_name(name);
        self.set_emotion(surface, emotion);
        emotion
    }

    pub fn set_emotion(&mut self, surface: &mut dyn ExpressionSurface, emotion: Emotion) {
        for channel in surface.channels() {
            if Emotion::is_semantic_channel(&channel) {
                if let Err(e) = surface.set_weight(&channel, 0.0) {
                    tracing::debug!("Expression reset skipped: {}", e);
                }
            }
        }

        match surface.set_weight(emotion.channel(), 1.0) {
            Ok(()) => tracing::debug!("Expression changed: {}", emotion),
            Err(e) => tracing::warn!("Expression not applied ({}): {}", emotion, e),
        }
        self.current = emotion;
    }

    /// Record an emotion without a surface to apply it to.
    pub(crate) fn remember(&mut self, emotion: Emotion) {
        self.current = emotion;
    }
}
