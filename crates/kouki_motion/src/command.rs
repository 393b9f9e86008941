//! Commands from the outside world to the avatar.
//!
//! The avatar is owned by the frame loop; everyone else holds an
//! [`AvatarHandle`] and queues commands that are applied at the start of the
//! next frame.

use crate::primitives::{GestureKind, Side};
use kouki_core::Emotion;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq)]
pub enum AvatarCommand {
    SetExpression(Emotion),
    /// Go back to neutral after this many seconds, unless the expression is
    /// changed again in between.
    RestoreNeutralAfter(f32),
    StartSpeaking,
    StopSpeaking,
    /// Speak for a fixed window without audio.
    SpeakFor(f32),
    Wave,
    TiltHead,
    Gesture(GestureKind, Side),
    /// Start the gesture countdown after this many seconds.
    ArmGesturesAfter(f32),
}

pub type CommandReceiver = mpsc::UnboundedReceiver<AvatarCommand>;

#[derive(Debug, Clone)]
pub struct AvatarHandle {
    tx: mpsc::UnboundedSender<AvatarCommand>,
}

impl AvatarHandle {
    pub fn channel() -> (AvatarHandle, CommandReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (AvatarHandle { tx }, rx)
    }

    /// Queue a command. Dropped with a warning if the frame loop is gone.
    pub fn send(&self, command: AvatarCommand) {
        if let Err(e) = self.tx.send(command) {
            tracing::warn!("Avatar is not running, dropped {:?}", e.0);
        }
    }

    pub fn set_expression(&self, emotion: Emotion) {
        self.send(AvatarCommand::SetExpression(emotion));
    }

    pub fn restore_neutral_after(&self, secs: f32) {
        self.send(AvatarCommand::RestoreNeutralAfter(secs));
    }

    pub fn start_speaking(&self) {
        self.send(AvatarCommand::StartSpeaking);
    }

    pub fn stop_speaking(&self) {
        self.send(AvatarCommand::StopSpeaking);
    }

    pub fn speak_for(&self, secs: f32) {
        self.send(AvatarCommand::SpeakFor(secs));
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
