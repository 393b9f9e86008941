//! # Kouki Chat
//!
//! The conversation side of the companion: the chat backend client and the
//! session that turns replies into captions, voice and avatar commands.

pub mod client;
pub mod mock;
pub mod session;

pub use client::{ChatClient, HttpChatClient};
pub use mock::MockChatClient;
pub use session::{
    Caption, CaptionKind, ConversationSession, ListenOutcome, SendOutcome, VoiceOutcome,
};
