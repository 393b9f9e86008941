//! Error types shared across crates.
//!
//! Rig errors are absorbed by the animation code; STT errors are routed by the
//! conversation session. Everything else travels as `anyhow::Error`.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RigError {
    #[error("expression channel not supported by model: {0}")]
    UnknownChannel(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SttError {
    /// The recognizer ran but heard nothing.
    #[error("no speech detected")]
    NoSpeech,

    /// The host has no speech recognition at all.
    #[error("speech recognition is not supported on this host")]
    Unsupported,

    #[error("speech recognition failed: {0}")]
    Failed(String),
}
