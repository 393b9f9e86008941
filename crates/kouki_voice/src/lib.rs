//! Voice module for Kouki
//!
//! Speech-to-Text (STT) and Text-to-Speech (TTS) abstractions, the HTTP TTS
//! client, and the audio sinks that play synthesized clips.

mod sink;
mod stt;
mod tts;

pub use sink::{estimate_duration, AudioSink, ClipSink, NullSink};
pub use stt::{SpeechToText, UnsupportedStt};
pub use tts::{HttpTts, TextToSpeech};
