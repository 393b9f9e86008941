//! Motion primitives.
//!
//! Each primitive owns its own timer state, advanced only by the frame delta
//! it is handed, and writes a pose contribution to the model. None of them
//! read the wall clock.

mod blink;
mod breathing;
mod gesture;
mod head_tilt;
mod idle;
mod lip_sync;
mod wave;

pub use blink::{Blink, BLINK_CHANNEL, BLINK_HOLD_SECS, BLINK_INTERVAL};
pub use breathing::{BreathOffset, Breathing, BREATH_POSITION_AMPLITUDE, BREATH_YAW_AMPLITUDE};
pub use gesture::{Gesture, GestureKind};
pub use head_tilt::{head_tilt_roll, HeadTilt, HEAD_TILT_PEAK, HEAD_TILT_SECS};
pub use idle::{rest_roll, IdleSway, ARM_REST_ROLL};
pub use lip_sync::{SpeakingState, MOUTH_CHANNEL, MOUTH_GAIN};
pub use wave::{Wave, WAVE_SECS};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Whether a one-shot should keep running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionStatus {
    Running,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// +1 for left, -1 for right.
    pub fn sign(&self) -> f32 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            Side::Left
        } else {
            Side::Right
        }
    }
}

/// Hermite ease used for wind-up/wind-down of one-shots.
pub(crate) fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoothstep_endpoints() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert_eq!(smoothstep(2.0), 1.0);
        assert!((smoothstep(0.5) - 0.5).abs() < 1e-6);
    }
}
