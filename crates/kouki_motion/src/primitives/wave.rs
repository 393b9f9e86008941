use super::{rest_roll, smoothstep, MotionStatus, Side};
use crate::rig::{with_joint, Joint, Skeleton};

pub const WAVE_SECS: f32 = 3.0;
/// Upper-arm roll of the raised arm, measured on the right side.
const RAISED_ROLL: f32 = -1.0;
/// Time spent lifting the arm into place and lowering it again.
const RAISE_SECS: f32 = 0.3;
const SHAKE_RATE: f32 = 8.0;
const ARM_SHAKE: f32 = 0.15;
const HAND_SHAKE: f32 = 0.3;

/// Greeting wave with the right arm.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wave {
    elapsed: f32,
}

impl Wave {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn update(&mut self, dt: f32, skeleton: &mut dyn Skeleton) -> MotionStatus {
        self.elapsed += dt;
        if self.elapsed >= WAVE_SECS {
            self.restore(skeleton);
            self.elapsed = 0.0;
            return MotionStatus::Finished;
        }

        let t = self.elapsed;
        let lift = smoothstep(t / RAISE_SECS) * smoothstep((WAVE_SECS - t) / RAISE_SECS);
        let rest = rest_roll(Side::Right);
        let shake = (t * SHAKE_RATE).sin();

        with_joint(skeleton, Joint::RightUpperArm, |arm| {
            arm.rotation.z = rest + (RAISED_ROLL - rest) * lift;
            arm.rotation.y = shake * ARM_SHAKE * lift;
        });
        with_joint(skeleton, Joint::RightHand, |hand| {
            hand.rotation.z = shake * HAND_SHAKE * lift;
        });
        MotionStatus::Running
    }

    /// Put the arm back at rest.
    pub fn restore(&self, skeleton: &mut dyn Skeleton) {
        with_joint(skeleton, Joint::RightUpperArm, |arm| {
            arm.rotation.z = rest_roll(Side::Right);
            arm.rotation.y = 0.0;
        });
        with_joint(skeleton, Joint::RightHand, |hand| hand.rotation.z = 0.0);
    }
}
