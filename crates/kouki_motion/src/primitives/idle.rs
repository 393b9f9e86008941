use super::Side;
use crate::rig::{with_joint, Joint, Skeleton};

/// Arms hang this far below T-pose at rest.
pub const ARM_REST_ROLL: f32 = 1.2;

/// Upper-arm roll of the rest pose for one side.
pub fn rest_roll(side: Side) -> f32 {
    -side.sign() * ARM_REST_ROLL
}

/// Low-frequency head and arm drift shown when nothing else is playing.
///
/// The phase keeps advancing while suppressed, so the sway resumes mid-cycle
/// instead of restarting from zero.
#[derive(Debug, Clone, Default)]
pub struct IdleSway {
    // f64 so long sessions keep frame-level resolution
    phase: f64,
}

impl IdleSway {
    pub fn advance(&mut self, dt: f32) {
        self.phase += f64::from(dt);
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    fn wave(&self, rate: f64, offset: f64) -> f32 {
        (self.phase * rate + offset).sin() as f32
    }

    /// Write the idle pose. Only the head's yaw/pitch and the arms' roll are
    /// owned here; the head's roll belongs to tilts.
    pub fn apply(&self, skeleton: &mut dyn Skeleton) {
        with_joint(skeleton, Joint::Head, |head| {
            head.rotation.y = self.wave(0.5, 0.0) * 0.08;
            head.rotation.x = self.wave(0.35, 0.0) * 0.04;
        });

        let upper_sway = self.wave(0.6, 0.0) * 0.03;
        with_joint(skeleton, Joint::LeftUpperArm, |arm| {
            arm.rotation.z = rest_roll(Side::Left) + upper_sway;
        });
        with_joint(skeleton, Joint::RightUpperArm, |arm| {
            arm.rotation.z = rest_roll(Side::Right) - self.wave(0.6, 0.7) * 0.025;
        });

        with_joint(skeleton, Joint::LeftLowerArm, |arm| {
            arm.rotation.z = -0.1 + self.wave(0.8, 0.0) * 0.02;
        });
        with_joint(skeleton, Joint::RightLowerArm, |arm| {
            arm.rotation.z = 0.1 - self.wave(0.8, 0.4) * 0.015;
        });
    }

    pub fn update(&mut self, dt: f32, skeleton: &mut dyn Skeleton) {
        self.advance(dt);
        self.apply(skeleton);
    }
}
