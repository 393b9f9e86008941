use super::{MotionStatus, Side};
use crate::rig::{with_joint, Joint, Skeleton};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

const HEAD_TILT_ROLL: f32 = 0.2;
const ARM_RAISE_PITCH: f32 = 0.6;
const BODY_LEAN_ROLL: f32 = 0.05;

/// Spontaneous gestures picked by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    HeadTilt,
    ArmRaise,
    BodyLean,
}

impl GestureKind {
    pub const ALL: [GestureKind; 3] = [
        GestureKind::HeadTilt,
        GestureKind::ArmRaise,
        GestureKind::BodyLean,
    ];

    pub fn duration(&self) -> f32 {
        match self {
            GestureKind::HeadTilt => 1.5,
            GestureKind::ArmRaise | GestureKind::BodyLean => 2.0,
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// One running gesture. Each kind drives a single axis that idle sway does
/// not own, so restoring it to zero never fights the rest pose.
#[derive(Debug, Clone, PartialEq)]
pub struct Gesture {
    kind: GestureKind,
    side: Side,
    elapsed: f32,
}

impl Gesture {
    pub fn new(kind: GestureKind, side: Side) -> Self {
        Self {
            kind,
            side,
            elapsed: 0.0,
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let kind = GestureKind::random(rng);
        Self::new(kind, Side::random(rng))
    }

    pub fn kind(&self) -> GestureKind {
        self.kind
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Fraction of the gesture already played, in [0, 1].
    pub fn progress(&self) -> f32 {
        (self.elapsed / self.kind.duration()).clamp(0.0, 1.0)
    }

    pub fn update(&mut self, dt: f32, skeleton: &mut dyn Skeleton) -> MotionStatus {
        self.elapsed += dt;
        if self.elapsed >= self.kind.duration() {
            self.restore(skeleton);
            return MotionStatus::Finished;
        }

        let envelope = (self.progress() * PI).sin();
        let sign = self.side.sign();
        match self.kind {
            GestureKind::HeadTilt => with_joint(skeleton, Joint::Head, |head| {
                head.rotation.z = sign * HEAD_TILT_ROLL * envelope;
            }),
            GestureKind::ArmRaise => with_joint(skeleton, self.arm(), |arm| {
                arm.rotation.x = -ARM_RAISE_PITCH * envelope;
            }),
            GestureKind::BodyLean => with_joint(skeleton, Joint::Root, |root| {
                root.rotation.z = sign * BODY_LEAN_ROLL * envelope;
            }),
        }
        MotionStatus::Running
    }

    /// Zero the axis this gesture drove.
    pub fn restore(&self, skeleton: &mut dyn Skeleton) {
        match self.kind {
            GestureKind::HeadTilt => with_joint(skeleton, Joint::Head, |h| h.rotation.z = 0.0),
            GestureKind::ArmRaise => with_joint(skeleton, self.arm(), |a| a.rotation.x = 0.0),
            GestureKind::BodyLean => with_joint(skeleton, Joint::Root, |r| r.rotation.z = 0.0),
        }
    }

    fn arm(&self) -> Joint {
        match self.side {
            Side::Left => Joint::LeftUpperArm,
            Side::Right => Joint::RightUpperArm,
        }
    }
}
