use crate::rig::{with_joint, Joint, Skeleton};
use std::f32::consts::TAU;

pub const BREATH_POSITION_AMPLITUDE: f32 = 0.015;
pub const BREATH_YAW_AMPLITUDE: f32 = 0.0075;

const PERIOD_X: f32 = 4.0;
const PERIOD_Z: f32 = 5.0;
/// Both waves repeat after this long, so the phase can wrap without a seam.
const WRAP: f32 = PERIOD_X * PERIOD_Z;

/// Root offset produced by one breathing step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BreathOffset {
    pub x: f32,
    pub z: f32,
    pub yaw: f32,
}

/// Slow body sway on the root. Always on.
#[derive(Debug, Clone, Default)]
pub struct Breathing {
    phase: f32,
}

impl Breathing {
    pub fn advance(&mut self, dt: f32) -> BreathOffset {
        self.phase = (self.phase + dt) % WRAP;
        self.offset()
    }

    pub fn offset(&self) -> BreathOffset {
        let a = (self.phase * TAU / PERIOD_X).sin();
        let b = (self.phase * TAU / PERIOD_Z).sin();
        BreathOffset {
            x: BREATH_POSITION_AMPLITUDE * a,
            z: BREATH_POSITION_AMPLITUDE * b,
            yaw: BREATH_YAW_AMPLITUDE * b,
        }
    }

    pub fn update(&mut self, dt: f32, skeleton: &mut dyn Skeleton) -> BreathOffset {
        let offset = self.advance(dt);
        with_joint(skeleton, Joint::Root, |root| {
            root.translation.x = offset.x;
            root.translation.z = offset.z;
            root.rotation.y = offset.yaw;
        });
        offset
    }
}
