use super::MotionStatus;
use crate::rig::{with_joint, Joint, Skeleton};

pub const HEAD_TILT_SECS: f32 = 3.0;
/// Peak head roll, radians.
pub const HEAD_TILT_PEAK: f32 = 0.35;

/// Head roll at `t` seconds into a tilt: up to one side, across to the
/// other, then back to level.
pub fn head_tilt_roll(t: f32) -> f32 {
    if t <= 0.0 || t >= HEAD_TILT_SECS {
        0.0
    } else if t < 1.0 {
        HEAD_TILT_PEAK * t
    } else if t < 2.0 {
        HEAD_TILT_PEAK * (1.0 - 2.0 * (t - 1.0))
    } else {
        -HEAD_TILT_PEAK * (1.0 - (t - 2.0))
    }
}

/// Three second curious head tilt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadTilt {
    elapsed: f32,
}

impl HeadTilt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn update(&mut self, dt: f32, skeleton: &mut dyn Skeleton) -> MotionStatus {
        self.elapsed += dt;
        if self.elapsed >= HEAD_TILT_SECS {
            self.restore(skeleton);
            return MotionStatus::Finished;
        }
        let roll = head_tilt_roll(self.elapsed);
        with_joint(skeleton, Joint::Head, |head| head.rotation.z = roll);
        MotionStatus::Running
    }

    pub fn restore(&self, skeleton: &mut dyn Skeleton) {
        with_joint(skeleton, Joint::Head, |head| head.rotation.z = 0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_model::MemoryModel;

    #[test]
    fn test_roll_envelope() {
        assert_eq!(head_tilt_roll(0.0), 0.0);
        assert!((head_tilt_roll(0.5) - 0.175).abs() < 1e-6);
        assert!((head_tilt_roll(1.0) - HEAD_TILT_PEAK).abs() < 1e-6);
        assert!(head_tilt_roll(1.5).abs() < 1e-6);
        assert!((head_tilt_roll(2.0) + HEAD_TILT_PEAK).abs() < 1e-6);
        assert!((head_tilt_roll(2.5) + 0.175).abs() < 1e-6);
        assert_eq!(head_tilt_roll(3.0), 0.0);
    }

    #[test]
    fn test_roll_never_exceeds_peak() {
        let mut t = 0.0;
        while t < 3.2 {
            assert!(head_tilt_roll(t).abs() <= HEAD_TILT_PEAK + 1e-6);
            t += 0.01;
        }
    }

    #[test]
    fn test_terminates_and_levels_head() {
        let mut model = MemoryModel::humanoid();
        let mut tilt = HeadTilt::new();

        assert_eq!(tilt.update(1.0, &mut model), MotionStatus::Running);
        assert!(model.joint(Joint::Head).unwrap().rotation.z > 0.3);
        assert_eq!(tilt.update(1.0, &mut model), MotionStatus::Running);
        assert_eq!(tilt.update(1.0, &mut model), MotionStatus::Finished);
        assert_eq!(model.joint(Joint::Head).unwrap().rotation.z, 0.0);
    }
}
