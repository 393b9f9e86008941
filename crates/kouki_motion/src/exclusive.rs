//! The single exclusive-motion slot.
//!
//! Head tilts, waves and gestures all write the head or arms, so at most one
//! of them may run. Idle sway only runs while the slot is empty.

use crate::primitives::{Gesture, GestureKind, HeadTilt, MotionStatus, Wave};
use crate::rig::Skeleton;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ExclusiveMotion {
    #[default]
    None,
    HeadTilt(HeadTilt),
    Wave(Wave),
    Gesture(Gesture),
}

/// What is occupying the slot, without its progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "motion", content = "kind")]
pub enum MotionKind {
    HeadTilt,
    Wave,
    Gesture(GestureKind),
}

impl ExclusiveMotion {
    /// Preemption rank. A request only replaces a strictly lower rank.
    pub fn rank(&self) -> u8 {
        match self {
            ExclusiveMotion::None => 0,
            ExclusiveMotion::Gesture(_) => 1,
            ExclusiveMotion::Wave(_) => 2,
            ExclusiveMotion::HeadTilt(_) => 3,
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, ExclusiveMotion::None)
    }

    pub fn is_head_tilt(&self) -> bool {
        matches!(self, ExclusiveMotion::HeadTilt(_))
    }

    pub fn kind(&self) -> Option<MotionKind> {
        match self {
            ExclusiveMotion::None => None,
            ExclusiveMotion::HeadTilt(_) => Some(MotionKind::HeadTilt),
            ExclusiveMotion::Wave(_) => Some(MotionKind::Wave),
            ExclusiveMotion::Gesture(g) => Some(MotionKind::Gesture(g.kind())),
        }
    }

    /// Run the occupant for one frame. Returns `Finished` once it ended and
    /// the slot has been cleared; `Running` otherwise (including when empty).
    pub fn update(&mut self, dt: f32, skeleton: &mut dyn Skeleton) -> MotionStatus {
        let status = match self {
            ExclusiveMotion::None => return MotionStatus::Running,
            ExclusiveMotion::HeadTilt(tilt) => tilt.update(dt, skeleton),
            ExclusiveMotion::Wave(wave) => wave.update(dt, skeleton),
            ExclusiveMotion::Gesture(gesture) => gesture.update(dt, skeleton),
        };
        if status == MotionStatus::Finished {
            *self = ExclusiveMotion::None;
        }
        status
    }

    /// Undo the occupant's pose without finishing it. Used on preemption.
    pub fn restore(&self, skeleton: &mut dyn Skeleton) {
        match self {
            ExclusiveMotion::None => {}
            ExclusiveMotion::HeadTilt(tilt) => tilt.restore(skeleton),
            ExclusiveMotion::Wave(wave) => wave.restore(skeleton),
            ExclusiveMotion::Gesture(gesture) => gesture.restore(skeleton),
        }
    }

    /// Try to place `next` in the slot. The current occupant is restored and
    /// replaced only if `next` outranks it; otherwise nothing changes.
    pub fn request(&mut self, next: ExclusiveMotion, skeleton: Option<&mut dyn Skeleton>) -> bool {
        if next.rank() <= self.rank() {
            return false;
        }
        if let Some(skeleton) = skeleton {
            self.restore(skeleton);
        }
        *self = next;
        true
    }
}
