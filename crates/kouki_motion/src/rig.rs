//! The model boundary: a skeleton with named joints and an expression surface.
//!
//! Both are owned by the loaded model. The animation code only ever borrows
//! them for the duration of a frame.

use glam::Vec3;
use kouki_core::RigError;
use serde::{Deserialize, Serialize};

/// The joints the animation code knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Joint {
    Root,
    Head,
    LeftUpperArm,
    RightUpperArm,
    LeftLowerArm,
    RightLowerArm,
    LeftHand,
    RightHand,
}

impl Joint {
    pub const ALL: [Joint; 8] = [
        Joint::Root,
        Joint::Head,
        Joint::LeftUpperArm,
        Joint::RightUpperArm,
        Joint::LeftLowerArm,
        Joint::RightLowerArm,
        Joint::LeftHand,
        Joint::RightHand,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Head => "head",
            Self::LeftUpperArm => "leftUpperArm",
            Self::RightUpperArm => "rightUpperArm",
            Self::LeftLowerArm => "leftLowerArm",
            Self::RightLowerArm => "rightLowerArm",
            Self::LeftHand => "leftHand",
            Self::RightHand => "rightHand",
        }
    }
}

/// Local transform of a joint. Rotation is XYZ Euler angles in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct JointTransform {
    pub translation: Vec3,
    pub rotation: Vec3,
}

pub trait Skeleton {
    fn joint(&self, joint: Joint) -> Option<&JointTransform>;
    fn joint_mut(&mut self, joint: Joint) -> Option<&mut JointTransform>;
}

/// Write through to a joint if the model has it. Missing joints are a no-op.
pub fn with_joint(skeleton: &mut dyn Skeleton, joint: Joint, f: impl FnOnce(&mut JointTransform)) {
    if let Some(transform) = skeleton.joint_mut(joint) {
        f(transform);
    }
}

pub trait ExpressionSurface {
    /// Every channel the model exposes.
    fn channels(&self) -> Vec<String>;
    fn weight(&self, channel: &str) -> Option<f32>;
    /// Set a channel weight. Fails with `UnknownChannel` if the model lacks it.
    fn set_weight(&mut self, channel: &str, weight: f32) -> Result<(), RigError>;
}

/// A loaded humanoid model.
pub trait AvatarModel: Send {
    /// Advance the model's own internal state (spring bones, constraints, ...).
    fn update(&mut self, _dt: f32) {}
    fn skeleton(&self) -> &dyn Skeleton;
    fn skeleton_mut(&mut self) -> &mut dyn Skeleton;
    fn expressions(&self) -> &dyn ExpressionSurface;
    fn expressions_mut(&mut self) -> &mut dyn ExpressionSurface;
}

/// Final step of a frame: present the posed model.
pub trait Renderer: Send {
    fn submit(&mut self, model: &dyn AvatarModel);
}

/// Renderer that logs the pose at trace level. Used by the headless binary.
#[derive(Debug, Default)]
pub struct TraceRenderer {
    frames: u64,
}

impl TraceRenderer {
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for TraceRenderer {
    fn submit(&mut self, model: &dyn AvatarModel) {
        self.frames += 1;
        if let Some(head) = model.skeleton().joint(Joint::Head) {
            tracing::trace!(frame = self.frames, head = ?head.rotation, "render");
        }
    }
}
