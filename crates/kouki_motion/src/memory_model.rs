//! In-memory humanoid described by a JSON rig manifest.
//!
//! This is the headless stand-in for a real humanoid asset: it exposes the
//! same joint lookup and expression surface, and records how often each joint
//! was written so callers can observe the coordinator's behaviour.

use crate::rig::{AvatarModel, ExpressionSurface, Joint, JointTransform, Skeleton};
use anyhow::{Context, Result};
use kouki_core::RigError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Channels of a standard humanoid face.
pub const STANDARD_EXPRESSIONS: [&str; 8] = [
    "neutral",
    "happy",
    "sad",
    "angry",
    "surprised",
    "relaxed",
    "blink",
    "aa",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigManifest {
    #[serde(default)]
    pub name: Option<String>,
    pub joints: Vec<Joint>,
    pub expressions: Vec<String>,
}

impl RigManifest {
    /// Every joint and every standard channel.
    pub fn humanoid() -> Self {
        Self {
            name: None,
            joints: Joint::ALL.to_vec(),
            expressions: STANDARD_EXPRESSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read rig manifest: {}", path.as_ref().display()))?;
        serde_json::from_str(&raw).with_context(|| "Failed to parse rig manifest")
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryModel {
    joints: HashMap<Joint, JointTransform>,
    channels: BTreeMap<String, f32>,
    writes: HashMap<Joint, usize>,
    updated_secs: f32,
}

impl MemoryModel {
    pub fn from_manifest(manifest: &RigManifest) -> Self {
        Self {
            joints: manifest
                .joints
                .iter()
                .map(|j| (*j, JointTransform::default()))
                .collect(),
            channels: manifest.expressions.iter().map(|c| (c.clone(), 0.0)).collect(),
            ..Self::default()
        }
    }

    pub fn humanoid() -> Self {
        Self::from_manifest(&RigManifest::humanoid())
    }

    /// Load a model from a rig manifest on disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let manifest = RigManifest::load(path)?;
        tracing::info!(
            name = manifest.name.as_deref().unwrap_or("unnamed"),
            joints = manifest.joints.len(),
            expressions = manifest.expressions.len(),
            "Rig loaded"
        );
        Ok(Self::from_manifest(&manifest))
    }

    /// Number of mutable borrows taken on a joint so far.
    pub fn writes(&self, joint: Joint) -> usize {
        self.writes.get(&joint).copied().unwrap_or(0)
    }

    /// Total time passed to `update`.
    pub fn updated_secs(&self) -> f32 {
        self.updated_secs
    }
}

impl Skeleton for MemoryModel {
    fn joint(&self, joint: Joint) -> Option<&JointTransform> {
        self.joints.get(&joint)
    }

    fn joint_mut(&mut self, joint: Joint) -> Option<&mut JointTransform> {
        let transform = self.joints.get_mut(&joint)?;
        *self.writes.entry(joint).or_insert(0) += 1;
        Some(transform)
    }
}

impl ExpressionSurface for MemoryModel {
    fn channels(&self) -> Vec<String> {
        self.channels.keys().cloned().collect()
    }

    fn weight(&self, channel: &str) -> Option<f32> {
        self.channels.get(channel).copied()
    }

    fn set_weight(&mut self, channel: &str, weight: f32) -> Result<(), RigError> {
        match self.channels.get_mut(channel) {
            Some(w) => {
                *w = weight.clamp(0.0, 1.0);
                Ok(())
            }
            None => Err(RigError::UnknownChannel(channel.to_string())),
        }
    }
}

impl AvatarModel for MemoryModel {
    fn update(&mut self, dt: f32) {
        self.updated_secs += dt;
    }

    fn skeleton(&self) -> &dyn Skeleton {
        self
    }

    fn skeleton_mut(&mut self) -> &mut dyn Skeleton {
        self
    }

    fn expressions(&self) -> &dyn ExpressionSurface {
        self
    }

    fn expressions_mut(&mut self) -> &mut dyn ExpressionSurface {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_channel_is_an_error() {
        let mut model = MemoryModel::from_manifest(&RigManifest {
            name: None,
            joints: vec![Joint::Head],
            expressions: vec!["happy".into()],
        });
        assert!(model.set_weight("happy", 1.0).is_ok());
        assert_eq!(
            model.set_weight("sad", 1.0),
            Err(RigError::UnknownChannel("sad".into()))
        );
    }

    #[test]
    fn test_weights_are_clamped() {
        let mut model = MemoryModel::humanoid();
        model.set_weight("aa", 1.7).unwrap();
        assert_eq!(model.weight("aa"), Some(1.0));
        model.set_weight("aa", -0.2).unwrap();
        assert_eq!(model.weight("aa"), Some(0.0));
    }

    #[test]
    fn test_missing_joint_lookup() {
        let mut model = MemoryModel::from_manifest(&RigManifest {
            name: None,
            joints: vec![Joint::Root],
            expressions: vec![],
        });
        assert!(model.joint_mut(Joint::Head).is_none());
        assert_eq!(model.writes(Joint::Head), 0);
        assert!(model.joint_mut(Joint::Root).is_some());
        assert_eq!(model.writes(Joint::Root), 1);
    }

    #[test]
    fn test_load_manifest_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rig.json");
        std::fs::write(
            &path,
            r#"{"name":"kouki","joints":["root","head","rightHand"],"expressions":["happy","blink"]}"#,
        )
        .unwrap();

        let model = MemoryModel::load(&path).unwrap();
        assert!(model.joint(Joint::RightHand).is_some());
        assert!(model.joint(Joint::LeftHand).is_none());
        assert_eq!(model.channels(), vec!["blink".to_string(), "happy".to_string()]);
    }

    #[test]
    fn test_load_missing_manifest_fails() {
        assert!(MemoryModel::load("/nonexistent/rig.json").is_err());
    }
}
