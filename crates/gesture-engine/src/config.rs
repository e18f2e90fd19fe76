//! Gesture engine configuration

use pose_input::JointId;
use serde::{Deserialize, Serialize};

use crate::{GestureError, Side};

/// Landmark used as the stick tip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandJoint {
    #[default]
    Index,
    Wrist,
}

impl HandJoint {
    /// Get the landmark tracked for this side
    pub fn joint(self, side: Side) -> JointId {
        match (self, side) {
            (HandJoint::Index, Side::Left) => JointId::LeftIndex,
            (HandJoint::Index, Side::Right) => JointId::RightIndex,
            (HandJoint::Wrist, Side::Left) => JointId::LeftWrist,
            (HandJoint::Wrist, Side::Right) => JointId::RightWrist,
        }
    }
}

/// Landmark compared against the knee baseline for pedal hits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PedalJoint {
    #[default]
    Foot,
    Knee,
}

impl PedalJoint {
    /// Get the landmark tracked for this side
    pub fn joint(self, side: Side) -> JointId {
        match (self, side) {
            (PedalJoint::Foot, Side::Left) => JointId::LeftFootIndex,
            (PedalJoint::Foot, Side::Right) => JointId::RightFootIndex,
            (PedalJoint::Knee, Side::Left) => JointId::LeftKnee,
            (PedalJoint::Knee, Side::Right) => JointId::RightKnee,
        }
    }
}

/// Gesture engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Settle time between session start and calibration (milliseconds)
    pub calibration_delay_ms: u64,

    /// Pedal hits when the tracked point rises this far above the knee baseline
    pub pedal_hit_margin: f32,

    /// Pedal releases once the tracked point drops back within this margin
    pub pedal_release_margin: f32,

    /// Landmarks below this estimator confidence count as missing
    pub min_landmark_confidence: f32,

    pub hand_joint: HandJoint,
    pub pedal_joint: PedalJoint,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            calibration_delay_ms: 2000,
            pedal_hit_margin: 0.03,
            pedal_release_margin: 0.01,
            min_landmark_confidence: 0.0,
            hand_joint: HandJoint::Index,
            pedal_joint: PedalJoint::Foot,
        }
    }
}

impl EngineConfig {
    /// Create sensitive config (smaller pedal travel)
    pub fn sensitive() -> Self {
        Self {
            pedal_hit_margin: 0.02,
            pedal_release_margin: 0.005,
            ..Default::default()
        }
    }

    /// Create relaxed config (longer pedal travel, noisy estimators)
    pub fn relaxed() -> Self {
        Self {
            pedal_hit_margin: 0.05,
            pedal_release_margin: 0.02,
            min_landmark_confidence: 0.5,
            ..Default::default()
        }
    }

    /// Validate thresholds and margins
    pub fn validate(&self) -> Result<(), GestureError> {
        if !(self.pedal_hit_margin > 0.0 && self.pedal_hit_margin < 1.0) {
            return Err(GestureError::Config(format!(
                "pedal_hit_margin {} outside (0, 1)",
                self.pedal_hit_margin
            )));
        }
        if !(self.pedal_release_margin >= 0.0
            && self.pedal_release_margin < self.pedal_hit_margin)
        {
            return Err(GestureError::Config(format!(
                "pedal_release_margin {} must be in [0, pedal_hit_margin)",
                self.pedal_release_margin
            )));
        }
        if !(0.0..=1.0).contains(&self.min_landmark_confidence) {
            return Err(GestureError::Config(format!(
                "min_landmark_confidence {} outside [0, 1]",
                self.min_landmark_confidence
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(EngineConfig::default().validate().is_ok());
        assert!(EngineConfig::sensitive().validate().is_ok());
        assert!(EngineConfig::relaxed().validate().is_ok());
    }

    #[test]
    fn test_release_margin_must_leave_a_band() {
        let config = EngineConfig {
            pedal_release_margin: 0.03,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(GestureError::Config(_))));
    }

    #[test]
    fn test_confidence_range() {
        let config = EngineConfig {
            min_landmark_confidence: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_joint_selection() {
        assert_eq!(HandJoint::Index.joint(Side::Left), JointId::LeftIndex);
        assert_eq!(PedalJoint::Foot.joint(Side::Right), JointId::RightFootIndex);
        assert_eq!(PedalJoint::Knee.joint(Side::Left), JointId::LeftKnee);
    }
}
