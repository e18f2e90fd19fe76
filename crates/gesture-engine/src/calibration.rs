//! One-shot body-relative calibration
//!
//! After a settle delay, the first usable pose records the knee heights the
//! pedals are measured against and the zones each hand is already resting in.

use pose_input::{JointId, PoseError, PoseSnapshot};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::latch::LatchTable;
use crate::zone::ZoneMap;
use crate::Side;

/// Knee heights captured at calibration, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationBaseline {
    pub left_knee_y: f32,
    pub right_knee_y: f32,
}

impl CalibrationBaseline {
    /// Get the baseline knee height in pixels
    pub fn knee_y(&self, side: Side) -> f32 {
        match side {
            Side::Left => self.left_knee_y,
            Side::Right => self.right_knee_y,
        }
    }

    /// Baseline as a fraction of the current frame height
    pub fn normalized(&self, side: Side, height: u32) -> f32 {
        self.knee_y(side) / height as f32
    }
}

/// Output of the single calibration firing
#[derive(Debug, Clone, PartialEq)]
pub struct Calibration {
    pub baseline: CalibrationBaseline,
    pub left_hand: LatchTable,
    pub right_hand: LatchTable,
}

impl Calibration {
    /// Get the seeded latch table of one hand
    pub fn hand(&self, side: Side) -> &LatchTable {
        match side {
            Side::Left => &self.left_hand,
            Side::Right => &self.right_hand,
        }
    }
}

/// Fires once per session, on the first usable frame at or after the delay
#[derive(Debug, Clone)]
pub struct Calibrator {
    delay_ms: u64,
    min_confidence: f32,
    hand_joints: [JointId; 2],
    baseline: Option<CalibrationBaseline>,
}

impl Calibrator {
    /// Create a calibrator that fires `delay_ms` after session start
    pub fn new(delay_ms: u64, min_confidence: f32, hand_joints: [JointId; 2]) -> Self {
        Self {
            delay_ms,
            min_confidence,
            hand_joints,
            baseline: None,
        }
    }

    /// Check whether calibration has fired this session
    pub fn is_calibrated(&self) -> bool {
        self.baseline.is_some()
    }

    /// Get the captured baseline
    pub fn baseline(&self) -> Option<&CalibrationBaseline> {
        self.baseline.as_ref()
    }

    /// Arm calibration again for a new session
    pub fn reset(&mut self) {
        self.baseline = None;
    }

    /// Returns the calibration on the frame it fires, `None` otherwise
    pub fn on_frame(
        &mut self,
        pose: Option<&PoseSnapshot>,
        elapsed_ms: u64,
        zones: &ZoneMap,
    ) -> Option<Calibration> {
        if self.is_calibrated() || elapsed_ms < self.delay_ms {
            return None;
        }

        let Some(pose) = pose.filter(|p| p.is_valid()) else {
            debug!("Calibration due but no pose at {} ms, retrying next frame", elapsed_ms);
            return None;
        };

        let baseline = match self.capture_baseline(pose) {
            Ok(baseline) => baseline,
            Err(e) => {
                debug!("Calibration frame unusable ({}), retrying next frame", e);
                return None;
            }
        };

        let [left_joint, right_joint] = self.hand_joints;
        let calibration = Calibration {
            baseline,
            left_hand: self.hand_occupancy(pose, left_joint, zones),
            right_hand: self.hand_occupancy(pose, right_joint, zones),
        };

        info!(
            "Calibrated at {} ms: knee baseline left={} right={} (frame height {})",
            elapsed_ms, baseline.left_knee_y, baseline.right_knee_y, pose.height
        );
        self.baseline = Some(baseline);
        Some(calibration)
    }

    fn capture_baseline(&self, pose: &PoseSnapshot) -> Result<CalibrationBaseline, PoseError> {
        let knee = |joint| -> Result<f32, PoseError> {
            let landmark = pose.landmark(joint)?;
            if landmark.confidence < self.min_confidence {
                return Err(PoseError::LowConfidence {
                    joint,
                    confidence: landmark.confidence,
                    min: self.min_confidence,
                });
            }
            Ok(landmark.y)
        };

        Ok(CalibrationBaseline {
            left_knee_y: knee(JointId::LeftKnee)?,
            right_knee_y: knee(JointId::RightKnee)?,
        })
    }

    /// A hand missing at calibration starts unlatched
    fn hand_occupancy(&self, pose: &PoseSnapshot, joint: JointId, zones: &ZoneMap) -> LatchTable {
        match pose.normalized_with_confidence(joint, self.min_confidence) {
            Ok(pos) => zones.occupancy(pos.y),
            Err(e) => {
                debug!("No calibration position for {:?}: {}", joint, e);
                LatchTable::default()
            }
        }
    }
}
