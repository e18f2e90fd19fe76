//! Pose snapshot types and normalization

use serde::{Deserialize, Serialize};

use crate::{JointId, PoseError};

/// A single body landmark in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub joint: JointId,
    /// Pixel column
    pub x: f32,
    /// Pixel row, increasing downward
    pub y: f32,
    /// Estimator likelihood (0-1)
    #[serde(default = "default_confidence")]
    pub confidence: f32,
}

fn default_confidence() -> f32 {
    1.0
}

impl Landmark {
    /// Create a fully confident landmark
    pub fn new(joint: JointId, x: f32, y: f32) -> Self {
        Self {
            joint,
            x,
            y,
            confidence: 1.0,
        }
    }

    /// Set the estimator confidence
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }
}

/// Landmark position divided by frame dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPosition {
    pub x: f32,
    pub y: f32,
}

impl NormalizedPosition {
    /// Create a position from normalized coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Reflect about the vertical centre line (x = 0.5)
    pub fn mirrored(self) -> Self {
        Self {
            x: 1.0 - self.x,
            y: self.y,
        }
    }
}

/// One processed camera frame worth of landmarks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoseSnapshot {
    /// Capture timestamp (milliseconds, producer clock)
    pub timestamp_ms: u64,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    pub landmarks: Vec<Landmark>,
}

impl PoseSnapshot {
    /// Create a snapshot
    pub fn new(timestamp_ms: u64, width: u32, height: u32, landmarks: Vec<Landmark>) -> Self {
        Self {
            timestamp_ms,
            width,
            height,
            landmarks,
        }
    }

    /// An empty landmark list means the estimator found no body
    pub fn is_valid(&self) -> bool {
        !self.landmarks.is_empty() && self.width > 0 && self.height > 0
    }

    /// Get a joint's landmark
    pub fn landmark(&self, joint: JointId) -> Result<&Landmark, PoseError> {
        self.landmarks
            .iter()
            .find(|l| l.joint == joint)
            .ok_or(PoseError::MissingJoint(joint))
    }

    /// Get a joint's position scaled to [0, 1]
    pub fn normalized(&self, joint: JointId) -> Result<NormalizedPosition, PoseError> {
        self.normalized_with_confidence(joint, 0.0)
    }

    /// Normalized position, treating landmarks under `min_confidence` as missing
    pub fn normalized_with_confidence(
        &self,
        joint: JointId,
        min_confidence: f32,
    ) -> Result<NormalizedPosition, PoseError> {
        if self.width == 0 || self.height == 0 {
            return Err(PoseError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }

        let landmark = self.landmark(joint)?;
        if landmark.confidence < min_confidence {
            return Err(PoseError::LowConfidence {
                joint,
                confidence: landmark.confidence,
                min: min_confidence,
            });
        }

        Ok(NormalizedPosition {
            x: landmark.x / self.width as f32,
            y: landmark.y / self.height as f32,
        })
    }
}
