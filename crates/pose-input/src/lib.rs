//! Pose Input Library for the Air Drum Kit
//!
//! Narrow contract between an external pose estimator and the gesture engine.
//! Supports:
//! - Joint identities for the landmarks the drum kit reads (hands, knees, feet)
//! - Per-frame pose snapshots in pixel space with normalization helpers
//! - A keep-only-latest mailbox between the estimator and the engine worker
//! - Replay of recorded pose streams (JSON lines)

pub mod joint;
pub mod mailbox;
pub mod snapshot;
pub mod source;

pub use joint::JointId;
pub use mailbox::{latest_frame, FrameReceiver, FrameSender};
pub use snapshot::{Landmark, NormalizedPosition, PoseSnapshot};
pub use source::{PoseSource, ReplaySource};

use thiserror::Error;

/// Pose input error types
#[derive(Error, Debug)]
pub enum PoseError {
    #[error("Joint {0:?} missing from pose snapshot")]
    MissingJoint(JointId),

    #[error("Joint {joint:?} confidence {confidence} below minimum {min}")]
    LowConfidence {
        joint: JointId,
        confidence: f32,
        min: f32,
    },

    #[error("Invalid frame dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Failed to parse pose stream: {0}")]
    Parse(String),

    #[error("Pose stream I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
