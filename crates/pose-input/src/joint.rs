//! Body joint identities

use serde::{Deserialize, Serialize};

/// Body joints read by the drum kit, numbered as in the 33-point
/// BlazePose / ML Kit landmark model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum JointId {
    LeftWrist = 15,
    RightWrist = 16,
    /// Hand stick point
    LeftIndex = 19,
    RightIndex = 20,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    /// Pedal point
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl JointId {
    /// All joints the kit understands
    pub const ALL: [JointId; 10] = [
        JointId::LeftWrist,
        JointId::RightWrist,
        JointId::LeftIndex,
        JointId::RightIndex,
        JointId::LeftKnee,
        JointId::RightKnee,
        JointId::LeftAnkle,
        JointId::RightAnkle,
        JointId::LeftFootIndex,
        JointId::RightFootIndex,
    ];

    /// Map a BlazePose landmark index to a joint the kit understands
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            15 => Some(Self::LeftWrist),
            16 => Some(Self::RightWrist),
            19 => Some(Self::LeftIndex),
            20 => Some(Self::RightIndex),
            25 => Some(Self::LeftKnee),
            26 => Some(Self::RightKnee),
            27 => Some(Self::LeftAnkle),
            28 => Some(Self::RightAnkle),
            31 => Some(Self::LeftFootIndex),
            32 => Some(Self::RightFootIndex),
            _ => None,
        }
    }

    /// BlazePose landmark index
    pub fn index(self) -> u8 {
        self as u8
    }
}
