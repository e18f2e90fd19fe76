//! Kit Playback
//!
//! Sound bank validation and event sinks for drum hits.

mod bank;
mod sink;

pub use bank::{SoundBank, SoundSpec};
pub use sink::{ChannelSink, LoggingSink, PlaybackCommand};

use thiserror::Error;

/// Playback error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    #[error("No sound registered for key '{0}'")]
    MissingSound(String),

    #[error("Sound '{key}' has {channel} gain {gain} outside [0, 1]")]
    InvalidGain {
        key: String,
        channel: &'static str,
        gain: f32,
    },

    #[error("Sound '{0}' has an empty asset path")]
    EmptyPath(String),
}
