//! Gesture Engine
//!
//! Turns per-frame body landmarks into drum hits:
//! - Hand zone classification over a tiered, mirrored zone table
//! - Hit/release hysteresis so a resting limb fires once
//! - One-shot knee calibration for body-relative pedal detection
//! - Hi-hat pedal coupling (closed hand hi-hat, open hi-hat choke)

pub mod calibration;
pub mod config;
pub mod engine;
pub mod event;
pub mod instrument;
pub mod latch;
pub mod limb;
pub mod runner;
pub mod zone;

pub use calibration::{Calibration, CalibrationBaseline, Calibrator};
pub use config::{EngineConfig, HandJoint, PedalJoint};
pub use engine::{EngineState, EngineStats, GestureEngine};
pub use event::{dispatch, EventSink, InstrumentHitEvent};
pub use instrument::{HiHatVariant, Instrument, Limb, Side};
pub use latch::LatchTable;
pub use limb::{HandState, PedalState};
pub use runner::{run_frame_loop, LoopSummary};
pub use zone::{HitTier, ReleaseRule, XRange, ZoneHit, ZoneMap, ZoneRule};

use thiserror::Error;

/// Gesture engine error types
#[derive(Error, Debug)]
pub enum GestureError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid zone map: {0}")]
    InvalidZoneMap(String),

    #[error("No session started")]
    SessionNotStarted,
}
