//! Per-frame orchestration

use pose_input::{PoseError, PoseSnapshot};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calibration::{CalibrationBaseline, Calibrator};
use crate::event::{dispatch, EventSink, InstrumentHitEvent};
use crate::latch::LatchTable;
use crate::limb::{HandState, PedalState};
use crate::zone::ZoneMap;
use crate::{EngineConfig, GestureError, HiHatVariant, Instrument, Limb, Side};

/// Engine lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// No session started
    Idle,
    /// Waiting for the settle delay and a usable pose
    Calibrating,
    /// Detecting hits until the next session start
    Tracking,
}

/// Counters for the current session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStats {
    pub frames_seen: u64,
    /// Frames without a usable pose
    pub frames_skipped: u64,
    pub hits_emitted: u64,
}

#[derive(Debug, Clone, Copy)]
struct Session {
    id: Uuid,
    origin_ms: u64,
}

/// Gesture-to-event engine. One instance per drummer; frames must be fed
/// from a single worker.
pub struct GestureEngine {
    config: EngineConfig,
    zones: ZoneMap,
    calibrator: Calibrator,
    left_hand: HandState,
    right_hand: HandState,
    hi_hat_pedal: PedalState,
    bass_pedal: PedalState,
    session: Option<Session>,
    state: EngineState,
    stats: EngineStats,
    /// Limbs currently reported as unavailable, indexed by `Limb::index`
    limb_missing: [bool; 4],
}

impl GestureEngine {
    /// Create an engine with the standard kit layout
    pub fn new(config: EngineConfig) -> Result<Self, GestureError> {
        Self::with_zone_map(config, ZoneMap::standard())
    }

    /// Create an engine over a custom zone layout
    pub fn with_zone_map(config: EngineConfig, zones: ZoneMap) -> Result<Self, GestureError> {
        config.validate()?;

        let hand_joints = [
            config.hand_joint.joint(Side::Left),
            config.hand_joint.joint(Side::Right),
        ];

        Ok(Self {
            calibrator: Calibrator::new(
                config.calibration_delay_ms,
                config.min_landmark_confidence,
                hand_joints,
            ),
            left_hand: HandState::new(Side::Left),
            right_hand: HandState::new(Side::Right),
            hi_hat_pedal: PedalState::new(
                Instrument::PedalHiHat,
                config.pedal_hit_margin,
                config.pedal_release_margin,
            ),
            bass_pedal: PedalState::new(
                Instrument::Bass,
                config.pedal_hit_margin,
                config.pedal_release_margin,
            ),
            session: None,
            state: EngineState::Idle,
            stats: EngineStats::default(),
            limb_missing: [false; 4],
            zones,
            config,
        })
    }

    /// Begin a new session: clear all latches and the baseline, recalibrate.
    /// `origin_ms` is on the same clock as frame timestamps.
    pub fn start(&mut self, origin_ms: u64) -> Uuid {
        let id = Uuid::new_v4();
        info!(session = %id, origin_ms, "Session started, calibrating");

        self.calibrator.reset();
        self.left_hand.reset();
        self.right_hand.reset();
        self.hi_hat_pedal.reset();
        self.bass_pedal.reset();
        self.stats = EngineStats::default();
        self.limb_missing = [false; 4];
        self.session = Some(Session { id, origin_ms });
        self.state = EngineState::Calibrating;
        id
    }

    /// Get the lifecycle state
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Get the current session id, if a session was started
    pub fn session_id(&self) -> Option<Uuid> {
        self.session.map(|s| s.id)
    }

    /// Get counters for the current session
    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// Get the engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get the active zone layout
    pub fn zones(&self) -> &ZoneMap {
        &self.zones
    }

    /// Get the knee baseline once calibrated
    pub fn baseline(&self) -> Option<&CalibrationBaseline> {
        self.calibrator.baseline()
    }

    /// Get the latch table of one hand
    pub fn hand_latches(&self, side: Side) -> &LatchTable {
        self.hand(side).latches()
    }

    /// Current latch of a pedal instrument; false for hand instruments
    pub fn pedal_latched(&self, instrument: Instrument) -> bool {
        match instrument {
            Instrument::PedalHiHat => self.hi_hat_pedal.is_latched(),
            Instrument::Bass => self.bass_pedal.is_latched(),
            _ => false,
        }
    }

    /// Process one frame result (`None` = estimator found no pose)
    pub fn process_frame(&mut self, pose: Option<&PoseSnapshot>) -> Vec<InstrumentHitEvent> {
        let Some(session) = self.session else {
            debug!("Frame before session start ignored");
            return Vec::new();
        };
        self.stats.frames_seen += 1;

        let pose = match pose.filter(|p| p.is_valid()) {
            Some(pose) => pose,
            None => {
                self.stats.frames_skipped += 1;
                metrics::counter!("drumkit_frames_skipped_total").increment(1);
                debug!(state = ?self.state, "No pose in frame, skipped");
                return Vec::new();
            }
        };

        match self.state {
            EngineState::Idle => Vec::new(),
            EngineState::Calibrating => {
                let elapsed = pose.timestamp_ms.saturating_sub(session.origin_ms);
                if let Some(calibration) = self.calibrator.on_frame(Some(pose), elapsed, &self.zones) {
                    self.left_hand.seed(calibration.left_hand);
                    self.right_hand.seed(calibration.right_hand);
                    self.state = EngineState::Tracking;
                    info!(session = %session.id, "Tracking");
                }
                Vec::new()
            }
            EngineState::Tracking => self.track(pose),
        }
    }

    /// `process_frame`, then hand the hits to `sink`
    pub fn process_and_dispatch<S: EventSink + ?Sized>(
        &mut self,
        pose: Option<&PoseSnapshot>,
        sink: &mut S,
    ) -> Vec<InstrumentHitEvent> {
        let events = self.process_frame(pose);
        dispatch(&events, sink);
        events
    }

    fn track(&mut self, pose: &PoseSnapshot) -> Vec<InstrumentHitEvent> {
        let mut events = Vec::new();

        // Pedals first: the hand hi-hat reads this frame's pedal latch
        match self.calibrator.baseline().copied() {
            Some(baseline) => {
                for side in Side::BOTH {
                    self.track_pedal(side, pose, &baseline, &mut events);
                }
            }
            None => warn!("Tracking without a calibration baseline, pedals disabled"),
        }

        let hi_hat_variant = if self.hi_hat_pedal.is_latched() {
            HiHatVariant::Closed
        } else {
            HiHatVariant::Open
        };
        for side in Side::BOTH {
            self.track_hand(side, pose, hi_hat_variant, &mut events);
        }

        for event in &events {
            debug!(
                instrument = event.instrument.name(),
                origin = ?event.origin,
                sound = event.sound_key(),
                "Hit"
            );
            metrics::counter!("drumkit_hits_total", "instrument" => event.instrument.name())
                .increment(1);
        }
        self.stats.hits_emitted += events.len() as u64;
        events
    }

    fn track_pedal(
        &mut self,
        side: Side,
        pose: &PoseSnapshot,
        baseline: &CalibrationBaseline,
        events: &mut Vec<InstrumentHitEvent>,
    ) {
        let limb = Limb::foot(side);
        let joint = self.config.pedal_joint.joint(side);
        let pos = match pose.normalized_with_confidence(joint, self.config.min_landmark_confidence) {
            Ok(pos) => pos,
            Err(e) => {
                self.mark_missing(limb, &e);
                return;
            }
        };
        self.mark_present(limb);

        let baseline_y = baseline.normalized(side, pose.height);
        let pedal = self.pedal_mut(side);
        if pedal.evaluate_hit(pos.y, baseline_y) {
            events.push(InstrumentHitEvent {
                instrument: pedal.instrument(),
                origin: limb,
                variant: None,
                timestamp_ms: pose.timestamp_ms,
            });
        }
        pedal.evaluate_release(pos.y, baseline_y);
    }

    fn track_hand(
        &mut self,
        side: Side,
        pose: &PoseSnapshot,
        hi_hat_variant: HiHatVariant,
        events: &mut Vec<InstrumentHitEvent>,
    ) {
        let limb = Limb::hand(side);
        let joint = self.config.hand_joint.joint(side);
        let pos = match pose.normalized_with_confidence(joint, self.config.min_landmark_confidence) {
            Ok(pos) => pos,
            Err(e) => {
                self.mark_missing(limb, &e);
                return;
            }
        };
        self.mark_present(limb);

        let hand = match side {
            Side::Left => &mut self.left_hand,
            Side::Right => &mut self.right_hand,
        };
        for instrument in hand.evaluate_hit(pos, &self.zones) {
            events.push(InstrumentHitEvent {
                instrument,
                origin: limb,
                variant: (instrument == Instrument::HiHat).then_some(hi_hat_variant),
                timestamp_ms: pose.timestamp_ms,
            });
        }
        hand.evaluate_release(pos, &self.zones);
    }

    fn hand(&self, side: Side) -> &HandState {
        match side {
            Side::Left => &self.left_hand,
            Side::Right => &self.right_hand,
        }
    }

    fn pedal_mut(&mut self, side: Side) -> &mut PedalState {
        match side {
            Side::Left => &mut self.hi_hat_pedal,
            Side::Right => &mut self.bass_pedal,
        }
    }

    fn mark_missing(&mut self, limb: Limb, error: &PoseError) {
        let missing = &mut self.limb_missing[limb.index()];
        if !*missing {
            warn!(?limb, "Limb unavailable, skipping: {}", error);
            *missing = true;
        }
    }

    fn mark_present(&mut self, limb: Limb) {
        let missing = &mut self.limb_missing[limb.index()];
        if *missing {
            info!(?limb, "Limb tracked again");
            *missing = false;
        }
    }
}
