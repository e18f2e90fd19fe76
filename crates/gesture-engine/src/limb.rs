//! Per-limb hit/release state machines

use pose_input::NormalizedPosition;
use tracing::trace;

use crate::latch::LatchTable;
use crate::zone::ZoneMap;
use crate::{Instrument, Side};

/// Stick hand: latch table over the zone cascade
#[derive(Debug, Clone)]
pub struct HandState {
    side: Side,
    latches: LatchTable,
}

impl HandState {
    /// Create an unlatched hand
    pub fn new(side: Side) -> Self {
        Self {
            side,
            latches: LatchTable::default(),
        }
    }

    /// Get the hand this state tracks
    pub fn side(&self) -> Side {
        self.side
    }

    /// Get the current latch table
    pub fn latches(&self) -> &LatchTable {
        &self.latches
    }

    /// Replace the latch table, e.g. with calibration occupancy
    pub fn seed(&mut self, latches: LatchTable) {
        self.latches = latches;
    }

    /// Clear all latches for a new session
    pub fn reset(&mut self) {
        self.latches.clear();
    }

    /// Instruments struck by a limb at `pos`. Every tier the limb has
    /// crossed is latched as a whole, whichever of its instruments sounded.
    pub fn evaluate_hit(&mut self, pos: NormalizedPosition, zones: &ZoneMap) -> Vec<Instrument> {
        let triggered: Vec<Instrument> = zones
            .hits(pos, self.side)
            .into_iter()
            .map(|hit| hit.instrument)
            .filter(|instrument| !self.latches.is_latched(*instrument))
            .collect();

        for tier in zones.crossed_tiers(pos.y) {
            for instrument in tier.instruments() {
                self.latches.latch(instrument);
            }
        }

        triggered
    }

    /// Clear latches whose release boundary `pos` is above. Returns the
    /// instruments that were re-armed.
    pub fn evaluate_release(&mut self, pos: NormalizedPosition, zones: &ZoneMap) -> Vec<Instrument> {
        let mut rearmed = Vec::new();
        for instrument in zones.released(pos.y) {
            if self.latches.release(instrument) {
                rearmed.push(instrument);
            }
        }
        if !rearmed.is_empty() {
            trace!(side = ?self.side, ?rearmed, "Hand latches released");
        }
        rearmed
    }
}

/// Foot pedal: single latch against the knee baseline
#[derive(Debug, Clone)]
pub struct PedalState {
    instrument: Instrument,
    latched: bool,
    hit_margin: f32,
    release_margin: f32,
}

impl PedalState {
    /// Create an unlatched pedal with its hit and release margins
    pub fn new(instrument: Instrument, hit_margin: f32, release_margin: f32) -> Self {
        Self {
            instrument,
            latched: false,
            hit_margin,
            release_margin,
        }
    }

    /// Get the instrument this pedal plays
    pub fn instrument(&self) -> Instrument {
        self.instrument
    }

    /// Check whether the pedal is held down
    pub fn is_latched(&self) -> bool {
        self.latched
    }

    /// Release the pedal for a new session
    pub fn reset(&mut self) {
        self.latched = false;
    }

    /// `y` and `baseline_y` are normalized; smaller `y` is higher in frame
    pub fn evaluate_hit(&mut self, y: f32, baseline_y: f32) -> bool {
        if !self.latched && y < baseline_y - self.hit_margin {
            self.latched = true;
            return true;
        }
        false
    }

    /// Returns true if the pedal was re-armed
    pub fn evaluate_release(&mut self, y: f32, baseline_y: f32) -> bool {
        if self.latched && y > baseline_y - self.release_margin {
            self.latched = false;
            return true;
        }
        false
    }
}
