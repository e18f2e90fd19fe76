//! Instrument trigger and release regions for the hands
//!
//! Coordinates are normalized, `y` grows downward. Rules are grouped into
//! tiers by their `min_y`; crossing a tier latches every instrument in it,
//! while `x` only decides which of them sounds.

use pose_input::NormalizedPosition;
use serde::{Deserialize, Serialize};

use crate::latch::LatchTable;
use crate::{GestureError, Instrument, Side};

/// Open horizontal interval; a missing bound is unbounded
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XRange {
    pub min: Option<f32>,
    pub max: Option<f32>,
}

impl XRange {
    /// Range open to the right
    pub const fn above(min: f32) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    /// Range open to the left
    pub const fn below(max: f32) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    /// Bounded range
    pub const fn between(min: f32, max: f32) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Check `x` against the bounds (exclusive)
    pub fn contains(&self, x: f32) -> bool {
        self.min.map_or(true, |min| x > min) && self.max.map_or(true, |max| x < max)
    }

    /// Reflection about x = 0.5
    pub fn mirrored(&self) -> Self {
        Self {
            min: self.max.map(|max| 1.0 - max),
            max: self.min.map(|min| 1.0 - min),
        }
    }
}

/// A landmark inside `x_range` with `y >= min_y` is in zone for `instrument`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneRule {
    pub instrument: Instrument,
    pub min_y: f32,
    pub x_range: XRange,
}

impl ZoneRule {
    /// Create a rule
    pub const fn new(instrument: Instrument, min_y: f32, x_range: XRange) -> Self {
        Self {
            instrument,
            min_y,
            x_range,
        }
    }
}

/// A landmark with `y < below_y` clears the latches of `clears`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseRule {
    pub below_y: f32,
    pub clears: Vec<Instrument>,
}

impl ReleaseRule {
    /// Create a release line clearing `clears` once a limb rises above `below_y`
    pub fn new(below_y: f32, clears: &[Instrument]) -> Self {
        Self {
            below_y,
            clears: clears.to_vec(),
        }
    }
}

/// Rules sharing one hit boundary
#[derive(Debug, Clone, PartialEq)]
pub struct HitTier {
    pub min_y: f32,
    pub rules: Vec<ZoneRule>,
}

impl HitTier {
    /// Iterate over the instruments of this tier
    pub fn instruments(&self) -> impl Iterator<Item = Instrument> + '_ {
        self.rules.iter().map(|r| r.instrument)
    }
}

/// Satisfied hit rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneHit {
    pub instrument: Instrument,
    /// Tier position, 0 = first boundary crossed moving down
    pub tier: usize,
}

/// Hand zone table. Rules are written for the right hand; the left hand
/// uses their reflection about x = 0.5.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneMap {
    tiers: Vec<HitTier>,
    releases: Vec<ReleaseRule>,
}

impl ZoneMap {
    /// The standard kit layout
    pub fn standard() -> Self {
        use Instrument::*;

        let rules = vec![
            ZoneRule::new(Crash, 0.25, XRange::above(0.65)),
            ZoneRule::new(Ride, 0.25, XRange::below(0.20)),
            ZoneRule::new(HighTom, 0.32, XRange::between(0.30, 0.60)),
            ZoneRule::new(MidTom, 0.32, XRange::between(0.15, 0.30)),
            ZoneRule::new(HiHat, 0.34, XRange::above(0.70)),
            ZoneRule::new(Snare, 0.48, XRange::between(0.50, 0.90)),
            ZoneRule::new(FloorTom, 0.48, XRange::below(0.30)),
        ];
        let releases = vec![
            ReleaseRule::new(0.25, &Instrument::HAND),
            ReleaseRule::new(0.31, &[HiHat, HighTom, MidTom, FloorTom, Snare]),
            ReleaseRule::new(0.33, &[HiHat, FloorTom, Snare]),
            ReleaseRule::new(0.46, &[FloorTom, Snare]),
        ];

        Self {
            tiers: group_tiers(rules),
            releases,
        }
    }

    /// Build a custom layout, rejecting tables that could latch forever
    pub fn new(rules: Vec<ZoneRule>, releases: Vec<ReleaseRule>) -> Result<Self, GestureError> {
        if rules.is_empty() {
            return Err(GestureError::InvalidZoneMap("no hit rules".into()));
        }

        let mut seen = LatchTable::default();
        for rule in &rules {
            if !Instrument::HAND.contains(&rule.instrument) {
                return Err(GestureError::InvalidZoneMap(format!(
                    "{} is not a hand instrument",
                    rule.instrument.name()
                )));
            }
            if seen.is_latched(rule.instrument) {
                return Err(GestureError::InvalidZoneMap(format!(
                    "{} has more than one rule",
                    rule.instrument.name()
                )));
            }
            seen.latch(rule.instrument);

            if !(0.0..=1.0).contains(&rule.min_y) {
                return Err(GestureError::InvalidZoneMap(format!(
                    "{} min_y {} outside [0, 1]",
                    rule.instrument.name(),
                    rule.min_y
                )));
            }

            // Needs a release boundary at or above its hit boundary
            let releasable = releases
                .iter()
                .any(|r| r.below_y <= rule.min_y && r.clears.contains(&rule.instrument));
            if !releasable {
                return Err(GestureError::InvalidZoneMap(format!(
                    "{} has no release at or above y = {}",
                    rule.instrument.name(),
                    rule.min_y
                )));
            }
        }

        if let Some(r) = releases.iter().find(|r| !(0.0..=1.0).contains(&r.below_y)) {
            return Err(GestureError::InvalidZoneMap(format!(
                "release below_y {} outside [0, 1]",
                r.below_y
            )));
        }

        Ok(Self {
            tiers: group_tiers(rules),
            releases,
        })
    }

    /// Get the hit tiers, most proximal first
    pub fn tiers(&self) -> &[HitTier] {
        &self.tiers
    }

    /// Get the release rules
    pub fn releases(&self) -> &[ReleaseRule] {
        &self.releases
    }

    /// Rules as they apply to `side`
    pub fn rules_for(&self, side: Side) -> Vec<ZoneRule> {
        self.tiers
            .iter()
            .flat_map(|t| t.rules.iter())
            .map(|r| match side {
                Side::Right => *r,
                Side::Left => ZoneRule {
                    x_range: r.x_range.mirrored(),
                    ..*r
                },
            })
            .collect()
    }

    /// Tiers whose hit boundary `y` has crossed, most proximal first
    pub fn crossed_tiers(&self, y: f32) -> impl Iterator<Item = &HitTier> + '_ {
        self.tiers.iter().filter(move |t| y >= t.min_y)
    }

    /// Hit rules satisfied by `pos` for `side`, most proximal tier first
    pub fn hits(&self, pos: NormalizedPosition, side: Side) -> Vec<ZoneHit> {
        let pos = canonical(pos, side);
        self.tiers
            .iter()
            .enumerate()
            .filter(|(_, t)| pos.y >= t.min_y)
            .flat_map(|(tier, t)| {
                t.rules
                    .iter()
                    .filter(move |r| r.x_range.contains(pos.x))
                    .map(move |r| ZoneHit {
                        instrument: r.instrument,
                        tier,
                    })
            })
            .collect()
    }

    /// Instruments whose latch a limb at `y` releases
    pub fn released(&self, y: f32) -> impl Iterator<Item = Instrument> + '_ {
        self.releases
            .iter()
            .filter(move |r| y < r.below_y)
            .flat_map(|r| r.clears.iter().copied())
    }

    /// Latches for a limb already resting at `y`: every crossed tier is set
    pub fn occupancy(&self, y: f32) -> LatchTable {
        let mut table = LatchTable::default();
        for tier in self.crossed_tiers(y) {
            for instrument in tier.instruments() {
                table.latch(instrument);
            }
        }
        table
    }
}

impl Default for ZoneMap {
    fn default() -> Self {
        Self::standard()
    }
}

/// Map a position into right-hand table coordinates
fn canonical(pos: NormalizedPosition, side: Side) -> NormalizedPosition {
    match side {
        Side::Right => pos,
        Side::Left => pos.mirrored(),
    }
}

fn group_tiers(mut rules: Vec<ZoneRule>) -> Vec<HitTier> {
    rules.sort_by(|a, b| a.min_y.total_cmp(&b.min_y));

    let mut tiers: Vec<HitTier> = Vec::new();
    for rule in rules {
        match tiers.last_mut() {
            Some(tier) if tier.min_y == rule.min_y => tier.rules.push(rule),
            _ => tiers.push(HitTier {
                min_y: rule.min_y,
                rules: vec![rule],
            }),
        }
    }
    tiers
}
