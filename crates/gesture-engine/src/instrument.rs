//! Drum kit components and limb identities

use serde::{Deserialize, Serialize};

/// Virtual drum kit component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Instrument {
    Crash,
    Ride,
    HiHat,
    HighTom,
    MidTom,
    FloorTom,
    Snare,
    Bass,
    PedalHiHat,
}

impl Instrument {
    pub const COUNT: usize = 9;

    pub const ALL: [Instrument; Instrument::COUNT] = [
        Instrument::Crash,
        Instrument::Ride,
        Instrument::HiHat,
        Instrument::HighTom,
        Instrument::MidTom,
        Instrument::FloorTom,
        Instrument::Snare,
        Instrument::Bass,
        Instrument::PedalHiHat,
    ];

    /// Instruments played with a stick
    pub const HAND: [Instrument; 7] = [
        Instrument::Crash,
        Instrument::Ride,
        Instrument::HiHat,
        Instrument::HighTom,
        Instrument::MidTom,
        Instrument::FloorTom,
        Instrument::Snare,
    ];

    /// Slot in per-instrument tables
    pub fn index(self) -> usize {
        self as usize
    }

    /// Get the snake_case instrument name used in logs and metrics
    pub fn name(self) -> &'static str {
        match self {
            Instrument::Crash => "crash",
            Instrument::Ride => "ride",
            Instrument::HiHat => "hi_hat",
            Instrument::HighTom => "high_tom",
            Instrument::MidTom => "mid_tom",
            Instrument::FloorTom => "floor_tom",
            Instrument::Snare => "snare",
            Instrument::Bass => "bass",
            Instrument::PedalHiHat => "pedal_hi_hat",
        }
    }

    /// Key of the sample this instrument plays. A hi-hat with no variant is open.
    pub fn sound_key(self, variant: Option<HiHatVariant>) -> &'static str {
        match self {
            Instrument::Crash => "crash",
            Instrument::Ride => "ride",
            Instrument::HiHat => match variant.unwrap_or(HiHatVariant::Open) {
                HiHatVariant::Open => "open_hat",
                HiHatVariant::Closed => "closed_hat",
            },
            Instrument::HighTom => "high_tom",
            Instrument::MidTom => "mid_tom",
            Instrument::FloorTom => "floor_tom",
            Instrument::Snare => "snare",
            Instrument::Bass => "bass",
            Instrument::PedalHiHat => "pedal_hat",
        }
    }

    /// Instrument whose ringing sound this one cuts off when struck
    pub fn chokes(self) -> Option<Instrument> {
        match self {
            Instrument::PedalHiHat => Some(Instrument::HiHat),
            _ => None,
        }
    }

    /// Every sound key any hit can resolve to
    pub fn all_sound_keys() -> Vec<&'static str> {
        let mut keys: Vec<&'static str> = Instrument::ALL
            .iter()
            .map(|i| i.sound_key(None))
            .collect();
        keys.push(Instrument::HiHat.sound_key(Some(HiHatVariant::Closed)));
        keys
    }
}

/// Open/closed modifier for the hand hi-hat, read from the pedal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HiHatVariant {
    Open,
    Closed,
}

/// Body side as seen in the image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];
}

/// Tracked limb that can originate a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Limb {
    LeftHand,
    RightHand,
    LeftFoot,
    RightFoot,
}

impl Limb {
    /// Get the hand limb on `side`
    pub fn hand(side: Side) -> Self {
        match side {
            Side::Left => Limb::LeftHand,
            Side::Right => Limb::RightHand,
        }
    }

    /// Get the foot limb on `side`
    pub fn foot(side: Side) -> Self {
        match side {
            Side::Left => Limb::LeftFoot,
            Side::Right => Limb::RightFoot,
        }
    }

    /// Get the side of the body this limb is on
    pub fn side(self) -> Side {
        match self {
            Limb::LeftHand | Limb::LeftFoot => Side::Left,
            Limb::RightHand | Limb::RightFoot => Side::Right,
        }
    }

    /// Slot in per-limb tables
    pub fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hi_hat_sound_keys() {
        assert_eq!(Instrument::HiHat.sound_key(None), "open_hat");
        assert_eq!(
            Instrument::HiHat.sound_key(Some(HiHatVariant::Closed)),
            "closed_hat"
        );
        assert_eq!(Instrument::PedalHiHat.sound_key(None), "pedal_hat");
    }

    #[test]
    fn test_all_sound_keys_are_distinct() {
        let mut keys = Instrument::all_sound_keys();
        assert_eq!(keys.len(), 10);
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 10);
    }

    #[test]
    fn test_only_pedal_hat_chokes() {
        for instrument in Instrument::ALL {
            let expected = (instrument == Instrument::PedalHiHat).then_some(Instrument::HiHat);
            assert_eq!(instrument.chokes(), expected);
        }
    }

    #[test]
    fn test_index_matches_all_order() {
        for (i, instrument) in Instrument::ALL.iter().enumerate() {
            assert_eq!(instrument.index(), i);
        }
    }
}
