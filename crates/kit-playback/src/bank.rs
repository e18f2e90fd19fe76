//! Sound key to sample asset mapping

use std::collections::BTreeMap;

use gesture_engine::{HiHatVariant, Instrument};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::PlaybackError;

/// One loaded sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundSpec {
    /// Sample asset path
    pub path: String,
    #[serde(default = "unity_gain")]
    pub left_gain: f32,
    #[serde(default = "unity_gain")]
    pub right_gain: f32,
}

fn unity_gain() -> f32 {
    1.0
}

impl SoundSpec {
    /// Create a sound at full gain on both channels
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            left_gain: 1.0,
            right_gain: 1.0,
        }
    }

    /// Set per-channel gain
    pub fn with_gain(mut self, left: f32, right: f32) -> Self {
        self.left_gain = left;
        self.right_gain = right;
        self
    }
}

/// Samples registered for the kit, keyed by `Instrument::sound_key`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SoundBank {
    sounds: BTreeMap<String, SoundSpec>,
}

impl SoundBank {
    /// Create a bank with no sounds
    pub fn empty() -> Self {
        Self {
            sounds: BTreeMap::new(),
        }
    }

    /// Stock samples under `sounds/`
    pub fn standard() -> Self {
        let mut bank = Self::empty();
        bank.insert("bass", SoundSpec::new("sounds/bass2.wav"));
        bank.insert("snare", SoundSpec::new("sounds/snare.wav"));
        bank.insert("open_hat", SoundSpec::new("sounds/open_hat.wav"));
        bank.insert("closed_hat", SoundSpec::new("sounds/closed_hat.wav"));
        bank.insert("pedal_hat", SoundSpec::new("sounds/pedal_hat.wav"));
        bank.insert("crash", SoundSpec::new("sounds/crash.wav"));
        bank.insert("ride", SoundSpec::new("sounds/ride.wav"));
        bank.insert("high_tom", SoundSpec::new("sounds/high_tom.wav"));
        bank.insert("mid_tom", SoundSpec::new("sounds/mid_tom.wav").with_gain(0.8, 0.7));
        bank.insert("floor_tom", SoundSpec::new("sounds/floor_tom.wav"));
        bank
    }

    /// Register a sound, returning the one it replaces
    pub fn insert(&mut self, key: impl Into<String>, spec: SoundSpec) -> Option<SoundSpec> {
        self.sounds.insert(key.into(), spec)
    }

    /// Get a sound by key
    pub fn get(&self, key: &str) -> Option<&SoundSpec> {
        self.sounds.get(key)
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    /// Sample for a hit
    pub fn resolve(
        &self,
        instrument: Instrument,
        variant: Option<HiHatVariant>,
    ) -> Result<(&'static str, &SoundSpec), PlaybackError> {
        let key = instrument.sound_key(variant);
        self.get(key)
            .map(|spec| (key, spec))
            .ok_or_else(|| PlaybackError::MissingSound(key.to_string()))
    }

    /// Check every sound a hit can produce is registered and sane.
    /// Run once at startup so frame-time lookups cannot fail.
    pub fn validate(&self) -> Result<(), PlaybackError> {
        for key in Instrument::all_sound_keys() {
            let spec = self
                .get(key)
                .ok_or_else(|| PlaybackError::MissingSound(key.to_string()))?;

            if spec.path.trim().is_empty() {
                return Err(PlaybackError::EmptyPath(key.to_string()));
            }
            for (channel, gain) in [("left", spec.left_gain), ("right", spec.right_gain)] {
                if !(0.0..=1.0).contains(&gain) {
                    return Err(PlaybackError::InvalidGain {
                        key: key.to_string(),
                        channel,
                        gain,
                    });
                }
            }
        }

        info!("Sound bank validated: {} samples", self.sounds.len());
        Ok(())
    }
}

impl Default for SoundBank {
    fn default() -> Self {
        Self::standard()
    }
}
