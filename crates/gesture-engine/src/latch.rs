//! Per-limb "already fired, awaiting release" flags

use serde::{Deserialize, Serialize};

use crate::Instrument;

/// One flag per instrument
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatchTable {
    latched: [bool; Instrument::COUNT],
}

impl LatchTable {
    /// Check whether `instrument` is awaiting release
    pub fn is_latched(&self, instrument: Instrument) -> bool {
        self.latched[instrument.index()]
    }

    /// Mark `instrument` as fired
    pub fn latch(&mut self, instrument: Instrument) {
        self.latched[instrument.index()] = true;
    }

    /// Returns true if the flag was set
    pub fn release(&mut self, instrument: Instrument) -> bool {
        std::mem::replace(&mut self.latched[instrument.index()], false)
    }

    /// Iterate over latched instruments
    pub fn latched(&self) -> impl Iterator<Item = Instrument> + '_ {
        Instrument::ALL
            .into_iter()
            .filter(|i| self.is_latched(*i))
    }

    /// Check whether nothing is latched
    pub fn is_clear(&self) -> bool {
        self.latched.iter().all(|l| !l)
    }

    /// Release everything
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latch_and_release() {
        let mut table = LatchTable::default();
        assert!(table.is_clear());

        table.latch(Instrument::Snare);
        assert!(table.is_latched(Instrument::Snare));
        assert!(!table.is_latched(Instrument::FloorTom));
        assert_eq!(table.latched().collect::<Vec<_>>(), vec![Instrument::Snare]);

        assert!(table.release(Instrument::Snare));
        assert!(!table.release(Instrument::Snare));
        assert!(table.is_clear());
    }
}
