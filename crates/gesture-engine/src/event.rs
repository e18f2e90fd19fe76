//! Hit events and the playback contract

use serde::{Deserialize, Serialize};

use crate::{HiHatVariant, Instrument, Limb};

/// A single drum strike detected in one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InstrumentHitEvent {
    pub instrument: Instrument,
    pub origin: Limb,
    /// Set for the hand hi-hat only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<HiHatVariant>,
    /// Timestamp of the frame that produced the hit (milliseconds)
    pub timestamp_ms: u64,
}

impl InstrumentHitEvent {
    /// Get the sample key this hit plays
    pub fn sound_key(&self) -> &'static str {
        self.instrument.sound_key(self.variant)
    }
}

/// Receives playback requests. Calls happen on the frame path and must
/// return without waiting for audio.
pub trait EventSink {
    fn play(&mut self, instrument: Instrument, variant: Option<HiHatVariant>);
    fn stop(&mut self, instrument: Instrument);
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn play(&mut self, instrument: Instrument, variant: Option<HiHatVariant>) {
        (**self).play(instrument, variant)
    }

    fn stop(&mut self, instrument: Instrument) {
        (**self).stop(instrument)
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn play(&mut self, instrument: Instrument, variant: Option<HiHatVariant>) {
        (**self).play(instrument, variant)
    }

    fn stop(&mut self, instrument: Instrument) {
        (**self).stop(instrument)
    }
}

/// Forward events in order; a choking instrument stops its target first
pub fn dispatch<S: EventSink + ?Sized>(events: &[InstrumentHitEvent], sink: &mut S) {
    for event in events {
        if let Some(choked) = event.instrument.chokes() {
            sink.stop(choked);
        }
        sink.play(event.instrument, event.variant);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Call {
        Play(Instrument, Option<HiHatVariant>),
        Stop(Instrument),
    }

    #[derive(Default)]
    struct Recorder(Vec<Call>);

    impl EventSink for Recorder {
        fn play(&mut self, instrument: Instrument, variant: Option<HiHatVariant>) {
            self.0.push(Call::Play(instrument, variant));
        }

        fn stop(&mut self, instrument: Instrument) {
            self.0.push(Call::Stop(instrument));
        }
    }

    fn event(instrument: Instrument, origin: Limb, variant: Option<HiHatVariant>) -> InstrumentHitEvent {
        InstrumentHitEvent {
            instrument,
            origin,
            variant,
            timestamp_ms: 0,
        }
    }

    #[test]
    fn test_pedal_hat_stops_open_hat_first() {
        let mut sink = Recorder::default();
        dispatch(
            &[
                event(Instrument::PedalHiHat, Limb::LeftFoot, None),
                event(Instrument::Snare, Limb::RightHand, None),
            ],
            &mut sink,
        );
        assert_eq!(
            sink.0,
            vec![
                Call::Stop(Instrument::HiHat),
                Call::Play(Instrument::PedalHiHat, None),
                Call::Play(Instrument::Snare, None),
            ]
        );
    }

    #[test]
    fn test_dispatch_through_trait_object() {
        let mut sink: Box<dyn EventSink> = Box::new(Recorder::default());
        dispatch(&[event(Instrument::Bass, Limb::RightFoot, None)], &mut sink);
    }

    #[test]
    fn test_event_sound_key() {
        let e = event(Instrument::HiHat, Limb::RightHand, Some(HiHatVariant::Closed));
        assert_eq!(e.sound_key(), "closed_hat");
    }
}
