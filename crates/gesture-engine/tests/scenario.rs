//! End-to-end drumming sessions through the public engine API

use gesture_engine::{
    EngineConfig, EngineState, EventSink, GestureEngine, HiHatVariant, Instrument, Limb, Side,
};
use pose_input::{JointId, Landmark, PoseSnapshot};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Play(Instrument, Option<HiHatVariant>),
    Stop(Instrument),
}

#[derive(Default)]
struct RecordingSink {
    calls: Vec<Call>,
}

impl RecordingSink {
    fn take(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }
}

impl EventSink for RecordingSink {
    fn play(&mut self, instrument: Instrument, variant: Option<HiHatVariant>) {
        self.calls.push(Call::Play(instrument, variant));
    }

    fn stop(&mut self, instrument: Instrument) {
        self.calls.push(Call::Stop(instrument));
    }
}

/// Drummer pose in pixels on a 1000x1000 frame
#[derive(Clone, Copy)]
struct Drummer {
    left_hand: (f32, f32),
    right_hand: (f32, f32),
    left_knee_y: f32,
    right_knee_y: f32,
    left_foot_y: f32,
    right_foot_y: f32,
}

impl Default for Drummer {
    fn default() -> Self {
        Self {
            left_hand: (300.0, 100.0),
            right_hand: (700.0, 100.0),
            left_knee_y: 400.0,
            right_knee_y: 400.0,
            left_foot_y: 900.0,
            right_foot_y: 900.0,
        }
    }
}

impl Drummer {
    fn at(&self, timestamp_ms: u64) -> PoseSnapshot {
        PoseSnapshot::new(
            timestamp_ms,
            1000,
            1000,
            vec![
                Landmark::new(JointId::LeftIndex, self.left_hand.0, self.left_hand.1),
                Landmark::new(JointId::RightIndex, self.right_hand.0, self.right_hand.1),
                Landmark::new(JointId::LeftKnee, 350.0, self.left_knee_y),
                Landmark::new(JointId::RightKnee, 650.0, self.right_knee_y),
                Landmark::new(JointId::LeftFootIndex, 350.0, self.left_foot_y),
                Landmark::new(JointId::RightFootIndex, 650.0, self.right_foot_y),
            ],
        )
    }
}

fn calibrated_engine() -> GestureEngine {
    let mut engine = GestureEngine::new(EngineConfig::default()).unwrap();
    engine.start(0);
    let drummer = Drummer::default();
    for ts in (0..=2000).step_by(100) {
        assert!(engine.process_frame(Some(&drummer.at(ts))).is_empty());
    }
    assert_eq!(engine.state(), EngineState::Tracking);
    engine
}

#[test]
fn bass_pedal_fires_once_against_knee_baseline() {
    let mut engine = calibrated_engine();
    let baseline = engine.baseline().copied().unwrap();
    assert_eq!(baseline.right_knee_y, 400.0);
    assert_eq!(baseline.left_knee_y, 400.0);

    let pressed = Drummer {
        right_foot_y: 368.0,
        ..Default::default()
    };
    let mut sink = RecordingSink::default();

    let events = engine.process_and_dispatch(Some(&pressed.at(2005)), &mut sink);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].origin, Limb::RightFoot);
    assert_eq!(sink.take(), vec![Call::Play(Instrument::Bass, None)]);

    for ts in [2038, 2071, 2104] {
        engine.process_and_dispatch(Some(&pressed.at(ts)), &mut sink);
    }
    assert!(sink.take().is_empty());
}

#[test]
fn hi_hat_pedal_fires_from_left_foot() {
    let mut engine = calibrated_engine();
    let pressed = Drummer {
        left_foot_y: 368.0,
        ..Default::default()
    };
    let mut sink = RecordingSink::default();

    engine.process_and_dispatch(Some(&pressed.at(2005)), &mut sink);
    assert_eq!(
        sink.take(),
        vec![
            Call::Stop(Instrument::HiHat),
            Call::Play(Instrument::PedalHiHat, None)
        ]
    );
}

#[test]
fn open_hat_then_pedal_chokes_it() {
    let mut engine = calibrated_engine();
    let mut sink = RecordingSink::default();

    // Down through the cymbal tier first, then onto the hi-hat
    let cymbal = Drummer {
        right_hand: (750.0, 260.0),
        ..Default::default()
    };
    engine.process_and_dispatch(Some(&cymbal.at(2033)), &mut sink);
    assert_eq!(sink.take(), vec![Call::Play(Instrument::Crash, None)]);

    let hat = Drummer {
        right_hand: (750.0, 350.0),
        ..Default::default()
    };
    engine.process_and_dispatch(Some(&hat.at(2066)), &mut sink);
    assert_eq!(
        sink.take(),
        vec![Call::Play(Instrument::HiHat, Some(HiHatVariant::Open))]
    );

    let pedal = Drummer {
        left_foot_y: 360.0,
        ..hat
    };
    engine.process_and_dispatch(Some(&pedal.at(2100)), &mut sink);
    assert_eq!(
        sink.take(),
        vec![
            Call::Stop(Instrument::HiHat),
            Call::Play(Instrument::PedalHiHat, None)
        ]
    );
}

#[test]
fn closed_hat_while_pedal_held() {
    let mut engine = calibrated_engine();
    let mut sink = RecordingSink::default();

    let held = Drummer {
        left_foot_y: 360.0,
        ..Default::default()
    };
    engine.process_and_dispatch(Some(&held.at(2033)), &mut sink);
    sink.take();

    let strike = Drummer {
        right_hand: (750.0, 350.0),
        ..held
    };
    engine.process_and_dispatch(Some(&strike.at(2066)), &mut sink);
    assert!(sink
        .take()
        .contains(&Call::Play(Instrument::HiHat, Some(HiHatVariant::Closed))));
}

#[test]
fn calibration_is_not_repeated() {
    let mut engine = calibrated_engine();
    let before = engine.baseline().copied();

    let moved = Drummer {
        left_knee_y: 550.0,
        right_knee_y: 520.0,
        ..Default::default()
    };
    for ts in (2100..6000).step_by(100) {
        engine.process_frame(Some(&moved.at(ts)));
    }
    assert_eq!(engine.baseline().copied(), before);
}

#[test]
fn calibration_waits_for_first_pose_after_delay() {
    let mut engine = GestureEngine::new(EngineConfig::default()).unwrap();
    engine.start(1_000);

    engine.process_frame(None);
    engine.process_frame(Some(&Drummer::default().at(2_500)));
    assert_eq!(engine.state(), EngineState::Calibrating);

    engine.process_frame(None);
    assert_eq!(engine.state(), EngineState::Calibrating);

    let later = Drummer {
        right_knee_y: 420.0,
        ..Default::default()
    };
    engine.process_frame(Some(&later.at(3_100)));
    assert_eq!(engine.state(), EngineState::Tracking);
    assert_eq!(engine.baseline().unwrap().right_knee_y, 420.0);
}

#[test]
fn mirrored_hands_play_mirrored_instruments() {
    let mut engine = calibrated_engine();
    let crossed = Drummer {
        left_hand: (330.0, 260.0),
        right_hand: (670.0, 260.0),
        ..Default::default()
    };

    let events = engine.process_frame(Some(&crossed.at(2033)));
    let played: Vec<(Limb, Instrument)> = events.iter().map(|e| (e.origin, e.instrument)).collect();
    assert_eq!(
        played,
        vec![
            (Limb::LeftHand, Instrument::Crash),
            (Limb::RightHand, Instrument::Crash)
        ]
    );
    assert_eq!(
        engine.hand_latches(Side::Left),
        engine.hand_latches(Side::Right)
    );
}

#[test]
fn hand_resting_in_zone_at_calibration_does_not_fire() {
    let mut engine = GestureEngine::new(EngineConfig::default()).unwrap();
    engine.start(0);
    let resting = Drummer {
        right_hand: (600.0, 500.0),
        ..Default::default()
    };
    engine.process_frame(Some(&resting.at(2000)));
    assert_eq!(engine.state(), EngineState::Tracking);

    assert!(engine.process_frame(Some(&resting.at(2033))).is_empty());

    // Lift past the snare release line and strike again
    let lifted = Drummer {
        right_hand: (600.0, 400.0),
        ..Default::default()
    };
    engine.process_frame(Some(&lifted.at(2066)));
    let events = engine.process_frame(Some(&resting.at(2100)));
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].instrument, Instrument::Snare);
}
