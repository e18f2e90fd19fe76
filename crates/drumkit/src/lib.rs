//! Air drum kit pipeline
//!
//! Wires a pose stream through the gesture engine into playback commands.

pub mod replay;
pub mod settings;

pub use replay::Recording;
pub use settings::{KitConfig, ReplayConfig};

use anyhow::Context;
use gesture_engine::{run_frame_loop, EngineStats, GestureEngine, LoopSummary};
use kit_playback::{ChannelSink, LoggingSink, PlaybackCommand, SoundBank};
use pose_input::latest_frame;
use tokio::sync::mpsc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Outcome of one replayed session
#[derive(Debug, Clone, Default)]
pub struct SessionReport {
    pub engine: EngineStats,
    pub frame_loop: LoopSummary,
    /// Plays and stops the audio task handled
    pub commands_played: u64,
    /// Commands lost to a full or closed playback queue
    pub commands_dropped: u64,
}

/// Initialize logging
pub fn init_logging(level: Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Audio side of the pipeline: reports every command through a `LoggingSink`
async fn play_commands(bank: SoundBank, mut commands: mpsc::Receiver<PlaybackCommand>) -> LoggingSink {
    let mut sink = LoggingSink::new(bank);
    while let Some(command) = commands.recv().await {
        sink.apply(&command);
    }
    sink
}

/// Run one session over a recording
pub async fn run_session(config: &KitConfig, recording: Recording) -> anyhow::Result<SessionReport> {
    config.sounds.validate().context("sound bank")?;

    let mut engine = GestureEngine::new(config.engine.clone())?;
    let session = engine.start(recording.origin_ms());
    info!(%session, frames = recording.len(), "Replaying session");

    let (mut sink, commands) = ChannelSink::channel(config.sounds.clone(), config.playback_queue);
    let player = tokio::spawn(play_commands(config.sounds.clone(), commands));

    let (frames_tx, mut frames_rx) = latest_frame();
    let producer = recording.spawn(frames_tx, config.replay.realtime);

    let frame_loop = run_frame_loop(&mut engine, &mut frames_rx, &mut sink).await?;
    let published = producer.await.context("replay task")?;
    let commands_dropped = sink.dropped();
    drop(sink);
    let player = player.await.context("playback task")?;
    let commands_played = player.played() + player.stopped();

    if frame_loop.frames_dropped > 0 {
        warn!(
            "{} of {} frames superseded before processing",
            frame_loop.frames_dropped, published
        );
    }

    let report = SessionReport {
        engine: engine.stats(),
        frame_loop,
        commands_played,
        commands_dropped,
    };
    info!(
        frames_seen = report.engine.frames_seen,
        frames_skipped = report.engine.frames_skipped,
        hits = report.engine.hits_emitted,
        commands_played,
        commands_dropped,
        "Session finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pose_input::{JointId, Landmark, PoseSnapshot};

    fn frame(ts: u64, right_hand_y: f32, right_foot_y: f32) -> Option<PoseSnapshot> {
        Some(PoseSnapshot::new(
            ts,
            1000,
            1000,
            vec![
                Landmark::new(JointId::LeftKnee, 350.0, 400.0),
                Landmark::new(JointId::RightKnee, 650.0, 400.0),
                Landmark::new(JointId::RightIndex, 600.0, right_hand_y),
                Landmark::new(JointId::RightFootIndex, 650.0, right_foot_y),
            ],
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_plays_snare_and_bass() {
        let recording = Recording::from_frames(vec![
            frame(1000, 100.0, 900.0),
            frame(3000, 100.0, 900.0),
            frame(3033, 500.0, 900.0),
            frame(3066, 100.0, 360.0),
        ]);

        let report = run_session(&KitConfig::default(), recording).await.unwrap();

        assert_eq!(report.frame_loop.frames_dropped, 0);
        assert_eq!(report.engine.frames_seen, 4);
        assert_eq!(report.engine.hits_emitted, 2);
        assert_eq!(report.commands_played, 2);
        assert_eq!(report.commands_dropped, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_no_pose_frame_does_not_swallow_previous_hit() {
        let config = KitConfig {
            engine: gesture_engine::EngineConfig {
                calibration_delay_ms: 20,
                ..Default::default()
            },
            ..Default::default()
        };

        for _ in 0..25 {
            let recording = Recording::from_frames(vec![
                frame(0, 100.0, 900.0),
                frame(20, 100.0, 900.0),
                frame(40, 500.0, 900.0),
                None,
                frame(60, 100.0, 900.0),
            ]);
            let report = run_session(&config, recording).await.unwrap();
            assert_eq!(report.engine.hits_emitted, 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_demo_recording_plays() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/session.jsonl");
        let recording = Recording::load(&path).unwrap();

        let report = run_session(&KitConfig::default(), recording).await.unwrap();

        assert!(report.engine.hits_emitted >= 4);
        assert_eq!(report.commands_dropped, 0);
    }

    #[tokio::test]
    async fn test_session_rejects_incomplete_sound_bank() {
        let config = KitConfig {
            sounds: kit_playback::SoundBank::empty(),
            ..Default::default()
        };
        assert!(run_session(&config, Recording::default()).await.is_err());
    }
}
