//! Async frame loop between the pose mailbox and an event sink

use pose_input::FrameReceiver;
use serde::Serialize;
use tracing::info;

use crate::engine::{EngineState, GestureEngine};
use crate::event::EventSink;
use crate::GestureError;

/// What one run of the loop did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoopSummary {
    pub frames_processed: u64,
    /// Frames overwritten in the mailbox before the loop picked them up
    pub frames_dropped: u64,
    pub events_emitted: u64,
}

/// Drive `engine` until the producer hangs up. Engine state is left as-is
/// when the stream ends.
pub async fn run_frame_loop<S: EventSink + ?Sized>(
    engine: &mut GestureEngine,
    frames: &mut FrameReceiver,
    sink: &mut S,
) -> Result<LoopSummary, GestureError> {
    if engine.state() == EngineState::Idle {
        return Err(GestureError::SessionNotStarted);
    }

    let mut summary = LoopSummary::default();
    while let Some(pose) = frames.next().await {
        let events = engine.process_and_dispatch(pose.as_ref(), sink);
        summary.frames_processed += 1;
        summary.events_emitted += events.len() as u64;
    }
    summary.frames_dropped = frames.dropped();

    info!(
        "Pose stream ended: {} frames processed, {} dropped, {} hits",
        summary.frames_processed, summary.frames_dropped, summary.events_emitted
    );
    Ok(summary)
}
