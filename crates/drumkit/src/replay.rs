//! Recorded pose playback into the frame mailbox

use std::path::Path;
use std::time::Duration;

use pose_input::{FrameSender, PoseError, PoseSnapshot, ReplaySource};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Frames of a recording, in file order
#[derive(Debug, Clone, Default)]
pub struct Recording {
    frames: Vec<Option<PoseSnapshot>>,
}

impl Recording {
    /// Load a JSON-lines recording
    pub fn load(path: &Path) -> Result<Self, PoseError> {
        let frames = ReplaySource::open(path)?.collect::<Result<Vec<_>, _>>()?;
        info!("Loaded {} recorded frames", frames.len());
        Ok(Self { frames })
    }

    /// Create a recording from frames already in memory
    pub fn from_frames(frames: Vec<Option<PoseSnapshot>>) -> Self {
        Self { frames }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Clock origin for the session: the first frame carrying a pose
    pub fn origin_ms(&self) -> u64 {
        self.frames
            .iter()
            .flatten()
            .map(|pose| pose.timestamp_ms)
            .next()
            .unwrap_or(0)
    }

    /// Publish every frame, sleeping out the recorded gaps when `realtime`.
    /// The task ends when the recording runs out or the receiver is gone;
    /// dropping the sender then closes the stream.
    pub fn spawn(self, mut sender: FrameSender, realtime: bool) -> JoinHandle<u64> {
        tokio::spawn(async move {
            let mut clock = ReplayClock::default();
            for frame in self.frames {
                let wait = clock.advance(frame.as_ref());
                if realtime && !wait.is_zero() {
                    tokio::time::sleep(wait).await;
                }

                if !sender.publish(frame) {
                    debug!("Frame receiver dropped, stopping replay");
                    break;
                }
                tokio::task::yield_now().await;
            }
            sender.published()
        })
    }
}

/// Frame gap assumed before two poses have been seen
const DEFAULT_FRAME_GAP_MS: u64 = 33;

/// Replay-time position of the producer.
///
/// No-pose frames carry no timestamp, so each is placed one frame gap after
/// the frame before it. Publishing them without a wait would overwrite that
/// frame in the mailbox before the engine reads it.
#[derive(Debug, Clone, Copy)]
struct ReplayClock {
    now_ms: Option<u64>,
    frame_gap_ms: u64,
    last_was_pose: bool,
}

impl Default for ReplayClock {
    fn default() -> Self {
        Self {
            now_ms: None,
            frame_gap_ms: DEFAULT_FRAME_GAP_MS,
            last_was_pose: false,
        }
    }
}

impl ReplayClock {
    /// Move to `frame` and return how long to wait before publishing it
    fn advance(&mut self, frame: Option<&PoseSnapshot>) -> Duration {
        let gap = match (self.now_ms, frame) {
            (None, _) => 0,
            (Some(prev), Some(pose)) => {
                let gap = pose.timestamp_ms.saturating_sub(prev);
                // Gap between two recorded poses is the frame interval
                if self.last_was_pose && gap > 0 {
                    self.frame_gap_ms = gap;
                }
                gap
            }
            (Some(_), None) => self.frame_gap_ms,
        };

        self.now_ms = match (self.now_ms, frame) {
            (None, Some(pose)) => Some(pose.timestamp_ms),
            (Some(now), Some(pose)) => Some(now.max(pose.timestamp_ms)),
            (Some(now), None) => Some(now + gap),
            // Leading no-pose frames have nothing to be placed after
            (None, None) => None,
        };
        self.last_was_pose = frame.is_some();
        Duration::from_millis(gap)
    }
}
