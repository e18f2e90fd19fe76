//! Keep-only-latest frame handoff
//!
//! The estimator publishes at its own rate; the engine worker takes whatever
//! is newest when it is ready. Unconsumed frames are overwritten, never queued.

use tokio::sync::watch;
use tracing::debug;

use crate::PoseSnapshot;

#[derive(Debug, Clone)]
struct Published {
    seq: u64,
    pose: Option<PoseSnapshot>,
}

/// Create a connected sender/receiver pair
pub fn latest_frame() -> (FrameSender, FrameReceiver) {
    let (tx, rx) = watch::channel(None);
    (
        FrameSender { tx, seq: 0 },
        FrameReceiver {
            rx,
            last_seq: 0,
            dropped: 0,
        },
    )
}

/// Producer half, owned by the pose estimator side
pub struct FrameSender {
    tx: watch::Sender<Option<Published>>,
    seq: u64,
}

impl FrameSender {
    /// Publish a frame result (`None` = no pose in this frame).
    /// Returns false once the receiver is gone.
    pub fn publish(&mut self, pose: Option<PoseSnapshot>) -> bool {
        self.seq += 1;
        self.tx
            .send(Some(Published {
                seq: self.seq,
                pose,
            }))
            .is_ok()
    }

    /// Get the number of frames published so far
    pub fn published(&self) -> u64 {
        self.seq
    }

    /// Check whether the receiver is gone
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer half, owned by the single engine worker
pub struct FrameReceiver {
    rx: watch::Receiver<Option<Published>>,
    last_seq: u64,
    dropped: u64,
}

impl FrameReceiver {
    /// Wait for the newest unseen frame. `None` once the producer is dropped.
    pub async fn next(&mut self) -> Option<Option<PoseSnapshot>> {
        loop {
            if self.rx.changed().await.is_err() {
                return None;
            }

            let published = self.rx.borrow_and_update().clone();
            let Some(published) = published else {
                continue;
            };

            let skipped = published.seq.saturating_sub(self.last_seq + 1);
            if skipped > 0 {
                self.dropped += skipped;
                debug!("Skipped {} stale frames (total {})", skipped, self.dropped);
            }
            self.last_seq = published.seq;

            return Some(published.pose);
        }
    }

    /// Frames overwritten before the worker picked them up
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pose(ts: u64) -> PoseSnapshot {
        PoseSnapshot::new(ts, 640, 480, vec![])
    }

    #[tokio::test]
    async fn test_keeps_only_latest() {
        let (mut tx, mut rx) = latest_frame();

        assert!(tx.publish(Some(pose(1))));
        assert!(tx.publish(None));
        assert!(tx.publish(Some(pose(3))));

        let frame = rx.next().await.unwrap().unwrap();
        assert_eq!(frame.timestamp_ms, 3);
        assert_eq!(rx.dropped(), 2);
    }

    #[tokio::test]
    async fn test_no_pose_frame_is_delivered() {
        let (mut tx, mut rx) = latest_frame();

        tx.publish(None);
        assert!(matches!(rx.next().await, Some(None)));
        assert_eq!(rx.dropped(), 0);
    }

    #[tokio::test]
    async fn test_closed_after_producer_drop() {
        let (tx, mut rx) = latest_frame();
        drop(tx);
        assert!(rx.next().await.is_none());
    }

    #[tokio::test]
    async fn test_sender_sees_closed_receiver() {
        let (mut tx, rx) = latest_frame();
        drop(rx);
        assert!(tx.is_closed());
        assert!(!tx.publish(Some(pose(1))));
    }
}
