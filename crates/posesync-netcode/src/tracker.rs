//! Remote target tracking
//!
//! Absorbs inbound pose updates. In baseline mode the newest arrival always
//! wins, even if it was sent earlier than the current target; in sequenced
//! mode arrivals with a counter at or below the last applied one are dropped.

use crate::{PoseSource, SyncMessage, SyncState};
use log::debug;
use posesync_core::OrderingMode;

/// Result of offering a message to the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiveOutcome {
    /// The message replaced the remote target
    Applied,
    /// The message was older than the last applied one
    Stale,
}

/// Tracks the most recent authoritative pose received from the network
#[derive(Debug, Clone, Default)]
pub struct RemoteTargetTracker {
    ordering: OrderingMode,
    last_applied_sequence: Option<u64>,
}

impl RemoteTargetTracker {
    /// Create a tracker for the given ordering mode
    pub fn new(ordering: OrderingMode) -> Self {
        Self {
            ordering,
            last_applied_sequence: None,
        }
    }

    /// Ordering mode in use
    pub fn ordering(&self) -> OrderingMode {
        self.ordering
    }

    /// Sequence number of the last applied message (sequenced mode only)
    pub fn last_applied_sequence(&self) -> Option<u64> {
        self.last_applied_sequence
    }

    /// Absorb an inbound message
    ///
    /// On apply, overwrites both the remote target and the last-sent
    /// baseline, so the evaluator does not echo the received pose back.
    pub fn on_receive(&mut self, state: &mut SyncState, message: &SyncMessage) -> ReceiveOutcome {
        if self.ordering == OrderingMode::Sequenced {
            match (message.sequence, self.last_applied_sequence) {
                (Some(incoming), Some(last)) if incoming <= last => {
                    debug!("discarding stale message {} (last applied {})", incoming, last);
                    return ReceiveOutcome::Stale;
                }
                (Some(incoming), _) => self.last_applied_sequence = Some(incoming),
                // Unsequenced input in sequenced mode cannot be ordered; apply it
                (None, _) => {}
            }
        }

        state.target = message.pose;
        state.last_sent = message.pose;
        state.source = PoseSource::Remote;
        ReceiveOutcome::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use posesync_core::{DVec3, Pose};

    fn pose_at(x: f64) -> Pose {
        Pose::from_position(DVec3::new(x, 0.0, 0.0))
    }

    #[test]
    fn test_receive_overwrites_target_and_baseline() {
        let mut tracker = RemoteTargetTracker::new(OrderingMode::Baseline);
        let mut state = SyncState::new(Pose::IDENTITY);

        let outcome = tracker.on_receive(&mut state, &SyncMessage::new(pose_at(3.0)));
        assert_eq!(outcome, ReceiveOutcome::Applied);
        assert_eq!(state.target, pose_at(3.0));
        assert_eq!(state.last_sent, pose_at(3.0));
        // Local pose is left to the integrator
        assert_eq!(state.local, Pose::IDENTITY);
    }

    #[test]
    fn test_receive_is_idempotent() {
        let mut tracker = RemoteTargetTracker::new(OrderingMode::Baseline);
        let message = SyncMessage::new(pose_at(1.0));

        let mut once = SyncState::new(Pose::IDENTITY);
        tracker.on_receive(&mut once, &message);

        let mut twice = SyncState::new(Pose::IDENTITY);
        tracker.on_receive(&mut twice, &message);
        tracker.on_receive(&mut twice, &message);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_baseline_last_writer_wins() {
        let mut tracker = RemoteTargetTracker::new(OrderingMode::Baseline);
        let mut state = SyncState::new(Pose::IDENTITY);

        tracker.on_receive(&mut state, &SyncMessage::sequenced(pose_at(2.0), 2));
        // Older update delivered late still overwrites
        tracker.on_receive(&mut state, &SyncMessage::sequenced(pose_at(1.0), 1));
        assert_eq!(state.target, pose_at(1.0));
    }

    #[test]
    fn test_sequenced_discards_stale() {
        let mut tracker = RemoteTargetTracker::new(OrderingMode::Sequenced);
        let mut state = SyncState::new(Pose::IDENTITY);

        assert_eq!(
            tracker.on_receive(&mut state, &SyncMessage::sequenced(pose_at(2.0), 2)),
            ReceiveOutcome::Applied
        );
        assert_eq!(
            tracker.on_receive(&mut state, &SyncMessage::sequenced(pose_at(1.0), 1)),
            ReceiveOutcome::Stale
        );
        assert_eq!(
            tracker.on_receive(&mut state, &SyncMessage::sequenced(pose_at(5.0), 2)),
            ReceiveOutcome::Stale
        );
        assert_eq!(state.target, pose_at(2.0));
        assert_eq!(tracker.last_applied_sequence(), Some(2));

        assert_eq!(
            tracker.on_receive(&mut state, &SyncMessage::sequenced(pose_at(3.0), 3)),
            ReceiveOutcome::Applied
        );
        assert_eq!(state.target, pose_at(3.0));
    }
}
