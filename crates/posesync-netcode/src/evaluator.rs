//! Outbound pose delta evaluation
//!
//! Decides once per tick whether the local pose has moved far enough from
//! the last broadcast to warrant a new one. Sending is edge-triggered: the
//! baseline jumps to whatever was just emitted, so a pose that stops moving
//! stops producing messages.

use crate::SyncMessage;
use posesync_core::Pose;

/// Evaluate a pose against the last broadcast one
///
/// Emits when the position moved more than `position_threshold` meters OR
/// the orientation turned more than `rotation_threshold_degrees`. On
/// emission `last_sent` is moved to `current`.
///
/// ```
/// use posesync_core::{DVec3, Pose};
/// use posesync_netcode::evaluate;
///
/// let mut last_sent = Pose::IDENTITY;
/// let moved = Pose::from_position(DVec3::new(0.02, 0.0, 0.0));
///
/// assert!(evaluate(&moved, &mut last_sent, 0.01, 1.0).is_some());
/// assert_eq!(last_sent, moved);
/// assert!(evaluate(&moved, &mut last_sent, 0.01, 1.0).is_none());
/// ```
pub fn evaluate(
    current: &Pose,
    last_sent: &mut Pose,
    position_threshold: f64,
    rotation_threshold_degrees: f64,
) -> Option<SyncMessage> {
    let moved = current.distance_to(last_sent) > position_threshold;
    let turned = current.angle_to_degrees(last_sent) > rotation_threshold_degrees;
    if !(moved || turned) {
        return None;
    }
    *last_sent = *current;
    Some(SyncMessage::new(*current))
}

/// Delta evaluator holding its thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseDeltaEvaluator {
    /// Position threshold in meters
    pub position_threshold: f64,
    /// Rotation threshold in degrees
    pub rotation_threshold: f64,
}

impl PoseDeltaEvaluator {
    pub fn new(position_threshold: f64, rotation_threshold: f64) -> Self {
        Self {
            position_threshold,
            rotation_threshold,
        }
    }

    /// See [`evaluate`]
    pub fn evaluate(&self, current: &Pose, last_sent: &mut Pose) -> Option<SyncMessage> {
        evaluate(
            current,
            last_sent,
            self.position_threshold,
            self.rotation_threshold,
        )
    }
}

impl From<&posesync_core::SyncConfig> for PoseDeltaEvaluator {
    fn from(config: &posesync_core::SyncConfig) -> Self {
        Self::new(config.position_threshold, config.rotation_threshold)
    }
}
