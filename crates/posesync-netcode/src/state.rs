//! Owned pose state shared by the evaluator, tracker and integrator

use posesync_core::Pose;
use serde::{Deserialize, Serialize};

/// Which side wrote the local pose most recently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PoseSource {
    /// Received from a peer; the local pose converges toward the target
    #[default]
    Remote,
    /// Authored by the host; the local pose is the source of truth
    Local,
}

/// All mutable pose state of one synchronized entity
///
/// Every field starts from the entity's transform at spawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SyncState {
    /// Pose as currently rendered / authored locally
    pub local: Pose,
    /// Last pose this peer broadcast (comparison baseline)
    pub last_sent: Pose,
    /// Last pose received from the network
    pub target: Pose,
    /// Writer of the most recent pose
    pub source: PoseSource,
}

impl SyncState {
    /// Initialize every slot from the spawn pose
    pub fn new(spawn: Pose) -> Self {
        Self {
            local: spawn,
            last_sent: spawn,
            target: spawn,
            source: PoseSource::Remote,
        }
    }
}

/// Counters for a synchronized entity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncStats {
    /// Messages handed to the transport successfully
    pub sent: u64,
    /// Emissions the transport refused
    pub send_failures: u64,
    /// Messages offered to the tracker
    pub received: u64,
    /// Messages that replaced the remote target
    pub applied: u64,
    /// Messages discarded as older than the last applied one
    pub discarded_stale: u64,
    /// Frames that failed to decode
    pub malformed: u64,
    /// Host poses rejected as non-finite
    pub rejected_local: u64,
}
