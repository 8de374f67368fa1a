//! Thread-safe handle around [`PoseSync`]
//!
//! Transports that deliver on their own thread, and input systems raising
//! grab events from callbacks, share one `PoseSync` through this handle. All
//! entry points take the same lock, so a receive is fully visible to the
//! next tick and a grab start can never interleave with a settle task.

use crate::{PoseSync, ReceiveOutcome, Result, SyncMessage, SyncStats, TickReport, Transport};
use parking_lot::Mutex;
use posesync_core::{AuthorityState, Pose, SettleTicket, SimTime};
use std::sync::Arc;

/// Cloneable, lock-protected [`PoseSync`]
#[derive(Debug)]
pub struct SharedPoseSync<T: Transport> {
    inner: Arc<Mutex<PoseSync<T>>>,
}

impl<T: Transport> Clone for SharedPoseSync<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Transport> SharedPoseSync<T> {
    pub fn new(sync: PoseSync<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(sync)),
        }
    }

    pub fn tick(&self, dt: SimTime) -> TickReport {
        self.inner.lock().tick(dt)
    }

    pub fn on_receive(&self, message: SyncMessage) -> ReceiveOutcome {
        self.inner.lock().on_receive(message)
    }

    pub fn on_receive_bytes(&self, data: &[u8]) -> Result<ReceiveOutcome> {
        self.inner.lock().on_receive_bytes(data)
    }

    pub fn on_grab_start(&self) {
        self.inner.lock().on_grab_start()
    }

    pub fn on_grab_end(&self) -> Option<SettleTicket> {
        self.inner.lock().on_grab_end()
    }

    pub fn on_settle_elapsed(&self, ticket: SettleTicket) -> bool {
        self.inner.lock().on_settle_elapsed(ticket)
    }

    pub fn set_local_pose(&self, pose: Pose) {
        self.inner.lock().set_local_pose(pose)
    }

    pub fn pose(&self) -> Pose {
        self.inner.lock().pose()
    }

    pub fn target(&self) -> Pose {
        self.inner.lock().target()
    }

    pub fn authority(&self) -> AuthorityState {
        self.inner.lock().authority()
    }

    pub fn stats(&self) -> SyncStats {
        self.inner.lock().stats()
    }

    /// Run `f` with exclusive access to the underlying sync
    pub fn with<R>(&self, f: impl FnOnce(&mut PoseSync<T>) -> R) -> R {
        f(&mut *self.inner.lock())
    }
}
