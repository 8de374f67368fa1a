//! Posesync Netcode - Pose synchronization over an unreliable network
//!
//! Keeps one entity's pose in step across peers:
//!
//! - **Codec**: fixed-size `bincode` frames carrying position + orientation
//! - **Remote target tracking**: last-writer-wins (or sequenced) inbound updates
//! - **Delta evaluation**: edge-triggered broadcast when movement passes a threshold
//! - **Convergence**: per-tick exponential smoothing toward the remote target
//! - **Authority**: outbound evaluation suspended while the entity is held
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                        PoseSync                            │
//! │  ┌───────────────┐   ┌───────────────┐   ┌──────────────┐  │
//! │  │   Authority   │──▶│ Delta         │──▶│  Transport   │──┼──▶ peers
//! │  │   Arbiter     │   │ Evaluator     │   │  (send)      │  │
//! │  └───────────────┘   └───────────────┘   └──────────────┘  │
//! │                              ▲                             │
//! │                        SyncState                           │
//! │                              │                             │
//! │  ┌───────────────┐   ┌───────────────┐   ┌──────────────┐  │
//! │  │ Convergence   │◀──│ Remote Target │◀──│  Transport   │◀─┼─── peers
//! │  │ Integrator    │   │ Tracker       │   │  (recv)      │  │
//! │  └───────────────┘   └───────────────┘   └──────────────┘  │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use posesync_core::{Pose, SyncConfig};
//! use posesync_netcode::PoseSync;
//!
//! let mut sync = PoseSync::new(SyncConfig::default(), spawn_pose, transport)?;
//!
//! // Host loop
//! loop {
//!     if let Some(grab) = poll_grab_events() {
//!         match grab {
//!             Grab::Start => sync.on_grab_start(),
//!             Grab::End => { sync.on_grab_end(); }
//!         }
//!     }
//!     if let Some(pose) = locally_authored_pose() {
//!         sync.set_local_pose(pose);
//!     }
//!     let report = sync.tick(dt);
//!     render(report.pose);
//! }
//! ```

mod codec;
mod error;
mod evaluator;
mod integrator;
mod shared;
mod state;
mod sync;
mod tracker;
mod transport;

pub use codec::{
    SyncCodec, SyncMessage, BASELINE_FRAME_LEN, SEQUENCED_FRAME_LEN, UNIT_TOLERANCE,
};
pub use error::{Error, Result};
pub use evaluator::{evaluate, PoseDeltaEvaluator};
pub use integrator::{integrate, ConvergenceIntegrator};
pub use shared::SharedPoseSync;
pub use state::{PoseSource, SyncState, SyncStats};
pub use sync::{PoseSync, TickReport};
pub use tracker::{ReceiveOutcome, RemoteTargetTracker};
pub use transport::{MemoryTransport, MemoryTransportError, Transport};

// Re-export core types for convenience
pub use posesync_core::{AuthorityState, OrderingMode, Pose, SettleTicket, SyncConfig};
