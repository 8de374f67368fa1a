//! Posesync Core - Pose math and authority policy
//!
//! This crate holds the transport-agnostic half of pose synchronization:
//! - `Pose` value type on top of `glam` double-precision math
//! - `SyncConfig` with eager validation and RON loading
//! - Tick-based `SimClock`
//! - `AuthorityArbiter` state machine (Free / Held / Settling)
//!
//! The network side (wire codec, transport, evaluator, integrator) lives in
//! `posesync-netcode`.

mod authority;
mod config;
mod error;
mod pose;
pub mod time;

pub use authority::{AuthorityArbiter, AuthorityState, SettleTicket};
pub use config::{OrderingMode, SyncConfig};
pub use error::{Error, Result};
pub use pose::Pose;
pub use time::{SimClock, SimTime, Tick};

// Re-export math types so downstream crates agree on the glam version
pub use glam::{DQuat, DVec3};
