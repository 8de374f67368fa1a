//! Error types for posesync-netcode

use thiserror::Error;

/// Netcode error type
///
/// None of these are fatal to the host; callers log and move on.
#[derive(Debug, Error)]
pub enum Error {
    /// Frame has the wrong size for the configured wire format
    #[error("Frame length mismatch: expected {expected} bytes, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    /// Frame could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Message could not be encoded
    #[error("Encode error: {0}")]
    Encode(String),

    /// A position or orientation component is NaN or infinite
    #[error("Message contains non-finite components")]
    NonFinite,

    /// Orientation is too far from unit length to renormalize
    #[error("Orientation is not a unit quaternion (length {length})")]
    NonUnitQuaternion { length: f64 },

    /// Transport error
    #[error("Transport error: {0}")]
    Transport(String),

    /// Core error
    #[error("core error: {0}")]
    Core(#[from] posesync_core::Error),
}

/// Result type for netcode operations
pub type Result<T> = std::result::Result<T, Error>;
