//! Sync message and its wire codec
//!
//! Frames are serialized with `bincode` (fixed-width little-endian):
//!
//! ```text
//! Baseline  (56 bytes): px py pz | qx qy qz qw              (f64 each)
//! Sequenced (64 bytes): px py pz | qx qy qz qw | sequence   (u64)
//! ```
//!
//! The baseline frame carries exactly the pose and nothing else, so it stays
//! byte-compatible with peers that know only position and orientation.

use crate::{Error, Result};
use posesync_core::{DQuat, DVec3, OrderingMode, Pose};
use serde::{Deserialize, Serialize};

/// Size of a baseline frame in bytes
pub const BASELINE_FRAME_LEN: usize = 7 * 8;

/// Size of a sequenced frame in bytes
pub const SEQUENCED_FRAME_LEN: usize = BASELINE_FRAME_LEN + 8;

/// Maximum deviation from unit length that is silently renormalized
pub const UNIT_TOLERANCE: f64 = 1e-3;

/// A pose update exchanged between peers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncMessage {
    /// The broadcast pose
    pub pose: Pose,
    /// Monotonic counter, present only in sequenced mode
    pub sequence: Option<u64>,
}

impl SyncMessage {
    /// Create a baseline message
    pub fn new(pose: Pose) -> Self {
        Self {
            pose,
            sequence: None,
        }
    }

    /// Create a message carrying a sequence number
    pub fn sequenced(pose: Pose, sequence: u64) -> Self {
        Self {
            pose,
            sequence: Some(sequence),
        }
    }

    pub fn position(&self) -> DVec3 {
        self.pose.position
    }

    pub fn orientation(&self) -> DQuat {
        self.pose.orientation
    }
}

#[derive(Serialize, Deserialize)]
struct WireVec3 {
    x: f64,
    y: f64,
    z: f64,
}

#[derive(Serialize, Deserialize)]
struct WireQuat {
    x: f64,
    y: f64,
    z: f64,
    w: f64,
}

#[derive(Serialize, Deserialize)]
struct BaselineFrame {
    position: WireVec3,
    orientation: WireQuat,
}

#[derive(Serialize, Deserialize)]
struct SequencedFrame {
    position: WireVec3,
    orientation: WireQuat,
    sequence: u64,
}

impl From<&Pose> for BaselineFrame {
    fn from(pose: &Pose) -> Self {
        let q = pose.orientation;
        Self {
            position: WireVec3 {
                x: pose.position.x,
                y: pose.position.y,
                z: pose.position.z,
            },
            orientation: WireQuat {
                x: q.x,
                y: q.y,
                z: q.z,
                w: q.w,
            },
        }
    }
}

/// Encoder/decoder for [`SyncMessage`] frames
///
/// # Example
///
/// ```
/// use posesync_core::{DVec3, OrderingMode, Pose};
/// use posesync_netcode::{SyncCodec, SyncMessage, BASELINE_FRAME_LEN};
///
/// let codec = SyncCodec::new(OrderingMode::Baseline);
/// let message = SyncMessage::new(Pose::from_position(DVec3::new(1.0, 2.0, 3.0)));
///
/// let bytes = codec.encode(&message).unwrap();
/// assert_eq!(bytes.len(), BASELINE_FRAME_LEN);
/// assert_eq!(codec.decode(&bytes).unwrap(), message);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncCodec {
    ordering: OrderingMode,
}

impl SyncCodec {
    /// Create a codec for the given wire format
    pub fn new(ordering: OrderingMode) -> Self {
        Self { ordering }
    }

    /// Wire format this codec speaks
    pub fn ordering(&self) -> OrderingMode {
        self.ordering
    }

    /// Expected frame size in bytes
    pub fn frame_len(&self) -> usize {
        match self.ordering {
            OrderingMode::Baseline => BASELINE_FRAME_LEN,
            OrderingMode::Sequenced => SEQUENCED_FRAME_LEN,
        }
    }

    /// Encode a message into a frame
    ///
    /// In baseline mode any sequence number is dropped. In sequenced mode
    /// the message must carry one.
    pub fn encode(&self, message: &SyncMessage) -> Result<Vec<u8>> {
        if !message.pose.is_finite() {
            return Err(Error::NonFinite);
        }
        // Re-run normalization so a hand-built Pose cannot leak a non-unit quaternion
        let pose = Pose::new(message.pose.position, message.pose.orientation);
        let base = BaselineFrame::from(&pose);

        let bytes = match self.ordering {
            OrderingMode::Baseline => bincode::serialize(&base),
            OrderingMode::Sequenced => {
                let sequence = message.sequence.ok_or_else(|| {
                    Error::Encode("sequenced format requires a sequence number".to_string())
                })?;
                bincode::serialize(&SequencedFrame {
                    position: base.position,
                    orientation: base.orientation,
                    sequence,
                })
            }
        };
        bytes.map_err(|e| Error::Encode(e.to_string()))
    }

    /// Decode and validate a frame
    pub fn decode(&self, data: &[u8]) -> Result<SyncMessage> {
        let expected = self.frame_len();
        if data.len() != expected {
            return Err(Error::LengthMismatch {
                expected,
                got: data.len(),
            });
        }

        match self.ordering {
            OrderingMode::Baseline => {
                let frame: BaselineFrame =
                    bincode::deserialize(data).map_err(|e| Error::Decode(e.to_string()))?;
                let pose = validate_pose(&frame.position, &frame.orientation)?;
                Ok(SyncMessage::new(pose))
            }
            OrderingMode::Sequenced => {
                let frame: SequencedFrame =
                    bincode::deserialize(data).map_err(|e| Error::Decode(e.to_string()))?;
                let pose = validate_pose(&frame.position, &frame.orientation)?;
                Ok(SyncMessage::sequenced(pose, frame.sequence))
            }
        }
    }
}

fn validate_pose(position: &WireVec3, orientation: &WireQuat) -> Result<Pose> {
    let position = DVec3::new(position.x, position.y, position.z);
    let orientation = DQuat::from_xyzw(orientation.x, orientation.y, orientation.z, orientation.w);
    if !position.is_finite() || !orientation.is_finite() {
        return Err(Error::NonFinite);
    }

    let length = orientation.length();
    if (length - 1.0).abs() > UNIT_TOLERANCE {
        return Err(Error::NonUnitQuaternion { length });
    }
    Ok(Pose::new(position, orientation))
}
