//! Rigid-body pose (position + orientation)
//!
//! `Pose` is a plain value type. Its orientation is kept normalized by every
//! constructor, so downstream code can rely on it being a unit quaternion.

use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};

/// Position and orientation of a single entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// World-space position in meters
    pub position: DVec3,
    /// World-space orientation (unit quaternion)
    pub orientation: DQuat,
}

impl Pose {
    /// Pose at the origin with no rotation
    pub const IDENTITY: Pose = Pose {
        position: DVec3::ZERO,
        orientation: DQuat::IDENTITY,
    };

    /// Create a new pose, renormalizing the orientation
    ///
    /// A degenerate (zero-length or non-finite) orientation is replaced by
    /// the identity rotation.
    pub fn new(position: DVec3, orientation: DQuat) -> Self {
        Self {
            position,
            orientation: normalize_or_identity(orientation),
        }
    }

    /// Pose with the given position and no rotation
    pub fn from_position(position: DVec3) -> Self {
        Self {
            position,
            orientation: DQuat::IDENTITY,
        }
    }

    /// Euclidean distance between the two positions
    pub fn distance_to(&self, other: &Pose) -> f64 {
        self.position.distance(other.position)
    }

    /// Shortest-arc angle between the two orientations, in degrees
    ///
    /// `q` and `-q` describe the same rotation, so the result is always in
    /// `[0, 180]`.
    pub fn angle_to_degrees(&self, other: &Pose) -> f64 {
        let delta = self.orientation.conjugate() * other.orientation;
        (2.0 * delta.xyz().length().atan2(delta.w.abs())).to_degrees()
    }

    /// Check that all components are finite
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.orientation.is_finite()
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

fn normalize_or_identity(q: DQuat) -> DQuat {
    let length = q.length();
    if length.is_finite() && length > f64::EPSILON {
        q / length
    } else {
        DQuat::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes() {
        let pose = Pose::new(DVec3::ZERO, DQuat::from_xyzw(0.0, 0.0, 0.0, 2.0));
        assert!((pose.orientation.length() - 1.0).abs() < 1e-12);
        assert_eq!(pose.orientation, DQuat::IDENTITY);

        let degenerate = Pose::new(DVec3::ZERO, DQuat::from_xyzw(0.0, 0.0, 0.0, 0.0));
        assert_eq!(degenerate.orientation, DQuat::IDENTITY);
    }

    #[test]
    fn test_distance() {
        let a = Pose::from_position(DVec3::new(1.0, 2.0, 3.0));
        let b = Pose::from_position(DVec3::new(4.0, 6.0, 3.0));
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_angle_degrees() {
        let a = Pose::IDENTITY;
        let b = Pose::new(DVec3::ZERO, DQuat::from_rotation_y(90f64.to_radians()));
        assert!((a.angle_to_degrees(&b) - 90.0).abs() < 1e-9);
        assert!((b.angle_to_degrees(&a) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_angle_uses_shortest_arc() {
        let a = Pose::new(DVec3::ZERO, DQuat::from_rotation_z(10f64.to_radians()));
        let negated = Pose {
            position: DVec3::ZERO,
            orientation: -a.orientation,
        };
        assert!(a.angle_to_degrees(&negated) < 1e-9);

        let b = Pose::new(DVec3::ZERO, DQuat::from_rotation_z(350f64.to_radians()));
        assert!((a.angle_to_degrees(&b) - 20.0).abs() < 1e-9);
    }
}
