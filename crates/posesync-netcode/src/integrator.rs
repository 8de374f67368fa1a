//! Convergence toward the remote target
//!
//! Each tick the rendered pose moves a fixed fraction of the remaining way to
//! the target: linear interpolation for position, shortest-arc spherical
//! interpolation for orientation. With a constant factor this is exponential
//! smoothing, so discontinuous network updates turn into continuous motion.

use log::trace;
use posesync_core::Pose;

/// Blend `current` toward `target` by `factor`
///
/// `factor` is clamped to `[0, 1]` (NaN counts as 0). `0` leaves the pose
/// frozen and `1` snaps straight to the target.
///
/// ```
/// use posesync_core::{DVec3, Pose};
/// use posesync_netcode::integrate;
///
/// let current = Pose::IDENTITY;
/// let target = Pose::from_position(DVec3::new(10.0, 0.0, 0.0));
///
/// let next = integrate(&current, &target, 0.5);
/// assert_eq!(next.position.x, 5.0);
/// ```
pub fn integrate(current: &Pose, target: &Pose, factor: f64) -> Pose {
    let factor = if factor.is_nan() {
        0.0
    } else {
        factor.clamp(0.0, 1.0)
    };

    if factor == 0.0 {
        return *current;
    }
    if factor == 1.0 {
        return *target;
    }

    let position = current.position.lerp(target.position, factor);
    let orientation = current.orientation.slerp(target.orientation, factor);
    Pose::new(position, orientation)
}

/// Integrator holding a fixed smoothing factor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConvergenceIntegrator {
    factor: f64,
}

impl ConvergenceIntegrator {
    /// Create an integrator; the factor is clamped to `[0, 1]`
    pub fn new(factor: f64) -> Self {
        let factor = if factor.is_nan() {
            0.0
        } else {
            factor.clamp(0.0, 1.0)
        };
        Self { factor }
    }

    /// Smoothing factor in use
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// See [`integrate`]
    pub fn integrate(&self, current: &Pose, target: &Pose) -> Pose {
        let next = integrate(current, target, self.factor);
        trace!(
            "integrate: {:.4} m / {:.3} deg remaining",
            next.distance_to(target),
            next.angle_to_degrees(target)
        );
        next
    }

    /// Whether `current` is already within the given tolerances of `target`
    pub fn has_converged(current: &Pose, target: &Pose, epsilon: f64) -> bool {
        current.distance_to(target) <= epsilon && current.angle_to_degrees(target) <= epsilon
    }
}

impl Default for ConvergenceIntegrator {
    fn default() -> Self {
        Self::new(posesync_core::SyncConfig::DEFAULT_INTERPOLATION_FACTOR)
    }
}
