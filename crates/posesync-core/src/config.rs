//! Sync configuration
//!
//! Thresholds, smoothing and settle settings for a single synchronized pose.
//! Every value is checked eagerly by [`SyncConfig::validate`] so that a bad
//! setup fails at construction time instead of misbehaving during ticks
//! (a zero threshold, for example, would broadcast on every tick).

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// How inbound messages are ordered against each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OrderingMode {
    /// Position + orientation only; last writer wins
    #[default]
    Baseline,
    /// Messages carry a monotonic counter and older ones are discarded
    Sequenced,
}

/// Configuration for pose synchronization
///
/// # Example
///
/// ```
/// use posesync_core::SyncConfig;
///
/// let config = SyncConfig::default()
///     .with_position_threshold(0.05)
///     .with_settle_delay(0.25);
/// assert!(config.validate().is_ok());
///
/// let bad = SyncConfig::default().with_position_threshold(-1.0);
/// assert!(bad.validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Minimum position change (meters) that triggers a broadcast
    pub position_threshold: f64,
    /// Minimum rotation change (degrees) that triggers a broadcast
    pub rotation_threshold: f64,
    /// Per-tick smoothing factor toward the remote target, in `[0, 1]`
    pub interpolation_factor: f64,
    /// Delay after a release before local evaluation resumes
    pub settle_delay: f64,
    /// Ordering strictness for inbound messages
    pub ordering: OrderingMode,
}

impl SyncConfig {
    /// Default position threshold, one centimeter
    pub const DEFAULT_POSITION_THRESHOLD: f64 = 0.01;
    /// Default rotation threshold in degrees
    pub const DEFAULT_ROTATION_THRESHOLD: f64 = 1.0;
    /// Default per-tick smoothing factor
    pub const DEFAULT_INTERPOLATION_FACTOR: f64 = 0.3;
    /// Default settle delay in simulation time units
    pub const DEFAULT_SETTLE_DELAY: f64 = 0.5;

    /// Parse a configuration from RON text and validate it
    ///
    /// Missing fields fall back to their defaults.
    ///
    /// ```
    /// use posesync_core::{OrderingMode, SyncConfig};
    ///
    /// let config = SyncConfig::from_ron("(position_threshold: 0.02, ordering: Sequenced)").unwrap();
    /// assert_eq!(config.position_threshold, 0.02);
    /// assert_eq!(config.ordering, OrderingMode::Sequenced);
    /// assert_eq!(config.settle_delay, SyncConfig::DEFAULT_SETTLE_DELAY);
    /// ```
    pub fn from_ron(text: &str) -> Result<Self> {
        let config: SyncConfig =
            ron::from_str(text).map_err(|e| Error::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration as RON text
    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| Error::ConfigParse(e.to_string()))
    }

    /// Check every field against its allowed range
    pub fn validate(&self) -> Result<()> {
        if !self.position_threshold.is_finite() || self.position_threshold <= 0.0 {
            return Err(Error::invalid(
                "position_threshold",
                format!("must be finite and > 0, got {}", self.position_threshold),
            ));
        }
        if !self.rotation_threshold.is_finite() || self.rotation_threshold <= 0.0 {
            return Err(Error::invalid(
                "rotation_threshold",
                format!("must be finite and > 0, got {}", self.rotation_threshold),
            ));
        }
        if !(0.0..=1.0).contains(&self.interpolation_factor) {
            return Err(Error::invalid(
                "interpolation_factor",
                format!("must be in [0, 1], got {}", self.interpolation_factor),
            ));
        }
        if !self.settle_delay.is_finite() || self.settle_delay < 0.0 {
            return Err(Error::invalid(
                "settle_delay",
                format!("must be finite and >= 0, got {}", self.settle_delay),
            ));
        }
        Ok(())
    }

    /// Set the position threshold (meters)
    pub fn with_position_threshold(mut self, meters: f64) -> Self {
        self.position_threshold = meters;
        self
    }

    /// Set the rotation threshold (degrees)
    pub fn with_rotation_threshold(mut self, degrees: f64) -> Self {
        self.rotation_threshold = degrees;
        self
    }

    /// Set the per-tick smoothing factor
    pub fn with_interpolation_factor(mut self, factor: f64) -> Self {
        self.interpolation_factor = factor;
        self
    }

    /// Set the delay between release and resumed evaluation
    pub fn with_settle_delay(mut self, delay: f64) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Set the ordering mode for inbound messages
    pub fn with_ordering(mut self, ordering: OrderingMode) -> Self {
        self.ordering = ordering;
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            position_threshold: Self::DEFAULT_POSITION_THRESHOLD,
            rotation_threshold: Self::DEFAULT_ROTATION_THRESHOLD,
            interpolation_factor: Self::DEFAULT_INTERPOLATION_FACTOR,
            settle_delay: Self::DEFAULT_SETTLE_DELAY,
            ordering: OrderingMode::Baseline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SyncConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_thresholds() {
        let err = SyncConfig::default()
            .with_position_threshold(0.0)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfig {
                field: "position_threshold",
                ..
            }
        ));

        let err = SyncConfig::default()
            .with_rotation_threshold(-5.0)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfig {
                field: "rotation_threshold",
                ..
            }
        ));

        assert!(SyncConfig::default()
            .with_position_threshold(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_factor_extremes_are_valid() {
        assert!(SyncConfig::default()
            .with_interpolation_factor(0.0)
            .validate()
            .is_ok());
        assert!(SyncConfig::default()
            .with_interpolation_factor(1.0)
            .validate()
            .is_ok());
        assert!(SyncConfig::default()
            .with_interpolation_factor(1.5)
            .validate()
            .is_err());
        assert!(SyncConfig::default()
            .with_interpolation_factor(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_setters_apply_each_field() {
        let config = SyncConfig::default()
            .with_position_threshold(0.02)
            .with_rotation_threshold(3.0)
            .with_interpolation_factor(0.5)
            .with_settle_delay(1.0)
            .with_ordering(OrderingMode::Sequenced);
        assert_eq!(config.position_threshold, 0.02);
        assert_eq!(config.rotation_threshold, 3.0);
        assert_eq!(config.interpolation_factor, 0.5);
        assert_eq!(config.settle_delay, 1.0);
        assert_eq!(config.ordering, OrderingMode::Sequenced);
    }

    #[test]
    fn test_settle_delay_range() {
        assert!(SyncConfig::default().with_settle_delay(0.0).validate().is_ok());
        assert!(SyncConfig::default()
            .with_settle_delay(-0.1)
            .validate()
            .is_err());
        assert!(SyncConfig::default()
            .with_settle_delay(f64::INFINITY)
            .validate()
            .is_err());
    }

    #[test]
    fn test_ron_roundtrip_and_defaults() {
        let config = SyncConfig::default()
            .with_rotation_threshold(2.5)
            .with_ordering(OrderingMode::Sequenced);
        let text = config.to_ron().unwrap();
        assert_eq!(SyncConfig::from_ron(&text).unwrap(), config);

        let partial = SyncConfig::from_ron("(interpolation_factor: 1.0)").unwrap();
        assert_eq!(partial.interpolation_factor, 1.0);
        assert_eq!(
            partial.position_threshold,
            SyncConfig::DEFAULT_POSITION_THRESHOLD
        );
    }

    #[test]
    fn test_ron_rejects_invalid_values() {
        assert!(matches!(
            SyncConfig::from_ron("(position_threshold: -0.5)"),
            Err(Error::InvalidConfig { .. })
        ));
        assert!(matches!(
            SyncConfig::from_ron("(position_threshold: "),
            Err(Error::ConfigParse(_))
        ));
    }
}
