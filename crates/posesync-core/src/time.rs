//! Time system for tick-based synchronization
//!
//! - `Tick` - Logical tick counter
//! - `SimTime` - Continuous simulation time in host time units
//! - `SimClock` - Clock advanced once per simulation tick

use serde::{Deserialize, Serialize};

/// A discrete tick identifier (logical time unit)
pub type Tick = u64;

/// Simulation time in host time units (usually seconds)
pub type SimTime = f64;

/// Simulation clock state
///
/// The host drives it by calling [`SimClock::advance`] with the tick's
/// delta time. Nothing here reads a wall clock, so behavior is
/// deterministic under test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct SimClock {
    /// Number of ticks advanced so far
    pub tick: Tick,
    /// Accumulated simulation time
    pub now: SimTime,
}

impl SimClock {
    /// Create a new clock at tick 0, time 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one tick of `dt` time units
    ///
    /// Negative or non-finite deltas advance the tick but not the time.
    pub fn advance(&mut self, dt: SimTime) -> SimTime {
        self.tick += 1;
        if dt.is_finite() && dt > 0.0 {
            self.now += dt;
        }
        self.now
    }

    /// Whether `deadline` has been reached
    pub fn reached(&self, deadline: SimTime) -> bool {
        self.now >= deadline
    }
}
