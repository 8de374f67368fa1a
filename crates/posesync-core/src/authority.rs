//! Local authority arbitration
//!
//! Tracks whether this peer is currently the sender of truth for the pose:
//!
//! ```text
//!            grab start                grab end
//!   Free ───────────────▶ Held ───────────────▶ Settling
//!    ▲                     ▲                       │  │
//!    │                     └─────── grab start ────┘  │
//!    └──────────────────── settle task fires ─────────┘
//! ```
//!
//! Releasing always passes through `Settling`. The settle task is keyed by a
//! generation counter bumped on every grab start, so a task scheduled before
//! a re-grab can never release the newer hold.

use crate::time::{SimClock, SimTime};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Authority state of the local peer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AuthorityState {
    /// Not held; local changes are evaluated and broadcast
    #[default]
    Free,
    /// Held by local input; outbound evaluation is suspended
    Held,
    /// Released, waiting for the settle delay to elapse
    Settling,
}

/// Handle to a scheduled settle task
///
/// Returned by [`AuthorityArbiter::grab_end`]. Hosts with their own delayed
/// callback facility can hand it back through
/// [`AuthorityArbiter::fire_settle`] once `due_at` passes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SettleTicket {
    /// Grab generation this task belongs to
    pub generation: u64,
    /// Simulation time at which the task is due
    pub due_at: SimTime,
}

/// Gate deciding whether local evaluation is active
#[derive(Debug, Clone)]
pub struct AuthorityArbiter {
    state: AuthorityState,
    settle_delay: SimTime,
    generation: u64,
    pending: Option<SettleTicket>,
    clock: SimClock,
}

impl AuthorityArbiter {
    /// Create an arbiter in the `Free` state
    pub fn new(settle_delay: SimTime) -> Self {
        Self {
            state: AuthorityState::Free,
            settle_delay: settle_delay.max(0.0),
            generation: 0,
            pending: None,
            clock: SimClock::new(),
        }
    }

    /// Current state
    pub fn state(&self) -> AuthorityState {
        self.state
    }

    /// Whether the outbound evaluator may run this tick
    pub fn is_evaluating(&self) -> bool {
        self.state == AuthorityState::Free
    }

    /// Current grab generation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The settle task currently scheduled, if any
    pub fn pending(&self) -> Option<SettleTicket> {
        self.pending
    }

    /// Configured settle delay
    pub fn settle_delay(&self) -> SimTime {
        self.settle_delay
    }

    /// The arbiter's clock
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Local input took hold of the entity
    ///
    /// Cancels any pending settle task.
    pub fn grab_start(&mut self) {
        self.generation += 1;
        if let Some(ticket) = self.pending.take() {
            debug!(
                "grab start cancelled settle task of generation {}",
                ticket.generation
            );
        }
        if self.state != AuthorityState::Held {
            debug!(
                "authority {:?} -> Held (generation {})",
                self.state, self.generation
            );
        }
        self.state = AuthorityState::Held;
    }

    /// Local input let go of the entity
    ///
    /// Moves `Held` to `Settling` and schedules the settle task. Returns
    /// `None` when nothing was held.
    pub fn grab_end(&mut self) -> Option<SettleTicket> {
        if self.state != AuthorityState::Held {
            debug!("grab end ignored in state {:?}", self.state);
            return None;
        }
        let ticket = SettleTicket {
            generation: self.generation,
            due_at: self.clock.now + self.settle_delay,
        };
        self.state = AuthorityState::Settling;
        self.pending = Some(ticket);
        debug!(
            "authority Held -> Settling, due at {} (generation {})",
            ticket.due_at, ticket.generation
        );
        Some(ticket)
    }

    /// Advance the clock by one tick and run a due settle task
    ///
    /// Returns true when this call moved the arbiter to `Free`.
    pub fn advance(&mut self, dt: SimTime) -> bool {
        self.clock.advance(dt);
        match self.pending {
            Some(ticket) if self.clock.reached(ticket.due_at) => self.fire_settle(ticket),
            _ => false,
        }
    }

    /// Run a settle task
    ///
    /// A ticket whose generation is no longer current, or that arrives when
    /// the arbiter is not `Settling`, is ignored. Returns true when the
    /// arbiter moved to `Free`.
    pub fn fire_settle(&mut self, ticket: SettleTicket) -> bool {
        if self.state != AuthorityState::Settling || ticket.generation != self.generation {
            warn!(
                "stale settle task ignored (ticket generation {}, current {}, state {:?})",
                ticket.generation, self.generation, self.state
            );
            return false;
        }
        self.pending = None;
        self.state = AuthorityState::Free;
        debug!("authority Settling -> Free (generation {})", self.generation);
        true
    }
}

impl Default for AuthorityArbiter {
    fn default() -> Self {
        Self::new(crate::SyncConfig::DEFAULT_SETTLE_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_free() {
        let arbiter = AuthorityArbiter::new(0.5);
        assert_eq!(arbiter.state(), AuthorityState::Free);
        assert!(arbiter.is_evaluating());
        assert!(arbiter.pending().is_none());
    }

    #[test]
    fn test_full_cycle() {
        let mut arbiter = AuthorityArbiter::new(0.5);

        arbiter.grab_start();
        assert_eq!(arbiter.state(), AuthorityState::Held);
        assert!(!arbiter.is_evaluating());

        let ticket = arbiter.grab_end().unwrap();
        assert_eq!(ticket.due_at, 0.5);
        assert_eq!(arbiter.state(), AuthorityState::Settling);
        assert!(!arbiter.is_evaluating());

        assert!(!arbiter.advance(0.25));
        assert_eq!(arbiter.state(), AuthorityState::Settling);

        assert!(arbiter.advance(0.25));
        assert_eq!(arbiter.state(), AuthorityState::Free);
        assert!(arbiter.pending().is_none());
    }

    #[test]
    fn test_zero_delay_still_settles() {
        let mut arbiter = AuthorityArbiter::new(0.0);
        arbiter.grab_start();
        arbiter.grab_end();
        assert_eq!(arbiter.state(), AuthorityState::Settling);

        assert!(arbiter.advance(0.0));
        assert_eq!(arbiter.state(), AuthorityState::Free);
    }

    #[test]
    fn test_regrab_cancels_settle() {
        let mut arbiter = AuthorityArbiter::new(0.5);
        arbiter.grab_start();
        let stale = arbiter.grab_end().unwrap();
        arbiter.advance(0.1);

        arbiter.grab_start();
        assert_eq!(arbiter.state(), AuthorityState::Held);
        assert!(arbiter.pending().is_none());

        // Well past the original deadline
        for _ in 0..20 {
            assert!(!arbiter.advance(0.1));
        }
        assert_eq!(arbiter.state(), AuthorityState::Held);

        // Handing the old ticket back is a no-op
        assert!(!arbiter.fire_settle(stale));
        assert_eq!(arbiter.state(), AuthorityState::Held);
    }

    #[test]
    fn test_stale_ticket_after_second_release() {
        let mut arbiter = AuthorityArbiter::new(0.5);
        arbiter.grab_start();
        let first = arbiter.grab_end().unwrap();
        arbiter.grab_start();
        let second = arbiter.grab_end().unwrap();
        assert_ne!(first.generation, second.generation);

        assert!(!arbiter.fire_settle(first));
        assert_eq!(arbiter.state(), AuthorityState::Settling);
        assert!(arbiter.fire_settle(second));
        assert_eq!(arbiter.state(), AuthorityState::Free);
    }

    #[test]
    fn test_misfire_when_free_is_noop() {
        let mut arbiter = AuthorityArbiter::new(0.5);
        arbiter.grab_start();
        let ticket = arbiter.grab_end().unwrap();
        assert!(arbiter.fire_settle(ticket));
        assert!(!arbiter.fire_settle(ticket));
        assert_eq!(arbiter.state(), AuthorityState::Free);
    }

    #[test]
    fn test_grab_end_without_grab() {
        let mut arbiter = AuthorityArbiter::new(0.5);
        assert!(arbiter.grab_end().is_none());
        assert_eq!(arbiter.state(), AuthorityState::Free);

        arbiter.grab_start();
        arbiter.grab_end();
        assert!(arbiter.grab_end().is_none());
        assert_eq!(arbiter.state(), AuthorityState::Settling);
    }
}
