//! Pose synchronization for one entity
//!
//! [`PoseSync`] wires the authority arbiter, delta evaluator, remote target
//! tracker and convergence integrator around a single owned [`SyncState`].
//! One call to [`PoseSync::tick`] runs the whole per-tick pipeline:
//!
//! ```text
//!  advance settle clock ──▶ evaluate + send (Free only)
//!                                   │
//!         drain transport ◀─────────┘
//!                │
//!                ▼
//!  integrate local pose toward target (unless host-authored)
//! ```

use crate::{
    ConvergenceIntegrator, PoseDeltaEvaluator, PoseSource, ReceiveOutcome, RemoteTargetTracker,
    Result, SyncCodec, SyncMessage, SyncState, SyncStats, Transport,
};
use log::{debug, warn};
use posesync_core::{
    AuthorityArbiter, AuthorityState, OrderingMode, Pose, SettleTicket, SimTime, SyncConfig,
};

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Pose after integration (what the host should render)
    pub pose: Pose,
    /// Message emitted this tick, if any
    pub sent: Option<SyncMessage>,
    /// Whether the settle period ended this tick
    pub released: bool,
    /// Number of inbound frames drained from the transport
    pub received: usize,
}

/// Synchronizes the pose of a single entity with remote peers
///
/// # Example
///
/// ```
/// use posesync_core::{DVec3, Pose, SyncConfig};
/// use posesync_netcode::{MemoryTransport, PoseSync};
///
/// let (link_a, link_b) = MemoryTransport::pair();
/// let mut a = PoseSync::new(SyncConfig::default(), Pose::IDENTITY, link_a).unwrap();
/// let mut b = PoseSync::new(SyncConfig::default(), Pose::IDENTITY, link_b).unwrap();
///
/// a.set_local_pose(Pose::from_position(DVec3::new(1.0, 0.0, 0.0)));
/// assert!(a.tick(0.016).sent.is_some());
///
/// let report = b.tick(0.016);
/// assert_eq!(report.received, 1);
/// assert_eq!(b.target().position.x, 1.0);
/// assert!(report.pose.position.x > 0.0);
/// ```
#[derive(Debug)]
pub struct PoseSync<T: Transport> {
    config: SyncConfig,
    state: SyncState,
    arbiter: AuthorityArbiter,
    evaluator: PoseDeltaEvaluator,
    tracker: RemoteTargetTracker,
    integrator: ConvergenceIntegrator,
    codec: SyncCodec,
    transport: T,
    /// Highest sequence number sent or applied (sequenced mode)
    sequence: u64,
    stats: SyncStats,
}

impl<T: Transport> PoseSync<T> {
    /// Create a sync for an entity spawned at `spawn`
    ///
    /// The configuration is validated first; nothing is built from a bad one.
    pub fn new(config: SyncConfig, spawn: Pose, transport: T) -> Result<Self> {
        config.validate()?;
        debug!(
            "pose sync created: {:?} ordering, thresholds {} m / {} deg",
            config.ordering, config.position_threshold, config.rotation_threshold
        );
        Ok(Self {
            config,
            state: SyncState::new(spawn),
            arbiter: AuthorityArbiter::new(config.settle_delay),
            evaluator: PoseDeltaEvaluator::from(&config),
            tracker: RemoteTargetTracker::new(config.ordering),
            integrator: ConvergenceIntegrator::new(config.interpolation_factor),
            codec: SyncCodec::new(config.ordering),
            transport,
            sequence: 0,
            stats: SyncStats::default(),
        })
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    /// Current local (rendered) pose
    pub fn pose(&self) -> Pose {
        self.state.local
    }

    /// Last pose received from the network
    pub fn target(&self) -> Pose {
        self.state.target
    }

    /// Last pose broadcast by this peer
    pub fn last_sent(&self) -> Pose {
        self.state.last_sent
    }

    pub fn authority(&self) -> AuthorityState {
        self.arbiter.state()
    }

    pub fn arbiter(&self) -> &AuthorityArbiter {
        &self.arbiter
    }

    pub fn stats(&self) -> SyncStats {
        self.stats
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Report a locally-authored pose (user manipulation, local physics)
    ///
    /// The authored pose stays put until a newer remote update arrives, and
    /// is evaluated for broadcast on every `Free` tick. Motion produced by
    /// convergence toward a received target is never re-broadcast.
    /// Non-finite poses are rejected; the orientation is renormalized.
    pub fn set_local_pose(&mut self, pose: Pose) {
        if !pose.is_finite() {
            self.stats.rejected_local += 1;
            warn!("ignoring non-finite local pose {:?}", pose);
            return;
        }
        self.state.local = Pose::new(pose.position, pose.orientation);
        self.state.source = PoseSource::Local;
    }

    /// Grab started: suspend outbound evaluation
    pub fn on_grab_start(&mut self) {
        self.arbiter.grab_start();
    }

    /// Grab ended: enter the settle period
    ///
    /// The returned ticket may be handed back through
    /// [`PoseSync::on_settle_elapsed`] by hosts that run their own timers;
    /// otherwise [`PoseSync::tick`] fires it when due.
    pub fn on_grab_end(&mut self) -> Option<SettleTicket> {
        self.arbiter.grab_end()
    }

    /// Settle delay elapsed for `ticket`
    ///
    /// Stale tickets are ignored. Returns true when authority returned to
    /// `Free`.
    pub fn on_settle_elapsed(&mut self, ticket: SettleTicket) -> bool {
        let released = self.arbiter.fire_settle(ticket);
        if released {
            self.rebaseline();
        }
        released
    }

    /// Absorb a decoded message from a peer
    pub fn on_receive(&mut self, message: SyncMessage) -> ReceiveOutcome {
        self.stats.received += 1;
        let outcome = self.tracker.on_receive(&mut self.state, &message);
        match outcome {
            ReceiveOutcome::Applied => {
                self.stats.applied += 1;
                if let Some(sequence) = message.sequence {
                    self.sequence = self.sequence.max(sequence);
                }
            }
            ReceiveOutcome::Stale => self.stats.discarded_stale += 1,
        }
        outcome
    }

    /// Decode a raw frame and absorb it
    ///
    /// Malformed frames are counted and returned as an error; state is left
    /// untouched.
    pub fn on_receive_bytes(&mut self, data: &[u8]) -> Result<ReceiveOutcome> {
        match self.codec.decode(data) {
            Ok(message) => Ok(self.on_receive(message)),
            Err(e) => {
                self.stats.malformed += 1;
                Err(e)
            }
        }
    }

    /// Drain every frame waiting on the transport
    ///
    /// Returns the number of frames pulled, malformed ones included.
    pub fn poll_transport(&mut self) -> usize {
        let mut count = 0;
        loop {
            match self.transport.recv() {
                Ok(Some(frame)) => {
                    count += 1;
                    if let Err(e) = self.on_receive_bytes(&frame) {
                        warn!("dropping malformed pose frame: {}", e);
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("transport receive failed: {}", e);
                    break;
                }
            }
        }
        count
    }

    /// Run one simulation tick of `dt` time units
    pub fn tick(&mut self, dt: SimTime) -> TickReport {
        let released = self.arbiter.advance(dt);
        if released {
            self.rebaseline();
        }

        let sent = if self.arbiter.is_evaluating() && self.state.source == PoseSource::Local {
            self.evaluate_and_send()
        } else {
            None
        };

        let received = self.poll_transport();

        // A host-authored pose holds still until a newer remote update arrives
        if self.state.source == PoseSource::Remote {
            self.state.local = self
                .integrator
                .integrate(&self.state.local, &self.state.target);
        }

        TickReport {
            pose: self.state.local,
            sent,
            released,
            received,
        }
    }

    fn rebaseline(&mut self) {
        self.state.last_sent = self.state.local;
        debug!("baseline reset to local pose after settle");
    }

    fn evaluate_and_send(&mut self) -> Option<SyncMessage> {
        let mut message = self
            .evaluator
            .evaluate(&self.state.local, &mut self.state.last_sent)?;
        if self.config.ordering == OrderingMode::Sequenced {
            self.sequence += 1;
            message.sequence = Some(self.sequence);
        }

        let sent = self
            .codec
            .encode(&message)
            .and_then(|frame| {
                self.transport
                    .send(&frame)
                    .map_err(|e| crate::Error::Transport(e.to_string()))
            });
        match sent {
            Ok(()) => {
                self.stats.sent += 1;
                debug!(
                    "sent pose {:?} (sequence {:?})",
                    message.pose.position, message.sequence
                );
            }
            Err(e) => {
                self.stats.send_failures += 1;
                warn!("pose broadcast failed: {}", e);
            }
        }
        Some(message)
    }
}
