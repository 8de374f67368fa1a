//! Transport trait for network communication
//!
//! The sync core only needs two things from the network: push a frame to the
//! other peers, and pull whatever frames have arrived. Delivery, ordering and
//! peer discovery are the transport's business. Users implement [`Transport`]
//! for their chosen network stack (UDP, WebSocket, WebRTC, ...).

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Broadcast transport (fire-and-forget)
pub trait Transport: Send + Sync {
    /// Error type for this transport
    type Error: std::error::Error + Send + Sync + 'static;

    /// Send a frame to every peer
    ///
    /// No delivery or ordering guarantee is assumed.
    fn send(&self, data: &[u8]) -> Result<(), Self::Error>;

    /// Receive one frame (non-blocking)
    ///
    /// Returns `Ok(None)` if no data is available.
    fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error>;
}

/// Error returned by [`MemoryTransport`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MemoryTransportError {
    /// The link was cut with [`MemoryTransport::disconnect`]
    #[error("memory link is disconnected")]
    Disconnected,
}

type Queue = Arc<Mutex<VecDeque<Vec<u8>>>>;

/// In-process transport connecting two endpoints
///
/// Frames sent on one endpoint are queued for the other. Used by tests and
/// the demo; it can also simulate loss and reordering.
///
/// ```
/// use posesync_netcode::{MemoryTransport, Transport};
///
/// let (a, b) = MemoryTransport::pair();
/// a.send(b"hello").unwrap();
/// assert_eq!(b.recv().unwrap(), Some(b"hello".to_vec()));
/// assert_eq!(b.recv().unwrap(), None);
/// ```
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    inbox: Queue,
    outbox: Queue,
    connected: Arc<AtomicBool>,
}

impl MemoryTransport {
    /// Create two connected endpoints
    pub fn pair() -> (Self, Self) {
        let a_to_b: Queue = Arc::default();
        let b_to_a: Queue = Arc::default();
        let connected = Arc::new(AtomicBool::new(true));
        (
            Self {
                inbox: b_to_a.clone(),
                outbox: a_to_b.clone(),
                connected: connected.clone(),
            },
            Self {
                inbox: a_to_b,
                outbox: b_to_a,
                connected,
            },
        )
    }

    /// Number of frames waiting to be received on this endpoint
    pub fn pending(&self) -> usize {
        self.inbox.lock().len()
    }

    /// Reverse the order of frames waiting on this endpoint
    pub fn reverse_pending(&self) {
        self.inbox.lock().make_contiguous().reverse();
    }

    /// Discard frames waiting on this endpoint, returning how many were lost
    pub fn drop_pending(&self) -> usize {
        let mut inbox = self.inbox.lock();
        let count = inbox.len();
        inbox.clear();
        count
    }

    /// Queue a raw frame on this endpoint as if a peer had sent it
    pub fn inject(&self, data: Vec<u8>) {
        self.inbox.lock().push_back(data);
    }

    /// Cut the link in both directions
    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::Release);
    }

    /// Restore the link
    pub fn reconnect(&self) {
        self.connected.store(true, Ordering::Release);
    }

    /// Check if the link is up
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }
}

impl Transport for MemoryTransport {
    type Error = MemoryTransportError;

    fn send(&self, data: &[u8]) -> Result<(), Self::Error> {
        if !self.is_connected() {
            return Err(MemoryTransportError::Disconnected);
        }
        self.outbox.lock().push_back(data.to_vec());
        Ok(())
    }

    fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error> {
        Ok(self.inbox.lock().pop_front())
    }
}
