//! Peer links for Tessera's command stream.
//!
//! The wire codec produces one line of text per command; this crate
//! moves those lines between peers. The [`Link`] trait abstracts over
//! the concrete pipe (TCP here; anything line-shaped works), and the
//! [`dispatcher`](run_dispatcher) drains an outbound queue onto a
//! link so game code never blocks on the network.
//!
//! The relay is intentionally dumb: it neither decodes nor validates
//! lines. Malformed input is a per-command problem handled where
//! commands are decoded, not a connection problem.

#![allow(async_fn_in_trait)]

mod dispatch;
mod error;
mod tcp;

pub use dispatch::{run_dispatcher, Outbound};
pub use error::RelayError;
pub use tcp::{TcpLink, TcpRelay};

use std::fmt;

/// Opaque identifier for a connected peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerId(u64);

impl PeerId {
    /// Creates a new `PeerId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peer-{}", self.0)
    }
}

/// A bidirectional, line-oriented connection to one peer.
pub trait Link: Send + Sync + 'static {
    /// The error type for link operations.
    type Error: std::error::Error + Send + Sync;

    /// Sends one command line. The line must not contain `\n`; encoded
    /// commands never do.
    async fn send_line(&self, line: &str) -> Result<(), Self::Error>;

    /// Receives the next command line.
    ///
    /// Returns `Ok(None)` when the peer closed the connection cleanly.
    async fn recv_line(&self) -> Result<Option<String>, Self::Error>;

    /// Closes the connection.
    async fn close(&self) -> Result<(), Self::Error>;

    /// Returns the unique identifier for this peer.
    fn id(&self) -> PeerId;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peer_id_new_and_into_inner() {
        let id = PeerId::new(42);
        assert_eq!(id.into_inner(), 42);
    }

    #[test]
    fn test_peer_id_display() {
        assert_eq!(PeerId::new(7).to_string(), "peer-7");
    }

    #[test]
    fn test_peer_id_works_as_map_key() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(PeerId::new(1), "host");
        assert_eq!(map[&PeerId::new(1)], "host");
    }
}
