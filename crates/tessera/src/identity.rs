//! Local player identity.
//!
//! Account systems, lobby names, and preference storage all live
//! outside the engine. What the engine itself needs is small: a stable
//! string to stamp into commands this process originates. Hosts with
//! real accounts implement [`PlayerIdSource`] themselves; everyone
//! else gets a random guest id per process.

use rand::Rng;
use tessera_proto::PlayerIdSource;

/// A per-process random guest identity, e.g. `guest-3fa9c12b`.
///
/// 32 bits of randomness is plenty here — this distinguishes players
/// at one table, it is not a security token.
#[derive(Debug, Clone)]
pub struct GuestIdentity {
    id: String,
}

impl GuestIdentity {
    /// Generates a fresh guest id.
    pub fn new() -> Self {
        let mut rng = rand::rng();
        let bytes: [u8; 4] = rng.random();
        let mut id = String::with_capacity(14);
        id.push_str("guest-");
        for byte in bytes {
            id.push_str(&format!("{byte:02x}"));
        }
        Self { id }
    }
}

impl Default for GuestIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerIdSource for GuestIdentity {
    fn player_id(&self) -> String {
        self.id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_id_shape() {
        let id = GuestIdentity::new().player_id();
        assert!(id.starts_with("guest-"), "{id}");
        assert_eq!(id.len(), "guest-".len() + 8);
        assert!(id["guest-".len()..]
            .chars()
            .all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_guest_id_is_stable_within_an_instance() {
        let identity = GuestIdentity::new();
        assert_eq!(identity.player_id(), identity.player_id());
    }
}
