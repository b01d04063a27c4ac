//! Acting-player identity hook.
//!
//! A move-piece line may omit its trailing acting-player field (older
//! peers never wrote it). The decoder fills the gap from a
//! [`PlayerIdSource`] — whatever the hosting application considers "the
//! local player". Tessera does not decide what a player id looks like;
//! preference storage, accounts, and lobby names all live outside this
//! crate, so the hook is a single-method trait the host implements.

/// Supplies the local player's id for commands that need a default.
///
/// `Send + Sync` because the codec holding it may be shared across
/// threads; implementations should be cheap — this is consulted once
/// per decoded move.
pub trait PlayerIdSource: Send + Sync {
    /// The id to stamp into commands acting on the local player's
    /// behalf.
    fn player_id(&self) -> String;
}

/// A [`PlayerIdSource`] returning a fixed string.
///
/// The codec's default is `FixedIdentity::anonymous()`; tests and
/// single-player tools pin whatever id they need.
#[derive(Debug, Clone, Default)]
pub struct FixedIdentity(String);

impl FixedIdentity {
    /// An identity that always answers with `id`.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The empty identity used when nothing is configured.
    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl PlayerIdSource for FixedIdentity {
    fn player_id(&self) -> String {
        self.0.clone()
    }
}
