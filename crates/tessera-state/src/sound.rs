//! Audio hook for play-clip commands.
//!
//! The engine transports clip names; something else makes noise. The
//! desktop frontend plugs a real player in here, headless peers (and
//! tests) keep the default.

/// Receives the names of clips that peers asked this process to play.
pub trait SoundSink: Send + Sync {
    /// Plays (or ignores) the named clip.
    fn play(&self, clip: &str);
}

/// A [`SoundSink`] that only notes the request in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSound;

impl SoundSink for NullSound {
    fn play(&self, clip: &str) {
        tracing::debug!(clip, "no sound sink configured, clip dropped");
    }
}
