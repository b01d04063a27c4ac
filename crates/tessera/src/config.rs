//! Engine connection configuration.
//!
//! Where the community server lives: host, port, SSL, and the derived
//! URLs the frontend links to. Read from a small JSON file next to the
//! installation; a missing or unreadable file is an error in the log,
//! never a startup failure — the defaults point at a local server.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Connection settings for the engine's server-side services.
///
/// `#[serde(default)]` on the struct means a config file only has to
/// mention the fields it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Whether to speak https/wss to the server.
    pub use_ssl: bool,
    /// Server host name or address.
    pub server: String,
    /// Server port.
    pub port: u16,
    /// Wiki path appended to the server URL.
    pub wiki: String,
    /// Forum path appended to the server URL.
    pub forum: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            use_ssl: false,
            server: "127.0.0.1".to_owned(),
            port: 5050,
            wiki: "/wiki".to_owned(),
            forum: "/forum".to_owned(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from a JSON file, falling back to defaults
    /// (with a logged error) when the file is missing or malformed.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(error) => {
                tracing::error!(path = %path.display(), %error, "error reading configuration file, using defaults");
                return Self::default();
            }
        };
        match serde_json::from_str(&text) {
            Ok(config) => config,
            Err(error) => {
                tracing::error!(path = %path.display(), %error, "error parsing configuration file, using defaults");
                Self::default()
            }
        }
    }

    /// The base server URL, scheme included.
    pub fn server_url(&self) -> String {
        let scheme = if self.use_ssl { "https" } else { "http" };
        format!("{scheme}://{}", self.server)
    }

    /// The server URL with the port appended.
    pub fn server_url_and_port(&self) -> String {
        format!("{}:{}", self.server_url(), self.port)
    }

    /// Full URL of the wiki.
    pub fn wiki_url(&self) -> String {
        format!("{}{}", self.server_url(), self.wiki)
    }

    /// Full URL of the forum.
    pub fn forum_url(&self) -> String {
        format!("{}{}", self.server_url(), self.forum)
    }
}
