//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from JSON and carries
//! the server and playback sub-configs. Every section defaults sensibly
//! so a completely empty `{}` file is valid (apart from the signing
//! secret, which the server refuses to start without).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::Error;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub playback: PlaybackConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            playback: PlaybackConfig::default(),
        }
    }
}

impl Config {
    /// Deserialize a `Config` from a JSON string.
    ///
    /// This is intentionally string-based so the caller can read the file
    /// however it sees fit (async, embedded, etc.).
    pub fn from_json(json_str: &str) -> Result<Self> {
        serde_json::from_str(json_str)
            .map_err(|e| Error::Validation(format!("config parse error: {e}")))
    }

    /// Load configuration from a file path, falling back to defaults if
    /// the path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push("server.port is 0; a random port will be assigned".into());
        }

        if self.playback.token_secret.is_none() {
            warnings.push(
                "playback.token_secret is not set; the server will refuse to start".into(),
            );
        }

        if !self.playback.storage_root.exists() {
            warnings.push(format!(
                "playback.storage_root {} does not exist yet; requests will 404 until the \
                 transcoder populates it",
                self.playback.storage_root.display()
            ));
        }

        warnings
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
        }
    }
}

/// Playback delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Root of the transient session storage tree. The transcoding
    /// process creates `<root>/<session>/<codec>/<quality>/<part>.mp4`
    /// and the manifests; playgate only ever reads from it.
    pub storage_root: PathBuf,
    /// Shared secret the playback tokens are signed with. Rotatable at
    /// runtime; requests are verified against the latest value.
    pub token_secret: Option<String>,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            storage_root: PathBuf::from("/tmp/video"),
            token_secret: None,
        }
    }
}
