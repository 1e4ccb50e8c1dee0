//! Shared application context.
//!
//! [`AppContext`] is the central struct shared across all route handlers
//! via Axum state. It wraps the immutable configuration snapshot and the
//! read-only storage collaborators in `Arc`s, and the signing secret in
//! a [`SecretStore`] that supports out-of-band rotation.

use std::sync::Arc;

use parking_lot::RwLock;

use playgate_core::config::Config;
use playgate_core::{Error, Result};

use crate::engine::{SessionDirEngine, TranscodingEngine};
use crate::store::SegmentStore;

// ---------------------------------------------------------------------------
// SecretStore
// ---------------------------------------------------------------------------

/// Process-wide signing secret with out-of-band rotation.
///
/// The secret is read fresh on every authorization call and replaced as
/// a whole value on rotation, so readers never observe a partially
/// updated key and never cache a stale one.
#[derive(Debug)]
pub struct SecretStore {
    secret: RwLock<Option<String>>,
}

impl SecretStore {
    /// Build a store from the configured secret, if any.
    pub fn new(initial: Option<String>) -> Self {
        Self {
            secret: RwLock::new(initial),
        }
    }

    /// Fetch the current signing secret.
    ///
    /// An unconfigured store is an infrastructure failure, not an
    /// authorization failure — callers surface it as a server error.
    pub fn current(&self) -> Result<String> {
        self.secret
            .read()
            .clone()
            .ok_or_else(|| Error::Internal("signing secret is not configured".into()))
    }

    /// Replace the signing secret. Tokens signed with the previous value
    /// stop verifying immediately.
    pub fn rotate(&self, secret: impl Into<String>) {
        *self.secret.write() = Some(secret.into());
    }
}

// ---------------------------------------------------------------------------
// AppContext
// ---------------------------------------------------------------------------

/// Application context shared by all request handlers (via Axum state).
///
/// This is cheaply cloneable because it only holds `Arc`s.
#[derive(Clone)]
pub struct AppContext {
    /// Immutable application configuration snapshot.
    pub config: Arc<Config>,
    /// Rotatable playback-token signing secret.
    pub secrets: Arc<SecretStore>,
    /// Read-only view of the per-session segment tree.
    pub store: Arc<SegmentStore>,
    /// Manifest-body source (the transcoding engine boundary).
    pub engine: Arc<dyn TranscodingEngine>,
}

impl AppContext {
    /// Build a context from the configuration.
    pub fn new(config: Config) -> Self {
        let root = config.playback.storage_root.clone();
        Self {
            secrets: Arc::new(SecretStore::new(config.playback.token_secret.clone())),
            store: Arc::new(SegmentStore::new(root.clone())),
            engine: Arc::new(SessionDirEngine::new(root)),
            config: Arc::new(config),
        }
    }
}
