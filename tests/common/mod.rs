//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates a temp storage tree, a signed
//! secret, and a full [`AppContext`]. The [`with_server`] constructor
//! starts Axum on a random port for HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;

use playgate_core::config::Config;
use playgate_server::context::AppContext;
use playgate_server::router::build_router;
use playgate_server::token;

/// Signing secret used across the integration suite.
pub const TEST_SECRET: &str = "integration-test-secret";

/// Test harness wrapping a fully-constructed [`AppContext`] backed by a
/// temporary storage tree.
pub struct TestHarness {
    pub ctx: AppContext,
    storage: Option<tempfile::TempDir>,
}

impl TestHarness {
    /// Create a new harness with a temp storage root and the test secret.
    pub fn new() -> Self {
        let storage = tempfile::tempdir().expect("failed to create storage root");
        let mut config = Config::default();
        config.playback.storage_root = storage.path().to_path_buf();
        config.playback.token_secret = Some(TEST_SECRET.to_string());

        Self {
            ctx: AppContext::new(config),
            storage: Some(storage),
        }
    }

    /// Create a harness from a custom configuration (no temp storage).
    pub fn with_config(config: Config) -> Self {
        Self {
            ctx: AppContext::new(config),
            storage: None,
        }
    }

    /// Start an Axum server on a random port and return the harness
    /// together with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        let harness = Self::new();
        let addr = harness.serve().await;
        (harness, addr)
    }

    /// Start an Axum server with custom config on a random port.
    pub async fn with_server_config(config: Config) -> (Self, SocketAddr) {
        let harness = Self::with_config(config);
        let addr = harness.serve().await;
        (harness, addr)
    }

    async fn serve(&self) -> SocketAddr {
        let app = build_router(self.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        addr
    }

    /// Mint a token for the harness secret.
    pub fn token_for(&self, subject: &str, session: &str) -> String {
        token::mint(TEST_SECRET, subject, session, 3600).expect("failed to mint token")
    }

    fn session_dir(&self, session: &str) -> PathBuf {
        self.ctx.store.root().join(session)
    }

    /// Write one media part into the session tree.
    pub fn write_part(&self, session: &str, codec: &str, quality: &str, id: &str, data: &[u8]) {
        let dir = self.session_dir(session).join(codec).join(quality);
        std::fs::create_dir_all(&dir).expect("failed to create rendition dir");
        std::fs::write(dir.join(format!("{id}.mp4")), data).expect("failed to write part");
    }

    /// Write the master manifest for a session.
    pub fn write_master_manifest(&self, session: &str, text: &str) {
        let dir = self.session_dir(session);
        std::fs::create_dir_all(&dir).expect("failed to create session dir");
        std::fs::write(dir.join("master.m3u8"), text).expect("failed to write manifest");
    }

    /// Write a video rendition manifest.
    pub fn write_video_manifest(&self, session: &str, codec: &str, quality: &str, text: &str) {
        let dir = self.session_dir(session).join(codec).join(quality);
        std::fs::create_dir_all(&dir).expect("failed to create rendition dir");
        std::fs::write(dir.join("playlist.m3u8"), text).expect("failed to write manifest");
    }

    /// Write an audio rendition manifest.
    pub fn write_audio_manifest(&self, session: &str, codec: &str, quality: &str, text: &str) {
        let dir = self
            .session_dir(session)
            .join("a")
            .join(codec)
            .join(quality);
        std::fs::create_dir_all(&dir).expect("failed to create rendition dir");
        std::fs::write(dir.join("playlist.m3u8"), text).expect("failed to write manifest");
    }
}
