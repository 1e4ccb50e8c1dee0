//! Transcoding engine boundary.
//!
//! Manifest bodies are produced by the transcoding process, not by the
//! gateway. [`TranscodingEngine`] is the seam: handlers hand over the
//! authorized identity plus the requested rendition and get back the
//! manifest text. [`SessionDirEngine`] is the production implementation,
//! reading the playlists the transcoder writes next to the segments.

use std::path::PathBuf;

use async_trait::async_trait;

use playgate_core::{sanitize, Error, Result};

/// Source of manifest bodies for authorized playback sessions.
#[async_trait]
pub trait TranscodingEngine: Send + Sync {
    /// Master manifest listing the available renditions.
    async fn master_manifest(&self, subject_id: &str, session_id: &str) -> Result<String>;

    /// Video rendition manifest for one codec/quality variant.
    async fn video_manifest(
        &self,
        subject_id: &str,
        session_id: &str,
        codec: &str,
        quality: &str,
    ) -> Result<String>;

    /// Audio rendition manifest for one codec/quality variant.
    async fn audio_manifest(
        &self,
        subject_id: &str,
        session_id: &str,
        codec: &str,
        quality: &str,
    ) -> Result<String>;
}

/// Reads manifests from the transcoder's session directory.
///
/// Layout mirrors the route shape: `master.m3u8` at the session root,
/// video playlists at `<codec>/<quality>/playlist.m3u8`, audio at
/// `a/<codec>/<quality>/playlist.m3u8`.
#[derive(Debug)]
pub struct SessionDirEngine {
    root: PathBuf,
}

impl SessionDirEngine {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn session_dir(&self, session_id: &str) -> Result<PathBuf> {
        let session = sanitize::component(session_id)
            .ok_or_else(|| Error::not_found("session", session_id))?;
        Ok(self.root.join(session))
    }

    fn rendition_dir(&self, base: PathBuf, codec: &str, quality: &str) -> Result<PathBuf> {
        let codec = sanitize::component(codec).ok_or_else(|| Error::not_found("codec", codec))?;
        let quality =
            sanitize::component(quality).ok_or_else(|| Error::not_found("quality", quality))?;
        Ok(base.join(codec).join(quality))
    }

    async fn read_manifest(&self, path: PathBuf) -> Result<String> {
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::not_found("manifest", path.display()))
            }
            Err(e) => Err(Error::from(e)),
        }
    }
}

#[async_trait]
impl TranscodingEngine for SessionDirEngine {
    async fn master_manifest(&self, subject_id: &str, session_id: &str) -> Result<String> {
        tracing::debug!(subject = %subject_id, session = %session_id, "Serving master manifest");
        let path = self.session_dir(session_id)?.join("master.m3u8");
        self.read_manifest(path).await
    }

    async fn video_manifest(
        &self,
        subject_id: &str,
        session_id: &str,
        codec: &str,
        quality: &str,
    ) -> Result<String> {
        tracing::debug!(
            subject = %subject_id,
            session = %session_id,
            codec = %codec,
            quality = %quality,
            "Serving video manifest"
        );
        let dir = self.rendition_dir(self.session_dir(session_id)?, codec, quality)?;
        self.read_manifest(dir.join("playlist.m3u8")).await
    }

    async fn audio_manifest(
        &self,
        subject_id: &str,
        session_id: &str,
        codec: &str,
        quality: &str,
    ) -> Result<String> {
        tracing::debug!(
            subject = %subject_id,
            session = %session_id,
            codec = %codec,
            quality = %quality,
            "Serving audio manifest"
        );
        let dir =
            self.rendition_dir(self.session_dir(session_id)?.join("a"), codec, quality)?;
        self.read_manifest(dir.join("playlist.m3u8")).await
    }
}
