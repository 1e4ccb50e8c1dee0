//! Read-only access to the per-session segment tree.
//!
//! The transcoding process owns the tree
//! `<root>/<session>/<codec>/<quality>/<part>.mp4` — it creates it at
//! session start and deletes it at session end. This store only ever
//! reads, and every request-derived component is sanitized before it
//! touches a path, so no request can resolve outside the root.

use std::path::{Path, PathBuf};

use playgate_core::{sanitize, Error, Result};

/// Read-only view of the transient segment storage tree.
#[derive(Debug)]
pub struct SegmentStore {
    root: PathBuf,
}

impl SegmentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The storage root all session trees live under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve the path of one media part from request-derived
    /// components. Each component is sanitized independently; a
    /// component that sanitizes away entirely is a not-found.
    pub fn segment_path(
        &self,
        session_id: &str,
        codec: &str,
        quality: &str,
        part_id: &str,
    ) -> Result<PathBuf> {
        let mut path = self.root.join(clean("session", session_id)?);
        path.push(clean("codec", codec)?);
        path.push(clean("quality", quality)?);
        path.push(format!("{}.mp4", clean("part", part_id)?));
        Ok(path)
    }

    /// Size of one part in bytes. Missing file maps to not-found; any
    /// other I/O failure propagates as a server error.
    pub async fn part_len(&self, path: &Path) -> Result<u64> {
        let metadata = tokio::fs::metadata(path).await.map_err(|e| io_error(e, path))?;
        Ok(metadata.len())
    }
}

fn clean(what: &str, raw: &str) -> Result<String> {
    sanitize::component(raw).ok_or_else(|| Error::not_found(what, raw))
}

fn io_error(e: std::io::Error, path: &Path) -> Error {
    if e.kind() == std::io::ErrorKind::NotFound {
        Error::not_found("segment", path.display())
    } else {
        Error::from(e)
    }
}
