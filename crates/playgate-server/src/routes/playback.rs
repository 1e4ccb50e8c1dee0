//! Playback route handlers: manifests and media parts.
//!
//! Every handler authorizes the playback token before anything else —
//! storage is never touched on an unauthorized request. Manifest bodies
//! come from the transcoding engine boundary; media parts stream
//! straight from the session tree via `ReaderStream` without buffering.
//!
//! A part name is either a single id (`seg1.mp4`) or a dot-separated
//! list (`seg1.seg2.seg3.mp4`). The joined form produces one continuous
//! body equal to the byte concatenation of the parts in request order,
//! with nothing inserted between them.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use futures::stream::{self, StreamExt, TryStreamExt};
use tokio_util::io::ReaderStream;

use playgate_core::Error;

use crate::context::AppContext;
use crate::error::AppError;
use crate::token;

const MANIFEST_CONTENT_TYPE: &str = "application/vnd.apple.mpegurl";

/// Parts are addressed to one client session; cacheable, but privately.
const PART_CACHE_CONTROL: &str = "private, max-age=86400";

/// Read chunk size for part streaming. 64KB keeps memory bounded
/// regardless of part count or size.
const READ_CHUNK: usize = 64 * 1024;

/// GET /playback/{secret}/master.m3u8
pub async fn master_manifest(
    State(ctx): State<AppContext>,
    Path(secret): Path<String>,
) -> Result<Response, AppError> {
    let claims = token::authorize(&ctx.secrets, &secret)?;
    let body = ctx.engine.master_manifest(&claims.sub, &claims.sid).await?;
    Ok(manifest_response(body))
}

/// GET /playback/{secret}/{codec}/{quality}/playlist.m3u8
pub async fn video_manifest(
    State(ctx): State<AppContext>,
    Path((secret, codec, quality)): Path<(String, String, String)>,
) -> Result<Response, AppError> {
    let claims = token::authorize(&ctx.secrets, &secret)?;
    let body = ctx
        .engine
        .video_manifest(&claims.sub, &claims.sid, &codec, &quality)
        .await?;
    Ok(manifest_response(body))
}

/// GET /playback/{secret}/a/{codec}/{quality}/playlist.m3u8
pub async fn audio_manifest(
    State(ctx): State<AppContext>,
    Path((secret, codec, quality)): Path<(String, String, String)>,
) -> Result<Response, AppError> {
    let claims = token::authorize(&ctx.secrets, &secret)?;
    let body = ctx
        .engine
        .audio_manifest(&claims.sub, &claims.sid, &codec, &quality)
        .await?;
    Ok(manifest_response(body))
}

fn manifest_response(body: String) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, MANIFEST_CONTENT_TYPE)],
        body,
    )
        .into_response()
}

/// GET /playback/{secret}/{codec}/{quality}/{name}
///
/// Serves one media part, or a concatenation of parts when `name` is a
/// dot-separated id list (`seg1.seg2.mp4`).
pub async fn media_part(
    State(ctx): State<AppContext>,
    Path((secret, codec, quality, name)): Path<(String, String, String, String)>,
) -> Result<Response, AppError> {
    let claims = token::authorize(&ctx.secrets, &secret)?;

    let stem = name
        .strip_suffix(".mp4")
        .ok_or_else(|| Error::not_found("part", &name))?;

    let mut paths = Vec::new();
    for part_id in stem.split('.') {
        paths.push(
            ctx.store
                .segment_path(&claims.sid, &codec, &quality, part_id)?,
        );
    }

    // Stat every part up front: the sum becomes the Content-Length, and
    // a missing part fails the whole request before any byte is written.
    let mut total_len: u64 = 0;
    for path in &paths {
        total_len += ctx.store.part_len(path).await?;
    }

    let single = paths.len() == 1;
    tracing::debug!(
        subject = %claims.sub,
        session = %claims.sid,
        parts = paths.len(),
        bytes = total_len,
        "Serving media part"
    );

    // Parts are opened lazily and strictly in order: part i+1 is not
    // opened until part i has drained, and each file handle is dropped
    // before the next open. A read failure mid-stream aborts the body;
    // the client detects the truncation against Content-Length.
    let parts = stream::iter(paths)
        .then(|path| async move {
            let file = tokio::fs::File::open(&path).await?;
            Ok::<_, std::io::Error>(ReaderStream::with_capacity(file, READ_CHUNK))
        })
        .try_flatten();

    let mut response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "video/mp4")
        .header(header::CONTENT_LENGTH, total_len.to_string());
    if single {
        response = response.header(header::CACHE_CONTROL, PART_CACHE_CONTROL);
    }

    response
        .body(Body::from_stream(parts))
        .map_err(|e| AppError::from(Error::internal(format!("response build failed: {e}"))))
}
