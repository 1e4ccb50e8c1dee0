//! Axum router construction.
//!
//! Builds the application router with the playback route group and the
//! middleware layers.

use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::context::AppContext;
use crate::routes;

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/playback", playback_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// Playback routes. The token travels in the path, so no auth
/// middleware applies here — each handler verifies it first.
fn playback_routes() -> Router<AppContext> {
    Router::new()
        .route(
            "/{secret}/master.m3u8",
            get(routes::playback::master_manifest),
        )
        .route(
            "/{secret}/{codec}/{quality}/playlist.m3u8",
            get(routes::playback::video_manifest),
        )
        .route(
            "/{secret}/a/{codec}/{quality}/playlist.m3u8",
            get(routes::playback::audio_manifest),
        )
        .route(
            "/{secret}/{codec}/{quality}/{name}",
            get(routes::playback::media_part),
        )
}
