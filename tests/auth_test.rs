//! Integration tests for playback-token authorization across all routes.

mod common;

use common::{TestHarness, TEST_SECRET};
use playgate_core::config::Config;
use playgate_server::token;

fn all_routes(token: &str) -> Vec<String> {
    vec![
        format!("/playback/{token}/master.m3u8"),
        format!("/playback/{token}/h264/1080p/playlist.m3u8"),
        format!("/playback/{token}/a/aac/high/playlist.m3u8"),
        format!("/playback/{token}/h264/1080p/seg1.mp4"),
    ]
}

#[tokio::test]
async fn garbage_token_is_rejected_on_every_route() {
    let (_h, addr) = TestHarness::with_server().await;

    for route in all_routes("not-a-token") {
        let resp = reqwest::get(format!("http://{addr}{route}")).await.unwrap();
        assert_eq!(resp.status(), 401, "route {route}");
    }
}

#[tokio::test]
async fn wrongly_signed_token_is_rejected_on_every_route() {
    let (_h, addr) = TestHarness::with_server().await;
    let forged = token::mint("some-other-secret", "u1", "sess-1", 3600).unwrap();

    for route in all_routes(&forged) {
        let resp = reqwest::get(format!("http://{addr}{route}")).await.unwrap();
        assert_eq!(resp.status(), 401, "route {route}");
    }
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let (_h, addr) = TestHarness::with_server().await;
    let expired = token::mint(TEST_SECRET, "u1", "sess-1", -3600).unwrap();

    let resp = reqwest::get(format!("http://{addr}/playback/{expired}/master.m3u8"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn token_missing_session_claim_is_rejected() {
    let (_h, addr) = TestHarness::with_server().await;

    let now = chrono_now();
    let claims = serde_json::json!({ "sub": "u1", "iat": now, "exp": now + 3600 });
    let partial = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();

    let resp = reqwest::get(format!("http://{addr}/playback/{partial}/master.m3u8"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn stale_key_is_rejected_after_rotation() {
    let (h, addr) = TestHarness::with_server().await;
    h.write_master_manifest("sess-1", "#EXTM3U\n");

    let old_token = h.token_for("u1", "sess-1");
    let resp = reqwest::get(format!("http://{addr}/playback/{old_token}/master.m3u8"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    h.ctx.secrets.rotate("rotated-secret");

    // The old token stops verifying immediately...
    let resp = reqwest::get(format!("http://{addr}/playback/{old_token}/master.m3u8"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    // ...and a token under the new key works without a restart.
    let fresh = token::mint("rotated-secret", "u1", "sess-1", 3600).unwrap();
    let resp = reqwest::get(format!("http://{addr}/playback/{fresh}/master.m3u8"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn bad_token_fails_before_storage_is_touched() {
    // The storage root does not exist at all: a 401 (not 404/500) shows
    // authorization happens before any path resolution or file access.
    let mut config = Config::default();
    config.playback.storage_root = "/nonexistent/playgate-auth-test".into();
    config.playback.token_secret = Some(TEST_SECRET.to_string());
    let (_h, addr) = TestHarness::with_server_config(config).await;

    for route in all_routes("garbage") {
        let resp = reqwest::get(format!("http://{addr}{route}")).await.unwrap();
        assert_eq!(resp.status(), 401, "route {route}");
    }
}

#[tokio::test]
async fn missing_signing_secret_is_a_server_error() {
    // Key-store failure must surface as 500, never be swallowed as 401.
    let mut config = Config::default();
    config.playback.token_secret = None;
    let (_h, addr) = TestHarness::with_server_config(config).await;

    let valid_elsewhere = token::mint(TEST_SECRET, "u1", "sess-1", 3600).unwrap();
    let resp = reqwest::get(format!(
        "http://{addr}/playback/{valid_elsewhere}/master.m3u8"
    ))
    .await
    .unwrap();
    assert_eq!(resp.status(), 500);
}

#[tokio::test]
async fn decoded_identity_reaches_the_engine_unchanged() {
    let (h, addr) = TestHarness::with_server().await;
    h.write_master_manifest("sess-exact", "#EXTM3U\nsess-exact body\n");

    // A token for a different session must not reach sess-exact's tree.
    let other = h.token_for("u1", "other-session");
    let resp = reqwest::get(format!("http://{addr}/playback/{other}/master.m3u8"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let token = h.token_for("u1", "sess-exact");
    let resp = reqwest::get(format!("http://{addr}/playback/{token}/master.m3u8"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "#EXTM3U\nsess-exact body\n");
}

fn chrono_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}
