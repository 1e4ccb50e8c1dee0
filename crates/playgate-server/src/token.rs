//! Playback-token verification and minting.
//!
//! A playback token is a compact HS256 JWT embedding the owning subject
//! and the transcode session it grants access to. Verification is
//! stateless: no session lookup happens here — a token for a session
//! that no longer exists simply 404s later at the storage layer.
//!
//! The decoded payload is attacker-controllable data until the
//! signature checks out, and its fields remain untrusted strings for
//! any filesystem use afterwards (the storage layer sanitizes them).

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use playgate_core::{Error, Result};

use crate::context::SecretStore;

/// Claims embedded in a playback token.
///
/// A fixed structured record: a token missing either identity field, or
/// carrying a non-string value, fails verification closed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackClaims {
    /// Owning subject (the entity the playback session belongs to).
    pub sub: String,
    /// Transcode session id the token grants access to.
    pub sid: String,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp). Checked by the verification
    /// primitive itself; no further expiry policy applies.
    pub exp: i64,
}

/// Authorize a request: fetch the current signing secret and verify the
/// presented token against it.
///
/// Secret-store failures propagate unchanged (server error); only
/// signature/format failures map to unauthorized.
pub fn authorize(secrets: &SecretStore, token: &str) -> Result<PlaybackClaims> {
    let secret = secrets.current()?;
    verify(&secret, token)
}

/// Verify a playback token against a signing secret.
pub fn verify(secret: &str, token: &str) -> Result<PlaybackClaims> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let data = decode::<PlaybackClaims>(token, &key, &Validation::new(Algorithm::HS256))
        .map_err(|e| Error::Unauthorized(format!("invalid playback token: {e}")))?;
    Ok(data.claims)
}

/// Mint a playback token.
///
/// Production tokens are minted by the session broker; this exists for
/// the ops CLI and tests.
pub fn mint(secret: &str, subject_id: &str, session_id: &str, ttl_secs: i64) -> Result<String> {
    let now = chrono::Utc::now().timestamp();
    let claims = PlaybackClaims {
        sub: subject_id.to_string(),
        sid: session_id.to_string(),
        iat: now,
        exp: now + ttl_secs,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| Error::Internal(format!("failed to sign token: {e}")))
}
