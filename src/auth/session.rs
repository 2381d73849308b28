//! Session records and the session cookie.
//!
//! A session is minted by the authentication flow, handed to the client as the
//! `session` cookie, and destroyed on logout. Records are never mutated in
//! place. The cookie helpers here are the only place cookie attributes are
//! decided, so issuing and clearing always agree on name, path and flags.

use std::fmt;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

use crate::config::SessionConfig;
use crate::domain::UserId;

/// Session cookie name
pub const SESSION_COOKIE_NAME: &str = "session";

/// Session cookie path
pub const SESSION_COOKIE_PATH: &str = "/";

/// Random bytes behind each session token (512 bits)
const SESSION_TOKEN_BYTES: usize = 64;

/// Opaque credential identifying a session.
///
/// `Debug` is redacted so tokens cannot leak through `?token` log fields.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    /// Generate a fresh token from the OS RNG
    pub fn generate() -> Self {
        let mut bytes = [0u8; SESSION_TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Wrap a token presented by a client
    pub fn new<S: Into<String>>(value: S) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// SHA-256 hex digest; what persistent stores key records by
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(self.0.as_bytes()))
    }

    /// Read the session token from the request cookies, ignoring empty values
    pub fn from_jar(jar: &CookieJar) -> Option<Self> {
        jar.get(SESSION_COOKIE_NAME)
            .map(|cookie| cookie.value().trim())
            .filter(|value| !value.is_empty())
            .map(Self::new)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

impl From<&str> for SessionToken {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A persisted session record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: SessionToken,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Mint a new session for `user_id` living for `ttl`
    pub fn issue(user_id: UserId, ttl: Duration) -> Self {
        let created_at = Utc::now();
        Self { token: SessionToken::generate(), user_id, created_at, expires_at: created_at + ttl }
    }

    /// Expired sessions are invisible to lookups
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Cookie carrying a live session to the client
pub fn session_cookie(session: &Session, config: &SessionConfig) -> Cookie<'static> {
    let remaining = (session.expires_at - Utc::now()).num_seconds().max(0);
    base_cookie(
        session.token.as_str().to_string(),
        config,
        time::Duration::seconds(remaining),
    )
}

/// Cookie that makes the client drop its session credential immediately.
///
/// Same name, path and flags as [`session_cookie`], empty value, `Max-Age=0`.
pub fn removal_cookie(config: &SessionConfig) -> Cookie<'static> {
    base_cookie(String::new(), config, time::Duration::ZERO)
}

fn base_cookie(value: String, config: &SessionConfig, max_age: time::Duration) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, value))
        .path(SESSION_COOKIE_PATH)
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .build()
}
