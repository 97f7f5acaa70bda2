//! Signed session tokens and the session cookie.
//!
//! Sessions are stateless: the token is `base64url(claims).base64url(mac)`
//! where `mac` is HMAC-SHA256 over the encoded claims, keyed with
//! `STOREFRONT_SESSION_SECRET`. Nothing is stored server-side, so a token
//! stays valid until it expires even after logout; logout only removes the
//! cookie from the browser.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use cookie::{Cookie, SameSite};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use boutique_core::UserId;

use crate::config::StorefrontConfig;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "boutique_session";

type HmacSha256 = Hmac<Sha256>;

/// Reasons a session token is rejected.
///
/// Never shown to users; an invalid token is treated as "not logged in".
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("malformed session token")]
    Malformed,
    #[error("session signature mismatch")]
    BadSignature,
    #[error("session expired")]
    Expired,
    #[error("failed to encode session: {0}")]
    Encode(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    uid: UserId,
    iat: i64,
    exp: i64,
}

/// Issues and verifies session tokens.
#[derive(Clone)]
pub struct SessionManager {
    secret: SecretString,
    ttl: Duration,
    secure: bool,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("ttl", &self.ttl)
            .field("secure", &self.secure)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Create a session manager.
    #[must_use]
    pub const fn new(secret: SecretString, ttl: Duration, secure: bool) -> Self {
        Self {
            secret,
            ttl,
            secure,
        }
    }

    /// Create a session manager from the storefront configuration.
    #[must_use]
    pub fn from_config(config: &StorefrontConfig) -> Self {
        Self::new(
            config.session_secret.clone(),
            Duration::hours(config.session_ttl_hours),
            config.is_secure(),
        )
    }

    /// Issue a token for `user_id`, valid for the configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Encode` if the claims cannot be serialized.
    pub fn create_session(&self, user_id: UserId) -> Result<String, SessionError> {
        self.create_session_at(user_id, Utc::now())
    }

    fn create_session_at(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<String, SessionError> {
        let claims = Claims {
            uid: user_id,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        let json = serde_json::to_vec(&claims).map_err(|e| SessionError::Encode(e.to_string()))?;
        let payload = URL_SAFE_NO_PAD.encode(json);

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{payload}.{signature}"))
    }

    /// Resolve a token to the user it was issued for.
    ///
    /// Returns `None` for a missing, malformed, tampered, or expired token.
    #[must_use]
    pub fn resolve_session(&self, token: Option<&str>) -> Option<UserId> {
        let token = token?;
        match self.verify_at(token, Utc::now()) {
            Ok(user_id) => Some(user_id),
            Err(e) => {
                tracing::debug!(error = %e, "rejected session token");
                None
            }
        }
    }

    fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<UserId, SessionError> {
        let (payload, signature) = token.split_once('.').ok_or(SessionError::Malformed)?;
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| SessionError::Malformed)?;

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| SessionError::BadSignature)?;

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| SessionError::Malformed)?;
        let claims: Claims = serde_json::from_slice(&json).map_err(|_| SessionError::Malformed)?;

        if claims.exp <= now.timestamp() {
            return Err(SessionError::Expired);
        }

        Ok(claims.uid)
    }

    /// Build the `Set-Cookie` value carrying `token`.
    #[must_use]
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, token))
            .http_only(true)
            .same_site(SameSite::Lax)
            .path("/")
            .secure(self.secure)
            .max_age(cookie::time::Duration::seconds(self.ttl.num_seconds()))
            .build()
    }

    /// Build a cookie that clears the session from the browser.
    ///
    /// The token itself stays valid until it expires.
    #[must_use]
    pub fn destroy_session(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build((SESSION_COOKIE, ""))
            .http_only(true)
            .same_site(SameSite::Lax)
            .path("/")
            .secure(self.secure)
            .build();
        cookie.make_removal();
        cookie
    }

    fn mac(&self) -> Result<HmacSha256, SessionError> {
        HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|e| SessionError::Encode(e.to_string()))
    }
}

/// Find the session token in a `Cookie` request header value.
#[must_use]
pub fn token_from_cookie_header(header: &str) -> Option<String> {
    Cookie::split_parse(header)
        .filter_map(Result::ok)
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.value().to_owned())
}
