//! Session credential minting and verification.
//!
//! The storefront mints its own HS256-signed credential at login, scoped to
//! its own trust domain: the backend API never sees or accepts it, and the
//! backend's credential is never derived from it. Both operations are pure
//! functions of their inputs - no shared state, safe to run concurrently on
//! any number of requests.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use verdura_core::{EdgeUser, Role};

use crate::error::AppError;

/// Claims embedded in the storefront session credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Backend-issued user ID.
    pub sub: String,
    /// Role at the time of login; re-checked against the backend on every
    /// protected call, so a stale role here cannot widen access.
    pub role: Role,
    /// Phone number used as the login identifier.
    pub phone: String,
    /// Issued at (UTC timestamp).
    pub iat: i64,
    /// Expiration time (UTC timestamp).
    pub exp: i64,
}

/// Errors from session credential operations.
///
/// Verification failures carry the underlying cause for logs but collapse
/// into the single client-facing `InvalidSession` kind.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Signing the credential failed.
    #[error("failed to sign session credential: {0}")]
    Sign(jsonwebtoken::errors::Error),
    /// The credential failed verification (malformed, expired, bad
    /// signature).
    #[error("session credential rejected: {0}")]
    Verify(jsonwebtoken::errors::Error),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Sign(e) => Self::Internal(format!("session signing failed: {e}")),
            SessionError::Verify(e) => {
                tracing::debug!(error = %e, "session verification failed");
                Self::InvalidSession
            }
        }
    }
}

/// Mint a session credential for a freshly authenticated user.
///
/// # Errors
///
/// Returns [`SessionError::Sign`] if encoding fails.
pub fn issue(
    user: &EdgeUser,
    secret: &SecretString,
    ttl: Duration,
) -> Result<String, SessionError> {
    let now = Utc::now();
    let claims = SessionClaims {
        sub: user.id.to_string(),
        role: user.role,
        phone: user.phone.clone(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.expose_secret().as_bytes()),
    )
    .map_err(SessionError::Sign)
}

/// Verify a session credential's signature and expiry.
///
/// # Errors
///
/// Returns [`SessionError::Verify`] on any verification failure; callers
/// surface all of them as one client-facing error kind.
pub fn verify(token: &str, secret: &SecretString) -> Result<SessionClaims, SessionError> {
    let mut validation = Validation::default();
    // An expired credential is expired; no grace window.
    validation.leeway = 0;

    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.expose_secret().as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(SessionError::Verify)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use verdura_core::UserId;

    fn secret() -> SecretString {
        SecretString::from("kJ8#mP2$vL9@xQ4!wN7&bR5*tY1^zF3%")
    }

    fn user() -> EdgeUser {
        EdgeUser {
            id: UserId::new("u1"),
            role: Role::Customer,
            phone: "03001234567".to_string(),
            is_active: true,
        }
    }

    #[test]
    fn test_round_trip_preserves_claims() {
        let token = issue(&user(), &secret(), Duration::days(7)).unwrap();
        let claims = verify(&token, &secret()).unwrap();
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.role, Role::Customer);
        assert_eq!(claims.phone, "03001234567");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_credential_is_rejected() {
        let token = issue(&user(), &secret(), Duration::seconds(-10)).unwrap();
        assert!(matches!(
            verify(&token, &secret()),
            Err(SessionError::Verify(_))
        ));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = issue(&user(), &secret(), Duration::days(7)).unwrap();
        let other = SecretString::from("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6j");
        assert!(verify(&token, &other).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(verify("not-a-credential", &secret()).is_err());
    }

    #[test]
    fn test_all_failures_collapse_for_the_client() {
        let expired = issue(&user(), &secret(), Duration::seconds(-10)).unwrap();
        for err in [
            verify(&expired, &secret()).unwrap_err(),
            verify("garbage", &secret()).unwrap_err(),
        ] {
            let app: AppError = err.into();
            assert!(matches!(app, AppError::InvalidSession));
        }
    }
}
