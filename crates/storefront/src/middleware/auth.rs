//! Credential extractors for route handlers.
//!
//! The edge works with two independent, non-interchangeable credentials:
//!
//! - the **session credential**, minted and verified by the storefront
//!   itself, carried in `Authorization`;
//! - the **backend credential**, issued by the backend API, carried in
//!   `X-Backend-Token` on session-aware routes and in `Authorization` on
//!   plain forwarding routes.
//!
//! Possession of one never implies the other. [`AuthedUser`] enforces the
//! full two-credential resolution; [`BearerAuth`] only requires that an
//! authorization header was presented, for handlers that forward it opaquely.
//!
//! All checks here fail before any upstream I/O happens - a request missing
//! a credential costs no backend round trip.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use serde_json::Value;

use verdura_core::EdgeUser;

use crate::error::AppError;
use crate::services::session;
use crate::state::AppState;

/// Header carrying the backend credential on session-aware routes.
pub const BACKEND_TOKEN_HEADER: &str = "x-backend-token";

/// The two credentials a protected call must re-present, as one value.
///
/// Kept together so handlers cannot accidentally act upstream with only the
/// session credential in hand.
#[derive(Debug, Clone)]
pub struct CredentialPair {
    /// Storefront session credential (raw JWT, without the `Bearer` prefix).
    pub session: String,
    /// Backend credential, opaque to the edge.
    pub backend: String,
}

/// Extractor requiring an `Authorization` header, preserved byte-for-byte.
///
/// Used by forwarding handlers: the header value is attached to the
/// upstream request unchanged, so whatever scheme the backend expects
/// passes through intact.
pub struct BearerAuth(pub String);

impl<S> FromRequestParts<S> for BearerAuth
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        authorization_header(parts)
            .map(Self)
            .ok_or_else(unauthenticated)
    }
}

/// Extractor that takes the `Authorization` header if present.
///
/// For public forwarding routes: an authenticated caller's header still
/// travels upstream, an anonymous caller's request goes through without one.
pub struct OptionalBearerAuth(pub Option<String>);

impl<S> FromRequestParts<S> for OptionalBearerAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(authorization_header(parts)))
    }
}

/// Extractor that fully resolves "who is calling and can I act as them
/// upstream".
///
/// Each gate is hard, and they run in order:
///
/// 1. no session credential → 401 before anything else
/// 2. signature/expiry verification against the server secret → one
///    collapsed 401 kind on any failure
/// 3. no backend credential → 401; a valid session alone is never
///    sufficient to act against the backend
/// 4. backend "who am I" call; a backend rejection passes through with its
///    own status
/// 5. the enveloped response is normalized and the canonical user record
///    parsed
///
/// The user is materialized per request and never cached across requests.
pub struct AuthedUser {
    /// Typed view of the canonical user record.
    pub user: EdgeUser,
    /// The backend's user object, unmodified, for pass-through responses.
    pub profile: Value,
    /// The credentials this call presented, for acting upstream.
    pub credentials: CredentialPair,
}

impl FromRequestParts<AppState> for AuthedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let authorization = authorization_header(parts).ok_or_else(unauthenticated)?;
        let session_token = strip_bearer(&authorization).to_string();

        let claims = session::verify(&session_token, &state.config().session_secret)?;

        let backend_token = parts
            .headers
            .get(BACKEND_TOKEN_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(|h| strip_bearer(h).to_string())
            .filter(|t| !t.is_empty())
            .ok_or(AppError::MissingUpstreamCredential)?;

        let profile = state.backend().profile(&backend_token).await?;
        let user: EdgeUser = serde_json::from_value(profile.clone()).map_err(|e| {
            AppError::UpstreamContract(format!("profile response did not contain a user: {e}"))
        })?;

        tracing::debug!(user_id = %user.id, session_sub = %claims.sub, "session resolved");

        Ok(Self {
            user,
            profile,
            credentials: CredentialPair {
                session: session_token,
                backend: backend_token,
            },
        })
    }
}

/// The inbound `Authorization` header value, if any.
fn authorization_header(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(String::from)
        .filter(|h| !h.is_empty())
}

/// Drop a `Bearer ` prefix if one is present.
fn strip_bearer(header: &str) -> &str {
    header.strip_prefix("Bearer ").unwrap_or(header).trim()
}

/// The uniform rejection for a missing authorization header.
fn unauthenticated() -> AppError {
    AppError::Unauthenticated("Authorization header is required".to_string())
}
