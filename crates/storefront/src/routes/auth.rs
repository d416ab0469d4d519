//! Auth bridge route handlers.
//!
//! Login exchanges the user's credentials with the backend, then mints a
//! *second*, independently-signed session credential scoped to the
//! storefront's own trust domain. The client receives both: the session
//! credential for the storefront's checks, the backend credential opaquely
//! for pass-through on later calls.

use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use verdura_core::EdgeUser;

use crate::error::{AppError, Result};
use crate::middleware::AuthedUser;
use crate::services::session;
use crate::state::AppState;
use crate::upstream::{AuthPayload, LoginRequest};

/// Login form data.
///
/// Fields are optional so a missing one is our 400, not a deserializer
/// rejection.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Log a customer in.
///
/// The backend stays the single source of truth for "is this password
/// correct": its rejection status and message pass through unchanged, and
/// this handler never invents its own error text for a credential
/// rejection.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    Json(form): Json<LoginForm>,
) -> Result<impl IntoResponse> {
    let phone = required_field(form.phone, "Phone and password are required")?;
    let password = required_field(form.password, "Phone and password are required")?;

    let payload = state
        .backend()
        .login(&LoginRequest { phone, password })
        .await?;

    mint_session_response(&state, payload)
}

/// Register a new customer.
///
/// The payload is forwarded verbatim; the backend owns validation of
/// everything beyond the presence of the two credential fields. A
/// successful registration mints a session exactly as login does.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse> {
    for field in ["phone", "password"] {
        let present = payload
            .get(field)
            .and_then(Value::as_str)
            .is_some_and(|v| !v.trim().is_empty());
        if !present {
            return Err(AppError::Validation("Phone and password are required".to_string()));
        }
    }

    let outcome = state.backend().register(&payload).await?;

    mint_session_response(&state, outcome)
}

/// Log out.
///
/// The edge keeps no session state, so there is nothing to revoke locally;
/// the endpoint exists so clients have a symmetric call to clear their
/// stored credentials against.
pub async fn logout() -> impl IntoResponse {
    Json(json!({ "success": true }))
}

/// Return the caller's canonical user record.
///
/// Requires both credentials; see [`AuthedUser`] for the gate order.
pub async fn profile(authed: AuthedUser) -> impl IntoResponse {
    Json(authed.profile)
}

/// Validate a required credential field.
fn required_field(value: Option<String>, message: &str) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(message.to_string()))
}

/// Check the auth exchange payload and assemble the dual-credential
/// response.
///
/// A success response without a `user` or access credential is a shape
/// mismatch on the backend's side, not a user-facing auth failure, so it
/// surfaces as a 500 contract error.
fn mint_session_response(state: &AppState, payload: AuthPayload) -> Result<impl IntoResponse + use<>> {
    let user_value = payload.user.ok_or_else(|| {
        AppError::UpstreamContract("auth response contained no user".to_string())
    })?;
    let backend_token = payload.access_token.ok_or_else(|| {
        AppError::UpstreamContract("auth response contained no access token".to_string())
    })?;

    let user: EdgeUser = serde_json::from_value(user_value.clone()).map_err(|e| {
        AppError::UpstreamContract(format!("auth response user did not deserialize: {e}"))
    })?;

    let token = session::issue(&user, &state.config().session_secret, state.session_ttl())?;

    let mut body = json!({
        "user": user_value,
        "token": token,
        "backendToken": backend_token,
    });
    if let Some(refresh_token) = payload.refresh_token {
        body["refreshToken"] = json!(refresh_token);
    }

    Ok(Json(body))
}
