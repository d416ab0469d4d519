//! Wire types for the backend API's auth endpoints.
//!
//! Resource payloads (orders, addresses, products) stay as raw
//! `serde_json::Value` - their shape is owned by the backend and the edge
//! only guarantees integrity of transport. Only the auth exchange is typed,
//! because the bridge has to read fields out of it to mint a session.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Credentials forwarded to the backend's login endpoint.
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    /// Phone number used as the login identifier.
    pub phone: String,
    /// Plaintext password; forwarded once, never stored or logged.
    pub password: String,
}

/// The unwrapped payload of a successful login or registration response.
///
/// `user` stays a raw `Value` so the client receives it byte-for-byte; the
/// bridge separately parses the fields it needs for session claims.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    /// The backend's user object, passed through unmodified.
    #[serde(default)]
    pub user: Option<Value>,
    /// Backend access credential, handed to the client opaquely.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Backend refresh credential, passed through when present.
    #[serde(default)]
    pub refresh_token: Option<String>,
}
