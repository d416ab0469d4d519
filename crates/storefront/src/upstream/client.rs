//! HTTP client for the backend API.

use std::sync::Arc;

use axum::http::StatusCode;
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use url::Url;

use verdura_core::unwrap_envelope;

use super::types::{AuthPayload, LoginRequest};
use super::UpstreamError;

/// A request to relay to the backend API.
///
/// Everything the caller supplied is carried verbatim: the query string is
/// not reinterpreted, the body is not reshaped, and `bearer` is the inbound
/// authorization header value unchanged.
#[derive(Debug)]
pub struct Forward<'a> {
    /// HTTP method for the upstream call.
    pub method: Method,
    /// Upstream path, e.g. `/orders`.
    pub path: &'a str,
    /// Raw query string from the inbound request, if any.
    pub raw_query: Option<&'a str>,
    /// JSON body to forward unmodified, if any.
    pub body: Option<&'a Value>,
    /// Inbound authorization header value, attached unchanged.
    pub bearer: Option<&'a str>,
    /// What this call does, phrased as `<verb> <resource>`; used for the
    /// generic message when the backend is unreachable.
    pub action: &'a str,
}

/// A backend response with its status preserved.
#[derive(Debug, Clone)]
pub struct ForwardedResponse {
    /// The backend's own status code.
    pub status: StatusCode,
    /// The backend's JSON body, unmodified.
    pub body: Value,
}

/// Client for the backend API.
///
/// Cheaply cloneable; holds a single connection pool shared across all
/// request handlers. Timeouts are the network client's defaults - the edge
/// imposes no custom timeout, retry, or backoff policy.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl BackendClient {
    /// Create a new backend API client.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            inner: Arc::new(BackendClientInner {
                client: reqwest::Client::new(),
                base_url,
            }),
        }
    }

    /// The backend base URL this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Generic forwarding
    // ─────────────────────────────────────────────────────────────────────────

    /// Relay a request to the backend and hand back its response unmodified.
    ///
    /// # Errors
    ///
    /// - [`UpstreamError::Network`] when the backend never produced a
    ///   response (DNS, connection refused, timeout).
    /// - [`UpstreamError::Status`] when the backend responded with a
    ///   non-success status; carries the backend's status and message.
    /// - [`UpstreamError::Contract`] when a success response had a body that
    ///   was not JSON.
    pub async fn forward(&self, fwd: Forward<'_>) -> Result<ForwardedResponse, UpstreamError> {
        let url = self.build_url(fwd.path, fwd.raw_query);

        let mut request = self
            .inner
            .client
            .request(fwd.method, url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(bearer) = fwd.bearer {
            request = request.header(AUTHORIZATION, bearer);
        }
        if let Some(body) = fwd.body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|source| UpstreamError::Network {
            action: fwd.action.to_string(),
            source,
        })?;

        let status = convert_status(response.status());
        let text = response
            .text()
            .await
            .map_err(|source| UpstreamError::Network {
                action: fwd.action.to_string(),
                source,
            })?;

        if !status.is_success() {
            return Err(UpstreamError::Status {
                status,
                message: extract_error_message(status, &text),
            });
        }

        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).map_err(|e| {
                UpstreamError::Contract(format!("success response was not JSON: {e}"))
            })?
        };

        Ok(ForwardedResponse { status, body })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Auth exchange
    // ─────────────────────────────────────────────────────────────────────────

    /// Exchange user-supplied credentials for the backend's user object and
    /// access credential.
    ///
    /// A backend rejection (wrong password, unknown phone) surfaces as
    /// [`UpstreamError::Status`] with the backend's own status and message -
    /// the backend stays the single source of truth for credential checks.
    ///
    /// # Errors
    ///
    /// See [`Self::forward`]; additionally [`UpstreamError::Contract`] when
    /// the success payload does not deserialize.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthPayload, UpstreamError> {
        let body = serde_json::to_value(credentials)
            .map_err(|e| UpstreamError::Contract(format!("serializing login request: {e}")))?;
        let response = self
            .forward(Forward {
                method: Method::POST,
                path: "/auth/login",
                raw_query: None,
                body: Some(&body),
                bearer: None,
                action: "log in",
            })
            .await?;

        parse_auth_payload(response.body)
    }

    /// Forward a registration payload and receive the same auth exchange
    /// shape as [`Self::login`].
    ///
    /// # Errors
    ///
    /// See [`Self::login`].
    pub async fn register(&self, payload: &Value) -> Result<AuthPayload, UpstreamError> {
        let response = self
            .forward(Forward {
                method: Method::POST,
                path: "/auth/register",
                raw_query: None,
                body: Some(payload),
                bearer: None,
                action: "register",
            })
            .await?;

        parse_auth_payload(response.body)
    }

    /// Fetch the canonical user record for a backend credential.
    ///
    /// Returns the unwrapped user object; callers needing typed fields parse
    /// it themselves.
    ///
    /// # Errors
    ///
    /// See [`Self::forward`].
    pub async fn profile(&self, backend_token: &str) -> Result<Value, UpstreamError> {
        let bearer = format!("Bearer {backend_token}");
        let response = self
            .forward(Forward {
                method: Method::GET,
                path: "/auth/profile",
                raw_query: None,
                body: None,
                bearer: Some(&bearer),
                action: "fetch profile",
            })
            .await?;

        Ok(unwrap_envelope(response.body))
    }

    fn build_url(&self, path: &str, raw_query: Option<&str>) -> String {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        match raw_query {
            Some(query) if !query.is_empty() => format!("{base}/{path}?{query}"),
            _ => format!("{base}/{path}"),
        }
    }
}

/// Unwrap the auth envelope and deserialize the exchange payload.
fn parse_auth_payload(body: Value) -> Result<AuthPayload, UpstreamError> {
    serde_json::from_value(unwrap_envelope(body))
        .map_err(|e| UpstreamError::Contract(format!("auth payload did not deserialize: {e}")))
}

/// Convert between `http` crate versions without assuming they match.
fn convert_status(status: reqwest::StatusCode) -> StatusCode {
    StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Pull a human-readable message out of a backend error body.
///
/// The backend reports errors as `{"message": ...}` or `{"error": ...}`;
/// when the body is neither, a message naming the status is synthesized so
/// the caller always has something to show.
fn extract_error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .as_ref()
        .and_then(|value| {
            value
                .get("message")
                .or_else(|| value.get("error"))
                .and_then(Value::as_str)
                .map(String::from)
        })
        .unwrap_or_else(|| format!("upstream responded with status {}", status.as_u16()))
}
