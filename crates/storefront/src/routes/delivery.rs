//! Delivery settings and fee quote route handlers.
//!
//! The fee rule (free at or above the threshold, flat fee below, disabled
//! switch) has exactly one authoritative implementation, and it is not
//! here: every call site - checkout preview, order persistence, admin
//! override - asks the backend. The edge holds no fallback copy, so the
//! rule cannot drift between call sites, and every quote re-queries
//! settings rather than caching them.

use axum::{Json, extract::State, response::IntoResponse};
use reqwest::Method;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use verdura_core::unwrap_envelope;

use crate::error::{AppError, Result};
use crate::middleware::BearerAuth;
use crate::routes::{proxied, proxied_payload};
use crate::state::AppState;
use crate::upstream::Forward;

/// Fee quote request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateForm {
    #[serde(default)]
    pub order_amount: Option<Value>,
}

/// Current delivery settings. Public read.
#[instrument(skip_all)]
pub async fn get_settings(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let response = state
        .backend()
        .forward(Forward {
            method: Method::GET,
            path: "/settings/delivery",
            raw_query: None,
            body: None,
            bearer: None,
            action: "fetch delivery settings",
        })
        .await?;

    Ok(proxied_payload(
        response.status,
        unwrap_envelope(response.body),
    ))
}

/// Update delivery settings. Backoffice only; the backend enforces the
/// role, the edge enforces that a credential was presented at all.
#[instrument(skip_all)]
pub async fn update_settings(
    State(state): State<AppState>,
    BearerAuth(authorization): BearerAuth,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse> {
    let response = state
        .backend()
        .forward(Forward {
            method: Method::PATCH,
            path: "/settings/delivery",
            raw_query: None,
            body: Some(&payload),
            bearer: Some(&authorization),
            action: "update delivery settings",
        })
        .await?;

    Ok(proxied(response))
}

/// Quote the delivery fee for an order subtotal. Public.
///
/// The quote is derived, never persisted: order creation re-derives it at
/// the backend instead of trusting what any client computed here.
#[instrument(skip_all)]
pub async fn calculate(
    State(state): State<AppState>,
    Json(form): Json<CalculateForm>,
) -> Result<impl IntoResponse> {
    let order_amount = form
        .order_amount
        .filter(Value::is_number)
        .ok_or_else(|| AppError::Validation("orderAmount must be a number".to_string()))?;

    let body = json!({ "orderAmount": order_amount });
    let response = state
        .backend()
        .forward(Forward {
            method: Method::POST,
            path: "/public/settings/delivery/calculate",
            raw_query: None,
            body: Some(&body),
            bearer: None,
            action: "calculate delivery fee",
        })
        .await?;

    Ok(proxied_payload(
        response.status,
        unwrap_envelope(response.body),
    ))
}
