//! Order and address route handlers.
//!
//! Pure forwarding: authorization is checked before any upstream I/O, the
//! body travels unmodified (including any client-computed delivery fee,
//! which the backend re-derives rather than trusts), and the backend's
//! status and message come back unchanged. Retry safety for mutations is
//! the backend's responsibility, not this layer's.

use axum::{
    Json,
    extract::{RawQuery, State},
    response::IntoResponse,
};
use reqwest::Method;
use serde_json::Value;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::BearerAuth;
use crate::routes::proxied;
use crate::state::AppState;
use crate::upstream::Forward;

/// List the caller's orders.
#[instrument(skip_all)]
pub async fn list(
    State(state): State<AppState>,
    BearerAuth(authorization): BearerAuth,
    RawQuery(query): RawQuery,
) -> Result<impl IntoResponse> {
    let response = state
        .backend()
        .forward(Forward {
            method: Method::GET,
            path: "/orders",
            raw_query: query.as_deref(),
            body: None,
            bearer: Some(&authorization),
            action: "fetch orders",
        })
        .await?;

    Ok(proxied(response))
}

/// Place an order.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    BearerAuth(authorization): BearerAuth,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse> {
    let response = state
        .backend()
        .forward(Forward {
            method: Method::POST,
            path: "/orders",
            raw_query: None,
            body: Some(&payload),
            bearer: Some(&authorization),
            action: "create order",
        })
        .await?;

    Ok(proxied(response))
}

/// List the caller's saved addresses.
#[instrument(skip_all)]
pub async fn list_addresses(
    State(state): State<AppState>,
    BearerAuth(authorization): BearerAuth,
    RawQuery(query): RawQuery,
) -> Result<impl IntoResponse> {
    let response = state
        .backend()
        .forward(Forward {
            method: Method::GET,
            path: "/orders/addresses",
            raw_query: query.as_deref(),
            body: None,
            bearer: Some(&authorization),
            action: "fetch addresses",
        })
        .await?;

    Ok(proxied(response))
}

/// Save a new address.
#[instrument(skip_all)]
pub async fn create_address(
    State(state): State<AppState>,
    BearerAuth(authorization): BearerAuth,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse> {
    let response = state
        .backend()
        .forward(Forward {
            method: Method::POST,
            path: "/orders/addresses",
            raw_query: None,
            body: Some(&payload),
            bearer: Some(&authorization),
            action: "create address",
        })
        .await?;

    Ok(proxied(response))
}

/// List all orders for the backoffice.
///
/// Role enforcement happens at the backend; the edge only guarantees a
/// credential was presented.
#[instrument(skip_all)]
pub async fn admin_list(
    State(state): State<AppState>,
    BearerAuth(authorization): BearerAuth,
    RawQuery(query): RawQuery,
) -> Result<impl IntoResponse> {
    let response = state
        .backend()
        .forward(Forward {
            method: Method::GET,
            path: "/admin/orders",
            raw_query: query.as_deref(),
            body: None,
            bearer: Some(&authorization),
            action: "fetch orders",
        })
        .await?;

    Ok(proxied(response))
}
