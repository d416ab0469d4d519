//! Product and category route handlers.
//!
//! Catalog reads are public; mutations require an authorization header
//! before any upstream call is made. Payloads and responses travel
//! unmodified in both directions.

use axum::{
    Json,
    extract::{Path, RawQuery, State},
    response::IntoResponse,
};
use reqwest::Method;
use serde_json::Value;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::{BearerAuth, OptionalBearerAuth};
use crate::routes::proxied;
use crate::state::AppState;
use crate::upstream::Forward;

/// List products. Public; an authenticated caller's header still travels
/// upstream so the backend can tailor the listing.
#[instrument(skip_all)]
pub async fn list_products(
    State(state): State<AppState>,
    OptionalBearerAuth(authorization): OptionalBearerAuth,
    RawQuery(query): RawQuery,
) -> Result<impl IntoResponse> {
    let response = state
        .backend()
        .forward(Forward {
            method: Method::GET,
            path: "/products",
            raw_query: query.as_deref(),
            body: None,
            bearer: authorization.as_deref(),
            action: "fetch products",
        })
        .await?;

    Ok(proxied(response))
}

/// Product detail. Public.
#[instrument(skip_all)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let path = format!("/products/{id}");
    let response = state
        .backend()
        .forward(Forward {
            method: Method::GET,
            path: &path,
            raw_query: None,
            body: None,
            bearer: None,
            action: "fetch product",
        })
        .await?;

    Ok(proxied(response))
}

/// Create a product.
#[instrument(skip_all)]
pub async fn create_product(
    State(state): State<AppState>,
    BearerAuth(authorization): BearerAuth,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse> {
    let response = state
        .backend()
        .forward(Forward {
            method: Method::POST,
            path: "/products",
            raw_query: None,
            body: Some(&payload),
            bearer: Some(&authorization),
            action: "create product",
        })
        .await?;

    Ok(proxied(response))
}

/// Update a product.
#[instrument(skip_all)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    BearerAuth(authorization): BearerAuth,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse> {
    let path = format!("/products/{id}");
    let response = state
        .backend()
        .forward(Forward {
            method: Method::PUT,
            path: &path,
            raw_query: None,
            body: Some(&payload),
            bearer: Some(&authorization),
            action: "update product",
        })
        .await?;

    Ok(proxied(response))
}

/// Delete a product.
#[instrument(skip_all)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    BearerAuth(authorization): BearerAuth,
) -> Result<impl IntoResponse> {
    let path = format!("/products/{id}");
    let response = state
        .backend()
        .forward(Forward {
            method: Method::DELETE,
            path: &path,
            raw_query: None,
            body: None,
            bearer: Some(&authorization),
            action: "delete product",
        })
        .await?;

    Ok(proxied(response))
}

/// List categories. Public.
#[instrument(skip_all)]
pub async fn list_categories(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<impl IntoResponse> {
    let response = state
        .backend()
        .forward(Forward {
            method: Method::GET,
            path: "/categories",
            raw_query: query.as_deref(),
            body: None,
            bearer: None,
            action: "fetch categories",
        })
        .await?;

    Ok(proxied(response))
}
