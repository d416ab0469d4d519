//! HTTP route handlers for the storefront edge.
//!
//! # Route Structure (nested under /api)
//!
//! ```text
//! # Auth bridge
//! POST  /auth/login              - Exchange credentials, mint session token
//! POST  /auth/register           - Forward registration, mint session token
//! POST  /auth/logout             - Stateless logout
//! GET   /auth/profile            - Resolve session (requires both credentials)
//!
//! # Orders & addresses (forwarded, auth required)
//! GET   /orders                  - Order history
//! POST  /orders                  - Place an order
//! GET   /orders/addresses        - Saved addresses
//! POST  /orders/addresses        - Add an address
//! GET   /admin/orders            - All orders (backoffice)
//!
//! # Delivery pricing
//! GET   /settings/delivery       - Current delivery settings (public)
//! PATCH /settings/delivery       - Update delivery settings (auth)
//! POST  /public/settings/delivery/calculate - Fee quote for a subtotal (public)
//!
//! # Catalog (forwarded)
//! GET   /products                - Product listing (public)
//! POST  /products                - Create product (auth)
//! GET   /products/{id}           - Product detail (public)
//! PUT   /products/{id}           - Update product (auth)
//! DELETE /products/{id}          - Delete product (auth)
//! GET   /categories              - Category listing (public)
//! ```

pub mod auth;
pub mod catalog;
pub mod delivery;
pub mod orders;

use axum::{
    Json,
    Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::Value;

use crate::state::AppState;
use crate::upstream::ForwardedResponse;

/// Create the auth bridge routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
        .route("/profile", get(auth::profile))
}

/// Create the order and address routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list).post(orders::create))
        .route(
            "/addresses",
            get(orders::list_addresses).post(orders::create_address),
        )
}

/// Create the delivery settings routes router.
pub fn settings_routes() -> Router<AppState> {
    Router::new().route(
        "/delivery",
        get(delivery::get_settings).patch(delivery::update_settings),
    )
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::list_products).post(catalog::create_product))
        .route(
            "/{id}",
            get(catalog::get_product)
                .put(catalog::update_product)
                .delete(catalog::delete_product),
        )
}

/// Create all routes for the storefront edge.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/orders", order_routes())
        .route("/admin/orders", get(orders::admin_list))
        .nest("/settings", settings_routes())
        .route(
            "/public/settings/delivery/calculate",
            post(delivery::calculate),
        )
        .nest("/products", product_routes())
        .route("/categories", get(catalog::list_categories))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the backend.
pub async fn health() -> &'static str {
    "ok"
}

/// Turn a forwarded backend response into our response, status preserved,
/// body untouched.
pub(crate) fn proxied(response: ForwardedResponse) -> impl IntoResponse {
    (response.status, Json(response.body))
}

/// As [`proxied`], but the body replaced by an already-unwrapped payload.
pub(crate) fn proxied_payload(status: StatusCode, payload: Value) -> impl IntoResponse {
    (status, Json(payload))
}
