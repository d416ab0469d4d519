//! Integration test harness for the Verdura storefront edge.
//!
//! Spins up two real HTTP servers per test: the edge router exactly as the
//! binary serves it, and a mock backend API that records every request it
//! receives. The recorder is what lets tests assert the edge's core
//! promises - "zero upstream calls before the local gate fires",
//! "authorization forwarded byte-for-byte", "query and body unmodified".
//!
//! The mock backend also carries the single authoritative implementation of
//! the delivery-fee rule, standing in for the real backend that owns it in
//! production; the edge itself holds no copy.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde_json::{Value, json};

use verdura_core::DeliverySettings;
use verdura_storefront::config::StorefrontConfig;
use verdura_storefront::state::AppState;

/// Phone/password pair the mock backend accepts.
pub const VALID_PHONE: &str = "03001234567";
/// See [`VALID_PHONE`].
pub const VALID_PASSWORD: &str = "organic-carrots-4-life";
/// Phone that triggers a success response with no `user` field, for
/// contract-violation tests.
pub const CONTRACT_BREAKING_PHONE: &str = "03119999999";
/// Backend credential issued by the mock on login.
pub const BACKEND_TOKEN: &str = "bt1";
/// Refresh credential issued by the mock on login.
pub const REFRESH_TOKEN: &str = "rt1";
/// A credential the mock recognizes but refuses to place orders with.
pub const FORBIDDEN_TOKEN: &str = "bt-forbidden";
/// Session signing secret the edge under test is configured with.
pub const SESSION_SECRET: &str = "kJ8#mP2$vL9@xQ4!wN7&bR5*tY1^zF3%";

/// One request as the mock backend saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
}

#[derive(Default)]
struct MockBackendInner {
    requests: Mutex<Vec<RecordedRequest>>,
    settings: Mutex<Option<DeliverySettings>>,
    last_order_body: Mutex<Option<Value>>,
}

/// Shared handle to the mock backend's recorded state.
#[derive(Clone, Default)]
pub struct MockBackendState {
    inner: Arc<MockBackendInner>,
}

/// A mock backend API listening on an ephemeral local port.
pub struct MockBackend {
    /// Base URL the edge under test points at.
    pub base_url: String,
    state: MockBackendState,
}

impl MockBackend {
    /// Bind the mock backend and start serving it.
    pub async fn spawn() -> Self {
        let state = MockBackendState::default();
        state.set_settings(default_settings());

        let recorder = state.clone();
        let router = Router::new()
            .route("/auth/login", post(mock_login))
            .route("/auth/register", post(mock_register))
            .route("/auth/profile", get(mock_profile))
            .route("/orders", get(mock_list_orders).post(mock_create_order))
            .route(
                "/orders/addresses",
                get(mock_list_addresses).post(mock_create_address),
            )
            .route("/admin/orders", get(mock_admin_orders))
            .route(
                "/settings/delivery",
                get(mock_get_settings).patch(mock_patch_settings),
            )
            .route(
                "/public/settings/delivery/calculate",
                post(mock_calculate),
            )
            .route("/products", get(mock_list_products).post(mock_create_product))
            .route("/categories", get(mock_list_categories))
            .layer(middleware::from_fn_with_state(recorder, record_request))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("mock backend");
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    /// Every request the mock has seen, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.inner.requests.lock().unwrap().clone()
    }

    /// Requests the mock has seen for one path.
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    /// Total number of requests the mock has seen.
    pub fn total_hits(&self) -> usize {
        self.state.inner.requests.lock().unwrap().len()
    }

    /// The body of the most recent order-create call, verbatim.
    pub fn last_order_body(&self) -> Option<Value> {
        self.state.inner.last_order_body.lock().unwrap().clone()
    }

    /// Replace the stored delivery settings.
    pub fn set_settings(&self, settings: DeliverySettings) {
        self.state.set_settings(settings);
    }
}

impl MockBackendState {
    fn set_settings(&self, settings: DeliverySettings) {
        *self.inner.settings.lock().unwrap() = Some(settings);
    }

    fn settings(&self) -> DeliverySettings {
        self.inner
            .settings
            .lock()
            .unwrap()
            .clone()
            .expect("mock settings initialized at spawn")
    }
}

fn default_settings() -> DeliverySettings {
    DeliverySettings {
        delivery_fee: Decimal::from(150),
        free_delivery_threshold: Decimal::from(3000),
        is_delivery_enabled: true,
        updated_at: None,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Mock backend handlers
// ─────────────────────────────────────────────────────────────────────────────

async fn record_request(
    State(state): State<MockBackendState>,
    request: axum::extract::Request,
    next: Next,
) -> Response {
    let recorded = RecordedRequest {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        query: request.uri().query().map(String::from),
        authorization: request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(String::from),
    };
    state.inner.requests.lock().unwrap().push(recorded);
    next.run(request).await
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

fn envelope(data: Value) -> Json<Value> {
    Json(json!({ "success": true, "data": data }))
}

fn rejection(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

fn mock_user() -> Value {
    json!({
        "id": "u1",
        "role": "customer",
        "phone": VALID_PHONE,
        "isActive": true,
        "name": "Amina Testworth",
    })
}

async fn mock_login(Json(body): Json<Value>) -> Response {
    let phone = body.get("phone").and_then(Value::as_str).unwrap_or_default();
    let password = body
        .get("password")
        .and_then(Value::as_str)
        .unwrap_or_default();

    if phone == CONTRACT_BREAKING_PHONE {
        // Shape mismatch: success with no user object.
        return envelope(json!({ "accessToken": BACKEND_TOKEN })).into_response();
    }

    if phone == VALID_PHONE && password == VALID_PASSWORD {
        return envelope(json!({
            "user": mock_user(),
            "accessToken": BACKEND_TOKEN,
            "refreshToken": REFRESH_TOKEN,
        }))
        .into_response();
    }

    rejection(StatusCode::UNAUTHORIZED, "Invalid phone or password")
}

async fn mock_register(Json(body): Json<Value>) -> Response {
    // Registration succeeds for the canonical test identity and returns the
    // same exchange shape as login.
    mock_login(Json(body)).await
}

async fn mock_profile(headers: HeaderMap) -> Response {
    match bearer(&headers) {
        Some(BACKEND_TOKEN) => envelope(mock_user()).into_response(),
        _ => rejection(StatusCode::UNAUTHORIZED, "Backend session expired"),
    }
}

async fn mock_list_orders(headers: HeaderMap) -> Response {
    match bearer(&headers) {
        Some(BACKEND_TOKEN) => envelope(json!([{ "id": "o1", "status": "delivered" }])).into_response(),
        _ => rejection(StatusCode::UNAUTHORIZED, "Backend session expired"),
    }
}

async fn mock_create_order(
    State(state): State<MockBackendState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    match bearer(&headers) {
        Some(FORBIDDEN_TOKEN) => {
            rejection(StatusCode::FORBIDDEN, "You are not allowed to place orders")
        }
        Some(BACKEND_TOKEN) => {
            *state.inner.last_order_body.lock().unwrap() = Some(body);
            (
                StatusCode::CREATED,
                envelope(json!({ "id": "o2", "status": "pending" })),
            )
                .into_response()
        }
        _ => rejection(StatusCode::UNAUTHORIZED, "Backend session expired"),
    }
}

async fn mock_list_addresses(headers: HeaderMap) -> Response {
    match bearer(&headers) {
        Some(BACKEND_TOKEN) => envelope(json!([{ "id": "a1", "city": "Lahore" }])).into_response(),
        _ => rejection(StatusCode::UNAUTHORIZED, "Backend session expired"),
    }
}

async fn mock_create_address(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    match bearer(&headers) {
        Some(BACKEND_TOKEN) => {
            (StatusCode::CREATED, envelope(json!({ "id": "a2", "payload": body }))).into_response()
        }
        _ => rejection(StatusCode::UNAUTHORIZED, "Backend session expired"),
    }
}

async fn mock_admin_orders(headers: HeaderMap) -> Response {
    match bearer(&headers) {
        Some(BACKEND_TOKEN) => envelope(json!([{ "id": "o1" }, { "id": "o2" }])).into_response(),
        _ => rejection(StatusCode::UNAUTHORIZED, "Backend session expired"),
    }
}

async fn mock_get_settings(State(state): State<MockBackendState>) -> Response {
    let settings = state.settings();
    envelope(serde_json::to_value(settings).unwrap()).into_response()
}

async fn mock_patch_settings(
    State(state): State<MockBackendState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if bearer(&headers) != Some(BACKEND_TOKEN) {
        return rejection(StatusCode::UNAUTHORIZED, "Backend session expired");
    }

    let mut settings = state.settings();
    if let Some(fee) = body.get("deliveryFee") {
        settings.delivery_fee = serde_json::from_value(fee.clone()).unwrap();
    }
    if let Some(threshold) = body.get("freeDeliveryThreshold") {
        settings.free_delivery_threshold = serde_json::from_value(threshold.clone()).unwrap();
    }
    if let Some(enabled) = body.get("isDeliveryEnabled").and_then(Value::as_bool) {
        settings.is_delivery_enabled = enabled;
    }
    state.set_settings(settings.clone());

    envelope(serde_json::to_value(settings).unwrap()).into_response()
}

/// The one authoritative delivery-fee rule, as the real backend implements
/// it: disabled wins, then free at or above the threshold, else the flat
/// fee.
async fn mock_calculate(State(state): State<MockBackendState>, Json(body): Json<Value>) -> Response {
    let Some(amount) = body
        .get("orderAmount")
        .cloned()
        .and_then(|v| serde_json::from_value::<Decimal>(v).ok())
    else {
        return rejection(StatusCode::BAD_REQUEST, "orderAmount must be a number");
    };

    let settings = state.settings();
    let quote = if !settings.is_delivery_enabled {
        json!({ "deliveryFee": 0, "isFree": false, "reason": "delivery disabled" })
    } else if amount >= settings.free_delivery_threshold {
        json!({ "deliveryFee": 0, "isFree": true, "reason": "above threshold" })
    } else {
        json!({
            "deliveryFee": settings.delivery_fee,
            "isFree": false,
            "reason": "flat fee",
        })
    };

    envelope(quote).into_response()
}

async fn mock_list_products() -> Response {
    envelope(json!([{ "id": "p1", "name": "Organic Carrots" }])).into_response()
}

async fn mock_create_product(headers: HeaderMap, Json(body): Json<Value>) -> Response {
    match bearer(&headers) {
        Some(BACKEND_TOKEN) => {
            (StatusCode::CREATED, envelope(json!({ "id": "p2", "payload": body }))).into_response()
        }
        _ => rejection(StatusCode::UNAUTHORIZED, "Backend session expired"),
    }
}

async fn mock_list_categories() -> Response {
    envelope(json!([{ "id": "c1", "name": "Vegetables" }])).into_response()
}

// ─────────────────────────────────────────────────────────────────────────────
// Test context
// ─────────────────────────────────────────────────────────────────────────────

/// A running edge instance wired to a running mock backend.
pub struct TestContext {
    /// Plain reqwest client for driving the edge.
    pub client: reqwest::Client,
    /// Base URL of the edge under test.
    pub edge_url: String,
    /// The mock backend and its recorder.
    pub backend: MockBackend,
}

impl TestContext {
    /// Spawn a mock backend and an edge pointed at it.
    pub async fn new() -> Self {
        let backend = MockBackend::spawn().await;
        let edge_url = spawn_edge(&backend.base_url).await;

        Self {
            client: reqwest::Client::new(),
            edge_url,
            backend,
        }
    }

    /// Spawn an edge pointed at an address nothing listens on, for
    /// network-failure tests.
    pub async fn with_dead_backend() -> Self {
        let backend = MockBackend::spawn().await;
        // Bind-then-drop guarantees the port was free a moment ago.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let dead = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let edge_url = spawn_edge(&dead).await;

        Self {
            client: reqwest::Client::new(),
            edge_url,
            backend,
        }
    }

    /// POST a JSON body to the edge.
    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(format!("{}{path}", self.edge_url))
            .json(body)
            .send()
            .await
            .expect("edge request")
    }

    /// Log in with the mock's valid credentials and return the login body.
    pub async fn login(&self) -> Value {
        let response = self
            .post_json(
                "/api/auth/login",
                &json!({ "phone": VALID_PHONE, "password": VALID_PASSWORD }),
            )
            .await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        response.json().await.expect("login body")
    }
}

/// Build the edge router exactly as the binary does and serve it on an
/// ephemeral port.
async fn spawn_edge(upstream_url: &str) -> String {
    let config = StorefrontConfig {
        upstream_url: upstream_url.parse().expect("upstream url"),
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        session_secret: SecretString::from(SESSION_SECRET),
        session_ttl_days: 7,
        sentry_dsn: None,
    };
    let app = verdura_storefront::app(AppState::new(config));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind edge");
    let addr: SocketAddr = listener.local_addr().expect("edge addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("edge server");
    });

    format!("http://{addr}")
}
