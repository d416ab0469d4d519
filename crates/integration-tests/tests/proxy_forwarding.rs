//! End-to-end tests for the protected resource proxy: local auth gates,
//! verbatim forwarding, and status-preserving error pass-through.

use serde_json::{Value, json};

use verdura_integration_tests::{BACKEND_TOKEN, FORBIDDEN_TOKEN, TestContext};

#[tokio::test]
async fn orders_without_authorization_fail_before_any_upstream_call() {
    let ctx = TestContext::new().await;

    let response = ctx
        .client
        .get(format!("{}/api/orders", ctx.edge_url))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);
    let error: Value = response.json().await.unwrap();
    assert_eq!(error["error"], json!("Authorization header is required"));
    assert_eq!(ctx.backend.total_hits(), 0);
}

#[tokio::test]
async fn orders_forward_authorization_and_query_verbatim() {
    let ctx = TestContext::new().await;

    let response = ctx
        .client
        .get(format!(
            "{}/api/orders?status=delivered&page=2",
            ctx.edge_url
        ))
        .header("Authorization", format!("Bearer {BACKEND_TOKEN}"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    // The proxy does not reshape a success body.
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"][0]["id"], json!("o1"));

    let seen = ctx.backend.requests_to("/orders");
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, "GET");
    assert_eq!(seen[0].query.as_deref(), Some("status=delivered&page=2"));
    assert_eq!(
        seen[0].authorization.as_deref(),
        Some(format!("Bearer {BACKEND_TOKEN}").as_str())
    );
}

#[tokio::test]
async fn order_creation_forwards_the_body_unmodified() {
    let ctx = TestContext::new().await;

    // Includes a client-computed fee: forwarded as-is, re-derived upstream.
    let payload = json!({
        "items": [{ "productId": "p1", "quantity": 3 }],
        "addressId": "a1",
        "deliveryFee": 150,
    });

    let response = ctx
        .client
        .post(format!("{}/api/orders", ctx.edge_url))
        .header("Authorization", format!("Bearer {BACKEND_TOKEN}"))
        .json(&payload)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["id"], json!("o2"));
    assert_eq!(ctx.backend.last_order_body(), Some(payload));
}

#[tokio::test]
async fn upstream_rejection_keeps_its_status_and_message() {
    let ctx = TestContext::new().await;

    let response = ctx
        .client
        .post(format!("{}/api/orders", ctx.edge_url))
        .header("Authorization", format!("Bearer {FORBIDDEN_TOKEN}"))
        .json(&json!({ "items": [] }))
        .send()
        .await
        .unwrap();

    // 403 with the backend's text, not a generic 500.
    assert_eq!(response.status(), reqwest::StatusCode::FORBIDDEN);
    let error: Value = response.json().await.unwrap();
    assert_eq!(error["error"], json!("You are not allowed to place orders"));
}

#[tokio::test]
async fn addresses_follow_the_same_forwarding_contract() {
    let ctx = TestContext::new().await;

    let unauthenticated = ctx
        .client
        .get(format!("{}/api/orders/addresses", ctx.edge_url))
        .send()
        .await
        .unwrap();
    assert_eq!(
        unauthenticated.status(),
        reqwest::StatusCode::UNAUTHORIZED
    );
    assert_eq!(ctx.backend.total_hits(), 0);

    let listed = ctx
        .client
        .get(format!("{}/api/orders/addresses", ctx.edge_url))
        .header("Authorization", format!("Bearer {BACKEND_TOKEN}"))
        .send()
        .await
        .unwrap();
    assert_eq!(listed.status(), reqwest::StatusCode::OK);

    let created = ctx
        .client
        .post(format!("{}/api/orders/addresses", ctx.edge_url))
        .header("Authorization", format!("Bearer {BACKEND_TOKEN}"))
        .json(&json!({ "city": "Lahore", "street": "12 Canal Rd" }))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), reqwest::StatusCode::CREATED);
}

#[tokio::test]
async fn admin_orders_require_a_credential_at_the_edge() {
    let ctx = TestContext::new().await;

    let unauthenticated = ctx
        .client
        .get(format!("{}/api/admin/orders", ctx.edge_url))
        .send()
        .await
        .unwrap();
    assert_eq!(
        unauthenticated.status(),
        reqwest::StatusCode::UNAUTHORIZED
    );
    assert_eq!(ctx.backend.total_hits(), 0);

    let listed = ctx
        .client
        .get(format!("{}/api/admin/orders", ctx.edge_url))
        .header("Authorization", format!("Bearer {BACKEND_TOKEN}"))
        .send()
        .await
        .unwrap();
    assert_eq!(listed.status(), reqwest::StatusCode::OK);
    let body: Value = listed.json().await.unwrap();
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn catalog_reads_are_public_but_mutations_are_gated() {
    let ctx = TestContext::new().await;

    let products = ctx
        .client
        .get(format!("{}/api/products", ctx.edge_url))
        .send()
        .await
        .unwrap();
    assert_eq!(products.status(), reqwest::StatusCode::OK);

    let categories = ctx
        .client
        .get(format!("{}/api/categories", ctx.edge_url))
        .send()
        .await
        .unwrap();
    assert_eq!(categories.status(), reqwest::StatusCode::OK);

    let hits_before = ctx.backend.total_hits();
    let create = ctx
        .client
        .post(format!("{}/api/products", ctx.edge_url))
        .json(&json!({ "name": "Raw Honey" }))
        .send()
        .await
        .unwrap();
    assert_eq!(create.status(), reqwest::StatusCode::UNAUTHORIZED);
    assert_eq!(ctx.backend.total_hits(), hits_before);

    let create_authed = ctx
        .client
        .post(format!("{}/api/products", ctx.edge_url))
        .header("Authorization", format!("Bearer {BACKEND_TOKEN}"))
        .json(&json!({ "name": "Raw Honey" }))
        .send()
        .await
        .unwrap();
    assert_eq!(create_authed.status(), reqwest::StatusCode::CREATED);
}

#[tokio::test]
async fn unreachable_backend_maps_to_a_generic_500() {
    let ctx = TestContext::with_dead_backend().await;

    let response = ctx
        .client
        .get(format!("{}/api/orders", ctx.edge_url))
        .header("Authorization", format!("Bearer {BACKEND_TOKEN}"))
        .send()
        .await
        .unwrap();

    assert_eq!(
        response.status(),
        reqwest::StatusCode::INTERNAL_SERVER_ERROR
    );
    let error: Value = response.json().await.unwrap();
    assert_eq!(error["error"], json!("failed to fetch orders"));
}
