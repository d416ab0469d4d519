//! End-to-end tests for the order & delivery pricing gateway: the fee rule
//! lives upstream only, quotes are deterministic, and settings reads are
//! never cached.

use serde_json::{Value, json};

use rust_decimal::Decimal;
use verdura_core::DeliverySettings;
use verdura_integration_tests::{BACKEND_TOKEN, TestContext};

async fn quote(ctx: &TestContext, amount: i64) -> Value {
    let response = ctx
        .post_json(
            "/api/public/settings/delivery/calculate",
            &json!({ "orderAmount": amount }),
        )
        .await;
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    response.json().await.unwrap()
}

#[tokio::test]
async fn settings_read_is_public_and_unwrapped() {
    let ctx = TestContext::new().await;

    let response = ctx
        .client
        .get(format!("{}/api/settings/delivery", ctx.edge_url))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    // Envelope gone, payload fields at the top level.
    assert!(body.get("success").is_none());
    assert_eq!(body["deliveryFee"].as_f64(), Some(150.0));
    assert_eq!(body["freeDeliveryThreshold"].as_f64(), Some(3000.0));
    assert_eq!(body["isDeliveryEnabled"], json!(true));
}

#[tokio::test]
async fn settings_update_requires_a_credential_before_any_upstream_call() {
    let ctx = TestContext::new().await;

    let response = ctx
        .client
        .patch(format!("{}/api/settings/delivery", ctx.edge_url))
        .json(&json!({ "deliveryFee": 200 }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);
    let error: Value = response.json().await.unwrap();
    assert_eq!(error["error"], json!("Authorization header is required"));
    assert_eq!(ctx.backend.total_hits(), 0);
}

#[tokio::test]
async fn quote_above_threshold_passes_through_unmodified() {
    let ctx = TestContext::new().await;

    let body = quote(&ctx, 5000).await;
    assert_eq!(
        body,
        json!({ "deliveryFee": 0, "isFree": true, "reason": "above threshold" })
    );
}

#[tokio::test]
async fn quote_is_idempotent_for_fixed_settings() {
    let ctx = TestContext::new().await;

    let first = quote(&ctx, 2000).await;
    let second = quote(&ctx, 2000).await;
    assert_eq!(first, second);
    assert_eq!(ctx.backend.requests_to("/public/settings/delivery/calculate").len(), 2);
}

#[tokio::test]
async fn fee_is_monotone_in_the_subtotal() {
    let ctx = TestContext::new().await;

    // Below the 3000 threshold the flat fee applies; at or above it the fee
    // drops to zero.
    let below = [100, 1500, 2999];
    let fees: Vec<f64> = {
        let mut fees = Vec::new();
        for amount in below {
            fees.push(quote(&ctx, amount).await["deliveryFee"].as_f64().unwrap());
        }
        fees
    };
    for pair in fees.windows(2) {
        assert!(pair[0] >= pair[1]);
    }

    for amount in [3000, 3001, 50_000] {
        let body = quote(&ctx, amount).await;
        assert_eq!(body["deliveryFee"].as_f64(), Some(0.0));
        assert_eq!(body["isFree"], json!(true));
    }
}

#[tokio::test]
async fn disabled_delivery_is_decided_upstream() {
    let ctx = TestContext::new().await;
    ctx.backend.set_settings(DeliverySettings {
        delivery_fee: Decimal::from(150),
        free_delivery_threshold: Decimal::from(3000),
        is_delivery_enabled: false,
        updated_at: None,
    });

    let body = quote(&ctx, 100).await;
    assert_eq!(body["reason"], json!("delivery disabled"));
    assert_eq!(body["isFree"], json!(false));
    assert_eq!(body["deliveryFee"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn quote_with_a_non_numeric_amount_fails_locally() {
    let ctx = TestContext::new().await;

    for body in [json!({}), json!({ "orderAmount": "lots" })] {
        let response = ctx
            .post_json("/api/public/settings/delivery/calculate", &body)
            .await;
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
        let error: Value = response.json().await.unwrap();
        assert_eq!(error["error"], json!("orderAmount must be a number"));
    }

    assert_eq!(ctx.backend.total_hits(), 0);
}

#[tokio::test]
async fn settings_changes_take_effect_on_the_next_quote() {
    let ctx = TestContext::new().await;

    // 1500 is below the default 3000 threshold: flat fee.
    let before = quote(&ctx, 1500).await;
    assert_eq!(before["isFree"], json!(false));

    let patched = ctx
        .client
        .patch(format!("{}/api/settings/delivery", ctx.edge_url))
        .header("Authorization", format!("Bearer {BACKEND_TOKEN}"))
        .json(&json!({ "freeDeliveryThreshold": 1000 }))
        .send()
        .await
        .unwrap();
    assert_eq!(patched.status(), reqwest::StatusCode::OK);

    // No cache at the edge: the very next quote sees the new threshold.
    let after = quote(&ctx, 1500).await;
    assert_eq!(after["isFree"], json!(true));
}
