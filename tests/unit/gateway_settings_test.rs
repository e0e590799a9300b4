// Gateway settings and registry metadata

#[path = "../helpers/mod.rs"]
mod helpers;

use gatewaypack::gateways::{Gateway, GatewayEnvironment, GatewayPack, GatewaySettings};
use gatewaypack::core::{AppError, Currency};
use helpers::{TestDataFactory, TestHarness};
use serde_json::json;

#[test]
fn test_merge_config_fills_missing_keys_per_adapter() {
    let harness = TestHarness::new();
    let cases = [
        ("monobank", vec!["banka_url", "token"]),
        ("paypal-rest", vec!["client_id", "client_secret", "test_mode"]),
        ("paysafecard", vec!["api_key", "test_mode", "username"]),
    ];

    for (endpoint, expected) in cases {
        let mut gateway = Gateway::new(endpoint, GatewaySettings::new());
        harness.service.merge_config(&mut gateway).unwrap();

        let mut keys: Vec<&str> = gateway.config.keys().collect();
        keys.sort_unstable();
        assert_eq!(keys, expected, "schema keys for {}", endpoint);
    }
}

#[test]
fn test_merge_config_keeps_stored_values() {
    let harness = TestHarness::new();
    let mut gateway = Gateway::new(
        "paypal-rest",
        GatewaySettings::new()
            .with("client_id", "stored-id")
            .with("test_mode", false)
            .with("api_url", "http://localhost:9000"),
    );

    harness.service.merge_config(&mut gateway).unwrap();

    assert_eq!(gateway.config.get("client_id"), Some(&json!("stored-id")));
    assert_eq!(gateway.config.get("client_secret"), Some(&json!("")));
    assert_eq!(gateway.config.get("api_url"), Some(&json!("http://localhost:9000")));
    assert_eq!(gateway.environment(), GatewayEnvironment::Production);
}

#[test]
fn test_merged_defaults_start_in_sandbox() {
    let harness = TestHarness::new();
    let mut gateway = Gateway::new("paysafecard", GatewaySettings::new());
    harness.service.merge_config(&mut gateway).unwrap();
    assert_eq!(gateway.environment(), GatewayEnvironment::Sandbox);
}

#[test]
fn test_merge_config_rejects_unknown_gateway() {
    let harness = TestHarness::new();
    let mut gateway = Gateway::new("stripe", GatewaySettings::new());
    assert!(harness.service.merge_config(&mut gateway).is_err());
}

#[test]
fn test_driver_listing_serializes_like_the_admin_catalog() {
    let drivers = serde_json::to_value(GatewayPack::new().drivers()).unwrap();

    assert_eq!(
        drivers["MonoBank"],
        json!({
            "driver": "MonoBank",
            "type": "once",
            "endpoint": "monobank",
            "refund_support": false,
            "template": "gatewaypack::monobank"
        })
    );
    assert_eq!(drivers["PayPalRest"]["endpoint"], "paypal-rest");
    assert!(drivers["Paysafecard"].get("template").is_none());
}

#[tokio::test]
async fn test_subscriptions_and_refunds_are_unsupported() {
    let harness = TestHarness::new();
    let gateway = Gateway::new("paypal-rest", GatewaySettings::new());
    let payment = TestDataFactory::payment(1, "5.00", Currency::USD);

    assert!(!harness.service.check_subscription(&gateway, "I-123").unwrap());
    let err = harness
        .service
        .process_refund(&gateway, &payment, &json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Unsupported(_)));
}
