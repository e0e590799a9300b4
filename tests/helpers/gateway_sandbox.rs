// Provider sandboxes
//
// Wiremock stand-ins for the Monobank, PayPal and Paysafecard APIs. Each
// helper mounts the happy-path response on the given server; failure cases
// mount their own mocks in the test.

use serde_json::{json, Value};
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::test_data::HOST_URL;

/// base64("client-id:client-secret")
pub const PAYPAL_BASIC_AUTH: &str = "Basic Y2xpZW50LWlkOmNsaWVudC1zZWNyZXQ=";
/// base64("merchant:psc_key")
pub const PAYSAFECARD_AUTH: &str = "Basic bWVyY2hhbnQ6cHNjX2tleQ==";
pub const PAYPAL_TOKEN: &str = "A21AAtest-token";

pub async fn mount_monobank_webhook(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/personal/webhook"))
        .and(header("X-Token", "mono-token"))
        .and(body_json(json!({
            "webHookUrl": format!("{}/payment/return/monobank", HOST_URL)
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(server)
        .await;
}

pub async fn mount_paypal_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v1/oauth2/token"))
        .and(header("Authorization", PAYPAL_BASIC_AUTH))
        .and(body_string_contains("grant_type=client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "scope": "https://uri.paypal.com/services/payments/payment",
            "access_token": PAYPAL_TOKEN,
            "token_type": "Bearer",
            "expires_in": 32400
        })))
        .mount(server)
        .await;
}

/// Execute response for a PayPal payment carrying our invoice number
pub fn paypal_executed(invoice_number: &str, total: &str, currency: &str) -> Value {
    json!({
        "id": "PAYID-TEST",
        "state": "approved",
        "payer": { "payer_info": { "payer_id": "PAYER123" } },
        "transactions": [{
            "amount": { "total": total, "currency": currency },
            "description": format!("Payment for Order #{}", invoice_number),
            "invoice_number": invoice_number
        }]
    })
}

pub async fn mount_paypal_execute(server: &MockServer, executed: Value) {
    Mock::given(method("POST"))
        .and(path("/v1/payments/payment/PAYID-TEST/execute"))
        .and(header("Authorization", format!("Bearer {}", PAYPAL_TOKEN).as_str()))
        .and(body_json(json!({ "payer_id": "PAYER123" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(executed))
        .mount(server)
        .await;
}

/// Paysafecard status response for a payment
pub fn paysafecard_status(payment_id: i64, status: &str) -> Value {
    json!({
        "object": "PAYMENT",
        "id": format!("pay_{}", payment_id),
        "status": status,
        "correlation_id": payment_id.to_string()
    })
}

pub async fn mount_paysafecard_status(server: &MockServer, payment_id: i64, response: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/payments/{}", payment_id)))
        .and(header("Authorization", PAYSAFECARD_AUTH))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .mount(server)
        .await;
}

/// Monobank statement webhook body
pub fn monobank_statement(kind: &str, comment: &str, amount: i64) -> Value {
    json!({
        "type": kind,
        "data": {
            "account": "acc_1",
            "statementItem": {
                "id": "stmt_1",
                "time": 1760000000,
                "description": "Transfer",
                "comment": comment,
                "amount": amount,
                "currencyCode": 980
            }
        }
    })
}
