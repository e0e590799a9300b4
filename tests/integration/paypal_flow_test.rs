// PayPal REST flow
//
// OAuth client-credentials token, payment creation with an approval link,
// and execution on the payer's return.

#[path = "../helpers/mod.rs"]
mod helpers;

use gatewaypack::core::{AppError, Currency, IntegrityViolation};
use gatewaypack::gateways::{CallbackRequest, Redirect};
use gatewaypack::payments::{CallbackOutcome, PaymentStatus};
use helpers::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn payer_return() -> CallbackRequest {
    CallbackRequest::from_query([
        ("paymentId", "PAYID-TEST"),
        ("token", "EC-TEST"),
        ("PayerID", "PAYER123"),
    ])
}

#[tokio::test]
async fn test_initiate_returns_approval_link() {
    let server = MockServer::start().await;
    mount_paypal_token(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/payments/payment"))
        .and(header("Authorization", format!("Bearer {}", PAYPAL_TOKEN).as_str()))
        .and(body_partial_json(json!({
            "intent": "sale",
            "payer": { "payment_method": "paypal" },
            "transactions": [{
                "amount": { "total": "25.50", "currency": "USD" },
                "description": "Payment for Order #5",
                "invoice_number": "5"
            }],
            "redirect_urls": {
                "return_url": "https://shop.example/payment/return/paypal-rest",
                "cancel_url": "https://shop.example/payment/cancel/5"
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "PAYID-TEST",
            "state": "created",
            "links": [
                { "href": "https://api.sandbox.paypal.com/v1/payments/payment/PAYID-TEST", "rel": "self", "method": "GET" },
                { "href": "https://www.sandbox.paypal.com/cgi-bin/webscr?cmd=_express-checkout&token=EC-TEST", "rel": "approval_url", "method": "REDIRECT" },
                { "href": "https://api.sandbox.paypal.com/v1/payments/payment/PAYID-TEST/execute", "rel": "execute", "method": "POST" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let harness = TestHarness::new();
    let gateway = TestDataFactory::paypal_gateway(&server.uri());
    let payment = TestDataFactory::payment(5, "25.5", Currency::USD);

    let redirect = harness
        .service
        .process_gateway(&gateway, &payment)
        .await
        .unwrap();

    assert_eq!(
        redirect,
        Redirect::Away(
            "https://www.sandbox.paypal.com/cgi-bin/webscr?cmd=_express-checkout&token=EC-TEST"
                .to_string()
        )
    );
}

#[tokio::test]
async fn test_token_failure_cancels_payment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/oauth2/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": "invalid_client",
            "error_description": "Client Authentication failed"
        })))
        .mount(&server)
        .await;

    let harness = TestHarness::new();
    let gateway = TestDataFactory::paypal_gateway(&server.uri());
    let payment = TestDataFactory::payment(5, "25.50", Currency::USD);

    let redirect = harness
        .service
        .process_gateway(&gateway, &payment)
        .await
        .unwrap();

    assert_eq!(redirect, Redirect::PaymentCancel(5));
}

#[tokio::test]
async fn test_executed_payment_completes() {
    let server = MockServer::start().await;
    mount_paypal_token(&server).await;
    mount_paypal_execute(&server, paypal_executed("5", "25.50", "USD")).await;

    let harness =
        TestHarness::with_payment(TestDataFactory::payment(5, "25.50", Currency::USD)).await;
    let gateway = TestDataFactory::paypal_gateway(&server.uri());

    let report = harness
        .service
        .return_gateway(&gateway, &payer_return())
        .await
        .unwrap();

    assert_eq!(report.redirect, Redirect::PaymentSuccess(5));
    assert_eq!(report.outcome.unwrap(), CallbackOutcome::Completed(5));
    assert_eq!(harness.status(5).await, PaymentStatus::Paid);
}

#[tokio::test]
async fn test_unlisted_currency_completes() {
    let server = MockServer::start().await;
    mount_paypal_token(&server).await;
    mount_paypal_execute(&server, paypal_executed("5", "250.00", "SEK")).await;

    let sek: Currency = "sek".parse().unwrap();
    let harness = TestHarness::with_payment(TestDataFactory::payment(5, "250", sek)).await;
    let gateway = TestDataFactory::paypal_gateway(&server.uri());

    let report = harness
        .service
        .return_gateway(&gateway, &payer_return())
        .await
        .unwrap();

    assert_eq!(report.outcome.unwrap(), CallbackOutcome::Completed(5));
    assert_eq!(harness.status(5).await, PaymentStatus::Paid);
}

#[tokio::test]
async fn test_currency_mismatch_cancels_and_stays_pending() {
    let server = MockServer::start().await;
    mount_paypal_token(&server).await;
    mount_paypal_execute(&server, paypal_executed("5", "25.50", "EUR")).await;

    let harness =
        TestHarness::with_payment(TestDataFactory::payment(5, "25.50", Currency::USD)).await;
    let gateway = TestDataFactory::paypal_gateway(&server.uri());

    let report = harness
        .service
        .return_gateway(&gateway, &payer_return())
        .await
        .unwrap();

    assert_eq!(report.redirect, Redirect::PaymentCancel(5));
    assert!(matches!(
        report.outcome,
        Err(AppError::Integrity(IntegrityViolation::CurrencyMismatch { payment_id: 5, .. }))
    ));
    assert_eq!(harness.status(5).await, PaymentStatus::Pending);
}

#[tokio::test]
async fn test_amount_mismatch_cancels_and_stays_pending() {
    let server = MockServer::start().await;
    mount_paypal_token(&server).await;
    mount_paypal_execute(&server, paypal_executed("5", "25.49", "USD")).await;

    let harness =
        TestHarness::with_payment(TestDataFactory::payment(5, "25.50", Currency::USD)).await;
    let gateway = TestDataFactory::paypal_gateway(&server.uri());

    let report = harness
        .service
        .return_gateway(&gateway, &payer_return())
        .await
        .unwrap();

    assert_eq!(report.redirect, Redirect::PaymentCancel(5));
    assert!(matches!(
        report.outcome,
        Err(AppError::Integrity(IntegrityViolation::AmountMismatch { payment_id: 5, .. }))
    ));
    assert_eq!(harness.status(5).await, PaymentStatus::Pending);
}

#[tokio::test]
async fn test_missing_payer_id_never_calls_paypal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/oauth2/token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let harness = TestHarness::new();
    let gateway = TestDataFactory::paypal_gateway(&server.uri());
    let request = CallbackRequest::from_query([("paymentId", "PAYID-TEST")]);

    let report = harness
        .service
        .return_gateway(&gateway, &request)
        .await
        .unwrap();

    assert_eq!(
        report.redirect,
        Redirect::Dashboard {
            error: "Error processing payment".to_string()
        }
    );
    assert!(matches!(report.outcome, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_return_for_paid_payment_is_success_without_completion() {
    let server = MockServer::start().await;
    mount_paypal_token(&server).await;
    mount_paypal_execute(&server, paypal_executed("5", "25.50", "USD")).await;

    let harness =
        TestHarness::with_payment(TestDataFactory::paid_payment(5, "25.50", Currency::USD)).await;
    let gateway = TestDataFactory::paypal_gateway(&server.uri());

    let report = harness
        .service
        .return_gateway(&gateway, &payer_return())
        .await
        .unwrap();

    assert_eq!(report.redirect, Redirect::PaymentSuccess(5));
    assert_eq!(report.outcome.unwrap(), CallbackOutcome::AlreadyPaid(5));
    assert_eq!(harness.payments.applied_completions(5).await, 0);
}

#[tokio::test]
async fn test_unknown_invoice_goes_to_dashboard() {
    let server = MockServer::start().await;
    mount_paypal_token(&server).await;
    mount_paypal_execute(&server, paypal_executed("999", "25.50", "USD")).await;

    let harness = TestHarness::new();
    let gateway = TestDataFactory::paypal_gateway(&server.uri());

    let report = harness
        .service
        .return_gateway(&gateway, &payer_return())
        .await
        .unwrap();

    assert_eq!(
        report.redirect,
        Redirect::Dashboard {
            error: "Error processing payment".to_string()
        }
    );
    assert!(matches!(
        report.outcome,
        Err(AppError::Integrity(IntegrityViolation::UnknownPayment(_)))
    ));
}

#[tokio::test]
async fn test_execute_failure_reports_verification_failed() {
    let server = MockServer::start().await;
    mount_paypal_token(&server).await;
    Mock::given(method("POST"))
        .and(path("/v1/payments/payment/PAYID-TEST/execute"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "name": "PAYMENT_ALREADY_DONE"
        })))
        .mount(&server)
        .await;

    let harness =
        TestHarness::with_payment(TestDataFactory::payment(5, "25.50", Currency::USD)).await;
    let gateway = TestDataFactory::paypal_gateway(&server.uri());

    let report = harness
        .service
        .return_gateway(&gateway, &payer_return())
        .await
        .unwrap();

    assert_eq!(
        report.redirect,
        Redirect::Dashboard {
            error: "Payment verification failed".to_string()
        }
    );
    assert_eq!(harness.status(5).await, PaymentStatus::Pending);
}
