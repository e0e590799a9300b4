// Test data factory
//
// Builds payments, gateway records and a wired GatewayService around the
// in-memory repositories.

use std::sync::Arc;

use gatewaypack::config::HttpClientConfig;
use gatewaypack::core::Currency;
use gatewaypack::gateways::{
    Gateway, GatewayContext, GatewayPack, GatewayService, GatewaySettings, HostUrls,
    ProviderClient,
};
use gatewaypack::payments::{
    InMemoryPaymentRepository, Payment, PaymentId, PaymentRepository, PaymentStatus,
};
use rust_decimal::Decimal;

pub const HOST_URL: &str = "https://shop.example";

/// Everything a flow test needs
pub struct TestHarness {
    pub payments: Arc<InMemoryPaymentRepository>,
    pub service: GatewayService,
}

impl TestHarness {
    pub fn new() -> Self {
        let payments = Arc::new(InMemoryPaymentRepository::new());
        let service = GatewayService::new(GatewayPack::new(), test_context(payments.clone()));
        Self { payments, service }
    }

    pub async fn with_payment(payment: Payment) -> Self {
        let harness = Self::new();
        harness.payments.insert(payment).await;
        harness
    }

    pub async fn status(&self, id: PaymentId) -> PaymentStatus {
        payment_status(&self.payments, id).await
    }
}

pub async fn payment_status(payments: &InMemoryPaymentRepository, id: PaymentId) -> PaymentStatus {
    payments
        .find_by_id(id)
        .await
        .expect("in-memory lookup cannot fail")
        .expect("payment should exist")
        .status
}

/// Context with no retries so failing mocks answer immediately
pub fn test_context(payments: Arc<InMemoryPaymentRepository>) -> GatewayContext {
    let http = ProviderClient::new(&HttpClientConfig {
        timeout_secs: 5,
        max_retries: 0,
    })
    .expect("HTTP client should build");

    GatewayContext::new(
        http,
        HostUrls::new(HOST_URL).expect("host URL should parse"),
        payments,
    )
}

pub struct TestDataFactory;

impl TestDataFactory {
    /// Pending payment in currency units, e.g. `"10.00"`
    pub fn payment(id: PaymentId, amount: &str, currency: Currency) -> Payment {
        let amount: Decimal = amount.parse().expect("amount should be a decimal");
        Payment::new(id, 100 + id, amount, currency).with_email(format!("user{}@example.com", id))
    }

    pub fn paid_payment(id: PaymentId, amount: &str, currency: Currency) -> Payment {
        let mut payment = Self::payment(id, amount, currency);
        payment.status = PaymentStatus::Paid;
        payment
    }

    pub fn monobank_gateway(api_url: &str) -> Gateway {
        Gateway::new(
            "monobank",
            GatewaySettings::new()
                .with("token", "mono-token")
                .with("banka_url", "https://send.monobank.ua/jar/abc123")
                .with("api_url", api_url),
        )
    }

    pub fn paypal_gateway(api_url: &str) -> Gateway {
        Gateway::new(
            "paypal-rest",
            GatewaySettings::new()
                .with("client_id", "client-id")
                .with("client_secret", "client-secret")
                .with("test_mode", true)
                .with("api_url", api_url),
        )
    }

    pub fn paysafecard_gateway(api_url: &str) -> Gateway {
        Gateway::new(
            "paysafecard",
            GatewaySettings::new()
                .with("username", "merchant")
                .with("api_key", "psc_key")
                .with("test_mode", true)
                .with("api_url", api_url),
        )
    }
}
