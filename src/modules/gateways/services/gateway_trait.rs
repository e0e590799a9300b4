use super::http_client::ProviderClient;
use super::redirect::HostUrls;
use crate::core::{AppError, IntegrityViolation, Result};
use crate::modules::gateways::models::{
    AdapterDescriptor, CallbackRequest, ConfigSchema, Gateway,
};
use crate::modules::payments::{CallbackOutcome, Payment, PaymentId, PaymentRepository};
use async_trait::async_trait;
use std::sync::Arc;

/// Payment gateway adapter contract
///
/// Adapters are stateless; everything they need per call comes from the
/// host's gateway record and the shared [`GatewayContext`].
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Endpoint slug stored in the host's gateway record
    fn endpoint(&self) -> &'static str;

    /// Static metadata for the admin listing
    fn descriptor(&self) -> AdapterDescriptor;

    /// Settings this adapter reads, with their defaults
    fn config_schema(&self) -> ConfigSchema;

    /// Whether callbacks come from the provider's servers or the payer's browser
    fn callback_mode(&self) -> CallbackMode {
        CallbackMode::BrowserReturn
    }

    /// Create the payment with the provider and return the URL to send the payer to
    async fn initiate(
        &self,
        ctx: &GatewayContext,
        gateway: &Gateway,
        payment: &Payment,
    ) -> Result<String>;

    /// Validate a callback and complete the matching payment
    async fn handle_callback(
        &self,
        ctx: &GatewayContext,
        gateway: &Gateway,
        request: &CallbackRequest,
    ) -> Result<CallbackOutcome>;

    /// Recurring billing is not offered by any bundled adapter
    fn check_subscription(&self, _gateway: &Gateway, _subscription_id: &str) -> bool {
        false
    }

    async fn process_refund(
        &self,
        _ctx: &GatewayContext,
        _gateway: &Gateway,
        payment: &Payment,
        _data: &serde_json::Value,
    ) -> Result<()> {
        Err(AppError::Unsupported(format!(
            "{} does not support refunds (payment {})",
            self.endpoint(),
            payment.id
        )))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackMode {
    /// Provider webhook: always acknowledged, never redirected
    Webhook,
    /// Payer returns from the provider and is redirected to success or cancel
    BrowserReturn,
}

/// Shared helpers injected into every adapter call
#[derive(Clone)]
pub struct GatewayContext {
    pub http: ProviderClient,
    pub urls: HostUrls,
    pub payments: Arc<dyn PaymentRepository>,
}

impl GatewayContext {
    pub fn new(http: ProviderClient, urls: HostUrls, payments: Arc<dyn PaymentRepository>) -> Self {
        Self {
            http,
            urls,
            payments,
        }
    }

    /// Resolve a payment reference carried in a callback
    ///
    /// Non-numeric references and missing rows are both unknown payments.
    pub async fn find_payment(&self, reference: &str) -> Result<Payment> {
        let reference = reference.trim();
        let id: PaymentId = reference
            .parse()
            .map_err(|_| IntegrityViolation::UnknownPayment(reference.to_string()))?;

        self.payments
            .find_by_id(id)
            .await?
            .ok_or_else(|| IntegrityViolation::UnknownPayment(reference.to_string()).into())
    }
}

/// Provider base URL: the gateway's `api_url` override, else the adapter default
pub fn api_base_url(gateway: &Gateway, default: &str) -> String {
    gateway
        .config
        .optional_str("api_url")
        .unwrap_or(default)
        .to_string()
}
