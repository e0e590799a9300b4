use super::gateway_trait::{api_base_url, GatewayContext, PaymentGateway};
use super::http_client::{endpoint_url, Credentials};
use crate::core::{AppError, Currency, Result};
use crate::modules::gateways::models::{
    decimal_from_json, AdapterDescriptor, CallbackRequest, ConfigSchema, Gateway,
    GatewayEnvironment, PaymentKind,
};
use crate::modules::payments::{complete_once, verify, CallbackOutcome, Payment, ReportedAmount};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

const LIVE_API_URL: &str = "https://api.paysafecard.com";
const SANDBOX_API_URL: &str = "https://apitest.paysafecard.com";
const SUCCESS_STATUS: &str = "SUCCESS";
const UNKNOWN_EMAIL: &str = "unknown@example.com";

/// Paysafecard prepaid-voucher adapter
pub struct Paysafecard;

impl Paysafecard {
    fn api_url(gateway: &Gateway) -> String {
        let default = match gateway.environment() {
            GatewayEnvironment::Sandbox => SANDBOX_API_URL,
            GatewayEnvironment::Production => LIVE_API_URL,
        };
        api_base_url(gateway, default)
    }

    /// `Basic base64(username:api_key)`
    fn authorization(gateway: &Gateway) -> Result<String> {
        let api_key = gateway.config.require_str("api_key")?;
        let username = gateway.config.optional_str("username").unwrap_or("");
        Ok(format!(
            "Basic {}",
            STANDARD.encode(format!("{}:{}", username, api_key))
        ))
    }
}

#[async_trait]
impl PaymentGateway for Paysafecard {
    fn endpoint(&self) -> &'static str {
        "paysafecard"
    }

    fn descriptor(&self) -> AdapterDescriptor {
        AdapterDescriptor {
            driver: "Paysafecard",
            kind: PaymentKind::Once,
            endpoint: self.endpoint(),
            refund_support: false,
            template: None,
        }
    }

    fn config_schema(&self) -> ConfigSchema {
        ConfigSchema::from([
            ("username", json!("")),
            ("api_key", json!("")),
            ("test_mode", json!(true)),
        ])
    }

    async fn initiate(
        &self,
        ctx: &GatewayContext,
        gateway: &Gateway,
        payment: &Payment,
    ) -> Result<String> {
        let authorization = Self::authorization(gateway)?;
        let url = endpoint_url(&Self::api_url(gateway), &["v1", "payments"])?;

        let payload = json!({
            "amount": {
                "value": Currency::format_provider_amount(payment.amount),
                "currency": payment.currency.code(),
            },
            "redirect": {
                "success_url": ctx.urls.success_url(payment.id),
                "failure_url": ctx.urls.cancel_url(payment.id),
            },
            "customer": {
                "id": payment.user_id,
                "email": payment.user_email.as_deref().unwrap_or(UNKNOWN_EMAIL),
            },
            "correlation_id": payment.id,
        });

        let response = ctx
            .http
            .post_json(&url, &payload, Credentials::Authorization(&authorization))
            .await?
            .ensure_success("Paysafecard")?;

        let created: CreatedPayment = response.json("Paysafecard")?;
        created
            .redirect
            .and_then(|r| r.auth_url)
            .ok_or_else(|| AppError::provider("Paysafecard response has no redirect.auth_url"))
    }

    async fn handle_callback(
        &self,
        ctx: &GatewayContext,
        gateway: &Gateway,
        request: &CallbackRequest,
    ) -> Result<CallbackOutcome> {
        let reference = request
            .input("correlation_id")
            .ok_or_else(|| AppError::validation("Paysafecard return is missing correlation_id"))?;
        let payment = ctx.find_payment(&reference).await?;

        let authorization = Self::authorization(gateway)?;
        let url = endpoint_url(
            &Self::api_url(gateway),
            &["v1", "payments", &payment.id.to_string()],
        )?;

        let response = ctx
            .http
            .get(&url, Credentials::Authorization(&authorization))
            .await?
            .ensure_success("Paysafecard")?;

        let raw: Value = response.json("Paysafecard")?;
        let status = raw
            .get("status")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::provider("Paysafecard status response has no status"))?;

        if status != SUCCESS_STATUS {
            return Err(AppError::Declined {
                payment_id: payment.id,
                status: status.to_string(),
            });
        }

        if payment.is_paid() {
            info!(payment_id = payment.id, "Paysafecard payment already paid");
            return Ok(CallbackOutcome::AlreadyPaid(payment.id));
        }

        // Older API versions omit the amount; check it when it is there
        if let Some(amount) = raw.get("amount").and_then(decimal_from_json) {
            let currency = raw.get("currency").and_then(Value::as_str);
            verify(&payment, ReportedAmount::Major(amount), currency).into_result(payment.id)?;
        }

        complete_once(ctx.payments.as_ref(), &payment, &raw).await
    }
}

#[derive(Debug, Deserialize)]
struct CreatedPayment {
    redirect: Option<CreatedRedirect>,
}

#[derive(Debug, Deserialize)]
struct CreatedRedirect {
    auth_url: Option<String>,
}
