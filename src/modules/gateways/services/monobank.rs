use super::gateway_trait::{api_base_url, CallbackMode, GatewayContext, PaymentGateway};
use super::http_client::{endpoint_url, Credentials};
use crate::core::{AppError, Result};
use crate::modules::gateways::models::{
    decimal_from_json, scalar_to_string, AdapterDescriptor, CallbackRequest, ConfigSchema,
    Gateway, PaymentKind,
};
use crate::modules::payments::{complete_once, verify, CallbackOutcome, Payment, ReportedAmount};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::json;
use tracing::{debug, info};
use url::Url;

const DEFAULT_API_URL: &str = "https://api.monobank.ua";

/// Monobank bank-transfer adapter
///
/// The payer is sent to the merchant's "banka" (jar) page; the bank then
/// reports every statement movement to our return route as a webhook. The
/// payment id travels in the transfer comment.
pub struct Monobank;

impl Monobank {
    /// Point the account's statement webhook at our return route
    async fn set_webhook(&self, ctx: &GatewayContext, gateway: &Gateway) -> Result<()> {
        let token = gateway.config.require_str("token")?;
        let url = endpoint_url(
            &api_base_url(gateway, DEFAULT_API_URL),
            &["personal", "webhook"],
        )?;
        let body = json!({ "webHookUrl": ctx.urls.return_url(self.endpoint()) });

        let response = ctx
            .http
            .post_json(
                &url,
                &body,
                Credentials::Header {
                    name: "X-Token",
                    value: token,
                },
            )
            .await?;

        // Monobank answers 200 and nothing else on success
        if response.status != StatusCode::OK {
            return Err(AppError::provider(format!(
                "Monobank webhook registration failed - HTTP {} ({})",
                response.status.as_u16(),
                response.body
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl PaymentGateway for Monobank {
    fn endpoint(&self) -> &'static str {
        "monobank"
    }

    fn descriptor(&self) -> AdapterDescriptor {
        AdapterDescriptor {
            driver: "MonoBank",
            kind: PaymentKind::Once,
            endpoint: self.endpoint(),
            refund_support: false,
            template: Some("gatewaypack::monobank"),
        }
    }

    fn config_schema(&self) -> ConfigSchema {
        ConfigSchema::from([("token", json!("")), ("banka_url", json!(""))])
    }

    fn callback_mode(&self) -> CallbackMode {
        CallbackMode::Webhook
    }

    async fn initiate(
        &self,
        ctx: &GatewayContext,
        gateway: &Gateway,
        payment: &Payment,
    ) -> Result<String> {
        self.set_webhook(ctx, gateway).await?;

        let banka_url = gateway.config.require_str("banka_url")?;
        let mut url = Url::parse(banka_url).map_err(|e| {
            AppError::configuration(format!("Invalid banka_url {}: {}", banka_url, e))
        })?;
        url.query_pairs_mut()
            .append_pair("a", &payment.amount.to_string())
            .append_pair("t", &payment.id.to_string());

        Ok(url.to_string())
    }

    async fn handle_callback(
        &self,
        ctx: &GatewayContext,
        _gateway: &Gateway,
        request: &CallbackRequest,
    ) -> Result<CallbackOutcome> {
        let data = request.all();

        // Monobank checks the webhook URL with an empty request when it is registered
        let Some(kind) = data.get("type").and_then(|v| v.as_str()) else {
            return Ok(CallbackOutcome::Ignored("no event type".to_string()));
        };
        if !kind.eq_ignore_ascii_case("statementItem") {
            return Ok(CallbackOutcome::Ignored(format!("event type {}", kind)));
        }

        let item = data
            .pointer("/data/statementItem")
            .filter(|v| v.is_object())
            .ok_or_else(|| AppError::validation("Monobank callback is missing statementItem"))?;

        let amount = item
            .get("amount")
            .filter(|v| !v.is_null())
            .ok_or_else(|| AppError::validation("Monobank statement item has no amount"))?;
        let amount = decimal_from_json(amount).ok_or_else(|| {
            AppError::validation(format!("Monobank statement amount {} is not a number", amount))
        })?;

        // Outgoing movements on the account are not payments and often carry no comment
        if amount.is_sign_negative() && !amount.is_zero() {
            debug!(amount = %amount, "Skipping outgoing Monobank statement item");
            return Ok(CallbackOutcome::Ignored("negative amount".to_string()));
        }

        let comment = item
            .get("comment")
            .and_then(scalar_to_string)
            .ok_or_else(|| AppError::validation("Monobank statement item has no comment"))?;

        let payment = ctx.find_payment(&comment).await?;
        if payment.is_paid() {
            info!(payment_id = payment.id, "Monobank statement for a payment that is already paid");
            return Ok(CallbackOutcome::AlreadyPaid(payment.id));
        }

        verify(&payment, ReportedAmount::Minor(amount), None).into_result(payment.id)?;

        complete_once(ctx.payments.as_ref(), &payment, &data).await
    }
}
