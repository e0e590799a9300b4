use super::gateway_trait::{api_base_url, GatewayContext, PaymentGateway};
use super::http_client::{endpoint_url, Credentials};
use crate::core::{AppError, Currency, Result};
use crate::modules::gateways::models::{
    scalar_to_string, AdapterDescriptor, CallbackRequest, ConfigSchema, Gateway,
    GatewayEnvironment, PaymentKind,
};
use crate::modules::payments::{complete_once, verify, CallbackOutcome, Payment, ReportedAmount};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};
use std::str::FromStr;
use tracing::info;

const LIVE_API_URL: &str = "https://api.paypal.com";
const SANDBOX_API_URL: &str = "https://api.sandbox.paypal.com";

/// PayPal REST (v1 payments) adapter
///
/// Each operation fetches a fresh client-credentials token; tokens are not
/// cached between requests.
pub struct PayPalRest;

impl PayPalRest {
    fn api_url(gateway: &Gateway) -> String {
        let default = match gateway.environment() {
            GatewayEnvironment::Sandbox => SANDBOX_API_URL,
            GatewayEnvironment::Production => LIVE_API_URL,
        };
        api_base_url(gateway, default)
    }

    async fn access_token(&self, ctx: &GatewayContext, gateway: &Gateway) -> Result<String> {
        let client_id = gateway.config.require_str("client_id")?;
        let client_secret = gateway.config.require_str("client_secret")?;
        let url = endpoint_url(&Self::api_url(gateway), &["v1", "oauth2", "token"])?;

        let response = ctx
            .http
            .post_form(
                &url,
                &[("grant_type", "client_credentials")],
                Credentials::Basic {
                    username: client_id,
                    password: client_secret,
                },
            )
            .await?
            .ensure_success("PayPal")?;

        let token: TokenResponse = response.json("PayPal")?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl PaymentGateway for PayPalRest {
    fn endpoint(&self) -> &'static str {
        "paypal-rest"
    }

    fn descriptor(&self) -> AdapterDescriptor {
        AdapterDescriptor {
            driver: "PayPalRest",
            kind: PaymentKind::Once,
            endpoint: self.endpoint(),
            refund_support: false,
            template: None,
        }
    }

    fn config_schema(&self) -> ConfigSchema {
        ConfigSchema::from([
            ("client_id", json!("")),
            ("client_secret", json!("")),
            ("test_mode", json!(true)),
        ])
    }

    async fn initiate(
        &self,
        ctx: &GatewayContext,
        gateway: &Gateway,
        payment: &Payment,
    ) -> Result<String> {
        let token = self.access_token(ctx, gateway).await?;
        let url = endpoint_url(&Self::api_url(gateway), &["v1", "payments", "payment"])?;

        let payload = json!({
            "intent": "sale",
            "payer": { "payment_method": "paypal" },
            "transactions": [{
                "amount": {
                    "total": Currency::format_provider_amount(payment.amount),
                    "currency": payment.currency.code(),
                },
                "description": format!("Payment for Order #{}", payment.id),
                "invoice_number": payment.id.to_string(),
            }],
            "redirect_urls": {
                "return_url": ctx.urls.return_url(self.endpoint()),
                "cancel_url": ctx.urls.cancel_url(payment.id),
            },
        });

        let response = ctx
            .http
            .post_json(&url, &payload, Credentials::Bearer(&token))
            .await?
            .ensure_success("PayPal")?;

        let created: CreatedPayment = response.json("PayPal")?;
        created
            .links
            .into_iter()
            .find(|link| link.rel == "approval_url")
            .map(|link| link.href)
            .ok_or_else(|| AppError::provider("PayPal response has no approval_url link"))
    }

    async fn handle_callback(
        &self,
        ctx: &GatewayContext,
        gateway: &Gateway,
        request: &CallbackRequest,
    ) -> Result<CallbackOutcome> {
        let (Some(paypal_payment_id), Some(payer_id)) =
            (request.input("paymentId"), request.input("PayerID"))
        else {
            return Err(AppError::validation("PayPal return is missing paymentId or PayerID"));
        };

        let token = self.access_token(ctx, gateway).await?;
        let url = endpoint_url(
            &Self::api_url(gateway),
            &["v1", "payments", "payment", &paypal_payment_id, "execute"],
        )?;

        let response = ctx
            .http
            .post_json(&url, &json!({ "payer_id": payer_id }), Credentials::Bearer(&token))
            .await?
            .ensure_success("PayPal")?;

        let raw: Value = response.json("PayPal")?;
        let executed: ExecutedPayment = serde_json::from_value(raw.clone())
            .map_err(|e| AppError::provider(format!("Unexpected PayPal execute response: {}", e)))?;
        let transaction = executed
            .transactions
            .into_iter()
            .next()
            .ok_or_else(|| AppError::provider("PayPal execute response has no transactions"))?;

        let reference = transaction
            .invoice_number
            .as_ref()
            .and_then(scalar_to_string)
            .ok_or_else(|| AppError::provider("PayPal transaction has no invoice_number"))?;
        let payment = ctx.find_payment(&reference).await?;

        if payment.is_paid() {
            info!(payment_id = payment.id, "PayPal return for a payment that is already paid");
            return Ok(CallbackOutcome::AlreadyPaid(payment.id));
        }

        let total = Decimal::from_str(transaction.amount.total.trim()).map_err(|e| {
            AppError::validation(format!(
                "PayPal amount {} is not a decimal: {}",
                transaction.amount.total, e
            ))
        })?;
        verify(
            &payment,
            ReportedAmount::Major(total),
            Some(&transaction.amount.currency),
        )
        .into_result(payment.id)?;

        complete_once(ctx.payments.as_ref(), &payment, &raw).await
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct CreatedPayment {
    #[serde(default)]
    links: Vec<Link>,
}

#[derive(Debug, Deserialize)]
struct Link {
    href: String,
    rel: String,
}

#[derive(Debug, Deserialize)]
struct ExecutedPayment {
    #[serde(default)]
    transactions: Vec<Transaction>,
}

#[derive(Debug, Deserialize)]
struct Transaction {
    amount: Amount,
    invoice_number: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Amount {
    total: String,
    currency: String,
}
