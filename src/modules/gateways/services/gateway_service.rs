use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, error, info};

use super::gateway_trait::{CallbackMode, GatewayContext, PaymentGateway};
use super::redirect::{HostUrls, Redirect};
use super::registry::GatewayPack;
use crate::core::{AppError, Result};
use crate::modules::gateways::models::{AdapterDescriptor, CallbackRequest, Gateway};
use crate::modules::payments::{CallbackOutcome, Payment};

const ERROR_PROCESSING: &str = "Error processing payment";
const VERIFICATION_FAILED: &str = "Payment verification failed";

/// Routes host requests to the right adapter and applies the failure policy:
/// adapter errors are logged and turned into redirects, never surfaced to the payer.
pub struct GatewayService {
    pack: GatewayPack,
    ctx: GatewayContext,
}

/// What a callback did and where to send the client
#[derive(Debug)]
pub struct CallbackReport {
    pub redirect: Redirect,
    pub outcome: Result<CallbackOutcome>,
}

impl GatewayService {
    pub fn new(pack: GatewayPack, ctx: GatewayContext) -> Self {
        Self { pack, ctx }
    }

    /// Get the adapter for a gateway record
    pub fn get_gateway(&self, endpoint: &str) -> Result<Arc<dyn PaymentGateway>> {
        self.pack
            .find(endpoint)
            .ok_or_else(|| AppError::NotFound(format!("Gateway '{}' not found", endpoint)))
    }

    pub fn urls(&self) -> &HostUrls {
        &self.ctx.urls
    }

    /// Start a payment; failures send the payer to the cancel page
    pub async fn process_gateway(&self, gateway: &Gateway, payment: &Payment) -> Result<Redirect> {
        let adapter = self.get_gateway(&gateway.endpoint)?;

        info!(
            gateway = %gateway.endpoint,
            payment_id = payment.id,
            amount = %payment.amount,
            currency = %payment.currency,
            "Initiating payment with gateway"
        );

        match adapter.initiate(&self.ctx, gateway, payment).await {
            Ok(url) => {
                info!(gateway = %gateway.endpoint, payment_id = payment.id, "Redirecting payer to provider");
                Ok(Redirect::Away(url))
            }
            Err(e) => {
                error!(
                    gateway = %gateway.endpoint,
                    payment_id = payment.id,
                    error = %e,
                    "Failed to initiate payment"
                );
                Ok(Redirect::PaymentCancel(payment.id))
            }
        }
    }

    /// Handle a provider callback or payer return
    pub async fn return_gateway(
        &self,
        gateway: &Gateway,
        request: &CallbackRequest,
    ) -> Result<CallbackReport> {
        let adapter = self.get_gateway(&gateway.endpoint)?;
        let outcome = adapter.handle_callback(&self.ctx, gateway, request).await;
        Ok(report(adapter.as_ref(), gateway, outcome))
    }

    /// A callback whose request could not be read; answered like a rejected one
    pub fn reject_callback(&self, gateway: &Gateway, error: AppError) -> Result<CallbackReport> {
        let adapter = self.get_gateway(&gateway.endpoint)?;
        Ok(report(adapter.as_ref(), gateway, Err(error)))
    }

    pub async fn process_refund(
        &self,
        gateway: &Gateway,
        payment: &Payment,
        data: &serde_json::Value,
    ) -> Result<()> {
        let adapter = self.get_gateway(&gateway.endpoint)?;
        adapter
            .process_refund(&self.ctx, gateway, payment, data)
            .await
            .inspect_err(|e| {
                info!(gateway = %gateway.endpoint, payment_id = payment.id, error = %e, "Refund not processed");
            })
    }

    pub fn check_subscription(&self, gateway: &Gateway, subscription_id: &str) -> Result<bool> {
        Ok(self
            .get_gateway(&gateway.endpoint)?
            .check_subscription(gateway, subscription_id))
    }

    /// Fill in the adapter's settings keys missing from a stored gateway record
    pub fn merge_config(&self, gateway: &mut Gateway) -> Result<()> {
        let schema = self.get_gateway(&gateway.endpoint)?.config_schema();
        gateway.config.merge_defaults(&schema);
        Ok(())
    }

    pub fn drivers(&self) -> BTreeMap<&'static str, AdapterDescriptor> {
        self.pack.drivers()
    }
}

fn report(
    adapter: &dyn PaymentGateway,
    gateway: &Gateway,
    outcome: Result<CallbackOutcome>,
) -> CallbackReport {
    match &outcome {
        Ok(CallbackOutcome::Completed(payment_id)) => {
            info!(gateway = %gateway.endpoint, payment_id, "Payment completed");
        }
        Ok(CallbackOutcome::AlreadyPaid(payment_id)) => {
            info!(gateway = %gateway.endpoint, payment_id, "Payment already completed, callback ignored");
        }
        Ok(CallbackOutcome::Ignored(reason)) => {
            debug!(gateway = %gateway.endpoint, reason = %reason, "Callback ignored");
        }
        Err(e) => {
            error!(
                gateway = %gateway.endpoint,
                payment_id = ?e.payment_id(),
                error = %e,
                "Callback rejected"
            );
        }
    }

    let redirect = match adapter.callback_mode() {
        CallbackMode::Webhook => Redirect::Acknowledge,
        CallbackMode::BrowserReturn => browser_redirect(&outcome),
    };

    CallbackReport { redirect, outcome }
}

fn browser_redirect(outcome: &Result<CallbackOutcome>) -> Redirect {
    match outcome {
        Ok(CallbackOutcome::Completed(id)) | Ok(CallbackOutcome::AlreadyPaid(id)) => {
            Redirect::PaymentSuccess(*id)
        }
        Ok(CallbackOutcome::Ignored(_)) => Redirect::Dashboard {
            error: ERROR_PROCESSING.to_string(),
        },
        Err(e) => match e.payment_id() {
            Some(id) => Redirect::PaymentCancel(id),
            None => Redirect::Dashboard {
                error: match e {
                    AppError::ProviderCommunication(_) => VERIFICATION_FAILED,
                    _ => ERROR_PROCESSING,
                }
                .to_string(),
            },
        },
    }
}
