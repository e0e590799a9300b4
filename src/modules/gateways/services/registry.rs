use super::gateway_trait::PaymentGateway;
use super::monobank::Monobank;
use super::paypal_rest::PayPalRest;
use super::paysafecard::Paysafecard;
use crate::modules::gateways::models::AdapterDescriptor;
use std::collections::BTreeMap;
use std::sync::Arc;

/// The adapters shipped in this pack
#[derive(Clone)]
pub struct GatewayPack {
    gateways: Vec<Arc<dyn PaymentGateway>>,
}

impl GatewayPack {
    pub fn new() -> Self {
        Self {
            gateways: vec![
                Arc::new(Monobank),
                Arc::new(PayPalRest),
                Arc::new(Paysafecard),
            ],
        }
    }

    /// Adapter for the endpoint stored in a gateway record
    pub fn find(&self, endpoint: &str) -> Option<Arc<dyn PaymentGateway>> {
        self.gateways
            .iter()
            .find(|gateway| gateway.endpoint() == endpoint)
            .cloned()
    }

    /// Driver name to descriptor, for the admin listing
    pub fn drivers(&self) -> BTreeMap<&'static str, AdapterDescriptor> {
        self.gateways
            .iter()
            .map(|gateway| {
                let descriptor = gateway.descriptor();
                (descriptor.driver, descriptor)
            })
            .collect()
    }

    pub fn endpoints(&self) -> Vec<&'static str> {
        self.gateways.iter().map(|gateway| gateway.endpoint()).collect()
    }
}

impl Default for GatewayPack {
    fn default() -> Self {
        Self::new()
    }
}
