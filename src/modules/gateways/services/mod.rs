pub mod gateway_service;
pub mod gateway_trait;
pub mod http_client;
pub mod monobank;
pub mod paypal_rest;
pub mod paysafecard;
pub mod redirect;
pub mod registry;

pub use gateway_service::{CallbackReport, GatewayService};
pub use gateway_trait::{CallbackMode, GatewayContext, PaymentGateway};
pub use http_client::{Credentials, ProviderClient, ProviderResponse};
pub use monobank::Monobank;
pub use paypal_rest::PayPalRest;
pub use paysafecard::Paysafecard;
pub use redirect::{HostUrls, Redirect};
pub use registry::GatewayPack;
