pub mod callback_request;
pub mod descriptor;
pub mod gateway_config;

pub use callback_request::{decimal_from_json, scalar_to_string, CallbackRequest};
pub use descriptor::{AdapterDescriptor, ConfigSchema, PaymentKind};
pub use gateway_config::{Gateway, GatewayEnvironment, GatewaySettings};
