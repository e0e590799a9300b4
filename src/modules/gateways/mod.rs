pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use controllers::{configure, AppState};
pub use models::{AdapterDescriptor, CallbackRequest, Gateway, GatewayEnvironment, GatewaySettings};
pub use repositories::{GatewayRepository, InMemoryGatewayRepository, MySqlGatewayRepository};
pub use services::{
    CallbackReport, GatewayContext, GatewayPack, GatewayService, HostUrls, PaymentGateway,
    ProviderClient, Redirect,
};
