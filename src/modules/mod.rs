pub mod gateways;
pub mod payments;
