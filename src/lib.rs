//! GatewayPack payment gateway adapters
//!
//! Bank-transfer (Monobank), PayPal REST and prepaid-voucher (Paysafecard)
//! integrations behind one adapter contract, with callback verification
//! against the host's payment ledger.

pub mod config;
pub mod core;
pub mod modules;

// Re-export commonly used types
pub use modules::gateways;
pub use modules::payments;
