pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Completion, Payment, PaymentId, PaymentStatus};
pub use repositories::{InMemoryPaymentRepository, MySqlPaymentRepository, PaymentRepository};
pub use services::{complete_once, verify, CallbackOutcome, ReportedAmount, Verification};
