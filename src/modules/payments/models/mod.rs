pub mod payment;

pub use payment::{Completion, Payment, PaymentId, PaymentStatus};
