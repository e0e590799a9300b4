pub mod callback_verifier;

pub use callback_verifier::{complete_once, verify, CallbackOutcome, ReportedAmount, Verification};
