//! Cross-checks provider callbacks against the payment ledger.
//!
//! Every adapter funnels its callback through [`verify`] and then
//! [`complete_once`]; neither talks to a provider.

use super::super::models::{Completion, Payment, PaymentId, PaymentStatus};
use super::super::repositories::PaymentRepository;
use crate::core::{IntegrityViolation, Result};
use rust_decimal::Decimal;

/// Amount as reported by a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportedAmount {
    /// Currency units, e.g. `10.00`
    Major(Decimal),
    /// Smallest currency subdivision, e.g. `1000` cents
    Minor(Decimal),
}

/// Outcome of comparing a callback against the stored payment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Match,
    AmountMismatch { expected: Decimal, actual: Decimal },
    CurrencyMismatch { expected: String, actual: String },
}

impl Verification {
    pub fn is_match(&self) -> bool {
        matches!(self, Verification::Match)
    }

    /// Turns a mismatch into the matching integrity error
    pub fn into_result(self, payment_id: PaymentId) -> Result<()> {
        match self {
            Verification::Match => Ok(()),
            Verification::AmountMismatch { expected, actual } => {
                Err(IntegrityViolation::AmountMismatch {
                    payment_id,
                    expected,
                    actual,
                }
                .into())
            }
            Verification::CurrencyMismatch { expected, actual } => {
                Err(IntegrityViolation::CurrencyMismatch {
                    payment_id,
                    expected,
                    actual,
                }
                .into())
            }
        }
    }
}

/// Compare a reported amount (and currency, when the provider sends one)
/// with the stored payment.
///
/// Currency is checked first. Amounts compare as exact decimals after
/// scaling minor units by the payment currency's exponent.
pub fn verify(payment: &Payment, amount: ReportedAmount, currency: Option<&str>) -> Verification {
    if let Some(actual) = currency {
        if actual != payment.currency.code() {
            return Verification::CurrencyMismatch {
                expected: payment.currency.code().to_string(),
                actual: actual.to_string(),
            };
        }
    }

    let (expected, actual) = match amount {
        ReportedAmount::Major(actual) => (payment.amount, actual),
        ReportedAmount::Minor(actual) => (payment.currency.to_minor_units(payment.amount), actual),
    };

    if expected == actual {
        Verification::Match
    } else {
        Verification::AmountMismatch { expected, actual }
    }
}

/// What a provider callback did to the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// Payment moved from pending to paid
    Completed(PaymentId),
    /// Payment was already paid; nothing changed
    AlreadyPaid(PaymentId),
    /// Notification carries nothing to act on
    Ignored(String),
}

/// Complete a verified payment, at most once
pub async fn complete_once(
    payments: &dyn PaymentRepository,
    payment: &Payment,
    provider_payload: &serde_json::Value,
) -> Result<CallbackOutcome> {
    match payment.status {
        PaymentStatus::Paid => return Ok(CallbackOutcome::AlreadyPaid(payment.id)),
        PaymentStatus::Cancelled => {
            return Err(IntegrityViolation::NotPayable {
                payment_id: payment.id,
                status: payment.status,
            }
            .into())
        }
        PaymentStatus::Pending => {}
    }

    match payments.complete(payment.id, provider_payload).await? {
        Completion::Applied => Ok(CallbackOutcome::Completed(payment.id)),
        Completion::AlreadyPaid => Ok(CallbackOutcome::AlreadyPaid(payment.id)),
        Completion::NotPending(status) => Err(IntegrityViolation::NotPayable {
            payment_id: payment.id,
            status,
        }
        .into()),
    }
}
