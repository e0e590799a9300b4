use crate::core::Currency;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Host ledger identifier of a payment
pub type PaymentId = i64;

/// Payment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(16)", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Cancelled,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Paid => write!(f, "paid"),
            PaymentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "paid" => Ok(PaymentStatus::Paid),
            "cancelled" => Ok(PaymentStatus::Cancelled),
            _ => Err(format!("Invalid payment status: {}", s)),
        }
    }
}

/// Payment record owned by the host ledger
///
/// Adapters read `id`, `amount` and `currency`; only the repository's
/// `complete` mutates it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub id: PaymentId,

    /// Owning user
    pub user_id: i64,

    /// Owning user's email, forwarded to providers that want a customer identity
    pub user_email: Option<String>,

    /// Amount in currency units (not minor units)
    pub amount: Decimal,

    pub currency: Currency,

    pub status: PaymentStatus,

    /// Provider payload stored at completion
    pub provider_payload: Option<serde_json::Value>,

    pub paid_at: Option<DateTime<Utc>>,
}

impl Payment {
    /// Create a new pending payment
    pub fn new(id: PaymentId, user_id: i64, amount: Decimal, currency: Currency) -> Self {
        Self {
            id,
            user_id,
            user_email: None,
            amount,
            currency,
            status: PaymentStatus::Pending,
            provider_payload: None,
            paid_at: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.user_email = Some(email.into());
        self
    }

    pub fn is_paid(&self) -> bool {
        self.status == PaymentStatus::Paid
    }
}

/// Result of the ledger's conditional `pending -> paid` update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// This call performed the transition
    Applied,
    /// Another callback got there first
    AlreadyPaid,
    /// Payment is in a state that can't be completed
    NotPending(PaymentStatus),
}
