use super::super::models::{Completion, Payment, PaymentId, PaymentStatus};
use crate::core::{AppError, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::MySqlPool;

/// Host payment ledger as seen by the gateway adapters
///
/// `complete` must be a single atomic conditional update so that duplicate
/// or replayed callbacks can never complete a payment twice.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Find payment by ID
    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>>;

    /// Mark a pending payment as paid and store the provider payload
    async fn complete(&self, id: PaymentId, provider_payload: &serde_json::Value)
        -> Result<Completion>;
}

/// MySQL-backed payment ledger
#[derive(Clone)]
pub struct MySqlPaymentRepository {
    pool: MySqlPool,
}

impl MySqlPaymentRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentRepository for MySqlPaymentRepository {
    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, user_id, user_email, amount, currency, status,
                   provider_payload, paid_at
            FROM payments
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }

    async fn complete(
        &self,
        id: PaymentId,
        provider_payload: &serde_json::Value,
    ) -> Result<Completion> {
        let result = sqlx::query(
            r#"
            UPDATE payments
            SET status = ?, provider_payload = ?, paid_at = ?
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(PaymentStatus::Paid)
        .bind(sqlx::types::Json(provider_payload))
        .bind(Utc::now())
        .bind(id)
        .bind(PaymentStatus::Pending)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            return Ok(Completion::Applied);
        }

        // Nothing updated: find out why
        match self.find_by_id(id).await? {
            None => Err(AppError::not_found(format!("Payment {}", id))),
            Some(payment) => match payment.status {
                PaymentStatus::Paid => Ok(Completion::AlreadyPaid),
                status @ PaymentStatus::Cancelled => Ok(Completion::NotPending(status)),
                PaymentStatus::Pending => Err(AppError::internal(format!(
                    "Payment {} is pending but was not updated",
                    id
                ))),
            },
        }
    }
}
