use super::super::models::{Completion, Payment, PaymentId, PaymentStatus};
use super::payment_repository::PaymentRepository;
use crate::core::{AppError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Payment ledger kept in process memory
///
/// Used for local runs without a database and by the integration tests.
/// The write lock makes `complete` behave like the conditional SQL update.
#[derive(Default)]
pub struct InMemoryPaymentRepository {
    payments: RwLock<HashMap<PaymentId, Payment>>,
    applied: RwLock<HashMap<PaymentId, usize>>,
}

impl InMemoryPaymentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, payment: Payment) {
        self.payments.write().await.insert(payment.id, payment);
    }

    /// How many times `complete` actually transitioned this payment
    pub async fn applied_completions(&self, id: PaymentId) -> usize {
        self.applied.read().await.get(&id).copied().unwrap_or(0)
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>> {
        Ok(self.payments.read().await.get(&id).cloned())
    }

    async fn complete(
        &self,
        id: PaymentId,
        provider_payload: &serde_json::Value,
    ) -> Result<Completion> {
        let mut payments = self.payments.write().await;
        let payment = payments
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Payment {}", id)))?;

        match payment.status {
            PaymentStatus::Paid => Ok(Completion::AlreadyPaid),
            PaymentStatus::Cancelled => Ok(Completion::NotPending(payment.status)),
            PaymentStatus::Pending => {
                payment.status = PaymentStatus::Paid;
                payment.provider_payload = Some(provider_payload.clone());
                payment.paid_at = Some(Utc::now());
                *self.applied.write().await.entry(id).or_insert(0) += 1;
                Ok(Completion::Applied)
            }
        }
    }
}
