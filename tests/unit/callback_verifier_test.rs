// Callback verification properties
//
// Exact decimal comparison of provider amounts and at-most-once completion.

#[path = "../helpers/mod.rs"]
mod helpers;

use gatewaypack::core::{AppError, Currency, IntegrityViolation};
use gatewaypack::payments::{
    complete_once, verify, CallbackOutcome, InMemoryPaymentRepository, Payment, PaymentStatus,
    ReportedAmount, Verification,
};
use helpers::TestDataFactory;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

fn payment_cents(cents: i64, currency: Currency) -> Payment {
    Payment::new(1, 1, Decimal::new(cents, 2), currency)
}

proptest! {
    #[test]
    fn prop_major_amount_equal_to_payment_matches(cents in 1i64..100_000_000) {
        let payment = payment_cents(cents, Currency::USD);
        let reported = ReportedAmount::Major(Decimal::new(cents, 2));
        prop_assert_eq!(verify(&payment, reported, Some("USD")), Verification::Match);
    }

    #[test]
    fn prop_minor_amount_scales_by_hundred(cents in 1i64..100_000_000) {
        let payment = payment_cents(cents, Currency::UAH);
        let reported = ReportedAmount::Minor(Decimal::from(cents));
        prop_assert!(verify(&payment, reported, None).is_match());
    }

    #[test]
    fn prop_any_other_amount_mismatches(cents in 1i64..100_000_000, delta in 1i64..10_000) {
        let payment = payment_cents(cents, Currency::EUR);
        let actual = Decimal::new(cents + delta, 2);
        prop_assert_eq!(
            verify(&payment, ReportedAmount::Major(actual), Some("EUR")),
            Verification::AmountMismatch { expected: payment.amount, actual }
        );
    }

    #[test]
    fn prop_paid_payment_stays_paid(repeats in 1usize..5) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        runtime.block_on(async {
            let repo = InMemoryPaymentRepository::new();
            let payment = TestDataFactory::payment(3, "12.00", Currency::USD);
            repo.insert(payment.clone()).await;

            let first = complete_once(&repo, &payment, &json!({"n": 0})).await.unwrap();
            assert_eq!(first, CallbackOutcome::Completed(3));

            // Stale snapshot still says pending; the repository decides
            for n in 0..repeats {
                let again = complete_once(&repo, &payment, &json!({"n": n + 1})).await.unwrap();
                assert_eq!(again, CallbackOutcome::AlreadyPaid(3));
            }
            assert_eq!(repo.applied_completions(3).await, 1);
        });
    }
}

#[test]
fn test_trailing_zeros_do_not_matter() {
    let payment = payment_cents(2550, Currency::USD);
    assert!(verify(&payment, ReportedAmount::Major(dec!(25.5)), Some("USD")).is_match());
    assert!(verify(&payment, ReportedAmount::Major(dec!(25.500)), Some("USD")).is_match());
}

#[test]
fn test_float_noise_is_a_mismatch() {
    let payment = payment_cents(1000, Currency::USD);
    let result = verify(&payment, ReportedAmount::Major(dec!(10.0000001)), Some("USD"));
    assert!(!result.is_match());
}

#[test]
fn test_currency_checked_before_amount() {
    let payment = payment_cents(1000, Currency::USD);
    let result = verify(&payment, ReportedAmount::Major(dec!(99)), Some("EUR"));
    assert_eq!(
        result,
        Verification::CurrencyMismatch {
            expected: "USD".to_string(),
            actual: "EUR".to_string()
        }
    );
}

#[test]
fn test_zero_decimal_currency_minor_units() {
    let payment = Payment::new(1, 1, dec!(500), Currency::JPY);
    assert!(verify(&payment, ReportedAmount::Minor(dec!(500)), None).is_match());
}

#[test]
fn test_mismatch_becomes_integrity_error() {
    let err = Verification::AmountMismatch {
        expected: dec!(10.00),
        actual: dec!(9.99),
    }
    .into_result(8)
    .unwrap_err();

    assert!(matches!(
        err,
        AppError::Integrity(IntegrityViolation::AmountMismatch { payment_id: 8, .. })
    ));
    assert_eq!(err.payment_id(), Some(8));
}

#[tokio::test]
async fn test_cancelled_payment_is_not_payable() {
    let repo = InMemoryPaymentRepository::new();
    let mut payment = TestDataFactory::payment(4, "5.00", Currency::EUR);
    payment.status = PaymentStatus::Cancelled;
    repo.insert(payment.clone()).await;

    let err = complete_once(&repo, &payment, &json!({})).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Integrity(IntegrityViolation::NotPayable { payment_id: 4, .. })
    ));
    assert_eq!(repo.applied_completions(4).await, 0);
}
