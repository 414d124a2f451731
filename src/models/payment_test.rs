use super::*;
use serde_json::json;

#[test]
fn event_summary_with_nested_payments() {
    let summary: EventPaymentSummary = serde_json::from_value(json!({
        "event_id": 40,
        "event_title": "Santos Debut",
        "total_budget": "120000",
        "total_paid": "30000",
        "payment_percentage": 25,
        "payment_status": "partial",
        "payments": [
            { "payment_id": "1", "event_id": "40", "payment_amount": "30000", "payment_method": "gcash", "payment_status": "paid" }
        ]
    }))
    .unwrap();

    assert_eq!(summary.id, 40);
    assert_eq!(summary.title, "Santos Debut");
    assert_eq!(summary.total_amount, Some(120_000.0));
    assert!((summary.total_paid - 30_000.0).abs() < f64::EPSILON);
    assert_eq!(summary.payment_status, PaymentStatus::Partial);
    assert_eq!(summary.payments.len(), 1);
    assert_eq!(summary.payments[0].event_id, Some(40));
    assert_eq!(summary.payments[0].status, PaymentStatus::Paid);
}

#[test]
fn total_paid_defaults_to_zero() {
    let summary: EventPaymentSummary = serde_json::from_value(json!({ "id": 1, "total_paid": null })).unwrap();
    assert!(summary.total_paid.abs() < f64::EPSILON);
    assert_eq!(summary.payment_status, PaymentStatus::Unknown);
}

#[test]
fn draft_validation() {
    let mut draft = PaymentDraft {
        event_id: 1,
        amount: 500.0,
        payment_method: "cash".into(),
        reference_number: None,
        notes: None,
    };
    assert!(draft.validate().is_ok());

    draft.payment_method = " ".into();
    assert_eq!(draft.validate(), Err(ValidationError::Required { field: "payment_method".into() }));

    draft.payment_method = "cash".into();
    draft.amount = 0.0;
    assert!(matches!(draft.validate(), Err(ValidationError::NonPositiveAmount { .. })));
}

#[test]
fn draft_skips_absent_optionals() {
    let draft = PaymentDraft {
        event_id: 9,
        amount: 10.0,
        payment_method: "bank".into(),
        reference_number: None,
        notes: Some("deposit".into()),
    };
    let body = serde_json::to_value(&draft).unwrap();
    assert!(body.get("reference_number").is_none());
    assert_eq!(body["notes"], "deposit");
}
