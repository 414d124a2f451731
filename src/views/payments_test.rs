use super::*;
use crate::list::Filters;

fn payload(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

#[test]
fn draft_accepts_string_numbers_from_forms() {
    let draft = draft_from_payload(&payload(json!({
        "event_id": "42",
        "amount": "1500.50",
        "payment_method": "gcash",
        "reference_number": "GC-001"
    })))
    .unwrap();

    assert_eq!(draft.event_id, 42);
    assert!((draft.amount - 1500.5).abs() < f64::EPSILON);
    assert_eq!(draft.reference_number.as_deref(), Some("GC-001"));
    assert_eq!(draft.notes, None);
}

#[test]
fn draft_rejects_zero_amount() {
    let err = draft_from_payload(&payload(json!({
        "event_id": 7,
        "amount": 0,
        "payment_method": "cash"
    })))
    .unwrap_err();

    assert_eq!(err, ValidationError::NonPositiveAmount { field: "amount".into() });
}

#[test]
fn draft_requires_method() {
    let err = draft_from_payload(&payload(json!({ "event_id": 7, "amount": 10 }))).unwrap_err();
    assert_eq!(err, ValidationError::Required { field: "payment_method".into() });
}

#[test]
fn schema_filters_on_payment_status() {
    let rows: Vec<EventPaymentSummary> = serde_json::from_value(json!([
        { "event_id": 1, "title": "Santos Wedding", "payment_status": "paid" },
        { "event_id": 2, "title": "Reyes Debut", "payment_status": "partial" },
        { "event_id": 3, "title": "Cruz Reunion", "organizer_name": "Santos Events", "payment_status": "partial" }
    ]))
    .unwrap();
    let schema = schema();
    let mut filters = Filters::new();

    filters.set("status", "partial");
    filters.set("search", "santos");

    let hits: Vec<RecordId> = rows.iter().filter(|r| schema.matches(&filters, r)).map(|r| r.id).collect();
    assert_eq!(hits, vec![3]);
}
