use super::*;
use serde_json::json;

fn sample() -> Value {
    json!({
        "booking_id": "12",
        "booking_reference": "BK-0012",
        "customer_name": "Dana Cruz",
        "client_email": "dana@example.com",
        "event_type": "Wedding",
        "event_date": "2026-11-02",
        "guest_count": "150",
        "total_amount": "85000.00",
        "status": "pending",
        "created_at": "2026-10-01 09:15:00",
        "special_requests": "vegan menu"
    })
}

#[test]
fn decodes_php_row() {
    let booking: Booking = serde_json::from_value(sample()).unwrap();
    assert_eq!(booking.id, 12);
    assert_eq!(booking.reference.as_deref(), Some("BK-0012"));
    assert_eq!(booking.client_name.as_deref(), Some("Dana Cruz"));
    assert_eq!(booking.guest_count, Some(150));
    assert_eq!(booking.total_amount, Some(85_000.0));
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.extra.get("special_requests"), Some(&json!("vegan menu")));
}

#[test]
fn missing_optional_fields_default() {
    let booking: Booking = serde_json::from_value(json!({ "id": 3 })).unwrap();
    assert_eq!(booking.id, 3);
    assert!(booking.reference.is_none());
    assert_eq!(booking.status, BookingStatus::Unknown);
    assert!(booking.extra.is_empty());
}

#[test]
fn unknown_fields_survive_serialization() {
    let booking: Booking = serde_json::from_value(sample()).unwrap();
    let out = serde_json::to_value(&booking).unwrap();
    assert_eq!(out["special_requests"], "vegan menu");
    assert_eq!(out["booking_id"], 12);
}

#[test]
fn apply_status_parses_wire_value() {
    let mut booking: Booking = serde_json::from_value(sample()).unwrap();
    assert!(booking.apply_status("confirmed"));
    assert_eq!(booking.status, BookingStatus::Confirmed);
    assert!(!booking.apply_status("bogus"));
    assert_eq!(booking.status, BookingStatus::Confirmed);
}
