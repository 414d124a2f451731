use super::*;
use serde_json::json;

#[test]
fn success_strips_status_and_message() {
    let env = parse_envelope(r#"{"status":"success","message":"ok","data":[1,2]}"#).unwrap();
    assert_eq!(env.message.as_deref(), Some("ok"));
    assert!(!env.payload.contains_key("status"));
    assert_eq!(env.payload["data"], json!([1, 2]));
}

#[test]
fn error_status_carries_message() {
    let err = parse_envelope(r#"{"status":"error","message":"Organizer email already exists"}"#).unwrap_err();
    assert!(matches!(err, ApiError::Application { message } if message == "Organizer email already exists"));
}

#[test]
fn missing_status_is_not_success() {
    let err = parse_envelope(r#"{"data":[]}"#).unwrap_err();
    assert!(matches!(err, ApiError::Application { message } if message.is_empty()));
}

#[test]
fn status_comparison_is_exact() {
    assert!(parse_envelope(r#"{"status":"Success"}"#).is_err());
    assert!(parse_envelope(r#"{"status":true}"#).is_err());
}

#[test]
fn non_object_body_is_decode_error() {
    assert!(matches!(parse_envelope("[1]"), Err(ApiError::Decode(_))));
    assert!(matches!(parse_envelope("<html>Fatal error</html>"), Err(ApiError::Decode(_))));
}

#[test]
fn take_uses_first_present_key() {
    let mut env = parse_envelope(r#"{"status":"success","bookings":[1],"data":[2,3]}"#).unwrap();
    let items: Vec<i64> = env.take(&["bookings", "data"]).unwrap();
    assert_eq!(items, vec![1]);
    let rest: Vec<i64> = env.take(&["bookings", "data"]).unwrap();
    assert_eq!(rest, vec![2, 3]);
    assert!(matches!(env.take::<Vec<i64>>(&["bookings"]), Err(ApiError::Decode(_))));
}

#[test]
fn take_or_payload_falls_back() {
    #[derive(serde::Deserialize)]
    struct Counts {
        unread: i64,
    }
    let env = parse_envelope(r#"{"status":"success","unread":4}"#).unwrap();
    let counts: Counts = env.take_or_payload(&["counts"]).unwrap();
    assert_eq!(counts.unread, 4);
}

#[test]
fn total_reads_direct_and_nested() {
    let env = parse_envelope(r#"{"status":"success","total":"25"}"#).unwrap();
    assert_eq!(env.total(), Some(25));
    let env = parse_envelope(r#"{"status":"success","pagination":{"total":9}}"#).unwrap();
    assert_eq!(env.total(), Some(9));
    let env = parse_envelope(r#"{"status":"success"}"#).unwrap();
    assert_eq!(env.total(), None);
}

#[test]
fn created_id_lookup_order() {
    let env = parse_envelope(r#"{"status":"success","organizer_id":"31"}"#).unwrap();
    assert_eq!(env.created_id("organizer_id"), Some(31));
    let env = parse_envelope(r#"{"status":"success","data":{"organizer_id":5}}"#).unwrap();
    assert_eq!(env.created_id("organizer_id"), Some(5));
    let env = parse_envelope(r#"{"status":"success"}"#).unwrap();
    assert_eq!(env.created_id("organizer_id"), None);
}
