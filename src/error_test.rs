use super::*;

#[test]
fn application_error_prefers_server_message() {
    let err = ApiError::Application { message: "Booking already confirmed".into() };
    let notice = err.notice("Update failed").unwrap();
    assert_eq!(notice.description, "Booking already confirmed");
    assert_eq!(notice.severity, Severity::Destructive);
    assert_eq!(notice.title, "Update failed");
}

#[test]
fn blank_application_message_falls_back() {
    let err = ApiError::Application { message: "  ".into() };
    let notice = err.notice("x").unwrap();
    assert_eq!(notice.description, GENERIC_APPLICATION_MESSAGE);
}

#[test]
fn transport_errors_use_generic_message() {
    for err in [
        ApiError::Transport("connection refused".into()),
        ApiError::Timeout,
        ApiError::HttpStatus { status: 502, body: String::new() },
        ApiError::Decode("eof".into()),
    ] {
        assert_eq!(err.category(), ErrorCategory::Transport);
        assert_eq!(err.notice("x").unwrap().description, GENERIC_TRANSPORT_MESSAGE);
    }
}

#[test]
fn cancelled_has_no_notice() {
    assert!(ApiError::Cancelled.notice("x").is_none());
    assert_eq!(ApiError::Cancelled.category(), ErrorCategory::Lifecycle);
}

#[test]
fn validation_error_is_validation_category() {
    let err = ApiError::from(ValidationError::FileTooLarge { size: 10, max: 5 });
    assert_eq!(err.category(), ErrorCategory::Validation);
    assert!(err.notice("x").unwrap().description.contains("too large"));
}

#[test]
fn notice_log_drain_empties() {
    let log = NoticeLog::new();
    let shared = log.clone();
    shared.notify(Notice::info("a", "b"));
    assert_eq!(log.snapshot().len(), 1);
    assert_eq!(log.drain().len(), 1);
    assert!(log.snapshot().is_empty());
}
