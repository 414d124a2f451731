use super::*;

#[test]
fn list_params_body_skips_pass_through_filters() {
    let mut params = ListParams { page: Some(2), limit: Some(10), ..ListParams::default() };
    params.filters.insert("status".into(), "all".into());
    params.filters.insert("search".into(), "  ".into());
    params.filters.insert("category".into(), " catering ".into());

    let body = params.to_body();
    assert_eq!(body, json!({ "page": 2, "limit": 10, "category": "catering" }));
}

#[test]
fn list_params_default_is_empty_object() {
    assert_eq!(ListParams::default().to_body(), json!({}));
}

#[test]
fn entity_operation_names() {
    assert_eq!(Entity::Organizer.operation("create"), "createOrganizer");
    assert_eq!(Entity::Staff.operation("delete"), "deleteStaff");
    assert_eq!(Entity::Supplier.operation("update"), "updateSupplier");
    assert_eq!(Entity::Venue.operation("create"), "createVenue");
    assert_eq!(Entity::Venue.id_field(), "venue_id");
}

#[tokio::test]
async fn upload_rejects_oversized_file_before_sending() {
    let config = crate::config::AdminConfig { api_base_url: "http://127.0.0.1:9".into(), ..Default::default() };
    let api = AdminApi::new(ApiClient::new(&config).unwrap());
    let err = api
        .upload("banner.png", vec![0_u8; 11], "venue", 10)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(validation::ValidationError::FileTooLarge { size: 11, max: 10 })));
}

#[tokio::test]
async fn create_payment_validates_before_sending() {
    let config = crate::config::AdminConfig { api_base_url: "http://127.0.0.1:9".into(), ..Default::default() };
    let api = AdminApi::new(ApiClient::new(&config).unwrap());
    let draft = PaymentDraft {
        event_id: 1,
        amount: -5.0,
        payment_method: "cash".into(),
        reference_number: None,
        notes: None,
    };
    assert!(matches!(api.create_payment(&draft).await, Err(ApiError::Validation(_))));
}
