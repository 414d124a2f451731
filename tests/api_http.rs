//! End-to-end checks against a stub PHP backend served by axum on an
//! ephemeral port.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::{FromRequest, Multipart, Query, Request, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde_json::{Map, Value, json};

use eventdesk::api::{AdminApi, ApiClient, NotificationsApi, Script, images};
use eventdesk::config::AdminConfig;
use eventdesk::error::{ApiError, NoticeLog, Severity};
use eventdesk::models::{BookingStatus, OnboardingStatus};
use eventdesk::notifications::NotificationFeed;
use eventdesk::validation::ValidationError;
use eventdesk::views::{self, ViewContext};

// =============================================================================
// STUB BACKEND
// =============================================================================

#[derive(Debug, Clone, Default)]
struct UploadedFile {
    fields: HashMap<String, String>,
    file_name: Option<String>,
    size: usize,
}

#[derive(Default)]
struct Backend {
    bookings: Mutex<Vec<Value>>,
    organizers: Mutex<Vec<Value>>,
    calls: Mutex<Vec<(String, Value)>>,
    uploads: Mutex<Vec<UploadedFile>>,
}

impl Backend {
    fn seeded() -> Self {
        let bookings = (1..=25)
            .map(|id| {
                json!({
                    "booking_id": id,
                    "booking_reference": format!("BK-{id:04}"),
                    "client_name": format!("Client {id}"),
                    "total_amount": "15000.00",
                    "status": if id % 2 == 0 { "confirmed" } else { "pending" },
                })
            })
            .collect();
        let organizers = vec![
            json!({ "organizer_id": "1", "name": "Lumen Events", "email": "hi@lumen.ph", "status": "approved" }),
            json!({ "organizer_id": "2", "name": "Tala Weddings", "status": "pending" }),
        ];
        Self { bookings: Mutex::new(bookings), organizers: Mutex::new(organizers), ..Self::default() }
    }

    fn operations(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(op, _)| op.clone()).collect()
    }

    fn last_body(&self, operation: &str) -> Option<Value> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(op, _)| op == operation)
            .map(|(_, body)| body.clone())
    }
}

fn success(mut payload: Value) -> Response {
    if let Some(map) = payload.as_object_mut() {
        map.insert("status".into(), json!("success"));
    }
    axum::Json(payload).into_response()
}

fn failure(message: &str) -> Response {
    axum::Json(json!({ "status": "error", "message": message })).into_response()
}

async fn admin(
    State(backend): State<Arc<Backend>>,
    Query(query): Query<HashMap<String, String>>,
    request: Request,
) -> Response {
    let operation = query.get("operation").cloned().unwrap_or_default();

    if operation == "upload" {
        let mut multipart = Multipart::from_request(request, &()).await.unwrap();
        let mut upload = UploadedFile::default();
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap_or_default().to_owned();
            if name == "file" {
                upload.file_name = field.file_name().map(str::to_owned);
                upload.size = field.bytes().await.unwrap().len();
            } else {
                upload.fields.insert(name, field.text().await.unwrap());
            }
        }
        let path = format!("uploads/venues/{}", upload.file_name.clone().unwrap_or_default());
        backend.uploads.lock().unwrap().push(upload);
        return success(json!({ "filePath": path }));
    }

    let bytes = to_bytes(request.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap_or_else(|_| json!({}));
    backend.calls.lock().unwrap().push((operation.clone(), body.clone()));

    match operation.as_str() {
        "getAllBookings" => {
            let status = body.get("status").and_then(Value::as_str);
            let rows: Vec<Value> = backend
                .bookings
                .lock()
                .unwrap()
                .iter()
                .filter(|b| status.is_none_or(|s| b["status"] == s))
                .cloned()
                .collect();
            let total = rows.len();
            let limit = body.get("limit").and_then(Value::as_u64).map_or(total, |v| v as usize);
            let page = body.get("page").and_then(Value::as_u64).unwrap_or(1) as usize;
            let start = ((page - 1) * limit).min(total);
            let end = (start + limit).min(total);
            let page_rows = rows[start..end].to_vec();
            success(json!({ "bookings": page_rows, "pagination": { "total": total } }))
        }
        "updateBookingStatus" => {
            let id = body["booking_id"].as_i64().unwrap();
            let status = body["status"].clone();
            for booking in backend.bookings.lock().unwrap().iter_mut() {
                if booking["booking_id"] == id {
                    booking["status"] = status.clone();
                }
            }
            success(json!({ "message": "Booking status updated" }))
        }
        "convertBookingToEvent" => {
            if body["booking_id"] == 13 {
                failure("Booking already converted")
            } else {
                success(json!({ "event_id": "77" }))
            }
        }
        "getAllOrganizers" => {
            let organizers = backend.organizers.lock().unwrap().clone();
            success(json!({ "data": organizers }))
        }
        "createOrganizer" => {
            let mut organizer = body.clone();
            organizer["organizer_id"] = json!(3);
            backend.organizers.lock().unwrap().push(organizer);
            success(json!({ "organizer_id": 3 }))
        }
        "getSessionAnalytics" => success(json!({
            "analytics": { "total_sessions": "40", "active_sessions": 3, "unique_users": 12, "avg_session_duration": "17.5" }
        })),
        "boom" => (StatusCode::INTERNAL_SERVER_ERROR, "Fatal error").into_response(),
        _ => failure("Unknown operation"),
    }
}

async fn notifications(Query(query): Query<HashMap<String, String>>) -> Response {
    let all = [
        json!({ "notification_id": 1, "title": "New booking", "message": "BK-0001", "type": "booking", "is_read": 0, "created_at": "2026-03-01 09:00:00" }),
        json!({ "notification_id": 2, "title": "Payment", "message": "Paid", "type": "payment", "is_read": "1", "created_at": "2026-03-01 10:30:00" }),
    ];
    match query.get("operation").map(String::as_str) {
        Some("get_recent") => {
            let since = query.get("since").cloned().unwrap_or_default();
            let items: Vec<&Value> = all
                .iter()
                .filter(|n| n["created_at"].as_str().unwrap_or_default() > since.as_str())
                .collect();
            success(json!({ "notifications": items }))
        }
        Some("get_counts") => success(json!({ "counts": { "unread_count": "1", "total_count": 2 } })),
        _ => failure("Invalid operation"),
    }
}

async fn serve_image(Query(query): Query<HashMap<String, String>>) -> Response {
    match query.get("path").map(String::as_str) {
        Some("uploads/venues/hall.png") => Response::builder()
            .header(header::CONTENT_TYPE, "image/png")
            .body(Body::from(vec![0x89, b'P', b'N', b'G']))
            .unwrap(),
        _ => failure("Image not found"),
    }
}

async fn spawn_backend() -> (String, Arc<Backend>) {
    let backend = Arc::new(Backend::seeded());
    let app = Router::new()
        .route("/api/admin.php", post(admin))
        .route("/api/notifications.php", get(notifications))
        .route("/api/serve-image.php", get(serve_image))
        .with_state(Arc::clone(&backend));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/api"), backend)
}

fn client(base_url: &str) -> ApiClient {
    let config = AdminConfig { api_base_url: base_url.to_owned(), ..AdminConfig::default() };
    ApiClient::new(&config).unwrap()
}

fn context(base_url: &str) -> (ViewContext, NoticeLog) {
    let log = NoticeLog::new();
    (ViewContext::new(client(base_url), 10, Arc::new(log.clone())), log)
}

// =============================================================================
// ENVELOPE
// =============================================================================

#[tokio::test]
async fn error_status_becomes_application_error() {
    let (base, _backend) = spawn_backend().await;

    let err = client(&base)
        .post_json(Script::Admin, "noSuchOperation", &json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Application { ref message } if message == "Unknown operation"));
}

#[tokio::test]
async fn server_error_status_is_a_transport_error() {
    let (base, _backend) = spawn_backend().await;

    let err = client(&base).post_json(Script::Admin, "boom", &json!({})).await.unwrap_err();

    assert!(matches!(err, ApiError::HttpStatus { status: 500, .. }));
    let notice = err.notice("Failed").unwrap();
    assert_ne!(notice.description, "Fatal error");
}

// =============================================================================
// BOOKINGS VIEW
// =============================================================================

#[tokio::test]
async fn bookings_paginate_on_the_server() {
    let (base, backend) = spawn_backend().await;
    let (ctx, log) = context(&base);
    let mut view = views::bookings::view(&ctx);

    view.load().await.unwrap();
    assert_eq!(view.page_items().len(), 10);
    assert_eq!(view.total_pages(), 3);

    view.set_page(3).await.unwrap();
    assert_eq!(view.page_items().len(), 5);
    assert_eq!(backend.last_body("getAllBookings").unwrap()["page"], 3);

    view.apply_filter("status", "confirmed").await.unwrap();
    let body = backend.last_body("getAllBookings").unwrap();
    assert_eq!(body["status"], "confirmed");
    assert_eq!(body["page"], 1);
    assert_eq!(view.filtered_count(), 12);
    assert!(log.snapshot().is_empty());
}

#[tokio::test]
async fn booking_status_change_reloads_from_backend() {
    let (base, backend) = spawn_backend().await;
    let (ctx, log) = context(&base);
    let mut view = views::bookings::view(&ctx);
    view.load().await.unwrap();

    view.set_status(1, BookingStatus::Cancelled).await.unwrap();

    assert_eq!(view.items()[0].status, BookingStatus::Cancelled);
    assert_eq!(
        backend.operations(),
        vec!["getAllBookings", "updateBookingStatus", "getAllBookings"]
    );
    let notices = log.drain();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Info);
}

#[tokio::test]
async fn failed_conversion_surfaces_server_message() {
    let (base, _backend) = spawn_backend().await;
    let (ctx, log) = context(&base);
    let mut view = views::bookings::view(&ctx);
    view.load().await.unwrap();

    let err = view.convert_to_event(13).await.unwrap_err();

    assert!(matches!(err, ApiError::Application { .. }));
    assert_eq!(view.pending(), None);
    let notices = log.drain();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].description, "Booking already converted");
}

#[tokio::test]
async fn torn_down_view_sends_nothing() {
    let (base, backend) = spawn_backend().await;
    let (ctx, log) = context(&base);
    let mut view = views::bookings::view(&ctx);

    view.teardown();

    assert!(matches!(view.load().await, Err(ApiError::Cancelled)));
    assert!(backend.operations().is_empty());
    assert!(log.snapshot().is_empty());
}

// =============================================================================
// DIRECTORY VIEW
// =============================================================================

#[tokio::test]
async fn organizer_create_is_validated_before_sending() {
    let (base, backend) = spawn_backend().await;
    let (ctx, log) = context(&base);
    let mut view = views::directory::organizers(&ctx);
    view.load().await.unwrap();

    let mut payload = Map::new();
    payload.insert("name".into(), json!("Blue Door"));
    payload.insert("fee_min".into(), json!(5000));
    payload.insert("fee_max".into(), json!(1000));
    payload.insert("email".into(), json!("events@bluedoor.ph"));

    let err = view.create(payload.clone()).await.unwrap_err();

    assert!(matches!(err, ApiError::Validation(ValidationError::FeeRange { .. })));
    assert!(!backend.operations().contains(&"createOrganizer".to_owned()));
    assert_eq!(view.items().len(), 2);
    assert_eq!(log.drain().len(), 1);

    payload.insert("fee_max".into(), json!(20000));
    view.create(payload).await.unwrap();
    assert_eq!(view.items().len(), 3);
    assert_eq!(view.items()[2].name, "Blue Door");
}

#[tokio::test]
async fn organizers_filter_locally() {
    let (base, backend) = spawn_backend().await;
    let (ctx, _log) = context(&base);
    let mut view = views::directory::organizers(&ctx);
    view.load().await.unwrap();

    view.apply_filter("status", "approved").await.unwrap();

    assert_eq!(view.filtered().len(), 1);
    assert_eq!(view.filtered()[0].status, OnboardingStatus::Approved);
    assert_eq!(backend.operations(), vec!["getAllOrganizers"]);
}

// =============================================================================
// FILES
// =============================================================================

#[tokio::test]
async fn upload_sends_multipart_fields() {
    let (base, backend) = spawn_backend().await;
    let api = AdminApi::new(client(&base));

    let path = api.upload("photos/hall.png", vec![7; 2048], "venue", 5 * 1024 * 1024).await.unwrap();

    assert_eq!(path, "uploads/venues/hall.png");
    let uploads = backend.uploads.lock().unwrap().clone();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].file_name.as_deref(), Some("hall.png"));
    assert_eq!(uploads[0].size, 2048);
    assert_eq!(uploads[0].fields.get("type").map(String::as_str), Some("venue"));
    assert_eq!(uploads[0].fields.get("operation").map(String::as_str), Some("upload"));
}

#[tokio::test]
async fn oversized_upload_never_leaves_the_client() {
    let (base, backend) = spawn_backend().await;
    let api = AdminApi::new(client(&base));

    let err = api.upload("hall.png", vec![0; 2048], "venue", 1024).await.unwrap_err();

    assert!(matches!(err, ApiError::Validation(ValidationError::FileTooLarge { size: 2048, max: 1024 })));
    assert!(backend.uploads.lock().unwrap().is_empty());
}

#[tokio::test]
async fn stored_images_download_as_bytes() {
    let (base, _backend) = spawn_backend().await;
    let api = client(&base);

    let bytes = images::fetch_image(&api, "uploads/venues/hall.png").await.unwrap();
    assert_eq!(bytes, vec![0x89, b'P', b'N', b'G']);

    let err = images::fetch_image(&api, "uploads/venues/gone.png").await.unwrap_err();
    assert!(matches!(err, ApiError::Application { ref message } if message == "Image not found"));
}

// =============================================================================
// REPORTS AND NOTIFICATIONS
// =============================================================================

#[tokio::test]
async fn session_analytics_accept_string_numbers() {
    let (base, _backend) = spawn_backend().await;
    let api = AdminApi::new(client(&base));

    let analytics = api.get_session_analytics().await.unwrap();

    assert_eq!(analytics.total_sessions, Some(40));
    assert_eq!(analytics.avg_duration_minutes, Some(17.5));
}

#[tokio::test]
async fn notification_feed_advances_through_the_backend() {
    let (base, _backend) = spawn_backend().await;
    let mut feed = NotificationFeed::new(NotificationsApi::new(client(&base)), 4);

    let first = feed.poll_once().await.unwrap();
    assert_eq!(first.items.len(), 2);
    assert_eq!(first.counts.and_then(|c| c.unread), Some(1));
    assert_eq!(feed.since(), Some("2026-03-01 10:30:00"));

    let second = feed.poll_once().await.unwrap();
    assert!(second.items.is_empty());
    assert_eq!(feed.since(), Some("2026-03-01 10:30:00"));
}
