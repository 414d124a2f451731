use super::*;

fn client(base: &str) -> ApiClient {
    let config = AdminConfig { api_base_url: base.to_owned(), ..AdminConfig::default() };
    ApiClient::new(&config).unwrap()
}

#[test]
fn script_url_joins_without_double_slash() {
    let api = client("http://backend.test/api/");
    assert_eq!(api.script_url(Script::Admin), "http://backend.test/api/admin.php");
    assert_eq!(api.script_url(Script::ServeImage), "http://backend.test/api/serve-image.php");
}

#[test]
fn scoped_clients_cancel_independently() {
    let api = client("http://backend.test");
    let view_a = CancellationToken::new();
    let view_b = CancellationToken::new();
    let a = api.scoped(&view_a);
    let b = api.scoped(&view_b);

    view_a.cancel();
    assert!(a.cancel_token().is_cancelled());
    assert!(!b.cancel_token().is_cancelled());
    assert!(!api.cancel_token().is_cancelled());
}

#[tokio::test]
async fn cancelled_client_short_circuits() {
    // Unroutable port: a real send would fail with a transport error.
    let api = client("http://127.0.0.1:9");
    let view = CancellationToken::new();
    let scoped = api.scoped(&view);
    view.cancel();

    let err = scoped
        .post_json(Script::Admin, "getAllBookings", &serde_json::json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Cancelled));
}

#[tokio::test]
async fn cancel_during_flight_resolves_cancelled() {
    let api = client("http://127.0.0.1:9");
    let view = CancellationToken::new();
    let scoped = api.scoped(&view);

    let (result, ()) = tokio::join!(scoped.guarded(std::future::pending::<Result<(), ApiError>>()), async {
        tokio::task::yield_now().await;
        view.cancel();
    });
    assert!(matches!(result, Err(ApiError::Cancelled)));
}

#[test]
fn operation_of_reads_query() {
    let query = [("operation", "get_counts".to_owned()), ("user_id", "3".to_owned())];
    assert_eq!(operation_of(&query), "get_counts");
    assert_eq!(operation_of(&[]), "");
}
