use super::*;

const DELAY: Duration = Duration::from_millis(300);

async fn type_text(tx: &watch::Sender<String>, text: &str, gap: Duration) {
    for end in 1..=text.len() {
        tx.send_replace(text[..end].to_owned());
        tokio::time::sleep(gap).await;
    }
}

#[tokio::test(start_paused = true)]
async fn burst_of_keystrokes_emits_once() {
    let (tx, input) = watch::channel(String::new());
    let (_handle, mut out) = debounce_search(input, DELAY, CancellationToken::new());

    type_text(&tx, "santos", Duration::from_millis(50)).await;

    assert_eq!(out.recv().await.as_deref(), Some("santos"));
    tokio::time::sleep(DELAY * 3).await;
    assert!(out.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn pauses_longer_than_the_delay_emit_each_value() {
    let (tx, input) = watch::channel(String::new());
    let (_handle, mut out) = debounce_search(input, DELAY, CancellationToken::new());

    tx.send_replace("reyes".to_owned());
    assert_eq!(out.recv().await.as_deref(), Some("reyes"));

    tx.send_replace("cruz".to_owned());
    assert_eq!(out.recv().await.as_deref(), Some("cruz"));
}

#[tokio::test(start_paused = true)]
async fn returning_to_the_last_value_is_not_re_emitted() {
    let (tx, input) = watch::channel(String::new());
    let (_handle, mut out) = debounce_search(input, DELAY, CancellationToken::new());

    tx.send_replace("lim".to_owned());
    assert_eq!(out.recv().await.as_deref(), Some("lim"));

    tx.send_replace("lima".to_owned());
    tokio::time::sleep(Duration::from_millis(50)).await;
    tx.send_replace("lim".to_owned());
    tokio::time::sleep(DELAY * 2).await;

    assert!(out.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn cancel_drops_pending_value() {
    let (tx, input) = watch::channel(String::new());
    let cancel = CancellationToken::new();
    let (handle, mut out) = debounce_search(input, DELAY, cancel.clone());

    tx.send_replace("uy".to_owned());
    tokio::time::sleep(Duration::from_millis(100)).await;
    cancel.cancel();
    handle.await.unwrap();

    assert_eq!(out.recv().await, None);
}

#[tokio::test(start_paused = true)]
async fn dropped_input_flushes_pending_value() {
    let (tx, input) = watch::channel(String::new());
    let (handle, mut out) = debounce_search(input, DELAY, CancellationToken::new());

    tx.send_replace("ortiz".to_owned());
    tokio::time::sleep(Duration::from_millis(10)).await;
    drop(tx);
    handle.await.unwrap();

    assert_eq!(out.recv().await.as_deref(), Some("ortiz"));
    assert_eq!(out.recv().await, None);
}

#[tokio::test(start_paused = true)]
async fn cancel_stops_a_debouncer_blocked_on_a_full_queue() {
    let (tx, input) = watch::channel(String::new());
    let cancel = CancellationToken::new();
    let (handle, _out) = debounce_search(input, DELAY, cancel.clone());

    for query in ["a", "b", "c", "d", "e", "f"] {
        tx.send_replace(query.to_owned());
        tokio::time::sleep(DELAY * 2).await;
    }
    cancel.cancel();

    tokio::time::timeout(Duration::from_secs(5), handle).await.unwrap().unwrap();
}
