mod common;

use std::time::Duration;

use common::{SseFrame, TestApp};
use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_subscriber_sees_create_then_status_update() {
    let app = TestApp::new();
    let mut stream = app.open_stream().await;
    assert_eq!(
        stream.headers.get(http::header::CONTENT_TYPE).unwrap(),
        "text/event-stream"
    );
    assert_eq!(stream.headers.get("x-accel-buffering").unwrap(), "no");

    app.post_order(json!({"order_id": "A1", "customer": {"name": "Tom"}}))
        .await;
    app.clock.advance(chrono::Duration::minutes(1));
    let (status, _) = app
        .patch_status("A1", json!({"status": "confirmed", "confirm_minutes": 15}))
        .await;
    assert_eq!(status, StatusCode::OK);

    let created = stream.next_event().await;
    assert_eq!(created["type"], "order_created");
    assert_eq!(created["order"]["order_id"], "A1");
    assert_eq!(created["order"]["status"], "pending");
    assert_eq!(created["order"]["customer"]["name"], "Tom");

    let updated = stream.next_event().await;
    assert_eq!(updated["type"], "status_updated");
    assert_eq!(updated["order_id"], "A1");
    assert_eq!(updated["status"], "confirmed");
    assert_eq!(updated["confirm_minutes"], 15);
    assert!(updated["updated_at"].is_string());
}

#[tokio::test]
async fn test_every_subscriber_gets_every_event_in_order() {
    let app = TestApp::new();
    let mut a = app.open_stream().await;
    let mut b = app.open_stream().await;

    for i in 0..5 {
        app.post_order(json!({"order_id": format!("O{i}"), "customer": {"name": "Tom"}}))
            .await;
    }

    for stream in [&mut a, &mut b] {
        for i in 0..5 {
            let event = stream.next_event().await;
            assert_eq!(event["order"]["order_id"], format!("O{i}"));
        }
    }
}

#[tokio::test]
async fn test_late_subscriber_gets_no_backlog() {
    let app = TestApp::new();
    app.post_order(json!({"order_id": "old", "customer": {"name": "Tom"}}))
        .await;

    let mut stream = app.open_stream().await;
    app.post_order(json!({"order_id": "new", "customer": {"name": "Ana"}}))
        .await;

    let event = stream.next_event().await;
    assert_eq!(event["order"]["order_id"], "new");
}

#[tokio::test]
async fn test_rejected_requests_broadcast_nothing() {
    let app = TestApp::new();
    let mut stream = app.open_stream().await;

    app.post_order(json!({"customer": {"name": "Tom"}})).await;
    app.patch_status("nope", json!({"status": "confirmed"})).await;
    app.post_order(json!({"order_id": "A1", "customer": {"name": "Tom"}}))
        .await;
    app.patch_status("A1", json!({"status": "shipped"})).await;

    // the first event out is the only successful ingestion
    let event = stream.next_event().await;
    assert_eq!(event["type"], "order_created");
    assert_eq!(event["order"]["order_id"], "A1");

    let next = tokio::time::timeout(Duration::from_millis(100), stream.next_frame()).await;
    assert!(next.is_err(), "unexpected frame: {next:?}");
}

#[tokio::test]
async fn test_heartbeat_on_idle_stream() {
    let app = TestApp::with_config(Duration::from_millis(50), "public");
    let mut stream = app.open_stream().await;

    let frame = stream.next_frame_within(Duration::from_secs(2)).await;
    assert_eq!(frame, Some(SseFrame::Comment("heartbeat".into())));

    // still live after a heartbeat
    app.post_order(json!({"order_id": "A1", "customer": {"name": "Tom"}}))
        .await;
    assert_eq!(stream.next_event().await["order"]["order_id"], "A1");
}

#[tokio::test]
async fn test_disconnect_unregisters_and_others_keep_receiving() {
    let app = TestApp::new();
    let gone = app.open_stream().await;
    let mut stays = app.open_stream().await;
    assert_eq!(app.state.live.subscriber_count(), 2);

    drop(gone);
    assert_eq!(app.state.live.subscriber_count(), 1);

    let (status, _) = app
        .post_order(json!({"order_id": "A1", "customer": {"name": "Tom"}}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stays.next_event().await["order"]["order_id"], "A1");
}

#[tokio::test]
async fn test_shutdown_ends_open_streams() {
    let app = TestApp::new();
    let mut stream = app.open_stream().await;

    app.state.shutdown();

    let frame = stream.next_frame_within(Duration::from_secs(2)).await;
    assert_eq!(frame, None);
    assert_eq!(app.state.live.subscriber_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_ingestions_are_both_broadcast() {
    let app = TestApp::new();
    let mut stream = app.open_stream().await;

    let (a, b) = tokio::join!(
        app.post_order(json!({"order_id": "C1", "customer": {"name": "Tom"}})),
        app.post_order(json!({"order_id": "C2", "customer": {"name": "Ana"}})),
    );
    assert_eq!(a.0, StatusCode::OK);
    assert_eq!(b.0, StatusCode::OK);

    let mut ids = vec![
        stream.next_event().await["order"]["order_id"].clone(),
        stream.next_event().await["order"]["order_id"].clone(),
    ];
    ids.sort_by_key(|v| v.as_str().unwrap_or_default().to_string());
    assert_eq!(ids, vec![json!("C1"), json!("C2")]);
    assert_eq!(app.list_orders().await.len(), 2);
}
