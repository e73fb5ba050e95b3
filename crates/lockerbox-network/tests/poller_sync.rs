//! Integration tests for InventoryPoller and OutboundSyncWorker
//!
//! Both actors are driven against a wiremock server and observed through the
//! queues they share with the controller.

use bytes::Bytes;
use chrono::Local;
use lockerbox_core::{InventorySnapshot, OpenItem, PendingMutation, TrackingCode};
use lockerbox_network::{
    Delivery, InventoryClient, InventoryPoller, NotifyClient, OutboundSyncWorker, PollOutcome,
    SyncStats,
};
use std::time::Duration;
use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn shoe() -> OpenItem {
    OpenItem::new(TrackingCode::new("5555").unwrap(), "shoe", "2024-02-25")
}

fn inventory(server: &MockServer) -> InventoryClient {
    InventoryClient::new(&server.uri(), "token", Duration::from_secs(2)).unwrap()
}

async fn serve_items(server: &MockServer, items: serde_json::Value) {
    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/api/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(items))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_poller_publishes_first_snapshot() {
    let server = MockServer::start().await;
    serve_items(
        &server,
        serde_json::json!([{"tracking_code": "5555", "description": "shoe", "order_date": "2024-02-25"}]),
    )
    .await;

    let (tx, mut rx) = mpsc::channel(4);
    let mut poller = InventoryPoller::new(inventory(&server), tx, Duration::from_secs(5));

    assert_eq!(poller.poll_once().await, PollOutcome::Published(1));

    let snapshot = rx.try_recv().unwrap();
    assert_eq!(snapshot.get("5555"), Some(&shoe()));
}

#[tokio::test]
async fn test_poller_publishes_empty_first_snapshot() {
    let server = MockServer::start().await;
    serve_items(&server, serde_json::json!([])).await;

    let (tx, mut rx) = mpsc::channel(4);
    let mut poller = InventoryPoller::new(inventory(&server), tx, Duration::from_secs(5));

    assert_eq!(poller.poll_once().await, PollOutcome::Published(0));
    assert!(rx.try_recv().unwrap().is_empty());
}

#[tokio::test]
async fn test_poller_suppresses_identical_snapshot() {
    let server = MockServer::start().await;
    let items = serde_json::json!([
        {"tracking_code": "5555", "description": "shoe", "order_date": "2024-02-25"},
        {"tracking_code": "1234", "description": "book", "order_date": "2024-02-26"}
    ]);
    serve_items(&server, items).await;

    let (tx, mut rx) = mpsc::channel(4);
    let mut poller = InventoryPoller::new(inventory(&server), tx, Duration::from_secs(5));

    assert_eq!(poller.poll_once().await, PollOutcome::Published(2));
    assert_eq!(poller.poll_once().await, PollOutcome::Unchanged);
    assert_eq!(poller.poll_once().await, PollOutcome::Unchanged);

    assert!(rx.try_recv().is_ok());
    assert!(rx.try_recv().is_err(), "duplicate snapshot reached the queue");
}

#[tokio::test]
async fn test_poller_publishes_changed_snapshot() {
    let server = MockServer::start().await;
    serve_items(
        &server,
        serde_json::json!([{"tracking_code": "5555", "description": "shoe", "order_date": "2024-02-25"}]),
    )
    .await;

    let (tx, mut rx) = mpsc::channel(4);
    let mut poller = InventoryPoller::new(inventory(&server), tx, Duration::from_secs(5));
    assert_eq!(poller.poll_once().await, PollOutcome::Published(1));

    serve_items(&server, serde_json::json!([])).await;
    assert_eq!(poller.poll_once().await, PollOutcome::Published(0));

    assert_eq!(rx.try_recv().unwrap().len(), 1);
    assert!(rx.try_recv().unwrap().is_empty());
}

#[tokio::test]
async fn test_poller_keeps_previous_snapshot_on_error() {
    let server = MockServer::start().await;
    serve_items(
        &server,
        serde_json::json!([{"tracking_code": "5555", "description": "shoe", "order_date": "2024-02-25"}]),
    )
    .await;

    let (tx, mut rx) = mpsc::channel(4);
    let mut poller = InventoryPoller::new(inventory(&server), tx, Duration::from_secs(5));
    assert_eq!(poller.poll_once().await, PollOutcome::Published(1));
    let _ = rx.try_recv();

    server.reset().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert_eq!(poller.poll_once().await, PollOutcome::Failed);
    assert!(rx.try_recv().is_err());
    assert!(poller.last_published().unwrap().contains("5555"));
}

#[tokio::test]
async fn test_poller_skips_malformed_codes() {
    let server = MockServer::start().await;
    serve_items(
        &server,
        serde_json::json!([
            {"tracking_code": "5555", "description": "shoe", "order_date": "2024-02-25"},
            {"tracking_code": "123", "description": "short", "order_date": "2024-02-25"},
            {"tracking_code": "12 45", "description": "spaced", "order_date": "2024-02-25"}
        ]),
    )
    .await;

    let (tx, mut rx) = mpsc::channel(4);
    let mut poller = InventoryPoller::new(inventory(&server), tx, Duration::from_secs(5));

    assert_eq!(poller.poll_once().await, PollOutcome::Published(1));
    let snapshot = rx.try_recv().unwrap();
    assert_eq!(snapshot.codes().map(|c| c.as_str()).collect::<Vec<_>>(), ["5555"]);
}

#[tokio::test]
async fn test_poller_drops_when_queue_full_and_retries() {
    let server = MockServer::start().await;
    serve_items(&server, serde_json::json!([])).await;

    let (tx, mut rx) = mpsc::channel(1);
    tx.try_send(InventorySnapshot::new()).unwrap();
    let mut poller = InventoryPoller::new(inventory(&server), tx, Duration::from_secs(5));

    assert_eq!(poller.poll_once().await, PollOutcome::Dropped);
    assert!(poller.last_published().is_none());

    let _ = rx.try_recv();
    assert_eq!(poller.poll_once().await, PollOutcome::Published(0));
}

#[tokio::test]
async fn test_poller_stops_when_receiver_closed() {
    let server = MockServer::start().await;
    serve_items(&server, serde_json::json!([])).await;

    let (tx, rx) = mpsc::channel(1);
    drop(rx);
    let poller = InventoryPoller::new(inventory(&server), tx, Duration::from_millis(10));

    tokio::time::timeout(Duration::from_secs(5), poller.run())
        .await
        .expect("poller should stop once the receiver is gone");
}

#[tokio::test]
async fn test_sync_worker_delivers_deposit_mutations() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/items/5555"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/deliveries"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/notify"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let notify = NotifyClient::new(
        &format!("{}/notify", server.uri()),
        "42",
        Duration::from_secs(2),
    )
    .unwrap();
    let (tx, rx) = mpsc::channel(8);
    let worker = OutboundSyncWorker::new(inventory(&server), Some(notify), rx);

    for mutation in PendingMutation::for_deposit(shoe(), Bytes::from_static(b"jpeg"), Local::now()) {
        tx.try_send(mutation).unwrap();
    }
    drop(tx);

    let stats = worker.run().await;
    assert_eq!(
        stats,
        SyncStats {
            sent: 3,
            skipped: 0,
            failed: 0
        }
    );
}

#[tokio::test]
async fn test_sync_worker_discards_failures_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/deliveries"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (tx, rx) = mpsc::channel(8);
    let worker = OutboundSyncWorker::new(inventory(&server), None, rx);

    for mutation in PendingMutation::for_deposit(shoe(), Bytes::from_static(b"jpeg"), Local::now()) {
        tx.try_send(mutation).unwrap();
    }
    drop(tx);

    let stats = worker.run().await;
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.sent, 1);
    assert_eq!(stats.skipped, 1);
}

#[tokio::test]
async fn test_execute_skips_notification_without_target() {
    let server = MockServer::start().await;
    let (_tx, rx) = mpsc::channel(1);
    let worker = OutboundSyncWorker::new(inventory(&server), None, rx);

    let mutation = PendingMutation::NotifyDelivery {
        item: shoe(),
        photo: Bytes::from_static(b"jpeg"),
        delivered_at: Local::now(),
    };
    assert_eq!(worker.execute(&mutation).await.unwrap(), Delivery::Skipped);
}
