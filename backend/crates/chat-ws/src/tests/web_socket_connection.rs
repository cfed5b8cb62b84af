use crate::error::CLOSE_TRY_AGAIN;
use crate::{
    ConnectionConfig, ConnectionId, Metrics, MessageValidator, RateLimiterFactory,
    WebSocketConnection, WsError,
};

use chat_hub::BroadcastHub;

use axum::extract::ws::Message as WsMessage;
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};

fn connection_with_send_buffer(hub: &BroadcastHub, send_buffer_size: usize) -> WebSocketConnection {
    WebSocketConnection::new(
        ConnectionId::new(),
        ConnectionConfig {
            send_buffer_size,
            heartbeat_interval_secs: 1,
            heartbeat_timeout_secs: 1,
        },
        Metrics::new(),
        RateLimiterFactory::default().create(),
        MessageValidator::default(),
        hub.clone(),
    )
}

#[tokio::test]
async fn given_writer_never_drains_when_send_buffer_stays_full_then_slow_consumer() {
    // Given - room for one frame and nobody reading
    let hub = BroadcastHub::default();
    let connection = connection_with_send_buffer(&hub, 1);
    let (tx, _rx) = mpsc::channel::<WsMessage>(1);
    let first = hub.publish("first").await.unwrap();
    let second = hub.publish("second").await.unwrap();
    connection.forward(&first, &tx).await.unwrap();

    // When
    let started = Instant::now();
    let result = connection.forward(&second, &tx).await;

    // Then - gave up after the heartbeat timeout instead of waiting forever
    let error = result.unwrap_err();
    assert!(matches!(error, WsError::SubscriptionOverflow { .. }));
    assert_eq!(error.close_code(), CLOSE_TRY_AGAIN);
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn given_writer_draining_when_forward_then_frames_queued_as_json_text() {
    let hub = BroadcastHub::default();
    let connection = connection_with_send_buffer(&hub, 1);
    let (tx, mut rx) = mpsc::channel::<WsMessage>(1);
    let message = hub.publish("hello").await.unwrap();

    connection.forward(&message, &tx).await.unwrap();

    match rx.recv().await {
        Some(WsMessage::Text(text)) => assert!(text.as_str().contains("\"body\":\"hello\"")),
        other => panic!("expected a text frame, got {other:?}"),
    }
}

#[tokio::test]
async fn given_writer_gone_when_forward_then_send_buffer_closed() {
    let hub = BroadcastHub::default();
    let connection = connection_with_send_buffer(&hub, 1);
    let (tx, rx) = mpsc::channel::<WsMessage>(1);
    drop(rx);
    let message = hub.publish("nobody home").await.unwrap();

    let result = connection.forward(&message, &tx).await;

    assert!(matches!(result, Err(WsError::SendBufferClosed { .. })));
}
