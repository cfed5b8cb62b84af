mod common;

use common::{
    test_client::WsTestClient,
    test_server::{
        TestServerConfig, create_test_server, create_test_server_with_config,
        wait_for_connection_count,
    },
};

use std::time::Duration;

#[tokio::test]
async fn given_two_clients_when_one_sends_then_both_receive_including_sender() {
    // Given
    let test_server = create_test_server();
    let mut alice = WsTestClient::connect(&test_server.server).await;
    let mut bob = WsTestClient::connect(&test_server.server).await;

    // When
    alice.send_text("hello").await;

    // Then
    let to_alice = alice.receive_chat().await;
    let to_bob = bob.receive_chat().await;
    assert_eq!(to_alice.body, "hello");
    assert_eq!(to_bob.body, "hello");
    assert_eq!(to_alice.id, to_bob.id, "both see the same message");

    alice.close().await;
    bob.close().await;
}

#[tokio::test]
async fn given_one_client_when_sending_several_then_received_in_order_with_rising_timestamps() {
    // Given
    let test_server = create_test_server();
    let mut client = WsTestClient::connect(&test_server.server).await;

    // When
    for body in ["one", "two", "three"] {
        client.send_text(body).await;
    }

    // Then
    let first = client.receive_chat().await;
    let second = client.receive_chat().await;
    let third = client.receive_chat().await;
    assert_eq!(
        vec![first.body.as_str(), second.body.as_str(), third.body.as_str()],
        vec!["one", "two", "three"]
    );
    assert!(first.sent_at <= second.sent_at);
    assert!(second.sent_at <= third.sent_at);

    client.close().await;
}

#[tokio::test]
async fn given_capacity_two_and_three_prior_messages_when_client_connects_then_last_two_replayed() {
    // Given
    let test_server = create_test_server_with_config(TestServerConfig::with_replay_capacity(2));
    let hub = &test_server.app_state.hub;
    for body in ["a", "b", "c"] {
        hub.publish(body).await.unwrap();
    }

    // When
    let mut client = WsTestClient::connect(&test_server.server).await;

    // Then
    assert_eq!(client.receive_bodies(2).await, vec!["b", "c"]);

    // And live messages follow the replay
    client.send_text("d").await;
    assert_eq!(client.receive_bodies(1).await, vec!["d"]);

    client.close().await;
}

#[tokio::test]
async fn given_zero_capacity_when_client_connects_then_only_live_messages() {
    // Given
    let test_server = create_test_server_with_config(TestServerConfig::with_replay_capacity(0));
    test_server.app_state.hub.publish("before").await.unwrap();

    // When
    let mut client = WsTestClient::connect(&test_server.server).await;
    test_server.app_state.hub.publish("after").await.unwrap();

    // Then
    assert_eq!(client.receive_bodies(1).await, vec!["after"]);

    client.close().await;
}

#[tokio::test]
async fn given_client_disconnects_when_cleanup_runs_then_subscription_and_registration_removed() {
    // Given
    let test_server = create_test_server();
    let client = WsTestClient::connect(&test_server.server).await;
    assert!(wait_for_connection_count(&test_server.app_state, 1).await);
    assert_eq!(test_server.app_state.hub.subscriber_count().await, 1);

    // When
    client.close().await;

    // Then
    assert!(wait_for_connection_count(&test_server.app_state, 0).await);
    let mut remaining = test_server.app_state.hub.subscriber_count().await;
    for _ in 0..100 {
        if remaining == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
        remaining = test_server.app_state.hub.subscriber_count().await;
    }
    assert_eq!(remaining, 0);
}

#[tokio::test]
async fn given_heartbeat_interval_when_idle_then_server_pings() {
    // Given
    let config = TestServerConfig {
        heartbeat_interval_secs: 1,
        heartbeat_timeout_secs: 10,
        ..Default::default()
    };
    let test_server = create_test_server_with_config(config);
    let mut client = WsTestClient::connect(&test_server.server).await;

    // When
    let frame = client.receive_frame_within(Duration::from_secs(3)).await;

    // Then
    assert!(
        matches!(frame, Some(axum_test::WsMessage::Ping(_))),
        "expected a ping, got {frame:?}"
    );

    client.close().await;
}
