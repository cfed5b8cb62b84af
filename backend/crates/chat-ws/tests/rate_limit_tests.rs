mod common;

use common::{
    test_client::WsTestClient,
    test_server::{TestServerConfig, create_test_server_with_config},
};

use chat_ws::MAX_VIOLATIONS;

use std::time::Duration;

#[tokio::test]
async fn given_client_when_slightly_exceeding_rate_limit_then_extra_messages_dropped_and_stays_connected()
 {
    // Given - two messages per minute
    let test_server = create_test_server_with_config(TestServerConfig::with_strict_rate_limits());
    let mut client = WsTestClient::connect(&test_server.server).await;

    // When - the allowance plus one short of the disconnect threshold
    let message_count = 2 + (MAX_VIOLATIONS - 1);
    for i in 0..message_count {
        client.send_text(format!("message-{i}")).await;
    }

    // Then - only the allowed messages were published
    assert_eq!(
        client.receive_bodies(2).await,
        vec!["message-0", "message-1"]
    );
    assert!(
        client
            .receive_frame_within(Duration::from_millis(200))
            .await
            .is_none(),
        "dropped messages must not be relayed and the connection must stay open"
    );
    assert_eq!(test_server.app_state.registry.total_count().await, 1);

    client.close().await;
}

#[tokio::test]
async fn given_client_when_severely_exceeding_rate_limit_then_disconnected_with_policy_violation() {
    // Given
    let test_server = create_test_server_with_config(TestServerConfig::with_strict_rate_limits());
    let mut client = WsTestClient::connect(&test_server.server).await;

    // When
    let message_count = 2 + MAX_VIOLATIONS;
    for i in 0..message_count {
        client.send_text(format!("message-{i}")).await;
    }

    // Then
    assert_eq!(client.receive_bodies(2).await.len(), 2);
    assert_eq!(client.receive_close_code().await, 1008);
}

#[tokio::test]
async fn given_two_clients_when_one_is_rate_limited_then_other_unaffected() {
    // Given
    let test_server = create_test_server_with_config(TestServerConfig::with_strict_rate_limits());
    let mut noisy = WsTestClient::connect(&test_server.server).await;
    let mut quiet = WsTestClient::connect(&test_server.server).await;

    // When
    for i in 0..(2 + MAX_VIOLATIONS) {
        noisy.send_text(format!("noise-{i}")).await;
    }
    assert_eq!(noisy.receive_close_code().await, 1008);

    // Then
    quiet.send_text("still here").await;
    let bodies = quiet.receive_bodies(3).await;
    assert_eq!(bodies, vec!["noise-0", "noise-1", "still here"]);

    quiet.close().await;
}
