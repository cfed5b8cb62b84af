use crate::{CoreError, Message};

use chrono::{TimeZone, Utc};
use googletest::assert_that;
use googletest::prelude::{contains_substring, eq, not};

#[test]
fn given_new_message_when_created_then_fields_preserved() {
    let sent_at = Utc::now();
    let message = Message::new(7, "hello".to_string(), sent_at);

    assert_eq!(message.sequence, 7);
    assert_eq!(message.body, "hello");
    assert_eq!(message.sent_at, sent_at);
}

#[test]
fn given_two_messages_when_created_then_ids_differ() {
    let first = Message::new(1, "a".to_string(), Utc::now());
    let second = Message::new(2, "a".to_string(), Utc::now());

    assert_ne!(first.id, second.id);
}

#[test]
fn given_message_when_serialized_then_uses_wire_field_names() {
    // Given
    let sent_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
    let message = Message::new(3, "hi there".to_string(), sent_at);

    // When
    let json = message.to_json().unwrap();

    // Then
    assert_that!(json, contains_substring("\"sentAt\":\"2024-05-01T12:30:00Z\""));
    assert_that!(json, contains_substring("\"body\":\"hi there\""));
    assert_that!(json, contains_substring(format!("\"id\":\"{}\"", message.id)));
    assert_that!(json, not(contains_substring("sequence")));
}

#[test]
fn given_body_with_markup_when_serialized_then_body_is_opaque() {
    let body = r#"<b>"quoted"</b> {not: json} 🦀"#;
    let message = Message::new(1, body.to_string(), Utc::now());

    let decoded = Message::from_json(&message.to_json().unwrap()).unwrap();

    assert_that!(decoded.body.as_str(), eq(body));
    assert_that!(decoded.id, eq(message.id));
    assert_that!(decoded.sent_at, eq(message.sent_at));
}

#[test]
fn given_wire_json_when_decoded_then_sequence_defaults_to_zero() {
    let json = r#"{"id":"6f1c7c0a-3c57-4b8e-9f0e-2d2d0f6c1a11","body":"x","sentAt":"2024-01-01T00:00:00Z"}"#;

    let message = Message::from_json(json).unwrap();

    assert_eq!(message.sequence, 0);
    assert_eq!(message.body, "x");
}

#[test]
fn given_malformed_json_when_decoded_then_json_error() {
    let result = Message::from_json("{not json");

    assert!(matches!(result, Err(CoreError::Json { .. })));
}
