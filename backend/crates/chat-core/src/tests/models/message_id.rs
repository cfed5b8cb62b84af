use crate::{CoreError, MessageId};

#[test]
fn given_valid_uuid_string_when_parsed_then_round_trips_through_display() {
    let id = MessageId::new();

    let parsed = MessageId::parse(&id.to_string()).unwrap();

    assert_eq!(parsed, id);
}

#[test]
fn given_garbage_when_parsed_then_invalid_message_id() {
    let result = MessageId::parse("not-a-uuid");

    match result {
        Err(CoreError::InvalidMessageId { value, .. }) => assert_eq!(value, "not-a-uuid"),
        other => panic!("expected InvalidMessageId, got {other:?}"),
    }
}
