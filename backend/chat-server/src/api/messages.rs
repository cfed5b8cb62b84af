//! Read-only view of the replay window over plain HTTP.

pub use crate::api::message_list_response::MessageListResponse;

use chat_ws::AppState;

use axum::{Json, extract::State};

/// GET /api/messages
pub async fn list_messages(State(state): State<AppState>) -> Json<MessageListResponse> {
    let (snapshot, last_sequence) = state.hub.snapshot_with_sequence().await;

    Json(MessageListResponse {
        last_sequence,
        capacity: state.hub.capacity(),
        messages: snapshot.iter().map(|m| m.as_ref().clone()).collect(),
    })
}
