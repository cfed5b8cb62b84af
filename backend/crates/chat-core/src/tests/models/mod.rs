mod message;
mod message_id;
