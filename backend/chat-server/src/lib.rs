pub mod admin;
pub mod api;
pub mod error;
pub mod health;
pub mod logger;
pub mod prometheus;
pub mod routes;
pub mod state;

#[cfg(test)]
mod tests;

pub use api::messages::{MessageListResponse, list_messages};
pub use error::{Result as ServerResult, ServerError};
pub use routes::build_router;
pub use state::{build_app_state, hub_config, spawn_hub_closer};
