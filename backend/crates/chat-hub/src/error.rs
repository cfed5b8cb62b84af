use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HubError {
    #[error("Resource exhausted: {resource} limit of {limit} reached {location}")]
    ResourceExhausted {
        resource: &'static str,
        limit: usize,
        location: ErrorLocation,
    },

    #[error("Hub is closed {location}")]
    Closed { location: ErrorLocation },
}

pub type Result<T> = std::result::Result<T, HubError>;
