//! Error types for catalog access and controller operations

use thiserror::Error;
use uuid::Uuid;

/// Failure of a catalog call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("network error: {0}")]
    Network(String),

    #[error("server error {status}: {body}")]
    Server { status: u16, body: String },

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("could not decode response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CatalogError::Decode(err.to_string())
        } else {
            CatalogError::Network(err.to_string())
        }
    }
}

/// Failure of a user-driven controller operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    #[error("item {0} is no longer available, please reselect")]
    ItemUnavailable(Uuid),
}
