use thiserror::Error;
use waypost_core::{StoreError, ValidationError};

/// Errors surfaced by the shortener service.
#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("no such entry: {0}")]
    NotFound(String),
    #[error("content address {address} is occupied by a different input")]
    AddressCollision { address: String },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}
