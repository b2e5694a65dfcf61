use thiserror::Error;
use waypost_core::{StoreError, ValidationError};

/// Errors surfaced by the blog service.
#[derive(Debug, Clone, Error)]
pub enum BlogError {
    #[error("no such blog post: {0}")]
    NotFound(u64),
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}
