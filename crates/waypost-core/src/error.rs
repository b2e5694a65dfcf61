use thiserror::Error;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by the document store boundary.
///
/// Anything that reaches a caller through this enum is a server-side
/// failure; "record absent" is not an error at this layer and is
/// expressed as `Option::None` or an empty query result instead.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("transaction failed to commit after {attempts} attempts")]
    TransactionConflict { attempts: u32 },
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

/// Errors raised by record validation, before anything reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no title given")]
    EmptyTitle,
    #[error("no body given")]
    EmptyBody,
    #[error("timestamp was zero")]
    ZeroTimestamp,
    #[error("no url given")]
    EmptyUrl,
    #[error("invalid content address: {0}")]
    InvalidAddress(String),
}
