use crate::document::{Document, Filter, Kind};
use crate::error::{Result, StoreError};
use async_trait::async_trait;

/// Operations available inside a transaction.
///
/// Reads see the transaction's own buffered writes; writes are staged
/// and only become visible when the transaction commits.
pub trait TransactionOps {
    /// Reads a document within the transaction.
    fn get(&mut self, kind: Kind, key: &str) -> Result<Option<Document>>;

    /// Stages a write within the transaction.
    fn put(&mut self, kind: Kind, key: &str, document: Document) -> Result<()>;
}

/// The transactional document store boundary.
///
/// Backends are external collaborators; this trait is the contract the
/// rest of the system programs against. All methods may block on I/O to
/// the backend, which is expected to apply its own timeout and surface
/// [`StoreError::Timeout`] on expiry.
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Point read. `Ok(None)` when no document exists under the key.
    async fn get(&self, kind: Kind, key: &str) -> Result<Option<Document>>;

    /// Upsert by key. Last writer wins; no concurrency check.
    async fn put(&self, kind: Kind, key: &str, document: Document) -> Result<()>;

    /// Equality-filtered scan over a kind.
    ///
    /// Result ordering is backend-defined and not stable between calls.
    async fn query(&self, kind: Kind, filters: &[Filter]) -> Result<Vec<Document>>;

    /// Runs `op` as a serializable transaction.
    ///
    /// `op` performs a bounded number of [`TransactionOps`] calls and
    /// returns `Ok(())` to commit or an error to abort. On a commit
    /// conflict the whole of `op` is re-run, up to the backend's attempt
    /// bound; exhausting the bound surfaces
    /// [`StoreError::TransactionConflict`]. An error returned by `op`
    /// aborts immediately and is never retried.
    async fn transact<F>(&self, op: F) -> Result<()>
    where
        F: FnMut(&mut dyn TransactionOps) -> std::result::Result<(), StoreError> + Send;
}
