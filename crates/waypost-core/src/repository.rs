use crate::document::{FieldValue, Filter, Record};
use crate::error::Result;
use crate::store::DocumentStore;
use std::sync::Arc;

/// Typed get/put/query layer over a [`DocumentStore`].
///
/// Both features persist through this surface: the record type picks the
/// kind, the caller supplies the key. There is no optimistic-concurrency
/// check on `put` — last writer wins — and scans are unbounded; callers
/// needing cross-request ordering go through the counter's transaction
/// instead.
#[derive(Debug)]
pub struct RecordRepository<S> {
    store: Arc<S>,
}

impl<S> Clone for RecordRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: DocumentStore> RecordRepository<S> {
    /// Creates a repository over a shared store handle.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Returns the underlying store handle.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Point read. `Ok(None)` when no record exists under the key.
    pub async fn get<R: Record>(&self, key: &str) -> Result<Option<R>> {
        self.store
            .get(R::KIND, key)
            .await?
            .map(R::from_document)
            .transpose()
    }

    /// Upsert by key.
    pub async fn put<R: Record>(&self, key: &str, record: R) -> Result<()> {
        self.store.put(R::KIND, key, record.into_document()).await
    }

    /// Full scan over a kind. Ordering is store-defined.
    pub async fn query_all<R: Record>(&self) -> Result<Vec<R>> {
        self.store
            .query(R::KIND, &[])
            .await?
            .into_iter()
            .map(R::from_document)
            .collect()
    }

    /// Equality-filtered scan over a kind. Ordering is store-defined.
    pub async fn query_by_field<R: Record>(
        &self,
        field: impl Into<String>,
        value: FieldValue,
    ) -> Result<Vec<R>> {
        self.store
            .query(R::KIND, &[Filter::equals(field, value)])
            .await?
            .into_iter()
            .map(R::from_document)
            .collect()
    }
}
