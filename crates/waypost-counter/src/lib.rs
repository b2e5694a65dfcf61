//! Transactional counter sequences for minting unique identifiers.
//!
//! Counter state lives in the external store as a named entity, never in
//! process memory; concurrency safety is delegated entirely to the
//! store's transaction isolation, not to in-process locks.

use std::sync::Arc;
use tracing::{debug, trace};
use waypost_core::{CounterState, Document, DocumentStore, Kind, StoreError};

/// Allocates strictly increasing values from named, persisted sequences.
///
/// Each allocation is one serializable read-modify-write transaction, so
/// two concurrent allocations against the same name can never observe
/// the same prior value and thus never return the same next value. A
/// draft that fails later in the caller's pipeline leaves a gap in the
/// sequence; values of successful writes are dense and never reused.
#[derive(Debug)]
pub struct TransactionalCounter<S> {
    store: Arc<S>,
    seed: u64,
}

impl<S> Clone for TransactionalCounter<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            seed: self.seed,
        }
    }
}

impl<S: DocumentStore> TransactionalCounter<S> {
    /// Creates a counter over a shared store handle.
    ///
    /// Sequences start at seed 0, so the first allocation returns 1.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_seed(store, 0)
    }

    /// Creates a counter whose absent sequences read as `seed`.
    pub fn with_seed(store: Arc<S>, seed: u64) -> Self {
        Self { store, seed }
    }

    /// Allocates the next value of the named sequence.
    ///
    /// Runs read → compute → write inside one transaction; the store
    /// retries on commit conflict up to its attempt bound, after which
    /// [`StoreError::TransactionConflict`] surfaces. Returns the newly
    /// allocated value, not the prior one.
    pub async fn allocate(&self, name: &str) -> Result<u64, StoreError> {
        let seed = self.seed;
        let mut allocated = seed;

        self.store
            .transact(|txn| {
                let prior = match txn.get(Kind::Counter, name)? {
                    Some(Document::Counter(state)) => state.value,
                    Some(other) => {
                        return Err(StoreError::InvalidData(format!(
                            "counter '{}' holds a {} document",
                            name,
                            other.kind()
                        )))
                    }
                    None => seed,
                };
                let next = prior + 1;
                txn.put(
                    Kind::Counter,
                    name,
                    Document::Counter(CounterState { value: next }),
                )?;
                allocated = next;
                Ok(())
            })
            .await?;

        debug!(counter = name, value = allocated, "allocated counter value");
        Ok(allocated)
    }

    /// Reads the last committed value of the named sequence.
    ///
    /// Plain point read, no transaction. `Ok(None)` for a sequence that
    /// has never allocated.
    pub async fn current(&self, name: &str) -> Result<Option<u64>, StoreError> {
        trace!(counter = name, "reading counter value");
        match self.store.get(Kind::Counter, name).await? {
            Some(Document::Counter(state)) => Ok(Some(state.value)),
            Some(other) => Err(StoreError::InvalidData(format!(
                "counter '{}' holds a {} document",
                name,
                other.kind()
            ))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypost_storage::InMemoryStore;

    fn counter() -> TransactionalCounter<InMemoryStore> {
        // A generous attempt bound so contention tests never exhaust it.
        TransactionalCounter::new(Arc::new(InMemoryStore::with_max_attempts(64)))
    }

    #[tokio::test]
    async fn first_allocation_returns_one() {
        let ctr = counter();

        assert_eq!(ctr.allocate("blog").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn sequential_allocations_are_dense() {
        let ctr = counter();

        assert_eq!(ctr.allocate("blog").await.unwrap(), 1);
        assert_eq!(ctr.allocate("blog").await.unwrap(), 2);
        assert_eq!(ctr.allocate("blog").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn seed_offsets_the_sequence() {
        let store = Arc::new(InMemoryStore::new());
        let ctr = TransactionalCounter::with_seed(store, 100);

        assert_eq!(ctr.allocate("blog").await.unwrap(), 101);
        assert_eq!(ctr.allocate("blog").await.unwrap(), 102);
    }

    #[tokio::test]
    async fn names_are_independent_sequences() {
        let ctr = counter();

        assert_eq!(ctr.allocate("blog").await.unwrap(), 1);
        assert_eq!(ctr.allocate("audit").await.unwrap(), 1);
        assert_eq!(ctr.allocate("blog").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn current_reads_last_committed() {
        let ctr = counter();

        assert_eq!(ctr.current("blog").await.unwrap(), None);
        ctr.allocate("blog").await.unwrap();
        ctr.allocate("blog").await.unwrap();
        assert_eq!(ctr.current("blog").await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn concurrent_allocations_never_repeat() {
        const TASKS: u64 = 16;
        let ctr = Arc::new(counter());
        let mut handles = Vec::new();

        for _ in 0..TASKS {
            let ctr = Arc::clone(&ctr);
            handles.push(tokio::spawn(async move { ctr.allocate("x").await }));
        }

        let mut values = Vec::new();
        for handle in handles {
            values.push(handle.await.unwrap().unwrap());
        }
        values.sort_unstable();

        // No repeats, no gaps: exactly 1..=N.
        assert_eq!(values, (1..=TASKS).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn concurrent_pair_from_prior_state() {
        let ctr = Arc::new(counter());
        for _ in 0..5 {
            ctr.allocate("blog").await.unwrap();
        }

        let a = tokio::spawn({
            let ctr = Arc::clone(&ctr);
            async move { ctr.allocate("blog").await }
        });
        let b = tokio::spawn({
            let ctr = Arc::clone(&ctr);
            async move { ctr.allocate("blog").await }
        });

        let mut pair = vec![a.await.unwrap().unwrap(), b.await.unwrap().unwrap()];
        pair.sort_unstable();
        assert_eq!(pair, vec![6, 7]);
    }
}
