use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tracing::trace;
use waypost_core::error::Result;
use waypost_core::{Document, DocumentStore, Filter, Kind, StoreError, TransactionOps};

type DocKey = (Kind, String);

#[derive(Debug, Clone)]
struct Versioned {
    /// Starts at 1 on first write; an absent key reads as version 0.
    version: u64,
    document: Document,
}

/// In-memory implementation of [`DocumentStore`] using DashMap.
///
/// Transactions run under optimistic concurrency: reads record the
/// version they observed, writes are buffered, and commit validates the
/// read set under a commit mutex before applying the write set. A
/// conflicting commit re-runs the whole transaction closure, up to
/// [`DEFAULT_MAX_ATTEMPTS`] times by default.
#[derive(Debug)]
pub struct InMemoryStore {
    documents: DashMap<DocKey, Versioned>,
    commit_lock: Mutex<()>,
    max_attempts: u32,
}

/// Commit attempts per transaction before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

impl InMemoryStore {
    /// Creates an empty store with the default attempt bound.
    pub fn new() -> Self {
        Self::with_max_attempts(DEFAULT_MAX_ATTEMPTS)
    }

    /// Creates an empty store with a custom transaction attempt bound.
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            documents: DashMap::new(),
            commit_lock: Mutex::new(()),
            max_attempts,
        }
    }

    fn current_version(&self, key: &DocKey) -> u64 {
        self.documents.get(key).map(|v| v.version).unwrap_or(0)
    }

    fn apply(&self, key: DocKey, document: Document) {
        match self.documents.entry(key) {
            Entry::Occupied(mut entry) => {
                let versioned = entry.get_mut();
                versioned.version += 1;
                versioned.document = document;
            }
            Entry::Vacant(entry) => {
                entry.insert(Versioned {
                    version: 1,
                    document,
                });
            }
        }
    }

    /// Validates the read set and applies the write set atomically.
    ///
    /// Returns `false` on a version mismatch, in which case nothing is
    /// applied and the caller retries the whole transaction.
    fn try_commit(&self, txn: Txn<'_>) -> bool {
        let _guard = self
            .commit_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        for (key, observed) in &txn.reads {
            if self.current_version(key) != *observed {
                return false;
            }
        }

        for (key, document) in txn.writes {
            self.apply(key, document);
        }
        true
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// A transaction view over the store.
///
/// Reads prefer the transaction's own staged writes; everything else
/// comes from the live map, with the observed version recorded for
/// commit-time validation.
struct Txn<'a> {
    store: &'a InMemoryStore,
    reads: HashMap<DocKey, u64>,
    writes: HashMap<DocKey, Document>,
}

impl<'a> Txn<'a> {
    fn new(store: &'a InMemoryStore) -> Self {
        Self {
            store,
            reads: HashMap::new(),
            writes: HashMap::new(),
        }
    }
}

impl TransactionOps for Txn<'_> {
    fn get(&mut self, kind: Kind, key: &str) -> Result<Option<Document>> {
        let key = (kind, key.to_owned());

        if let Some(staged) = self.writes.get(&key) {
            return Ok(Some(staged.clone()));
        }

        match self.store.documents.get(&key) {
            Some(versioned) => {
                self.reads.insert(key, versioned.version);
                Ok(Some(versioned.document.clone()))
            }
            None => {
                self.reads.insert(key, 0);
                Ok(None)
            }
        }
    }

    fn put(&mut self, kind: Kind, key: &str, document: Document) -> Result<()> {
        self.writes.insert((kind, key.to_owned()), document);
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn get(&self, kind: Kind, key: &str) -> Result<Option<Document>> {
        Ok(self
            .documents
            .get(&(kind, key.to_owned()))
            .map(|v| v.document.clone()))
    }

    async fn put(&self, kind: Kind, key: &str, document: Document) -> Result<()> {
        // Serialized against commits so in-flight transactions observe
        // this write as a version bump.
        let _guard = self
            .commit_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.apply((kind, key.to_owned()), document);
        Ok(())
    }

    async fn query(&self, kind: Kind, filters: &[Filter]) -> Result<Vec<Document>> {
        Ok(self
            .documents
            .iter()
            .filter(|entry| entry.key().0 == kind && entry.value().document.matches(filters))
            .map(|entry| entry.value().document.clone())
            .collect())
    }

    async fn transact<F>(&self, mut op: F) -> Result<()>
    where
        F: FnMut(&mut dyn TransactionOps) -> std::result::Result<(), StoreError> + Send,
    {
        for attempt in 1..=self.max_attempts {
            let mut txn = Txn::new(self);
            op(&mut txn)?;

            if self.try_commit(txn) {
                return Ok(());
            }
            trace!(attempt, "transaction commit conflict, retrying");
        }

        Err(StoreError::TransactionConflict {
            attempts: self.max_attempts,
        })
    }
}
