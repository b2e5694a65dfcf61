use crate::error::ShortenerError;
use std::sync::Arc;
use tracing::{debug, trace};
use waypost_core::{
    ContentAddress, DocumentStore, FieldValue, RecordRepository, ShortUrl, ValidationError,
};

type Result<T> = std::result::Result<T, ShortenerError>;

/// What `shorten` does when its content address is already occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// Upsert unconditionally, no read-before-write.
    ///
    /// Idempotent under the no-collision assumption: the only input that
    /// maps to an occupied address is the one already stored there.
    #[default]
    Overwrite,
    /// Read first and reject with
    /// [`ShortenerError::AddressCollision`] if the stored input differs.
    CheckAndReject,
}

/// Persists (input, address) pairs keyed by their content address.
///
/// Known accepted risk: a genuine SHA-256 collision would silently
/// overwrite an unrelated record under [`CollisionPolicy::Overwrite`],
/// and [`lookup`](Self::lookup) does not validate uniqueness of query
/// results — with duplicate rows, whichever the store returns first
/// wins.
#[derive(Debug)]
pub struct ContentAddressStore<S> {
    repository: RecordRepository<S>,
    collisions: CollisionPolicy,
}

impl<S> Clone for ContentAddressStore<S> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            collisions: self.collisions,
        }
    }
}

impl<S: DocumentStore> ContentAddressStore<S> {
    /// Creates a store with the default overwrite policy.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_policy(store, CollisionPolicy::default())
    }

    /// Creates a store with an explicit collision policy.
    pub fn with_policy(store: Arc<S>, collisions: CollisionPolicy) -> Self {
        Self {
            repository: RecordRepository::new(store),
            collisions,
        }
    }

    /// Computes the content address of an input. Pure, never fails.
    pub fn address_of(input: &str) -> ContentAddress {
        ContentAddress::of(input)
    }

    /// Shortens a URL: computes its address and persists the mapping.
    ///
    /// Re-shortening an identical URL is idempotent. The collision
    /// policy decides whether an occupied address is read first or
    /// overwritten blind.
    pub async fn shorten(&self, url: &str) -> Result<ShortUrl> {
        if url.is_empty() {
            return Err(ValidationError::EmptyUrl.into());
        }

        let address = Self::address_of(url);
        trace!(address = %address, "shortening url");

        if self.collisions == CollisionPolicy::CheckAndReject {
            let existing: Option<ShortUrl> = self.repository.get(address.as_str()).await?;
            if let Some(existing) = existing {
                if existing.url != url {
                    return Err(ShortenerError::AddressCollision {
                        address: address.to_string(),
                    });
                }
            }
        }

        let record = ShortUrl {
            url: url.to_string(),
            address: address.clone(),
        };
        self.repository
            .put(address.as_str(), record.clone())
            .await?;

        debug!(address = %address, "shortened url");
        Ok(record)
    }

    /// Resolves an address back to its stored mapping.
    ///
    /// Equality query on the `address` field; the first match wins.
    pub async fn lookup(&self, address: &ContentAddress) -> Result<ShortUrl> {
        trace!(address = %address, "resolving address");

        let matches: Vec<ShortUrl> = self
            .repository
            .query_by_field("address", FieldValue::Text(address.as_str().to_owned()))
            .await?;

        matches
            .into_iter()
            .next()
            .ok_or_else(|| ShortenerError::NotFound(address.to_string()))
    }
}
