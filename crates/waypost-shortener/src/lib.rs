//! URL shortener built on content addressing.
//!
//! Short codes are not minted from a sequence; they are the SHA-256
//! content address of the URL itself, so shortening is deterministic
//! and needs no cross-request coordination.

pub mod error;
pub mod service;

pub use error::ShortenerError;
pub use service::{CollisionPolicy, ContentAddressStore};
