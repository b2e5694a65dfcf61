//! Core types and traits for the Waypost document store.
//!
//! This crate defines the document model and the transactional store
//! boundary shared by the blog and shortener features. The store itself
//! is an external collaborator; backends implement [`DocumentStore`].

pub mod address;
pub mod document;
pub mod error;
pub mod repository;
pub mod store;

pub use address::ContentAddress;
pub use document::{BlogPost, CounterState, Document, FieldValue, Filter, Kind, Record, ShortUrl};
pub use error::{StoreError, ValidationError};
pub use repository::RecordRepository;
pub use store::{DocumentStore, TransactionOps};
