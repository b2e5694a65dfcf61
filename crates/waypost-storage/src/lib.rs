//! Storage backends for the Waypost document store boundary.
//!
//! Currently provides an in-memory backend with serializable
//! transactions, used as the test double for the external store
//! collaborator.

pub mod memory;

pub use memory::InMemoryStore;
