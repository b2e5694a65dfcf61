//! Blog feature service: posts with counter-minted identifiers.

pub mod error;
pub mod service;

pub use error::BlogError;
pub use service::{BlogDraft, BlogService, BLOG_SEQUENCE};
