use crate::error::BlogError;
use jiff::Timestamp;
use std::sync::Arc;
use tracing::{debug, trace};
use typed_builder::TypedBuilder;
use waypost_core::{BlogPost, DocumentStore, RecordRepository};
use waypost_counter::TransactionalCounter;

type Result<T> = std::result::Result<T, BlogError>;

/// The counter sequence blog post ids are minted from.
pub const BLOG_SEQUENCE: &str = "blog";

/// An unpublished post as submitted by a caller.
#[derive(Debug, Clone, TypedBuilder)]
pub struct BlogDraft {
    #[builder(setter(into))]
    pub title: String,
    #[builder(setter(into))]
    pub body: String,
}

/// Publishes and reads blog posts.
///
/// Publishing allocates the post id from the `"blog"` counter sequence
/// before validation runs, matching the original lifecycle: a draft that
/// fails validation burns its id and the sequence moves on. Ids of
/// published posts are dense and never reused.
#[derive(Debug)]
pub struct BlogService<S> {
    repository: RecordRepository<S>,
    counter: TransactionalCounter<S>,
}

impl<S> Clone for BlogService<S> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            counter: self.counter.clone(),
        }
    }
}

impl<S: DocumentStore> BlogService<S> {
    /// Creates a blog service over a shared store handle.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            repository: RecordRepository::new(Arc::clone(&store)),
            counter: TransactionalCounter::new(store),
        }
    }

    /// Publishes a draft: mints an id, stamps the creation time,
    /// validates, and persists under `key = id`.
    pub async fn publish(&self, draft: BlogDraft) -> Result<BlogPost> {
        let id = self.counter.allocate(BLOG_SEQUENCE).await?;

        let post = BlogPost {
            id,
            title: draft.title,
            body: draft.body,
            created_at: Timestamp::now(),
        };
        post.validate()?;

        self.repository.put(&id.to_string(), post.clone()).await?;

        debug!(id, title = %post.title, "published blog post");
        Ok(post)
    }

    /// Fetches one post by id.
    pub async fn post(&self, id: u64) -> Result<BlogPost> {
        trace!(id, "fetching blog post");
        self.repository
            .get(&id.to_string())
            .await?
            .ok_or(BlogError::NotFound(id))
    }

    /// Lists all posts. Unbounded scan; ordering is store-defined.
    pub async fn list(&self) -> Result<Vec<BlogPost>> {
        Ok(self.repository.query_all().await?)
    }
}
