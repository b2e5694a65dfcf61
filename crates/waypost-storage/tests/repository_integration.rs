//! RecordRepository exercised against the in-memory backend.

use jiff::Timestamp;
use std::sync::Arc;
use waypost_core::{
    BlogPost, ContentAddress, FieldValue, RecordRepository, ShortUrl, StoreError,
};
use waypost_storage::InMemoryStore;

fn repository() -> RecordRepository<InMemoryStore> {
    RecordRepository::new(Arc::new(InMemoryStore::new()))
}

fn post(id: u64, title: &str) -> BlogPost {
    BlogPost {
        id,
        title: title.to_string(),
        body: format!("body of {title}"),
        created_at: Timestamp::now(),
    }
}

#[tokio::test]
async fn get_after_put_returns_equal_record() {
    let repo = repository();
    let original = post(1, "first");

    repo.put("1", original.clone()).await.unwrap();

    let fetched: BlogPost = repo.get("1").await.unwrap().unwrap();
    assert_eq!(fetched, original);
}

#[tokio::test]
async fn get_absent_key() {
    let repo = repository();

    let fetched: Option<BlogPost> = repo.get("404").await.unwrap();
    assert!(fetched.is_none());
}

#[tokio::test]
async fn put_is_last_writer_wins() {
    let repo = repository();

    repo.put("1", post(1, "first")).await.unwrap();
    repo.put("1", post(1, "rewritten")).await.unwrap();

    let fetched: BlogPost = repo.get("1").await.unwrap().unwrap();
    assert_eq!(fetched.title, "rewritten");
}

#[tokio::test]
async fn query_all_scans_one_kind() {
    let repo = repository();

    for id in 1..=3u64 {
        repo.put(&id.to_string(), post(id, &format!("post-{id}")))
            .await
            .unwrap();
    }
    let url = ShortUrl {
        url: "https://example.com".to_string(),
        address: ContentAddress::of("https://example.com"),
    };
    let key = url.address.as_str().to_owned();
    repo.put(&key, url).await.unwrap();

    let mut posts: Vec<BlogPost> = repo.query_all().await.unwrap();
    posts.sort_by_key(|p| p.id);

    let ids: Vec<u64> = posts.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn query_by_field_equality() {
    let repo = repository();

    let url = "https://example.com";
    let rec = ShortUrl {
        url: url.to_string(),
        address: ContentAddress::of(url),
    };
    repo.put(rec.address.as_str(), rec.clone()).await.unwrap();

    let hits: Vec<ShortUrl> = repo
        .query_by_field("address", FieldValue::Text(rec.address.as_str().to_owned()))
        .await
        .unwrap();
    assert_eq!(hits, vec![rec]);

    let misses: Vec<ShortUrl> = repo
        .query_by_field("address", FieldValue::Text("0".repeat(64)))
        .await
        .unwrap();
    assert!(misses.is_empty());
}

#[tokio::test]
async fn decoding_a_foreign_kind_is_an_error() {
    let repo = repository();

    repo.put("7", post(7, "not a url")).await.unwrap();

    // Same key string, different kind: absent rather than mismatched.
    let as_url: Option<ShortUrl> = repo.get("7").await.unwrap();
    assert!(as_url.is_none());

    // A corrupt store that hands back the wrong variant surfaces
    // InvalidData instead of panicking.
    use waypost_core::Record;
    let doc = post(7, "x").into_document();
    let err = ShortUrl::from_document(doc).unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
}
