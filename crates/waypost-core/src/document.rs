use crate::address::ContentAddress;
use crate::error::{Result, StoreError, ValidationError};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Entity categories known to the store.
///
/// Every persisted document belongs to exactly one kind; the kind name
/// together with a key string identifies a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    /// Named counter sequences.
    Counter,
    /// Blog posts, keyed by their counter-minted id.
    BlogPost,
    /// Shortened URLs, keyed by their content address.
    ShortUrl,
}

impl Kind {
    /// Returns the stored kind name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Counter => "counters",
            Kind::BlogPost => "blog",
            Kind::ShortUrl => "shurls",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field value usable in equality filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Integer(u64),
    Text(String),
}

/// A `field = value` equality constraint for queries.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: FieldValue,
}

impl Filter {
    /// Creates an equality filter on the given field.
    pub fn equals(field: impl Into<String>, value: FieldValue) -> Self {
        Self {
            field: field.into(),
            value,
        }
    }
}

/// Persisted state of a named counter sequence.
///
/// At most one committed value exists per counter name; successive
/// allocations increase it by exactly one. Counters are created lazily
/// on first allocation and never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterState {
    pub value: u64,
}

/// A published blog post.
///
/// The id comes exclusively from the `"blog"` counter sequence, so ids
/// of successful writes are dense and never reused. Posts are immutable
/// once persisted; there is no update or delete operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub created_at: Timestamp,
}

impl BlogPost {
    /// Checks the post's required fields.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.body.is_empty() {
            return Err(ValidationError::EmptyBody);
        }
        if self.created_at == Timestamp::UNIX_EPOCH {
            return Err(ValidationError::ZeroTimestamp);
        }
        Ok(())
    }
}

/// A shortened URL mapping.
///
/// Invariant: `address == ContentAddress::of(&url)`. The address doubles
/// as the store key, so re-inserting the same URL is idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortUrl {
    pub url: String,
    pub address: ContentAddress,
}

/// A tagged document as stored by a [`DocumentStore`](crate::DocumentStore).
///
/// Each kind gets its own variant rather than an untyped map, so the
/// (de)serialization contract between repository and store is explicit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Document {
    Counter(CounterState),
    Blog(BlogPost),
    ShortUrl(ShortUrl),
}

impl Document {
    /// Returns the kind this document belongs to.
    pub fn kind(&self) -> Kind {
        match self {
            Document::Counter(_) => Kind::Counter,
            Document::Blog(_) => Kind::BlogPost,
            Document::ShortUrl(_) => Kind::ShortUrl,
        }
    }

    /// Extracts a named field for equality filtering.
    ///
    /// Returns `None` for fields the document's kind does not carry.
    pub fn field(&self, name: &str) -> Option<FieldValue> {
        match (self, name) {
            (Document::Counter(state), "value") => Some(FieldValue::Integer(state.value)),
            (Document::Blog(post), "id") => Some(FieldValue::Integer(post.id)),
            (Document::Blog(post), "title") => Some(FieldValue::Text(post.title.clone())),
            (Document::ShortUrl(rec), "url") => Some(FieldValue::Text(rec.url.clone())),
            (Document::ShortUrl(rec), "address") => {
                Some(FieldValue::Text(rec.address.as_str().to_owned()))
            }
            _ => None,
        }
    }

    /// Checks whether the document satisfies every filter.
    pub fn matches(&self, filters: &[Filter]) -> bool {
        filters
            .iter()
            .all(|f| self.field(&f.field).as_ref() == Some(&f.value))
    }
}

/// A typed record that maps onto one [`Document`] variant.
///
/// Implementations give the repository its typed surface: a kind name
/// plus conversions in both directions, where decoding a document of a
/// different kind is a data error, not a panic.
pub trait Record: Sized + Send + 'static {
    /// The kind this record type is stored under.
    const KIND: Kind;

    /// Wraps the record in its document variant.
    fn into_document(self) -> Document;

    /// Unwraps the record from a document of the matching kind.
    fn from_document(document: Document) -> Result<Self>;
}

fn kind_mismatch<T>(expected: Kind, got: &Document) -> Result<T> {
    Err(StoreError::InvalidData(format!(
        "expected a {} document, got {}",
        expected,
        got.kind()
    )))
}

impl Record for CounterState {
    const KIND: Kind = Kind::Counter;

    fn into_document(self) -> Document {
        Document::Counter(self)
    }

    fn from_document(document: Document) -> Result<Self> {
        match document {
            Document::Counter(state) => Ok(state),
            other => kind_mismatch(Self::KIND, &other),
        }
    }
}

impl Record for BlogPost {
    const KIND: Kind = Kind::BlogPost;

    fn into_document(self) -> Document {
        Document::Blog(self)
    }

    fn from_document(document: Document) -> Result<Self> {
        match document {
            Document::Blog(post) => Ok(post),
            other => kind_mismatch(Self::KIND, &other),
        }
    }
}

impl Record for ShortUrl {
    const KIND: Kind = Kind::ShortUrl;

    fn into_document(self) -> Document {
        Document::ShortUrl(self)
    }

    fn from_document(document: Document) -> Result<Self> {
        match document {
            Document::ShortUrl(rec) => Ok(rec),
            other => kind_mismatch(Self::KIND, &other),
        }
    }
}
