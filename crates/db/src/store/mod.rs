//! Document store abstraction.
//!
//! Data is organized as named collections of documents keyed by string ids.
//! Any document may own named subcollections, which may be queried either
//! per parent or across every parent at once (a collection-group query).

mod memory;
mod mongo;

use std::fmt;

use async_trait::async_trait;
use bson::{Bson, Document};
use futures::{StreamExt, TryStreamExt, stream::BoxStream};
use thiserror::Error;

pub use memory::MemoryStore;
pub use mongo::{MongoStore, PARENT_FIELD};

/// Length of store-generated document ids.
pub const AUTO_ID_LEN: usize = 20;

const AUTO_ID_ALPHABET: [char; 62] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I',
    'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'a', 'b',
    'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u',
    'v', 'w', 'x', 'y', 'z',
];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),
    #[error("BSON serialization error: {0}")]
    BsonSer(#[from] bson::ser::Error),
    #[error("BSON deserialization error: {0}")]
    BsonDe(#[from] bson::de::Error),
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Invalid document path: {0}")]
    InvalidPath(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Lazy, one-shot sequence of query results.
pub type SnapshotStream = BoxStream<'static, StoreResult<Snapshot>>;

/// Generate an id for a document added without one.
pub fn auto_id() -> String {
    nanoid::nanoid!(AUTO_ID_LEN, &AUTO_ID_ALPHABET)
}

/// A collection, either top-level or nested under a parent document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionRef {
    parent: Option<Box<DocumentRef>>,
    name: String,
}

impl CollectionRef {
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            parent: None,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&DocumentRef> {
        self.parent.as_deref()
    }

    pub fn doc(&self, id: impl Into<String>) -> DocumentRef {
        DocumentRef {
            collection: self.clone(),
            id: id.into(),
        }
    }

    /// Slash-separated path, e.g. `invitations/abc/comments`.
    pub fn path(&self) -> String {
        match &self.parent {
            Some(parent) => format!("{}/{}", parent.path(), self.name),
            None => self.name.clone(),
        }
    }

    pub fn validate(&self) -> StoreResult<()> {
        if let Some(parent) = &self.parent {
            parent.validate()?;
        }
        check_segment(&self.name, self)
    }
}

impl fmt::Display for CollectionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// A single document inside a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentRef {
    collection: CollectionRef,
    id: String,
}

impl DocumentRef {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn parent(&self) -> &CollectionRef {
        &self.collection
    }

    /// A subcollection owned by this document.
    pub fn collection(&self, name: impl Into<String>) -> CollectionRef {
        CollectionRef {
            parent: Some(Box::new(self.clone())),
            name: name.into(),
        }
    }

    pub fn path(&self) -> String {
        format!("{}/{}", self.collection.path(), self.id)
    }

    /// Parse a path with an even number of non-empty segments.
    pub fn parse(path: &str) -> StoreResult<Self> {
        let segments: Vec<&str> = path.split('/').collect();
        if segments.len() < 2 || segments.len() % 2 != 0 || segments.iter().any(|s| s.is_empty())
        {
            return Err(StoreError::InvalidPath(path.to_string()));
        }

        let mut doc = CollectionRef::root(segments[0]).doc(segments[1]);
        for pair in segments[2..].chunks(2) {
            doc = doc.collection(pair[0]).doc(pair[1]);
        }
        Ok(doc)
    }

    pub fn validate(&self) -> StoreResult<()> {
        self.collection.validate()?;
        check_segment(&self.id, self)
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

fn check_segment(segment: &str, whole: &impl fmt::Display) -> StoreResult<()> {
    if segment.is_empty() || segment.contains('/') {
        return Err(StoreError::InvalidPath(whole.to_string()));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuerySource {
    Collection(CollectionRef),
    /// Every collection with this name, regardless of parent.
    CollectionGroup(String),
}

/// Read over a collection or collection group with equality filters.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    source: QuerySource,
    filters: Vec<(String, Bson)>,
}

impl Query {
    pub fn collection(collection: CollectionRef) -> Self {
        Self {
            source: QuerySource::Collection(collection),
            filters: Vec::new(),
        }
    }

    pub fn collection_group(name: impl Into<String>) -> Self {
        Self {
            source: QuerySource::CollectionGroup(name.into()),
            filters: Vec::new(),
        }
    }

    /// Add a `field == value` filter. Filters combine with AND.
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    pub fn source(&self) -> &QuerySource {
        &self.source
    }

    pub fn filters(&self) -> &[(String, Bson)] {
        &self.filters
    }

    pub(crate) fn matches(&self, fields: &Document) -> bool {
        self.filters
            .iter()
            .all(|(field, value)| fields.get(field) == Some(value))
    }
}

/// A document read from the store: its reference plus its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub reference: DocumentRef,
    pub fields: Document,
}

impl Snapshot {
    pub fn id(&self) -> &str {
        self.reference.id()
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create or fully overwrite the document.
    async fn set(&self, doc: &DocumentRef, fields: Document) -> StoreResult<()>;

    /// Merge `fields` into an existing document; `NotFound` if it is absent.
    async fn update(&self, doc: &DocumentRef, fields: Document) -> StoreResult<()>;

    /// Remove the document. Absent documents are not an error; subcollections are left in place.
    async fn delete(&self, doc: &DocumentRef) -> StoreResult<()>;

    async fn get(&self, doc: &DocumentRef) -> StoreResult<Option<Snapshot>>;

    async fn stream(&self, query: &Query) -> StoreResult<SnapshotStream>;

    /// Insert under a freshly generated id.
    async fn add(&self, collection: &CollectionRef, fields: Document) -> StoreResult<DocumentRef> {
        let doc = collection.doc(auto_id());
        self.set(&doc, fields).await?;
        Ok(doc)
    }

    async fn fetch(&self, query: &Query) -> StoreResult<Vec<Snapshot>> {
        self.stream(query).await?.try_collect().await
    }

    async fn count(&self, query: &Query) -> StoreResult<u64> {
        let counted = self
            .stream(query)
            .await?
            .try_fold(0u64, |n, _| async move { Ok::<_, StoreError>(n + 1) })
            .await?;
        Ok(counted)
    }
}

pub(crate) fn boxed_results(snapshots: Vec<Snapshot>) -> SnapshotStream {
    futures::stream::iter(snapshots.into_iter().map(Ok)).boxed()
}
