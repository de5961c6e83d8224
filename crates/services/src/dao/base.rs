use std::marker::PhantomData;
use std::sync::Arc;

use bson::Document;
use eventplanner_db::{
    CollectionRef, DocumentRef, DocumentStore, Query, Snapshot, StoreError,
};
use futures::TryStreamExt;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, warn};

/// Reserved field under which a document's own key is attached to records.
pub const ID_FIELD: &str = "id";

#[derive(Debug, Error)]
pub enum DaoError {
    #[error("Store error: {0}")]
    Store(StoreError),
    #[error("BSON serialization error: {0}")]
    BsonSer(#[from] bson::ser::Error),
    #[error("BSON deserialization error: {0}")]
    BsonDe(#[from] bson::de::Error),
    #[error("Entity not found")]
    NotFound,
    #[error("Validation: {0}")]
    Validation(String),
}

impl From<StoreError> for DaoError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => DaoError::NotFound,
            StoreError::BsonSer(e) => DaoError::BsonSer(e),
            StoreError::BsonDe(e) => DaoError::BsonDe(e),
            other => DaoError::Store(other),
        }
    }
}

pub type DaoResult<T> = Result<T, DaoError>;

/// Decode a snapshot into a record, injecting the document id under [`ID_FIELD`].
pub fn decode<T: DeserializeOwned>(snapshot: Snapshot) -> DaoResult<T> {
    let mut fields = snapshot.fields;
    fields.insert(ID_FIELD, snapshot.reference.id());
    Ok(bson::from_document(fields)?)
}

/// Like [`decode`], but a document that does not fit `T` is logged and
/// skipped instead of failing the surrounding read.
pub fn decode_or_skip<T: DeserializeOwned>(snapshot: Snapshot) -> Option<T> {
    let path = snapshot.reference.path();
    match decode(snapshot) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!(%path, error = %e, "Skipping malformed document");
            None
        }
    }
}

/// Encode a record for writing. The id is the document key, never a stored field.
pub fn encode<T: Serialize>(record: &T) -> DaoResult<Document> {
    let mut fields = bson::to_document(record)?;
    fields.remove(ID_FIELD);
    Ok(fields)
}

pub struct BaseDao<T> {
    store: Arc<dyn DocumentStore>,
    collection: CollectionRef,
    _record: PhantomData<fn() -> T>,
}

impl<T> BaseDao<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(store: Arc<dyn DocumentStore>, collection_name: &str) -> Self {
        Self {
            store,
            collection: CollectionRef::root(collection_name),
            _record: PhantomData,
        }
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    pub fn collection(&self) -> &CollectionRef {
        &self.collection
    }

    pub fn doc(&self, id: &str) -> DocumentRef {
        self.collection.doc(id)
    }

    /// Create or fully overwrite the document at `id`.
    pub async fn set(&self, id: &str, record: &T) -> DaoResult<()> {
        let fields = encode(record)?;
        self.store.set(&self.doc(id), fields).await?;
        Ok(())
    }

    /// Merge the serialized `changes` into the existing document at `id`.
    pub async fn update<U: Serialize>(&self, id: &str, changes: &U) -> DaoResult<()> {
        let fields = encode(changes)?;
        self.store.update(&self.doc(id), fields).await?;
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> DaoResult<()> {
        self.store.delete(&self.doc(id)).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> DaoResult<Option<T>> {
        self.store
            .get(&self.doc(id))
            .await?
            .map(decode)
            .transpose()
    }

    /// Every document matched by `query`, ids attached. Documents that do
    /// not decode as `T` are left out.
    pub async fn find_many(&self, query: Query) -> DaoResult<Vec<T>> {
        let records: Vec<T> = self
            .store
            .stream(&query)
            .await?
            .map_err(DaoError::from)
            .try_filter_map(|snapshot| futures::future::ready(Ok(decode_or_skip(snapshot))))
            .try_collect()
            .await?;
        debug!(collection = %self.collection, count = records.len(), "find_many");
        Ok(records)
    }

    pub async fn find_all(&self) -> DaoResult<Vec<T>> {
        self.find_many(self.query()).await
    }

    /// Equality filter on a single field of this collection.
    pub async fn find_by_field(
        &self,
        field: &str,
        value: impl Into<bson::Bson>,
    ) -> DaoResult<Vec<T>> {
        self.find_many(self.query().where_eq(field, value)).await
    }

    pub async fn count(&self, query: Query) -> DaoResult<u64> {
        Ok(self.store.count(&query).await?)
    }

    pub fn query(&self) -> Query {
        Query::collection(self.collection.clone())
    }
}
