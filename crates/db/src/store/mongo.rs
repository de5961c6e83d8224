use async_trait::async_trait;
use bson::{Bson, Document, doc};
use futures::{StreamExt, TryStreamExt};
use mongodb::{Collection, Database};
use tracing::debug;

use super::{
    CollectionRef, DocumentRef, DocumentStore, Query, QuerySource, Snapshot, SnapshotStream,
    StoreError, StoreResult,
};

/// Field holding the parent document path of a subcollection document.
pub const PARENT_FIELD: &str = "_parent";

/// MongoDB-backed store.
///
/// A top-level collection maps to the MongoDB collection of the same name,
/// keyed by the document id. All subcollections sharing a name live in one
/// MongoDB collection of that name, keyed by the full document path and
/// tagged with [`PARENT_FIELD`], so a collection-group query is a plain scan.
#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn raw(&self, name: &str) -> Collection<Document> {
        self.db.collection::<Document>(name)
    }

    fn key(doc: &DocumentRef) -> String {
        match doc.parent().parent() {
            Some(_) => doc.path(),
            None => doc.id().to_string(),
        }
    }

    fn filter_for(doc: &DocumentRef) -> Document {
        doc! { "_id": Self::key(doc) }
    }

    fn query_filter(query: &Query) -> Document {
        let mut filter = match query.source() {
            QuerySource::Collection(collection) => match collection.parent() {
                Some(parent) => doc! { PARENT_FIELD: parent.path() },
                None => doc! { PARENT_FIELD: { "$exists": false } },
            },
            QuerySource::CollectionGroup(_) => Document::new(),
        };
        for (field, value) in query.filters() {
            filter.insert(field.clone(), value.clone());
        }
        filter
    }

    fn decode(collection: &str, mut raw: Document) -> StoreResult<Snapshot> {
        let key = match raw.remove("_id") {
            Some(Bson::String(key)) => key,
            Some(Bson::ObjectId(oid)) => oid.to_hex(),
            other => {
                return Err(StoreError::InvalidPath(format!(
                    "{collection}: unsupported _id {other:?}"
                )));
            }
        };

        let reference = match raw.remove(PARENT_FIELD) {
            Some(_) => DocumentRef::parse(&key)?,
            None => CollectionRef::root(collection).doc(key),
        };

        Ok(Snapshot {
            reference,
            fields: raw,
        })
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn set(&self, doc: &DocumentRef, fields: Document) -> StoreResult<()> {
        doc.validate()?;
        let mut replacement = fields;
        replacement.insert("_id", Self::key(doc));
        if let Some(parent) = doc.parent().parent() {
            replacement.insert(PARENT_FIELD, parent.path());
        } else {
            replacement.remove(PARENT_FIELD);
        }

        self.raw(doc.parent().name())
            .replace_one(Self::filter_for(doc), replacement)
            .upsert(true)
            .await?;
        debug!(path = %doc, "set document");
        Ok(())
    }

    async fn update(&self, doc: &DocumentRef, fields: Document) -> StoreResult<()> {
        doc.validate()?;
        let mut fields = fields;
        fields.remove("_id");
        fields.remove(PARENT_FIELD);

        let matched = if fields.is_empty() {
            self.raw(doc.parent().name())
                .count_documents(Self::filter_for(doc))
                .await?
        } else {
            self.raw(doc.parent().name())
                .update_one(Self::filter_for(doc), doc! { "$set": fields })
                .await?
                .matched_count
        };

        if matched == 0 {
            return Err(StoreError::NotFound(doc.path()));
        }
        debug!(path = %doc, "updated document");
        Ok(())
    }

    async fn delete(&self, doc: &DocumentRef) -> StoreResult<()> {
        doc.validate()?;
        let result = self
            .raw(doc.parent().name())
            .delete_one(Self::filter_for(doc))
            .await?;
        debug!(path = %doc, deleted = result.deleted_count, "deleted document");
        Ok(())
    }

    async fn get(&self, doc: &DocumentRef) -> StoreResult<Option<Snapshot>> {
        doc.validate()?;
        let found = self
            .raw(doc.parent().name())
            .find_one(Self::filter_for(doc))
            .await?;

        found
            .map(|raw| Self::decode(doc.parent().name(), raw))
            .transpose()
    }

    async fn stream(&self, query: &Query) -> StoreResult<SnapshotStream> {
        let name = match query.source() {
            QuerySource::Collection(collection) => {
                collection.validate()?;
                collection.name().to_string()
            }
            QuerySource::CollectionGroup(name) => name.clone(),
        };
        let filter = Self::query_filter(query);
        debug!(collection = %name, ?filter, "mongo query");

        let cursor = self.raw(&name).find(filter).await?;
        Ok(cursor
            .map_err(StoreError::from)
            .and_then(move |raw| {
                let decoded = Self::decode(&name, raw);
                async move { decoded }
            })
            .boxed())
    }

    async fn count(&self, query: &Query) -> StoreResult<u64> {
        let name = match query.source() {
            QuerySource::Collection(collection) => collection.name(),
            QuerySource::CollectionGroup(name) => name.as_str(),
        };
        Ok(self
            .raw(name)
            .count_documents(Self::query_filter(query))
            .await?)
    }
}
