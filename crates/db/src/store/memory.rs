use std::collections::BTreeMap;

use async_trait::async_trait;
use bson::Document;
use parking_lot::RwLock;
use tracing::debug;

use super::{
    CollectionRef, DocumentRef, DocumentStore, Query, QuerySource, Snapshot, SnapshotStream,
    StoreError, StoreResult, boxed_results,
};

type Collections = BTreeMap<CollectionRef, BTreeMap<String, Document>>;

/// Process-local document store. Nothing is persisted.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn scan(collections: &Collections, query: &Query) -> Vec<Snapshot> {
        let snapshot = |collection: &CollectionRef, id: &String, fields: &Document| Snapshot {
            reference: collection.doc(id.clone()),
            fields: fields.clone(),
        };

        match query.source() {
            QuerySource::Collection(collection) => collections
                .get(collection)
                .into_iter()
                .flatten()
                .filter(|(_, fields)| query.matches(fields))
                .map(|(id, fields)| snapshot(collection, id, fields))
                .collect(),
            QuerySource::CollectionGroup(name) => collections
                .iter()
                .filter(|(collection, _)| collection.name() == name)
                .flat_map(|(collection, docs)| {
                    docs.iter()
                        .filter(|(_, fields)| query.matches(fields))
                        .map(move |(id, fields)| snapshot(collection, id, fields))
                })
                .collect(),
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn set(&self, doc: &DocumentRef, fields: Document) -> StoreResult<()> {
        doc.validate()?;
        self.collections
            .write()
            .entry(doc.parent().clone())
            .or_default()
            .insert(doc.id().to_string(), fields);
        debug!(path = %doc, "set document");
        Ok(())
    }

    async fn update(&self, doc: &DocumentRef, fields: Document) -> StoreResult<()> {
        doc.validate()?;
        let mut collections = self.collections.write();
        let existing = collections
            .get_mut(doc.parent())
            .and_then(|docs| docs.get_mut(doc.id()))
            .ok_or_else(|| StoreError::NotFound(doc.path()))?;

        for (key, value) in fields {
            existing.insert(key, value);
        }
        debug!(path = %doc, "updated document");
        Ok(())
    }

    async fn delete(&self, doc: &DocumentRef) -> StoreResult<()> {
        doc.validate()?;
        let mut collections = self.collections.write();
        if let Some(docs) = collections.get_mut(doc.parent()) {
            docs.remove(doc.id());
            if docs.is_empty() {
                collections.remove(doc.parent());
            }
        }
        debug!(path = %doc, "deleted document");
        Ok(())
    }

    async fn get(&self, doc: &DocumentRef) -> StoreResult<Option<Snapshot>> {
        doc.validate()?;
        let collections = self.collections.read();
        Ok(collections
            .get(doc.parent())
            .and_then(|docs| docs.get(doc.id()))
            .map(|fields| Snapshot {
                reference: doc.clone(),
                fields: fields.clone(),
            }))
    }

    async fn stream(&self, query: &Query) -> StoreResult<SnapshotStream> {
        if let QuerySource::Collection(collection) = query.source() {
            collection.validate()?;
        }
        let results = Self::scan(&self.collections.read(), query);
        debug!(?query, count = results.len(), "memory query");
        Ok(boxed_results(results))
    }
}
