pub mod connection;
pub mod indexes;
pub mod models;
pub mod store;

pub use connection::connect;
pub use store::{
    CollectionRef, DocumentRef, DocumentStore, MemoryStore, MongoStore, Query, Snapshot,
    StoreError, StoreResult,
};
