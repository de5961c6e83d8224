use mongodb::{Database, IndexModel};
use tracing::{debug, info};

use crate::models::{Invitation, User};
use crate::store::PARENT_FIELD;

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // Invitations
    create_indexes(
        db,
        Invitation::COLLECTION,
        vec![
            index(bson::doc! { "event_id": 1 }),
            index(bson::doc! { "user_id": 1 }),
            index(bson::doc! { "status": 1 }),
        ],
    )
    .await?;

    // Invitation subcollections
    for sub in [Invitation::COMMENTS, Invitation::ATTENDEES] {
        create_indexes(db, sub, vec![index(bson::doc! { PARENT_FIELD: 1 })]).await?;
    }

    // Users
    create_indexes(db, User::COLLECTION, vec![index(bson::doc! { "name": 1 })]).await?;

    info!("MongoDB indexes ensured");
    Ok(())
}

async fn create_indexes(
    db: &Database,
    collection: &str,
    indexes: Vec<IndexModel>,
) -> Result<(), mongodb::error::Error> {
    let count = indexes.len();
    db.collection::<bson::Document>(collection)
        .create_indexes(indexes)
        .await?;
    debug!(collection, count, "Indexes created");
    Ok(())
}

fn index(keys: bson::Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}
