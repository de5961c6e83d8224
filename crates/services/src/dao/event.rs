use std::sync::Arc;

use eventplanner_db::DocumentStore;
use eventplanner_db::models::{Event, EventUpdate};
use tracing::info;

use super::base::{BaseDao, DaoResult};

pub struct EventDao {
    pub base: BaseDao<Event>,
}

impl EventDao {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            base: BaseDao::new(store, Event::COLLECTION),
        }
    }

    pub async fn add(
        &self,
        id: &str,
        name: String,
        date: String,
        location: String,
    ) -> DaoResult<Event> {
        let event = Event {
            id: id.to_string(),
            name,
            date,
            location,
        };
        self.base.set(id, &event).await?;
        info!(event_id = %id, name = %event.name, "Event added");
        Ok(event)
    }

    pub async fn update(&self, id: &str, changes: &EventUpdate) -> DaoResult<()> {
        self.base.update(id, changes).await?;
        info!(event_id = %id, "Event updated");
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> DaoResult<()> {
        self.base.delete(id).await?;
        info!(event_id = %id, "Event deleted");
        Ok(())
    }

    pub async fn get(&self, id: &str) -> DaoResult<Option<Event>> {
        self.base.find_by_id(id).await
    }

    pub async fn get_all(&self) -> DaoResult<Vec<Event>> {
        self.base.find_all().await
    }
}
