use std::sync::Arc;

use eventplanner_db::DocumentStore;
use eventplanner_db::models::{User, UserUpdate};
use tracing::info;

use super::base::{BaseDao, DaoResult};

pub struct UserDao {
    pub base: BaseDao<User>,
}

impl UserDao {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            base: BaseDao::new(store, User::COLLECTION),
        }
    }

    /// Write the user at `id`, replacing any existing document.
    pub async fn add(&self, id: &str, name: String, email: String) -> DaoResult<User> {
        let user = User {
            id: id.to_string(),
            name,
            email,
        };
        self.base.set(id, &user).await?;
        info!(user_id = %id, name = %user.name, "User added");
        Ok(user)
    }

    /// Fails with `NotFound` when no user exists at `id`.
    pub async fn update(&self, id: &str, changes: &UserUpdate) -> DaoResult<()> {
        self.base.update(id, changes).await?;
        info!(user_id = %id, "User updated");
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> DaoResult<()> {
        self.base.delete(id).await?;
        info!(user_id = %id, "User deleted");
        Ok(())
    }

    pub async fn get(&self, id: &str) -> DaoResult<Option<User>> {
        self.base.find_by_id(id).await
    }

    pub async fn get_all(&self) -> DaoResult<Vec<User>> {
        self.base.find_all().await
    }
}
