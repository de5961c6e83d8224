use std::sync::Arc;

use eventplanner_db::DocumentStore;
use eventplanner_services::{EventDao, InvitationDao, UserDao};

/// Repositories sharing one store handle.
pub struct Planner {
    pub users: UserDao,
    pub events: EventDao,
    pub invitations: InvitationDao,
}

impl Planner {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            users: UserDao::new(store.clone()),
            events: EventDao::new(store.clone()),
            invitations: InvitationDao::new(store),
        }
    }
}
