use eventplanner_db::models::Invitation;
use serde::Serialize;
use thiserror::Error;

use crate::dao::DaoError;

/// A notification addressed to an invited user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub invitation_id: String,
    pub user_id: String,
    pub message: String,
}

impl Notification {
    pub fn for_invitation(invitation: &Invitation) -> Self {
        Self {
            invitation_id: invitation.id.clone(),
            user_id: invitation.user_id.clone(),
            message: format!(
                "You've received an invitation (ID: {}).",
                invitation.id
            ),
        }
    }
}

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("No invitation found with ID {0}")]
    InvitationNotFound(String),
    #[error("Failed to load invitation: {0}")]
    Store(#[from] DaoError),
}
