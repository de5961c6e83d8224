use std::collections::HashSet;
use std::sync::Arc;

use bson::doc;
use eventplanner_db::models::{
    Attendee, Comment, InvalidStatus, Invitation, InvitationStatistics, InvitationStatus,
    InvitationUpdate, InvitationWithComments,
};
use eventplanner_db::{DocumentRef, DocumentStore, Query};
use futures::TryStreamExt;
use tracing::{debug, info, warn};

use super::base::{BaseDao, DaoError, DaoResult, decode_or_skip};
use crate::notification::{Notification, NotificationError};

impl From<InvalidStatus> for DaoError {
    fn from(err: InvalidStatus) -> Self {
        DaoError::Validation(err.to_string())
    }
}

pub struct InvitationDao {
    pub base: BaseDao<Invitation>,
}

impl InvitationDao {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            base: BaseDao::new(store, Invitation::COLLECTION),
        }
    }

    /// Write the invitation at `id`, replacing any existing document.
    /// `event_id` and `user_id` are stored as given, without checking that they exist.
    pub async fn add(
        &self,
        id: &str,
        event_id: String,
        user_id: String,
        status: InvitationStatus,
    ) -> DaoResult<Invitation> {
        let invitation = Invitation {
            id: id.to_string(),
            event_id,
            user_id,
            status: status.to_string(),
        };
        self.base.set(id, &invitation).await?;
        info!(invitation_id = %id, %status, "Invitation added");
        Ok(invitation)
    }

    pub async fn update(&self, id: &str, changes: &InvitationUpdate) -> DaoResult<()> {
        self.base.update(id, changes).await?;
        info!(invitation_id = %id, "Invitation updated");
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> DaoResult<()> {
        self.base.delete(id).await?;
        info!(invitation_id = %id, "Invitation deleted");
        Ok(())
    }

    pub async fn get(&self, id: &str) -> DaoResult<Option<Invitation>> {
        self.base.find_by_id(id).await
    }

    pub async fn get_all(&self) -> DaoResult<Vec<Invitation>> {
        self.base.find_all().await
    }

    pub async fn get_by_event(&self, event_id: &str) -> DaoResult<Vec<Invitation>> {
        self.base.find_by_field("event_id", event_id).await
    }

    /// Matches invitations on a `name` field. Invitations are never written
    /// with one, so this is empty unless another client added it; see
    /// [`Self::get_by_user_id`] for lookup by user.
    pub async fn get_by_user(&self, display_name: &str) -> DaoResult<Vec<Invitation>> {
        self.base.find_by_field("name", display_name).await
    }

    pub async fn get_by_user_id(&self, user_id: &str) -> DaoResult<Vec<Invitation>> {
        self.base.find_by_field("user_id", user_id).await
    }

    /// Append a comment; the store picks its id.
    pub async fn add_comment(&self, invitation_id: &str, text: String) -> DaoResult<Comment> {
        let comments = self.base.doc(invitation_id).collection(Invitation::COMMENTS);
        let created = self
            .base
            .store()
            .add(&comments, doc! { "comment": text.as_str() })
            .await?;
        info!(invitation_id, comment_id = %created.id(), "Comment added");
        Ok(Comment {
            id: created.id().to_string(),
            comment: text,
        })
    }

    pub async fn get_comments(&self, invitation_id: &str) -> DaoResult<Vec<Comment>> {
        let comments = self.base.doc(invitation_id).collection(Invitation::COMMENTS);
        let snapshots = self
            .base
            .store()
            .fetch(&Query::collection(comments))
            .await?;
        Ok(snapshots.into_iter().filter_map(decode_or_skip).collect())
    }

    /// Empty when the invitation or its attendees are absent.
    pub async fn get_attendees(&self, invitation_id: &str) -> DaoResult<Vec<Attendee>> {
        let attendees = self
            .base
            .doc(invitation_id)
            .collection(Invitation::ATTENDEES);
        let snapshots = self
            .base
            .store()
            .fetch(&Query::collection(attendees))
            .await?;

        Ok(snapshots
            .into_iter()
            .map(|snapshot| Attendee {
                id: snapshot.reference.id().to_string(),
                fields: snapshot.fields,
            })
            .collect())
    }

    /// Every invitation that has at least one comment, with all its comments.
    ///
    /// Scans comments across all invitations, then loads each parent
    /// invitation and its comment list once, in the order parents are first
    /// seen. Comments whose invitation no longer exists are skipped.
    pub async fn get_with_comments(&self) -> DaoResult<Vec<InvitationWithComments>> {
        let mut comments = self
            .base
            .store()
            .stream(&Query::collection_group(Invitation::COMMENTS))
            .await?;

        let mut seen = HashSet::new();
        let mut parents = Vec::new();
        while let Some(comment) = comments.try_next().await? {
            let Some(parent) = self.owning_invitation(&comment.reference) else {
                continue;
            };
            if seen.insert(parent.to_string()) {
                parents.push(parent.to_string());
            }
        }

        let mut results = Vec::with_capacity(parents.len());
        for id in parents {
            let invitation = match self.get(&id).await {
                Ok(Some(invitation)) => invitation,
                Ok(None) => {
                    debug!(invitation_id = %id, "Skipping comments of missing invitation");
                    continue;
                }
                Err(DaoError::BsonDe(e)) => {
                    warn!(invitation_id = %id, error = %e, "Skipping malformed invitation");
                    continue;
                }
                Err(e) => return Err(e),
            };
            let comments = self.get_comments(&id).await?;
            results.push(InvitationWithComments {
                invitation,
                comments,
            });
        }
        Ok(results)
    }

    fn owning_invitation<'a>(&self, comment: &'a DocumentRef) -> Option<&'a str> {
        let parent = comment.parent().parent()?;
        (parent.parent() == self.base.collection()).then(|| parent.id())
    }

    pub async fn get_statistics(&self) -> DaoResult<InvitationStatistics> {
        let by_status = |status: InvitationStatus| {
            self.base.query().where_eq("status", status.as_str())
        };

        let statistics = InvitationStatistics {
            total: self.base.count(self.base.query()).await?,
            accepted: self.base.count(by_status(InvitationStatus::Accepted)).await?,
            declined: self.base.count(by_status(InvitationStatus::Declined)).await?,
            pending: self.base.count(by_status(InvitationStatus::Pending)).await?,
        };
        debug!(?statistics, "Invitation statistics");
        Ok(statistics)
    }

    /// Build the notification for the invitation's user. Nothing is delivered;
    /// the caller decides how to surface it.
    pub async fn send_notifications(
        &self,
        invitation_id: &str,
    ) -> Result<Notification, NotificationError> {
        let invitation = self
            .get(invitation_id)
            .await?
            .ok_or_else(|| NotificationError::InvitationNotFound(invitation_id.to_string()))?;

        let notification = Notification::for_invitation(&invitation);
        info!(
            invitation_id,
            user_id = %notification.user_id,
            "Notification sent"
        );
        Ok(notification)
    }
}
