use bson::{Document, doc};
use eventplanner_db::models::{Event, Invitation, InvitationStatus, User};
use eventplanner_db::{CollectionRef, DocumentRef};

use super::test_app::TestApp;

/// One event with two guests, one accepted and one pending.
pub struct SeededParty {
    pub event: Event,
    pub host: User,
    pub guest: User,
    pub accepted: Invitation,
    pub pending: Invitation,
}

impl TestApp {
    pub async fn seed_user(&self, id: &str, name: &str) -> User {
        self.planner
            .users
            .add(id, name.to_string(), format!("{}@example.com", name.to_lowercase()))
            .await
            .expect("Failed to seed user")
    }

    pub async fn seed_event(&self, id: &str, name: &str) -> Event {
        self.planner
            .events
            .add(id, name.to_string(), "2024-09-01".to_string(), "Main Hall".to_string())
            .await
            .expect("Failed to seed event")
    }

    pub async fn seed_invitation(
        &self,
        id: &str,
        event_id: &str,
        user_id: &str,
        status: InvitationStatus,
    ) -> Invitation {
        self.planner
            .invitations
            .add(id, event_id.to_string(), user_id.to_string(), status)
            .await
            .expect("Failed to seed invitation")
    }

    /// Write an invitation document directly, bypassing status checks, the
    /// way another client sharing the store could.
    pub async fn seed_raw_invitation(&self, id: &str, fields: Document) {
        self.store
            .set(&invitation_doc(id), fields)
            .await
            .expect("Failed to seed raw invitation");
    }

    /// Write a user document directly, whatever its shape.
    pub async fn seed_raw_user(&self, id: &str, fields: Document) {
        self.store
            .set(&CollectionRef::root(User::COLLECTION).doc(id), fields)
            .await
            .expect("Failed to seed raw user");
    }

    pub async fn seed_attendee(&self, invitation_id: &str, fields: Document) -> DocumentRef {
        let attendees = invitation_doc(invitation_id).collection(Invitation::ATTENDEES);
        self.store
            .add(&attendees, fields)
            .await
            .expect("Failed to seed attendee")
    }

    pub async fn seed_party(&self, prefix: &str) -> SeededParty {
        let event = self.seed_event(&format!("{prefix}-event"), "Launch Party").await;
        let host = self.seed_user(&format!("{prefix}-host"), "Ada").await;
        let guest = self.seed_user(&format!("{prefix}-guest"), "Grace").await;
        let accepted = self
            .seed_invitation(
                &format!("{prefix}-inv-host"),
                &event.id,
                &host.id,
                InvitationStatus::Accepted,
            )
            .await;
        let pending = self
            .seed_invitation(
                &format!("{prefix}-inv-guest"),
                &event.id,
                &guest.id,
                InvitationStatus::Pending,
            )
            .await;

        SeededParty {
            event,
            host,
            guest,
            accepted,
            pending,
        }
    }
}

pub fn invitation_doc(id: &str) -> DocumentRef {
    CollectionRef::root(Invitation::COLLECTION).doc(id)
}

pub fn raw_invitation(event_id: &str, user_id: &str, status: &str) -> Document {
    doc! { "event_id": event_id, "user_id": user_id, "status": status }
}
