use std::fmt;
use std::str::FromStr;

use bson::Document;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An invitation as stored.
///
/// `status` is kept as the raw stored string: other clients may have written
/// values outside [`InvitationStatus`], and reads must not fail on them.
/// Writes from this crate always go through [`InvitationStatus`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
    #[serde(default)]
    pub id: String,
    pub event_id: String,
    pub user_id: String,
    pub status: String,
}

impl Invitation {
    pub const COLLECTION: &'static str = "invitations";
    pub const COMMENTS: &'static str = "comments";
    pub const ATTENDEES: &'static str = "attendees";

    pub fn known_status(&self) -> Option<InvitationStatus> {
        self.status.parse().ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Declined,
}

impl InvitationStatus {
    pub const ALL: [InvitationStatus; 3] = [Self::Pending, Self::Accepted, Self::Declined];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        }
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown invitation status {0:?}, expected pending, accepted or declined")]
pub struct InvalidStatus(pub String);

impl FromStr for InvitationStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim().to_ascii_lowercase())
            .ok_or_else(|| InvalidStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct InvitationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InvitationStatus>,
}

/// Entry of an invitation's `comments` subcollection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub id: String,
    pub comment: String,
}

/// Entry of an invitation's `attendees` subcollection. The shape is owned by
/// whoever writes attendees, so the fields are passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attendee {
    pub id: String,
    #[serde(flatten)]
    pub fields: Document,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvitationWithComments {
    #[serde(flatten)]
    pub invitation: Invitation,
    pub comments: Vec<Comment>,
}

/// Counts per status. `total` includes statuses outside the known three, so
/// it can exceed `accepted + declined + pending`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InvitationStatistics {
    pub total: u64,
    pub accepted: u64,
    pub declined: u64,
    pub pending: u64,
}
