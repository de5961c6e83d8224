use bson::doc;
use eventplanner_db::models::{InvitationStatus, InvitationUpdate};
use eventplanner_services::{DaoError, NotificationError};

use crate::fixtures::seed::raw_invitation;
use crate::fixtures::test_app::TestApp;

#[tokio::test]
async fn get_by_event_returns_exactly_that_events_invitations() {
    let app = TestApp::spawn();
    app.seed_invitation("i1", "E1", "u1", InvitationStatus::Pending).await;
    app.seed_invitation("i2", "E1", "u2", InvitationStatus::Accepted).await;
    app.seed_invitation("i3", "E2", "u1", InvitationStatus::Declined).await;
    app.seed_invitation("i4", "E3", "u3", InvitationStatus::Pending).await;

    let mut found = app.planner.invitations.get_by_event("E1").await.unwrap();
    found.sort_by(|a, b| a.id.cmp(&b.id));

    let ids: Vec<&str> = found.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["i1", "i2"]);
    assert!(found.iter().all(|i| i.event_id == "E1"));
}

#[tokio::test]
async fn get_by_user_matches_nothing_without_name_field() {
    let app = TestApp::spawn();
    let party = app.seed_party("byname").await;

    for name in [party.host.name.as_str(), party.guest.name.as_str(), "", "u1"] {
        let found = app.planner.invitations.get_by_user(name).await.unwrap();
        assert!(found.is_empty(), "unexpected match for {name:?}");
    }
}

#[tokio::test]
async fn get_by_user_id_finds_the_users_invitations() {
    let app = TestApp::spawn();
    let party = app.seed_party("byid").await;
    app.seed_invitation("other", "E9", &party.guest.id, InvitationStatus::Declined)
        .await;

    let mut found = app
        .planner
        .invitations
        .get_by_user_id(&party.guest.id)
        .await
        .unwrap();
    found.sort_by(|a, b| a.id.cmp(&b.id));

    assert_eq!(found.len(), 2);
    assert_eq!(found[0].id, party.pending.id);
    assert_eq!(found[1].id, "other");
}

#[tokio::test]
async fn status_update_leaves_references_untouched() {
    let app = TestApp::spawn();
    let party = app.seed_party("update").await;

    app.planner
        .invitations
        .update(
            &party.pending.id,
            &InvitationUpdate {
                status: Some(InvitationStatus::Declined),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let invitation = app
        .planner
        .invitations
        .get(&party.pending.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(invitation.known_status(), Some(InvitationStatus::Declined));
    assert_eq!(invitation.event_id, party.event.id);
    assert_eq!(invitation.user_id, party.guest.id);
}

#[tokio::test]
async fn invitation_crud_cycle() {
    let app = TestApp::spawn();
    let invitations = &app.planner.invitations;

    let changes = InvitationUpdate {
        status: Some(InvitationStatus::Accepted),
        ..Default::default()
    };
    assert!(matches!(
        invitations.update("i1", &changes).await,
        Err(DaoError::NotFound)
    ));

    app.seed_invitation("i1", "E1", "u1", InvitationStatus::Pending).await;
    app.seed_invitation("i1", "E2", "u2", InvitationStatus::Declined).await;
    app.seed_invitation("i2", "E1", "u3", InvitationStatus::Pending).await;

    let replaced = invitations.get("i1").await.unwrap().unwrap();
    assert_eq!(replaced.event_id, "E2");
    assert_eq!(replaced.user_id, "u2");
    assert_eq!(replaced.status, "declined");

    invitations.update("i1", &changes).await.unwrap();
    let updated = invitations.get("i1").await.unwrap().unwrap();
    assert_eq!(updated.known_status(), Some(InvitationStatus::Accepted));
    assert_eq!(updated.event_id, "E2");

    let mut ids: Vec<String> = invitations
        .get_all()
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.id)
        .collect();
    ids.sort();
    assert_eq!(ids, vec!["i1", "i2"]);

    invitations.delete("i1").await.unwrap();
    invitations.delete("i1").await.unwrap();
    assert_eq!(invitations.get("i1").await.unwrap(), None);
    assert_eq!(invitations.get_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn malformed_invitations_do_not_hide_valid_ones() {
    let app = TestApp::spawn();
    app.seed_invitation("i1", "E1", "u1", InvitationStatus::Pending).await;
    app.seed_raw_invitation("bad", doc! { "event_id": "E1", "user_id": "u2", "status": 3 })
        .await;
    app.seed_raw_invitation("partial", doc! { "event_id": "E1" }).await;

    let all = app.planner.invitations.get_all().await.unwrap();
    assert_eq!(all.iter().map(|i| i.id.as_str()).collect::<Vec<_>>(), vec!["i1"]);

    let by_event = app.planner.invitations.get_by_event("E1").await.unwrap();
    assert_eq!(by_event.iter().map(|i| i.id.as_str()).collect::<Vec<_>>(), vec!["i1"]);

    let by_user = app.planner.invitations.get_by_user_id("u2").await.unwrap();
    assert!(by_user.is_empty());

    let statistics = app.planner.invitations.get_statistics().await.unwrap();
    assert_eq!(statistics.total, 3);
    assert_eq!(statistics.pending, 1);
}

#[tokio::test]
async fn foreign_status_strings_still_read_back() {
    let app = TestApp::spawn();
    app.seed_raw_invitation("legacy", raw_invitation("E1", "u1", "tentative"))
        .await;

    let invitation = app.planner.invitations.get("legacy").await.unwrap().unwrap();
    assert_eq!(invitation.status, "tentative");
    assert_eq!(invitation.known_status(), None);
}

#[tokio::test]
async fn references_are_not_validated() {
    let app = TestApp::spawn();
    let invitation = app
        .seed_invitation("i1", "no-such-event", "no-such-user", InvitationStatus::Pending)
        .await;
    assert_eq!(
        app.planner.invitations.get("i1").await.unwrap(),
        Some(invitation)
    );
}

#[tokio::test]
async fn attendees_are_passed_through() {
    let app = TestApp::spawn();
    let party = app.seed_party("attend").await;
    let attendee = app
        .seed_attendee(&party.accepted.id, doc! { "user_id": "u7", "plus_ones": 2 })
        .await;

    let attendees = app
        .planner
        .invitations
        .get_attendees(&party.accepted.id)
        .await
        .unwrap();
    assert_eq!(attendees.len(), 1);
    assert_eq!(attendees[0].id, attendee.id());
    assert_eq!(attendees[0].fields, doc! { "user_id": "u7", "plus_ones": 2 });

    assert!(app
        .planner
        .invitations
        .get_attendees(&party.pending.id)
        .await
        .unwrap()
        .is_empty());
    assert!(app
        .planner
        .invitations
        .get_attendees("missing")
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn notifications_report_missing_invitations() {
    let app = TestApp::spawn();
    let party = app.seed_party("notify").await;

    let sent = app
        .planner
        .invitations
        .send_notifications(&party.pending.id)
        .await
        .unwrap();
    assert_eq!(sent.user_id, party.guest.id);
    assert!(sent.message.contains(&party.pending.id));

    let missing = app.planner.invitations.send_notifications("gone").await;
    assert!(matches!(missing, Err(NotificationError::InvitationNotFound(id)) if id == "gone"));
}
