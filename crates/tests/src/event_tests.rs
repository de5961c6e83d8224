use eventplanner_db::models::EventUpdate;
use eventplanner_services::DaoError;

use crate::fixtures::test_app::TestApp;

#[tokio::test]
async fn event_crud_cycle() {
    let app = TestApp::spawn();
    let events = &app.planner.events;

    let created = app.seed_event("e1", "Kickoff").await;
    assert_eq!(events.get("e1").await.unwrap(), Some(created));

    events
        .update(
            "e1",
            &EventUpdate {
                location: Some("Rooftop".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let event = events.get("e1").await.unwrap().unwrap();
    assert_eq!(event.name, "Kickoff");
    assert_eq!(event.date, "2024-09-01");
    assert_eq!(event.location, "Rooftop");

    events.delete("e1").await.unwrap();
    assert!(events.get("e1").await.unwrap().is_none());
    assert!(events.get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn dates_are_stored_verbatim() {
    let app = TestApp::spawn();
    app.planner
        .events
        .add("e1", "Picnic".into(), "next friday-ish".into(), "Park".into())
        .await
        .unwrap();

    let event = app.planner.events.get("e1").await.unwrap().unwrap();
    assert_eq!(event.date, "next friday-ish");
}

#[tokio::test]
async fn update_of_missing_event_fails_not_found() {
    let app = TestApp::spawn();
    let result = app
        .planner
        .events
        .update("missing", &EventUpdate::default())
        .await;
    assert!(matches!(result, Err(DaoError::NotFound)));
}

#[tokio::test]
async fn deleting_event_leaves_invitations_dangling() {
    let app = TestApp::spawn();
    let party = app.seed_party("dangle").await;

    app.planner.events.delete(&party.event.id).await.unwrap();

    let invitations = app
        .planner
        .invitations
        .get_by_event(&party.event.id)
        .await
        .unwrap();
    assert_eq!(invitations.len(), 2);
}
