use bson::doc;
use eventplanner_db::models::InvitationStatus;

use crate::fixtures::test_app::TestApp;

#[tokio::test]
async fn add_and_list_users_through_menu() {
    let app = TestApp::spawn();
    let out = app
        .run_session("1\nAda\nada@example.com\n20\n22\n")
        .await;

    assert!(out.contains("User Ada added."));
    assert!(out.contains("All Users:"));
    assert!(out.contains("1. Name: Ada, Email: ada@example.com"));
    assert!(out.ends_with("Exiting...\n"));

    let users = app.planner.users.get_all().await.unwrap();
    assert_eq!(users.len(), 1);
    assert!(uuid::Uuid::parse_str(&users[0].id).is_ok());
}

#[tokio::test]
async fn update_event_by_selection() {
    let app = TestApp::spawn();
    app.seed_event("e1", "Kickoff").await;

    let out = app
        .run_session("6\n1\nRetro\n2024-10-01\nRoom 4\n22\n")
        .await;
    assert!(out.contains("Event e1 updated."));

    let event = app.planner.events.get("e1").await.unwrap().unwrap();
    assert_eq!(event.name, "Retro");
    assert_eq!(event.location, "Room 4");
}

#[tokio::test]
async fn invalid_status_is_reported_and_not_stored() {
    let app = TestApp::spawn();
    let out = app.run_session("9\nE1\nu1\nmaybe\n22\n").await;

    assert!(out.contains("Error: Validation: unknown invitation status \"maybe\""));
    assert!(app.planner.invitations.get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn statistics_and_notifications_are_echoed() {
    let app = TestApp::spawn();
    app.seed_invitation("i1", "E1", "u9", InvitationStatus::Accepted).await;

    let out = app.run_session("18\n19\n1\n22\n").await;
    assert!(out.contains(r#"Invitation statistics: {"total":1,"accepted":1,"declined":0,"pending":0}"#));
    assert!(out.contains("Notification sent to user u9: You've received an invitation (ID: i1)."));
}

#[tokio::test]
async fn bad_choices_and_empty_lists_keep_the_loop_running() {
    let app = TestApp::spawn();
    let out = app.run_session("42\n3\n13\nE1\n22\n").await;

    assert!(out.contains("Invalid choice. Please enter a number corresponding to the menu option."));
    assert!(out.contains("No user found."));
    assert!(out.contains("No invitations found."));
    assert!(out.ends_with("Exiting...\n"));
}

#[tokio::test]
async fn end_of_input_exits_cleanly() {
    let app = TestApp::spawn();
    let out = app.run_session("1\nAda\n").await;
    assert!(!out.contains("User Ada added."));
    assert!(app.planner.users.get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn user_listing_survives_a_malformed_document() {
    let app = TestApp::spawn();
    app.seed_user("u1", "Ada").await;
    app.seed_raw_user("broken", doc! { "name": 7 }).await;

    let out = app.run_session("20\n4\n1\n22\n").await;
    assert!(out.contains("1. Name: Ada, Email: ada@example.com"));
    assert!(out.contains(r#"User data: {"id":"u1","name":"Ada","email":"ada@example.com"}"#));
    assert!(!out.contains("Error:"));
}

#[tokio::test]
async fn menu_choice_must_match_exactly() {
    let app = TestApp::spawn();
    let out = app.run_session("+20\n 20\n22\n").await;

    assert_eq!(
        out.matches("Invalid choice. Please enter a number corresponding to the menu option.")
            .count(),
        2
    );
    assert!(!out.contains("No users found."));
}

#[tokio::test]
async fn comment_text_keeps_surrounding_whitespace() {
    let app = TestApp::spawn();
    app.seed_invitation("i1", "E1", "u1", InvitationStatus::Pending).await;

    app.run_session("15\n1\n  see you there  \n22\n").await;
    let comments = app.planner.invitations.get_comments("i1").await.unwrap();
    assert_eq!(comments[0].comment, "  see you there  ");
}
