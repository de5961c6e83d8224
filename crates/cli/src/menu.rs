use std::io::Write;

use eventplanner_db::models::{EventUpdate, InvitationStatus, InvitationUpdate, UserUpdate};
use eventplanner_services::DaoError;
use tokio::io::AsyncBufRead;
use tracing::{error, info};

use crate::console::{Console, render};
use crate::error::{CliError, CliResult};
use crate::state::Planner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddUser,
    UpdateUser,
    DeleteUser,
    GetUser,
    AddEvent,
    UpdateEvent,
    DeleteEvent,
    GetEvent,
    AddInvitation,
    UpdateInvitation,
    DeleteInvitation,
    GetInvitation,
    InvitationsByEvent,
    InvitationsByUser,
    AddComment,
    GetAttendees,
    InvitationsWithComments,
    InvitationStatistics,
    SendNotifications,
    ViewUsers,
    ViewEvents,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 22] = [
        Self::AddUser,
        Self::UpdateUser,
        Self::DeleteUser,
        Self::GetUser,
        Self::AddEvent,
        Self::UpdateEvent,
        Self::DeleteEvent,
        Self::GetEvent,
        Self::AddInvitation,
        Self::UpdateInvitation,
        Self::DeleteInvitation,
        Self::GetInvitation,
        Self::InvitationsByEvent,
        Self::InvitationsByUser,
        Self::AddComment,
        Self::GetAttendees,
        Self::InvitationsWithComments,
        Self::InvitationStatistics,
        Self::SendNotifications,
        Self::ViewUsers,
        Self::ViewEvents,
        Self::Exit,
    ];

    /// The entry whose 1-based number is exactly `input`.
    pub fn from_input(input: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .zip(1..)
            .find(|(_, number)| input == number.to_string())
            .map(|(choice, _)| *choice)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::AddUser => "Add User",
            Self::UpdateUser => "Update User",
            Self::DeleteUser => "Delete User",
            Self::GetUser => "Get User",
            Self::AddEvent => "Add Event",
            Self::UpdateEvent => "Update Event",
            Self::DeleteEvent => "Delete Event",
            Self::GetEvent => "Get Event",
            Self::AddInvitation => "Add Invitation",
            Self::UpdateInvitation => "Update Invitation",
            Self::DeleteInvitation => "Delete Invitation",
            Self::GetInvitation => "Get Invitation",
            Self::InvitationsByEvent => "Get Invitations by Event",
            Self::InvitationsByUser => "Get Invitations by User",
            Self::AddComment => "Add Comment to Invitation",
            Self::GetAttendees => "Get Attendees",
            Self::InvitationsWithComments => "Get Invitations with Comments",
            Self::InvitationStatistics => "Get Invitation Statistics",
            Self::SendNotifications => "Send Invitation Notifications",
            Self::ViewUsers => "View all Users",
            Self::ViewEvents => "View all Events",
            Self::Exit => "Exit",
        }
    }
}

enum Flow {
    Continue,
    Exit,
}

/// Run the interactive loop until Exit is chosen or input ends.
pub async fn run<R, W>(planner: &Planner, console: &mut Console<R, W>) -> CliResult<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    loop {
        console.say("\nWelcome to the Basic Event Planner!")?;
        for (index, choice) in MenuChoice::ALL.iter().enumerate() {
            console.say(format!("{}. {}", index + 1, choice.label()))?;
        }

        let outcome = match console.ask("Enter your choice: ").await {
            Ok(input) => match MenuChoice::from_input(&input) {
                Some(choice) => dispatch(planner, console, choice).await,
                None => {
                    console.say(
                        "Invalid choice. Please enter a number corresponding to the menu option.",
                    )?;
                    Ok(Flow::Continue)
                }
            },
            Err(e) => Err(e.into()),
        };

        match outcome {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => return Ok(()),
            Err(e) if e.is_end_of_input() => {
                info!("Input closed, exiting");
                return Ok(());
            }
            Err(CliError::Dao(e)) => {
                error!(error = %e, "Operation failed");
                console.say(format!("Error: {e}"))?;
            }
            Err(e) => return Err(e),
        }
    }
}

async fn dispatch<R, W>(
    planner: &Planner,
    console: &mut Console<R, W>,
    choice: MenuChoice,
) -> CliResult<Flow>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    match choice {
        MenuChoice::AddUser => {
            let id = new_id();
            let name = console.ask("Enter name: ").await?;
            let email = console.ask("Enter email: ").await?;
            let user = planner.users.add(&id, name, email).await?;
            console.say(format!("User {} added.", user.name))?;
        }
        MenuChoice::UpdateUser => {
            let users = planner.users.get_all().await?;
            if let Some(user) = console.select(users, "user").await? {
                let changes = UserUpdate {
                    name: Some(console.ask("Enter new name: ").await?),
                    email: Some(console.ask("Enter new email: ").await?),
                };
                planner.users.update(&user.id, &changes).await?;
                console.say(format!("User {} updated.", user.id))?;
            }
        }
        MenuChoice::DeleteUser => {
            let users = planner.users.get_all().await?;
            if let Some(user) = console.select(users, "user").await? {
                planner.users.delete(&user.id).await?;
                console.say(format!("User {} deleted.", user.id))?;
            }
        }
        MenuChoice::GetUser => {
            let users = planner.users.get_all().await?;
            if let Some(user) = console.select(users, "user").await? {
                match planner.users.get(&user.id).await? {
                    Some(found) => console.say(format!("User data: {}", render(&found)?))?,
                    None => console.say(format!("No user found with ID {}", user.id))?,
                }
            }
        }
        MenuChoice::AddEvent => {
            let id = new_id();
            let name = console.ask("Enter name: ").await?;
            let date = console.ask("Enter date: ").await?;
            let location = console.ask("Enter location: ").await?;
            let event = planner.events.add(&id, name, date, location).await?;
            console.say(format!("Event {} added.", event.name))?;
        }
        MenuChoice::UpdateEvent => {
            let events = planner.events.get_all().await?;
            if let Some(event) = console.select(events, "event").await? {
                let changes = EventUpdate {
                    name: Some(console.ask("Enter new name: ").await?),
                    date: Some(console.ask("Enter new date: ").await?),
                    location: Some(console.ask("Enter new location: ").await?),
                };
                planner.events.update(&event.id, &changes).await?;
                console.say(format!("Event {} updated.", event.id))?;
            }
        }
        MenuChoice::DeleteEvent => {
            let events = planner.events.get_all().await?;
            if let Some(event) = console.select(events, "event").await? {
                planner.events.delete(&event.id).await?;
                console.say(format!("Event {} deleted.", event.id))?;
            }
        }
        MenuChoice::GetEvent => {
            let events = planner.events.get_all().await?;
            if let Some(event) = console.select(events, "event").await? {
                match planner.events.get(&event.id).await? {
                    Some(found) => console.say(format!("Event data: {}", render(&found)?))?,
                    None => console.say(format!("No event found with ID {}", event.id))?,
                }
            }
        }
        MenuChoice::AddInvitation => {
            let id = new_id();
            let event_id = console.ask("Enter event ID: ").await?;
            let user_id = console.ask("Enter user ID: ").await?;
            let status = parse_status(&console.ask("Enter status: ").await?)?;
            planner
                .invitations
                .add(&id, event_id, user_id, status)
                .await?;
            console.say(format!("Invitation {id} added."))?;
        }
        MenuChoice::UpdateInvitation => {
            let invitations = planner.invitations.get_all().await?;
            if let Some(invitation) = console.select(invitations, "invitation").await? {
                let status = parse_status(&console.ask("Enter new status: ").await?)?;
                let changes = InvitationUpdate {
                    status: Some(status),
                    ..Default::default()
                };
                planner.invitations.update(&invitation.id, &changes).await?;
                console.say(format!("Invitation {} updated.", invitation.id))?;
            }
        }
        MenuChoice::DeleteInvitation => {
            let invitations = planner.invitations.get_all().await?;
            if let Some(invitation) = console.select(invitations, "invitation").await? {
                planner.invitations.delete(&invitation.id).await?;
                console.say(format!("Invitation {} deleted.", invitation.id))?;
            }
        }
        MenuChoice::GetInvitation => {
            let invitations = planner.invitations.get_all().await?;
            if let Some(invitation) = console.select(invitations, "invitation").await? {
                match planner.invitations.get(&invitation.id).await? {
                    Some(found) => {
                        console.say(format!("Invitation data: {}", render(&found)?))?
                    }
                    None => console.say(format!(
                        "No invitation found with ID {}",
                        invitation.id
                    ))?,
                }
            }
        }
        MenuChoice::InvitationsByEvent => {
            let event_id = console.ask("Enter event ID: ").await?;
            let found = planner.invitations.get_by_event(&event_id).await?;
            echo_all(console, "Invitation data", "invitations", &found)?;
        }
        MenuChoice::InvitationsByUser => {
            let name = console.ask("Enter user name: ").await?;
            let found = planner.invitations.get_by_user(&name).await?;
            echo_all(console, "Invitation data", "invitations", &found)?;
        }
        MenuChoice::AddComment => {
            let invitations = planner.invitations.get_all().await?;
            if let Some(invitation) = console.select(invitations, "invitation").await? {
                let text = console.ask("Enter comment: ").await?;
                planner.invitations.add_comment(&invitation.id, text).await?;
                console.say(format!("Comment added to invitation {}.", invitation.id))?;
            }
        }
        MenuChoice::GetAttendees => {
            let invitations = planner.invitations.get_all().await?;
            if let Some(invitation) = console.select(invitations, "invitation").await? {
                let attendees = planner.invitations.get_attendees(&invitation.id).await?;
                echo_all(console, "Attendee data", "attendees", &attendees)?;
            }
        }
        MenuChoice::InvitationsWithComments => {
            let joined = planner.invitations.get_with_comments().await?;
            echo_all(console, "Invitation with comments", "invitations with comments", &joined)?;
        }
        MenuChoice::InvitationStatistics => {
            let statistics = planner.invitations.get_statistics().await?;
            console.say(format!("Invitation statistics: {}", render(&statistics)?))?;
        }
        MenuChoice::SendNotifications => {
            let invitations = planner.invitations.get_all().await?;
            if let Some(invitation) = console.select(invitations, "invitation").await? {
                match planner.invitations.send_notifications(&invitation.id).await {
                    Ok(notification) => console.say(format!(
                        "Notification sent to user {}: {}",
                        notification.user_id, notification.message
                    ))?,
                    Err(e) => {
                        error!(error = %e, invitation_id = %invitation.id, "Notification failed");
                        console.say(format!(
                            "An error occurred while sending invitation notifications: {e}"
                        ))?
                    }
                }
            }
        }
        MenuChoice::ViewUsers => {
            let users = planner.users.get_all().await?;
            if users.is_empty() {
                console.say("No users found.")?;
            } else {
                console.say("\nAll Users:")?;
                for (index, user) in users.iter().enumerate() {
                    console.say(format!(
                        "{}. Name: {}, Email: {}",
                        index + 1,
                        user.name,
                        user.email
                    ))?;
                }
            }
        }
        MenuChoice::ViewEvents => {
            let events = planner.events.get_all().await?;
            if events.is_empty() {
                console.say("No events found.")?;
            } else {
                console.say("\nAll Events:")?;
                for (index, event) in events.iter().enumerate() {
                    console.say(format!(
                        "{}. Name: {}, Date: {}, Location: {}",
                        index + 1,
                        event.name,
                        event.date,
                        event.location
                    ))?;
                }
            }
        }
        MenuChoice::Exit => {
            console.say("Exiting...")?;
            return Ok(Flow::Exit);
        }
    }
    Ok(Flow::Continue)
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn parse_status(input: &str) -> Result<InvitationStatus, DaoError> {
    Ok(input.parse::<InvitationStatus>()?)
}

fn echo_all<R, W, T>(
    console: &mut Console<R, W>,
    prefix: &str,
    what: &str,
    items: &[T],
) -> CliResult<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    T: serde::Serialize,
{
    if items.is_empty() {
        console.say(format!("No {what} found."))?;
    }
    for item in items {
        console.say(format!("{prefix}: {}", render(item)?))?;
    }
    Ok(())
}
