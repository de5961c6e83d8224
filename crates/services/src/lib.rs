pub mod dao;
pub mod notification;

pub use dao::*;
pub use notification::{Notification, NotificationError};
