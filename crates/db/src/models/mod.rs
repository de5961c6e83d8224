pub mod event;
pub mod invitation;
pub mod user;

pub use event::*;
pub use invitation::*;
pub use user::*;
