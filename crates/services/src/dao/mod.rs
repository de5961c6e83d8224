pub mod base;
pub mod event;
pub mod invitation;
pub mod user;

pub use base::{BaseDao, DaoError, DaoResult};
pub use event::EventDao;
pub use invitation::InvitationDao;
pub use user::UserDao;
