pub mod console;
pub mod error;
pub mod menu;
pub mod state;

pub use console::Console;
pub use menu::{MenuChoice, run};
pub use state::Planner;
