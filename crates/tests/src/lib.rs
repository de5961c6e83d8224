pub mod fixtures;

#[cfg(test)]
mod event_tests;
#[cfg(test)]
mod invitation_tests;
#[cfg(test)]
mod menu_tests;
