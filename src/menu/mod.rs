//! Interactive terminal menu
//!
//! A numbered menu for managing jobs and triggering runs, reading answers
//! line by line through a [`Prompter`].

pub mod flows;
pub mod prompt;

pub use flows::Menu;
pub use prompt::Prompter;
