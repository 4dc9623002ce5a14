//! Command handlers behind the CLI subcommands.

pub mod console;
pub mod drill;
pub mod words;

pub use console::{Console, Input};
pub use drill::Drill;
