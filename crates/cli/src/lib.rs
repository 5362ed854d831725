//! `todolist` command-line front end: argument parsing, the interactive
//! menu and the one-shot maintenance commands.

pub mod cli;
pub mod console;

pub use cli::{Backend, Cli, Commands};
pub use console::Console;
