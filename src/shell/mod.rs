//! External command execution.

pub mod command;

pub use command::{CommandOutput, CommandRunner, SystemRunner, ToolCommand};
