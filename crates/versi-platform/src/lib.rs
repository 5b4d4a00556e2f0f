//! Host collaborators: running external programs and reading project files.

mod commands;
mod files;

pub use commands::{
    CommandError, CommandOutput, CommandRequest, CommandRunner, HideWindow, SystemCommandRunner,
};
pub use files::{ConfigError, ConfigReader, WorkingDirReader};
