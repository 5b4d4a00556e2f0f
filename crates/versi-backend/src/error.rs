use thiserror::Error;
use versi_platform::CommandError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Command failed: {stderr}")]
    CommandFailed { stderr: String },

    #[error("Failed to start {program}: {message}")]
    SpawnFailed { program: String, message: String },

    #[error("Installation of {version} failed: {details}")]
    InstallFailed { version: String, details: String },
}

impl BackendError {
    pub fn install_failed(version: impl Into<String>, details: impl Into<String>) -> Self {
        Self::InstallFailed {
            version: version.into(),
            details: details.into(),
        }
    }
}

impl From<CommandError> for BackendError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Spawn { program, message } => Self::SpawnFailed { program, message },
            CommandError::Failed { stderr, .. } => Self::CommandFailed { stderr },
        }
    }
}
