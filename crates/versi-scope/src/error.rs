use std::path::PathBuf;

use thiserror::Error;
use versi_backend::{BackendError, Version};
use versi_platform::CommandError;

/// The active Node.js version could not be determined.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionDetectionError {
    #[error("Could not run `{program} --version`: {source}")]
    Command {
        program: String,
        #[source]
        source: CommandError,
    },

    #[error("`{program} --version` printed no version: {output:?}")]
    Unparsable { program: String, output: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub(crate) enum SwitchError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Detection(#[from] VersionDetectionError),

    #[error("expected Node.js {expected}, found {actual}")]
    Mismatch { expected: Version, actual: Version },
}

#[derive(Error, Debug)]
pub enum OptionsError {
    #[error("Failed to read options file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid options file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
