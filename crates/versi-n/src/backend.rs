use std::sync::Arc;

use async_trait::async_trait;
use log::info;

use versi_backend::{BackendError, Version, VersionManager};
use versi_platform::{CommandRequest, CommandRunner};

/// `n <version>` installs the version when missing and activates it.
#[derive(Clone)]
pub struct NBackend {
    program: String,
    runner: Arc<dyn CommandRunner>,
}

impl std::fmt::Debug for NBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NBackend")
            .field("program", &self.program)
            .finish_non_exhaustive()
    }
}

impl NBackend {
    #[must_use]
    pub fn new(runner: Arc<dyn CommandRunner>, program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            runner,
        }
    }
}

#[async_trait]
impl VersionManager for NBackend {
    fn name(&self) -> &'static str {
        "n"
    }

    async fn switch_to(&self, version: &Version) -> Result<(), BackendError> {
        info!("n: switching to Node.js {version}");
        let request = CommandRequest::new(self.program.as_str()).arg(version.as_str());
        self.runner.run(&request).await?;
        Ok(())
    }
}
