use std::path::{Path, PathBuf};
use std::sync::Arc;

use versi_backend::BackendError;
use versi_platform::{CommandRequest, CommandRunner};

use crate::output::{clean_output, parse_installed};

/// Runs nvm subcommands by sourcing `nvm.sh` in a fresh shell.
#[derive(Clone)]
pub struct NvmClient {
    nvm_dir: PathBuf,
    shell: String,
    runner: Arc<dyn CommandRunner>,
}

impl std::fmt::Debug for NvmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NvmClient")
            .field("nvm_dir", &self.nvm_dir)
            .field("shell", &self.shell)
            .finish_non_exhaustive()
    }
}

impl NvmClient {
    #[must_use]
    pub fn new(runner: Arc<dyn CommandRunner>, nvm_dir: PathBuf) -> Self {
        Self {
            nvm_dir,
            shell: "bash".to_string(),
            runner,
        }
    }

    #[must_use]
    pub fn with_shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    #[must_use]
    pub fn nvm_dir(&self) -> &Path {
        &self.nvm_dir
    }

    fn build_nvm_request(&self, nvm_args: &[&str]) -> CommandRequest {
        let script = format!(
            "export NVM_DIR=\"{}\"; [ -s \"$NVM_DIR/nvm.sh\" ] && \\. \"$NVM_DIR/nvm.sh\"; nvm \"$@\"",
            self.nvm_dir.display(),
        );
        CommandRequest::new(self.shell.as_str())
            .args(["-c", script.as_str(), "bash"])
            .args(nvm_args.iter().copied())
            .env("TERM", "dumb")
            .env("NO_COLOR", "1")
    }

    async fn execute(&self, nvm_args: &[&str]) -> Result<String, BackendError> {
        let output = self.runner.run(&self.build_nvm_request(nvm_args)).await?;
        Ok(clean_output(&output.stdout))
    }

    /// List installed Node.js versions.
    ///
    /// # Errors
    /// Returns an error if invoking `nvm list` fails.
    pub async fn list_installed(&self) -> Result<Vec<String>, BackendError> {
        let output = self.execute(&["list"]).await?;
        Ok(parse_installed(&output))
    }

    /// Install a Node.js version.
    ///
    /// # Errors
    /// Returns an error if the install command fails.
    pub async fn install(&self, version: &str) -> Result<(), BackendError> {
        self.execute(&["install", version]).await?;
        Ok(())
    }

    /// Activate a Node.js version.
    ///
    /// # Errors
    /// Returns an error if the `nvm use` command fails.
    pub async fn use_version(&self, version: &str) -> Result<(), BackendError> {
        self.execute(&["use", version]).await?;
        Ok(())
    }
}
