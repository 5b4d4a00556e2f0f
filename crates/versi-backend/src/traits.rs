use async_trait::async_trait;

use crate::error::BackendError;
use crate::types::Version;

/// A tool that can install and activate Node.js versions.
#[async_trait]
pub trait VersionManager: Send + Sync {
    fn name(&self) -> &'static str;

    /// Make `version` the active Node.js version, installing it first when the
    /// backend needs that as a separate step.
    ///
    /// # Errors
    /// Returns an error if any backend command fails.
    async fn switch_to(&self, version: &Version) -> Result<(), BackendError>;

    /// Activate an already installed version.
    ///
    /// # Errors
    /// Returns an error if the backend command fails.
    async fn activate(&self, version: &Version) -> Result<(), BackendError> {
        self.switch_to(version).await
    }
}
