use async_trait::async_trait;
use log::{debug, info};

use versi_backend::{BackendError, Version, VersionManager};

use crate::client::NvmClient;
use crate::output::is_installed;

#[derive(Debug, Clone)]
pub struct NvmBackend {
    client: NvmClient,
}

impl NvmBackend {
    #[must_use]
    pub fn new(client: NvmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl VersionManager for NvmBackend {
    fn name(&self) -> &'static str {
        "nvm"
    }

    async fn switch_to(&self, version: &Version) -> Result<(), BackendError> {
        debug!(
            "nvm: listing installed versions in {}",
            self.client.nvm_dir().display()
        );
        let installed = self.client.list_installed().await?;

        if !is_installed(&installed, version) {
            info!("nvm: installing Node.js {version}");
            self.client
                .install(version.as_str())
                .await
                .map_err(|e| BackendError::install_failed(version.as_str(), e.to_string()))?;
        }

        self.activate(version).await
    }

    async fn activate(&self, version: &Version) -> Result<(), BackendError> {
        info!("nvm: using version {version}");
        self.client.use_version(version.as_str()).await
    }
}
