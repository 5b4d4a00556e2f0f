use std::ffi::OsStr;
use std::path::PathBuf;

use log::debug;
use versi_backend::BackendAvailability;
use versi_n::detect_n;
use versi_nvm::detect_nvm;

use crate::options::ScopeOptions;

/// Finds which version managers are installed. Never fails: anything that
/// goes wrong while looking counts as "not installed".
#[derive(Debug, Clone)]
pub struct ToolDetector {
    nvm_dir: Option<PathBuf>,
    n_program: String,
    search_path: Option<String>,
}

impl ToolDetector {
    #[must_use]
    pub fn new(options: &ScopeOptions) -> Self {
        Self {
            nvm_dir: options.nvm_dir.clone(),
            n_program: options.n_program.clone(),
            search_path: options.search_path.clone(),
        }
    }

    pub async fn detect_primary(&self) -> bool {
        let detection = detect_nvm(self.nvm_dir.as_deref()).await;
        debug!(
            "nvm detection: found={} dir={:?}",
            detection.found, detection.nvm_dir
        );
        detection.found
    }

    #[must_use]
    pub fn detect_secondary(&self) -> bool {
        let detection = detect_n(&self.n_program, self.search_path.as_deref().map(OsStr::new));
        debug!(
            "n detection: found={} path={:?}",
            detection.found, detection.path
        );
        detection.found
    }

    pub async fn detect(&self) -> BackendAvailability {
        BackendAvailability {
            primary: self.detect_primary().await,
            secondary: self.detect_secondary(),
        }
    }
}
