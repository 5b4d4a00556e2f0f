//! Run a unit of work under a project's declared Node.js version.
//!
//! The required version comes from `.nvmrc` or from a known
//! `package.json` `engines.node` range. The switch goes through nvm when it
//! is installed and through n otherwise, and the version that was active
//! beforehand is put back when the work finishes, whether it succeeded or
//! not.

mod detector;
mod error;
mod options;
mod range;
mod resolver;
mod switcher;

use std::future::Future;

pub use detector::ToolDetector;
pub use error::{OptionsError, VersionDetectionError};
pub use options::ScopeOptions;
pub use range::{LATEST_LTS, OLDEST_LTS, PREVIOUS_LTS, RangeMapper};
pub use resolver::VersionResolver;
pub use switcher::{ManagerState, SwitcherState, VersionSwitcher};
pub use versi_backend::{BackendAvailability, Version};

/// Run `work` with the Node.js version required by the project in
/// `options.working_dir`, using real processes. Without an explicit
/// `nvm_dir` the nvm installation is looked up in `NVM_DIR` or `~/.nvm`.
///
/// # Errors
/// Returns the error produced by `work`, or the converted
/// [`VersionDetectionError`] if the current version cannot be read.
pub async fn with_required_version<F, Fut, T, E>(options: &ScopeOptions, work: F) -> Result<T, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: From<VersionDetectionError>,
{
    VersionSwitcher::from_options(options).run_scoped(work).await
}
