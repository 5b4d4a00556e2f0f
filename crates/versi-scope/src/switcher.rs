use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;

use futures_util::FutureExt;
use log::{debug, error, info, warn};
use versi_backend::{BackendAvailability, Version, VersionManager};
use versi_n::NBackend;
use versi_nvm::{NvmBackend, NvmClient};
use versi_platform::{CommandRunner, ConfigReader, SystemCommandRunner, WorkingDirReader};

use crate::detector::ToolDetector;
use crate::error::{SwitchError, VersionDetectionError};
use crate::options::ScopeOptions;
use crate::resolver::VersionResolver;

/// Where a switcher is in its single scoped run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitcherState {
    Uninitialized,
    Ready,
    Switching,
    Running,
    Restoring,
    Done,
}

/// Facts gathered once during initialization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagerState {
    pub original_version: Option<Version>,
    pub required_version: Option<Version>,
    pub backends: BackendAvailability,
}

/// Switches to the project's Node.js version around a unit of work and puts
/// the original version back afterwards.
///
/// The active Node.js version is shared by the whole host, so only one
/// scoped run should be in flight at a time.
pub struct VersionSwitcher {
    runner: Arc<dyn CommandRunner>,
    resolver: VersionResolver,
    detector: ToolDetector,
    nvm_dir: Option<PathBuf>,
    shell: String,
    n_program: String,
    state: ManagerState,
    phase: SwitcherState,
}

impl VersionSwitcher {
    #[must_use]
    pub fn new(
        options: &ScopeOptions,
        runner: Arc<dyn CommandRunner>,
        reader: Arc<dyn ConfigReader>,
    ) -> Self {
        Self {
            resolver: VersionResolver::new(options, runner.clone(), reader),
            detector: ToolDetector::new(options),
            runner,
            nvm_dir: options.nvm_dir.clone(),
            shell: options.shell.clone(),
            n_program: options.n_program.clone(),
            state: ManagerState::default(),
            phase: SwitcherState::Uninitialized,
        }
    }

    /// A switcher that runs real processes and reads files from
    /// `options.working_dir`. An unset nvm directory falls back to `NVM_DIR`
    /// or `~/.nvm`.
    #[must_use]
    pub fn from_options(options: &ScopeOptions) -> Self {
        let options = options.clone().with_env_defaults();
        Self::new(
            &options,
            Arc::new(SystemCommandRunner),
            Arc::new(WorkingDirReader::new(options.working_dir.clone())),
        )
    }

    #[must_use]
    pub fn state(&self) -> &ManagerState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> SwitcherState {
        self.phase
    }

    fn transition(&mut self, next: SwitcherState) {
        debug!("version switcher: {:?} -> {next:?}", self.phase);
        self.phase = next;
    }

    /// Record the current version, available backends and required version.
    ///
    /// # Errors
    /// Returns an error if the current Node.js version cannot be determined.
    pub async fn initialize(&mut self) -> Result<(), VersionDetectionError> {
        if self.phase != SwitcherState::Uninitialized {
            debug!("version switcher already initialized");
            return Ok(());
        }

        let original = self.resolver.current_version().await?;
        let backends = self.detector.detect().await;
        let required = self.resolver.required_version().await;

        debug!("Current Node.js version: {original}");
        debug!("Required Node.js version: {required:?}");
        debug!("nvm available: {}", backends.primary);
        debug!("n available: {}", backends.secondary);

        self.state = ManagerState {
            original_version: Some(original),
            required_version: required,
            backends,
        };
        self.transition(SwitcherState::Ready);
        Ok(())
    }

    /// True when both versions are known and their major versions differ.
    #[must_use]
    pub fn needs_switch(&self) -> bool {
        match (&self.state.original_version, &self.state.required_version) {
            (Some(original), Some(required)) => original.major() != required.major(),
            _ => false,
        }
    }

    /// Switch to the required version if needed. Returns whether the
    /// required version is now active; failures are logged, never raised.
    pub async fn switch_to_required(&mut self) -> bool {
        if !self.needs_switch() {
            debug!("Current Node.js version satisfies the project, no switch needed");
            self.transition(SwitcherState::Running);
            return true;
        }

        let Some(required) = self.state.required_version.clone() else {
            warn!("No required Node.js version was specified");
            self.transition(SwitcherState::Running);
            return false;
        };

        if let Some(original) = &self.state.original_version {
            info!("Switching Node.js version: {original} -> {required}");
        }
        self.transition(SwitcherState::Switching);

        let switched = match self.select_backend() {
            Some(backend) => match self.switch_with(backend.as_ref(), &required).await {
                Ok(active) => {
                    info!("Switched to Node.js {active}");
                    true
                }
                Err(e) => {
                    error!("{} failed to switch Node.js version: {e}", backend.name());
                    false
                }
            },
            None => {
                error!("No Node.js version manager found (nvm or n)");
                info!("Install nvm or n to enable automatic Node.js version switching");
                false
            }
        };

        self.transition(SwitcherState::Running);
        switched
    }

    async fn switch_with(
        &self,
        backend: &dyn VersionManager,
        required: &Version,
    ) -> Result<Version, SwitchError> {
        backend.switch_to(required).await?;

        // Only the major version has to line up.
        let active = self.resolver.current_version().await?;
        if active.same_major(required) {
            Ok(active)
        } else {
            Err(SwitchError::Mismatch {
                expected: required.clone(),
                actual: active,
            })
        }
    }

    /// nvm is preferred over n when both are installed.
    fn select_backend(&self) -> Option<Box<dyn VersionManager>> {
        let backends = self.state.backends;

        if backends.primary
            && let Some(nvm_dir) = &self.nvm_dir
        {
            let client = NvmClient::new(self.runner.clone(), nvm_dir.clone())
                .with_shell(self.shell.as_str());
            return Some(Box::new(NvmBackend::new(client)));
        }

        if backends.secondary {
            return Some(Box::new(NBackend::new(
                self.runner.clone(),
                self.n_program.as_str(),
            )));
        }

        None
    }

    /// Put the version recorded at initialization back. Returns whether the
    /// original version is active afterwards; never raises.
    pub async fn restore_original(&mut self) -> bool {
        if self.phase == SwitcherState::Done {
            return self.restore().await;
        }
        self.transition(SwitcherState::Restoring);
        let restored = self.restore().await;
        self.transition(SwitcherState::Done);
        restored
    }

    async fn restore(&self) -> bool {
        let Some(original) = &self.state.original_version else {
            debug!("No original Node.js version recorded, nothing to restore");
            return true;
        };

        let current = match self.resolver.current_version().await {
            Ok(current) => current,
            Err(e) => {
                warn!("Could not read the active Node.js version before restoring: {e}");
                info!("Switch back to Node.js {original} manually if needed");
                return false;
            }
        };

        if &current == original {
            debug!("Already on the original Node.js version");
            return true;
        }

        info!("Switching back to the original Node.js version: {current} -> {original}");

        let Some(backend) = self.select_backend() else {
            warn!("No Node.js version manager available to restore Node.js {original}");
            info!("Switch back to Node.js {original} manually");
            return false;
        };

        match backend.activate(original).await {
            Ok(()) => {
                match self.resolver.current_version().await {
                    Ok(active) => info!("Switched back to Node.js {active}"),
                    Err(_) => info!("Switched back to Node.js {original}"),
                }
                true
            }
            Err(e) => {
                warn!("Failed to switch back to the original Node.js version: {e}");
                info!("Switch back to Node.js {original} manually");
                false
            }
        }
    }

    /// Run `work` under the project's required Node.js version.
    ///
    /// The original version is restored on every exit path, including an
    /// error or panic from `work`. A failed switch only logs a warning and
    /// `work` runs under the current version. Restoration problems are
    /// logged and never replace the outcome of `work`.
    ///
    /// # Errors
    /// Returns the error produced by `work` unchanged, or the converted
    /// [`VersionDetectionError`] if the current version cannot be read.
    pub async fn run_scoped<F, Fut, T, E>(mut self, work: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<VersionDetectionError>,
    {
        let outcome = match self.initialize().await {
            Ok(()) => {
                if !self.switch_to_required().await {
                    warn!("Node.js version switch failed, continuing with the current version");
                }
                AssertUnwindSafe(async move { work().await })
                    .catch_unwind()
                    .await
            }
            Err(e) => Ok(Err(E::from(e))),
        };

        if AssertUnwindSafe(self.restore_original())
            .catch_unwind()
            .await
            .is_err()
        {
            debug!("Restoring the original Node.js version panicked");
        }

        match outcome {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }
}
