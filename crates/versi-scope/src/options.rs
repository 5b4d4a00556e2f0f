use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::OptionsError;

/// Where to look for project declarations and which programs to drive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeOptions {
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,

    /// nvm installation directory. `None` disables the nvm backend.
    #[serde(default)]
    pub nvm_dir: Option<PathBuf>,

    #[serde(default = "default_node_program")]
    pub node_program: String,

    #[serde(default = "default_n_program")]
    pub n_program: String,

    /// Shell used to source `nvm.sh`.
    #[serde(default = "default_shell")]
    pub shell: String,

    #[serde(default = "default_pin_file")]
    pub pin_file: String,

    #[serde(default = "default_manifest_file")]
    pub manifest_file: String,

    /// Replaces `PATH` when resolving the `n` executable.
    #[serde(default)]
    pub search_path: Option<String>,
}

fn default_working_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_node_program() -> String {
    "node".to_string()
}

fn default_n_program() -> String {
    "n".to_string()
}

fn default_shell() -> String {
    "bash".to_string()
}

fn default_pin_file() -> String {
    ".nvmrc".to_string()
}

fn default_manifest_file() -> String {
    "package.json".to_string()
}

impl Default for ScopeOptions {
    fn default() -> Self {
        Self {
            working_dir: default_working_dir(),
            nvm_dir: None,
            node_program: default_node_program(),
            n_program: default_n_program(),
            shell: default_shell(),
            pin_file: default_pin_file(),
            manifest_file: default_manifest_file(),
            search_path: None,
        }
    }
}

impl ScopeOptions {
    /// Defaults, with the working directory and nvm location taken from the
    /// process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_defaults()
    }

    /// Load options from a JSON file. Missing fields keep their defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(path: &Path) -> Result<Self, OptionsError> {
        let content = std::fs::read_to_string(path).map_err(|source| OptionsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| OptionsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Fill the nvm directory from `NVM_DIR` (or `~/.nvm`) when unset and
    /// make a relative working directory absolute.
    #[must_use]
    pub fn with_env_defaults(mut self) -> Self {
        if self.nvm_dir.is_none() {
            self.nvm_dir = versi_nvm::default_nvm_dir();
        }
        if self.working_dir.is_relative()
            && let Ok(cwd) = std::env::current_dir()
        {
            self.working_dir = cwd.join(&self.working_dir);
        }
        self
    }
}
