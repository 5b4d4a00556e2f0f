use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NvmDetection {
    pub found: bool,
    pub nvm_dir: Option<PathBuf>,
}

/// The nvm installation directory: `NVM_DIR` when set, `~/.nvm` otherwise.
#[must_use]
pub fn default_nvm_dir() -> Option<PathBuf> {
    let env_dir = std::env::var_os("NVM_DIR").map(PathBuf::from);
    select_nvm_dir(env_dir, dirs::home_dir())
}

fn select_nvm_dir(env_dir: Option<PathBuf>, home: Option<PathBuf>) -> Option<PathBuf> {
    env_dir
        .filter(|dir| !dir.as_os_str().is_empty())
        .or_else(|| home.map(|home| home.join(".nvm")))
}

#[must_use]
pub fn nvm_script(nvm_dir: &Path) -> PathBuf {
    nvm_dir.join("nvm.sh")
}

/// Look for `nvm.sh` under `nvm_dir`. Access errors count as "not found".
pub async fn detect_nvm(nvm_dir: Option<&Path>) -> NvmDetection {
    let Some(nvm_dir) = nvm_dir else {
        return NvmDetection {
            found: false,
            nvm_dir: None,
        };
    };

    let found = tokio::fs::try_exists(nvm_script(nvm_dir))
        .await
        .unwrap_or(false);

    NvmDetection {
        found,
        nvm_dir: Some(nvm_dir.to_path_buf()),
    }
}
