use std::ffi::OsStr;
use std::path::PathBuf;

use which::{which, which_in};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NDetection {
    pub found: bool,
    pub path: Option<PathBuf>,
}

/// Resolve the `n` executable on the command search path. When `search_path`
/// is given it replaces `PATH`.
#[must_use]
pub fn detect_n(program: &str, search_path: Option<&OsStr>) -> NDetection {
    let resolved = match search_path {
        Some(paths) => std::env::current_dir()
            .ok()
            .and_then(|cwd| which_in(program, Some(paths), cwd).ok()),
        None => which(program).ok(),
    };

    NDetection {
        found: resolved.is_some(),
        path: resolved,
    }
}
