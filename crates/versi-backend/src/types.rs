use serde::{Deserialize, Serialize};
use std::fmt;

/// A Node.js version as text, for example `20.18.0`.
///
/// Only the major component takes part in switch decisions; the rest of the
/// text is handed to backends untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Version(String);

impl Version {
    /// Parse the output of `node --version`, dropping any leading
    /// non-numeric prefix such as `v`.
    #[must_use]
    pub fn from_reported(raw: &str) -> Option<Self> {
        let trimmed = raw.trim().trim_start_matches(|c: char| !c.is_ascii_digit());
        let token = trimmed.split_whitespace().next()?;
        Some(Self(token.to_string()))
    }

    /// Take a version pinned by a project file verbatim, apart from trimming
    /// and a single leading `v` marker.
    #[must_use]
    pub fn from_pin(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let value = trimmed.strip_prefix('v').unwrap_or(trimmed);
        if value.is_empty() {
            None
        } else {
            Some(Self(value.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn major(&self) -> Option<u32> {
        self.0.split('.').next()?.parse().ok()
    }

    /// Whether both versions name the same major release.
    #[must_use]
    pub fn same_major(&self, other: &Version) -> bool {
        self.major().is_some() && self.major() == other.major()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendAvailability {
    pub primary: bool,
    pub secondary: bool,
}
