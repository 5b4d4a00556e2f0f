use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("IO error reading {name} ({kind}): {message}")]
    Io {
        name: String,
        kind: std::io::ErrorKind,
        message: String,
    },

    #[error("Failed to parse {name}: {message}")]
    Parse { name: String, message: String },

    #[error("{name} does not contain a JSON object")]
    NotAMapping { name: String },
}

impl ConfigError {
    fn io(name: &str, err: &std::io::Error) -> Self {
        Self::Io {
            name: name.to_string(),
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
pub trait ConfigReader: Send + Sync {
    async fn exists(&self, name: &str) -> bool;

    /// Read a file as UTF-8 text.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] if the file cannot be read.
    async fn read_to_string(&self, name: &str) -> Result<String, ConfigError>;

    /// Read a JSON file whose top level is an object.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not valid JSON, or its
    /// top level is not an object.
    async fn read_manifest(&self, name: &str) -> Result<Map<String, Value>, ConfigError> {
        let content = self.read_to_string(name).await?;
        let value: Value = serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            name: name.to_string(),
            message: e.to_string(),
        })?;
        match value {
            Value::Object(map) => Ok(map),
            _ => Err(ConfigError::NotAMapping {
                name: name.to_string(),
            }),
        }
    }
}

/// Reads project files relative to a fixed directory.
#[derive(Debug, Clone)]
pub struct WorkingDirReader {
    root: PathBuf,
}

impl WorkingDirReader {
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

#[async_trait]
impl ConfigReader for WorkingDirReader {
    async fn exists(&self, name: &str) -> bool {
        tokio::fs::try_exists(self.root.join(name))
            .await
            .unwrap_or(false)
    }

    async fn read_to_string(&self, name: &str) -> Result<String, ConfigError> {
        tokio::fs::read_to_string(self.root.join(name))
            .await
            .map_err(|e| ConfigError::io(name, &e))
    }
}
