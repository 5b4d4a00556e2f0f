use std::sync::Arc;

use log::{debug, warn};
use serde::Deserialize;
use serde_json::{Map, Value};
use versi_backend::Version;
use versi_platform::{CommandRequest, CommandRunner, ConfigError, ConfigReader};

use crate::error::VersionDetectionError;
use crate::options::ScopeOptions;
use crate::range::RangeMapper;

#[derive(Debug, Default, Deserialize)]
struct Manifest {
    #[serde(default)]
    engines: Option<Engines>,
}

#[derive(Debug, Default, Deserialize)]
struct Engines {
    #[serde(default)]
    node: Option<String>,
}

/// Reads the active Node.js version and the version the project asks for.
pub struct VersionResolver {
    runner: Arc<dyn CommandRunner>,
    reader: Arc<dyn ConfigReader>,
    node_program: String,
    pin_file: String,
    manifest_file: String,
}

impl VersionResolver {
    #[must_use]
    pub fn new(
        options: &ScopeOptions,
        runner: Arc<dyn CommandRunner>,
        reader: Arc<dyn ConfigReader>,
    ) -> Self {
        Self {
            runner,
            reader,
            node_program: options.node_program.clone(),
            pin_file: options.pin_file.clone(),
            manifest_file: options.manifest_file.clone(),
        }
    }

    /// Ask the interpreter for its version.
    ///
    /// # Errors
    /// Returns an error if `node --version` cannot be run or prints nothing
    /// that looks like a version.
    pub async fn current_version(&self) -> Result<Version, VersionDetectionError> {
        let request = CommandRequest::new(self.node_program.as_str()).arg("--version");
        let output =
            self.runner
                .run(&request)
                .await
                .map_err(|source| VersionDetectionError::Command {
                    program: self.node_program.clone(),
                    source,
                })?;

        Version::from_reported(&output.stdout).ok_or_else(|| VersionDetectionError::Unparsable {
            program: self.node_program.clone(),
            output: output.stdout.trim().to_string(),
        })
    }

    /// The version pinned in the pin file, or mapped from the manifest's
    /// `engines.node` range. Read errors are logged and treated as "no
    /// requirement".
    pub async fn required_version(&self) -> Option<Version> {
        match self.read_required_version().await {
            Ok(version) => version,
            Err(e) => {
                warn!("Failed to read the project's Node.js version requirement: {e}");
                None
            }
        }
    }

    async fn read_required_version(&self) -> Result<Option<Version>, ConfigError> {
        if self.reader.exists(&self.pin_file).await {
            let content = self.reader.read_to_string(&self.pin_file).await?;
            debug!("{} pins Node.js {:?}", self.pin_file, content.trim());
            return Ok(Version::from_pin(&content));
        }

        if self.reader.exists(&self.manifest_file).await {
            let manifest = self.reader.read_manifest(&self.manifest_file).await?;
            if let Some(range) = engines_node(manifest, &self.manifest_file)? {
                let mapped = RangeMapper::map(&range);
                if mapped.is_none() {
                    debug!("No known version for engines.node range {range:?}");
                }
                return Ok(mapped);
            }
        }

        Ok(None)
    }
}

fn engines_node(manifest: Map<String, Value>, name: &str) -> Result<Option<String>, ConfigError> {
    let manifest: Manifest =
        serde_json::from_value(Value::Object(manifest)).map_err(|e| ConfigError::Parse {
            name: name.to_string(),
            message: e.to_string(),
        })?;

    Ok(manifest
        .engines
        .and_then(|engines| engines.node)
        .filter(|range| !range.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;
    use versi_platform::{CommandError, CommandOutput};

    use super::*;

    struct FixedRunner(Result<String, CommandError>);

    #[async_trait]
    impl CommandRunner for FixedRunner {
        async fn run(&self, _request: &CommandRequest) -> Result<CommandOutput, CommandError> {
            self.0.clone().map(|stdout| CommandOutput {
                stdout,
                stderr: String::new(),
            })
        }
    }

    #[derive(Default)]
    struct MemoryReader {
        files: HashMap<String, String>,
        unreadable: bool,
    }

    impl MemoryReader {
        fn with(files: &[(&str, &str)]) -> Self {
            Self {
                files: files
                    .iter()
                    .map(|(name, content)| ((*name).to_string(), (*content).to_string()))
                    .collect(),
                unreadable: false,
            }
        }
    }

    #[async_trait]
    impl ConfigReader for MemoryReader {
        async fn exists(&self, name: &str) -> bool {
            self.files.contains_key(name)
        }

        async fn read_to_string(&self, name: &str) -> Result<String, ConfigError> {
            if self.unreadable {
                return Err(ConfigError::Io {
                    name: name.to_string(),
                    kind: std::io::ErrorKind::PermissionDenied,
                    message: "permission denied".to_string(),
                });
            }
            Ok(self.files[name].clone())
        }
    }

    fn resolver(runner: FixedRunner, reader: MemoryReader) -> VersionResolver {
        VersionResolver::new(&ScopeOptions::default(), Arc::new(runner), Arc::new(reader))
    }

    fn node_prints(stdout: &str) -> FixedRunner {
        FixedRunner(Ok(stdout.to_string()))
    }

    #[tokio::test]
    async fn current_version_strips_prefix() {
        let resolver = resolver(node_prints("v20.18.0\n"), MemoryReader::default());

        let version = resolver.current_version().await.unwrap();

        assert_eq!(version.as_str(), "20.18.0");
    }

    #[tokio::test]
    async fn current_version_fails_when_node_is_missing() {
        let runner = FixedRunner(Err(CommandError::Spawn {
            program: "node".to_string(),
            message: "No such file or directory".to_string(),
        }));
        let resolver = resolver(runner, MemoryReader::default());

        let result = resolver.current_version().await;

        assert!(matches!(result, Err(VersionDetectionError::Command { .. })));
    }

    #[tokio::test]
    async fn current_version_fails_on_empty_output() {
        let resolver = resolver(node_prints("\n"), MemoryReader::default());

        let result = resolver.current_version().await;

        assert!(matches!(
            result,
            Err(VersionDetectionError::Unparsable { .. })
        ));
    }

    #[tokio::test]
    async fn pin_file_wins_over_manifest() {
        let reader = MemoryReader::with(&[
            (".nvmrc", "20.18.0\n"),
            ("package.json", r#"{"engines": {"node": ">=18.0.0"}}"#),
        ]);
        let resolver = resolver(node_prints("v18.0.0"), reader);

        let required = resolver.required_version().await;

        assert_eq!(required.unwrap().as_str(), "20.18.0");
    }

    #[tokio::test]
    async fn pin_file_is_not_validated() {
        let reader = MemoryReader::with(&[(".nvmrc", "lts/iron\n")]);
        let resolver = resolver(node_prints("v18.0.0"), reader);

        let required = resolver.required_version().await;

        assert_eq!(required.unwrap().as_str(), "lts/iron");
    }

    #[tokio::test]
    async fn manifest_range_is_mapped() {
        let reader = MemoryReader::with(&[(
            "package.json",
            r#"{"name": "app", "engines": {"node": ">=18.0.0 <24.0.0"}}"#,
        )]);
        let resolver = resolver(node_prints("v18.0.0"), reader);

        let required = resolver.required_version().await;

        assert_eq!(required.unwrap().as_str(), "22.11.0");
    }

    #[tokio::test]
    async fn unknown_manifest_range_is_absent() {
        let reader = MemoryReader::with(&[("package.json", r#"{"engines": {"node": ">=16.0.0"}}"#)]);
        let resolver = resolver(node_prints("v18.0.0"), reader);

        assert!(resolver.required_version().await.is_none());
    }

    #[tokio::test]
    async fn manifest_without_engines_is_absent() {
        let reader = MemoryReader::with(&[("package.json", r#"{"name": "app"}"#)]);
        let resolver = resolver(node_prints("v18.0.0"), reader);

        assert!(resolver.required_version().await.is_none());
    }

    #[tokio::test]
    async fn no_project_files_is_absent() {
        let resolver = resolver(node_prints("v18.0.0"), MemoryReader::default());

        assert!(resolver.required_version().await.is_none());
    }

    #[tokio::test]
    async fn malformed_manifest_degrades_to_absent() {
        let reader = MemoryReader::with(&[("package.json", "{ not json")]);
        let resolver = resolver(node_prints("v18.0.0"), reader);

        assert!(resolver.required_version().await.is_none());
    }

    #[tokio::test]
    async fn non_string_engine_constraint_degrades_to_absent() {
        let reader = MemoryReader::with(&[("package.json", r#"{"engines": {"node": 18}}"#)]);
        let resolver = resolver(node_prints("v18.0.0"), reader);

        assert!(resolver.required_version().await.is_none());
    }

    #[tokio::test]
    async fn unreadable_pin_file_degrades_to_absent() {
        let reader = MemoryReader {
            unreadable: true,
            ..MemoryReader::with(&[(".nvmrc", "20")])
        };
        let resolver = resolver(node_prints("v18.0.0"), reader);

        assert!(resolver.required_version().await.is_none());
    }
}
