//! Project configuration file.
//!
//! Every project carries a `.spg.yml` at its root naming the project
//! namespace, where the schema lives, and how to reach the external engine.
//!
//! # Example YAML
//!
//! ```yaml
//! namespace: Test
//! schema_dir: schema
//! schema_file: $namespace.schema
//! engine:
//!   program: spg-engine
//!   args: []
//!   timeout_secs: 120
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ProjectError, Result};

/// File name of the project config, looked up at the project root.
pub const CONFIG_FILE_NAME: &str = ".spg.yml";

/// Placeholder in [`ProjectConfig::schema_file`] replaced by the namespace.
pub const NAMESPACE_PLACEHOLDER: &str = "$namespace";

pub const DEFAULT_SCHEMA_DIR: &str = "schema";
pub const DEFAULT_SCHEMA_FILE: &str = "$namespace.schema";
pub const DEFAULT_ENGINE_PROGRAM: &str = "spg-engine";
pub const DEFAULT_ENGINE_TIMEOUT_SECS: u64 = 120;

/// Longest namespace accepted by the schema server.
pub const MAX_NAMESPACE_LEN: usize = 16;

/// How to run the external schema engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine executable. Looked up on `PATH` unless it contains a path
    /// separator, in which case relative paths are taken from the project
    /// root.
    pub program: String,
    /// Arguments placed before the engine subcommand.
    pub args: Vec<String>,
    /// Seconds to wait for the engine before killing it. `0` waits forever.
    pub timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_ENGINE_PROGRAM.to_string(),
            args: Vec::new(),
            timeout_secs: DEFAULT_ENGINE_TIMEOUT_SECS,
        }
    }
}

/// Contents of `.spg.yml`.
///
/// # Examples
///
/// ```
/// use spg_project::ProjectConfig;
///
/// let config: ProjectConfig = serde_yaml::from_str("namespace: Test").unwrap();
/// assert_eq!(config.schema_file_name(), "Test.schema");
/// assert_eq!(config.engine.program, "spg-engine");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project namespace, substituted for `$namespace` in the schema file name.
    pub namespace: String,
    /// Schema directory, relative to the project root.
    #[serde(default = "default_schema_dir")]
    pub schema_dir: PathBuf,
    /// Schema file name template.
    #[serde(default = "default_schema_file")]
    pub schema_file: String,
    #[serde(default)]
    pub engine: EngineConfig,
}

fn default_schema_dir() -> PathBuf {
    PathBuf::from(DEFAULT_SCHEMA_DIR)
}

fn default_schema_file() -> String {
    DEFAULT_SCHEMA_FILE.to_string()
}

impl ProjectConfig {
    /// Creates a config with default paths and engine settings.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            schema_dir: default_schema_dir(),
            schema_file: default_schema_file(),
            engine: EngineConfig::default(),
        }
    }

    /// Loads and validates configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](ProjectError::IoError) if the file cannot be read,
    /// [`YamlError`](ProjectError::YamlError) if parsing fails, or
    /// [`InvalidConfig`](ProjectError::InvalidConfig) if validation fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config: Self = serde_yaml::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        validate_namespace(&self.namespace)?;
        if self.schema_file.trim().is_empty() {
            return Err(ProjectError::InvalidConfig(
                "schema_file cannot be empty".to_string(),
            ));
        }
        if self.engine.program.trim().is_empty() {
            return Err(ProjectError::InvalidConfig(
                "engine.program cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Schema file name with the namespace substituted.
    pub fn schema_file_name(&self) -> String {
        self.schema_file
            .replace(NAMESPACE_PLACEHOLDER, &self.namespace)
    }
}

/// Checks a namespace against the schema server's naming rule: an uppercase
/// ASCII letter followed by ASCII letters or digits, at most
/// [`MAX_NAMESPACE_LEN`] characters.
///
/// # Examples
///
/// ```
/// use spg_project::validate_namespace;
///
/// assert!(validate_namespace("Test").is_ok());
/// assert!(validate_namespace("riskMining").is_err());
/// assert!(validate_namespace("Risk_Mining").is_err());
/// ```
pub fn validate_namespace(namespace: &str) -> Result<()> {
    let mut chars = namespace.chars();
    let Some(first) = chars.next() else {
        return Err(ProjectError::InvalidConfig(
            "namespace cannot be empty".to_string(),
        ));
    };
    if !first.is_ascii_uppercase() {
        return Err(ProjectError::InvalidConfig(format!(
            "namespace must start with an uppercase letter: {namespace}"
        )));
    }
    if !chars.all(|c| c.is_ascii_alphanumeric()) {
        return Err(ProjectError::InvalidConfig(format!(
            "namespace may only contain letters and digits: {namespace}"
        )));
    }
    if namespace.len() > MAX_NAMESPACE_LEN {
        return Err(ProjectError::InvalidConfig(format!(
            "namespace is longer than {MAX_NAMESPACE_LEN} characters: {namespace}"
        )));
    }
    Ok(())
}
