//! Project discovery and path resolution.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{CONFIG_FILE_NAME, ProjectConfig, validate_namespace};
use crate::error::{ProjectError, Result};

/// A loaded project: its root directory and parsed config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub root: PathBuf,
    pub config: ProjectConfig,
}

impl Project {
    /// Loads `<root>/.spg.yml`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigNotFound`](ProjectError::ConfigNotFound) when the
    /// config file is absent.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let config_path = root.join(CONFIG_FILE_NAME);
        if !config_path.is_file() {
            return Err(ProjectError::ConfigNotFound { path: config_path });
        }
        let config = ProjectConfig::load(config_path)?;
        Ok(Self { root, config })
    }

    /// Walks from `start` up through its ancestors and opens the first
    /// directory that contains `.spg.yml`.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectNotFound`](ProjectError::ProjectNotFound) when no
    /// ancestor has a config, or the load error of the first config found.
    ///
    /// # Examples
    ///
    /// ```
    /// use spg_project::Project;
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// std::fs::write(dir.path().join(".spg.yml"), "namespace: Test\n").unwrap();
    /// let nested = dir.path().join("schema").join("rules");
    /// std::fs::create_dir_all(&nested).unwrap();
    ///
    /// let project = Project::discover(&nested).unwrap();
    /// assert_eq!(project.root, dir.path());
    /// ```
    pub fn discover(start: impl AsRef<Path>) -> Result<Self> {
        let start = start.as_ref();
        for dir in start.ancestors() {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                debug!(config = %candidate.display(), "Found project config");
                return Self::open(dir);
            }
        }
        Err(ProjectError::ProjectNotFound {
            start: start.to_path_buf(),
        })
    }

    /// Replaces the configured namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Result<Self> {
        let namespace = namespace.into();
        validate_namespace(&namespace)?;
        self.config.namespace = namespace;
        Ok(self)
    }

    pub fn namespace(&self) -> &str {
        &self.config.namespace
    }

    pub fn paths(&self) -> SchemaPaths {
        SchemaPaths::new(&self.root, &self.config)
    }
}

/// Resolves schema and project-relative paths.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use spg_project::{ProjectConfig, SchemaPaths};
///
/// let paths = SchemaPaths::new("", &ProjectConfig::new("Test"));
/// assert_eq!(paths.schema_file(), Path::new("schema").join("Test.schema"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaPaths {
    root: PathBuf,
    schema_dir: PathBuf,
    schema_file_name: String,
}

impl SchemaPaths {
    pub fn new(root: impl Into<PathBuf>, config: &ProjectConfig) -> Self {
        Self {
            root: root.into(),
            schema_dir: config.schema_dir.clone(),
            schema_file_name: config.schema_file_name(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn schema_dir(&self) -> PathBuf {
        self.root.join(&self.schema_dir)
    }

    /// `<root>/<schema_dir>/<schema_file>` with the namespace substituted.
    pub fn schema_file(&self) -> PathBuf {
        self.schema_dir().join(&self.schema_file_name)
    }
}
