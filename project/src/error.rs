//! Error types for project loading and path resolution.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while locating or loading a project.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// An explicitly given project directory has no `.spg.yml`.
    #[error("no project config at {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// No `.spg.yml` in the start directory or any of its ancestors.
    #[error("no project config found in {} or any parent directory", start.display())]
    ProjectNotFound { start: PathBuf },

    /// The config parsed but breaks a project rule.
    #[error("invalid project config: {0}")]
    InvalidConfig(String),
}

/// Convenience alias for results with [`ProjectError`].
pub type Result<T> = std::result::Result<T, ProjectError>;
