//! Project configuration and schema path resolution.
//!
//! A project is a directory holding a `.spg.yml` config. The config names
//! the project namespace, the schema location and how to reach the external
//! schema engine. Commands receive these values explicitly through
//! [`Project`] and [`SchemaPaths`] rather than from process-wide state.
//!
//! # Quick start
//!
//! ```no_run
//! use spg_project::Project;
//!
//! let project = Project::discover(std::env::current_dir().unwrap()).unwrap();
//! println!("schema file: {}", project.paths().schema_file().display());
//! ```

mod config;
mod error;
mod project;

pub use config::{
    CONFIG_FILE_NAME, DEFAULT_ENGINE_PROGRAM, DEFAULT_ENGINE_TIMEOUT_SECS, DEFAULT_SCHEMA_DIR,
    DEFAULT_SCHEMA_FILE, EngineConfig, MAX_NAMESPACE_LEN, NAMESPACE_PLACEHOLDER, ProjectConfig,
    validate_namespace,
};
pub use error::{ProjectError, Result};
pub use project::{Project, SchemaPaths};
