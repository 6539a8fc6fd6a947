//! Schema engine collaborators.
//!
//! The schema markup compiler and the concept-rule compiler live outside
//! this tool. This crate defines the two interfaces commands call them
//! through and a [`ProcessEngine`] that reaches them as an external
//! executable.
//!
//! Both interfaces report rejected input as
//! [`EngineError::Validation`]; by then the engine has already shown its
//! diagnostics and callers should print only a summary.

mod error;
mod process;

use std::path::Path;

pub use error::{EngineError, Result};
pub use process::{
    EXIT_APPLIED, EXIT_UNCHANGED, EXIT_VALIDATION_FAILED, EngineExit, ProcessEngine,
};

/// Diffs a local schema file against the server copy and applies changes.
pub trait SchemaSync {
    /// Returns `true` if the server-side schema was altered.
    fn sync(&self, file: &Path) -> Result<bool>;
}

/// Registers a concept rule from a DSL file.
pub trait ConceptRuleRegistry {
    fn register(&self, file: &Path) -> Result<()>;
}

impl<T: SchemaSync + ?Sized> SchemaSync for &T {
    fn sync(&self, file: &Path) -> Result<bool> {
        (**self).sync(file)
    }
}

impl<T: ConceptRuleRegistry + ?Sized> ConceptRuleRegistry for &T {
    fn register(&self, file: &Path) -> Result<()> {
        (**self).register(file)
    }
}
