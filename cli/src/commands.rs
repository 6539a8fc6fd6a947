use std::path::Path;

use spg_core::{Change, CommandMessages, ExitStatus, Invocation, Reporter, execute};
use spg_engine::{ConceptRuleRegistry, SchemaSync};
use spg_project::SchemaPaths;

pub const COMMIT_SCHEMA: &str = "commit-schema";
pub const REGISTER_CONCEPT_RULE: &str = "register-concept-rule";

pub const COMMIT_SCHEMA_MESSAGES: CommandMessages = CommandMessages {
    applied: "Schema is successfully committed.",
    unchanged: "There is no diff between local and server-side schema.",
    validation_failed: "Schema validation failed. Please fix the errors above and try again.",
};

// Registration has no no-op result; `unchanged` is never shown.
pub const REGISTER_CONCEPT_RULE_MESSAGES: CommandMessages = CommandMessages {
    applied: "Concept rule is successfully registered.",
    unchanged: "Concept rule is successfully registered.",
    validation_failed: "Concept rule registration failed. Please fix the errors and try again.",
};

/// Commits the project's schema file through `engine`.
pub fn commit_schema<S, R>(paths: &SchemaPaths, engine: &S, reporter: &mut R) -> ExitStatus
where
    S: SchemaSync + ?Sized,
    R: Reporter + ?Sized,
{
    let schema_file = paths.schema_file();
    execute(
        &Invocation::new(COMMIT_SCHEMA, &COMMIT_SCHEMA_MESSAGES).requiring(&schema_file),
        || engine.sync(&schema_file).map(Change::from),
        reporter,
    )
}

/// Registers the concept rule defined in `file`.
pub fn register_concept_rule<C, R>(file: &Path, registry: &C, reporter: &mut R) -> ExitStatus
where
    C: ConceptRuleRegistry + ?Sized,
    R: Reporter + ?Sized,
{
    execute(
        &Invocation::new(REGISTER_CONCEPT_RULE, &REGISTER_CONCEPT_RULE_MESSAGES).requiring(file),
        || registry.register(file).map(|()| Change::Applied),
        reporter,
    )
}
