#![cfg(unix)]

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Creates a project whose engine is a shell script with `engine_body`.
///
/// The script appends its arguments to `calls.log` in the project root
/// before running `engine_body`.
fn project(engine_body: &str) -> TempDir {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let script = dir.path().join("engine.sh");
    let log = dir.path().join("calls.log");
    fs::write(
        &script,
        format!("echo \"$@\" >> '{}'\n{engine_body}\n", log.display()),
    )
    .expect("failed to write engine script");

    let config = format!(
        r#"namespace: Test
engine:
  program: /bin/sh
  args: ["{}"]
  timeout_secs: 10
"#,
        script.display()
    );
    fs::write(dir.path().join(".spg.yml"), config).expect("failed to write config");
    dir
}

fn write_schema(dir: &Path) {
    let schema_dir = dir.join("schema");
    fs::create_dir_all(&schema_dir).unwrap();
    fs::write(
        schema_dir.join("Test.schema"),
        "namespace Test\n\nPerson(人物): EntityType\n",
    )
    .unwrap();
}

fn engine_calls(dir: &Path) -> Vec<String> {
    fs::read_to_string(dir.join("calls.log"))
        .map(|raw| raw.lines().map(ToOwned::to_owned).collect())
        .unwrap_or_default()
}

fn spg(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_spg"))
        .args(args)
        .current_dir(cwd)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run spg")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

// ---------------------------------------------------------------------------
// commit-schema
// ---------------------------------------------------------------------------

#[test]
fn commit_schema_missing_file_fails_without_engine_call() {
    let dir = project("exit 0");
    let output = spg(dir.path(), &["commit-schema"]);

    assert_eq!(output.status.code(), Some(1));
    let root = dir.path().canonicalize().unwrap();
    let expected = root.join("schema").join("Test.schema");
    assert_eq!(
        stderr(&output).trim(),
        format!("ERROR: File {} not exists.", expected.display())
    );
    assert!(engine_calls(dir.path()).is_empty());
}

#[test]
fn commit_schema_applied() {
    let dir = project("exit 0");
    write_schema(dir.path());
    let schema = dir
        .path()
        .canonicalize()
        .unwrap()
        .join("schema")
        .join("Test.schema");
    let output = spg(dir.path(), &["commit-schema"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Schema is successfully committed."));
    assert_eq!(
        engine_calls(dir.path()),
        vec![format!("sync-schema --namespace Test {}", schema.display())]
    );
}

#[test]
fn commit_schema_no_diff() {
    let dir = project("exit 3");
    write_schema(dir.path());
    let output = spg(dir.path(), &["commit-schema"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(
        stdout(&output).contains("There is no diff between local and server-side schema.")
    );
}

#[test]
fn commit_schema_validation_failure_does_not_repeat_diagnostics() {
    let dir = project("echo 'line 3: unknown type Persn' >&2\nexit 2");
    write_schema(dir.path());
    let output = spg(dir.path(), &["commit-schema"]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains(
        "Schema validation failed. Please fix the errors above and try again."
    ));
    // Printed once, by the engine itself.
    assert_eq!(err.matches("unknown type Persn").count(), 1);
}

#[test]
fn commit_schema_unexpected_failure_includes_error_text() {
    let dir = project("echo 'server returned 503'\nexit 9");
    write_schema(dir.path());
    let output = spg(dir.path(), &["commit-schema"]);

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("An unexpected error occurred: "));
    assert!(err.contains("status 9"));
    assert!(err.contains("server returned 503"));
}

#[test]
fn commit_schema_discovers_project_from_subdirectory() {
    let dir = project("exit 0");
    write_schema(dir.path());
    let nested = dir.path().join("builder").join("job");
    fs::create_dir_all(&nested).unwrap();

    let output = spg(&nested, &["commit-schema"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("successfully committed"));
}

#[test]
fn commit_schema_namespace_override_changes_schema_path() {
    let dir = project("exit 0");
    write_schema(dir.path());
    let output = spg(dir.path(), &["commit-schema", "--namespace", "Prod"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Prod.schema not exists."));
}

#[test]
fn commit_schema_with_explicit_project_dir() {
    let dir = project("exit 0");
    write_schema(dir.path());
    let elsewhere = tempfile::tempdir().unwrap();

    let output = spg(
        elsewhere.path(),
        &["commit-schema", "--project-dir", dir.path().to_str().unwrap()],
    );

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
}

#[test]
fn commit_schema_without_project_reports_unexpected_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = spg(
        dir.path(),
        &["commit-schema", "--project-dir", dir.path().to_str().unwrap()],
    );

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.starts_with("An unexpected error occurred: "));
    let config = dir.path().join(".spg.yml");
    assert!(
        err.contains(&config.display().to_string()),
        "stderr does not name the config path: {err}"
    );
}

// ---------------------------------------------------------------------------
// register-concept-rule
// ---------------------------------------------------------------------------

#[test]
fn register_concept_rule_success() {
    let dir = project("exit 0");
    fs::write(
        dir.path().join("concept.rule"),
        "namespace Test\n\n`TaxOfRiskApp`/`赌博应用`:\n    rule: [[ ... ]]\n",
    )
    .unwrap();

    let output = spg(dir.path(), &["register-concept-rule", "--file", "concept.rule"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Concept rule is successfully registered"));
    assert_eq!(
        engine_calls(dir.path()),
        vec!["register-concept-rule --namespace Test concept.rule".to_string()]
    );
}

#[test]
fn register_concept_rule_validation_failure() {
    let dir = project("echo 'rule syntax error' >&2\nexit 2");
    fs::write(dir.path().join("concept.rule"), "bad rule\n").unwrap();

    let output = spg(dir.path(), &["register-concept-rule", "--file", "concept.rule"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains(
        "Concept rule registration failed. Please fix the errors and try again."
    ));
}

#[test]
fn register_concept_rule_missing_file() {
    let dir = project("exit 0");
    let output = spg(dir.path(), &["register-concept-rule", "--file", "absent.rule"]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stderr(&output).trim(), "ERROR: File absent.rule not exists.");
    assert!(engine_calls(dir.path()).is_empty());
}

#[test]
fn register_concept_rule_requires_file_flag() {
    let dir = project("exit 0");
    let output = spg(dir.path(), &["register-concept-rule"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("--file"));
}
