//! External engine driven as a child process.
//!
//! The engine executable is invoked once per operation:
//!
//! ```text
//! <program> <args..> sync-schema --namespace <ns> <file>
//! <program> <args..> register-concept-rule --namespace <ns> <file>
//! ```
//!
//! Its stderr is inherited so validation diagnostics reach the user
//! directly. Stdout is captured and only shown when the engine fails in a
//! way outside its exit-code protocol:
//!
//! | exit code | meaning |
//! |-----------|---------|
//! | 0 | change applied |
//! | 2 | validation failure, diagnostics already printed |
//! | 3 | nothing to change |
//! | other | unexpected failure |

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use spg_project::{EngineConfig, Project};
use tracing::{debug, warn};
use wait_timeout::ChildExt;

use crate::error::{EngineError, Result};
use crate::{ConceptRuleRegistry, SchemaSync};

pub const EXIT_APPLIED: i32 = 0;
pub const EXIT_VALIDATION_FAILED: i32 = 2;
pub const EXIT_UNCHANGED: i32 = 3;

/// Number of trailing stdout lines kept for error messages.
const OUTPUT_TAIL_LINES: usize = 20;

const SYNC_SUBCOMMAND: &str = "sync-schema";
const REGISTER_SUBCOMMAND: &str = "register-concept-rule";

/// Successful engine exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineExit {
    Applied,
    Unchanged,
}

/// Runs the configured engine executable.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use spg_engine::ProcessEngine;
///
/// let engine = ProcessEngine::new("spg-engine", "Test")
///     .with_args(["--server", "http://127.0.0.1:8887"])
///     .with_timeout(Some(Duration::from_secs(30)));
/// assert_eq!(engine.program(), std::path::Path::new("spg-engine"));
/// ```
#[derive(Debug, Clone)]
pub struct ProcessEngine {
    program: PathBuf,
    args: Vec<String>,
    namespace: String,
    timeout: Option<Duration>,
}

impl ProcessEngine {
    pub fn new(program: impl Into<PathBuf>, namespace: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            namespace: namespace.into(),
            timeout: None,
        }
    }

    /// Builds an engine from the project's `engine` section.
    ///
    /// A relative program containing a path separator is resolved against
    /// the project root; bare names are left for `PATH` lookup.
    pub fn from_project(project: &Project) -> Self {
        let EngineConfig {
            program,
            args,
            timeout_secs,
        } = &project.config.engine;

        let program_path = Path::new(program);
        let program = if program_path.components().count() > 1 && program_path.is_relative() {
            project.root.join(program_path)
        } else {
            program_path.to_path_buf()
        };
        let timeout = (*timeout_secs > 0).then(|| Duration::from_secs(*timeout_secs));

        Self::new(program, project.namespace())
            .with_args(args.iter().cloned())
            .with_timeout(timeout)
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// `None` waits for the engine indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }

    /// Runs one engine subcommand against `file` and interprets its exit code.
    pub fn invoke(&self, subcommand: &str, file: &Path) -> Result<EngineExit> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(subcommand)
            .arg("--namespace")
            .arg(&self.namespace)
            .arg(file)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());
        debug!(
            program = %self.program.display(),
            args = ?self.args,
            subcommand,
            file = %file.display(),
            "Starting schema engine"
        );

        let mut child = command.spawn().map_err(|source| EngineError::Spawn {
            program: self.program_name(),
            source,
        })?;

        // Drain stdout on a background thread so a chatty engine cannot
        // block on a full pipe while we wait for it.
        let stdout_thread = child.stdout.take().map(|mut pipe| {
            std::thread::spawn(move || {
                let mut buf = Vec::new();
                let result = pipe.read_to_end(&mut buf);
                (buf, result)
            })
        });

        let status = match self.timeout {
            Some(timeout) => match child.wait_timeout(timeout) {
                Ok(Some(status)) => status,
                Ok(None) => {
                    debug!(
                        program = %self.program.display(),
                        timeout_secs = timeout.as_secs(),
                        "Schema engine timed out, killing process"
                    );
                    stop_child(&mut child);
                    return Err(EngineError::Timeout {
                        program: self.program_name(),
                        secs: timeout.as_secs(),
                    });
                }
                Err(err) => {
                    debug!(error = %err, "Failed to wait for schema engine, killing process");
                    stop_child(&mut child);
                    return Err(err.into());
                }
            },
            None => child.wait()?,
        };

        let stdout = stdout_thread
            .and_then(|t| t.join().ok())
            .map(|(buf, res)| {
                if let Err(err) = res {
                    debug!(error = %err, "Failed to read engine stdout");
                }
                buf
            })
            .unwrap_or_default();

        debug!(
            program = %self.program.display(),
            code = ?status.code(),
            "Schema engine exited"
        );

        match status.code() {
            Some(EXIT_APPLIED) => Ok(EngineExit::Applied),
            Some(EXIT_UNCHANGED) => Ok(EngineExit::Unchanged),
            Some(EXIT_VALIDATION_FAILED) => Err(EngineError::Validation(format!(
                "engine rejected {}",
                file.display()
            ))),
            code => Err(EngineError::Exited {
                program: self.program_name(),
                code,
                output: output_tail(&String::from_utf8_lossy(&stdout)),
            }),
        }
    }
}

impl SchemaSync for ProcessEngine {
    fn sync(&self, file: &Path) -> Result<bool> {
        let exit = self.invoke(SYNC_SUBCOMMAND, file)?;
        Ok(exit == EngineExit::Applied)
    }
}

impl ConceptRuleRegistry for ProcessEngine {
    fn register(&self, file: &Path) -> Result<()> {
        self.invoke(REGISTER_SUBCOMMAND, file)?;
        Ok(())
    }
}

/// Kills `child` and reaps it.
fn stop_child(child: &mut Child) {
    if let Err(err) = child.kill() {
        warn!(error = %err, "Failed to kill schema engine");
    }
    if let Err(err) = child.wait() {
        debug!(error = %err, "Failed to reap schema engine");
    }
}

/// Last [`OUTPUT_TAIL_LINES`] non-empty lines of `output`, joined by `"; "`.
fn output_tail(output: &str) -> String {
    let lines: Vec<&str> = output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let start = lines.len().saturating_sub(OUTPUT_TAIL_LINES);
    lines[start..].join("; ")
}
