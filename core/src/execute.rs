//! The command executor.
//!
//! [`execute`] runs one fallible operation behind an optional file
//! precondition, classifies the result, reports one status line and returns
//! the exit status. Nothing propagates past it.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::outcome::{Change, Classify, CommandMessages, CommandOutcome, ExitStatus};
use crate::report::Reporter;

/// Describes the command being executed.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    /// Command name, used in log records.
    pub command: &'a str,
    /// File that must exist before the operation is attempted.
    pub required_file: Option<&'a Path>,
    pub messages: &'a CommandMessages,
}

impl<'a> Invocation<'a> {
    pub fn new(command: &'a str, messages: &'a CommandMessages) -> Self {
        Self {
            command,
            required_file: None,
            messages,
        }
    }

    pub fn requiring(mut self, path: &'a Path) -> Self {
        self.required_file = Some(path);
        self
    }
}

/// Runs the precondition and the operation, returning the classified outcome
/// without reporting it.
///
/// `op` is not called when the required file is missing.
pub fn run<E, F>(invocation: &Invocation<'_>, op: F) -> CommandOutcome
where
    E: Classify,
    F: FnOnce() -> Result<Change, E>,
{
    if let Some(path) = invocation.required_file {
        if !path.exists() {
            info!(
                command = invocation.command,
                path = %path.display(),
                "Required input file is missing"
            );
            return CommandOutcome::MissingFile {
                path: path.to_path_buf(),
            };
        }
    }

    debug!(command = invocation.command, "Invoking operation");
    let outcome = CommandOutcome::classify(op());
    match &outcome {
        CommandOutcome::Success(change) => {
            info!(command = invocation.command, ?change, "Operation succeeded");
        }
        CommandOutcome::ValidationFailure { message } => {
            info!(command = invocation.command, error = %message, "Validation failed");
        }
        CommandOutcome::UnexpectedFailure { message } => {
            info!(command = invocation.command, error = %message, "Operation failed");
        }
        CommandOutcome::MissingFile { .. } => {}
    }
    outcome
}

/// Reports `outcome` and returns its exit status.
pub fn finish<R>(outcome: &CommandOutcome, messages: &CommandMessages, reporter: &mut R) -> ExitStatus
where
    R: Reporter + ?Sized,
{
    let line = outcome.status_line(messages);
    if let Err(err) = reporter.report(&line) {
        warn!(error = %err, "Failed to write status line");
    }
    outcome.exit_status()
}

/// Runs `op` and reports the result. See the module docs.
///
/// # Examples
///
/// ```
/// use std::fmt;
/// use spg_core::{Change, Classify, CommandMessages, ExitStatus, Invocation, StatusLine, execute};
///
/// #[derive(Debug)]
/// struct Invalid;
/// impl fmt::Display for Invalid {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         f.write_str("bad input")
///     }
/// }
/// impl Classify for Invalid {
///     fn is_validation(&self) -> bool { true }
/// }
///
/// const MESSAGES: CommandMessages = CommandMessages {
///     applied: "Applied.",
///     unchanged: "Unchanged.",
///     validation_failed: "Please fix the errors above.",
/// };
///
/// let mut lines: Vec<StatusLine> = Vec::new();
/// let status = execute(
///     &Invocation::new("demo", &MESSAGES),
///     || Err::<Change, _>(Invalid),
///     &mut lines,
/// );
/// assert_eq!(status, ExitStatus::Failure);
/// assert_eq!(lines[0].text, "Please fix the errors above.");
/// ```
pub fn execute<E, F, R>(invocation: &Invocation<'_>, op: F, reporter: &mut R) -> ExitStatus
where
    E: Classify,
    F: FnOnce() -> Result<Change, E>,
    R: Reporter + ?Sized,
{
    let outcome = run(invocation, op);
    finish(&outcome, invocation.messages, reporter)
}
