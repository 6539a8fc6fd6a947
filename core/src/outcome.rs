//! Command outcomes and the exit codes derived from them.
//!
//! Every invocation of an external operation is reduced to exactly one
//! [`CommandOutcome`]. The outcome decides both the process exit code
//! ([`ExitStatus`]) and the single [`StatusLine`] shown to the user.
//!
//! # Examples
//!
//! ```
//! use spg_core::{Change, CommandMessages, CommandOutcome, ExitStatus, Tone};
//!
//! let messages = CommandMessages {
//!     applied: "Done.",
//!     unchanged: "Nothing to do.",
//!     validation_failed: "Fix the errors above.",
//! };
//!
//! let outcome = CommandOutcome::Success(Change::Unchanged);
//! assert_eq!(outcome.exit_status(), ExitStatus::Success);
//! assert_eq!(outcome.status_line(&messages).tone, Tone::Neutral);
//! ```

use std::fmt;
use std::path::PathBuf;

use crate::report::{StatusLine, Tone};

/// Result of a successful operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// The operation changed remote or local state.
    Applied,
    /// The operation ran but there was nothing to change.
    Unchanged,
}

impl From<bool> for Change {
    /// `true` means the operation reported that it altered something.
    fn from(altered: bool) -> Self {
        if altered {
            Self::Applied
        } else {
            Self::Unchanged
        }
    }
}

/// Errors an operation can fail with, as seen by the executor.
///
/// Validation-class errors are expected: the callee has already shown the
/// detailed diagnostics, so only a short summary is printed. Anything else
/// is unexpected and its `Display` text is shown to the user.
pub trait Classify: fmt::Display {
    /// Returns `true` if the error is a user-input problem that the callee
    /// has already diagnosed.
    fn is_validation(&self) -> bool;
}

/// Per-command wording for the outcomes that differ between commands.
///
/// Missing-file and unexpected-failure wording is shared by all commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandMessages {
    /// Shown when the operation applied a change.
    pub applied: &'static str,
    /// Shown when the operation found nothing to change.
    pub unchanged: &'static str,
    /// Summary shown after the callee reported validation errors.
    pub validation_failed: &'static str,
}

/// Classified result of one command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The operation completed.
    Success(Change),
    /// The callee rejected the input and already printed why.
    ///
    /// `message` is the error's own text. It is logged, never printed.
    ValidationFailure { message: String },
    /// Any other failure. `message` is printed to the user.
    UnexpectedFailure { message: String },
    /// A required input file did not exist, so the operation never ran.
    MissingFile { path: PathBuf },
}

impl CommandOutcome {
    /// Maps an operation result onto an outcome.
    pub fn classify<E: Classify>(result: Result<Change, E>) -> Self {
        match result {
            Ok(change) => Self::Success(change),
            Err(err) if err.is_validation() => Self::ValidationFailure {
                message: err.to_string(),
            },
            Err(err) => Self::UnexpectedFailure {
                message: err.to_string(),
            },
        }
    }

    /// Builds an unexpected failure from any displayable error.
    pub fn unexpected(err: impl fmt::Display) -> Self {
        Self::UnexpectedFailure {
            message: err.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn exit_status(&self) -> ExitStatus {
        if self.is_success() {
            ExitStatus::Success
        } else {
            ExitStatus::Failure
        }
    }

    /// Renders the single line printed for this outcome.
    pub fn status_line(&self, messages: &CommandMessages) -> StatusLine {
        match self {
            Self::Success(Change::Applied) => StatusLine::new(Tone::Success, messages.applied),
            Self::Success(Change::Unchanged) => StatusLine::new(Tone::Neutral, messages.unchanged),
            Self::ValidationFailure { .. } => {
                StatusLine::new(Tone::Failure, messages.validation_failed)
            }
            Self::UnexpectedFailure { message } => StatusLine::new(
                Tone::Failure,
                format!("An unexpected error occurred: {message}"),
            ),
            Self::MissingFile { path } => StatusLine::new(
                Tone::Failure,
                format!("ERROR: File {} not exists.", path.display()),
            ),
        }
    }
}

/// Process exit status derived from a [`CommandOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Exit code 0: the operation succeeded or had nothing to do.
    Success,
    /// Exit code 1: any failure.
    Failure,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
        }
    }
}

impl From<ExitStatus> for i32 {
    fn from(status: ExitStatus) -> Self {
        i32::from(status.code())
    }
}

impl From<ExitStatus> for std::process::ExitCode {
    fn from(status: ExitStatus) -> Self {
        std::process::ExitCode::from(status.code())
    }
}
