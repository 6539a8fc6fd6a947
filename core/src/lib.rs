//! Command-result protocol for the `spg` command-line tool.
//!
//! Each CLI command wraps one fallible call into an external engine. This
//! crate turns that call into exactly one printed status line and one exit
//! code:
//!
//! - [`CommandOutcome`] — the classified result (`Success`,
//!   `ValidationFailure`, `UnexpectedFailure`, `MissingFile`).
//! - [`ExitStatus`] — `0` for success or no-op, `1` for any failure.
//! - [`Reporter`] / [`ConsoleReporter`] — colored status output.
//! - [`execute`] — precondition check, invocation, classification and
//!   reporting in one call.
//!
//! # Example
//!
//! ```
//! use std::fmt;
//! use spg_core::*;
//!
//! #[derive(Debug)]
//! struct Never;
//! impl fmt::Display for Never {
//!     fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result { Ok(()) }
//! }
//! impl Classify for Never {
//!     fn is_validation(&self) -> bool { false }
//! }
//!
//! const MESSAGES: CommandMessages = CommandMessages {
//!     applied: "Schema is successfully committed.",
//!     unchanged: "There is no diff between local and server-side schema.",
//!     validation_failed: "Schema validation failed. Please fix the errors above and try again.",
//! };
//!
//! let mut lines: Vec<StatusLine> = Vec::new();
//! let status = execute(
//!     &Invocation::new("commit-schema", &MESSAGES),
//!     || Ok::<_, Never>(Change::from(true)),
//!     &mut lines,
//! );
//! assert_eq!(status.code(), 0);
//! assert!(lines[0].text.contains("successfully committed"));
//! ```

mod execute;
mod outcome;
mod report;

pub use execute::{Invocation, execute, finish, run};
pub use outcome::{Change, Classify, CommandMessages, CommandOutcome, ExitStatus};
pub use report::{ConsoleReporter, Reporter, StatusLine, Tone};
