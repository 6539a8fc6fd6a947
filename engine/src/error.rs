//! Error types for engine invocations.

use spg_core::Classify;
use thiserror::Error;

/// Errors raised by the schema engine collaborators.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine rejected the input and has already printed its
    /// diagnostics.
    #[error("{0}")]
    Validation(String),

    /// The engine executable could not be started.
    #[error("failed to start engine `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The engine did not finish in time and was killed.
    #[error("engine `{program}` timed out after {secs}s")]
    Timeout { program: String, secs: u64 },

    /// The engine exited with a status outside its protocol.
    #[error("engine `{program}` exited with {}{}", describe_code(.code), describe_output(.output))]
    Exited {
        program: String,
        code: Option<i32>,
        output: String,
    },

    /// I/O failure while talking to the engine process.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

fn describe_code(code: &Option<i32>) -> String {
    match *code {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_string(),
    }
}

fn describe_output(output: &str) -> String {
    if output.is_empty() {
        String::new()
    } else {
        format!(": {output}")
    }
}

impl EngineError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl Classify for EngineError {
    fn is_validation(&self) -> bool {
        EngineError::is_validation(self)
    }
}

/// Convenience alias for results with [`EngineError`].
pub type Result<T> = std::result::Result<T, EngineError>;
