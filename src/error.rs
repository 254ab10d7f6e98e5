use std::path::PathBuf;

use crate::config::ConfigError;

/// Errors that can occur while preparing or running a Brainfuck program.
///
/// Bracket errors carry the index into the *sanitized* program, since that is
/// the only instruction stream the engine ever sees.
#[derive(Debug, thiserror::Error)]
pub enum BrainfuckError {
    /// A `[` was still open when the scan reached the end of the program.
    #[error("Invalid syntax: missing closing brace for '[' at instruction {ip}")]
    UnmatchedOpenBrace { ip: usize },

    /// A `]` was found while no `[` was open.
    #[error("Invalid syntax: missing opening brace for ']' at instruction {ip}")]
    UnmatchedCloseBrace { ip: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// The interactive console read backing `,` failed.
    #[error("I/O error at instruction {ip}: {source}")]
    IoError {
        ip: usize,
        #[source]
        source: std::io::Error,
    },

    /// Writing the captured output to its destination failed.
    #[error("Failed to write output to {}: {source}", path.display())]
    OutputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Execution aborted due to step limit.
    #[error("Execution aborted: step limit exceeded ({limit})")]
    StepLimitExceeded { limit: u64 },

    /// Execution aborted due to cooperative cancellation (e.g., timeout)
    #[error("Execution aborted: cancelled")]
    Canceled,
}

impl BrainfuckError {
    /// Instruction index the error points at, when it has one.
    pub fn ip(&self) -> Option<usize> {
        match self {
            BrainfuckError::UnmatchedOpenBrace { ip }
            | BrainfuckError::UnmatchedCloseBrace { ip }
            | BrainfuckError::IoError { ip, .. } => Some(*ip),
            _ => None,
        }
    }

    /// True for errors found before the first instruction executes.
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            BrainfuckError::UnmatchedOpenBrace { .. } | BrainfuckError::UnmatchedCloseBrace { .. }
        )
    }
}
