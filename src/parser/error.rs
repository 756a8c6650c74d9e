use std::path::PathBuf;

use thiserror::Error;

use crate::reconstruct::InvalidTreeEncoding;

/// A line that cannot be split into the expected integer tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedLineError {
    #[error("token {token:?} at position {position} is not an integer")]
    NotAnInteger { position: usize, token: String },
    #[error("expected {expected} label tokens, found {found}")]
    TokenCount { expected: usize, found: usize },
}

/// Errors raised while reading a batch of encoded trees.
///
/// Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("line {line}: malformed line")]
    MalformedLine {
        line: usize,
        #[source]
        source: MalformedLineError,
    },

    #[error("line {line}: invalid tree encoding")]
    InvalidTree {
        line: usize,
        #[source]
        source: InvalidTreeEncoding,
    },

    #[error("{left} has {left_lines} lines but {right} has {right_lines}")]
    LineCountMismatch {
        left: String,
        left_lines: usize,
        right: String,
        right_lines: usize,
    },

    #[error("line {line}: score {token:?} is not a number")]
    MalformedScore { line: usize, token: String },

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReadError {
    /// The 1-based line the error refers to, if it is line specific.
    pub fn line(&self) -> Option<usize> {
        match self {
            ReadError::MalformedLine { line, .. }
            | ReadError::InvalidTree { line, .. }
            | ReadError::MalformedScore { line, .. } => Some(*line),
            ReadError::LineCountMismatch { .. } | ReadError::Io { .. } => None,
        }
    }
}
