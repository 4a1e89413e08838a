//! CLI-level error type.
//!
//! Kept as a small hand-rolled enum with manual `Display`/`Error` impls --
//! the teacher's dependency table carries neither `anyhow` nor `thiserror`,
//! and the handful of fatal-abort cases this CLI has don't need more than
//! that.

use std::fmt;
use std::io;

use crate::dimacs::DimacsError;

#[derive(Debug)]
pub enum CliError {
    Open { path: String, source: io::Error },
    Parse(DimacsError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Open { path, source } => {
                write!(f, "could not open '{}': {}", path, source)
            }
            CliError::Parse(e) => write!(f, "malformed DIMACS input: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Open { source, .. } => Some(source),
            CliError::Parse(e) => Some(e),
        }
    }
}

impl From<DimacsError> for CliError {
    fn from(e: DimacsError) -> Self {
        CliError::Parse(e)
    }
}
