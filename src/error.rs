//! Error taxonomy for trail record I/O, checking, and enumeration.
//!
//! Mirrors the plain-enum + manual `Display`/`Error` style used throughout
//! this codebase (see `kernel_interop::KernelInteropError`) rather than
//! pulling in a helper crate for what is a handful of variants.

use std::fmt;

/// Failure modes surfaced by the trail record loader, checker, and
/// orchestrators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrailError {
    /// A trail record could not be parsed; `context` carries enough of the
    /// surrounding text to locate the bad line without re-reading the file.
    MalformedRecord { context: String },
    /// A loaded trail core failed one of the structural invariants checked
    /// by [`crate::trail::TrailCore::check`].
    InvariantViolation { round: usize, detail: String },
    /// Propagated I/O failure from the append-only trail stream.
    Io(String),
}

impl fmt::Display for TrailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrailError::MalformedRecord { context } => {
                write!(f, "malformed trail record near: {context}")
            }
            TrailError::InvariantViolation { round, detail } => {
                write!(f, "invariant violation at round {round}: {detail}")
            }
            TrailError::Io(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl std::error::Error for TrailError {}

impl From<std::io::Error> for TrailError {
    fn from(e: std::io::Error) -> Self {
        TrailError::Io(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TrailError>;
