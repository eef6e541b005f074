//! Error type shared by the generators.
//!
//! The core sequence and tiling algorithms are infallible; errors only surface
//! for malformed caller input (too few coordinates, zero-area sampling regions,
//! unparseable method or extent strings).

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum GenError {
    InvalidInput { reason: String },
    Degenerate { reason: String },
}

impl GenError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn degenerate(reason: impl Into<String>) -> Self {
        Self::Degenerate {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for GenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput { reason } => write!(f, "invalid input: {reason}"),
            Self::Degenerate { reason } => write!(f, "degenerate input: {reason}"),
        }
    }
}

impl std::error::Error for GenError {}
