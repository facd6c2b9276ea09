//! Domain models for the planner.
//!
//! # Responsibility
//! - Define canonical project/task records used by core business logic.
//! - Enforce the shared text validation rule before persistence.
//!
//! # Invariants
//! - Every record is identified by a stable uuid.
//! - `name` and `description` are non-blank after trimming whitespace.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod project;
pub mod task;

/// Validation failure for user-entered record fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// `name` is empty after trimming whitespace.
    BlankName,
    /// `description` is empty after trimming whitespace.
    BlankDescription,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "name must not be blank"),
            Self::BlankDescription => write!(f, "description must not be blank"),
        }
    }
}

impl Error for ValidationError {}

/// Checks the shared non-blank rule for a required text field.
pub(crate) fn require_non_blank(
    value: &str,
    blank_error: ValidationError,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(blank_error)
    } else {
        Ok(())
    }
}
