//! Project domain model.
//!
//! # Responsibility
//! - Define the project record and its creation draft.
//! - Validate user-entered fields before persistence.
//!
//! # Invariants
//! - `id` is stable and never reused for another project.
//! - `name`/`description` are non-blank after trimming.
//! - `background` names an entry of the fixed palette; persistence stores
//!   the name verbatim and does not re-check membership.

use crate::config;
use crate::model::{require_non_blank, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a project.
pub type ProjectId = Uuid;

/// A user-defined container for related tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Stable global ID, assigned at creation.
    pub id: ProjectId,
    pub name: String,
    pub description: String,
    /// Background asset name from the fixed palette.
    pub background: String,
    /// Optional deadline, epoch milliseconds.
    pub due_date: Option<i64>,
    /// Creation timestamp, epoch milliseconds. Drives year-windowed fetch.
    pub created_at: i64,
}

/// Creation input for a project, before an id or timestamp exists.
///
/// Draft state (and its reset after the exit animation) is a UI concern;
/// core only consumes the finished draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
    /// Palette name; `None` falls back to the first palette entry.
    pub background: Option<String>,
    pub due_date: Option<i64>,
}

impl Project {
    /// Builds a persistable project from a draft.
    ///
    /// Assigns a fresh uuid and stamps `created_at`.
    pub fn from_draft(draft: ProjectDraft, created_at_ms: i64) -> Result<Self, ValidationError> {
        require_non_blank(&draft.name, ValidationError::BlankName)?;
        require_non_blank(&draft.description, ValidationError::BlankDescription)?;

        Ok(Self {
            id: Uuid::new_v4(),
            name: draft.name,
            description: draft.description,
            background: draft
                .background
                .unwrap_or_else(|| config::default_background().to_string()),
            due_date: draft.due_date,
            created_at: created_at_ms,
        })
    }

    /// Re-checks the persistence invariants on an existing record.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank(&self.name, ValidationError::BlankName)?;
        require_non_blank(&self.description, ValidationError::BlankDescription)?;
        Ok(())
    }
}
