//! Task domain model.
//!
//! # Responsibility
//! - Define the task record, its creation draft, and the status filter.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `name`/`description` are non-blank after trimming.
//! - `end_at` should not be earlier than `start_at`; creation flows
//!   constrain the pickers but the store does not enforce it.
//! - `project_id` is a soft reference: the referenced project may have
//!   been deleted, and `None` means unassigned.

use crate::model::project::ProjectId;
use crate::model::{require_non_blank, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a task.
pub type TaskId = Uuid;

/// Status restriction applied by the task list views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskFilter {
    All,
    /// Not yet completed.
    Open,
    /// Completed.
    Closed,
}

/// A unit of work with a time window and completion flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Stable global ID, assigned at creation.
    pub id: TaskId,
    pub name: String,
    pub description: String,
    /// Owning project, `None` when unassigned.
    pub project_id: Option<ProjectId>,
    /// Work window start, epoch milliseconds. Drives the "today" filter.
    pub start_at: i64,
    /// Work window end, epoch milliseconds.
    pub end_at: i64,
    pub completed: bool,
    /// Creation timestamp, epoch milliseconds. Drives year-windowed fetch
    /// and dashboard ordering.
    pub created_at: i64,
}

/// Creation input for a task, before an id or timestamp exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub name: String,
    pub description: String,
    pub project_id: Option<ProjectId>,
    pub start_at: i64,
    pub end_at: i64,
}

impl Task {
    /// Builds a persistable task from a draft.
    ///
    /// Assigns a fresh uuid, stamps `created_at`, and starts incomplete.
    pub fn from_draft(draft: TaskDraft, created_at_ms: i64) -> Result<Self, ValidationError> {
        require_non_blank(&draft.name, ValidationError::BlankName)?;
        require_non_blank(&draft.description, ValidationError::BlankDescription)?;

        Ok(Self {
            id: Uuid::new_v4(),
            name: draft.name,
            description: draft.description,
            project_id: draft.project_id,
            start_at: draft.start_at,
            end_at: draft.end_at,
            completed: false,
            created_at: created_at_ms,
        })
    }

    /// Re-checks the persistence invariants on an existing record.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_blank(&self.name, ValidationError::BlankName)?;
        require_non_blank(&self.description, ValidationError::BlankDescription)?;
        Ok(())
    }

    /// Whether this task matches the given status filter.
    pub fn matches_filter(&self, filter: TaskFilter) -> bool {
        match filter {
            TaskFilter::All => true,
            TaskFilter::Open => !self.completed,
            TaskFilter::Closed => self.completed,
        }
    }
}
