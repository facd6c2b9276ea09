//! Planner change notifications.
//!
//! # Responsibility
//! - Define the pub-sub seam the presentation layer subscribes to instead
//!   of watching planner state implicitly.
//!
//! # Invariants
//! - Snapshots handed to observers are immutable views; observers must not
//!   assume they stay valid past the callback.
//! - All hooks default to no-ops so observers implement only what they use.

use crate::model::project::{Project, ProjectId};
use crate::model::task::Task;

/// Subscriber interface for planner state changes and one-shot UI cues.
pub trait PlannerObserver {
    /// The project snapshot was fully replaced after a fetch.
    fn projects_changed(&self, _projects: &[Project]) {}

    /// The task snapshot was fully replaced after a fetch.
    fn tasks_changed(&self, _tasks: &[Task]) {}

    /// Every task in the given project group is now complete. Fired before
    /// any monetization side effect. `None` is the unassigned group.
    fn project_completed(&self, _project_id: Option<&ProjectId>) {}

    /// The one-time "triple tap deletes a task" hint should be shown.
    fn delete_hint_ready(&self) {}
}
