//! Core domain logic for Taskly.
//! This crate is the single source of truth for planner business invariants.

pub mod avatar;
pub mod calendar;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use calendar::{time_remaining, TimeRemaining, TimeWindow, UNAVAILABLE_MARKER};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::project::{Project, ProjectDraft, ProjectId};
pub use model::task::{Task, TaskDraft, TaskFilter, TaskId};
pub use model::ValidationError;
pub use repo::project_repo::{ProjectRepository, SqliteProjectRepository};
pub use repo::settings_repo::{SettingsRepository, SqliteSettingsRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use repo::{RepoError, RepoResult};
pub use service::gateway::{AdsGateway, BillingGateway, NoopAds, NoopBilling, PurchaseOutcome};
pub use service::observer::PlannerObserver;
pub use service::planner::{
    PlannerError, PlannerResult, PlannerService, QuotaResource, RecordKind,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
