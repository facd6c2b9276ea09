//! Planner use-case service.
//!
//! # Responsibility
//! - Own the in-memory project/task snapshots mirrored from the store.
//! - Provide the query/filter engine, quota-gated mutations, cascade
//!   delete, and progress aggregation.
//! - Drive the injected monetization collaborators in the documented order.
//!
//! # Invariants
//! - Snapshots are fully replaced on refetch, never patched in place.
//! - Mutations persist first; snapshots change only after a successful
//!   refetch, so a failed write leaves the visible state untouched.
//! - Celebration fires before the monetization side effect when a toggle
//!   completes the last open task of its project group.

use crate::calendar::{self, TimeRemaining, TimeWindow};
use crate::config;
use crate::model::project::{Project, ProjectDraft, ProjectId};
use crate::model::task::{Task, TaskDraft, TaskFilter, TaskId};
use crate::model::ValidationError;
use crate::repo::project_repo::ProjectRepository;
use crate::repo::settings_repo::SettingsRepository;
use crate::repo::task_repo::TaskRepository;
use crate::repo::RepoError;
use crate::service::gateway::{AdsGateway, BillingGateway, PurchaseOutcome};
use crate::service::observer::PlannerObserver;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type PlannerResult<T> = Result<T, PlannerError>;

/// Free-tier resource whose quota was exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaResource {
    Projects,
    Tasks,
}

impl Display for QuotaResource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Projects => write!(f, "projects"),
            Self::Tasks => write!(f, "tasks"),
        }
    }
}

/// Record kind named by `PlannerError::NotFound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Project,
    Task,
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Project => write!(f, "project"),
            Self::Task => write!(f, "task"),
        }
    }
}

/// Planner-level error taxonomy.
///
/// Every user action terminates on the first error; there are no automatic
/// retries, and failed writes leave snapshots unchanged.
#[derive(Debug)]
pub enum PlannerError {
    /// Required text field blank after trimming. Nothing was mutated.
    Validation(ValidationError),
    /// Free-tier limit reached; the action requires premium.
    Quota {
        resource: QuotaResource,
        limit: usize,
    },
    /// Mutation target no longer exists.
    NotFound { kind: RecordKind, id: Uuid },
    /// Underlying store read/write failed.
    Persistence(RepoError),
}

impl Display for PlannerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Quota { resource, limit } => write!(
                f,
                "free tier allows at most {limit} {resource}; upgrade to premium for more"
            ),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PlannerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persistence(err) => Some(err),
            Self::Quota { .. } | Self::NotFound { .. } => None,
        }
    }
}

impl From<ValidationError> for PlannerError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for PlannerError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Persistence(other),
        }
    }
}

/// Use-case service owning the store mirror and all planner operations.
///
/// Single logical thread of control: callers invoke synchronously, and only
/// the owning thread touches the snapshots.
pub struct PlannerService<P, T, S>
where
    P: ProjectRepository,
    T: TaskRepository,
    S: SettingsRepository,
{
    project_repo: P,
    task_repo: T,
    settings: S,
    ads: Box<dyn AdsGateway>,
    billing: Box<dyn BillingGateway>,
    observers: Vec<Box<dyn PlannerObserver>>,
    projects: Vec<Project>,
    tasks: Vec<Task>,
    premium: bool,
    delete_hint_shown: bool,
}

impl<P, T, S> PlannerService<P, T, S>
where
    P: ProjectRepository,
    T: TaskRepository,
    S: SettingsRepository,
{
    /// Creates a planner over the given repositories and collaborators.
    ///
    /// Reads the durable flags and forwards premium state to the ads
    /// gateway. Snapshots start empty; call [`Self::refresh_all`] to load.
    pub fn new(
        project_repo: P,
        task_repo: T,
        settings: S,
        ads: Box<dyn AdsGateway>,
        billing: Box<dyn BillingGateway>,
    ) -> PlannerResult<Self> {
        let premium = settings.flag(config::SETTING_PREMIUM_USER)?;
        let delete_hint_shown = settings.flag(config::SETTING_DELETE_HINT_SHOWN)?;
        ads.set_premium(premium);

        Ok(Self {
            project_repo,
            task_repo,
            settings,
            ads,
            billing,
            observers: Vec::new(),
            projects: Vec::new(),
            tasks: Vec::new(),
            premium,
            delete_hint_shown,
        })
    }

    /// Subscribes an observer to snapshot changes and one-shot cues.
    pub fn add_observer(&mut self, observer: Box<dyn PlannerObserver>) {
        self.observers.push(observer);
    }

    /// Current immutable project snapshot.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Current immutable task snapshot, newest created first.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Current premium entitlement.
    pub fn is_premium(&self) -> bool {
        self.premium
    }

    /// Reloads both snapshots from the store.
    pub fn refresh_all(&mut self) -> PlannerResult<()> {
        self.refresh_tasks()?;
        self.refresh_projects()
    }

    /// Reloads the project snapshot from the current-year window.
    pub fn refresh_projects(&mut self) -> PlannerResult<()> {
        self.ads.load();
        let window = TimeWindow::current_year();
        self.projects = self.project_repo.list_projects_in_window(&window)?;
        for observer in &self.observers {
            observer.projects_changed(&self.projects);
        }
        Ok(())
    }

    /// Reloads the task snapshot from the current-year window.
    pub fn refresh_tasks(&mut self) -> PlannerResult<()> {
        self.ads.load();
        let window = TimeWindow::current_year();
        self.tasks = self.task_repo.list_tasks_in_window(&window)?;
        for observer in &self.observers {
            observer.tasks_changed(&self.tasks);
        }
        Ok(())
    }

    /// Derives a filtered task view without mutating the snapshot.
    ///
    /// # Contract
    /// - `project_id` restricts to tasks assigned to that project.
    /// - `today_only` restricts to tasks starting on the current local
    ///   calendar day and preserves snapshot order (newest first).
    /// - Project listings (`today_only == false`) sort ascending by
    ///   `end_at`, nearest deadline first.
    /// - For any fixed `today_only`/`project_id`, the `Open` and `Closed`
    ///   views partition the `All` view.
    pub fn tasks_by_filter(
        &self,
        filter: TaskFilter,
        today_only: bool,
        project_id: Option<&ProjectId>,
    ) -> Vec<Task> {
        let now = calendar::now_ms();
        let mut filtered: Vec<Task> = self
            .tasks
            .iter()
            .filter(|task| project_id.is_none_or(|id| task.project_id.as_ref() == Some(id)))
            .filter(|task| !today_only || calendar::is_same_local_day(task.start_at, now))
            .filter(|task| task.matches_filter(filter))
            .cloned()
            .collect();

        if !today_only {
            filtered.sort_by(|a, b| a.end_at.cmp(&b.end_at).then(a.id.cmp(&b.id)));
        }

        filtered
    }

    /// Project a task is assigned to, if it still exists.
    pub fn project_for_task(&self, task: &Task) -> Option<&Project> {
        let project_id = task.project_id?;
        self.projects.iter().find(|project| project.id == project_id)
    }

    /// Remaining time until the task deadline, anchored at
    /// `max(start_at, now)`.
    pub fn time_remaining(&self, task: &Task) -> TimeRemaining {
        calendar::time_remaining(task.start_at, task.end_at, calendar::now_ms())
    }

    /// Completion percentage for a project, in `[0, 100]`.
    ///
    /// A project with no tasks reports `0.0` rather than the original's
    /// silent NaN.
    pub fn progress(&self, project_id: &ProjectId) -> f64 {
        let mut total = 0usize;
        let mut completed = 0usize;
        for task in &self.tasks {
            if task.project_id.as_ref() == Some(project_id) {
                total += 1;
                if task.completed {
                    completed += 1;
                }
            }
        }

        if total == 0 {
            return 0.0;
        }
        completed as f64 / total as f64 * 100.0
    }

    /// Creates a project from a draft.
    ///
    /// # Contract
    /// - Free tier is capped at [`config::FREE_PROJECTS_COUNT`] projects.
    /// - Blank name/description abort before anything is persisted.
    /// - On success the project snapshot is refetched and observers fire.
    pub fn create_project(&mut self, draft: ProjectDraft) -> PlannerResult<ProjectId> {
        if !self.premium && self.projects.len() >= config::FREE_PROJECTS_COUNT {
            return Err(PlannerError::Quota {
                resource: QuotaResource::Projects,
                limit: config::FREE_PROJECTS_COUNT,
            });
        }

        let project = Project::from_draft(draft, calendar::now_ms())?;
        self.project_repo.create_project(&project)?;
        info!(
            "event=project_create module=planner status=ok project_id={}",
            project.id
        );
        self.refresh_projects()?;
        Ok(project.id)
    }

    /// Creates a task from a draft.
    ///
    /// # Contract
    /// - Free tier is capped at [`config::FREE_TASKS_COUNT`] tasks.
    /// - Blank name/description abort before anything is persisted.
    /// - On success the task snapshot is refetched and observers fire.
    /// - The first successful save ever marks the durable delete-hint flag
    ///   and fires `delete_hint_ready` exactly once.
    pub fn create_task(&mut self, draft: TaskDraft) -> PlannerResult<TaskId> {
        if !self.premium && self.tasks.len() >= config::FREE_TASKS_COUNT {
            return Err(PlannerError::Quota {
                resource: QuotaResource::Tasks,
                limit: config::FREE_TASKS_COUNT,
            });
        }

        let task = Task::from_draft(draft, calendar::now_ms())?;
        self.task_repo.create_task(&task)?;
        info!(
            "event=task_create module=planner status=ok task_id={}",
            task.id
        );
        self.refresh_tasks()?;

        if !self.delete_hint_shown {
            self.settings
                .set_flag(config::SETTING_DELETE_HINT_SHOWN, true)?;
            self.delete_hint_shown = true;
            for observer in &self.observers {
                observer.delete_hint_ready();
            }
        }

        Ok(task.id)
    }

    /// Flips a task's completion flag.
    ///
    /// # Contract
    /// - Persists, then refetches the task snapshot.
    /// - When the toggled task's project group has no open tasks left,
    ///   `project_completed` fires before the ad shows; otherwise the ad
    ///   shows immediately. The ordering is a business rule.
    pub fn toggle_task_completion(&mut self, id: TaskId) -> PlannerResult<()> {
        let mut task = match self.task_repo.get_task(id)? {
            Some(task) => task,
            None => {
                return Err(PlannerError::NotFound {
                    kind: RecordKind::Task,
                    id,
                })
            }
        };

        task.completed = !task.completed;
        self.task_repo.update_task(&task).map_err(|err| match err {
            RepoError::NotFound(id) => PlannerError::NotFound {
                kind: RecordKind::Task,
                id,
            },
            other => other.into(),
        })?;
        self.refresh_tasks()?;

        let open_in_group = self
            .tasks
            .iter()
            .filter(|candidate| candidate.project_id == task.project_id && !candidate.completed)
            .count();
        if open_in_group == 0 {
            info!(
                "event=task_toggle module=planner status=ok task_id={} group_complete=true",
                task.id
            );
            for observer in &self.observers {
                observer.project_completed(task.project_id.as_ref());
            }
        }
        self.ads.show();

        Ok(())
    }

    /// Removes one task.
    ///
    /// Cascade loops pass `refresh = false` and refetch once at the end.
    pub fn delete_task(&mut self, id: TaskId, refresh: bool) -> PlannerResult<()> {
        self.task_repo.delete_task(id).map_err(|err| match err {
            RepoError::NotFound(id) => PlannerError::NotFound {
                kind: RecordKind::Task,
                id,
            },
            other => other.into(),
        })?;
        info!("event=task_delete module=planner status=ok task_id={id}");

        if refresh {
            self.refresh_tasks()?;
        }
        Ok(())
    }

    /// Removes a project and every task assigned to it.
    ///
    /// # Contract
    /// - Project row first, then its tasks, then one refetch of each
    ///   snapshot. Not transactional: a crash mid-cascade can orphan task
    ///   rows, and the final refetch is what reconciles the views.
    /// - Tasks already gone by cascade time are skipped.
    pub fn delete_project(&mut self, id: ProjectId) -> PlannerResult<()> {
        self.project_repo
            .delete_project(id)
            .map_err(|err| match err {
                RepoError::NotFound(id) => PlannerError::NotFound {
                    kind: RecordKind::Project,
                    id,
                },
                other => other.into(),
            })?;

        let orphaned: Vec<TaskId> = self
            .tasks
            .iter()
            .filter(|task| task.project_id == Some(id))
            .map(|task| task.id)
            .collect();
        let cascade_count = orphaned.len();
        for task_id in orphaned {
            match self.delete_task(task_id, false) {
                Ok(()) | Err(PlannerError::NotFound { .. }) => {}
                Err(err) => return Err(err),
            }
        }
        info!(
            "event=project_delete module=planner status=ok project_id={id} cascade_tasks={cascade_count}"
        );

        self.refresh_tasks()?;
        self.refresh_projects()
    }

    /// Persists the premium entitlement and forwards it to the ads gateway.
    pub fn set_premium(&mut self, premium: bool) -> PlannerResult<()> {
        self.settings.set_flag(config::SETTING_PREMIUM_USER, premium)?;
        self.premium = premium;
        self.ads.set_premium(premium);
        info!("event=premium_change module=planner status=ok premium={premium}");
        Ok(())
    }

    /// Starts a premium purchase; flips the entitlement on success.
    pub fn purchase_premium(&mut self) -> PlannerResult<PurchaseOutcome> {
        let outcome = self.billing.purchase(config::PREMIUM_PRODUCT_ID);
        self.apply_purchase_outcome(outcome)?;
        Ok(outcome)
    }

    /// Restores prior purchases; flips the entitlement when one exists.
    pub fn restore_purchases(&mut self) -> PlannerResult<PurchaseOutcome> {
        let outcome = self.billing.restore();
        self.apply_purchase_outcome(outcome)?;
        Ok(outcome)
    }

    fn apply_purchase_outcome(&mut self, outcome: PurchaseOutcome) -> PlannerResult<()> {
        match outcome {
            PurchaseOutcome::Purchased | PurchaseOutcome::Restored => self.set_premium(true),
            PurchaseOutcome::Failed => {
                warn!("event=premium_change module=planner status=error error_code=purchase_failed");
                Ok(())
            }
        }
    }
}
