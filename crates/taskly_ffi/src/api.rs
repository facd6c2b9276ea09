//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level planner functions to Dart via FRB.
//! - Keep error semantics simple for UI integration: envelope responses,
//!   never exceptions.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Each call opens the store, replays migrations if needed, and builds a
//!   fresh planner; the Dart side owns long-lived UI state.

use std::path::PathBuf;
use std::sync::OnceLock;
use taskly_core::db::open_db;
use taskly_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    NoopAds, NoopBilling, PlannerService, Project, ProjectDraft, ProjectId, SqliteProjectRepository,
    SqliteSettingsRepository, SqliteTaskRepository, Task, TaskDraft, TaskFilter,
    UNAVAILABLE_MARKER,
};
use uuid::Uuid;

const PLANNER_DB_FILE_NAME: &str = "taskly_planner.sqlite3";
static PLANNER_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

type Planner<'conn> = PlannerService<
    SqliteProjectRepository<'conn>,
    SqliteTaskRepository<'conn>,
    SqliteSettingsRepository<'conn>,
>;

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Pins the planner database location for this process.
///
/// Input semantics:
/// - `db_dir`: absolute app-documents directory; the store file is created
///   inside it on first use.
///
/// # FFI contract
/// - Sync call; first caller wins.
/// - Repeat calls with the same directory are idempotent; a different
///   directory is rejected.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_init(db_dir: String) -> String {
    let trimmed = db_dir.trim();
    if trimmed.is_empty() {
        return "db_dir cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed).join(PLANNER_DB_FILE_NAME);
    let active = PLANNER_DB_PATH.get_or_init(|| requested.clone());
    if active != &requested {
        return format!(
            "planner already initialized at `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        );
    }
    log::info!(
        "event=planner_init module=ffi status=ok db_path={}",
        active.display()
    );
    String::new()
}

/// Generic action response envelope for planner mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Optional affected record ID.
    pub record_id: Option<String>,
    /// Human-readable response message for diagnostics/UI dialogs.
    pub message: String,
}

impl PlannerActionResponse {
    fn success(message: impl Into<String>, record_id: String) -> Self {
        Self {
            ok: true,
            record_id: Some(record_id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            record_id: None,
            message: message.into(),
        }
    }
}

/// Project item returned by the project list API.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectItem {
    pub project_id: String,
    pub name: String,
    pub description: String,
    pub background: String,
    pub due_date_ms: Option<i64>,
    pub created_at_ms: i64,
    /// Completion percentage over the project's tasks, `[0, 100]`.
    pub progress: f64,
}

/// Task item returned by the task list API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub task_id: String,
    pub name: String,
    pub description: String,
    pub project_id: Option<String>,
    pub start_at_ms: i64,
    pub end_at_ms: i64,
    pub completed: bool,
    pub created_at_ms: i64,
    /// Display string for the tile countdown (`3 days`, `- -`, ...).
    pub time_remaining: String,
    /// Distinguishes overdue from due-now behind the shared `- -` string.
    pub overdue: bool,
}

/// List response envelope for project queries.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectListResponse {
    pub items: Vec<ProjectItem>,
    pub message: String,
}

/// List response envelope for task queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListResponse {
    pub items: Vec<TaskItem>,
    pub message: String,
}

/// Lists all projects in the current-year view with progress.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_list_projects() -> ProjectListResponse {
    match with_planner(|planner| {
        let items = planner
            .projects()
            .iter()
            .map(|project| to_project_item(project, planner.progress(&project.id)))
            .collect::<Vec<_>>();
        Ok(items)
    }) {
        Ok(items) => {
            let message = format!("Found {} project(s).", items.len());
            ProjectListResponse { items, message }
        }
        Err(err) => ProjectListResponse {
            items: Vec::new(),
            message: format!("planner_list_projects failed: {err}"),
        },
    }
}

/// Lists tasks through the filter engine.
///
/// Input semantics:
/// - `filter`: one of `all|open|closed`.
/// - `today_only`: restrict to tasks starting on the current local day.
/// - `project_id`: optional project scope.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_list_tasks(
    filter: String,
    today_only: bool,
    project_id: Option<String>,
) -> TaskListResponse {
    let filter = match parse_filter(&filter) {
        Ok(filter) => filter,
        Err(message) => {
            return TaskListResponse {
                items: Vec::new(),
                message,
            }
        }
    };
    let scope = match project_id.map(|raw| parse_record_id(&raw)).transpose() {
        Ok(scope) => scope,
        Err(message) => {
            return TaskListResponse {
                items: Vec::new(),
                message,
            }
        }
    };

    match with_planner(|planner| {
        let items = planner
            .tasks_by_filter(filter, today_only, scope.as_ref())
            .iter()
            .map(|task| to_task_item(task, planner))
            .collect::<Vec<_>>();
        Ok(items)
    }) {
        Ok(items) => {
            let message = format!("Found {} task(s).", items.len());
            TaskListResponse { items, message }
        }
        Err(err) => TaskListResponse {
            items: Vec::new(),
            message: format!("planner_list_tasks failed: {err}"),
        },
    }
}

/// Creates a project from the add-project flow.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Quota/validation failures come back as `ok=false` with the dialog text.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_create_project(
    name: String,
    description: String,
    background: Option<String>,
    due_date_ms: Option<i64>,
) -> PlannerActionResponse {
    let draft = ProjectDraft {
        name,
        description,
        background,
        due_date: due_date_ms,
    };
    match with_planner(|planner| planner.create_project(draft)) {
        Ok(id) => PlannerActionResponse::success("Project created.", id.to_string()),
        Err(err) => PlannerActionResponse::failure(format!("planner_create_project failed: {err}")),
    }
}

/// Creates a task from the add-task overlay flow.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Quota/validation failures come back as `ok=false` with the dialog text.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_create_task(
    name: String,
    description: String,
    project_id: Option<String>,
    start_at_ms: i64,
    end_at_ms: i64,
) -> PlannerActionResponse {
    let project_id = match project_id.map(|raw| parse_record_id(&raw)).transpose() {
        Ok(id) => id,
        Err(message) => return PlannerActionResponse::failure(message),
    };
    let draft = TaskDraft {
        name,
        description,
        project_id,
        start_at: start_at_ms,
        end_at: end_at_ms,
    };
    match with_planner(|planner| planner.create_task(draft)) {
        Ok(id) => PlannerActionResponse::success("Task created.", id.to_string()),
        Err(err) => PlannerActionResponse::failure(format!("planner_create_task failed: {err}")),
    }
}

/// Flips a task's completion flag.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_toggle_task(task_id: String) -> PlannerActionResponse {
    let id = match parse_record_id(&task_id) {
        Ok(id) => id,
        Err(message) => return PlannerActionResponse::failure(message),
    };
    match with_planner(|planner| planner.toggle_task_completion(id).map(|()| id)) {
        Ok(id) => PlannerActionResponse::success("Task updated.", id.to_string()),
        Err(err) => PlannerActionResponse::failure(format!("planner_toggle_task failed: {err}")),
    }
}

/// Deletes one task (triple-tap flow).
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_delete_task(task_id: String) -> PlannerActionResponse {
    let id = match parse_record_id(&task_id) {
        Ok(id) => id,
        Err(message) => return PlannerActionResponse::failure(message),
    };
    match with_planner(|planner| planner.delete_task(id, true).map(|()| id)) {
        Ok(id) => PlannerActionResponse::success("Task deleted.", id.to_string()),
        Err(err) => PlannerActionResponse::failure(format!("planner_delete_task failed: {err}")),
    }
}

/// Deletes a project and every task assigned to it.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_delete_project(project_id: String) -> PlannerActionResponse {
    let id = match parse_record_id(&project_id) {
        Ok(id) => id,
        Err(message) => return PlannerActionResponse::failure(message),
    };
    match with_planner(|planner| planner.delete_project(id).map(|()| id)) {
        Ok(id) => PlannerActionResponse::success("Project deleted.", id.to_string()),
        Err(err) => PlannerActionResponse::failure(format!("planner_delete_project failed: {err}")),
    }
}

/// Persists the premium entitlement reported by the store layer.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_set_premium(premium: bool) -> PlannerActionResponse {
    match with_planner(|planner| planner.set_premium(premium).map(|()| premium)) {
        Ok(premium) => PlannerActionResponse {
            ok: true,
            record_id: None,
            message: format!("Premium set to {premium}."),
        },
        Err(err) => PlannerActionResponse::failure(format!("planner_set_premium failed: {err}")),
    }
}

/// Completion percentage for one project, in `[0, 100]`.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; invalid ids and store failures read as `0.0`.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_progress(project_id: String) -> f64 {
    let Ok(id) = parse_record_id(&project_id) else {
        return 0.0;
    };
    with_planner(|planner| Ok(planner.progress(&id))).unwrap_or(0.0)
}

/// Countdown display string for one task (`3 days`, `1 hour`, `- -`).
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; unknown tasks and store failures read as the
///   due-now/overdue marker. `TaskItem::overdue` carries the discriminant
///   for callers that need it.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_time_remaining(task_id: String) -> String {
    let Ok(id) = parse_record_id(&task_id) else {
        return UNAVAILABLE_MARKER.to_string();
    };
    with_planner(|planner| {
        Ok(planner
            .tasks()
            .iter()
            .find(|task| task.id == id)
            .map(|task| planner.time_remaining(task).to_string()))
    })
    .ok()
    .flatten()
    .unwrap_or_else(|| UNAVAILABLE_MARKER.to_string())
}

/// Reads the durable premium entitlement.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; store failures read as `false`.
#[flutter_rust_bridge::frb(sync)]
pub fn planner_is_premium() -> bool {
    with_planner(|planner| Ok(planner.is_premium())).unwrap_or(false)
}

fn to_project_item(project: &Project, progress: f64) -> ProjectItem {
    ProjectItem {
        project_id: project.id.to_string(),
        name: project.name.clone(),
        description: project.description.clone(),
        background: project.background.clone(),
        due_date_ms: project.due_date,
        created_at_ms: project.created_at,
        progress,
    }
}

fn to_task_item(task: &Task, planner: &Planner<'_>) -> TaskItem {
    let remaining = planner.time_remaining(task);
    TaskItem {
        task_id: task.id.to_string(),
        name: task.name.clone(),
        description: task.description.clone(),
        project_id: task.project_id.map(|id| id.to_string()),
        start_at_ms: task.start_at,
        end_at_ms: task.end_at,
        completed: task.completed,
        created_at_ms: task.created_at,
        time_remaining: remaining.to_string(),
        overdue: remaining.is_overdue(),
    }
}

fn parse_filter(raw: &str) -> Result<TaskFilter, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "all" => Ok(TaskFilter::All),
        "open" => Ok(TaskFilter::Open),
        "closed" => Ok(TaskFilter::Closed),
        other => Err(format!(
            "unsupported task filter `{other}`; expected all|open|closed"
        )),
    }
}

fn parse_record_id(raw: &str) -> Result<ProjectId, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("invalid record id `{raw}`"))
}

fn resolve_planner_db_path() -> PathBuf {
    PLANNER_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("TASKLY_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(PLANNER_DB_FILE_NAME)
        })
        .clone()
}

fn with_planner<R>(f: impl FnOnce(&mut Planner<'_>) -> taskly_core::PlannerResult<R>) -> Result<R, String> {
    let db_path = resolve_planner_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("planner DB open failed: {err}"))?;
    let mut planner = PlannerService::new(
        SqliteProjectRepository::new(&conn),
        SqliteTaskRepository::new(&conn),
        SqliteSettingsRepository::new(&conn),
        Box::new(NoopAds),
        Box::new(NoopBilling),
    )
    .map_err(|err| format!("planner init failed: {err}"))?;
    planner
        .refresh_all()
        .map_err(|err| format!("planner refresh failed: {err}"))?;
    f(&mut planner).map_err(|err| err.to_string())
}
