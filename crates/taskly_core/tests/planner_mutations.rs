use rusqlite::Connection;
use std::cell::RefCell;
use std::rc::Rc;
use taskly_core::db::open_db_in_memory;
use taskly_core::{
    AdsGateway, NoopAds, NoopBilling, PlannerError, PlannerObserver, PlannerService, Project,
    ProjectDraft, ProjectId, RecordKind, SqliteProjectRepository, SqliteSettingsRepository,
    SqliteTaskRepository, Task, TaskDraft, TaskFilter,
};
use uuid::Uuid;

const HOUR_MS: i64 = 60 * 60 * 1000;

type Planner<'conn> = PlannerService<
    SqliteProjectRepository<'conn>,
    SqliteTaskRepository<'conn>,
    SqliteSettingsRepository<'conn>,
>;

type EventLog = Rc<RefCell<Vec<String>>>;

struct LoggingAds {
    events: EventLog,
}

impl AdsGateway for LoggingAds {
    fn load(&self) {
        self.events.borrow_mut().push("ad_load".to_string());
    }

    fn show(&self) {
        self.events.borrow_mut().push("ad_show".to_string());
    }

    fn set_premium(&self, _premium: bool) {}
}

struct LoggingObserver {
    events: EventLog,
}

impl PlannerObserver for LoggingObserver {
    fn projects_changed(&self, projects: &[Project]) {
        self.events
            .borrow_mut()
            .push(format!("projects_changed:{}", projects.len()));
    }

    fn tasks_changed(&self, tasks: &[Task]) {
        self.events
            .borrow_mut()
            .push(format!("tasks_changed:{}", tasks.len()));
    }

    fn project_completed(&self, project_id: Option<&ProjectId>) {
        let group = project_id.map_or("unassigned".to_string(), ToString::to_string);
        self.events.borrow_mut().push(format!("celebrate:{group}"));
    }

    fn delete_hint_ready(&self) {
        self.events.borrow_mut().push("delete_hint".to_string());
    }
}

fn observed_planner<'a>(conn: &'a Connection, events: &EventLog) -> Planner<'a> {
    let mut planner = PlannerService::new(
        SqliteProjectRepository::new(conn),
        SqliteTaskRepository::new(conn),
        SqliteSettingsRepository::new(conn),
        Box::new(LoggingAds {
            events: events.clone(),
        }),
        Box::new(NoopBilling),
    )
    .unwrap();
    planner.add_observer(Box::new(LoggingObserver {
        events: events.clone(),
    }));
    planner
}

fn quiet_planner(conn: &Connection) -> Planner<'_> {
    PlannerService::new(
        SqliteProjectRepository::new(conn),
        SqliteTaskRepository::new(conn),
        SqliteSettingsRepository::new(conn),
        Box::new(NoopAds),
        Box::new(NoopBilling),
    )
    .unwrap()
}

fn project_draft(name: &str) -> ProjectDraft {
    ProjectDraft {
        name: name.to_string(),
        description: "mutation fixture".to_string(),
        background: None,
        due_date: None,
    }
}

fn task_draft(name: &str, project_id: Option<ProjectId>) -> TaskDraft {
    let now = taskly_core::calendar::now_ms();
    TaskDraft {
        name: name.to_string(),
        description: "mutation fixture".to_string(),
        project_id,
        start_at: now,
        end_at: now + HOUR_MS,
    }
}

#[test]
fn create_project_refreshes_snapshot_and_notifies() {
    let conn = open_db_in_memory().unwrap();
    let events: EventLog = Rc::new(RefCell::new(Vec::new()));
    let mut planner = observed_planner(&conn, &events);

    let id = planner.create_project(project_draft("Launch")).unwrap();
    assert_eq!(planner.projects().len(), 1);
    assert_eq!(planner.projects()[0].id, id);
    assert!(events
        .borrow()
        .contains(&"projects_changed:1".to_string()));
}

#[test]
fn first_task_save_fires_the_delete_hint_once() {
    let conn = open_db_in_memory().unwrap();
    let events: EventLog = Rc::new(RefCell::new(Vec::new()));
    let mut planner = observed_planner(&conn, &events);

    planner.create_task(task_draft("first", None)).unwrap();
    planner.create_task(task_draft("second", None)).unwrap();

    let hint_count = events
        .borrow()
        .iter()
        .filter(|event| *event == "delete_hint")
        .count();
    assert_eq!(hint_count, 1);
}

#[test]
fn delete_hint_flag_survives_restart() {
    let conn = open_db_in_memory().unwrap();
    {
        let mut planner = quiet_planner(&conn);
        planner.create_task(task_draft("first", None)).unwrap();
    }

    let events: EventLog = Rc::new(RefCell::new(Vec::new()));
    let mut planner = observed_planner(&conn, &events);
    planner.refresh_all().unwrap();
    planner.create_task(task_draft("later", None)).unwrap();
    assert!(!events.borrow().iter().any(|event| event == "delete_hint"));
}

#[test]
fn completing_the_last_open_task_celebrates_before_the_ad() {
    let conn = open_db_in_memory().unwrap();
    let events: EventLog = Rc::new(RefCell::new(Vec::new()));
    let mut planner = observed_planner(&conn, &events);

    let project_id = planner.create_project(project_draft("Party")).unwrap();
    let task_id = planner
        .create_task(task_draft("only", Some(project_id)))
        .unwrap();

    events.borrow_mut().clear();
    planner.toggle_task_completion(task_id).unwrap();

    let log = events.borrow();
    let celebrate_at = log
        .iter()
        .position(|event| event == &format!("celebrate:{project_id}"))
        .expect("celebration should fire");
    let show_at = log
        .iter()
        .position(|event| event == "ad_show")
        .expect("ad should show");
    assert!(celebrate_at < show_at);
}

#[test]
fn toggle_with_open_tasks_left_shows_the_ad_without_celebration() {
    let conn = open_db_in_memory().unwrap();
    let events: EventLog = Rc::new(RefCell::new(Vec::new()));
    let mut planner = observed_planner(&conn, &events);

    let project_id = planner.create_project(project_draft("Busy")).unwrap();
    let first = planner
        .create_task(task_draft("first", Some(project_id)))
        .unwrap();
    planner
        .create_task(task_draft("second", Some(project_id)))
        .unwrap();

    events.borrow_mut().clear();
    planner.toggle_task_completion(first).unwrap();

    let log = events.borrow();
    assert!(log.iter().any(|event| event == "ad_show"));
    assert!(!log.iter().any(|event| event.starts_with("celebrate")));
}

#[test]
fn completing_the_unassigned_group_celebrates_too() {
    let conn = open_db_in_memory().unwrap();
    let events: EventLog = Rc::new(RefCell::new(Vec::new()));
    let mut planner = observed_planner(&conn, &events);

    let task_id = planner.create_task(task_draft("loose", None)).unwrap();
    events.borrow_mut().clear();
    planner.toggle_task_completion(task_id).unwrap();

    assert!(events
        .borrow()
        .iter()
        .any(|event| event == "celebrate:unassigned"));
}

#[test]
fn toggle_flips_back_and_forth() {
    let conn = open_db_in_memory().unwrap();
    let mut planner = quiet_planner(&conn);

    let task_id = planner.create_task(task_draft("flip", None)).unwrap();
    planner.toggle_task_completion(task_id).unwrap();
    assert!(planner.tasks()[0].completed);

    planner.toggle_task_completion(task_id).unwrap();
    assert!(!planner.tasks()[0].completed);
}

#[test]
fn mutations_on_missing_records_report_not_found() {
    let conn = open_db_in_memory().unwrap();
    let mut planner = quiet_planner(&conn);
    let ghost = Uuid::new_v4();

    assert!(matches!(
        planner.toggle_task_completion(ghost).unwrap_err(),
        PlannerError::NotFound {
            kind: RecordKind::Task,
            id,
        } if id == ghost
    ));
    assert!(matches!(
        planner.delete_task(ghost, true).unwrap_err(),
        PlannerError::NotFound {
            kind: RecordKind::Task,
            id,
        } if id == ghost
    ));
    assert!(matches!(
        planner.delete_project(ghost).unwrap_err(),
        PlannerError::NotFound {
            kind: RecordKind::Project,
            id,
        } if id == ghost
    ));
}

#[test]
fn delete_task_without_refresh_defers_the_snapshot_update() {
    let conn = open_db_in_memory().unwrap();
    let mut planner = quiet_planner(&conn);

    let task_id = planner.create_task(task_draft("doomed", None)).unwrap();
    planner.delete_task(task_id, false).unwrap();
    assert_eq!(planner.tasks().len(), 1);

    planner.refresh_tasks().unwrap();
    assert!(planner.tasks().is_empty());
}

#[test]
fn delete_project_cascades_to_its_tasks() {
    let conn = open_db_in_memory().unwrap();
    let mut planner = quiet_planner(&conn);
    planner.set_premium(true).unwrap();

    let doomed = planner.create_project(project_draft("Doomed")).unwrap();
    let kept = planner.create_project(project_draft("Kept")).unwrap();
    for index in 0..4 {
        let id = planner
            .create_task(task_draft(&format!("member-{index}"), Some(doomed)))
            .unwrap();
        planner.toggle_task_completion(id).unwrap();
    }
    planner
        .create_task(task_draft("bystander", Some(kept)))
        .unwrap();

    planner.delete_project(doomed).unwrap();

    assert!(!planner.projects().iter().any(|project| project.id == doomed));
    assert!(planner
        .tasks()
        .iter()
        .all(|task| task.project_id != Some(doomed)));
    assert_eq!(
        planner
            .tasks_by_filter(TaskFilter::All, false, Some(&doomed))
            .len(),
        0
    );
    assert_eq!(planner.tasks().len(), 1);
    assert_eq!(planner.tasks()[0].name, "bystander");
}

#[test]
fn failed_write_leaves_the_snapshot_untouched() {
    let conn = open_db_in_memory().unwrap();
    let mut planner = quiet_planner(&conn);

    planner.create_task(task_draft("kept", None)).unwrap();
    assert_eq!(planner.tasks().len(), 1);

    conn.execute_batch("ALTER TABLE tasks RENAME TO tasks_gone;")
        .unwrap();
    let err = planner.create_task(task_draft("lost", None)).unwrap_err();
    assert!(matches!(err, PlannerError::Persistence(_)));
    assert_eq!(planner.tasks().len(), 1);
    assert_eq!(planner.tasks()[0].name, "kept");
}
