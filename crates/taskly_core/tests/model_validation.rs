use taskly_core::{
    config, Project, ProjectDraft, Task, TaskDraft, TaskFilter, ValidationError,
};
use uuid::Uuid;

fn valid_project_draft() -> ProjectDraft {
    ProjectDraft {
        name: "Side Project".to_string(),
        description: "Something worth shipping".to_string(),
        background: None,
        due_date: None,
    }
}

fn valid_task_draft() -> TaskDraft {
    TaskDraft {
        name: "Write tests".to_string(),
        description: "Cover the model layer".to_string(),
        project_id: None,
        start_at: 1_700_000_000_000,
        end_at: 1_700_003_600_000,
    }
}

#[test]
fn project_draft_gets_id_timestamp_and_default_background() {
    let project = Project::from_draft(valid_project_draft(), 1_700_000_000_000).unwrap();
    assert!(!project.id.is_nil());
    assert_eq!(project.created_at, 1_700_000_000_000);
    assert_eq!(project.background, config::PROJECT_BACKGROUNDS[0]);
    assert_eq!(project.due_date, None);
}

#[test]
fn project_draft_keeps_an_explicit_background() {
    let mut draft = valid_project_draft();
    draft.background = Some("sunset-sky".to_string());
    let project = Project::from_draft(draft, 0).unwrap();
    assert_eq!(project.background, "sunset-sky");
}

#[test]
fn whitespace_only_fields_are_blank() {
    let mut draft = valid_project_draft();
    draft.name = " \t\n".to_string();
    assert_eq!(
        Project::from_draft(draft, 0).unwrap_err(),
        ValidationError::BlankName
    );

    let mut draft = valid_task_draft();
    draft.description = "   ".to_string();
    assert_eq!(
        Task::from_draft(draft, 0).unwrap_err(),
        ValidationError::BlankDescription
    );
}

#[test]
fn new_tasks_start_incomplete() {
    let task = Task::from_draft(valid_task_draft(), 42).unwrap();
    assert!(!task.completed);
    assert_eq!(task.created_at, 42);
    assert_eq!(task.project_id, None);
}

#[test]
fn filter_matching_follows_completion() {
    let mut task = Task::from_draft(valid_task_draft(), 0).unwrap();
    assert!(task.matches_filter(TaskFilter::All));
    assert!(task.matches_filter(TaskFilter::Open));
    assert!(!task.matches_filter(TaskFilter::Closed));

    task.completed = true;
    assert!(task.matches_filter(TaskFilter::All));
    assert!(!task.matches_filter(TaskFilter::Open));
    assert!(task.matches_filter(TaskFilter::Closed));
}

#[test]
fn models_serialize_with_snake_case_fields() {
    let project = Project {
        id: Uuid::nil(),
        name: "Serialized".to_string(),
        description: "json shape".to_string(),
        background: "blue-moon".to_string(),
        due_date: Some(1),
        created_at: 2,
    };
    let json = serde_json::to_value(&project).unwrap();
    assert_eq!(json["background"], "blue-moon");
    assert_eq!(json["due_date"], 1);
    assert_eq!(json["created_at"], 2);

    let filter_json = serde_json::to_string(&TaskFilter::Open).unwrap();
    assert_eq!(filter_json, "\"open\"");
}
