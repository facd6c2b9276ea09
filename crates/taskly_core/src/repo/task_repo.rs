//! Task repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the `tasks` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `Task::validate()` before SQL mutations.
//! - Window-bounded lists return `created_at DESC, id ASC` order; the
//!   dashboard shows the newest tasks first.
//! - `project_id` is stored as NULL for unassigned tasks.

use crate::calendar::TimeWindow;
use crate::model::task::{Task, TaskId};
use crate::repo::{bool_to_int, parse_bool_column, parse_uuid_column, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    name,
    description,
    project_id,
    start_at,
    end_at,
    completed,
    created_at
FROM tasks";

/// Repository interface for task CRUD operations.
pub trait TaskRepository {
    /// Inserts one task and returns its stable id.
    fn create_task(&self, task: &Task) -> RepoResult<TaskId>;
    /// Gets one task by id.
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    /// Lists tasks whose `created_at` falls inside the window.
    fn list_tasks_in_window(&self, window: &TimeWindow) -> RepoResult<Vec<Task>>;
    /// Replaces the full task row.
    fn update_task(&self, task: &Task) -> RepoResult<()>;
    /// Removes one task row.
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;

        self.conn.execute(
            "INSERT INTO tasks (
                id,
                name,
                description,
                project_id,
                start_at,
                end_at,
                completed,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                task.id.to_string(),
                task.name.as_str(),
                task.description.as_str(),
                task.project_id.map(|id| id.to_string()),
                task.start_at,
                task.end_at,
                bool_to_int(task.completed),
                task.created_at,
            ],
        )?;

        Ok(task.id)
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query(params![id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }

        Ok(None)
    }

    fn list_tasks_in_window(&self, window: &TimeWindow) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE created_at >= ?1 AND created_at < ?2
             ORDER BY created_at DESC, id ASC;"
        ))?;

        let mut rows = stmt.query(params![window.start_ms, window.end_ms])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;

        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                name = ?1,
                description = ?2,
                project_id = ?3,
                start_at = ?4,
                end_at = ?5,
                completed = ?6
             WHERE id = ?7;",
            params![
                task.name.as_str(),
                task.description.as_str(),
                task.project_id.map(|id| id.to_string()),
                task.start_at,
                task.end_at,
                bool_to_int(task.completed),
                task.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(task.id));
        }

        Ok(())
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id_text: String = row.get("id")?;
    let id = parse_uuid_column(&id_text, "tasks.id")?;

    let project_id = match row.get::<_, Option<String>>("project_id")? {
        Some(value) => Some(parse_uuid_column(&value, "tasks.project_id")?),
        None => None,
    };

    let completed = parse_bool_column(row.get::<_, i64>("completed")?, "tasks.completed")?;

    let task = Task {
        id,
        name: row.get("name")?,
        description: row.get("description")?,
        project_id,
        start_at: row.get("start_at")?,
        end_at: row.get("end_at")?,
        completed,
        created_at: row.get("created_at")?,
    };
    task.validate()?;
    Ok(task)
}
