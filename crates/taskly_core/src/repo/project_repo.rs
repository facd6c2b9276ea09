//! Project repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the `projects` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `Project::validate()` before SQL mutations.
//! - Window-bounded lists return `created_at ASC, id ASC` order.

use crate::calendar::TimeWindow;
use crate::model::project::{Project, ProjectId};
use crate::repo::{parse_uuid_column, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const PROJECT_SELECT_SQL: &str = "SELECT
    id,
    name,
    description,
    background,
    due_date,
    created_at
FROM projects";

/// Repository interface for project CRUD operations.
pub trait ProjectRepository {
    /// Inserts one project and returns its stable id.
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId>;
    /// Gets one project by id.
    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>>;
    /// Lists projects whose `created_at` falls inside the window.
    fn list_projects_in_window(&self, window: &TimeWindow) -> RepoResult<Vec<Project>>;
    /// Removes one project row. The caller owns cascade cleanup of tasks.
    fn delete_project(&self, id: ProjectId) -> RepoResult<()>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId> {
        project.validate()?;

        self.conn.execute(
            "INSERT INTO projects (
                id,
                name,
                description,
                background,
                due_date,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                project.id.to_string(),
                project.name.as_str(),
                project.description.as_str(),
                project.background.as_str(),
                project.due_date,
                project.created_at,
            ],
        )?;

        Ok(project.id)
    }

    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query(params![id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_project_row(row)?));
        }

        Ok(None)
    }

    fn list_projects_in_window(&self, window: &TimeWindow) -> RepoResult<Vec<Project>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PROJECT_SELECT_SQL}
             WHERE created_at >= ?1 AND created_at < ?2
             ORDER BY created_at ASC, id ASC;"
        ))?;

        let mut rows = stmt.query(params![window.start_ms, window.end_ms])?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }

        Ok(projects)
    }

    fn delete_project(&self, id: ProjectId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM projects WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    let id_text: String = row.get("id")?;
    let id = parse_uuid_column(&id_text, "projects.id")?;

    let project = Project {
        id,
        name: row.get("name")?,
        description: row.get("description")?,
        background: row.get("background")?,
        due_date: row.get("due_date")?,
        created_at: row.get("created_at")?,
    };
    project.validate()?;
    Ok(project)
}
