//! Project repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over `projects`, including the family-visibility list
//!   query (own projects plus projects shared with families the user
//!   belongs to).
//!
//! # Invariants
//! - Write paths call `Project::validate()` before SQL mutations.
//! - List ordering is `created_at DESC`, newest project first.

use crate::model::family::FamilyId;
use crate::model::project::{Project, ProjectHorizon, ProjectId, ProjectStatus};
use crate::model::UserId;
use crate::repo::{parse_optional_uuid_column, parse_uuid_column, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const PROJECT_SELECT_SQL: &str = "SELECT
    id,
    owner_id,
    family_id,
    name,
    description,
    status,
    horizon,
    parent_id,
    created_at,
    updated_at
FROM projects";

/// Query options for listing projects.
#[derive(Debug, Clone, Default)]
pub struct ProjectListQuery {
    pub horizon: Option<ProjectHorizon>,
    pub status: Option<ProjectStatus>,
    pub family_id: Option<FamilyId>,
}

/// Repository interface for project CRUD operations.
pub trait ProjectRepository {
    fn create_project(&self, project: &Project) -> RepoResult<ProjectId>;
    /// Full-row update; refreshes `updated_at`.
    fn update_project(&self, project: &Project) -> RepoResult<()>;
    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>>;
    /// Lists projects the user owns plus family-shared ones they can see.
    fn list_visible_projects(
        &self,
        user_id: UserId,
        query: &ProjectListQuery,
    ) -> RepoResult<Vec<Project>>;
    /// Hard delete. `NotFound` when the row is already absent.
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
                owner_id,
                family_id,
                name,
                description,
                status,
                horizon,
                parent_id,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                project.id.to_string(),
                project.owner_id.to_string(),
                project.family_id.map(|id| id.to_string()),
                project.name.as_str(),
                project.description.as_deref(),
                status_to_db(project.status),
                horizon_to_db(project.horizon),
                project.parent_id.map(|id| id.to_string()),
                project.created_at,
                project.updated_at,
            ],
        )?;

        Ok(project.id)
    }

    fn update_project(&self, project: &Project) -> RepoResult<()> {
        project.validate()?;

        let changed = self.conn.execute(
            "UPDATE projects
             SET
                family_id = ?1,
                name = ?2,
                description = ?3,
                status = ?4,
                horizon = ?5,
                parent_id = ?6,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?7;",
            params![
                project.family_id.map(|id| id.to_string()),
                project.name.as_str(),
                project.description.as_deref(),
                status_to_db(project.status),
                horizon_to_db(project.horizon),
                project.parent_id.map(|id| id.to_string()),
                project.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(project.id));
        }

        Ok(())
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

    fn list_visible_projects(
        &self,
        user_id: UserId,
        query: &ProjectListQuery,
    ) -> RepoResult<Vec<Project>> {
        let mut sql = format!(
            "{PROJECT_SELECT_SQL}
             WHERE (owner_id = ?
                OR family_id IN (
                    SELECT family_id FROM family_members WHERE user_id = ?
                ))"
        );
        let user_text = user_id.to_string();
        let mut bind_values: Vec<Value> = vec![
            Value::Text(user_text.clone()),
            Value::Text(user_text),
        ];

        if let Some(horizon) = query.horizon {
            sql.push_str(" AND horizon = ?");
            bind_values.push(Value::Text(horizon_to_db(horizon).to_string()));
        }
        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            bind_values.push(Value::Text(status_to_db(status).to_string()));
        }
        if let Some(family_id) = query.family_id {
            sql.push_str(" AND family_id = ?");
            bind_values.push(Value::Text(family_id.to_string()));
        }

        sql.push_str(" ORDER BY created_at DESC, rowid DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
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
    let owner_text: String = row.get("owner_id")?;

    let status_text: String = row.get("status")?;
    let status = parse_status(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid project status `{status_text}` in projects.status"
        ))
    })?;

    let horizon_text: String = row.get("horizon")?;
    let horizon = parse_horizon(&horizon_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid project horizon `{horizon_text}` in projects.horizon"
        ))
    })?;

    let project = Project {
        id: parse_uuid_column(&id_text, "projects.id")?,
        owner_id: parse_uuid_column(&owner_text, "projects.owner_id")?,
        family_id: parse_optional_uuid_column(row.get("family_id")?, "projects.family_id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        status,
        horizon,
        parent_id: parse_optional_uuid_column(row.get("parent_id")?, "projects.parent_id")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    project.validate()?;
    Ok(project)
}

fn status_to_db(status: ProjectStatus) -> &'static str {
    match status {
        ProjectStatus::Active => "active",
        ProjectStatus::Completed => "completed",
        ProjectStatus::Someday => "someday",
    }
}

fn parse_status(value: &str) -> Option<ProjectStatus> {
    match value {
        "active" => Some(ProjectStatus::Active),
        "completed" => Some(ProjectStatus::Completed),
        "someday" => Some(ProjectStatus::Someday),
        _ => None,
    }
}

fn horizon_to_db(horizon: ProjectHorizon) -> &'static str {
    match horizon {
        ProjectHorizon::Project => "project",
        ProjectHorizon::Area => "area",
        ProjectHorizon::Goal => "goal",
        ProjectHorizon::Vision => "vision",
        ProjectHorizon::Purpose => "purpose",
    }
}

fn parse_horizon(value: &str) -> Option<ProjectHorizon> {
    match value {
        "project" => Some(ProjectHorizon::Project),
        "area" => Some(ProjectHorizon::Area),
        "goal" => Some(ProjectHorizon::Goal),
        "vision" => Some(ProjectHorizon::Vision),
        "purpose" => Some(ProjectHorizon::Purpose),
        _ => None,
    }
}
