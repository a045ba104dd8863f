//! Context repository contract and SQLite implementation.
//!
//! # Invariants
//! - Write paths call `Context::validate()` before SQL mutations.
//! - Context deletion hard-deletes the row; `items.context_id` is cleared
//!   by the schema (`ON DELETE SET NULL`), never left dangling.

use crate::model::context::{Context, ContextId};
use crate::model::UserId;
use crate::repo::{parse_uuid_column, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const CONTEXT_SELECT_SQL: &str = "SELECT id, owner_id, name, color FROM contexts";

/// Repository interface for context CRUD operations.
pub trait ContextRepository {
    fn create_context(&self, context: &Context) -> RepoResult<ContextId>;
    fn update_context(&self, context: &Context) -> RepoResult<()>;
    fn get_context(&self, id: ContextId) -> RepoResult<Option<Context>>;
    fn list_contexts(&self, owner_id: UserId) -> RepoResult<Vec<Context>>;
    fn delete_context(&self, id: ContextId) -> RepoResult<()>;
}

/// SQLite-backed context repository.
pub struct SqliteContextRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContextRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ContextRepository for SqliteContextRepository<'_> {
    fn create_context(&self, context: &Context) -> RepoResult<ContextId> {
        context.validate()?;

        self.conn.execute(
            "INSERT INTO contexts (id, owner_id, name, color) VALUES (?1, ?2, ?3, ?4);",
            params![
                context.id.to_string(),
                context.owner_id.to_string(),
                context.name.as_str(),
                context.color.as_str(),
            ],
        )?;

        Ok(context.id)
    }

    fn update_context(&self, context: &Context) -> RepoResult<()> {
        context.validate()?;

        let changed = self.conn.execute(
            "UPDATE contexts SET name = ?1, color = ?2 WHERE id = ?3;",
            params![
                context.name.as_str(),
                context.color.as_str(),
                context.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(context.id));
        }

        Ok(())
    }

    fn get_context(&self, id: ContextId) -> RepoResult<Option<Context>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTEXT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query(params![id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_context_row(row)?));
        }

        Ok(None)
    }

    fn list_contexts(&self, owner_id: UserId) -> RepoResult<Vec<Context>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CONTEXT_SELECT_SQL} WHERE owner_id = ?1 ORDER BY name ASC;"
        ))?;

        let mut rows = stmt.query(params![owner_id.to_string()])?;
        let mut contexts = Vec::new();

        while let Some(row) = rows.next()? {
            contexts.push(parse_context_row(row)?);
        }

        Ok(contexts)
    }

    fn delete_context(&self, id: ContextId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM contexts WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_context_row(row: &Row<'_>) -> RepoResult<Context> {
    let id_text: String = row.get("id")?;
    let owner_text: String = row.get("owner_id")?;

    let context = Context {
        id: parse_uuid_column(&id_text, "contexts.id")?,
        owner_id: parse_uuid_column(&owner_text, "contexts.owner_id")?,
        name: row.get("name")?,
        color: row.get("color")?,
    };
    context.validate()?;
    Ok(context)
}
