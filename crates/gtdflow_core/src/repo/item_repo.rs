//! Item repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over canonical `items` storage.
//! - Mirror the list filters the clients use (type, project, context,
//!   priority, completed visibility).
//!
//! # Invariants
//! - Write paths call `Item::validate()` before SQL mutations.
//! - Item deletion is a hard delete; there is no tombstone.
//! - `complete_item` never overwrites an existing `completed_at`.

use crate::model::item::{Item, ItemId, ItemPriority, ItemType};
use crate::model::UserId;
use crate::repo::{parse_optional_uuid_column, parse_uuid_column, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const ITEM_SELECT_SQL: &str = "SELECT
    id,
    owner_id,
    project_id,
    title,
    notes,
    type,
    context_id,
    assigned_to,
    priority,
    due_date,
    completed_at,
    created_at,
    updated_at
FROM items";

/// Query options for listing items, mirroring the REST filter set.
#[derive(Debug, Clone, Default)]
pub struct ItemListQuery {
    pub item_type: Option<ItemType>,
    pub project_id: Option<uuid::Uuid>,
    pub context_id: Option<uuid::Uuid>,
    pub priority: Option<ItemPriority>,
    pub include_completed: bool,
}

/// Repository interface for item CRUD operations.
pub trait ItemRepository {
    fn create_item(&self, item: &Item) -> RepoResult<ItemId>;
    /// Full-row update; refreshes `updated_at`.
    fn update_item(&self, item: &Item) -> RepoResult<()>;
    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>>;
    /// Lists one owner's items, most recently captured first.
    fn list_items(&self, owner_id: UserId, query: &ItemListQuery) -> RepoResult<Vec<Item>>;
    /// Stamps `completed_at` once; completing a completed row is a no-op.
    fn complete_item(&self, id: ItemId) -> RepoResult<()>;
    /// Hard delete. `NotFound` when the row is already absent.
    fn delete_item(&self, id: ItemId) -> RepoResult<()>;
}

/// SQLite-backed item repository.
pub struct SqliteItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteItemRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn create_item(&self, item: &Item) -> RepoResult<ItemId> {
        item.validate()?;

        self.conn.execute(
            "INSERT INTO items (
                id,
                owner_id,
                project_id,
                title,
                notes,
                type,
                context_id,
                assigned_to,
                priority,
                due_date,
                completed_at,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13);",
            params![
                item.id.to_string(),
                item.owner_id.to_string(),
                item.project_id.map(|id| id.to_string()),
                item.title.as_str(),
                item.notes.as_deref(),
                item_type_to_db(item.item_type),
                item.context_id.map(|id| id.to_string()),
                item.assigned_to.map(|id| id.to_string()),
                item.priority.map(priority_to_db),
                item.due_date,
                item.completed_at,
                item.created_at,
                item.updated_at,
            ],
        )?;

        Ok(item.id)
    }

    fn update_item(&self, item: &Item) -> RepoResult<()> {
        item.validate()?;

        let changed = self.conn.execute(
            "UPDATE items
             SET
                project_id = ?1,
                title = ?2,
                notes = ?3,
                type = ?4,
                context_id = ?5,
                assigned_to = ?6,
                priority = ?7,
                due_date = ?8,
                completed_at = ?9,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?10;",
            params![
                item.project_id.map(|id| id.to_string()),
                item.title.as_str(),
                item.notes.as_deref(),
                item_type_to_db(item.item_type),
                item.context_id.map(|id| id.to_string()),
                item.assigned_to.map(|id| id.to_string()),
                item.priority.map(priority_to_db),
                item.due_date,
                item.completed_at,
                item.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(item.id));
        }

        Ok(())
    }

    fn get_item(&self, id: ItemId) -> RepoResult<Option<Item>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query(params![id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_item_row(row)?));
        }

        Ok(None)
    }

    fn list_items(&self, owner_id: UserId, query: &ItemListQuery) -> RepoResult<Vec<Item>> {
        let mut sql = format!("{ITEM_SELECT_SQL} WHERE owner_id = ?");
        let mut bind_values: Vec<Value> = vec![Value::Text(owner_id.to_string())];

        if let Some(item_type) = query.item_type {
            sql.push_str(" AND type = ?");
            bind_values.push(Value::Text(item_type_to_db(item_type).to_string()));
        }
        if let Some(project_id) = query.project_id {
            sql.push_str(" AND project_id = ?");
            bind_values.push(Value::Text(project_id.to_string()));
        }
        if let Some(context_id) = query.context_id {
            sql.push_str(" AND context_id = ?");
            bind_values.push(Value::Text(context_id.to_string()));
        }
        if let Some(priority) = query.priority {
            sql.push_str(" AND priority = ?");
            bind_values.push(Value::Text(priority_to_db(priority).to_string()));
        }
        if !query.include_completed {
            sql.push_str(" AND completed_at IS NULL");
        }

        // rowid breaks same-millisecond ties so a capture always prepends.
        sql.push_str(" ORDER BY created_at DESC, rowid DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut items = Vec::new();

        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }

        Ok(items)
    }

    fn complete_item(&self, id: ItemId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE items
             SET
                completed_at = COALESCE(completed_at, strftime('%s', 'now') * 1000),
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            [id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_item(&self, id: ItemId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM items WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<Item> {
    let id_text: String = row.get("id")?;
    let owner_text: String = row.get("owner_id")?;

    let type_text: String = row.get("type")?;
    let item_type = parse_item_type(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid item type `{type_text}` in items.type"))
    })?;

    let priority = match row.get::<_, Option<String>>("priority")? {
        Some(value) => Some(parse_priority(&value).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid priority `{value}` in items.priority"))
        })?),
        None => None,
    };

    let item = Item {
        id: parse_uuid_column(&id_text, "items.id")?,
        owner_id: parse_uuid_column(&owner_text, "items.owner_id")?,
        project_id: parse_optional_uuid_column(row.get("project_id")?, "items.project_id")?,
        title: row.get("title")?,
        notes: row.get("notes")?,
        item_type,
        context_id: parse_optional_uuid_column(row.get("context_id")?, "items.context_id")?,
        assigned_to: parse_optional_uuid_column(row.get("assigned_to")?, "items.assigned_to")?,
        priority,
        due_date: row.get("due_date")?,
        completed_at: row.get("completed_at")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    item.validate()?;
    Ok(item)
}

fn item_type_to_db(item_type: ItemType) -> &'static str {
    match item_type {
        ItemType::Inbox => "inbox",
        ItemType::NextAction => "next_action",
        ItemType::WaitingFor => "waiting_for",
        ItemType::Scheduled => "scheduled",
        ItemType::Someday => "someday",
        ItemType::Reference => "reference",
    }
}

fn parse_item_type(value: &str) -> Option<ItemType> {
    match value {
        "inbox" => Some(ItemType::Inbox),
        "next_action" => Some(ItemType::NextAction),
        "waiting_for" => Some(ItemType::WaitingFor),
        "scheduled" => Some(ItemType::Scheduled),
        "someday" => Some(ItemType::Someday),
        "reference" => Some(ItemType::Reference),
        _ => None,
    }
}

fn priority_to_db(priority: ItemPriority) -> &'static str {
    match priority {
        ItemPriority::P1 => "p1",
        ItemPriority::P2 => "p2",
        ItemPriority::P3 => "p3",
        ItemPriority::P4 => "p4",
    }
}

fn parse_priority(value: &str) -> Option<ItemPriority> {
    match value {
        "p1" => Some(ItemPriority::P1),
        "p2" => Some(ItemPriority::P2),
        "p3" => Some(ItemPriority::P3),
        "p4" => Some(ItemPriority::P4),
        _ => None,
    }
}
