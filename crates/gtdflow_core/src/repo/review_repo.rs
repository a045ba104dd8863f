//! Weekly review repository contract and SQLite implementation.
//!
//! # Invariants
//! - Review rows are insert-only; no update path exists.
//! - History is listed newest first.

use crate::model::review::{ReviewId, WeeklyReview};
use crate::model::UserId;
use crate::repo::{parse_uuid_column, RepoResult};
use rusqlite::{params, Connection, Row};

const REVIEW_SELECT_SQL: &str = "SELECT
    id,
    owner_id,
    notes,
    completed_at,
    created_at
FROM weekly_reviews";

/// Repository interface for weekly review history.
pub trait ReviewRepository {
    fn create_review(&self, review: &WeeklyReview) -> RepoResult<ReviewId>;
    fn list_reviews(&self, owner_id: UserId) -> RepoResult<Vec<WeeklyReview>>;
}

/// SQLite-backed review repository.
pub struct SqliteReviewRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteReviewRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ReviewRepository for SqliteReviewRepository<'_> {
    fn create_review(&self, review: &WeeklyReview) -> RepoResult<ReviewId> {
        self.conn.execute(
            "INSERT INTO weekly_reviews (
                id,
                owner_id,
                notes,
                completed_at,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                review.id.to_string(),
                review.owner_id.to_string(),
                review.notes.as_deref(),
                review.completed_at,
                review.created_at,
            ],
        )?;

        Ok(review.id)
    }

    fn list_reviews(&self, owner_id: UserId) -> RepoResult<Vec<WeeklyReview>> {
        let mut stmt = self.conn.prepare(&format!(
            "{REVIEW_SELECT_SQL} WHERE owner_id = ?1 ORDER BY created_at DESC, rowid DESC;"
        ))?;

        let mut rows = stmt.query(params![owner_id.to_string()])?;
        let mut reviews = Vec::new();

        while let Some(row) = rows.next()? {
            reviews.push(parse_review_row(row)?);
        }

        Ok(reviews)
    }
}

fn parse_review_row(row: &Row<'_>) -> RepoResult<WeeklyReview> {
    let id_text: String = row.get("id")?;
    let owner_text: String = row.get("owner_id")?;

    Ok(WeeklyReview {
        id: parse_uuid_column(&id_text, "weekly_reviews.id")?,
        owner_id: parse_uuid_column(&owner_text, "weekly_reviews.owner_id")?,
        notes: row.get("notes")?,
        completed_at: row.get("completed_at")?,
        created_at: row.get("created_at")?,
    })
}
