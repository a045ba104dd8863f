//! Weekly review record.
//!
//! # Invariants
//! - A review row is written once when a session is finalized and never
//!   mutated afterwards.
//! - Partial checklist progress is session-local and never persisted.

use super::{now_epoch_ms, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a weekly review record.
pub type ReviewId = Uuid;

/// Record of one completed weekly review session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyReview {
    pub id: ReviewId,
    pub owner_id: UserId,
    pub notes: Option<String>,
    /// Epoch milliseconds; when the session was finalized.
    pub completed_at: i64,
    /// Epoch milliseconds.
    pub created_at: i64,
}

impl WeeklyReview {
    /// Creates a finalized review record stamped with the current time.
    pub fn new(owner_id: UserId, notes: Option<String>) -> Self {
        let now = now_epoch_ms();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            notes,
            completed_at: now,
            created_at: now,
        }
    }
}
