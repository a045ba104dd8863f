//! Item domain model and lifecycle states.
//!
//! # Responsibility
//! - Define the captured-work record and its GTD lifecycle enumeration.
//! - Provide completion helpers used by every derived view.
//!
//! # Invariants
//! - Exactly one `ItemType` holds at a time; a transition replaces it.
//! - `completed_at` is the source of truth for done-ness regardless of type.
//! - `context_id` is meaningful for `next_action` but may be stored on any
//!   type (soft convention, not enforced here).

use super::{now_epoch_ms, UserId, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::context::ContextId;
use crate::model::project::ProjectId;

/// Stable identifier for an item.
pub type ItemId = Uuid;

/// GTD lifecycle state of an item.
///
/// `Inbox` is the single entry point; the other five are working
/// classifications reached via processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// Captured, not yet classified.
    Inbox,
    /// Concrete, doable action.
    NextAction,
    /// Delegated or blocked on someone else.
    WaitingFor,
    /// Date-bound commitment.
    Scheduled,
    /// Someday/maybe material.
    Someday,
    /// Non-actionable reference material.
    Reference,
}

impl ItemType {
    /// Whether processing may target this state.
    ///
    /// `Inbox` is never a processing target; returning an item to the inbox
    /// happens only through an explicit field update.
    pub fn is_process_target(self) -> bool {
        self != Self::Inbox
    }
}

/// Ordinal urgency, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemPriority {
    P1,
    P2,
    P3,
    P4,
}

/// A unit of work or reference material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Stable id, immutable for the item lifetime.
    pub id: ItemId,
    /// User who captured the item.
    pub owner_id: UserId,
    /// Short description; never blank.
    pub title: String,
    /// Free-form supporting notes.
    pub notes: Option<String>,
    /// Current lifecycle state. Serialized as `type` to match the wire schema.
    #[serde(rename = "type")]
    pub item_type: ItemType,
    /// Owning project, if the item belongs to one.
    pub project_id: Option<ProjectId>,
    /// GTD context tag. Meaningful for next actions.
    pub context_id: Option<ContextId>,
    /// Family member responsible for the item, when shared.
    pub assigned_to: Option<UserId>,
    /// Epoch milliseconds. Conventionally set for `Scheduled`.
    pub due_date: Option<i64>,
    pub priority: Option<ItemPriority>,
    /// Epoch milliseconds. Non-null marks the item done.
    pub completed_at: Option<i64>,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds. Refreshed by every write.
    pub updated_at: i64,
}

impl Item {
    /// Creates a freshly captured inbox item.
    pub fn capture(owner_id: UserId, title: impl Into<String>, notes: Option<String>) -> Self {
        let now = now_epoch_ms();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            title: title.into(),
            notes,
            item_type: ItemType::Inbox,
            project_id: None,
            context_id: None,
            assigned_to: None,
            due_date: None,
            priority: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validates field-level constraints before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::BlankItemTitle);
        }
        Ok(())
    }

    /// Whether `completed_at` is set.
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Whether the item belongs in active-work views.
    pub fn is_active(&self) -> bool {
        !self.is_completed()
    }
}
