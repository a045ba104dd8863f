//! Project domain model.
//!
//! # Responsibility
//! - Define the work-aggregation record, its status and horizon metadata.
//!
//! # Invariants
//! - `horizon` is purely descriptive altitude metadata; it never affects
//!   item validity.
//! - `family_id = None` means the project is private to its owner.

use super::{now_epoch_ms, UserId, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::family::FamilyId;

/// Stable identifier for a project.
pub type ProjectId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    Completed,
    Someday,
}

/// GTD altitude classification of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectHorizon {
    Project,
    Area,
    Goal,
    Vision,
    Purpose,
}

/// A named unit of work aggregation; projects may nest via `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub owner_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub horizon: ProjectHorizon,
    /// Optional enclosing project.
    pub parent_id: Option<ProjectId>,
    /// Sharing group; `None` keeps the project private.
    pub family_id: Option<FamilyId>,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds.
    pub updated_at: i64,
}

impl Project {
    /// Creates an active, horizon-`project` record with defaults.
    pub fn new(owner_id: UserId, name: impl Into<String>) -> Self {
        let now = now_epoch_ms();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: name.into(),
            description: None,
            status: ProjectStatus::Active,
            horizon: ProjectHorizon::Project,
            parent_id: None,
            family_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validates field-level constraints before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankProjectName);
        }
        Ok(())
    }

    /// Whether family members can see and work with this project.
    pub fn is_shared(&self) -> bool {
        self.family_id.is_some()
    }
}
