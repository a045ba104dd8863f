//! Domain model for the GTD core.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Own field-level validation shared by repository write paths.
//!
//! # Invariants
//! - Every domain object is identified by a stable UUID.
//! - All timestamps are Unix epoch milliseconds.
//! - `completed_at` is orthogonal to `ItemType`; a completed item keeps its
//!   last working type.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

pub mod context;
pub mod family;
pub mod item;
pub mod project;
pub mod review;

/// Opaque identifier for a user account.
///
/// The core never stores user records; user identity is owned by the auth
/// backend and referenced here by stable id only.
pub type UserId = uuid::Uuid;

/// Field-level validation failure raised before any persistence happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Item title is empty or whitespace-only.
    BlankItemTitle,
    /// Project name is empty or whitespace-only.
    BlankProjectName,
    /// Context name is empty or whitespace-only.
    BlankContextName,
    /// Context color is not a `#rrggbb` hex value.
    InvalidContextColor(String),
    /// Family name is empty or whitespace-only.
    BlankFamilyName,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankItemTitle => write!(f, "item title must not be blank"),
            Self::BlankProjectName => write!(f, "project name must not be blank"),
            Self::BlankContextName => write!(f, "context name must not be blank"),
            Self::InvalidContextColor(value) => {
                write!(f, "context color must be #rrggbb, got `{value}`")
            }
            Self::BlankFamilyName => write!(f, "family name must not be blank"),
        }
    }
}

impl Error for ValidationError {}

/// Returns the current wall-clock time as epoch milliseconds.
pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
