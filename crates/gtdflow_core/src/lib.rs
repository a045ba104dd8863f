//! Core domain logic for GtdFlow.
//! This crate is the single source of truth for business invariants.

pub mod auth;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use auth::{AuthError, AuthSession, AuthTokens, CallOutcome, TokenRefresher};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::context::{Context, ContextId, DEFAULT_CONTEXT_COLOR};
pub use model::family::{Family, FamilyId, FamilyMember, FamilyRole, MemberId};
pub use model::item::{Item, ItemId, ItemPriority, ItemType};
pub use model::project::{Project, ProjectHorizon, ProjectId, ProjectStatus};
pub use model::review::{ReviewId, WeeklyReview};
pub use model::{UserId, ValidationError};
pub use repo::item_repo::{ItemListQuery, ItemRepository, SqliteItemRepository};
pub use repo::{RepoError, RepoResult};
pub use service::item_service::{ItemPatch, ItemService, ItemServiceError, ProcessRequest};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
