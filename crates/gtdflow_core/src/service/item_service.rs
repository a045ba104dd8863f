//! Item lifecycle use-case service.
//!
//! # Responsibility
//! - Implement capture/process/complete/update/delete with the GTD
//!   lifecycle contract.
//! - Validate referenced contexts, projects and assignees before any
//!   mutation reaches storage.
//!
//! # Invariants
//! - `Inbox` is the only entry state; processing never targets it.
//! - Processing a completed item is rejected; completion is orthogonal to
//!   type and idempotent.
//! - Processing uses partial-update semantics: unsupplied fields keep
//!   their stored values.
//! - A missing due date on a `Scheduled` item is a logged warning, never
//!   an error.

use crate::model::context::ContextId;
use crate::model::item::{Item, ItemId, ItemPriority, ItemType};
use crate::model::project::{Project, ProjectId};
use crate::model::{UserId, ValidationError};
use crate::repo::context_repo::ContextRepository;
use crate::repo::family_repo::FamilyRepository;
use crate::repo::item_repo::{ItemListQuery, ItemRepository};
use crate::repo::project_repo::ProjectRepository;
use crate::repo::RepoError;
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Classification request applied when processing an item.
///
/// Optional fields follow partial-update semantics: `None` leaves the
/// stored value untouched.
#[derive(Debug, Clone)]
pub struct ProcessRequest {
    pub target_type: ItemType,
    pub context_id: Option<ContextId>,
    pub project_id: Option<ProjectId>,
    pub due_date: Option<i64>,
    pub assigned_to: Option<UserId>,
    pub priority: Option<ItemPriority>,
}

impl ProcessRequest {
    /// Creates a bare request moving an item to `target_type` only.
    pub fn to(target_type: ItemType) -> Self {
        Self {
            target_type,
            context_id: None,
            project_id: None,
            due_date: None,
            assigned_to: None,
            priority: None,
        }
    }
}

/// Generic field patch; `None` leaves the stored value untouched.
///
/// Unlike [`ProcessRequest`], a patch may set `item_type` back to
/// `Inbox` — the explicit update is the only road back.
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub title: Option<String>,
    pub notes: Option<String>,
    pub item_type: Option<ItemType>,
    pub project_id: Option<ProjectId>,
    pub context_id: Option<ContextId>,
    pub assigned_to: Option<UserId>,
    pub due_date: Option<i64>,
    pub priority: Option<ItemPriority>,
}

/// Errors from item lifecycle operations.
#[derive(Debug)]
pub enum ItemServiceError {
    /// Field-level validation failure (e.g. blank title).
    Validation(ValidationError),
    /// Processing may not target this type (`Inbox`).
    InvalidTarget(ItemType),
    /// Completed items cannot be re-classified.
    CompletedItemTransition(ItemId),
    /// Item does not exist or is not visible to the caller.
    ItemNotFound(ItemId),
    /// Referenced context does not resolve.
    ContextNotFound(ContextId),
    /// Referenced project does not resolve.
    ProjectNotFound(ProjectId),
    /// Referenced project exists but the actor may not use it.
    ProjectAccessDenied(ProjectId),
    /// Assignment target is not a member of the owning family.
    AssigneeNotFamilyMember(UserId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ItemServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidTarget(target) => {
                write!(f, "invalid processing target: {target:?}")
            }
            Self::CompletedItemTransition(id) => {
                write!(f, "cannot re-classify completed item: {id}")
            }
            Self::ItemNotFound(id) => write!(f, "item not found: {id}"),
            Self::ContextNotFound(id) => write!(f, "context not found: {id}"),
            Self::ProjectNotFound(id) => write!(f, "project not found: {id}"),
            Self::ProjectAccessDenied(id) => write!(f, "project access denied: {id}"),
            Self::AssigneeNotFamilyMember(id) => {
                write!(f, "assignee is not a family member: {id}")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ItemServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ItemServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound(id) => Self::ItemNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Item lifecycle service over injected repositories.
pub struct ItemService<I, P, C, F>
where
    I: ItemRepository,
    P: ProjectRepository,
    C: ContextRepository,
    F: FamilyRepository,
{
    items: I,
    projects: P,
    contexts: C,
    families: F,
}

impl<I, P, C, F> ItemService<I, P, C, F>
where
    I: ItemRepository,
    P: ProjectRepository,
    C: ContextRepository,
    F: FamilyRepository,
{
    pub fn new(items: I, projects: P, contexts: C, families: F) -> Self {
        Self {
            items,
            projects,
            contexts,
            families,
        }
    }

    /// Captures a new inbox item.
    ///
    /// Blank titles fail validation before any row is written.
    pub fn capture(
        &self,
        owner: UserId,
        title: impl Into<String>,
        notes: Option<String>,
    ) -> Result<Item, ItemServiceError> {
        let item = Item::capture(owner, title, notes);
        self.items.create_item(&item)?;
        Ok(item)
    }

    /// Gets one item visible to the actor.
    pub fn get(&self, actor: UserId, item_id: ItemId) -> Result<Item, ItemServiceError> {
        self.load_accessible(actor, item_id)
    }

    /// Lists the owner's items using the standard filter set.
    pub fn list(&self, owner: UserId, query: &ItemListQuery) -> Result<Vec<Item>, ItemServiceError> {
        Ok(self.items.list_items(owner, query)?)
    }

    /// Transitions an item into one of the five working classifications.
    ///
    /// The sole legal transition out of `Inbox`, and by the same contract a
    /// re-classification of any non-completed item. Supplied optional
    /// fields replace stored values; unsupplied fields are kept.
    pub fn process(
        &self,
        actor: UserId,
        item_id: ItemId,
        request: &ProcessRequest,
    ) -> Result<Item, ItemServiceError> {
        let mut item = self.load_accessible(actor, item_id)?;

        if item.is_completed() {
            return Err(ItemServiceError::CompletedItemTransition(item_id));
        }
        if !request.target_type.is_process_target() {
            return Err(ItemServiceError::InvalidTarget(request.target_type));
        }

        self.apply_references(
            actor,
            &mut item,
            request.context_id,
            request.project_id,
            request.assigned_to,
        )?;

        item.item_type = request.target_type;
        if let Some(due_date) = request.due_date {
            item.due_date = Some(due_date);
        }
        if let Some(priority) = request.priority {
            item.priority = Some(priority);
        }

        if item.item_type == ItemType::Scheduled && item.due_date.is_none() {
            // Soft convention only: scheduled items usually carry a date.
            warn!(
                "event=item_process module=service status=warn reason=scheduled_without_due_date item={}",
                item.id
            );
        }

        self.items.update_item(&item)?;
        self.reload(item_id)
    }

    /// Marks an item done. Completing a completed item is a no-op.
    pub fn complete(&self, actor: UserId, item_id: ItemId) -> Result<Item, ItemServiceError> {
        let item = self.load_accessible(actor, item_id)?;
        if item.is_completed() {
            return Ok(item);
        }

        self.items.complete_item(item_id)?;
        self.reload(item_id)
    }

    /// Applies a generic field patch with per-field validation.
    pub fn update(
        &self,
        actor: UserId,
        item_id: ItemId,
        patch: &ItemPatch,
    ) -> Result<Item, ItemServiceError> {
        let mut item = self.load_accessible(actor, item_id)?;

        self.apply_references(
            actor,
            &mut item,
            patch.context_id,
            patch.project_id,
            patch.assigned_to,
        )?;

        if let Some(title) = &patch.title {
            item.title = title.clone();
        }
        if let Some(notes) = &patch.notes {
            item.notes = Some(notes.clone());
        }
        if let Some(item_type) = patch.item_type {
            item.item_type = item_type;
        }
        if let Some(due_date) = patch.due_date {
            item.due_date = Some(due_date);
        }
        if let Some(priority) = patch.priority {
            item.priority = Some(priority);
        }

        self.items.update_item(&item)?;
        self.reload(item_id)
    }

    /// Hard-deletes an item.
    pub fn delete(&self, actor: UserId, item_id: ItemId) -> Result<(), ItemServiceError> {
        self.load_accessible(actor, item_id)?;
        self.items.delete_item(item_id)?;
        Ok(())
    }

    fn load_accessible(&self, actor: UserId, item_id: ItemId) -> Result<Item, ItemServiceError> {
        let item = self
            .items
            .get_item(item_id)?
            .ok_or(ItemServiceError::ItemNotFound(item_id))?;

        if item.owner_id == actor {
            return Ok(item);
        }

        // Non-owners reach an item only through a family-shared project.
        if let Some(project_id) = item.project_id {
            if let Some(project) = self.projects.get_project(project_id)? {
                if self.is_family_member_of(&project, actor)? {
                    return Ok(item);
                }
            }
        }

        Err(ItemServiceError::ItemNotFound(item_id))
    }

    /// Validates and applies reference fields shared by process and update.
    fn apply_references(
        &self,
        actor: UserId,
        item: &mut Item,
        context_id: Option<ContextId>,
        project_id: Option<ProjectId>,
        assigned_to: Option<UserId>,
    ) -> Result<(), ItemServiceError> {
        if let Some(context_id) = context_id {
            if self.contexts.get_context(context_id)?.is_none() {
                return Err(ItemServiceError::ContextNotFound(context_id));
            }
            item.context_id = Some(context_id);
        }

        if let Some(project_id) = project_id {
            let project = self
                .projects
                .get_project(project_id)?
                .ok_or(ItemServiceError::ProjectNotFound(project_id))?;
            if project.owner_id != actor && !self.is_family_member_of(&project, actor)? {
                return Err(ItemServiceError::ProjectAccessDenied(project_id));
            }
            item.project_id = Some(project_id);
        }

        if let Some(assignee) = assigned_to {
            // Assignment is only meaningful against the member set of the
            // family owning the item's effective project.
            let family_id = match item.project_id {
                Some(project_id) => self
                    .projects
                    .get_project(project_id)?
                    .and_then(|project| project.family_id),
                None => None,
            };
            let is_member = match family_id {
                Some(family_id) => self.families.get_member(family_id, assignee)?.is_some(),
                None => false,
            };
            if !is_member {
                return Err(ItemServiceError::AssigneeNotFamilyMember(assignee));
            }
            item.assigned_to = Some(assignee);
        }

        Ok(())
    }

    fn is_family_member_of(
        &self,
        project: &Project,
        user: UserId,
    ) -> Result<bool, ItemServiceError> {
        match project.family_id {
            Some(family_id) => Ok(self.families.get_member(family_id, user)?.is_some()),
            None => Ok(false),
        }
    }

    fn reload(&self, item_id: ItemId) -> Result<Item, ItemServiceError> {
        self.items
            .get_item(item_id)?
            .ok_or(ItemServiceError::ItemNotFound(item_id))
    }
}
