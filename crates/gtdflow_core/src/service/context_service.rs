//! Context use-case service.
//!
//! # Invariants
//! - Contexts are owner-private; only the owner sees or mutates them.
//! - Deleting a context leaves referencing items intact: the schema clears
//!   `items.context_id`, so those items regroup under "No Context".

use crate::model::context::{Context, ContextId};
use crate::model::{UserId, ValidationError};
use crate::repo::context_repo::ContextRepository;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from context operations.
#[derive(Debug)]
pub enum ContextServiceError {
    Validation(ValidationError),
    /// Context does not exist or belongs to someone else.
    ContextNotFound(ContextId),
    Repo(RepoError),
}

impl Display for ContextServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ContextNotFound(id) => write!(f, "context not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ContextServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::ContextNotFound(_) => None,
        }
    }
}

impl From<RepoError> for ContextServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound(id) => Self::ContextNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Context service over an injected repository.
pub struct ContextService<C: ContextRepository> {
    contexts: C,
}

impl<C: ContextRepository> ContextService<C> {
    pub fn new(contexts: C) -> Self {
        Self { contexts }
    }

    /// Creates a context; name must be non-blank, color `#rrggbb` or
    /// omitted for the default.
    pub fn create_context(
        &self,
        owner: UserId,
        name: impl Into<String>,
        color: Option<String>,
    ) -> Result<Context, ContextServiceError> {
        let context = Context::new(owner, name, color);
        self.contexts.create_context(&context)?;
        Ok(context)
    }

    /// Lists the owner's contexts sorted by name.
    pub fn list_contexts(&self, owner: UserId) -> Result<Vec<Context>, ContextServiceError> {
        Ok(self.contexts.list_contexts(owner)?)
    }

    /// Renames and/or recolors one owned context.
    pub fn update_context(
        &self,
        owner: UserId,
        context_id: ContextId,
        name: Option<String>,
        color: Option<String>,
    ) -> Result<Context, ContextServiceError> {
        let mut context = self.require_owned(owner, context_id)?;
        if let Some(name) = name {
            context.name = name;
        }
        if let Some(color) = color {
            context.color = color;
        }

        self.contexts.update_context(&context)?;
        Ok(context)
    }

    /// Hard-deletes one owned context.
    pub fn delete_context(
        &self,
        owner: UserId,
        context_id: ContextId,
    ) -> Result<(), ContextServiceError> {
        self.require_owned(owner, context_id)?;
        self.contexts.delete_context(context_id)?;
        Ok(())
    }

    fn require_owned(
        &self,
        owner: UserId,
        context_id: ContextId,
    ) -> Result<Context, ContextServiceError> {
        let context = self
            .contexts
            .get_context(context_id)?
            .ok_or(ContextServiceError::ContextNotFound(context_id))?;
        if context.owner_id != owner {
            return Err(ContextServiceError::ContextNotFound(context_id));
        }
        Ok(context)
    }
}
