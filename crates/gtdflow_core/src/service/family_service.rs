//! Family sharing use-case service.
//!
//! # Responsibility
//! - Create/join families and manage membership under role rules.
//! - Own invite-code rotation: one active code per family, stale codes
//!   stop resolving.
//!
//! # Invariants
//! - The creator becomes the family's single `Owner` member.
//! - Joiners always enter with role `Member`; role is fixed at join.
//! - Member removal requires: target is not the actor, target is not an
//!   owner, and the actor outranks per [`FamilyRole::can_remove`].

use crate::model::family::{generate_invite_code, Family, FamilyId, FamilyMember, FamilyRole};
use crate::model::{UserId, ValidationError};
use crate::repo::family_repo::FamilyRepository;
use crate::repo::RepoError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from family sharing operations.
#[derive(Debug)]
pub enum FamilyServiceError {
    /// Field-level validation failure (blank family name).
    Validation(ValidationError),
    /// Invite code is stale or unknown.
    InvalidInvite,
    /// Joining user already belongs to the family.
    AlreadyMember(FamilyId),
    /// Family does not exist.
    FamilyNotFound(FamilyId),
    /// Acting user is not a member of the family.
    NotAMember(FamilyId),
    /// Removal target has no membership record.
    MemberNotFound(UserId),
    /// Actor may not remove themselves.
    CannotRemoveSelf,
    /// Owners can never be removed.
    CannotRemoveOwner,
    /// Actor's role does not permit the action.
    InsufficientRole,
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for FamilyServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidInvite => write!(f, "invite code is invalid or no longer active"),
            Self::AlreadyMember(id) => write!(f, "already a member of family {id}"),
            Self::FamilyNotFound(id) => write!(f, "family not found: {id}"),
            Self::NotAMember(id) => write!(f, "not a member of family {id}"),
            Self::MemberNotFound(id) => write!(f, "family member not found: {id}"),
            Self::CannotRemoveSelf => write!(f, "cannot remove yourself from a family"),
            Self::CannotRemoveOwner => write!(f, "cannot remove the family owner"),
            Self::InsufficientRole => write!(f, "role does not permit this action"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FamilyServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for FamilyServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Family sharing service over an injected repository.
pub struct FamilyService<F: FamilyRepository> {
    families: F,
}

impl<F: FamilyRepository> FamilyService<F> {
    pub fn new(families: F) -> Self {
        Self { families }
    }

    /// Creates a family; the creator joins as its single owner.
    pub fn create_family(
        &self,
        actor: UserId,
        name: impl Into<String>,
    ) -> Result<Family, FamilyServiceError> {
        let family = Family::new(name, actor);
        self.families.create_family(&family)?;
        self.families
            .add_member(&FamilyMember::new(family.id, actor, FamilyRole::Owner))?;

        info!(
            "event=family_create module=service status=ok family={}",
            family.id
        );
        Ok(family)
    }

    /// Gets a family; members only.
    pub fn get_family(
        &self,
        actor: UserId,
        family_id: FamilyId,
    ) -> Result<Family, FamilyServiceError> {
        self.require_member(family_id, actor)?;
        self.families
            .get_family(family_id)?
            .ok_or(FamilyServiceError::FamilyNotFound(family_id))
    }

    /// Joins a family via its active invite code.
    ///
    /// A rotated-away code no longer resolves and fails as invalid.
    pub fn join_family(&self, actor: UserId, code: &str) -> Result<Family, FamilyServiceError> {
        let family = self
            .families
            .find_family_by_invite_code(code)?
            .ok_or(FamilyServiceError::InvalidInvite)?;

        if self.families.get_member(family.id, actor)?.is_some() {
            return Err(FamilyServiceError::AlreadyMember(family.id));
        }

        self.families
            .add_member(&FamilyMember::new(family.id, actor, FamilyRole::Member))?;

        info!(
            "event=family_join module=service status=ok family={}",
            family.id
        );
        Ok(family)
    }

    /// Rotates the invite code; owner/admin only. Returns the new code.
    pub fn rotate_invite(
        &self,
        actor: UserId,
        family_id: FamilyId,
    ) -> Result<String, FamilyServiceError> {
        let member = self.require_member(family_id, actor)?;
        if !member.role.can_manage_invites() {
            return Err(FamilyServiceError::InsufficientRole);
        }

        let code = generate_invite_code();
        self.families.set_invite_code(family_id, &code)?;

        info!(
            "event=invite_rotate module=service status=ok family={family_id}"
        );
        Ok(code)
    }

    /// Lists members; members only.
    pub fn list_members(
        &self,
        actor: UserId,
        family_id: FamilyId,
    ) -> Result<Vec<FamilyMember>, FamilyServiceError> {
        self.require_member(family_id, actor)?;
        Ok(self.families.list_members(family_id)?)
    }

    /// Removes a member under the role contract.
    ///
    /// Succeeds iff the target is not the actor, the target is not an
    /// owner, and the actor's role outranks the target's per
    /// [`FamilyRole::can_remove`].
    pub fn remove_member(
        &self,
        actor: UserId,
        family_id: FamilyId,
        target_user: UserId,
    ) -> Result<(), FamilyServiceError> {
        if target_user == actor {
            return Err(FamilyServiceError::CannotRemoveSelf);
        }

        let acting_member = self.require_member(family_id, actor)?;
        let target_member = self
            .families
            .get_member(family_id, target_user)?
            .ok_or(FamilyServiceError::MemberNotFound(target_user))?;

        if target_member.role == FamilyRole::Owner {
            return Err(FamilyServiceError::CannotRemoveOwner);
        }
        if !acting_member.role.can_remove(target_member.role) {
            return Err(FamilyServiceError::InsufficientRole);
        }

        self.families.remove_member(family_id, target_user)?;

        info!(
            "event=member_remove module=service status=ok family={family_id}"
        );
        Ok(())
    }

    fn require_member(
        &self,
        family_id: FamilyId,
        user: UserId,
    ) -> Result<FamilyMember, FamilyServiceError> {
        self.families
            .get_member(family_id, user)?
            .ok_or(FamilyServiceError::NotAMember(family_id))
    }
}
