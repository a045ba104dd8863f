//! Family sharing group model and role rules.
//!
//! # Responsibility
//! - Define the sharing group, its membership records and role ordering.
//! - Own the member-removal permission predicate.
//!
//! # Invariants
//! - Exactly one `Owner` per family: the creator, assigned at creation.
//! - One invite code is active per family at any time; rotation replaces it.
//! - Role is fixed at join time; there is no escalation operation.

use super::{now_epoch_ms, UserId, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a family.
pub type FamilyId = Uuid;

/// Stable identifier for a membership record.
pub type MemberId = Uuid;

/// Permission tier inside a family. Strict ordering: owner > admin > member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FamilyRole {
    Owner,
    Admin,
    Member,
}

impl FamilyRole {
    /// Whether this role may rotate the family invite code.
    pub fn can_manage_invites(self) -> bool {
        matches!(self, Self::Owner | Self::Admin)
    }

    /// Whether an actor holding this role may remove a member holding
    /// `target`.
    ///
    /// Owners remove anyone below them; admins remove plain members only;
    /// nobody removes an owner. Self-removal is rejected one layer up, where
    /// actor and target identities are known.
    pub fn can_remove(self, target: FamilyRole) -> bool {
        match self {
            Self::Owner => target != Self::Owner,
            Self::Admin => target == Self::Member,
            Self::Member => false,
        }
    }
}

/// A sharing group enabling collaboration on projects and items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Family {
    pub id: FamilyId,
    pub name: String,
    /// User who created the family; also its sole owner-role member.
    pub created_by: UserId,
    /// Single active join code; replaced wholesale on rotation.
    pub invite_code: String,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds.
    pub updated_at: i64,
}

impl Family {
    /// Creates a family with a freshly generated invite code.
    pub fn new(name: impl Into<String>, created_by: UserId) -> Self {
        let now = now_epoch_ms();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_by,
            invite_code: generate_invite_code(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Validates field-level constraints before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::BlankFamilyName);
        }
        Ok(())
    }
}

/// Binds a user to a family with a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyMember {
    pub id: MemberId,
    pub family_id: FamilyId,
    pub user_id: UserId,
    pub role: FamilyRole,
    /// Epoch milliseconds.
    pub joined_at: i64,
}

impl FamilyMember {
    pub fn new(family_id: FamilyId, user_id: UserId, role: FamilyRole) -> Self {
        Self {
            id: Uuid::new_v4(),
            family_id,
            user_id,
            role,
            joined_at: now_epoch_ms(),
        }
    }
}

/// Produces a fresh opaque invite code.
pub(crate) fn generate_invite_code() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::FamilyRole;

    #[test]
    fn removal_matrix_follows_role_ordering() {
        assert!(FamilyRole::Owner.can_remove(FamilyRole::Admin));
        assert!(FamilyRole::Owner.can_remove(FamilyRole::Member));
        assert!(!FamilyRole::Owner.can_remove(FamilyRole::Owner));

        assert!(FamilyRole::Admin.can_remove(FamilyRole::Member));
        assert!(!FamilyRole::Admin.can_remove(FamilyRole::Admin));
        assert!(!FamilyRole::Admin.can_remove(FamilyRole::Owner));

        assert!(!FamilyRole::Member.can_remove(FamilyRole::Member));
    }

    #[test]
    fn generated_invite_codes_are_unique() {
        assert_ne!(super::generate_invite_code(), super::generate_invite_code());
    }
}
