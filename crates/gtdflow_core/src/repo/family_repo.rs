//! Family and membership repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist families, their single active invite code, and membership
//!   records.
//!
//! # Invariants
//! - `invite_code` is unique across families; rotation replaces the value
//!   in place so stale codes stop resolving.
//! - At most one membership per (family, user) pair.

use crate::model::family::{Family, FamilyId, FamilyMember, FamilyRole, MemberId};
use crate::model::UserId;
use crate::repo::{parse_uuid_column, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const FAMILY_SELECT_SQL: &str = "SELECT
    id,
    name,
    created_by,
    invite_code,
    created_at,
    updated_at
FROM families";

const MEMBER_SELECT_SQL: &str = "SELECT
    id,
    family_id,
    user_id,
    role,
    joined_at
FROM family_members";

/// Repository interface for family and membership persistence.
pub trait FamilyRepository {
    fn create_family(&self, family: &Family) -> RepoResult<FamilyId>;
    fn get_family(&self, id: FamilyId) -> RepoResult<Option<Family>>;
    /// Resolves the single family holding this invite code, if any.
    fn find_family_by_invite_code(&self, code: &str) -> RepoResult<Option<Family>>;
    /// Replaces the active invite code; the previous value stops resolving.
    fn set_invite_code(&self, id: FamilyId, code: &str) -> RepoResult<()>;
    fn add_member(&self, member: &FamilyMember) -> RepoResult<MemberId>;
    fn get_member(&self, family_id: FamilyId, user_id: UserId)
        -> RepoResult<Option<FamilyMember>>;
    fn list_members(&self, family_id: FamilyId) -> RepoResult<Vec<FamilyMember>>;
    fn remove_member(&self, family_id: FamilyId, user_id: UserId) -> RepoResult<()>;
}

/// SQLite-backed family repository.
pub struct SqliteFamilyRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteFamilyRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl FamilyRepository for SqliteFamilyRepository<'_> {
    fn create_family(&self, family: &Family) -> RepoResult<FamilyId> {
        family.validate()?;

        self.conn.execute(
            "INSERT INTO families (
                id,
                name,
                created_by,
                invite_code,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                family.id.to_string(),
                family.name.as_str(),
                family.created_by.to_string(),
                family.invite_code.as_str(),
                family.created_at,
                family.updated_at,
            ],
        )?;

        Ok(family.id)
    }

    fn get_family(&self, id: FamilyId) -> RepoResult<Option<Family>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{FAMILY_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query(params![id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_family_row(row)?));
        }

        Ok(None)
    }

    fn find_family_by_invite_code(&self, code: &str) -> RepoResult<Option<Family>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{FAMILY_SELECT_SQL} WHERE invite_code = ?1;"))?;

        let mut rows = stmt.query(params![code])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_family_row(row)?));
        }

        Ok(None)
    }

    fn set_invite_code(&self, id: FamilyId, code: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE families
             SET invite_code = ?1, updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?2;",
            params![code, id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn add_member(&self, member: &FamilyMember) -> RepoResult<MemberId> {
        self.conn.execute(
            "INSERT INTO family_members (
                id,
                family_id,
                user_id,
                role,
                joined_at
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                member.id.to_string(),
                member.family_id.to_string(),
                member.user_id.to_string(),
                role_to_db(member.role),
                member.joined_at,
            ],
        )?;

        Ok(member.id)
    }

    fn get_member(
        &self,
        family_id: FamilyId,
        user_id: UserId,
    ) -> RepoResult<Option<FamilyMember>> {
        let mut stmt = self.conn.prepare(&format!(
            "{MEMBER_SELECT_SQL} WHERE family_id = ?1 AND user_id = ?2;"
        ))?;

        let mut rows = stmt.query(params![family_id.to_string(), user_id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_member_row(row)?));
        }

        Ok(None)
    }

    fn list_members(&self, family_id: FamilyId) -> RepoResult<Vec<FamilyMember>> {
        let mut stmt = self.conn.prepare(&format!(
            "{MEMBER_SELECT_SQL} WHERE family_id = ?1 ORDER BY joined_at ASC, rowid ASC;"
        ))?;

        let mut rows = stmt.query(params![family_id.to_string()])?;
        let mut members = Vec::new();

        while let Some(row) = rows.next()? {
            members.push(parse_member_row(row)?);
        }

        Ok(members)
    }

    fn remove_member(&self, family_id: FamilyId, user_id: UserId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM family_members WHERE family_id = ?1 AND user_id = ?2;",
            params![family_id.to_string(), user_id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(user_id));
        }

        Ok(())
    }
}

fn parse_family_row(row: &Row<'_>) -> RepoResult<Family> {
    let id_text: String = row.get("id")?;
    let creator_text: String = row.get("created_by")?;

    let family = Family {
        id: parse_uuid_column(&id_text, "families.id")?,
        name: row.get("name")?,
        created_by: parse_uuid_column(&creator_text, "families.created_by")?,
        invite_code: row.get("invite_code")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    family.validate()?;
    Ok(family)
}

fn parse_member_row(row: &Row<'_>) -> RepoResult<FamilyMember> {
    let id_text: String = row.get("id")?;
    let family_text: String = row.get("family_id")?;
    let user_text: String = row.get("user_id")?;
    let role_text: String = row.get("role")?;

    let role = parse_role(&role_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid role `{role_text}` in family_members.role"
        ))
    })?;

    Ok(FamilyMember {
        id: parse_uuid_column(&id_text, "family_members.id")?,
        family_id: parse_uuid_column(&family_text, "family_members.family_id")?,
        user_id: parse_uuid_column(&user_text, "family_members.user_id")?,
        role,
        joined_at: row.get("joined_at")?,
    })
}

fn role_to_db(role: FamilyRole) -> &'static str {
    match role {
        FamilyRole::Owner => "owner",
        FamilyRole::Admin => "admin",
        FamilyRole::Member => "member",
    }
}

fn parse_role(value: &str) -> Option<FamilyRole> {
    match value {
        "owner" => Some(FamilyRole::Owner),
        "admin" => Some(FamilyRole::Admin),
        "member" => Some(FamilyRole::Member),
        _ => None,
    }
}
