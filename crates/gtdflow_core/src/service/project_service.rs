//! Project use-case service.
//!
//! # Responsibility
//! - Provide project CRUD with family-access checks layered above the
//!   repository.
//!
//! # Invariants
//! - Creating a family-shared project requires membership in that family.
//! - Reads are open to the owner and members of the sharing family;
//!   update/delete remain owner-only.
//! - A supplied `parent_id` must resolve to an existing project.

use crate::model::family::FamilyId;
use crate::model::project::{Project, ProjectHorizon, ProjectId, ProjectStatus};
use crate::model::{UserId, ValidationError};
use crate::repo::family_repo::FamilyRepository;
use crate::repo::project_repo::{ProjectListQuery, ProjectRepository};
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Creation request for a project.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub horizon: Option<ProjectHorizon>,
    pub parent_id: Option<ProjectId>,
    pub family_id: Option<FamilyId>,
}

impl NewProject {
    /// Creates a request with defaults (active, horizon `project`, private).
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            status: None,
            horizon: None,
            parent_id: None,
            family_id: None,
        }
    }
}

/// Field patch; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    pub horizon: Option<ProjectHorizon>,
    pub parent_id: Option<ProjectId>,
    pub family_id: Option<FamilyId>,
}

/// Errors from project operations.
#[derive(Debug)]
pub enum ProjectServiceError {
    Validation(ValidationError),
    /// Project does not exist or is not visible to the caller.
    ProjectNotFound(ProjectId),
    /// Parent reference does not resolve.
    ParentNotFound(ProjectId),
    /// Actor is not a member of the target family.
    NotAFamilyMember(FamilyId),
    /// Mutation attempted by someone other than the owner.
    NotProjectOwner(ProjectId),
    Repo(RepoError),
}

impl Display for ProjectServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ProjectNotFound(id) => write!(f, "project not found: {id}"),
            Self::ParentNotFound(id) => write!(f, "parent project not found: {id}"),
            Self::NotAFamilyMember(id) => write!(f, "not a member of family {id}"),
            Self::NotProjectOwner(id) => write!(f, "not the owner of project {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProjectServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ProjectServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::NotFound(id) => Self::ProjectNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Project service over injected repositories.
pub struct ProjectService<P, F>
where
    P: ProjectRepository,
    F: FamilyRepository,
{
    projects: P,
    families: F,
}

impl<P, F> ProjectService<P, F>
where
    P: ProjectRepository,
    F: FamilyRepository,
{
    pub fn new(projects: P, families: F) -> Self {
        Self { projects, families }
    }

    /// Creates a project owned by the actor.
    pub fn create_project(
        &self,
        actor: UserId,
        request: NewProject,
    ) -> Result<Project, ProjectServiceError> {
        if let Some(family_id) = request.family_id {
            self.require_member(family_id, actor)?;
        }
        if let Some(parent_id) = request.parent_id {
            self.projects
                .get_project(parent_id)?
                .ok_or(ProjectServiceError::ParentNotFound(parent_id))?;
        }

        let mut project = Project::new(actor, request.name);
        project.description = request.description;
        if let Some(status) = request.status {
            project.status = status;
        }
        if let Some(horizon) = request.horizon {
            project.horizon = horizon;
        }
        project.parent_id = request.parent_id;
        project.family_id = request.family_id;

        self.projects.create_project(&project)?;
        Ok(project)
    }

    /// Gets one project visible to the actor.
    pub fn get_project(
        &self,
        actor: UserId,
        project_id: ProjectId,
    ) -> Result<Project, ProjectServiceError> {
        let project = self
            .projects
            .get_project(project_id)?
            .ok_or(ProjectServiceError::ProjectNotFound(project_id))?;

        if project.owner_id == actor || self.is_family_member_of(&project, actor)? {
            return Ok(project);
        }

        Err(ProjectServiceError::ProjectNotFound(project_id))
    }

    /// Lists projects the actor owns plus family-shared ones they can see.
    pub fn list_projects(
        &self,
        actor: UserId,
        query: &ProjectListQuery,
    ) -> Result<Vec<Project>, ProjectServiceError> {
        Ok(self.projects.list_visible_projects(actor, query)?)
    }

    /// Applies a field patch; owner only.
    pub fn update_project(
        &self,
        actor: UserId,
        project_id: ProjectId,
        patch: &ProjectPatch,
    ) -> Result<Project, ProjectServiceError> {
        let mut project = self.require_owned(actor, project_id)?;

        if let Some(family_id) = patch.family_id {
            self.require_member(family_id, actor)?;
            project.family_id = Some(family_id);
        }
        if let Some(parent_id) = patch.parent_id {
            self.projects
                .get_project(parent_id)?
                .ok_or(ProjectServiceError::ParentNotFound(parent_id))?;
            project.parent_id = Some(parent_id);
        }
        if let Some(name) = &patch.name {
            project.name = name.clone();
        }
        if let Some(description) = &patch.description {
            project.description = Some(description.clone());
        }
        if let Some(status) = patch.status {
            project.status = status;
        }
        if let Some(horizon) = patch.horizon {
            project.horizon = horizon;
        }

        self.projects.update_project(&project)?;
        self.projects
            .get_project(project_id)?
            .ok_or(ProjectServiceError::ProjectNotFound(project_id))
    }

    /// Hard-deletes a project; owner only. Items referencing it fall back
    /// to project-less (schema clears the reference).
    pub fn delete_project(
        &self,
        actor: UserId,
        project_id: ProjectId,
    ) -> Result<(), ProjectServiceError> {
        self.require_owned(actor, project_id)?;
        self.projects.delete_project(project_id)?;
        Ok(())
    }

    fn require_owned(
        &self,
        actor: UserId,
        project_id: ProjectId,
    ) -> Result<Project, ProjectServiceError> {
        let project = self
            .projects
            .get_project(project_id)?
            .ok_or(ProjectServiceError::ProjectNotFound(project_id))?;
        if project.owner_id != actor {
            return Err(ProjectServiceError::NotProjectOwner(project_id));
        }
        Ok(project)
    }

    fn require_member(
        &self,
        family_id: FamilyId,
        user: UserId,
    ) -> Result<(), ProjectServiceError> {
        match self.families.get_member(family_id, user)? {
            Some(_) => Ok(()),
            None => Err(ProjectServiceError::NotAFamilyMember(family_id)),
        }
    }

    fn is_family_member_of(
        &self,
        project: &Project,
        user: UserId,
    ) -> Result<bool, ProjectServiceError> {
        match project.family_id {
            Some(family_id) => Ok(self.families.get_member(family_id, user)?.is_some()),
            None => Ok(false),
        }
    }
}
