use gtdflow_core::db::open_db_in_memory;
use gtdflow_core::repo::context_repo::SqliteContextRepository;
use gtdflow_core::repo::family_repo::SqliteFamilyRepository;
use gtdflow_core::repo::project_repo::{ProjectListQuery, SqliteProjectRepository};
use gtdflow_core::service::context_service::{ContextService, ContextServiceError};
use gtdflow_core::service::family_service::FamilyService;
use gtdflow_core::service::item_service::{ItemService, ProcessRequest};
use gtdflow_core::service::project_service::{
    NewProject, ProjectPatch, ProjectService, ProjectServiceError,
};
use gtdflow_core::{
    ItemType, ProjectHorizon, ProjectStatus, SqliteItemRepository, ValidationError,
    DEFAULT_CONTEXT_COLOR,
};
use rusqlite::Connection;
use uuid::Uuid;

fn contexts(conn: &Connection) -> ContextService<SqliteContextRepository<'_>> {
    ContextService::new(SqliteContextRepository::new(conn))
}

fn projects(
    conn: &Connection,
) -> ProjectService<SqliteProjectRepository<'_>, SqliteFamilyRepository<'_>> {
    ProjectService::new(
        SqliteProjectRepository::new(conn),
        SqliteFamilyRepository::new(conn),
    )
}

fn items(conn: &Connection) -> ItemService<
    SqliteItemRepository<'_>,
    SqliteProjectRepository<'_>,
    SqliteContextRepository<'_>,
    SqliteFamilyRepository<'_>,
> {
    ItemService::new(
        SqliteItemRepository::new(conn),
        SqliteProjectRepository::new(conn),
        SqliteContextRepository::new(conn),
        SqliteFamilyRepository::new(conn),
    )
}

#[test]
fn context_roundtrip_with_default_color() {
    let conn = open_db_in_memory().unwrap();
    let service = contexts(&conn);
    let owner = Uuid::new_v4();

    let context = service.create_context(owner, "@home", None).unwrap();
    assert_eq!(context.color, DEFAULT_CONTEXT_COLOR);

    let listed = service.list_contexts(owner).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "@home");
    assert_eq!(listed[0].color, DEFAULT_CONTEXT_COLOR);
}

#[test]
fn context_rejects_malformed_color() {
    let conn = open_db_in_memory().unwrap();
    let service = contexts(&conn);
    let owner = Uuid::new_v4();

    let error = service
        .create_context(owner, "@phone", Some("red".to_string()))
        .unwrap_err();
    assert!(matches!(
        error,
        ContextServiceError::Validation(ValidationError::InvalidContextColor(_))
    ));
}

#[test]
fn contexts_list_sorted_by_name() {
    let conn = open_db_in_memory().unwrap();
    let service = contexts(&conn);
    let owner = Uuid::new_v4();

    service.create_context(owner, "@phone", None).unwrap();
    service.create_context(owner, "@errands", None).unwrap();
    service.create_context(owner, "@home", None).unwrap();

    let names: Vec<String> = service
        .list_contexts(owner)
        .unwrap()
        .into_iter()
        .map(|context| context.name)
        .collect();
    assert_eq!(names, vec!["@errands", "@home", "@phone"]);
}

#[test]
fn context_update_is_owner_scoped() {
    let conn = open_db_in_memory().unwrap();
    let service = contexts(&conn);
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();

    let context = service.create_context(owner, "@office", None).unwrap();

    let renamed = service
        .update_context(owner, context.id, Some("@work".to_string()), None)
        .unwrap();
    assert_eq!(renamed.name, "@work");

    let error = service
        .update_context(stranger, context.id, Some("@stolen".to_string()), None)
        .unwrap_err();
    assert!(matches!(error, ContextServiceError::ContextNotFound(_)));
}

#[test]
fn deleting_context_clears_item_references() {
    let conn = open_db_in_memory().unwrap();
    let context_service = contexts(&conn);
    let item_service = items(&conn);
    let owner = Uuid::new_v4();

    let context = context_service.create_context(owner, "@home", None).unwrap();
    let item = item_service.capture(owner, "fix shelf", None).unwrap();
    let mut request = ProcessRequest::to(ItemType::NextAction);
    request.context_id = Some(context.id);
    item_service.process(owner, item.id, &request).unwrap();

    context_service.delete_context(owner, context.id).unwrap();

    // The item survives; the schema drops the dangling reference.
    let reloaded = item_service.get(owner, item.id).unwrap();
    assert!(reloaded.context_id.is_none());
    assert_eq!(reloaded.item_type, ItemType::NextAction);
}

#[test]
fn project_defaults_and_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let service = projects(&conn);
    let owner = Uuid::new_v4();

    let project = service
        .create_project(owner, NewProject::named("Write book"))
        .unwrap();
    assert_eq!(project.status, ProjectStatus::Active);
    assert_eq!(project.horizon, ProjectHorizon::Project);
    assert!(!project.is_shared());

    let loaded = service.get_project(owner, project.id).unwrap();
    assert_eq!(loaded.name, "Write book");
}

#[test]
fn project_rejects_blank_name_and_missing_parent() {
    let conn = open_db_in_memory().unwrap();
    let service = projects(&conn);
    let owner = Uuid::new_v4();

    let error = service
        .create_project(owner, NewProject::named("  "))
        .unwrap_err();
    assert!(matches!(error, ProjectServiceError::Validation(_)));

    let mut orphan = NewProject::named("Sub-project");
    orphan.parent_id = Some(Uuid::new_v4());
    let error = service.create_project(owner, orphan).unwrap_err();
    assert!(matches!(error, ProjectServiceError::ParentNotFound(_)));
}

#[test]
fn project_nesting_via_parent() {
    let conn = open_db_in_memory().unwrap();
    let service = projects(&conn);
    let owner = Uuid::new_v4();

    let area = service
        .create_project(owner, NewProject::named("Health"))
        .unwrap();
    let mut child = NewProject::named("Train for 10k");
    child.parent_id = Some(area.id);
    let project = service.create_project(owner, child).unwrap();
    assert_eq!(project.parent_id, Some(area.id));
}

#[test]
fn project_list_filters_by_status_and_horizon() {
    let conn = open_db_in_memory().unwrap();
    let service = projects(&conn);
    let owner = Uuid::new_v4();

    let mut goal = NewProject::named("Run marathon");
    goal.horizon = Some(ProjectHorizon::Goal);
    service.create_project(owner, goal).unwrap();

    let mut paused = NewProject::named("Learn welding");
    paused.status = Some(ProjectStatus::Someday);
    service.create_project(owner, paused).unwrap();

    service
        .create_project(owner, NewProject::named("Fix garage"))
        .unwrap();

    let goals = service
        .list_projects(
            owner,
            &ProjectListQuery {
                horizon: Some(ProjectHorizon::Goal),
                ..ProjectListQuery::default()
            },
        )
        .unwrap();
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0].name, "Run marathon");

    let active = service
        .list_projects(
            owner,
            &ProjectListQuery {
                status: Some(ProjectStatus::Active),
                ..ProjectListQuery::default()
            },
        )
        .unwrap();
    assert_eq!(active.len(), 2);
}

#[test]
fn family_members_see_shared_projects_in_lists() {
    let conn = open_db_in_memory().unwrap();
    let project_service = projects(&conn);
    let family_service = FamilyService::new(SqliteFamilyRepository::new(&conn));

    let owner = Uuid::new_v4();
    let partner = Uuid::new_v4();

    let family = family_service.create_family(owner, "Smiths").unwrap();
    family_service
        .join_family(partner, &family.invite_code)
        .unwrap();

    let mut shared = NewProject::named("Renovation");
    shared.family_id = Some(family.id);
    let shared = project_service.create_project(owner, shared).unwrap();

    project_service
        .create_project(owner, NewProject::named("Private diary"))
        .unwrap();

    let visible = project_service
        .list_projects(partner, &ProjectListQuery::default())
        .unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, shared.id);

    let loaded = project_service.get_project(partner, shared.id).unwrap();
    assert_eq!(loaded.name, "Renovation");
}

#[test]
fn project_mutation_is_owner_only() {
    let conn = open_db_in_memory().unwrap();
    let project_service = projects(&conn);
    let family_service = FamilyService::new(SqliteFamilyRepository::new(&conn));

    let owner = Uuid::new_v4();
    let partner = Uuid::new_v4();

    let family = family_service.create_family(owner, "Smiths").unwrap();
    family_service
        .join_family(partner, &family.invite_code)
        .unwrap();

    let mut shared = NewProject::named("Renovation");
    shared.family_id = Some(family.id);
    let project = project_service.create_project(owner, shared).unwrap();

    let patch = ProjectPatch {
        status: Some(ProjectStatus::Completed),
        ..ProjectPatch::default()
    };
    let error = project_service
        .update_project(partner, project.id, &patch)
        .unwrap_err();
    assert!(matches!(error, ProjectServiceError::NotProjectOwner(_)));

    let updated = project_service
        .update_project(owner, project.id, &patch)
        .unwrap();
    assert_eq!(updated.status, ProjectStatus::Completed);
}

#[test]
fn deleting_project_detaches_items() {
    let conn = open_db_in_memory().unwrap();
    let project_service = projects(&conn);
    let item_service = items(&conn);
    let owner = Uuid::new_v4();

    let project = project_service
        .create_project(owner, NewProject::named("Old initiative"))
        .unwrap();

    let item = item_service.capture(owner, "loose end", None).unwrap();
    let mut request = ProcessRequest::to(ItemType::NextAction);
    request.project_id = Some(project.id);
    item_service.process(owner, item.id, &request).unwrap();

    project_service.delete_project(owner, project.id).unwrap();

    let reloaded = item_service.get(owner, item.id).unwrap();
    assert!(reloaded.project_id.is_none());
}
