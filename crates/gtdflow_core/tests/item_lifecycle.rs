use gtdflow_core::db::open_db_in_memory;
use gtdflow_core::repo::context_repo::SqliteContextRepository;
use gtdflow_core::repo::family_repo::SqliteFamilyRepository;
use gtdflow_core::repo::project_repo::SqliteProjectRepository;
use gtdflow_core::service::item_service::{
    ItemPatch, ItemService, ItemServiceError, ProcessRequest,
};
use gtdflow_core::{ItemListQuery, ItemPriority, ItemType, SqliteItemRepository};
use rusqlite::Connection;
use uuid::Uuid;

fn service(conn: &Connection) -> ItemService<
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
fn capture_lands_in_inbox() {
    let conn = open_db_in_memory().unwrap();
    let items = service(&conn);
    let owner = Uuid::new_v4();

    let item = items
        .capture(owner, "call plumber", Some("kitchen sink".to_string()))
        .unwrap();
    assert_eq!(item.item_type, ItemType::Inbox);

    let loaded = items.get(owner, item.id).unwrap();
    assert_eq!(loaded.title, "call plumber");
    assert_eq!(loaded.notes.as_deref(), Some("kitchen sink"));
    assert!(loaded.completed_at.is_none());
}

#[test]
fn capture_rejects_blank_title() {
    let conn = open_db_in_memory().unwrap();
    let items = service(&conn);

    let error = items.capture(Uuid::new_v4(), "   ", None).unwrap_err();
    assert!(matches!(error, ItemServiceError::Validation(_)));
}

#[test]
fn process_moves_item_out_of_inbox() {
    let conn = open_db_in_memory().unwrap();
    let items = service(&conn);
    let owner = Uuid::new_v4();

    let item = items.capture(owner, "draft report", None).unwrap();
    let mut request = ProcessRequest::to(ItemType::NextAction);
    request.priority = Some(ItemPriority::P2);

    let processed = items.process(owner, item.id, &request).unwrap();
    assert_eq!(processed.item_type, ItemType::NextAction);
    assert_eq!(processed.priority, Some(ItemPriority::P2));
    // Unsupplied fields keep their stored values.
    assert_eq!(processed.title, "draft report");
    assert!(processed.due_date.is_none());
}

#[test]
fn process_rejects_inbox_as_target() {
    let conn = open_db_in_memory().unwrap();
    let items = service(&conn);
    let owner = Uuid::new_v4();

    let item = items.capture(owner, "stray thought", None).unwrap();
    let error = items
        .process(owner, item.id, &ProcessRequest::to(ItemType::Inbox))
        .unwrap_err();
    assert!(matches!(
        error,
        ItemServiceError::InvalidTarget(ItemType::Inbox)
    ));
}

#[test]
fn process_rejects_completed_item() {
    let conn = open_db_in_memory().unwrap();
    let items = service(&conn);
    let owner = Uuid::new_v4();

    let item = items.capture(owner, "one-off chore", None).unwrap();
    items.complete(owner, item.id).unwrap();

    let error = items
        .process(owner, item.id, &ProcessRequest::to(ItemType::NextAction))
        .unwrap_err();
    assert!(matches!(
        error,
        ItemServiceError::CompletedItemTransition(_)
    ));
}

#[test]
fn process_with_unknown_context_fails() {
    let conn = open_db_in_memory().unwrap();
    let items = service(&conn);
    let owner = Uuid::new_v4();

    let item = items.capture(owner, "email accountant", None).unwrap();
    let mut request = ProcessRequest::to(ItemType::NextAction);
    request.context_id = Some(Uuid::new_v4());

    let error = items.process(owner, item.id, &request).unwrap_err();
    assert!(matches!(error, ItemServiceError::ContextNotFound(_)));
}

#[test]
fn scheduled_without_due_date_is_accepted() {
    let conn = open_db_in_memory().unwrap();
    let items = service(&conn);
    let owner = Uuid::new_v4();

    let item = items.capture(owner, "dentist sometime", None).unwrap();
    let processed = items
        .process(owner, item.id, &ProcessRequest::to(ItemType::Scheduled))
        .unwrap();
    assert_eq!(processed.item_type, ItemType::Scheduled);
    assert!(processed.due_date.is_none());
}

#[test]
fn completion_is_orthogonal_and_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let items = service(&conn);
    let owner = Uuid::new_v4();

    let item = items.capture(owner, "water plants", None).unwrap();
    items
        .process(owner, item.id, &ProcessRequest::to(ItemType::NextAction))
        .unwrap();

    let done = items.complete(owner, item.id).unwrap();
    // Type survives completion.
    assert_eq!(done.item_type, ItemType::NextAction);
    let first_stamp = done.completed_at.unwrap();

    let again = items.complete(owner, item.id).unwrap();
    assert_eq!(again.completed_at, Some(first_stamp));
}

#[test]
fn update_may_return_item_to_inbox() {
    let conn = open_db_in_memory().unwrap();
    let items = service(&conn);
    let owner = Uuid::new_v4();

    let item = items.capture(owner, "vague idea", None).unwrap();
    items
        .process(owner, item.id, &ProcessRequest::to(ItemType::Someday))
        .unwrap();

    let patch = ItemPatch {
        item_type: Some(ItemType::Inbox),
        ..ItemPatch::default()
    };
    let back = items.update(owner, item.id, &patch).unwrap();
    assert_eq!(back.item_type, ItemType::Inbox);
}

#[test]
fn list_excludes_completed_by_default() {
    let conn = open_db_in_memory().unwrap();
    let items = service(&conn);
    let owner = Uuid::new_v4();

    let keep = items.capture(owner, "still open", None).unwrap();
    let done = items.capture(owner, "already done", None).unwrap();
    items.complete(owner, done.id).unwrap();

    let open = items.list(owner, &ItemListQuery::default()).unwrap();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].id, keep.id);

    let all = items
        .list(
            owner,
            &ItemListQuery {
                include_completed: true,
                ..ItemListQuery::default()
            },
        )
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[test]
fn list_newest_capture_first() {
    let conn = open_db_in_memory().unwrap();
    let items = service(&conn);
    let owner = Uuid::new_v4();

    let first = items.capture(owner, "first", None).unwrap();
    let second = items.capture(owner, "second", None).unwrap();

    let listed = items.list(owner, &ItemListQuery::default()).unwrap();
    assert_eq!(listed[0].id, second.id);
    assert_eq!(listed[1].id, first.id);
}

#[test]
fn list_filters_by_type_and_priority() {
    let conn = open_db_in_memory().unwrap();
    let items = service(&conn);
    let owner = Uuid::new_v4();

    let urgent = items.capture(owner, "pay invoice", None).unwrap();
    let mut request = ProcessRequest::to(ItemType::NextAction);
    request.priority = Some(ItemPriority::P1);
    items.process(owner, urgent.id, &request).unwrap();

    let later = items.capture(owner, "read novel", None).unwrap();
    items
        .process(owner, later.id, &ProcessRequest::to(ItemType::Someday))
        .unwrap();

    let next_actions = items
        .list(
            owner,
            &ItemListQuery {
                item_type: Some(ItemType::NextAction),
                ..ItemListQuery::default()
            },
        )
        .unwrap();
    assert_eq!(next_actions.len(), 1);
    assert_eq!(next_actions[0].id, urgent.id);

    let p1 = items
        .list(
            owner,
            &ItemListQuery {
                priority: Some(ItemPriority::P1),
                ..ItemListQuery::default()
            },
        )
        .unwrap();
    assert_eq!(p1.len(), 1);
    assert_eq!(p1[0].id, urgent.id);
}

#[test]
fn other_users_cannot_see_private_items() {
    let conn = open_db_in_memory().unwrap();
    let items = service(&conn);
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();

    let item = items.capture(owner, "private note", None).unwrap();

    let error = items.get(stranger, item.id).unwrap_err();
    assert!(matches!(error, ItemServiceError::ItemNotFound(_)));
    assert!(items.list(stranger, &ItemListQuery::default()).unwrap().is_empty());
}

#[test]
fn delete_removes_item() {
    let conn = open_db_in_memory().unwrap();
    let items = service(&conn);
    let owner = Uuid::new_v4();

    let item = items.capture(owner, "obsolete", None).unwrap();
    items.delete(owner, item.id).unwrap();

    let error = items.get(owner, item.id).unwrap_err();
    assert!(matches!(error, ItemServiceError::ItemNotFound(_)));
}
