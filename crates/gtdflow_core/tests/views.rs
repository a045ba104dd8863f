use gtdflow_core::view::{
    inbox_view, next_actions_view, project_view, scheduled_view, someday_view, waiting_for_view,
    NO_CONTEXT_LABEL,
};
use gtdflow_core::{Context, Item, ItemType};
use uuid::Uuid;

fn item_of_type(owner: Uuid, title: &str, item_type: ItemType) -> Item {
    let mut item = Item::capture(owner, title, None);
    item.item_type = item_type;
    item
}

#[test]
fn inbox_view_newest_first_excluding_completed() {
    let owner = Uuid::new_v4();

    let mut older = Item::capture(owner, "older", None);
    older.created_at = 1_000;
    let mut newer = Item::capture(owner, "newer", None);
    newer.created_at = 2_000;
    let mut done = Item::capture(owner, "done", None);
    done.created_at = 3_000;
    done.completed_at = Some(3_500);
    let classified = item_of_type(owner, "classified", ItemType::NextAction);

    let items = vec![older, newer, done, classified];
    let inbox = inbox_view(&items);

    let titles: Vec<&str> = inbox.iter().map(|item| item.title.as_str()).collect();
    assert_eq!(titles, vec!["newer", "older"]);
}

#[test]
fn next_actions_group_by_first_context_occurrence() {
    let owner = Uuid::new_v4();
    let home = Context::new(owner, "@home", None);
    let phone = Context::new(owner, "@phone", None);

    let mut fix_door = item_of_type(owner, "fix door", ItemType::NextAction);
    fix_door.context_id = Some(home.id);
    let mut call_bank = item_of_type(owner, "call bank", ItemType::NextAction);
    call_bank.context_id = Some(phone.id);
    let mut vacuum = item_of_type(owner, "vacuum", ItemType::NextAction);
    vacuum.context_id = Some(home.id);
    let anywhere = item_of_type(owner, "think hard", ItemType::NextAction);

    let items = vec![fix_door, call_bank, vacuum, anywhere];
    let contexts = vec![home.clone(), phone.clone()];
    let buckets = next_actions_view(&items, &contexts, None);

    assert_eq!(buckets.len(), 3);
    assert_eq!(buckets[0].label, "@home");
    assert_eq!(buckets[0].items.len(), 2);
    assert_eq!(buckets[1].label, "@phone");
    assert_eq!(buckets[2].label, NO_CONTEXT_LABEL);
    assert!(buckets[2].context_id.is_none());
}

#[test]
fn dangling_context_falls_back_to_no_context() {
    let owner = Uuid::new_v4();

    let mut orphan = item_of_type(owner, "orphaned action", ItemType::NextAction);
    orphan.context_id = Some(Uuid::new_v4());

    let items = vec![orphan];
    let buckets = next_actions_view(&items, &[], None);

    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].label, NO_CONTEXT_LABEL);
    assert!(buckets[0].context_id.is_none());
}

#[test]
fn next_actions_filter_by_selected_context() {
    let owner = Uuid::new_v4();
    let home = Context::new(owner, "@home", None);
    let phone = Context::new(owner, "@phone", None);

    let mut fix_door = item_of_type(owner, "fix door", ItemType::NextAction);
    fix_door.context_id = Some(home.id);
    let mut call_bank = item_of_type(owner, "call bank", ItemType::NextAction);
    call_bank.context_id = Some(phone.id);

    let items = vec![fix_door, call_bank];
    let contexts = vec![home.clone(), phone];
    let buckets = next_actions_view(&items, &contexts, Some(home.id));

    assert_eq!(buckets.len(), 1);
    assert_eq!(buckets[0].context_id, Some(home.id));
    assert_eq!(buckets[0].items[0].title, "fix door");
}

#[test]
fn scheduled_sorts_dated_ascending_with_dateless_last() {
    let owner = Uuid::new_v4();

    let dateless_a = item_of_type(owner, "no date a", ItemType::Scheduled);
    let mut jan_third = item_of_type(owner, "jan 3", ItemType::Scheduled);
    jan_third.due_date = Some(1_704_240_000_000);
    let mut jan_first = item_of_type(owner, "jan 1", ItemType::Scheduled);
    jan_first.due_date = Some(1_704_067_200_000);
    let dateless_b = item_of_type(owner, "no date b", ItemType::Scheduled);

    let items = vec![dateless_a, jan_third, jan_first, dateless_b];
    let scheduled = scheduled_view(&items);

    let titles: Vec<&str> = scheduled.iter().map(|item| item.title.as_str()).collect();
    // Dateless items keep their relative input order at the tail.
    assert_eq!(titles, vec!["jan 1", "jan 3", "no date a", "no date b"]);
}

#[test]
fn waiting_and_someday_views_select_their_type() {
    let owner = Uuid::new_v4();

    let delegated = item_of_type(owner, "waiting on vendor", ItemType::WaitingFor);
    let dream = item_of_type(owner, "learn piano", ItemType::Someday);
    let mut finished = item_of_type(owner, "old wait", ItemType::WaitingFor);
    finished.completed_at = Some(1_000);

    let items = vec![delegated, dream, finished];

    let waiting = waiting_for_view(&items);
    assert_eq!(waiting.len(), 1);
    assert_eq!(waiting[0].title, "waiting on vendor");

    let someday = someday_view(&items);
    assert_eq!(someday.len(), 1);
    assert_eq!(someday[0].title, "learn piano");
}

#[test]
fn project_view_collects_active_items_of_any_type() {
    let owner = Uuid::new_v4();
    let project_id = Uuid::new_v4();

    let mut action = item_of_type(owner, "write outline", ItemType::NextAction);
    action.project_id = Some(project_id);
    let mut reference = item_of_type(owner, "style guide", ItemType::Reference);
    reference.project_id = Some(project_id);
    let mut done = item_of_type(owner, "kickoff", ItemType::NextAction);
    done.project_id = Some(project_id);
    done.completed_at = Some(1_000);
    let unrelated = item_of_type(owner, "other work", ItemType::NextAction);

    let items = vec![action, reference, done, unrelated];
    let grouped = project_view(&items, project_id);

    let titles: Vec<&str> = grouped.iter().map(|item| item.title.as_str()).collect();
    assert_eq!(titles, vec!["write outline", "style guide"]);
}
