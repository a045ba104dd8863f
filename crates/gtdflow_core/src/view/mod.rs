//! Derived GTD working views.
//!
//! # Responsibility
//! - Compute the inbox / next-actions / scheduled / waiting-for / someday /
//!   project read-models as pure functions of the current item collection.
//!
//! # Invariants
//! - No view keeps independent storage; every call recomputes from input.
//! - An item with `completed_at` set is excluded from every view here,
//!   regardless of its type.
//! - Sorting is stable: ties keep the source order of the input slice.

use crate::model::context::{Context, ContextId};
use crate::model::item::{Item, ItemType};
use crate::model::project::ProjectId;
use std::cmp::Ordering;

/// Display label for the bucket holding context-less next actions.
pub const NO_CONTEXT_LABEL: &str = "No Context";

/// One group of next actions sharing a context.
#[derive(Debug, PartialEq, Eq)]
pub struct ContextBucket<'a> {
    /// `None` for the sentinel "No Context" bucket.
    pub context_id: Option<ContextId>,
    /// Resolved context display name, or [`NO_CONTEXT_LABEL`].
    pub label: String,
    pub items: Vec<&'a Item>,
}

/// Inbox items, most recently captured first.
pub fn inbox_view(items: &[Item]) -> Vec<&Item> {
    let mut selected: Vec<&Item> = items
        .iter()
        .filter(|item| item.item_type == ItemType::Inbox && item.is_active())
        .collect();
    selected.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    selected
}

/// Next actions grouped by context.
///
/// Group order is first occurrence in the input. Items whose `context_id`
/// is unset, or no longer resolves against `contexts`, land in the
/// sentinel bucket. When `selected` is given, only that context's bucket
/// is returned (possibly empty input yields no buckets).
pub fn next_actions_view<'a>(
    items: &'a [Item],
    contexts: &[Context],
    selected: Option<ContextId>,
) -> Vec<ContextBucket<'a>> {
    let mut buckets: Vec<ContextBucket<'a>> = Vec::new();

    for item in items {
        if item.item_type != ItemType::NextAction || item.is_completed() {
            continue;
        }

        // A dangling context reference degrades to the sentinel bucket, the
        // same place the item lands after its context row is deleted.
        let resolved = item
            .context_id
            .and_then(|id| contexts.iter().find(|context| context.id == id));
        let bucket_key = resolved.map(|context| context.id);

        if let Some(filter) = selected {
            if bucket_key != Some(filter) {
                continue;
            }
        }

        match buckets.iter_mut().find(|bucket| bucket.context_id == bucket_key) {
            Some(bucket) => bucket.items.push(item),
            None => buckets.push(ContextBucket {
                context_id: bucket_key,
                label: resolved
                    .map(|context| context.name.clone())
                    .unwrap_or_else(|| NO_CONTEXT_LABEL.to_string()),
                items: vec![item],
            }),
        }
    }

    buckets
}

/// Scheduled items sorted by due date ascending; dateless items sort after
/// all dated ones, keeping their relative source order.
pub fn scheduled_view(items: &[Item]) -> Vec<&Item> {
    let mut selected: Vec<&Item> = items
        .iter()
        .filter(|item| item.item_type == ItemType::Scheduled && item.is_active())
        .collect();
    selected.sort_by(|a, b| compare_due_dates(a.due_date, b.due_date));
    selected
}

/// Waiting-for items in source order.
pub fn waiting_for_view(items: &[Item]) -> Vec<&Item> {
    filter_by_type(items, ItemType::WaitingFor)
}

/// Someday/maybe items in source order.
pub fn someday_view(items: &[Item]) -> Vec<&Item> {
    filter_by_type(items, ItemType::Someday)
}

/// Active items of one project, independent of type.
pub fn project_view(items: &[Item], project_id: ProjectId) -> Vec<&Item> {
    items
        .iter()
        .filter(|item| item.project_id == Some(project_id) && item.is_active())
        .collect()
}

fn filter_by_type(items: &[Item], item_type: ItemType) -> Vec<&Item> {
    items
        .iter()
        .filter(|item| item.item_type == item_type && item.is_active())
        .collect()
}

fn compare_due_dates(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (Some(lhs), Some(rhs)) => lhs.cmp(&rhs),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::compare_due_dates;
    use std::cmp::Ordering;

    #[test]
    fn dated_sorts_before_dateless() {
        assert_eq!(compare_due_dates(Some(10), None), Ordering::Less);
        assert_eq!(compare_due_dates(None, Some(10)), Ordering::Greater);
        assert_eq!(compare_due_dates(None, None), Ordering::Equal);
        assert_eq!(compare_due_dates(Some(1), Some(2)), Ordering::Less);
    }
}
