use std::collections::HashSet;

use super::{OrderKey, ReconciliationPlan, SortOrder};
use crate::media::{ItemId, MediaItem};

/// Computes the membership changes that turn `current` into `desired`.
///
/// - `remove` holds the current members that are not desired, in their
///   current order.
/// - `add_in_order` holds the desired items that are not yet members,
///   stably sorted by `order`.
///
/// Reconciling again after the plan has been applied yields an empty plan.
pub fn reconcile(current: &[ItemId], desired: &[MediaItem], order: SortOrder) -> ReconciliationPlan {
    let desired_ids: HashSet<&ItemId> = desired.iter().map(|item| &item.id).collect();
    let mut known: HashSet<&ItemId> = current.iter().collect();

    let remove = current
        .iter()
        .filter(|id| !desired_ids.contains(id))
        .cloned()
        .collect();

    let mut additions: Vec<&MediaItem> = desired
        .iter()
        .filter(|item| known.insert(&item.id))
        .collect();
    additions.sort_by(|a, b| order.compare(&OrderKey::from(*a), &OrderKey::from(*b)));

    ReconciliationPlan {
        remove,
        add_in_order: additions.into_iter().map(|item| item.id.clone()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: &str, year: Option<i32>) -> MediaItem {
        MediaItem {
            production_year: year,
            ..MediaItem::movie(id, id)
        }
    }

    fn ids(raw: &[&str]) -> Vec<ItemId> {
        raw.iter().map(|id| ItemId::new(*id)).collect()
    }

    #[test]
    fn test_reconcile_in_sync() {
        let desired = vec![movie("a", Some(2000)), movie("b", Some(2001))];
        let plan = reconcile(&ids(&["b", "a"]), &desired, SortOrder::Descending);
        assert!(plan.is_empty());
    }

    #[test]
    fn test_reconcile_removes_in_current_order() {
        let desired = vec![movie("b", Some(2000))];
        let plan = reconcile(&ids(&["c", "b", "a"]), &desired, SortOrder::Descending);
        assert_eq!(plan.remove, ids(&["c", "a"]));
        assert!(plan.add_in_order.is_empty());
    }

    #[test]
    fn test_reconcile_adds_sorted_descending() {
        let desired = vec![
            movie("old", Some(1980)),
            movie("undated", None),
            movie("new", Some(2020)),
            movie("mid", Some(2000)),
        ];
        let plan = reconcile(&[], &desired, SortOrder::Descending);
        assert_eq!(plan.add_in_order, ids(&["new", "mid", "old", "undated"]));
    }

    #[test]
    fn test_reconcile_adds_sorted_ascending() {
        let desired = vec![
            movie("new", Some(2020)),
            movie("undated", None),
            movie("old", Some(1980)),
        ];
        let plan = reconcile(&[], &desired, SortOrder::Ascending);
        assert_eq!(plan.add_in_order, ids(&["undated", "old", "new"]));
    }

    #[test]
    fn test_reconcile_sort_is_stable() {
        let desired = vec![
            movie("x", Some(2000)),
            movie("y", Some(2000)),
            movie("z", Some(2000)),
        ];
        let plan = reconcile(&[], &desired, SortOrder::Descending);
        assert_eq!(plan.add_in_order, ids(&["x", "y", "z"]));
    }

    #[test]
    fn test_reconcile_ignores_duplicate_desired_ids() {
        let desired = vec![movie("a", Some(2000)), movie("a", Some(2000))];
        let plan = reconcile(&[], &desired, SortOrder::Descending);
        assert_eq!(plan.add_in_order, ids(&["a"]));
    }

    #[test]
    fn test_reconcile_is_idempotent_after_apply() {
        let current = ids(&["stale", "keep"]);
        let desired = vec![
            movie("keep", Some(2010)),
            movie("new1", Some(2020)),
            movie("new2", None),
        ];

        let plan = reconcile(&current, &desired, SortOrder::Descending);
        assert_eq!(plan.remove, ids(&["stale"]));
        assert_eq!(plan.add_in_order, ids(&["new1", "new2"]));

        let applied = plan.apply_to(&current);
        assert_eq!(applied, ids(&["keep", "new1", "new2"]));
        assert!(reconcile(&applied, &desired, SortOrder::Descending).is_empty());
    }

    #[test]
    fn test_reconcile_empty_desired_removes_everything() {
        let plan = reconcile(&ids(&["a", "b"]), &[], SortOrder::Descending);
        assert_eq!(plan.remove, ids(&["a", "b"]));
        assert!(plan.add_in_order.is_empty());
    }
}
