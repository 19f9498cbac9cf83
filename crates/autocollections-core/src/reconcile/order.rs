use super::{OrderKey, ReconciliationPlan, SortOrder};
use crate::media::ItemId;

/// Computes the smallest suffix of `current` to re-add so that the
/// collection ends up sorted by `order`.
///
/// The members are stably sorted by `key_of`. Everything before the first
/// position where the current and the sorted sequences differ already sits
/// in place and is left alone; the rest is removed and re-added in sorted
/// order. An already sorted collection yields an empty plan.
pub fn reorder<F>(current: &[ItemId], key_of: F, order: SortOrder) -> ReconciliationPlan
where
    F: Fn(&ItemId) -> OrderKey,
{
    let keys: Vec<OrderKey> = current.iter().map(&key_of).collect();
    let mut sorted: Vec<usize> = (0..current.len()).collect();
    sorted.sort_by(|&a, &b| order.compare(&keys[a], &keys[b]));

    let divergence = sorted
        .iter()
        .enumerate()
        .position(|(position, &index)| current[position] != current[index]);

    let Some(start) = divergence else {
        return ReconciliationPlan::default();
    };

    ReconciliationPlan {
        remove: current[start..].to_vec(),
        add_in_order: sorted[start..]
            .iter()
            .map(|&index| current[index].clone())
            .collect(),
    }
}
