//! Membership and ordering reconciliation.
//!
//! Given the current members of a collection and the items that should be
//! in it, these functions compute the add/remove calls that converge the
//! collection with as little churn as possible. They never touch a store;
//! applying a plan is the caller's job.
//!
//! - [`reconcile`] fixes membership: removes stale members and appends new
//!   ones in sorted order.
//! - [`reorder`] fixes ordering: finds the first position where the
//!   collection diverges from sorted order and re-adds only that suffix.
//! - [`validate`] compares a collection with what it should contain after
//!   a plan was applied.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::media::{ItemId, MediaItem};

mod membership;
mod order;
mod validate;

pub use membership::reconcile;
pub use order::reorder;
pub use validate::{validate, ValidationReport};

/// Add and remove calls for one collection.
///
/// Removals are applied first, then additions are appended in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationPlan {
    pub remove: Vec<ItemId>,
    pub add_in_order: Vec<ItemId>,
}

impl ReconciliationPlan {
    /// Returns true if the plan makes no calls.
    pub fn is_empty(&self) -> bool {
        self.remove.is_empty() && self.add_in_order.is_empty()
    }

    /// Returns the member list that results from applying this plan to
    /// `members`: every removed id is dropped, then each added id that is
    /// not already a member is appended.
    pub fn apply_to(&self, members: &[ItemId]) -> Vec<ItemId> {
        let removed: HashSet<&ItemId> = self.remove.iter().collect();
        let mut result: Vec<ItemId> = members
            .iter()
            .filter(|id| !removed.contains(id))
            .cloned()
            .collect();

        for id in &self.add_in_order {
            if !result.contains(id) {
                result.push(id.clone());
            }
        }
        result
    }
}

/// Direction of the collection ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Newest first; items with no year or date go last.
    #[default]
    Descending,
    /// Oldest first; items with no year or date go first.
    Ascending,
}

impl SortOrder {
    /// Compares two order keys in this direction.
    pub fn compare(self, a: &OrderKey, b: &OrderKey) -> Ordering {
        match self {
            SortOrder::Descending => b.cmp(a),
            SortOrder::Ascending => a.cmp(b),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Descending => f.write_str("descending"),
            SortOrder::Ascending => f.write_str("ascending"),
        }
    }
}

/// Sort key of a collection member: production year, then premiere date.
///
/// A missing value sorts before any present value, so it is the earliest
/// in ascending order and the last in descending order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct OrderKey {
    pub year: Option<i32>,
    pub premiere_date: Option<DateTime<Utc>>,
}

impl From<&MediaItem> for OrderKey {
    fn from(item: &MediaItem) -> Self {
        Self {
            year: item.production_year,
            premiere_date: item.premiere_date,
        }
    }
}
