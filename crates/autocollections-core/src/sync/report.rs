//! Plans and outcomes produced by the sync driver.

use serde::Serialize;

use crate::media::{ItemId, MediaItem};
use crate::reconcile::{ReconciliationPlan, ValidationReport};
use crate::store::CollectionHandle;

/// Membership and ordering changes for one collection.
///
/// `reorder` is computed against the member list that results from
/// applying `membership`, so the two are applied in that order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncPlan {
    pub membership: ReconciliationPlan,
    pub reorder: ReconciliationPlan,
}

impl SyncPlan {
    pub fn is_empty(&self) -> bool {
        self.membership.is_empty() && self.reorder.is_empty()
    }
}

/// Everything the driver decided for one rule before touching the store.
#[derive(Debug, Clone)]
pub struct RulePlan {
    pub collection_name: String,
    /// The target collection. `None` only in a dry run when the collection
    /// does not exist yet.
    pub collection: Option<CollectionHandle>,
    /// True if the collection was created while planning.
    pub created: bool,
    /// Deduplicated items that should be in the collection.
    pub desired: Vec<MediaItem>,
    /// Members at the time of planning.
    pub current: Vec<ItemId>,
    pub plan: SyncPlan,
}

impl RulePlan {
    /// Member list after both plans are applied.
    pub fn expected_members(&self) -> Vec<ItemId> {
        let after_membership = self.plan.membership.apply_to(&self.current);
        self.plan.reorder.apply_to(&after_membership)
    }
}

/// Summary of one synced collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub collection_name: String,
    pub created: bool,
    pub dry_run: bool,
    /// Number of items the rule selected after dedupe.
    pub matched: usize,
    pub removed: usize,
    pub added: usize,
    /// Number of members re-added to fix ordering.
    pub reordered: usize,
    /// Post-apply check; absent in a dry run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationReport>,
}

impl SyncReport {
    pub(crate) fn from_plan(plan: &RulePlan, dry_run: bool) -> Self {
        Self {
            collection_name: plan.collection_name.clone(),
            created: plan.created,
            dry_run,
            matched: plan.desired.len(),
            removed: plan.plan.membership.remove.len(),
            added: plan.plan.membership.add_in_order.len(),
            reordered: plan.plan.reorder.add_in_order.len(),
            validation: None,
        }
    }

    pub fn is_unchanged(&self) -> bool {
        !self.created && self.removed == 0 && self.added == 0 && self.reordered == 0
    }
}

/// Result of processing one rule in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RuleOutcome {
    /// The collection was reconciled (or planned, in a dry run).
    Synced(SyncReport),
    /// The rule could not be compiled; nothing was touched.
    Skipped {
        collection_name: String,
        errors: Vec<String>,
    },
    /// The store failed part way; the collection may be partially updated.
    Failed {
        collection_name: String,
        error: String,
    },
}

impl RuleOutcome {
    pub fn collection_name(&self) -> &str {
        match self {
            RuleOutcome::Synced(report) => &report.collection_name,
            RuleOutcome::Skipped {
                collection_name, ..
            }
            | RuleOutcome::Failed {
                collection_name, ..
            } => collection_name,
        }
    }

    pub fn is_synced(&self) -> bool {
        matches!(self, RuleOutcome::Synced(_))
    }
}
