use std::collections::HashSet;

use serde::Serialize;
use tracing::{info, warn};

use crate::media::{ItemId, MediaItem};

/// Most missing or extra ids listed in a validation warning.
const MAX_LISTED: usize = 10;

/// Comparison of a collection's members with the items it should hold.
///
/// Counts are over distinct ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub expected: usize,
    pub actual: usize,
    pub matching: usize,
    /// Expected ids that are not members, in expected order.
    pub missing: Vec<ItemId>,
    /// Members that are not expected, in member order.
    pub extra: Vec<ItemId>,
}

impl ValidationReport {
    /// Returns true if the collection holds exactly the expected items.
    pub fn is_consistent(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }

    /// Logs the report for `collection`: one info line when consistent,
    /// warnings listing up to ten missing and extra ids otherwise.
    pub fn log(&self, collection: &str) {
        info!(
            %collection,
            expected = self.expected,
            actual = self.actual,
            matching = self.matching,
            missing = self.missing.len(),
            extra = self.extra.len(),
            "validated collection"
        );

        if self.is_consistent() {
            return;
        }
        if !self.missing.is_empty() {
            warn!(
                %collection,
                count = self.missing.len(),
                ids = %listed(&self.missing),
                "collection is missing expected items"
            );
        }
        if !self.extra.is_empty() {
            warn!(
                %collection,
                count = self.extra.len(),
                ids = %listed(&self.extra),
                "collection has unexpected items"
            );
        }
    }
}

/// Joins the first `MAX_LISTED` ids, noting how many were left out.
fn listed(ids: &[ItemId]) -> String {
    let shown: Vec<&str> = ids.iter().take(MAX_LISTED).map(ItemId::as_str).collect();
    let mut text = shown.join(", ");
    if ids.len() > MAX_LISTED {
        text.push_str(&format!(" ... and {} more", ids.len() - MAX_LISTED));
    }
    text
}

/// Compares the members `actual` with the `expected` items.
pub fn validate(expected: &[MediaItem], actual: &[ItemId]) -> ValidationReport {
    let expected_ids: HashSet<&ItemId> = expected.iter().map(|item| &item.id).collect();
    let actual_ids: HashSet<&ItemId> = actual.iter().collect();

    let mut reported = HashSet::new();
    let missing = expected
        .iter()
        .map(|item| &item.id)
        .filter(|id| !actual_ids.contains(id) && reported.insert(*id))
        .cloned()
        .collect();

    let mut reported = HashSet::new();
    let extra = actual
        .iter()
        .filter(|id| !expected_ids.contains(id) && reported.insert(*id))
        .cloned()
        .collect();

    ValidationReport {
        expected: expected_ids.len(),
        actual: actual_ids.len(),
        matching: expected_ids.intersection(&actual_ids).count(),
        missing,
        extra,
    }
}
