//! Collapses items that represent the same logical work.
//!
//! Libraries often hold the same movie more than once (different editions,
//! resolutions, or folders). Two items are duplicates when their trimmed,
//! lowercased titles and their premiere dates are equal. Items without a
//! title or without a premiere date cannot be keyed and are always kept.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::media::MediaItem;

/// Identity of a logical work: normalized title plus premiere date.
pub type DedupeKey = (String, DateTime<Utc>);

/// Returns the dedupe key for `item`, or `None` if it is exempt.
pub fn dedupe_key(item: &MediaItem) -> Option<DedupeKey> {
    if !item.has_title() {
        return None;
    }
    let premiere = item.premiere_date?;
    Some((item.name.trim().to_lowercase(), premiere))
}

/// Keeps the first item seen for each dedupe key.
///
/// The result lists keyed items in first-seen order followed by the exempt
/// items in their original order.
pub fn dedupe(items: Vec<MediaItem>) -> Vec<MediaItem> {
    let mut seen: HashSet<DedupeKey> = HashSet::with_capacity(items.len());
    let mut kept = Vec::with_capacity(items.len());
    let mut exempt = Vec::new();

    for item in items {
        match dedupe_key(&item) {
            None => exempt.push(item),
            Some(key) => {
                if seen.insert(key) {
                    kept.push(item);
                } else {
                    debug!(id = %item.id, name = %item.name, "dropping duplicate item");
                }
            }
        }
    }

    kept.extend(exempt);
    kept
}
