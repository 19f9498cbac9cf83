//! Collection sync driver.
//!
//! For each rule the driver runs one pipeline:
//!
//! 1. Compile the rule into an expression.
//! 2. Query the catalog for movies and series and keep the items the
//!    expression matches.
//! 3. Dedupe the matches.
//! 4. Find the collection, creating it if needed.
//! 5. Take one snapshot of the members, plan the membership changes, and
//!    plan the reordering against the simulated post-membership state.
//! 6. Apply removals, additions, then the reorder calls, and validate the
//!    result against a fresh read of the members.
//!
//! In a dry run steps 1 to 5 still happen (without creating collections)
//! and nothing is written.
//!
//! # Example
//!
//! ```
//! use autocollections_core::config::SyncConfig;
//! use autocollections_core::library::Library;
//! use autocollections_core::media::MediaItem;
//! use autocollections_core::rules::ExpressionRule;
//! use autocollections_core::sync::CollectionSyncDriver;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut library = Library::new(vec![
//!     MediaItem { genres: vec!["Action".into()], ..MediaItem::movie("1", "Heat") },
//!     MediaItem::movie("2", "Amelie"),
//! ]);
//! let config = SyncConfig {
//!     expression_collections: vec![ExpressionRule::new("Action", r#"GENRE "Action""#)],
//!     ..SyncConfig::default()
//! };
//!
//! let mut driver = CollectionSyncDriver::new(&library.items, &mut library.collections, &config);
//! let outcomes = driver.sync_all(&config.rules()).await;
//! assert!(outcomes[0].is_synced());
//! assert_eq!(library.collections.members_of("Action").map(|m| m.len()), Some(1));
//! # }
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, instrument};

use crate::config::SyncConfig;
use crate::dedupe::dedupe;
use crate::expression::ExpressionNode;
use crate::matcher::ItemMatcher;
use crate::media::{ItemId, MediaItem, MediaKind};
use crate::reconcile::{reconcile, reorder, validate, OrderKey};
use crate::rules::CollectionRule;
use crate::store::{Catalog, CollectionHandle, CollectionStore, StoreError};

mod report;

pub use report::{RuleOutcome, RulePlan, SyncPlan, SyncReport};

/// Media kinds queried for every rule, in query order.
const QUERIED_KINDS: [MediaKind; 2] = [MediaKind::Movie, MediaKind::Series];

/// Errors that can occur while syncing one collection.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The rule's expression (or name) is invalid.
    #[error("invalid rule for collection '{collection}': {}", .errors.join("; "))]
    InvalidRule {
        collection: String,
        errors: Vec<String>,
    },

    /// The catalog or collection store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for sync operations.
pub type SyncResult<T> = std::result::Result<T, SyncError>;

/// Reconciles collections in a store with the rules that define them.
///
/// The driver reads candidate items from `catalog` and edits `store`. Pass
/// references to keep ownership with the caller; `&C` and `&mut S`
/// implement the traits whenever `C` and `S` do.
pub struct CollectionSyncDriver<'c, C, S> {
    catalog: C,
    store: S,
    config: &'c SyncConfig,
    now: DateTime<Utc>,
}

impl<'c, C, S> CollectionSyncDriver<'c, C, S>
where
    C: Catalog,
    S: CollectionStore,
{
    pub fn new(catalog: C, store: S, config: &'c SyncConfig) -> Self {
        Self {
            catalog,
            store,
            config,
            now: Utc::now(),
        }
    }

    /// Sets the instant date criteria are measured from.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Returns the deduplicated catalog items matching `expression`.
    pub async fn desired_items(
        &self,
        rule: &CollectionRule,
        expression: &ExpressionNode,
    ) -> SyncResult<Vec<MediaItem>> {
        let case_sensitive = rule.case_sensitive();
        let mut matched = Vec::new();

        for kind in QUERIED_KINDS {
            if !rule.wants(kind) {
                continue;
            }
            let candidates = self.catalog.query(&rule.catalog_query(kind)).await?;
            let before = matched.len();
            matched.extend(candidates.into_iter().filter(|item| {
                expression.evaluate(&ItemMatcher::at(item, case_sensitive, self.now))
            }));
            debug!(%kind, count = matched.len() - before, "matched catalog items");
        }

        Ok(dedupe(matched))
    }

    /// Computes the changes for one rule without applying them.
    ///
    /// Creates the target collection if it does not exist, unless the
    /// config is a dry run.
    ///
    /// # Errors
    ///
    /// - `SyncError::InvalidRule` if the rule does not compile
    /// - `SyncError::Store` if a catalog or store call fails
    pub async fn plan_rule(&mut self, rule: &CollectionRule) -> SyncResult<RulePlan> {
        let collection_name = rule.collection_name();
        let compiled = rule.compile();
        let Some(expression) = compiled.expression else {
            return Err(SyncError::InvalidRule {
                collection: collection_name,
                errors: compiled.parse_errors,
            });
        };

        let desired = self.desired_items(rule, &expression).await?;
        let (collection, created) = self.find_or_create(&collection_name).await?;

        let current = match &collection {
            Some(handle) => self.store.get_members(handle).await?,
            None => Vec::new(),
        };

        let order = self.config.sort_order;
        let membership = reconcile(&current, &desired, order);
        let after_membership = membership.apply_to(&current);

        let keys: HashMap<&ItemId, OrderKey> = desired
            .iter()
            .map(|item| (&item.id, OrderKey::from(item)))
            .collect();
        let reorder_plan = reorder(
            &after_membership,
            |id| keys.get(id).copied().unwrap_or_default(),
            order,
        );

        Ok(RulePlan {
            collection_name,
            collection,
            created,
            desired,
            current,
            plan: SyncPlan {
                membership,
                reorder: reorder_plan,
            },
        })
    }

    async fn find_or_create(
        &mut self,
        name: &str,
    ) -> SyncResult<(Option<CollectionHandle>, bool)> {
        if let Some(handle) = self.store.find_collection(name).await? {
            return Ok((Some(handle), false));
        }
        if self.config.dry_run {
            info!(collection = name, "dry run: would create collection");
            return Ok((None, false));
        }

        info!(collection = name, "creating collection");
        let handle = self.store.create_collection(name).await?;
        Ok((Some(handle), true))
    }

    /// Plans and applies one rule, then validates the collection.
    #[instrument(skip_all, fields(collection = %rule.collection_name()))]
    pub async fn sync_rule(&mut self, rule: &CollectionRule) -> SyncResult<SyncReport> {
        let plan = self.plan_rule(rule).await?;
        let mut report = SyncReport::from_plan(&plan, self.config.dry_run);

        info!(
            matched = report.matched,
            remove = report.removed,
            add = report.added,
            reorder = report.reordered,
            "planned collection sync"
        );

        let Some(handle) = plan.collection.as_ref().filter(|_| !self.config.dry_run) else {
            return Ok(report);
        };

        let SyncPlan {
            membership,
            reorder: ordering,
        } = &plan.plan;
        self.remove(handle, &membership.remove).await?;
        self.add(handle, &membership.add_in_order).await?;
        self.remove(handle, &ordering.remove).await?;
        self.add(handle, &ordering.add_in_order).await?;

        let members = self.store.get_members(handle).await?;
        let validation = validate(&plan.desired, &members);
        validation.log(&plan.collection_name);
        report.validation = Some(validation);

        Ok(report)
    }

    async fn remove(&mut self, handle: &CollectionHandle, ids: &[ItemId]) -> SyncResult<()> {
        if !ids.is_empty() {
            debug!(count = ids.len(), "removing members");
            self.store.remove_members(handle, ids).await?;
        }
        Ok(())
    }

    async fn add(&mut self, handle: &CollectionHandle, ids: &[ItemId]) -> SyncResult<()> {
        if !ids.is_empty() {
            debug!(count = ids.len(), "adding members");
            self.store.add_members(handle, ids).await?;
        }
        Ok(())
    }

    /// Syncs every rule in order.
    ///
    /// A rule that fails to compile is skipped and a store failure ends
    /// only that rule; both are logged and the remaining rules still run.
    /// Nothing is retried or rolled back.
    pub async fn sync_all(&mut self, rules: &[CollectionRule]) -> Vec<RuleOutcome> {
        let mut outcomes = Vec::with_capacity(rules.len());

        for rule in rules {
            let outcome = match self.sync_rule(rule).await {
                Ok(report) => RuleOutcome::Synced(report),
                Err(SyncError::InvalidRule { collection, errors }) => {
                    error!(
                        collection = %collection,
                        errors = %errors.join("; "),
                        "skipping rule with invalid expression"
                    );
                    RuleOutcome::Skipped {
                        collection_name: collection,
                        errors,
                    }
                }
                Err(e) => {
                    let collection_name = rule.collection_name();
                    error!(collection = %collection_name, error = %e, "failed to sync collection");
                    RuleOutcome::Failed {
                        collection_name,
                        error: e.to_string(),
                    }
                }
            };
            outcomes.push(outcome);
        }

        let synced = outcomes.iter().filter(|o| o.is_synced()).count();
        info!(
            total = outcomes.len(),
            synced = synced,
            "completed collection sync"
        );
        outcomes
    }
}
