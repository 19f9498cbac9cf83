//! Rule-driven media collections.
//!
//! This crate keeps named collections of a media library in step with
//! declarative rules. A rule is either a criteria expression such as
//! `STUDIO "Marvel" AND GENRE "Action"` or a simple title-match pattern.
//!
//! - [`expression`] tokenizes, parses and evaluates criteria expressions.
//! - [`matcher`] answers criteria against a [`media::MediaItem`].
//! - [`dedupe`] collapses items that represent the same work.
//! - [`reconcile`] plans membership and ordering changes and validates the
//!   result.
//! - [`sync`] drives the whole pipeline against a [`store::Catalog`] and a
//!   [`store::CollectionStore`].
//! - [`library`] is a file-backed catalog and store used by the `ac` binary.

pub mod config;
pub mod dedupe;
pub mod expression;
pub mod library;
pub mod matcher;
pub mod media;
pub mod reconcile;
pub mod rules;
pub mod store;
pub mod sync;

pub use config::{ConfigError, SyncConfig};
pub use expression::{parse_expression, ExpressionError, ExpressionNode};
pub use library::{Library, LibraryError, LibraryFile};
pub use media::{ItemId, MediaItem, MediaKind};
pub use rules::{CollectionRule, ExpressionRule, TitleMatchRule};
pub use store::{Catalog, CollectionStore, StoreError};
pub use sync::{CollectionSyncDriver, RuleOutcome, SyncError, SyncReport};
