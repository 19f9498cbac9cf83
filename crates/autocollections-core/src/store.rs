//! Interfaces to the media host: the item catalog and the collection store.
//!
//! The sync driver reads candidate items through [`Catalog`] and edits
//! collections through [`CollectionStore`]. Both are async since real hosts
//! sit behind I/O; [`crate::library`] provides an in-memory implementation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::media::{ItemId, MediaItem, MediaKind, PersonRole};

/// Errors reported by a catalog or collection store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The collection handle does not refer to a known collection.
    #[error("collection not found: {0}")]
    CollectionNotFound(String),

    /// A collection with this name already exists.
    #[error("collection already exists: {0}")]
    CollectionExists(String),

    /// The host could not complete the request.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Reference to a collection in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionHandle {
    pub id: String,
    pub name: String,
}

/// Filter for catalog queries. Unset fields match everything.
///
/// Text comparisons are case-insensitive substring matches, so a query is
/// never narrower than a rule evaluated on the same pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    pub kind: Option<MediaKind>,
    pub tag: Option<String>,
    pub genre: Option<String>,
    pub person: Option<(String, PersonRole)>,
    /// Substring of the item name.
    pub text: Option<String>,
}

impl CatalogQuery {
    /// Query for all items of `kind`.
    pub fn kind(kind: MediaKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn with_person(mut self, name: impl Into<String>, role: PersonRole) -> Self {
        self.person = Some((name.into(), role));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Returns true if `item` passes every set filter.
    pub fn matches(&self, item: &MediaItem) -> bool {
        if self.kind.is_some_and(|kind| kind != item.kind) {
            return false;
        }
        if let Some(tag) = &self.tag {
            if !any_contains(&item.tags, tag) {
                return false;
            }
        }
        if let Some(genre) = &self.genre {
            if !any_contains(&item.genres, genre) {
                return false;
            }
        }
        if let Some((name, role)) = &self.person {
            if !item.people_with_role(*role).any(|n| contains(n, name)) {
                return false;
            }
        }
        if let Some(text) = &self.text {
            if !contains(&item.name, text) {
                return false;
            }
        }
        true
    }
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn any_contains(haystacks: &[String], needle: &str) -> bool {
    haystacks.iter().any(|h| contains(h, needle))
}

/// Read access to the media catalog.
#[allow(async_fn_in_trait)]
pub trait Catalog {
    /// Returns the items matching `query`, in catalog order.
    async fn query(&self, query: &CatalogQuery) -> StoreResult<Vec<MediaItem>>;
}

/// Collection editing.
///
/// Implementations must keep member order: `add_members` appends the ids
/// that are not yet members, in call order, and `remove_members` leaves the
/// relative order of the remaining members intact.
#[allow(async_fn_in_trait)]
pub trait CollectionStore {
    async fn find_collection(&self, name: &str) -> StoreResult<Option<CollectionHandle>>;

    async fn create_collection(&mut self, name: &str) -> StoreResult<CollectionHandle>;

    /// Returns the members of a collection in order.
    async fn get_members(&self, collection: &CollectionHandle) -> StoreResult<Vec<ItemId>>;

    async fn add_members(&mut self, collection: &CollectionHandle, ids: &[ItemId])
        -> StoreResult<()>;

    async fn remove_members(
        &mut self,
        collection: &CollectionHandle,
        ids: &[ItemId],
    ) -> StoreResult<()>;
}

impl<T: Catalog + ?Sized> Catalog for &T {
    async fn query(&self, query: &CatalogQuery) -> StoreResult<Vec<MediaItem>> {
        (**self).query(query).await
    }
}

impl<T: CollectionStore + ?Sized> CollectionStore for &mut T {
    async fn find_collection(&self, name: &str) -> StoreResult<Option<CollectionHandle>> {
        (**self).find_collection(name).await
    }

    async fn create_collection(&mut self, name: &str) -> StoreResult<CollectionHandle> {
        (**self).create_collection(name).await
    }

    async fn get_members(&self, collection: &CollectionHandle) -> StoreResult<Vec<ItemId>> {
        (**self).get_members(collection).await
    }

    async fn add_members(
        &mut self,
        collection: &CollectionHandle,
        ids: &[ItemId],
    ) -> StoreResult<()> {
        (**self).add_members(collection, ids).await
    }

    async fn remove_members(
        &mut self,
        collection: &CollectionHandle,
        ids: &[ItemId],
    ) -> StoreResult<()> {
        (**self).remove_members(collection, ids).await
    }
}
