//! In-memory media library with JSON file persistence.
//!
//! [`Library`] pairs a [`MediaCatalog`] with a [`CollectionBook`]. The two
//! halves implement [`Catalog`] and [`CollectionStore`] separately, so a
//! sync driver can read one while editing the other:
//!
//! ```
//! use autocollections_core::config::SyncConfig;
//! use autocollections_core::library::Library;
//! use autocollections_core::sync::CollectionSyncDriver;
//!
//! let mut library = Library::default();
//! let config = SyncConfig::default();
//! let driver = CollectionSyncDriver::new(&library.items, &mut library.collections, &config);
//! # drop(driver);
//! ```
//!
//! [`LibraryFile`] loads and saves a library as pretty-printed JSON. The
//! default location is `~/.local/share/ac/library.json` on Linux.

use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::media::{ItemId, MediaItem};
use crate::store::{
    Catalog, CatalogQuery, CollectionHandle, CollectionStore, StoreError, StoreResult,
};

/// Default library filename.
const LIBRARY_FILENAME: &str = "library.json";

/// Application qualifier (for XDG paths).
const QUALIFIER: &str = "";

/// Application organization (for XDG paths).
const ORGANIZATION: &str = "";

/// Application name (for XDG paths).
const APPLICATION: &str = "ac";

/// Errors that can occur while reading or writing a library file.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// Failed to determine the XDG data directory.
    #[error("failed to determine data directory: no valid home directory found")]
    NoDataDir,

    #[error("failed to read library file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write library file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create library directory '{path}': {source}")]
    CreateDirError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid library file '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for library file operations.
pub type LibraryResult<T> = Result<T, LibraryError>;

/// Every media item in the library, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaCatalog {
    items: Vec<MediaItem>,
}

impl MediaCatalog {
    pub fn new(items: Vec<MediaItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn get(&self, id: &ItemId) -> Option<&MediaItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Adds an item, replacing any existing item with the same id.
    pub fn insert(&mut self, item: MediaItem) {
        match self.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Catalog for MediaCatalog {
    async fn query(&self, query: &CatalogQuery) -> StoreResult<Vec<MediaItem>> {
        Ok(self
            .items
            .iter()
            .filter(|item| query.matches(item))
            .cloned()
            .collect())
    }
}

/// A stored collection and its ordered members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCollection {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub members: Vec<ItemId>,
}

impl StoredCollection {
    pub fn handle(&self) -> CollectionHandle {
        CollectionHandle {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// All collections in the library.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionBook {
    collections: Vec<StoredCollection>,
}

impl CollectionBook {
    pub fn collections(&self) -> &[StoredCollection] {
        &self.collections
    }

    /// Looks up a collection by exact name.
    pub fn by_name(&self, name: &str) -> Option<&StoredCollection> {
        self.collections.iter().find(|c| c.name == name)
    }

    /// Members of the named collection, or `None` if it does not exist.
    pub fn members_of(&self, name: &str) -> Option<&[ItemId]> {
        self.by_name(name).map(|c| c.members.as_slice())
    }

    fn by_handle(&self, handle: &CollectionHandle) -> StoreResult<&StoredCollection> {
        self.collections
            .iter()
            .find(|c| c.id == handle.id)
            .ok_or_else(|| StoreError::CollectionNotFound(handle.name.clone()))
    }

    fn by_handle_mut(&mut self, handle: &CollectionHandle) -> StoreResult<&mut StoredCollection> {
        self.collections
            .iter_mut()
            .find(|c| c.id == handle.id)
            .ok_or_else(|| StoreError::CollectionNotFound(handle.name.clone()))
    }
}

impl CollectionStore for CollectionBook {
    async fn find_collection(&self, name: &str) -> StoreResult<Option<CollectionHandle>> {
        Ok(self.by_name(name).map(StoredCollection::handle))
    }

    async fn create_collection(&mut self, name: &str) -> StoreResult<CollectionHandle> {
        if self.by_name(name).is_some() {
            return Err(StoreError::CollectionExists(name.to_string()));
        }
        let collection = StoredCollection {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            members: Vec::new(),
        };
        let handle = collection.handle();
        self.collections.push(collection);
        Ok(handle)
    }

    async fn get_members(&self, collection: &CollectionHandle) -> StoreResult<Vec<ItemId>> {
        Ok(self.by_handle(collection)?.members.clone())
    }

    async fn add_members(
        &mut self,
        collection: &CollectionHandle,
        ids: &[ItemId],
    ) -> StoreResult<()> {
        let stored = self.by_handle_mut(collection)?;
        for id in ids {
            if !stored.members.contains(id) {
                stored.members.push(id.clone());
            }
        }
        Ok(())
    }

    async fn remove_members(
        &mut self,
        collection: &CollectionHandle,
        ids: &[ItemId],
    ) -> StoreResult<()> {
        let stored = self.by_handle_mut(collection)?;
        stored.members.retain(|member| !ids.contains(member));
        Ok(())
    }
}

/// A media library: catalog items plus collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Library {
    #[serde(default)]
    pub items: MediaCatalog,
    #[serde(default)]
    pub collections: CollectionBook,
}

impl Library {
    pub fn new(items: Vec<MediaItem>) -> Self {
        Self {
            items: MediaCatalog::new(items),
            collections: CollectionBook::default(),
        }
    }
}

/// Location of a library on disk.
#[derive(Debug, Clone)]
pub struct LibraryFile {
    path: PathBuf,
}

impl LibraryFile {
    /// Creates a `LibraryFile` at the default XDG data path.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::NoDataDir` if the home directory cannot be determined.
    pub fn new() -> LibraryResult<Self> {
        Ok(Self {
            path: Self::default_path()?,
        })
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the default XDG data path for the library file.
    ///
    /// On Unix: `~/.local/share/ac/library.json`
    /// On macOS: `~/Library/Application Support/ac/library.json`
    pub fn default_path() -> LibraryResult<PathBuf> {
        let project_dirs = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
            .ok_or(LibraryError::NoDataDir)?;
        Ok(project_dirs.data_dir().join(LIBRARY_FILENAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the library.
    ///
    /// # Errors
    ///
    /// - Returns `LibraryError::ReadError` if the file cannot be read.
    /// - Returns `LibraryError::Json` if the file is not a valid library.
    pub async fn load(&self) -> LibraryResult<Library> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| LibraryError::ReadError {
                path: self.path.clone(),
                source: e,
            })?;
        serde_json::from_str(&contents).map_err(|e| LibraryError::Json {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Loads the library, returning an empty one if the file doesn't exist.
    pub async fn load_or_default(&self) -> LibraryResult<Library> {
        match self.load().await {
            Ok(library) => Ok(library),
            Err(LibraryError::ReadError { ref source, .. })
                if source.kind() == io::ErrorKind::NotFound =>
            {
                Ok(Library::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Saves the library atomically (temp file + rename), creating the
    /// parent directory if needed.
    pub async fn save(&self, library: &Library) -> LibraryResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LibraryError::CreateDirError {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let json = serde_json::to_string_pretty(library).map_err(|e| LibraryError::Json {
            path: self.path.clone(),
            source: e,
        })?;

        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &json)
            .await
            .map_err(|e| LibraryError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| LibraryError::WriteError {
                path: self.path.clone(),
                source: e,
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaKind;

    fn ids(raw: &[&str]) -> Vec<ItemId> {
        raw.iter().map(|id| ItemId::new(*id)).collect()
    }

    #[test]
    fn test_default_path_ends_with_library_json() {
        let path = LibraryFile::default_path().expect("should get default path");
        let path_str = path.to_string_lossy();
        assert!(
            path_str.ends_with("library.json"),
            "unexpected path: {}",
            path_str
        );
        assert!(path.is_absolute(), "path should be absolute: {:?}", path);
    }

    #[test]
    fn test_catalog_insert_replaces_by_id() {
        let mut catalog = MediaCatalog::default();
        catalog.insert(MediaItem::movie("1", "Old Name"));
        catalog.insert(MediaItem::movie("2", "Other"));
        catalog.insert(MediaItem::movie("1", "New Name"));

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(&ItemId::new("1")).unwrap().name, "New Name");
    }

    #[tokio::test]
    async fn test_catalog_query_filters() {
        let catalog = MediaCatalog::new(vec![
            MediaItem::movie("1", "Alien"),
            MediaItem::series("2", "Alien Nation"),
            MediaItem::movie("3", "Heat"),
        ]);

        let movies = catalog
            .query(&CatalogQuery::kind(MediaKind::Movie))
            .await
            .unwrap();
        assert_eq!(movies.len(), 2);

        let aliens = catalog
            .query(&CatalogQuery::default().with_text("alien"))
            .await
            .unwrap();
        assert_eq!(aliens.len(), 2);
    }

    #[tokio::test]
    async fn test_collection_lifecycle() {
        let mut book = CollectionBook::default();
        assert!(book.find_collection("Nolan").await.unwrap().is_none());

        let handle = book.create_collection("Nolan").await.unwrap();
        assert_eq!(handle.name, "Nolan");
        assert_eq!(book.find_collection("Nolan").await.unwrap(), Some(handle.clone()));

        book.add_members(&handle, &ids(&["a", "b", "c"])).await.unwrap();
        book.remove_members(&handle, &ids(&["b"])).await.unwrap();
        book.add_members(&handle, &ids(&["b", "a"])).await.unwrap();

        assert_eq!(book.get_members(&handle).await.unwrap(), ids(&["a", "c", "b"]));
        assert_eq!(book.members_of("Nolan"), Some(ids(&["a", "c", "b"]).as_slice()));
    }

    #[tokio::test]
    async fn test_create_duplicate_collection_fails() {
        let mut book = CollectionBook::default();
        book.create_collection("Dup").await.unwrap();
        let err = book.create_collection("Dup").await.unwrap_err();
        assert!(matches!(err, StoreError::CollectionExists(name) if name == "Dup"));
    }

    #[tokio::test]
    async fn test_unknown_handle_fails() {
        let mut book = CollectionBook::default();
        let handle = CollectionHandle {
            id: "missing".into(),
            name: "Ghost".into(),
        };
        assert!(matches!(
            book.get_members(&handle).await,
            Err(StoreError::CollectionNotFound(_))
        ));
        assert!(book.add_members(&handle, &ids(&["a"])).await.is_err());
    }

    #[test]
    fn test_library_json_shape() {
        let library: Library = serde_json::from_str(
            r#"{
                "items": [{"id": "1", "name": "Heat", "kind": "movie"}],
                "collections": [{"id": "c1", "name": "Mann", "members": ["1"]}]
            }"#,
        )
        .unwrap();

        assert_eq!(library.items.len(), 1);
        assert_eq!(library.collections.members_of("Mann"), Some(ids(&["1"]).as_slice()));
    }

    #[test]
    fn test_library_json_defaults() {
        let library: Library = serde_json::from_str("{}").unwrap();
        assert!(library.items.is_empty());
        assert!(library.collections.collections().is_empty());
    }
}
