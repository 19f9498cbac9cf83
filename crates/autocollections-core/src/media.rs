//! Media items as seen by the collection engine.
//!
//! A `MediaItem` is a flattened view of a movie or series with every field
//! the criteria matcher and the ordering comparator read. Hosts build these
//! from whatever their catalog stores.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable identity of a media item within a library.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Whether an item is a movie or a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Series,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Movie => f.write_str("movie"),
            MediaKind::Series => f.write_str("series"),
        }
    }
}

/// The part a person played in a production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonRole {
    Actor,
    Director,
    /// Writers, producers, guest stars and anything else.
    #[serde(other)]
    Other,
}

/// A credited person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub role: PersonRole,
}

impl Person {
    pub fn new(name: impl Into<String>, role: PersonRole) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }
}

/// A movie or series in the library catalog.
///
/// Only `id` and `kind` are required when deserializing; every other field
/// defaults to empty/absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: ItemId,

    /// Display name. Blank means "no title".
    #[serde(default)]
    pub name: String,

    pub kind: MediaKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_year: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub premiere_date: Option<DateTime<Utc>>,

    /// When the item was added to the library.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub studios: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub people: Vec<Person>,

    /// Parental rating such as `PG-13` or `TV-MA`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub official_rating: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community_rating: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critic_rating: Option<f32>,

    /// Free-form user rating. Compared numerically when it parses as a number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_rating: Option<String>,

    /// File path for movies, folder path for series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Paths of the episodes of a series.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub episode_paths: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub audio_languages: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtitle_languages: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub production_locations: Vec<String>,

    /// Air date of the most recent episode of a series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_episode_air_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub played: bool,
}

impl MediaItem {
    /// Creates an item with only identity, name, and kind set.
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            production_year: None,
            premiere_date: None,
            date_added: None,
            genres: Vec::new(),
            studios: Vec::new(),
            tags: Vec::new(),
            people: Vec::new(),
            official_rating: None,
            community_rating: None,
            critic_rating: None,
            custom_rating: None,
            path: None,
            episode_paths: Vec::new(),
            audio_languages: Vec::new(),
            subtitle_languages: Vec::new(),
            production_locations: Vec::new(),
            last_episode_air_date: None,
            played: false,
        }
    }

    pub fn movie(id: impl Into<ItemId>, name: impl Into<String>) -> Self {
        Self::new(id, name, MediaKind::Movie)
    }

    pub fn series(id: impl Into<ItemId>, name: impl Into<String>) -> Self {
        Self::new(id, name, MediaKind::Series)
    }

    /// Returns true if the item has a non-blank title.
    pub fn has_title(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Names of the people credited with `role`.
    pub fn people_with_role(&self, role: PersonRole) -> impl Iterator<Item = &str> {
        self.people
            .iter()
            .filter(move |person| person.role == role)
            .map(|person| person.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_item() {
        let json = r#"{"id": "m1", "kind": "movie"}"#;
        let item: MediaItem = serde_json::from_str(json).unwrap();

        assert_eq!(item.id, ItemId::new("m1"));
        assert_eq!(item.kind, MediaKind::Movie);
        assert!(item.name.is_empty());
        assert!(item.genres.is_empty());
        assert!(item.premiere_date.is_none());
        assert!(!item.played);
    }

    #[test]
    fn test_deserialize_full_item() {
        let json = r#"{
            "id": "s1",
            "name": "The Expanse",
            "kind": "series",
            "production_year": 2015,
            "premiere_date": "2015-12-14T00:00:00Z",
            "genres": ["Sci-Fi", "Drama"],
            "people": [
                {"name": "Steven Strait", "role": "actor"},
                {"name": "Mark Fergus", "role": "writer"}
            ],
            "community_rating": 8.5,
            "episode_paths": ["/tv/expanse/s01e01.mkv"],
            "played": true
        }"#;
        let item: MediaItem = serde_json::from_str(json).unwrap();

        assert_eq!(item.kind, MediaKind::Series);
        assert_eq!(item.production_year, Some(2015));
        assert_eq!(item.genres, vec!["Sci-Fi", "Drama"]);
        assert_eq!(item.people[1].role, PersonRole::Other);
        assert_eq!(item.community_rating, Some(8.5));
        assert!(item.played);
    }

    #[test]
    fn test_serialize_skips_empty_fields() {
        let item = MediaItem::movie("m1", "Alien");
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(
            json,
            r#"{"id":"m1","name":"Alien","kind":"movie","played":false}"#
        );
    }

    #[test]
    fn test_has_title() {
        assert!(MediaItem::movie("1", "Heat").has_title());
        assert!(!MediaItem::movie("1", "   ").has_title());
        assert!(!MediaItem::movie("1", "").has_title());
    }

    #[test]
    fn test_people_with_role() {
        let item = MediaItem {
            people: vec![
                Person::new("Keanu Reeves", PersonRole::Actor),
                Person::new("Lana Wachowski", PersonRole::Director),
                Person::new("Carrie-Anne Moss", PersonRole::Actor),
            ],
            ..MediaItem::movie("1", "The Matrix")
        };

        let actors: Vec<_> = item.people_with_role(PersonRole::Actor).collect();
        assert_eq!(actors, vec!["Keanu Reeves", "Carrie-Anne Moss"]);
    }

    #[test]
    fn test_item_id_display_and_from() {
        let id: ItemId = "abc".into();
        assert_eq!(id.to_string(), "abc");
        assert_eq!(id.as_str(), "abc");
        assert_eq!(ItemId::from(String::from("abc")), id);
    }
}
