//! Default criteria matcher over [`MediaItem`].
//!
//! Text criteria use substring containment. Numeric criteria (ratings and
//! year) and date criteria (release, added, last episode air) accept a
//! comparison prefix:
//!
//! | operand | numeric | date (days ago) |
//! |---------|---------|-----------------|
//! | `>=7`   | value >= 7 | at least 7 days ago |
//! | `<=7`   | value <= 7 | at most 7 days ago |
//! | `>7`    | value > 7 | more than 7 days ago |
//! | `<7`    | value < 7 | less than 7 days ago |
//! | `=7`    | within 0.1 of 7 | within one day of 7 days ago |
//! | `7`     | same as `=7` | same as `>7` |
//!
//! A missing field or an operand that does not parse never matches.

use chrono::{DateTime, Utc};
use tracing::trace;

use crate::expression::{CriteriaKind, CriteriaMatcher};
use crate::media::{MediaItem, MediaKind, PersonRole};

/// Tolerance for `=` and bare numeric comparisons.
const NUMERIC_TOLERANCE: f64 = 0.1;

/// Tolerance in days for `=` date comparisons.
const DAY_TOLERANCE: f64 = 1.0;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Evaluates criteria against a single media item.
///
/// # Example
///
/// ```
/// use autocollections_core::expression::parse_expression;
/// use autocollections_core::matcher::ItemMatcher;
/// use autocollections_core::media::MediaItem;
///
/// let item = MediaItem {
///     genres: vec!["Action".to_string()],
///     community_rating: Some(7.8),
///     ..MediaItem::movie("1", "Heat")
/// };
///
/// let expr = parse_expression(r#"GENRE "action" AND USERRATING ">=7.5""#).unwrap();
/// assert!(expr.evaluate(&ItemMatcher::new(&item, false)));
/// assert!(!expr.evaluate(&ItemMatcher::new(&item, true)));
/// ```
#[derive(Debug, Clone)]
pub struct ItemMatcher<'a> {
    item: &'a MediaItem,
    case_sensitive: bool,
    now: DateTime<Utc>,
}

impl<'a> ItemMatcher<'a> {
    /// Creates a matcher that measures date criteria from the current time.
    pub fn new(item: &'a MediaItem, case_sensitive: bool) -> Self {
        Self::at(item, case_sensitive, Utc::now())
    }

    /// Creates a matcher that measures date criteria from `now`.
    pub fn at(item: &'a MediaItem, case_sensitive: bool, now: DateTime<Utc>) -> Self {
        Self {
            item,
            case_sensitive,
            now,
        }
    }

    fn contains(&self, haystack: &str, needle: &str) -> bool {
        if self.case_sensitive {
            haystack.contains(needle)
        } else {
            haystack.to_lowercase().contains(&needle.to_lowercase())
        }
    }

    fn any_contains(&self, haystacks: &[String], needle: &str) -> bool {
        haystacks.iter().any(|h| self.contains(h, needle))
    }

    fn optional_contains(&self, haystack: Option<&str>, needle: &str) -> bool {
        haystack
            .filter(|h| !h.is_empty())
            .is_some_and(|h| self.contains(h, needle))
    }

    fn has_person(&self, role: PersonRole, needle: &str) -> bool {
        self.item
            .people_with_role(role)
            .any(|name| self.contains(name, needle))
    }

    fn custom_rating_matches(&self, value: &str) -> bool {
        let Some(rating) = self
            .item
            .custom_rating
            .as_deref()
            .filter(|r| !r.trim().is_empty())
        else {
            return false;
        };

        if looks_numeric(value) {
            if let Ok(actual) = rating.trim().parse::<f64>() {
                return compare_numeric(Some(actual), value);
            }
        }
        self.contains(rating, value)
    }

    fn filename_matches(&self, value: &str) -> bool {
        self.optional_contains(self.item.path.as_deref(), value)
            || self.any_contains(&self.item.episode_paths, value)
    }

    fn last_episode_air_date(&self) -> Option<DateTime<Utc>> {
        match self.item.kind {
            MediaKind::Series => self.item.last_episode_air_date,
            MediaKind::Movie => None,
        }
    }
}

impl CriteriaMatcher for ItemMatcher<'_> {
    fn matches(&self, kind: CriteriaKind, value: &str) -> bool {
        let item = self.item;
        match kind {
            CriteriaKind::Title => self.contains(&item.name, value),
            CriteriaKind::Genre => self.any_contains(&item.genres, value),
            CriteriaKind::Studio => self.any_contains(&item.studios, value),
            CriteriaKind::Tag => self.any_contains(&item.tags, value),
            CriteriaKind::Actor => self.has_person(PersonRole::Actor, value),
            CriteriaKind::Director => self.has_person(PersonRole::Director, value),
            CriteriaKind::IsMovie => item.kind == MediaKind::Movie,
            CriteriaKind::IsShow => item.kind == MediaKind::Series,
            CriteriaKind::ParentalRating => {
                self.optional_contains(item.official_rating.as_deref(), value)
            }
            CriteriaKind::CommunityRating => {
                compare_numeric(item.community_rating.map(f64::from), value)
            }
            CriteriaKind::CriticsRating => {
                compare_numeric(item.critic_rating.map(f64::from), value)
            }
            CriteriaKind::ProductionLocation => {
                self.any_contains(&item.production_locations, value)
            }
            CriteriaKind::AudioLanguage => self.any_contains(&item.audio_languages, value),
            CriteriaKind::Subtitle => self.any_contains(&item.subtitle_languages, value),
            CriteriaKind::Year => compare_numeric(item.production_year.map(f64::from), value),
            CriteriaKind::CustomRating => self.custom_rating_matches(value),
            CriteriaKind::ReleaseDate => compare_days_ago(item.premiere_date, value, self.now),
            CriteriaKind::AddedDate => compare_days_ago(item.date_added, value, self.now),
            CriteriaKind::EpisodeAirDate => {
                compare_days_ago(self.last_episode_air_date(), value, self.now)
            }
            CriteriaKind::Unplayed => !item.played,
            CriteriaKind::Watched => item.played,
            CriteriaKind::Filename => self.filename_matches(value),
        }
    }
}

/// Comparison operator parsed from the front of an operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    AtLeast,
    AtMost,
    Above,
    Below,
    Equal,
}

/// Prefixes in match order; two-character operators come first.
const COMPARISON_PREFIXES: &[(&str, Comparison)] = &[
    (">=", Comparison::AtLeast),
    ("<=", Comparison::AtMost),
    (">", Comparison::Above),
    ("<", Comparison::Below),
    ("=", Comparison::Equal),
];

impl Comparison {
    /// Splits `operand` into an operator and the remaining number text.
    /// Operands without a prefix use `bare`.
    fn split(operand: &str, bare: Comparison) -> (Comparison, &str) {
        let operand = operand.trim();
        COMPARISON_PREFIXES
            .iter()
            .find_map(|(prefix, comparison)| {
                operand
                    .strip_prefix(*prefix)
                    .map(|rest| (*comparison, rest.trim()))
            })
            .unwrap_or((bare, operand))
    }

    fn holds(self, actual: f64, target: f64, tolerance: f64) -> bool {
        match self {
            Comparison::AtLeast => actual >= target,
            Comparison::AtMost => actual <= target,
            Comparison::Above => actual > target,
            Comparison::Below => actual < target,
            Comparison::Equal => (actual - target).abs() < tolerance,
        }
    }
}

/// Returns true if `operand` starts with a comparison operator or is a number.
fn looks_numeric(operand: &str) -> bool {
    operand.starts_with(['>', '<', '=']) || operand.trim().parse::<f64>().is_ok()
}

fn compare_numeric(actual: Option<f64>, operand: &str) -> bool {
    let Some(actual) = actual else {
        return false;
    };

    let (comparison, number) = Comparison::split(operand, Comparison::Equal);
    match number.parse::<f64>() {
        Ok(target) => comparison.holds(actual, target, NUMERIC_TOLERANCE),
        Err(_) => {
            trace!(operand = %operand, "ignoring unparsable numeric operand");
            false
        }
    }
}

fn compare_days_ago(date: Option<DateTime<Utc>>, operand: &str, now: DateTime<Utc>) -> bool {
    let Some(date) = date else {
        return false;
    };

    let (comparison, number) = Comparison::split(operand, Comparison::Above);
    let Ok(target_days) = number.parse::<i64>() else {
        trace!(operand = %operand, "ignoring unparsable day count");
        return false;
    };

    let days_ago = (now - date).num_milliseconds() as f64 / MILLIS_PER_DAY;
    comparison.holds(days_ago, target_days as f64, DAY_TOLERANCE)
}
