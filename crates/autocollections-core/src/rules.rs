//! Collection rules.
//!
//! A rule names a collection and decides which media belong in it. There
//! are two flavors:
//!
//! - [`ExpressionRule`]: a full criteria expression such as
//!   `STUDIO "Marvel" AND GENRE "Action"`.
//! - [`TitleMatchRule`]: a single substring match on title, genre, studio,
//!   actor, or director, optionally limited to movies or series.
//!
//! Both compile to an [`ExpressionNode`]. Compilation never panics; a rule
//! that cannot be compiled carries its error messages instead.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::expression::{parse_expression, CriteriaKind, ExpressionNode};
use crate::media::{MediaKind, PersonRole};
use crate::store::CatalogQuery;

/// Collection name used when a title-match rule has no pattern.
pub const FALLBACK_COLLECTION_NAME: &str = "Auto Collection";

/// Result of compiling a rule.
///
/// Exactly one of `expression` and `parse_errors` is populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledRule {
    pub expression: Option<ExpressionNode>,
    pub parse_errors: Vec<String>,
}

impl CompiledRule {
    fn valid(expression: ExpressionNode) -> Self {
        Self {
            expression: Some(expression),
            parse_errors: Vec::new(),
        }
    }

    fn invalid(error: impl Into<String>) -> Self {
        Self {
            expression: None,
            parse_errors: vec![error.into()],
        }
    }

    pub fn is_valid(&self) -> bool {
        self.expression.is_some()
    }
}

/// A collection defined by a criteria expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpressionRule {
    pub collection_name: String,
    pub expression: String,
    #[serde(default)]
    pub case_sensitive: bool,
}

impl ExpressionRule {
    pub fn new(collection_name: impl Into<String>, expression: impl Into<String>) -> Self {
        Self {
            collection_name: collection_name.into(),
            expression: expression.into(),
            case_sensitive: false,
        }
    }

    /// Parses the expression text.
    pub fn compile(&self) -> CompiledRule {
        if self.collection_name.trim().is_empty() {
            return CompiledRule::invalid("collection name cannot be empty");
        }
        match parse_expression(&self.expression) {
            Ok(node) => CompiledRule::valid(node),
            Err(e) => CompiledRule::invalid(format!("error parsing expression: {e}")),
        }
    }
}

/// Field a title-match rule compares against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    #[default]
    Title,
    Genre,
    Studio,
    Actor,
    Director,
}

impl MatchType {
    pub fn criteria(self) -> CriteriaKind {
        match self {
            MatchType::Title => CriteriaKind::Title,
            MatchType::Genre => CriteriaKind::Genre,
            MatchType::Studio => CriteriaKind::Studio,
            MatchType::Actor => CriteriaKind::Actor,
            MatchType::Director => CriteriaKind::Director,
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchType::Title => "title",
            MatchType::Genre => "genre",
            MatchType::Studio => "studio",
            MatchType::Actor => "actor",
            MatchType::Director => "director",
        };
        f.write_str(name)
    }
}

/// Which media kinds a title-match rule accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaTypeFilter {
    #[default]
    All,
    Movies,
    Series,
}

impl MediaTypeFilter {
    pub fn includes(self, kind: MediaKind) -> bool {
        match self {
            MediaTypeFilter::All => true,
            MediaTypeFilter::Movies => kind == MediaKind::Movie,
            MediaTypeFilter::Series => kind == MediaKind::Series,
        }
    }
}

/// A collection of items whose title (or genre, studio, actor, director)
/// contains a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleMatchRule {
    pub pattern: String,
    /// Explicit collection name; derived from the pattern when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_name: Option<String>,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub match_type: MatchType,
    #[serde(default)]
    pub media_type: MediaTypeFilter,
}

impl TitleMatchRule {
    pub fn new(pattern: impl Into<String>, match_type: MatchType) -> Self {
        Self {
            pattern: pattern.into(),
            collection_name: None,
            case_sensitive: false,
            match_type,
            media_type: MediaTypeFilter::All,
        }
    }

    /// Returns the explicit collection name, or one derived from the
    /// pattern and match type.
    pub fn collection_name(&self) -> String {
        match self.collection_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => self.default_collection_name(),
        }
    }

    /// Derived collection name, e.g. `"Nolan Directed"` for a director match.
    pub fn default_collection_name(&self) -> String {
        let pattern = &self.pattern;
        if pattern.is_empty() {
            return FALLBACK_COLLECTION_NAME.to_string();
        }
        match self.match_type {
            MatchType::Genre => format!("{pattern} Genre"),
            MatchType::Studio => format!("{pattern} Studio Productions"),
            MatchType::Actor => format!("{pattern} Acting"),
            MatchType::Director => format!("{pattern} Directed"),
            MatchType::Title => format!("{pattern} Movies"),
        }
    }

    /// Builds the equivalent expression: the pattern leaf, narrowed to one
    /// media kind when the rule is not for all media.
    pub fn to_expression(&self) -> ExpressionNode {
        let leaf = ExpressionNode::leaf(self.match_type.criteria(), self.pattern.clone());
        match self.media_type {
            MediaTypeFilter::All => leaf,
            MediaTypeFilter::Movies => {
                ExpressionNode::and(leaf, ExpressionNode::leaf(CriteriaKind::IsMovie, ""))
            }
            MediaTypeFilter::Series => {
                ExpressionNode::and(leaf, ExpressionNode::leaf(CriteriaKind::IsShow, ""))
            }
        }
    }

    pub fn compile(&self) -> CompiledRule {
        if self.pattern.trim().is_empty() {
            return CompiledRule::invalid("match pattern cannot be empty");
        }
        CompiledRule::valid(self.to_expression())
    }
}

/// Any configured collection rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionRule {
    Expression(ExpressionRule),
    TitleMatch(TitleMatchRule),
}

impl CollectionRule {
    /// Name of the collection this rule maintains.
    pub fn collection_name(&self) -> String {
        match self {
            CollectionRule::Expression(rule) => rule.collection_name.clone(),
            CollectionRule::TitleMatch(rule) => rule.collection_name(),
        }
    }

    pub fn case_sensitive(&self) -> bool {
        match self {
            CollectionRule::Expression(rule) => rule.case_sensitive,
            CollectionRule::TitleMatch(rule) => rule.case_sensitive,
        }
    }

    pub fn compile(&self) -> CompiledRule {
        match self {
            CollectionRule::Expression(rule) => rule.compile(),
            CollectionRule::TitleMatch(rule) => rule.compile(),
        }
    }

    /// Returns false if the rule can never match items of `kind`, so the
    /// catalog need not be queried for them.
    pub fn wants(&self, kind: MediaKind) -> bool {
        match self {
            CollectionRule::Expression(_) => true,
            CollectionRule::TitleMatch(rule) => rule.media_type.includes(kind),
        }
    }

    /// Catalog query for candidate items of `kind`.
    ///
    /// Title-match rules narrow the query on the matched field. The query
    /// only prefilters: every candidate is still evaluated against the
    /// compiled expression.
    pub fn catalog_query(&self, kind: MediaKind) -> CatalogQuery {
        let query = CatalogQuery::kind(kind);
        let CollectionRule::TitleMatch(rule) = self else {
            return query;
        };

        let pattern = rule.pattern.clone();
        match rule.match_type {
            MatchType::Title => query.with_text(pattern),
            MatchType::Genre => query.with_genre(pattern),
            MatchType::Actor => query.with_person(pattern, PersonRole::Actor),
            MatchType::Director => query.with_person(pattern, PersonRole::Director),
            MatchType::Studio => query,
        }
    }

    /// Human-readable rule source, for listings.
    ///
    /// Title-match patterns are rendered through the canonical expression
    /// form, which is display-only when the pattern contains `"`.
    pub fn describe(&self) -> String {
        match self {
            CollectionRule::Expression(rule) => rule.expression.clone(),
            CollectionRule::TitleMatch(rule) => rule.to_expression().to_string(),
        }
    }
}

impl From<ExpressionRule> for CollectionRule {
    fn from(rule: ExpressionRule) -> Self {
        CollectionRule::Expression(rule)
    }
}

impl From<TitleMatchRule> for CollectionRule {
    fn from(rule: TitleMatchRule) -> Self {
        CollectionRule::TitleMatch(rule)
    }
}
