//! Abstract Syntax Tree (AST) for criteria expressions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One axis of comparison usable in an expression leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CriteriaKind {
    Title,
    Genre,
    Studio,
    Actor,
    Director,
    /// Matches movies. Takes no argument.
    IsMovie,
    /// Matches series. Takes no argument.
    IsShow,
    Tag,
    ParentalRating,
    CommunityRating,
    CriticsRating,
    ProductionLocation,
    AudioLanguage,
    Subtitle,
    Year,
    CustomRating,
    ReleaseDate,
    AddedDate,
    EpisodeAirDate,
    /// Matches items that have not been played. Takes no argument.
    Unplayed,
    /// Matches items that have been played. Takes no argument.
    Watched,
    Filename,
}

impl CriteriaKind {
    /// Returns true for kinds that stand alone without a string argument.
    pub fn is_zero_argument(self) -> bool {
        matches!(
            self,
            CriteriaKind::IsMovie
                | CriteriaKind::IsShow
                | CriteriaKind::Unplayed
                | CriteriaKind::Watched
        )
    }

    /// Returns the canonical keyword for this kind.
    pub fn keyword(self) -> &'static str {
        match self {
            CriteriaKind::Title => "TITLE",
            CriteriaKind::Genre => "GENRE",
            CriteriaKind::Studio => "STUDIO",
            CriteriaKind::Actor => "ACTOR",
            CriteriaKind::Director => "DIRECTOR",
            CriteriaKind::IsMovie => "MOVIE",
            CriteriaKind::IsShow => "SHOW",
            CriteriaKind::Tag => "TAG",
            CriteriaKind::ParentalRating => "PARENTALRATING",
            CriteriaKind::CommunityRating => "COMMUNITYRATING",
            CriteriaKind::CriticsRating => "CRITICSRATING",
            CriteriaKind::ProductionLocation => "PRODUCTIONLOCATION",
            CriteriaKind::AudioLanguage => "LANG",
            CriteriaKind::Subtitle => "SUB",
            CriteriaKind::Year => "YEAR",
            CriteriaKind::CustomRating => "CUSTOMRATING",
            CriteriaKind::ReleaseDate => "RELEASEDATE",
            CriteriaKind::AddedDate => "ADDEDDATE",
            CriteriaKind::EpisodeAirDate => "EPISODEAIRDATE",
            CriteriaKind::Unplayed => "UNPLAYED",
            CriteriaKind::Watched => "WATCHED",
            CriteriaKind::Filename => "FILENAME",
        }
    }
}

impl fmt::Display for CriteriaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Represents a parsed criteria expression.
///
/// Each combinator exclusively owns its children, so a parsed expression is
/// a strict tree. Build it once with [`parse_expression`](super::parse_expression)
/// and evaluate it as often as needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpressionNode {
    /// A single criteria comparison. `value` is empty for zero-argument kinds.
    Leaf { kind: CriteriaKind, value: String },

    /// Logical AND of two expressions.
    And {
        left: Box<ExpressionNode>,
        right: Box<ExpressionNode>,
    },

    /// Logical OR of two expressions.
    Or {
        left: Box<ExpressionNode>,
        right: Box<ExpressionNode>,
    },

    /// Logical NOT of an expression.
    Not { child: Box<ExpressionNode> },
}

impl ExpressionNode {
    /// Creates a leaf node.
    ///
    /// # Example
    ///
    /// ```
    /// use autocollections_core::expression::{CriteriaKind, ExpressionNode};
    ///
    /// let node = ExpressionNode::leaf(CriteriaKind::Genre, "Action");
    /// assert_eq!(node.to_string(), r#"GENRE "Action""#);
    /// ```
    pub fn leaf(kind: CriteriaKind, value: impl Into<String>) -> Self {
        ExpressionNode::Leaf {
            kind,
            value: value.into(),
        }
    }

    /// Creates an AND node from two expressions.
    pub fn and(left: ExpressionNode, right: ExpressionNode) -> Self {
        ExpressionNode::And {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Creates an OR node from two expressions.
    pub fn or(left: ExpressionNode, right: ExpressionNode) -> Self {
        ExpressionNode::Or {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Creates a NOT node wrapping another expression.
    pub fn negate(child: ExpressionNode) -> Self {
        ExpressionNode::Not {
            child: Box::new(child),
        }
    }

    /// Returns every leaf in left-to-right order.
    pub fn criteria(&self) -> Vec<(CriteriaKind, &str)> {
        let mut leaves = Vec::new();
        self.collect_criteria(&mut leaves);
        leaves
    }

    fn collect_criteria<'a>(&'a self, leaves: &mut Vec<(CriteriaKind, &'a str)>) {
        match self {
            ExpressionNode::Leaf { kind, value } => leaves.push((*kind, value.as_str())),
            ExpressionNode::And { left, right } | ExpressionNode::Or { left, right } => {
                left.collect_criteria(leaves);
                right.collect_criteria(leaves);
            }
            ExpressionNode::Not { child } => child.collect_criteria(leaves),
        }
    }
}

/// Canonical, fully parenthesized form.
///
/// String literals have no escapes, so a leaf value containing `"` is
/// written as-is and the output is for display only. Every tree produced
/// by the parser round-trips.
impl fmt::Display for ExpressionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpressionNode::Leaf { kind, .. } if kind.is_zero_argument() => {
                write!(f, "{kind}")
            }
            ExpressionNode::Leaf { kind, value } => write!(f, "{kind} \"{value}\""),
            ExpressionNode::And { left, right } => write!(f, "({left} AND {right})"),
            ExpressionNode::Or { left, right } => write!(f, "({left} OR {right})"),
            ExpressionNode::Not { child } => write!(f, "NOT {child}"),
        }
    }
}
