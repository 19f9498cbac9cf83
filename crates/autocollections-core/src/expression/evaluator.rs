//! Expression evaluation against an injected criteria matcher.
//!
//! The evaluator knows nothing about catalog structure. Each leaf is handed
//! to a [`CriteriaMatcher`], which the caller builds per media item (see
//! [`ItemMatcher`](crate::matcher::ItemMatcher)) or stubs out in tests.
//!
//! # Example
//!
//! ```
//! use autocollections_core::expression::{parse_expression, CriteriaKind};
//!
//! let node = parse_expression(r#"GENRE "Action" AND NOT MOVIE"#).unwrap();
//!
//! let series_matcher = |kind: CriteriaKind, value: &str| match kind {
//!     CriteriaKind::Genre => value == "Action",
//!     CriteriaKind::IsMovie => false,
//!     _ => false,
//! };
//! assert!(node.evaluate(&series_matcher));
//! ```

use super::ast::{CriteriaKind, ExpressionNode};

/// Decides whether a single criteria comparison holds.
///
/// Implementations are expected to be pure for a fixed item and to never
/// fail: a malformed comparison operand is simply "no match".
pub trait CriteriaMatcher {
    /// Returns true if the criteria `kind` with argument `value` matches.
    fn matches(&self, kind: CriteriaKind, value: &str) -> bool;
}

impl<F> CriteriaMatcher for F
where
    F: Fn(CriteriaKind, &str) -> bool,
{
    fn matches(&self, kind: CriteriaKind, value: &str) -> bool {
        self(kind, value)
    }
}

impl ExpressionNode {
    /// Evaluates this expression with the given matcher.
    ///
    /// `AND` and `OR` short-circuit from left to right.
    pub fn evaluate<M>(&self, matcher: &M) -> bool
    where
        M: CriteriaMatcher + ?Sized,
    {
        match self {
            ExpressionNode::Leaf { kind, value } => matcher.matches(*kind, value),
            ExpressionNode::And { left, right } => {
                left.evaluate(matcher) && right.evaluate(matcher)
            }
            ExpressionNode::Or { left, right } => left.evaluate(matcher) || right.evaluate(matcher),
            ExpressionNode::Not { child } => !child.evaluate(matcher),
        }
    }
}
