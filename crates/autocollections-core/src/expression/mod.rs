//! Criteria expression language.
//!
//! Rules select media with a small boolean language over typed criteria:
//!
//! ```text
//! STUDIO "Marvel" AND (GENRE "Action" OR GENRE "Adventure") AND NOT SHOW
//! ```
//!
//! # Syntax
//!
//! ## Criteria with a string argument
//! - `TITLE`, `GENRE`, `STUDIO`, `ACTOR`, `DIRECTOR`, `TAG`
//! - `PARENTALRATING` (`PARENTAL`, `RATING`)
//! - `COMMUNITYRATING` (`USERRATING`), `CRITICSRATING` (`CRITICS`)
//! - `PRODUCTIONLOCATION` (`LOCATION`, `COUNTRY`)
//! - `LANG` (audio language), `SUB` (subtitle language)
//! - `YEAR`, `CUSTOMRATING` (`CUSTOM`)
//! - `RELEASEDATE` (`RELEASE`), `ADDEDDATE` (`ADDED`),
//!   `EPISODEAIRDATE` (`EPISODEAIR`, `LASTAIR`)
//! - `FILENAME`
//!
//! Numeric and date criteria accept `>`, `<`, `>=`, `<=` and `=` prefixes,
//! e.g. `COMMUNITYRATING ">=7.5"` or `ADDED "<30"` (added within 30 days).
//!
//! ## Criteria without an argument
//! - `MOVIE`, `SHOW`, `UNPLAYED` (`UNWATCHED`), `WATCHED`
//!
//! ## Boolean Operators
//! - `AND`, `OR`, `NOT`, `()` for grouping
//!
//! Keywords are case-insensitive. Strings are double-quoted and have no
//! escape sequences.

mod ast;
mod error;
mod evaluator;
mod lexer;
mod parser;

pub use ast::{CriteriaKind, ExpressionNode};
pub use error::{ExpressionError, ExpressionResult, LexError};
pub use evaluator::CriteriaMatcher;
pub use lexer::{tokenize, Lexer, PositionedToken, Token};
pub use parser::{parse_expression, ExpressionParser, MAX_NESTING_DEPTH};
