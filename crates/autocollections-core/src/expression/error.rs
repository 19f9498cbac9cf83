//! Error types for the expression tokenizer and parser.

use thiserror::Error;

use super::ast::CriteriaKind;

/// A specialized Result type for expression parsing operations.
pub type ExpressionResult<T> = Result<T, ExpressionError>;

/// Errors that can occur while tokenizing an expression.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LexError {
    /// A string literal was opened but never closed.
    #[error("unterminated string literal starting at position {position}")]
    UnterminatedString {
        /// Byte offset of the opening quote.
        position: usize,
    },

    /// A character that cannot start any token.
    #[error("unexpected character '{character}' at position {position}{}", suggestion_suffix(suggestion.as_deref()))]
    UnexpectedCharacter {
        /// The offending character.
        character: char,
        /// Byte offset of the character (0-indexed).
        position: usize,
        /// Closest keyword when the offending text looks like a misspelled keyword.
        suggestion: Option<String>,
    },
}

fn suggestion_suffix(suggestion: Option<&str>) -> String {
    match suggestion {
        Some(keyword) => format!(" (did you mean {keyword}?)"),
        None => String::new(),
    }
}

impl LexError {
    /// Returns the byte offset where the error occurred.
    pub fn position(&self) -> usize {
        match self {
            LexError::UnterminatedString { position } => *position,
            LexError::UnexpectedCharacter { position, .. } => *position,
        }
    }
}

/// Errors that can occur while turning an expression string into an AST.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExpressionError {
    /// The expression is empty or whitespace only.
    #[error("expression cannot be empty")]
    EmptyExpression,

    /// Tokenization failed; parsing was not attempted.
    #[error(transparent)]
    Lex(#[from] LexError),

    /// A criteria keyword that takes an argument was not followed by a string.
    #[error("expected string after {kind}")]
    ExpectedString {
        /// The criteria missing its argument.
        kind: CriteriaKind,
    },

    /// An opening parenthesis was never closed.
    #[error("missing closing parenthesis")]
    MissingCloseParen,

    /// The token stream ended where a primary expression was required.
    #[error("unexpected end of expression")]
    UnexpectedEndOfInput,

    /// Parentheses nest deeper than the parser allows.
    #[error("expression nested too deeply at position {position}")]
    NestingTooDeep {
        /// Byte offset of the first parenthesis past the limit.
        position: usize,
    },

    /// A token appeared where it is not allowed.
    #[error("unexpected token {token} at position {position}")]
    UnexpectedToken {
        /// Display form of the token.
        token: String,
        /// Byte offset of the token.
        position: usize,
    },
}

impl ExpressionError {
    /// Creates an unexpected token error.
    pub fn unexpected_token(token: impl Into<String>, position: usize) -> Self {
        ExpressionError::UnexpectedToken {
            token: token.into(),
            position,
        }
    }
}
