//! Recursive descent parser for criteria expressions.

use super::ast::ExpressionNode;
use super::error::{ExpressionError, ExpressionResult};
use super::lexer::{tokenize, PositionedToken, Token};

/// Deepest parenthesis nesting the parser accepts.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Parser for criteria expressions.
///
/// # Grammar
///
/// ```text
/// expression ::= or_expr
/// or_expr    ::= and_expr ("OR" and_expr)*
/// and_expr   ::= not_expr ("AND" not_expr)*
/// not_expr   ::= "NOT" primary | primary
/// primary    ::= "(" expression ")"
///              | criteria string
///              | criteria            (MOVIE, SHOW, UNPLAYED, WATCHED only)
/// ```
///
/// # Operator Precedence (highest to lowest)
///
/// 1. `NOT` - unary, applies to the next primary only
/// 2. `AND` - binary, left-associative
/// 3. `OR` - binary, left-associative
///
/// Parsing stops at the first error. Groups nested deeper than
/// [`MAX_NESTING_DEPTH`] are rejected.
///
/// # Example
///
/// ```
/// use autocollections_core::expression::{ExpressionParser, ExpressionNode};
///
/// let node = ExpressionParser::parse(r#"STUDIO "Marvel" AND GENRE "Action""#).unwrap();
/// assert!(matches!(node, ExpressionNode::And { .. }));
/// ```
pub struct ExpressionParser<'t> {
    tokens: &'t [PositionedToken],
    position: usize,
    depth: usize,
}

impl<'t> ExpressionParser<'t> {
    /// Tokenizes and parses an expression string into an AST.
    ///
    /// # Errors
    ///
    /// Returns `ExpressionError::EmptyExpression` for blank input,
    /// `ExpressionError::Lex` if tokenization fails, and the parse errors
    /// described on [`ExpressionParser::parse_tokens`].
    pub fn parse(input: &str) -> ExpressionResult<ExpressionNode> {
        if input.trim().is_empty() {
            return Err(ExpressionError::EmptyExpression);
        }

        let tokens = tokenize(input)?;
        ExpressionParser::parse_tokens(&tokens)
    }

    /// Parses a token stream produced by [`tokenize`].
    ///
    /// The whole stream must form one expression: anything left before
    /// `EndOfInput` is reported as an unexpected token.
    ///
    /// # Errors
    ///
    /// - `ExpressionError::ExpectedString` if a criteria needing a value has none
    /// - `ExpressionError::MissingCloseParen` if a group is not closed
    /// - `ExpressionError::UnexpectedEndOfInput` if the stream ends early
    /// - `ExpressionError::NestingTooDeep` past [`MAX_NESTING_DEPTH`] groups
    /// - `ExpressionError::UnexpectedToken` for any other misplaced token
    pub fn parse_tokens(tokens: &'t [PositionedToken]) -> ExpressionResult<ExpressionNode> {
        let mut parser = Self {
            tokens,
            position: 0,
            depth: 0,
        };
        let node = parser.parse_expression()?;

        match parser.peek() {
            None | Some(Token::EndOfInput) => Ok(node),
            Some(token) => Err(ExpressionError::unexpected_token(
                token.to_string(),
                parser.current_position(),
            )),
        }
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.position).map(|pt| &pt.token)
    }

    /// Byte offset of the current token, or the end of the last token.
    fn current_position(&self) -> usize {
        self.tokens
            .get(self.position)
            .or_else(|| self.tokens.last())
            .map_or(0, |pt| pt.position)
    }

    /// Consumes and returns the current token.
    fn advance(&mut self) -> Option<&'t Token> {
        let token = self.peek();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    /// Checks if the current token matches the expected token.
    fn check(&self, expected: &Token) -> bool {
        self.peek() == Some(expected)
    }

    /// Parses the top-level expression (OR expression).
    fn parse_expression(&mut self) -> ExpressionResult<ExpressionNode> {
        self.parse_or_expr()
    }

    /// Parses OR expressions: `and_expr ("OR" and_expr)*`
    fn parse_or_expr(&mut self) -> ExpressionResult<ExpressionNode> {
        let mut left = self.parse_and_expr()?;

        while self.check(&Token::Or) {
            self.advance();
            let right = self.parse_and_expr()?;
            left = ExpressionNode::or(left, right);
        }

        Ok(left)
    }

    /// Parses AND expressions: `not_expr ("AND" not_expr)*`
    fn parse_and_expr(&mut self) -> ExpressionResult<ExpressionNode> {
        let mut left = self.parse_not_expr()?;

        while self.check(&Token::And) {
            self.advance();
            let right = self.parse_not_expr()?;
            left = ExpressionNode::and(left, right);
        }

        Ok(left)
    }

    /// Parses `"NOT" primary | primary`.
    fn parse_not_expr(&mut self) -> ExpressionResult<ExpressionNode> {
        if self.check(&Token::Not) {
            self.advance();
            let child = self.parse_primary()?;
            return Ok(ExpressionNode::negate(child));
        }

        self.parse_primary()
    }

    /// Parses a group or a single criteria.
    fn parse_primary(&mut self) -> ExpressionResult<ExpressionNode> {
        let position = self.current_position();
        let token = match self.advance() {
            None | Some(Token::EndOfInput) => return Err(ExpressionError::UnexpectedEndOfInput),
            Some(token) => token,
        };

        match token {
            Token::OpenParen => {
                if self.depth >= MAX_NESTING_DEPTH {
                    return Err(ExpressionError::NestingTooDeep { position });
                }
                self.depth += 1;
                let inner = self.parse_expression()?;
                self.depth -= 1;
                if !self.check(&Token::CloseParen) {
                    return Err(ExpressionError::MissingCloseParen);
                }
                self.advance();
                Ok(inner)
            }

            Token::Criteria(kind) if kind.is_zero_argument() => {
                Ok(ExpressionNode::leaf(*kind, String::new()))
            }

            Token::Criteria(kind) => match self.peek() {
                Some(Token::StringLiteral(value)) => {
                    self.advance();
                    Ok(ExpressionNode::leaf(*kind, value.clone()))
                }
                _ => Err(ExpressionError::ExpectedString { kind: *kind }),
            },

            other => Err(ExpressionError::unexpected_token(other.to_string(), position)),
        }
    }
}

/// Tokenizes and parses an expression string.
///
/// Shorthand for [`ExpressionParser::parse`].
pub fn parse_expression(input: &str) -> ExpressionResult<ExpressionNode> {
    ExpressionParser::parse(input)
}
