//! Lexer (tokenizer) for criteria expressions.

use std::fmt;

use strsim::normalized_damerau_levenshtein;

use super::ast::CriteriaKind;
use super::error::LexError;

/// Minimum similarity (0.0 to 1.0) for suggesting a keyword on an unknown word.
const MIN_SUGGESTION_SIMILARITY: f64 = 0.8;

/// A keyword the lexer recognizes.
#[derive(Debug, Clone, Copy)]
enum Keyword {
    And,
    Or,
    Not,
    Criteria(CriteriaKind),
}

impl Keyword {
    fn token(self) -> Token {
        match self {
            Keyword::And => Token::And,
            Keyword::Or => Token::Or,
            Keyword::Not => Token::Not,
            Keyword::Criteria(kind) => Token::Criteria(kind),
        }
    }
}

/// Keyword spellings in match order. The first spelling that matches wins,
/// so a spelling must come before any shorter spelling that is its prefix.
const KEYWORDS: &[(&str, Keyword)] = &[
    ("AND", Keyword::And),
    ("OR", Keyword::Or),
    ("NOT", Keyword::Not),
    ("TITLE", Keyword::Criteria(CriteriaKind::Title)),
    ("GENRE", Keyword::Criteria(CriteriaKind::Genre)),
    ("STUDIO", Keyword::Criteria(CriteriaKind::Studio)),
    ("ACTOR", Keyword::Criteria(CriteriaKind::Actor)),
    ("DIRECTOR", Keyword::Criteria(CriteriaKind::Director)),
    ("MOVIE", Keyword::Criteria(CriteriaKind::IsMovie)),
    ("SHOW", Keyword::Criteria(CriteriaKind::IsShow)),
    ("TAG", Keyword::Criteria(CriteriaKind::Tag)),
    ("PARENTALRATING", Keyword::Criteria(CriteriaKind::ParentalRating)),
    ("PARENTAL", Keyword::Criteria(CriteriaKind::ParentalRating)),
    ("RATING", Keyword::Criteria(CriteriaKind::ParentalRating)),
    ("COMMUNITYRATING", Keyword::Criteria(CriteriaKind::CommunityRating)),
    ("USERRATING", Keyword::Criteria(CriteriaKind::CommunityRating)),
    ("CRITICSRATING", Keyword::Criteria(CriteriaKind::CriticsRating)),
    ("CRITICS", Keyword::Criteria(CriteriaKind::CriticsRating)),
    ("PRODUCTIONLOCATION", Keyword::Criteria(CriteriaKind::ProductionLocation)),
    ("LOCATION", Keyword::Criteria(CriteriaKind::ProductionLocation)),
    ("COUNTRY", Keyword::Criteria(CriteriaKind::ProductionLocation)),
    ("LANG", Keyword::Criteria(CriteriaKind::AudioLanguage)),
    ("SUB", Keyword::Criteria(CriteriaKind::Subtitle)),
    ("YEAR", Keyword::Criteria(CriteriaKind::Year)),
    ("CUSTOMRATING", Keyword::Criteria(CriteriaKind::CustomRating)),
    ("CUSTOM", Keyword::Criteria(CriteriaKind::CustomRating)),
    ("RELEASEDATE", Keyword::Criteria(CriteriaKind::ReleaseDate)),
    ("RELEASE", Keyword::Criteria(CriteriaKind::ReleaseDate)),
    ("ADDEDDATE", Keyword::Criteria(CriteriaKind::AddedDate)),
    ("ADDED", Keyword::Criteria(CriteriaKind::AddedDate)),
    ("EPISODEAIRDATE", Keyword::Criteria(CriteriaKind::EpisodeAirDate)),
    ("EPISODEAIR", Keyword::Criteria(CriteriaKind::EpisodeAirDate)),
    ("LASTAIR", Keyword::Criteria(CriteriaKind::EpisodeAirDate)),
    ("UNPLAYED", Keyword::Criteria(CriteriaKind::Unplayed)),
    ("UNWATCHED", Keyword::Criteria(CriteriaKind::Unplayed)),
    ("WATCHED", Keyword::Criteria(CriteriaKind::Watched)),
    ("FILENAME", Keyword::Criteria(CriteriaKind::Filename)),
];

/// A token in a criteria expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A criteria keyword such as `GENRE` or `MOVIE`.
    Criteria(CriteriaKind),

    /// A `"`-delimited string argument, without the quotes.
    StringLiteral(String),

    /// The `AND` operator.
    And,

    /// The `OR` operator.
    Or,

    /// The `NOT` operator.
    Not,

    /// Opening parenthesis `(`.
    OpenParen,

    /// Closing parenthesis `)`.
    CloseParen,

    /// Always the last token of a stream.
    EndOfInput,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Criteria(kind) => write!(f, "{kind}"),
            Token::StringLiteral(text) => write!(f, "\"{text}\""),
            Token::And => f.write_str("AND"),
            Token::Or => f.write_str("OR"),
            Token::Not => f.write_str("NOT"),
            Token::OpenParen => f.write_str("("),
            Token::CloseParen => f.write_str(")"),
            Token::EndOfInput => f.write_str("end of input"),
        }
    }
}

/// A token with its position in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedToken {
    /// The token.
    pub token: Token,
    /// The byte position where the token starts (0-indexed).
    pub position: usize,
}

/// Lexer for tokenizing criteria expressions.
pub struct Lexer<'a> {
    input: &'a str,
    /// Current byte position in the input string.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input string.
    pub fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.position += c.len_utf8();
        }
    }

    /// Returns true when `spelling` matches at the cursor (ignoring ASCII case)
    /// and is followed by whitespace, a parenthesis, or the end of input.
    fn matches_keyword(&self, spelling: &str) -> bool {
        let rest = self.rest();
        let Some(candidate) = rest.get(..spelling.len()) else {
            return false;
        };
        if !candidate.eq_ignore_ascii_case(spelling) {
            return false;
        }
        match rest[spelling.len()..].chars().next() {
            None => true,
            Some(c) => c.is_whitespace() || c == '(' || c == ')',
        }
    }

    /// Tries the keyword spellings in order.
    fn try_keyword(&mut self) -> Option<Token> {
        let (spelling, keyword) = KEYWORDS
            .iter()
            .find(|(spelling, _)| self.matches_keyword(spelling))?;
        self.position += spelling.len();
        Some(keyword.token())
    }

    /// Reads a quoted string. The cursor is on the opening quote.
    fn read_string(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let body = &self.input[start + 1..];
        match body.find('"') {
            Some(end) => {
                self.position = start + 1 + end + 1;
                Ok(Token::StringLiteral(body[..end].to_string()))
            }
            None => Err(LexError::UnterminatedString { position: start }),
        }
    }

    /// Builds the error for an unrecognized character, suggesting a keyword
    /// when the surrounding word is a near miss.
    fn unexpected_character(&self, character: char) -> LexError {
        let word: String = self
            .rest()
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect();
        LexError::UnexpectedCharacter {
            character,
            position: self.position,
            suggestion: suggest_keyword(&word),
        }
    }

    /// Returns the next token with its position, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<PositionedToken>, LexError> {
        self.skip_whitespace();

        let Some(c) = self.peek() else {
            return Ok(None);
        };
        let position = self.position;

        let token = if let Some(token) = self.try_keyword() {
            token
        } else {
            match c {
                '(' => {
                    self.position += 1;
                    Token::OpenParen
                }
                ')' => {
                    self.position += 1;
                    Token::CloseParen
                }
                '"' => self.read_string()?,
                _ => return Err(self.unexpected_character(c)),
            }
        };

        Ok(Some(PositionedToken { token, position }))
    }

    /// Collects all tokens, terminated by [`Token::EndOfInput`].
    ///
    /// # Errors
    ///
    /// Stops at the first unterminated string or unexpected character.
    pub fn tokenize(mut self) -> Result<Vec<PositionedToken>, LexError> {
        let mut tokens = Vec::new();
        while let Some(positioned_token) = self.next_token()? {
            tokens.push(positioned_token);
        }
        tokens.push(PositionedToken {
            token: Token::EndOfInput,
            position: self.input.len(),
        });
        Ok(tokens)
    }
}

/// Tokenizes an expression string.
///
/// # Example
///
/// ```
/// use autocollections_core::expression::{tokenize, CriteriaKind, Token};
///
/// let tokens: Vec<Token> = tokenize(r#"GENRE "Action""#)
///     .unwrap()
///     .into_iter()
///     .map(|t| t.token)
///     .collect();
/// assert_eq!(
///     tokens,
///     vec![
///         Token::Criteria(CriteriaKind::Genre),
///         Token::StringLiteral("Action".to_string()),
///         Token::EndOfInput,
///     ]
/// );
/// ```
pub fn tokenize(text: &str) -> Result<Vec<PositionedToken>, LexError> {
    Lexer::new(text).tokenize()
}

/// Finds the closest keyword spelling to an unknown word.
fn suggest_keyword(word: &str) -> Option<String> {
    if word.is_empty() {
        return None;
    }
    let upper = word.to_ascii_uppercase();

    let (best, similarity) = KEYWORDS
        .iter()
        .map(|(spelling, _)| (*spelling, normalized_damerau_levenshtein(&upper, spelling)))
        .max_by(|(_, a), (_, b)| a.total_cmp(b))?;

    (similarity >= MIN_SUGGESTION_SIMILARITY && similarity < 1.0).then(|| best.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<Token> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|pt| pt.token)
            .collect()
    }

    #[test]
    fn test_tokenize_studio_and_genre() {
        assert_eq!(
            kinds(r#"STUDIO "Marvel" AND GENRE "Action""#),
            vec![
                Token::Criteria(CriteriaKind::Studio),
                Token::StringLiteral("Marvel".to_string()),
                Token::And,
                Token::Criteria(CriteriaKind::Genre),
                Token::StringLiteral("Action".to_string()),
                Token::EndOfInput,
            ]
        );
    }

    #[test]
    fn test_tokenize_empty_input_is_only_end_marker() {
        assert_eq!(kinds(""), vec![Token::EndOfInput]);
        assert_eq!(kinds("   \t\n"), vec![Token::EndOfInput]);
    }

    #[test]
    fn test_tokenize_keywords_case_insensitive() {
        assert_eq!(
            kinds("movie And NoT show"),
            vec![
                Token::Criteria(CriteriaKind::IsMovie),
                Token::And,
                Token::Not,
                Token::Criteria(CriteriaKind::IsShow),
                Token::EndOfInput,
            ]
        );
    }

    #[test]
    fn test_tokenize_aliases() {
        let cases = [
            ("RATING", CriteriaKind::ParentalRating),
            ("PARENTAL", CriteriaKind::ParentalRating),
            ("PARENTALRATING", CriteriaKind::ParentalRating),
            ("USERRATING", CriteriaKind::CommunityRating),
            ("CRITICS", CriteriaKind::CriticsRating),
            ("COUNTRY", CriteriaKind::ProductionLocation),
            ("LOCATION", CriteriaKind::ProductionLocation),
            ("CUSTOM", CriteriaKind::CustomRating),
            ("CUSTOMRATING", CriteriaKind::CustomRating),
            ("SUB", CriteriaKind::Subtitle),
            ("LANG", CriteriaKind::AudioLanguage),
            ("ADDED", CriteriaKind::AddedDate),
            ("ADDEDDATE", CriteriaKind::AddedDate),
            ("RELEASE", CriteriaKind::ReleaseDate),
            ("LASTAIR", CriteriaKind::EpisodeAirDate),
            ("EPISODEAIR", CriteriaKind::EpisodeAirDate),
            ("UNWATCHED", CriteriaKind::Unplayed),
            ("UNPLAYED", CriteriaKind::Unplayed),
            ("WATCHED", CriteriaKind::Watched),
        ];
        for (spelling, kind) in cases {
            assert_eq!(
                kinds(spelling),
                vec![Token::Criteria(kind), Token::EndOfInput],
                "spelling {spelling}"
            );
        }
    }

    #[test]
    fn test_keyword_must_end_at_delimiter() {
        // TITLES is not TITLE followed by S
        let err = tokenize(r#"TITLES "x""#).unwrap_err();
        assert_eq!(
            err,
            LexError::UnexpectedCharacter {
                character: 'T',
                position: 0,
                suggestion: Some("TITLE".to_string()),
            }
        );

        // SUBTITLE is not SUB followed by TITLE
        assert!(tokenize(r#"SUBTITLE "en""#).is_err());
    }

    #[test]
    fn test_keyword_followed_by_paren() {
        assert_eq!(
            kinds("NOT(MOVIE)"),
            vec![
                Token::Not,
                Token::OpenParen,
                Token::Criteria(CriteriaKind::IsMovie),
                Token::CloseParen,
                Token::EndOfInput,
            ]
        );
    }

    #[test]
    fn test_string_literal_keeps_inner_text_verbatim() {
        assert_eq!(
            kinds(r#"TITLE "  Star Wars (1977) ""#),
            vec![
                Token::Criteria(CriteriaKind::Title),
                Token::StringLiteral("  Star Wars (1977) ".to_string()),
                Token::EndOfInput,
            ]
        );
    }

    #[test]
    fn test_string_literal_without_separating_space() {
        assert_eq!(
            kinds(r#"("a")"#),
            vec![
                Token::OpenParen,
                Token::StringLiteral("a".to_string()),
                Token::CloseParen,
                Token::EndOfInput,
            ]
        );
    }

    #[test]
    fn test_unicode_string_literal_positions() {
        let tokens = tokenize(r#"TITLE "Amélie" OR MOVIE"#).unwrap();
        assert_eq!(tokens[1].token, Token::StringLiteral("Amélie".to_string()));
        assert_eq!(tokens[2].token, Token::Or);
        assert_eq!(tokens[2].position, 16);
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize(r#"STUDIO "Marvel"#).unwrap_err();
        assert_eq!(err, LexError::UnterminatedString { position: 7 });
        assert_eq!(err.position(), 7);
    }

    #[test]
    fn test_unexpected_character_position() {
        let err = tokenize(r#"GENRE "Action" & MOVIE"#).unwrap_err();
        assert_eq!(
            err,
            LexError::UnexpectedCharacter {
                character: '&',
                position: 15,
                suggestion: None,
            }
        );
        assert_eq!(
            err.to_string(),
            "unexpected character '&' at position 15"
        );
    }

    #[test]
    fn test_unknown_word_without_close_keyword() {
        let err = tokenize(r#"GENRE "Action" FOO"#).unwrap_err();
        assert!(matches!(
            err,
            LexError::UnexpectedCharacter {
                character: 'F',
                position: 15,
                suggestion: None,
            }
        ));
    }

    #[test]
    fn test_misspelled_keyword_suggestion() {
        let err = tokenize(r#"GENRES "Action""#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unexpected character 'G' at position 0 (did you mean GENRE?)"
        );
    }

    #[test]
    fn test_token_positions() {
        let tokens = tokenize(r#"(ACTOR "X")"#).unwrap();
        let positions: Vec<usize> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 1, 7, 10, 11]);
    }
}
