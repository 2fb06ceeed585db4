//! # Lexer
//!
//! Turns raw text into the token sequence the parser consumes.
//!
//! ## Overview
//!
//! The parser is generic over its token type and only ever asks a
//! [`Terminal`] whether it matches a token. This module supplies a small
//! text front end for grammars over words:
//!
//! - [`Tokenizer`]: text to tokens
//! - [`DelimiterTokenizer`]: splits on a delimiter regex, keeping empty pieces
//! - [`Word`]: a terminal over text tokens
//!
//! ## Usage
//!
//! ```rust
//! use chartparse::lexer::{DelimiterTokenizer, Tokenizer, Word};
//! use chartparse::grammar::Terminal;
//!
//! let tokenizer = DelimiterTokenizer::new(r"\s+")?;
//! let tokens = tokenizer.tokenize("the cat sat");
//! assert_eq!(tokens, ["the", "cat", "sat"]);
//!
//! let noun = Word::one_of(["cat", "dog"]);
//! assert!(noun.matches(&tokens[1]));
//! assert!(!noun.matches(&tokens[0]));
//! # Ok::<(), chartparse::error::LexerError>(())
//! ```

use crate::error::LexerError;
use crate::grammar::Terminal;
use compact_str::CompactString;
use regex::Regex;
use std::fmt;

/// Splits text into parser tokens
pub trait Tokenizer {
    type Token;

    fn tokenize(&self, text: &str) -> Vec<Self::Token>;
}

/// Splits text on every match of a delimiter pattern.
///
/// Empty pieces are kept: leading, trailing or repeated delimiters produce
/// empty tokens, and empty text produces a single empty token.
#[derive(Debug, Clone)]
pub struct DelimiterTokenizer {
    delimiter: Regex,
}

impl DelimiterTokenizer {
    /// Compile a tokenizer for the delimiter pattern
    ///
    /// # Errors
    ///
    /// Returns [`LexerError::InvalidDelimiter`] if `pattern` is not a valid
    /// regular expression.
    pub fn new(pattern: &str) -> Result<Self, LexerError> {
        let delimiter = Regex::new(pattern).map_err(LexerError::InvalidDelimiter)?;
        Ok(Self { delimiter })
    }

    /// The delimiter pattern as written
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.delimiter.as_str()
    }
}

impl Tokenizer for DelimiterTokenizer {
    type Token = CompactString;

    fn tokenize(&self, text: &str) -> Vec<CompactString> {
        self.delimiter.split(text).map(CompactString::from).collect()
    }
}

/// A terminal over text tokens
#[derive(Debug, Clone)]
pub enum Word {
    /// Exactly this text
    Literal(CompactString),
    /// Any one of these words
    OneOf(Vec<CompactString>),
    /// Tokens matched in full by a regular expression
    Pattern {
        source: CompactString,
        regex: Regex,
    },
}

impl Word {
    #[must_use]
    pub fn literal(text: &str) -> Self {
        Self::Literal(CompactString::from(text))
    }

    #[must_use]
    pub fn one_of<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::OneOf(
            words
                .into_iter()
                .map(|w| CompactString::from(w.as_ref()))
                .collect(),
        )
    }

    /// A terminal matching tokens that `pattern` matches from start to end
    ///
    /// # Errors
    ///
    /// Returns [`LexerError::InvalidPattern`] if `pattern` does not compile.
    pub fn pattern(pattern: &str) -> Result<Self, LexerError> {
        let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(LexerError::InvalidPattern)?;
        Ok(Self::Pattern {
            source: CompactString::from(pattern),
            regex,
        })
    }

    fn matches_text(&self, token: &str) -> bool {
        match self {
            Self::Literal(text) => text == token,
            Self::OneOf(words) => words.iter().any(|w| w == token),
            Self::Pattern { regex, .. } => regex.is_match(token),
        }
    }
}

impl PartialEq for Word {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Literal(a), Self::Literal(b)) => a == b,
            (Self::OneOf(a), Self::OneOf(b)) => a == b,
            (Self::Pattern { source: a, .. }, Self::Pattern { source: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl Eq for Word {}

impl Terminal<str> for Word {
    fn matches(&self, token: &str) -> bool {
        self.matches_text(token)
    }
}

impl Terminal<CompactString> for Word {
    fn matches(&self, token: &CompactString) -> bool {
        self.matches_text(token)
    }
}

impl Terminal<&str> for Word {
    fn matches(&self, token: &&str) -> bool {
        self.matches_text(token)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => write!(f, "'{text}'"),
            Self::OneOf(words) => write!(f, "{{{}}}", words.join("|")),
            Self::Pattern { source, .. } => write!(f, "/{source}/"),
        }
    }
}

#[cfg(feature = "serialize")]
impl serde::Serialize for Word {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
