//! # Error Handling
//!
//! Error types for every fallible step before parsing starts.
//!
//! - [`GrammarError`]: problems found while building or validating a grammar
//! - [`EarleyError`]: the parser refused the grammar
//! - [`LexerError`]: a tokenizer could not be constructed
//!
//! Parsing itself never fails: input outside the language yields no trees.
//!
//! With the `diagnostics` feature enabled every error also implements
//! [`miette::Diagnostic`] with a stable error code.

pub use crate::earley::EarleyError;
pub use crate::grammar::GrammarError;

use thiserror::Error;

#[cfg(feature = "diagnostics")]
use miette::Diagnostic;

/// Errors raised while constructing a tokenizer or text terminal
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum LexerError {
    #[error("Invalid delimiter pattern: {0}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexer::invalid_delimiter)))]
    InvalidDelimiter(#[source] regex::Error),

    #[error("Invalid token pattern: {0}")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(lexer::invalid_pattern)))]
    InvalidPattern(#[source] regex::Error),
}
