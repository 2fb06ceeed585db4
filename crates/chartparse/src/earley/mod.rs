//! # Earley Parser
//!
//! Chart parser for arbitrary context-free grammars.
//!
//! The chart has one column per input position. Each column holds the items
//! that end there, and the engine closes the columns one after another under
//! predict, scan and complete. Ambiguous, left-recursive and empty rules are
//! all handled; whether the later derivations of an ambiguous item are kept
//! is decided by [`AmbiguityPolicy`].

mod chart;
mod config;
mod parser;

pub use chart::{Chart, ChartDisplay, ChartStats, Column, Insertion, Item, ItemId, ItemKey};
pub use config::{AmbiguityPolicy, EarleyConfig, UndefinedNonTerminals};

use crate::grammar::{Grammar, GrammarError, NonTerminal, Terminal};
use crate::lexer::Tokenizer;
use crate::tree::{Tree, TreeBuilder};

#[cfg(feature = "diagnostics")]
use miette::Diagnostic;

/// Earley parser over a grammar.
///
/// The parser owns a copy of the grammar and keeps no state between parses,
/// so the same parser can be used for any number of inputs.
///
/// # Example
///
/// ```rust
/// use chartparse::earley::{EarleyConfig, EarleyParser};
/// use chartparse::grammar::{GrammarBuilder, NonTerminal, Symbol};
///
/// # #[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// # struct S;
/// # impl NonTerminal for S {
/// #     fn name(&self) -> &str { "S" }
/// # }
/// let grammar = GrammarBuilder::<char, S>::new()
///     .entry_point(S)
///     .rule(S, vec![Symbol::Terminal('a')])
///     .build()
///     .expect("Failed to build grammar");
///
/// let parser = EarleyParser::new(&grammar, EarleyConfig::default())
///     .expect("Failed to create parser");
/// assert!(parser.accepts(&['a']));
/// assert!(parser.parse(&['b']).is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct EarleyParser<T, N, H = ()>
where
    N: NonTerminal,
{
    grammar: Grammar<T, N, H>,
    config: EarleyConfig,
}

/// Errors raised while setting up an [`EarleyParser`].
///
/// Parsing itself never fails; an input outside the language simply yields
/// no trees.
#[derive(Debug, thiserror::Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum EarleyError {
    /// The grammar was refused under [`UndefinedNonTerminals::Reject`].
    ///
    /// The message joins every [`GrammarError`] found, separated by `, `.
    #[error("Grammar validation failed: {0}")]
    #[cfg_attr(
        feature = "diagnostics",
        diagnostic(
            code(earley::grammar_validation_failed),
            help("define the missing nonterminals or use UndefinedNonTerminals::Ignore")
        )
    )]
    GrammarValidationFailed(String),
}

impl<T, N, H> EarleyParser<T, N, H>
where
    T: Clone,
    N: NonTerminal,
    H: Clone,
{
    /// Create a parser for `grammar`.
    ///
    /// # Errors
    ///
    /// With [`UndefinedNonTerminals::Reject`], fails when a production names
    /// a nonterminal that no rule defines.
    pub fn new(grammar: &Grammar<T, N, H>, config: EarleyConfig) -> Result<Self, EarleyError> {
        if config.undefined_nonterminals == UndefinedNonTerminals::Reject {
            let errors = Self::validate(grammar);
            if !errors.is_empty() {
                return Err(EarleyError::GrammarValidationFailed(
                    errors
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", "),
                ));
            }
        }

        Ok(Self {
            grammar: grammar.clone(),
            config,
        })
    }

    /// Problems that [`UndefinedNonTerminals::Reject`] refuses
    #[must_use]
    pub fn validate(grammar: &Grammar<T, N, H>) -> Vec<GrammarError> {
        crate::grammar::undefined_nonterminals(grammar)
    }

    #[must_use]
    pub const fn grammar(&self) -> &Grammar<T, N, H> {
        &self.grammar
    }

    #[must_use]
    pub const fn config(&self) -> &EarleyConfig {
        &self.config
    }

    /// Run the recognizer and return the full chart
    #[must_use]
    pub fn recognize<Tok>(&self, tokens: &[Tok]) -> Chart
    where
        T: Terminal<Tok>,
    {
        parser::recognize(&self.grammar, tokens, &self.config)
    }

    /// Whether the grammar derives `tokens`
    #[must_use]
    pub fn accepts<Tok>(&self, tokens: &[Tok]) -> bool
    where
        T: Terminal<Tok>,
    {
        !self.recognize(tokens).accepting(&self.grammar).is_empty()
    }

    /// Parse `tokens` into one tree per accepting derivation.
    ///
    /// Returns an empty vector when the input is not in the language.
    #[must_use]
    pub fn parse<Tok>(&self, tokens: &[Tok]) -> Vec<Tree<T, N, H>>
    where
        T: Terminal<Tok>,
    {
        let chart = self.recognize(tokens);
        let trees = TreeBuilder::new(&self.grammar, &chart).build_all();
        log::debug!("{} derivations for {} tokens", trees.len(), tokens.len());
        trees
    }

    /// Tokenize `text` and parse the result
    #[must_use]
    pub fn parse_text<Z>(&self, text: &str, tokenizer: &Z) -> Vec<Tree<T, N, H>>
    where
        Z: Tokenizer,
        T: Terminal<Z::Token>,
    {
        self.parse(&tokenizer.tokenize(text))
    }
}
