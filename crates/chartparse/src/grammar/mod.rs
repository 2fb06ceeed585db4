//! # Grammar Module
//!
//! Context-free grammar definition consumed by the chart parser.
//!
//! ## Overview
//!
//! A grammar is an ordered table of [`Rule`]s, each pairing a left-hand side
//! nonterminal (its *variable*) with a production: an ordered sequence of
//! [`Symbol`]s. Rules are addressed by a stable [`RuleId`], so chart items
//! never own or clone rule data.
//!
//! Terminal symbols decide for themselves whether they match a token through
//! the [`Terminal`] trait; the grammar only tells the engine which symbols
//! are terminals.
//!
//! ## Usage
//!
//! ```rust
//! use chartparse::grammar::{GrammarBuilder, NonTerminal, Symbol, Terminal};
//!
//! #[derive(Debug, Clone, PartialEq, Eq, Hash)]
//! enum Var {
//!     Sum,
//! }
//!
//! impl NonTerminal for Var {
//!     fn name(&self) -> &str {
//!         "Sum"
//!     }
//! }
//!
//! #[derive(Debug, Clone, PartialEq, Eq)]
//! struct Lit(&'static str);
//!
//! impl Terminal<&str> for Lit {
//!     fn matches(&self, token: &&str) -> bool {
//!         self.0 == *token
//!     }
//! }
//!
//! let grammar = GrammarBuilder::<Lit, Var>::new()
//!     .entry_point(Var::Sum)
//!     .rule(
//!         Var::Sum,
//!         vec![
//!             Symbol::NonTerminal(Var::Sum),
//!             Symbol::Terminal(Lit("+")),
//!             Symbol::NonTerminal(Var::Sum),
//!         ],
//!     )
//!     .rule(Var::Sum, vec![Symbol::Terminal(Lit("n"))])
//!     .build()?;
//!
//! assert_eq!(grammar.rules_for(&Var::Sum).len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod validate;

pub use builder::*;
pub use validate::*;

use std::fmt;

/// Trait for nonterminal (grammar variable) types
pub trait NonTerminal: Clone + fmt::Debug + std::hash::Hash + Eq {
    /// Get the name of this nonterminal
    fn name(&self) -> &str;
}

/// Trait for terminal symbols.
///
/// A terminal decides whether a single input token belongs to it. This is
/// the only point where the parser looks at token contents.
pub trait Terminal<Tok: ?Sized>: Clone + fmt::Debug {
    /// Whether `token` is a member of this terminal
    fn matches(&self, token: &Tok) -> bool;
}

/// Characters match themselves, for grammars over `&[char]`
impl Terminal<char> for char {
    fn matches(&self, token: &char) -> bool {
        self == token
    }
}

/// A grammar symbol: either a terminal or a nonterminal
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub enum Symbol<T, N> {
    Terminal(T),
    NonTerminal(N),
}

impl<T, N> Symbol<T, N> {
    /// The nonterminal this symbol refers to, if any
    pub const fn as_nonterminal(&self) -> Option<&N> {
        match self {
            Self::NonTerminal(n) => Some(n),
            Self::Terminal(_) => None,
        }
    }

    /// The terminal this symbol refers to, if any
    pub const fn as_terminal(&self) -> Option<&T> {
        match self {
            Self::Terminal(t) => Some(t),
            Self::NonTerminal(_) => None,
        }
    }
}

impl<T: fmt::Display, N: NonTerminal> fmt::Display for Symbol<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terminal(t) => write!(f, "{t}"),
            Self::NonTerminal(n) => f.write_str(n.name()),
        }
    }
}

/// Stable index of a rule in its grammar's rule table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(u32);

impl RuleId {
    // `GrammarBuilder::build` rejects tables that do not fit in a u32.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) const fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Position of the rule in [`Grammar::rules`]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}
