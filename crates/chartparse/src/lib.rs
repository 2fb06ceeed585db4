//! # Chartparse
//!
//! An Earley chart parser for arbitrary context-free grammars.
//!
//! ## Overview
//!
//! Chartparse recognizes a token sequence against a grammar and rebuilds
//! every derivation it finds as a tree:
//!
//! - **Any context-free grammar**: left recursion, empty rules and
//!   ambiguity need no grammar rewriting
//! - **Arena-backed chart**: items refer to rules and to each other by index
//! - **All derivations**: one tree per accepting derivation, or only the
//!   first with [`AmbiguityPolicy::KeepFirst`]
//! - **Semantic hooks**: opaque per-rule enter/exit values copied onto tree
//!   nodes for an external evaluator
//!
//! ## Quick Start
//!
//! ```rust
//! use chartparse::lexer::{DelimiterTokenizer, Word};
//! use chartparse::{EarleyConfig, EarleyParser, GrammarBuilder, NonTerminal, Symbol};
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
//! let grammar = GrammarBuilder::<Word, Var>::new()
//!     .entry_point(Var::Sum)
//!     .rule(
//!         Var::Sum,
//!         vec![
//!             Symbol::NonTerminal(Var::Sum),
//!             Symbol::Terminal(Word::literal("+")),
//!             Symbol::NonTerminal(Var::Sum),
//!         ],
//!     )
//!     .rule(Var::Sum, vec![Symbol::Terminal(Word::pattern("[0-9]+")?)])
//!     .build()?;
//!
//! let parser = EarleyParser::new(&grammar, EarleyConfig::default())?;
//! let tokenizer = DelimiterTokenizer::new(r"\s+")?;
//!
//! // Two ways to group a three-term sum.
//! assert_eq!(parser.parse_text("1 + 2 + 3", &tokenizer).len(), 2);
//!
//! let trees = parser.parse_text("1 + 2", &tokenizer);
//! assert_eq!(
//!     trees[0].to_string(),
//!     "Sum\n\tSum\n\t\t/[0-9]+/\n\t'+'\n\tSum\n\t\t/[0-9]+/\n"
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade: per-parse summaries at
//! `debug`, column sizes and the full chart dump at `trace`. Install any
//! `log` implementation to see them.

pub mod earley;
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod tree;

// Re-export commonly used types
pub use earley::{AmbiguityPolicy, Chart, EarleyConfig, EarleyParser, UndefinedNonTerminals};
pub use error::{EarleyError, GrammarError, LexerError};
pub use grammar::{Grammar, GrammarBuilder, NonTerminal, Rule, RuleId, Symbol, Terminal};
pub use lexer::{DelimiterTokenizer, Tokenizer, Word};
pub use tree::{Tree, TreeVisitor};
