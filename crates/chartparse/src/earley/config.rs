//! Configuration for Earley parser

/// What to do when a derivation arrives for an item identity that already
/// occupies its column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AmbiguityPolicy {
    /// Keep the new derivation as an alternative of the existing slot.
    ///
    /// The slot is still processed only once, but every alternative of an
    /// accepting slot yields its own tree.
    #[default]
    Merge,
    /// Keep only the first derivation to reach the slot
    KeepFirst,
}

/// How to treat productions that name a nonterminal no rule defines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UndefinedNonTerminals {
    /// Accept the grammar; predicting the symbol simply adds nothing
    #[default]
    Ignore,
    /// Refuse to build the parser
    Reject,
}

/// Configuration options for the Earley parser
#[derive(Debug, Clone, Default)]
pub struct EarleyConfig {
    /// Merge policy for derivations sharing an item identity
    pub ambiguity: AmbiguityPolicy,

    /// Treatment of undefined nonterminals
    pub undefined_nonterminals: UndefinedNonTerminals,
}

impl EarleyConfig {
    /// Create a new configuration with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ambiguity policy
    #[must_use]
    pub const fn with_ambiguity(mut self, policy: AmbiguityPolicy) -> Self {
        self.ambiguity = policy;
        self
    }

    /// Set the treatment of undefined nonterminals
    #[must_use]
    pub const fn with_undefined_nonterminals(mut self, policy: UndefinedNonTerminals) -> Self {
        self.undefined_nonterminals = policy;
        self
    }
}
