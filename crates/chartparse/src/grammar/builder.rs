use crate::grammar::{NonTerminal, RuleId, Symbol};
use hashbrown::HashMap;
use smallvec::SmallVec;

#[cfg(feature = "diagnostics")]
use miette::Diagnostic;

/// An immutable context-free grammar.
///
/// Rules keep the order in which they were added; that order decides the
/// order in which alternatives are predicted and therefore the order of the
/// trees returned for ambiguous input.
///
/// # Example
///
/// ```rust
/// use chartparse::grammar::{GrammarBuilder, NonTerminal, Symbol, Terminal};
///
/// # #[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// # struct S;
/// # impl NonTerminal for S {
/// #     fn name(&self) -> &str { "S" }
/// # }
/// # #[derive(Debug, Clone, PartialEq, Eq)]
/// # struct A;
/// # impl Terminal<char> for A {
/// #     fn matches(&self, token: &char) -> bool { *token == 'a' }
/// # }
/// let grammar = GrammarBuilder::<A, S>::new()
///     .entry_point(S)
///     .rule(S, vec![Symbol::Terminal(A)])
///     .build()
///     .expect("Failed to build grammar");
///
/// assert_eq!(grammar.start_rules().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Grammar<T, N, H = ()>
where
    N: NonTerminal,
{
    rules: Vec<Rule<T, N, H>>,
    by_variable: HashMap<N, SmallVec<[RuleId; 4]>, ahash::RandomState>,
    start: N,
}

/// Production rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule<T, N, H = ()> {
    pub variable: N,
    pub production: Vec<Symbol<T, N>>,
    /// Opaque hook attached to tree nodes built from this rule; never invoked
    /// by the parser.
    pub enter: Option<H>,
    /// Opaque hook attached to tree nodes built from this rule; never invoked
    /// by the parser.
    pub exit: Option<H>,
}

impl<T, N, H> Rule<T, N, H> {
    /// Number of symbols in the production
    #[must_use]
    pub fn len(&self) -> usize {
        self.production.len()
    }

    /// Whether this is an empty (epsilon) production
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.production.is_empty()
    }

    /// The symbol at `dot`, or `None` past the end of the production
    #[must_use]
    pub fn symbol_at(&self, dot: usize) -> Option<&Symbol<T, N>> {
        self.production.get(dot)
    }

    /// Number of nonterminal symbols in the production.
    ///
    /// A finished chart item for this rule carries exactly this many
    /// backpointers.
    #[must_use]
    pub fn nonterminal_count(&self) -> usize {
        self.production
            .iter()
            .filter(|s| matches!(s, Symbol::NonTerminal(_)))
            .count()
    }
}

impl<T, N, H> Grammar<T, N, H>
where
    N: NonTerminal,
{
    /// All rules, in insertion order. A rule's [`RuleId`] is its position here.
    #[must_use]
    pub fn rules(&self) -> &[Rule<T, N, H>] {
        &self.rules
    }

    /// Iterate over rules together with their ids
    pub fn rules_with_ids(&self) -> impl Iterator<Item = (RuleId, &Rule<T, N, H>)> {
        self.rules
            .iter()
            .enumerate()
            .map(|(idx, rule)| (RuleId::new(idx), rule))
    }

    /// Look up a rule by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was produced by a different grammar with fewer rules.
    #[must_use]
    pub fn rule(&self, id: RuleId) -> &Rule<T, N, H> {
        &self.rules[id.index()]
    }

    /// Ids of every rule whose left-hand side is `variable`, in insertion order.
    ///
    /// Empty when `variable` has no rules.
    #[must_use]
    pub fn rules_for(&self, variable: &N) -> &[RuleId] {
        self.by_variable
            .get(variable)
            .map_or(&[] as &[RuleId], SmallVec::as_slice)
    }

    /// Whether any rule defines `variable`
    #[must_use]
    pub fn defines(&self, variable: &N) -> bool {
        self.by_variable.contains_key(variable)
    }

    /// The grammar-level terminal predicate
    #[must_use]
    pub const fn is_terminal(&self, symbol: &Symbol<T, N>) -> bool {
        matches!(symbol, Symbol::Terminal(_))
    }

    /// The start nonterminal
    #[must_use]
    pub const fn start(&self) -> &N {
        &self.start
    }

    /// The start rules: every rule whose left-hand side is the start symbol
    #[must_use]
    pub fn start_rules(&self) -> &[RuleId] {
        self.rules_for(&self.start)
    }

    /// Whether `id` is one of the start rules
    #[must_use]
    pub fn is_start_rule(&self, id: RuleId) -> bool {
        self.rule(id).variable == self.start
    }

    /// Every nonterminal that has at least one rule
    pub fn nonterminals(&self) -> impl Iterator<Item = &N> {
        self.by_variable.keys()
    }
}

/// Builder for [`Grammar`]
#[derive(Debug)]
pub struct GrammarBuilder<T, N, H = ()> {
    rules: Vec<Rule<T, N, H>>,
    entry_point: Option<N>,
}

impl<T, N, H> Default for GrammarBuilder<T, N, H>
where
    N: NonTerminal,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, N, H> GrammarBuilder<T, N, H>
where
    N: NonTerminal,
{
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rules: Vec::new(),
            entry_point: None,
        }
    }

    #[must_use]
    pub fn entry_point(mut self, entry: N) -> Self {
        self.entry_point = Some(entry);
        self
    }

    #[must_use]
    pub fn rule(mut self, variable: N, production: Vec<Symbol<T, N>>) -> Self {
        self.rules.push(Rule {
            variable,
            production,
            enter: None,
            exit: None,
        });
        self
    }

    /// Add a rule carrying enter/exit hooks.
    ///
    /// The hooks are copied onto every tree node built from this rule and
    /// are otherwise ignored by the parser.
    #[must_use]
    pub fn rule_with_hooks(
        mut self,
        variable: N,
        production: Vec<Symbol<T, N>>,
        enter: Option<H>,
        exit: Option<H>,
    ) -> Self {
        self.rules.push(Rule {
            variable,
            production,
            enter,
            exit,
        });
        self
    }

    /// Build the grammar from the configured rules.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry point is missing or has no rules.
    pub fn build(self) -> Result<Grammar<T, N, H>, GrammarError> {
        let start = self.entry_point.ok_or(GrammarError::MissingEntryPoint)?;

        if u32::try_from(self.rules.len()).is_err() {
            return Err(GrammarError::TooManyRules(self.rules.len()));
        }

        let mut by_variable: HashMap<N, SmallVec<[RuleId; 4]>, ahash::RandomState> =
            HashMap::with_hasher(ahash::RandomState::new());
        for (idx, rule) in self.rules.iter().enumerate() {
            by_variable
                .entry(rule.variable.clone())
                .or_default()
                .push(RuleId::new(idx));
        }

        if !by_variable.contains_key(&start) {
            return Err(GrammarError::NoStartRule(start.name().to_string()));
        }

        Ok(Grammar {
            rules: self.rules,
            by_variable,
            start,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "diagnostics", derive(Diagnostic))]
pub enum GrammarError {
    #[error("Missing entry point")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::missing_entry_point)))]
    MissingEntryPoint,

    #[error("No rule defines the start symbol `{0}`")]
    #[cfg_attr(
        feature = "diagnostics",
        diagnostic(
            code(grammar::no_start_rule),
            help("add at least one rule whose left-hand side is the entry point")
        )
    )]
    NoStartRule(String),

    #[error("Rule for `{rule}` references undefined nonterminal `{symbol}`")]
    #[cfg_attr(
        feature = "diagnostics",
        diagnostic(code(grammar::undefined_nonterminal))
    )]
    UndefinedNonTerminal { rule: String, symbol: String },

    #[error("Grammar has {0} rules, more than a rule id can address")]
    #[cfg_attr(feature = "diagnostics", diagnostic(code(grammar::too_many_rules)))]
    TooManyRules(usize),
}
