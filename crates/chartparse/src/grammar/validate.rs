use crate::grammar::{Grammar, GrammarError, NonTerminal, Symbol};
use hashbrown::HashSet;

/// Check for references to nonterminals that no rule defines.
///
/// Such a reference never completes: predicting it adds no items. Returns one
/// [`GrammarError::UndefinedNonTerminal`] per distinct (rule, symbol) pair, in
/// rule order.
pub fn undefined_nonterminals<T, N, H>(grammar: &Grammar<T, N, H>) -> Vec<GrammarError>
where
    N: NonTerminal,
{
    let mut errors = Vec::new();
    let mut reported: HashSet<(&N, &N), ahash::RandomState> = HashSet::default();

    for rule in grammar.rules() {
        for symbol in &rule.production {
            let Symbol::NonTerminal(nt) = symbol else {
                continue;
            };
            if !grammar.defines(nt) && reported.insert((&rule.variable, nt)) {
                errors.push(GrammarError::UndefinedNonTerminal {
                    rule: rule.variable.name().to_string(),
                    symbol: nt.name().to_string(),
                });
            }
        }
    }

    errors
}
