//! Property-based tests for the Earley parser
//!
//! These tests use proptest to generate random token sequences and check
//! the parser against properties that hold for any input.

#![cfg(test)]

use chartparse::earley::{EarleyConfig, EarleyParser};
use chartparse::grammar::{Grammar, GrammarBuilder, NonTerminal, Symbol, Terminal};
use proptest::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum PropNonTerminal {
    S,
    Part,
    Empty,
}

impl NonTerminal for PropNonTerminal {
    fn name(&self) -> &str {
        match self {
            Self::S => "S",
            Self::Part => "Part",
            Self::Empty => "Empty",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PropTerminal(&'static str);

impl Terminal<&str> for PropTerminal {
    fn matches(&self, token: &&str) -> bool {
        self.0 == *token
    }
}

type PropGrammar = Grammar<PropTerminal, PropNonTerminal>;

fn t(text: &'static str) -> Symbol<PropTerminal, PropNonTerminal> {
    Symbol::Terminal(PropTerminal(text))
}

fn s() -> Symbol<PropTerminal, PropNonTerminal> {
    Symbol::NonTerminal(PropNonTerminal::S)
}

/// S -> S '+' S | 'n'
fn sum_grammar() -> PropGrammar {
    GrammarBuilder::new()
        .entry_point(PropNonTerminal::S)
        .rule(PropNonTerminal::S, vec![s(), t("+"), s()])
        .rule(PropNonTerminal::S, vec![t("n")])
        .build()
        .unwrap()
}

/// S -> S S | 'a' | 'b' | Empty, Empty -> ε
fn any_string_grammar() -> PropGrammar {
    GrammarBuilder::new()
        .entry_point(PropNonTerminal::S)
        .rule(PropNonTerminal::S, vec![s(), s()])
        .rule(PropNonTerminal::S, vec![t("a")])
        .rule(PropNonTerminal::S, vec![t("b")])
        .rule(
            PropNonTerminal::S,
            vec![Symbol::NonTerminal(PropNonTerminal::Empty)],
        )
        .rule(PropNonTerminal::Empty, vec![])
        .build()
        .unwrap()
}

/// S -> Part Part 'c', Part -> Part 'a' | 'a'
fn split_grammar() -> PropGrammar {
    let part = || Symbol::NonTerminal(PropNonTerminal::Part);
    GrammarBuilder::new()
        .entry_point(PropNonTerminal::S)
        .rule(PropNonTerminal::S, vec![part(), part(), t("c")])
        .rule(PropNonTerminal::Part, vec![part(), t("a")])
        .rule(PropNonTerminal::Part, vec![t("a")])
        .build()
        .unwrap()
}

fn well_formed_sum(tokens: &[&str]) -> bool {
    tokens.len() % 2 == 1
        && tokens
            .iter()
            .enumerate()
            .all(|(idx, tok)| *tok == if idx % 2 == 0 { "n" } else { "+" })
}

fn sum_tokens() -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(prop_oneof![Just("n"), Just("+")], 0..12)
}

fn ab_tokens() -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(prop_oneof![Just("a"), Just("b")], 0..8)
}

proptest! {
    #[test]
    fn sums_accepted_iff_well_formed(tokens in sum_tokens()) {
        let grammar = sum_grammar();
        let parser = EarleyParser::new(&grammar, EarleyConfig::default()).unwrap();

        let trees = parser.parse(&tokens);
        prop_assert_eq!(!trees.is_empty(), well_formed_sum(&tokens));

        if !trees.is_empty() {
            // One derivation per choice of the top-level '+'.
            let pluses = tokens.iter().filter(|tok| **tok == "+").count();
            prop_assert_eq!(trees.len(), pluses.max(1));
        }
    }

    #[test]
    fn ambiguity_survives_a_trailing_terminal(len in 1usize..30) {
        let grammar = split_grammar();
        let parser = EarleyParser::new(&grammar, EarleyConfig::default()).unwrap();
        let mut tokens = vec!["a"; len];
        tokens.push("c");

        // One tree per place the first Part can end.
        let trees = parser.parse(&tokens);
        prop_assert_eq!(trees.len(), len - 1);

        let mut splits: Vec<usize> = trees.iter().map(|tree| tree.children()[0].span().end).collect();
        splits.sort_unstable();
        prop_assert_eq!(splits, (1..len).collect::<Vec<_>>());
        for tree in &trees {
            prop_assert_eq!(tree.leaves().len(), len + 1);
        }
    }

    #[test]
    fn every_tree_yields_its_input(tokens in ab_tokens()) {
        let grammar = any_string_grammar();
        let parser = EarleyParser::new(&grammar, EarleyConfig::default()).unwrap();

        let trees = parser.parse(&tokens);
        prop_assert!(!trees.is_empty());

        for tree in &trees {
            let leaves: Vec<&str> = tree.leaves().into_iter().map(|leaf| leaf.0).collect();
            prop_assert_eq!(&leaves, &tokens);
            prop_assert_eq!(tree.span(), 0..tokens.len());
        }
    }

    #[test]
    fn finished_items_carry_one_backpointer_per_nonterminal(tokens in ab_tokens()) {
        let grammar = any_string_grammar();
        let parser = EarleyParser::new(&grammar, EarleyConfig::default()).unwrap();
        let chart = parser.recognize(&tokens);

        for (_, item) in chart.items() {
            if item.is_finished(&grammar) {
                prop_assert_eq!(
                    item.backpointers.len(),
                    grammar.rule(item.rule).nonterminal_count()
                );
            }
        }
    }

    #[test]
    fn parsing_is_deterministic(tokens in sum_tokens()) {
        let grammar = sum_grammar();
        let parser = EarleyParser::new(&grammar, EarleyConfig::default()).unwrap();

        let first = parser.parse(&tokens);
        let second = parser.parse(&tokens);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn recursion_direction_does_not_matter(len in 1usize..40) {
        let left: PropGrammar = GrammarBuilder::new()
            .entry_point(PropNonTerminal::S)
            .rule(PropNonTerminal::S, vec![s(), t("a")])
            .rule(PropNonTerminal::S, vec![t("a")])
            .build()
            .unwrap();
        let right: PropGrammar = GrammarBuilder::new()
            .entry_point(PropNonTerminal::S)
            .rule(PropNonTerminal::S, vec![t("a"), s()])
            .rule(PropNonTerminal::S, vec![t("a")])
            .build()
            .unwrap();
        let tokens = vec!["a"; len];

        for grammar in [left, right] {
            let parser = EarleyParser::new(&grammar, EarleyConfig::default()).unwrap();
            let trees = parser.parse(&tokens);
            prop_assert_eq!(trees.len(), 1);
            prop_assert_eq!(trees[0].depth(), len + 1);
        }
    }
}
