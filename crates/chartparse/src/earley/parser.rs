//! Earley parser implementation

use crate::earley::chart::{Chart, Insertion, Item, ItemId};
use crate::earley::config::{AmbiguityPolicy, EarleyConfig};
use crate::grammar::{Grammar, NonTerminal, Symbol, Terminal};
use hashbrown::HashMap;
use log::{debug, log_enabled, trace, Level};
use smallvec::SmallVec;

/// Build the chart for `tokens`.
///
/// Columns are closed strictly left to right. Within a column every slot
/// item is processed exactly once, in insertion order, by exactly one of
/// predict, scan or complete; items added to the current column while it is
/// being closed are processed in the same pass.
///
/// Under [`AmbiguityPolicy::Merge`] every unfinished derivation of a slot is
/// carried forward, so ambiguity to the left of the dot survives later scans
/// and completions. Finished alternatives are reached through their slot.
pub fn recognize<T, N, H, Tok>(grammar: &Grammar<T, N, H>, tokens: &[Tok], config: &EarleyConfig) -> Chart
where
    T: Terminal<Tok>,
    N: NonTerminal,
{
    let start_time = std::time::Instant::now();
    let mut engine = Engine::new(grammar, tokens, config.ambiguity);

    for &rule in grammar.start_rules() {
        engine.add(Item::new(rule, 0, 0, 0, SmallVec::new()));
    }

    for position in 0..=tokens.len() {
        engine.close(position);
        trace!(
            "column {position} closed with {} items",
            engine.chart.column(position).len()
        );
    }

    let chart = engine.chart;
    let stats = chart.stats();
    debug!(
        "recognized {} tokens in {:?}: {} items ({} slots, {} alternatives)",
        tokens.len(),
        start_time.elapsed(),
        stats.items,
        stats.slots,
        stats.alternatives,
    );
    if log_enabled!(Level::Trace) {
        trace!("chart:\n{}", chart.display(grammar));
    }

    chart
}

/// Mutable state of one recognition run
struct Engine<'a, T, N: NonTerminal, H, Tok> {
    grammar: &'a Grammar<T, N, H>,
    tokens: &'a [Tok],
    policy: AmbiguityPolicy,
    chart: Chart,
    /// Column being closed
    position: usize,
    /// Latest slot of the current column whose derivations were taken up.
    /// Alternatives merged into it or an earlier slot are followed at once.
    processed: Option<ItemId>,
    /// Finished items that started in the current column, by variable. Lets
    /// the predictor step over nullable nonterminals completed before it ran.
    nullable: HashMap<&'a N, SmallVec<[ItemId; 2]>, ahash::RandomState>,
}

impl<'a, T, N, H, Tok> Engine<'a, T, N, H, Tok>
where
    T: Terminal<Tok>,
    N: NonTerminal,
{
    fn new(grammar: &'a Grammar<T, N, H>, tokens: &'a [Tok], policy: AmbiguityPolicy) -> Self {
        Self {
            grammar,
            tokens,
            policy,
            chart: Chart::new(tokens.len()),
            position: 0,
            processed: None,
            nullable: HashMap::default(),
        }
    }

    fn close(&mut self, position: usize) {
        self.position = position;
        self.processed = None;
        self.nullable.clear();

        let mut cursor = 0;
        while let Some(&id) = self.chart.column(position).items().get(cursor) {
            cursor += 1;
            self.processed = Some(id);
            self.process(id);
        }
    }

    fn process(&mut self, id: ItemId) {
        let grammar = self.grammar;
        let item = self.chart.item(id).clone();

        match item.next_symbol(grammar) {
            Some(Symbol::NonTerminal(nt)) => {
                self.predict(&item, nt);
                let derivations: SmallVec<[ItemId; 4]> = self.chart.derivations(id).collect();
                for derivation in derivations {
                    self.step_over_nullable(derivation, nt);
                }
            }
            Some(Symbol::Terminal(terminal)) => {
                let derivations: SmallVec<[ItemId; 4]> = self.chart.derivations(id).collect();
                for derivation in derivations {
                    self.scan(derivation, terminal);
                }
            }
            None => {
                if item.origin == self.position {
                    let variable = &grammar.rule(item.rule).variable;
                    self.nullable.entry(variable).or_default().push(id);
                }
                self.complete(id, &item);
            }
        }
    }

    /// Insert `item`, following a new alternative whose slot has already
    /// been processed
    fn add(&mut self, item: Item) {
        if let Insertion::Merged { slot, alternative } = self.chart.add(item, self.policy) {
            if self.is_processed(slot) {
                self.follow(alternative);
            }
        }
    }

    fn is_processed(&self, slot: ItemId) -> bool {
        self.chart.item(slot).end == self.position && self.processed.is_some_and(|last| slot <= last)
    }

    /// Take up a late alternative the way its slot was taken up
    fn follow(&mut self, alternative: ItemId) {
        let grammar = self.grammar;
        match self.chart.item(alternative).next_symbol(grammar) {
            Some(Symbol::NonTerminal(nt)) => self.step_over_nullable(alternative, nt),
            Some(Symbol::Terminal(terminal)) => self.scan(alternative, terminal),
            None => {}
        }
    }

    /// Add a fresh item for every rule of `nt`, anchored at this column
    fn predict(&mut self, item: &Item, nt: &N) {
        let grammar = self.grammar;
        let rules = grammar.rules_for(nt);
        if rules.is_empty() {
            trace!(
                "item for {} predicts undefined nonterminal {}",
                grammar.rule(item.rule).variable.name(),
                nt.name()
            );
        }
        for &rule in rules {
            self.add(Item::new(rule, 0, self.position, self.position, SmallVec::new()));
        }
    }

    fn step_over_nullable(&mut self, derivation: ItemId, nt: &N) {
        let Some(done) = self.nullable.get(nt).cloned() else {
            return;
        };
        for child in done {
            self.advance(derivation, child);
        }
    }

    /// Move the dot past a terminal that matches the token at this position
    fn scan(&mut self, derivation: ItemId, terminal: &T) {
        // Past the last token there is nothing to consume.
        let tokens = self.tokens;
        let Some(token) = tokens.get(self.position) else {
            return;
        };
        if terminal.matches(token) {
            let item = self.chart.item(derivation);
            let scanned = Item::new(
                item.rule,
                item.dot + 1,
                item.origin,
                item.end + 1,
                item.backpointers.clone(),
            );
            self.add(scanned);
        }
    }

    /// Advance every derivation in the origin column that waits on the
    /// finished item's variable
    fn complete(&mut self, id: ItemId, item: &Item) {
        let grammar = self.grammar;
        let chart = &self.chart;
        let variable = &grammar.rule(item.rule).variable;
        let waiting: Vec<ItemId> = chart
            .column(item.origin)
            .items()
            .iter()
            .copied()
            .filter(|&w| {
                chart
                    .item(w)
                    .next_symbol(grammar)
                    .and_then(Symbol::as_nonterminal)
                    .is_some_and(|nt| nt == variable)
            })
            .flat_map(|w| chart.derivations(w))
            .collect();

        for parent in waiting {
            self.advance(parent, id);
        }
    }

    /// Step `parent` over one nonterminal, recording `child` as its derivation
    fn advance(&mut self, parent: ItemId, child: ItemId) {
        let parent = self.chart.item(parent);
        let mut backpointers = parent.backpointers.clone();
        backpointers.push(child);
        let advanced = Item::new(parent.rule, parent.dot + 1, parent.origin, self.position, backpointers);
        self.add(advanced);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarBuilder;

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    enum Nt {
        S,
        A,
        B,
    }

    impl NonTerminal for Nt {
        fn name(&self) -> &str {
            match self {
                Self::S => "S",
                Self::A => "A",
                Self::B => "B",
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Ch(char);

    impl Terminal<char> for Ch {
        fn matches(&self, token: &char) -> bool {
            self.0 == *token
        }
    }

    fn t(c: char) -> Symbol<Ch, Nt> {
        Symbol::Terminal(Ch(c))
    }

    fn n(nt: Nt) -> Symbol<Ch, Nt> {
        Symbol::NonTerminal(nt)
    }

    type Builder = GrammarBuilder<Ch, Nt>;

    #[test]
    fn test_scan_past_end_is_noop() {
        let grammar = Builder::new()
            .entry_point(Nt::S)
            .rule(Nt::S, vec![t('a'), t('a')])
            .build()
            .unwrap();

        let chart = recognize(&grammar, &['a'], &EarleyConfig::default());
        assert_eq!(chart.input_len(), 1);
        assert_eq!(chart.column(1).len(), 1);
        assert!(chart.accepting(&grammar).is_empty());
    }

    #[test]
    fn test_predict_adds_each_rule_once() {
        // Left recursion predicts S from S in column 0; the second prediction
        // must not add duplicates.
        let grammar = Builder::new()
            .entry_point(Nt::S)
            .rule(Nt::S, vec![n(Nt::S), t('a')])
            .rule(Nt::S, vec![t('a')])
            .build()
            .unwrap();

        let chart = recognize(&grammar, &[] as &[char], &EarleyConfig::default());
        assert_eq!(chart.column(0).len(), 2);
    }

    #[test]
    fn test_nullable_completed_before_prediction() {
        // S -> A B, A -> ε, B -> ε. Whatever order items are processed in,
        // S must be able to step over both empty nonterminals.
        let grammar = Builder::new()
            .entry_point(Nt::S)
            .rule(Nt::S, vec![n(Nt::A), n(Nt::B)])
            .rule(Nt::A, vec![])
            .rule(Nt::B, vec![])
            .rule(Nt::B, vec![n(Nt::A)])
            .build()
            .unwrap();

        let chart = recognize(&grammar, &[] as &[char], &EarleyConfig::default());
        let accepting = chart.accepting(&grammar);
        assert!(!accepting.is_empty());
        for id in accepting {
            let item = chart.item(id);
            assert_eq!(item.backpointers.len(), 2);
        }
    }

    #[test]
    fn test_complete_appends_backpointer() {
        let grammar = Builder::new()
            .entry_point(Nt::S)
            .rule(Nt::S, vec![n(Nt::A), t('b')])
            .rule(Nt::A, vec![t('a')])
            .build()
            .unwrap();

        let chart = recognize(&grammar, &['a', 'b'], &EarleyConfig::default());
        let accepting = chart.accepting(&grammar);
        assert_eq!(accepting.len(), 1);

        let root = chart.item(accepting[0]);
        assert_eq!(root.backpointers.len(), 1);
        let child = chart.item(root.backpointers[0]);
        assert_eq!(grammar.rule(child.rule).variable, Nt::A);
        assert_eq!((child.origin, child.end), (0, 1));
    }

    #[test]
    fn test_keep_first_policy_records_no_alternatives() {
        let grammar = Builder::new()
            .entry_point(Nt::S)
            .rule(Nt::S, vec![n(Nt::S), n(Nt::S)])
            .rule(Nt::S, vec![t('x')])
            .build()
            .unwrap();
        let tokens = ['x', 'x', 'x'];

        let merged = recognize(&grammar, &tokens, &EarleyConfig::default());
        let kept = recognize(
            &grammar,
            &tokens,
            &EarleyConfig::default().with_ambiguity(AmbiguityPolicy::KeepFirst),
        );

        assert!(merged.stats().alternatives > 0);
        assert_eq!(kept.stats().alternatives, 0);
        assert_eq!(kept.stats().slots, merged.stats().slots);
        assert_eq!(kept.accepting(&grammar).len(), 1);
    }

    #[test]
    fn test_pending_alternative_is_scanned() {
        // S -> A 'c', A -> 'a' 'b' | B 'b', B -> 'a'. Both A items finish in
        // column 2 before `S -> A $ 'c'` is processed there.
        let grammar = Builder::new()
            .entry_point(Nt::S)
            .rule(Nt::S, vec![n(Nt::A), t('c')])
            .rule(Nt::A, vec![t('a'), t('b')])
            .rule(Nt::A, vec![n(Nt::B), t('b')])
            .rule(Nt::B, vec![t('a')])
            .build()
            .unwrap();

        let chart = recognize(&grammar, &['a', 'b', 'c'], &EarleyConfig::default());
        let accepting = chart.accepting(&grammar);
        assert_eq!(accepting.len(), 2);
        assert_ne!(
            chart.item(accepting[0]).backpointers,
            chart.item(accepting[1]).backpointers
        );
    }

    #[test]
    fn test_late_alternative_is_followed() {
        // S -> A 'c', A -> 'a' 'b' | 'a' B, B -> 'b'. The second A completes
        // after `S -> A $ 'c'` has already been scanned.
        let grammar = Builder::new()
            .entry_point(Nt::S)
            .rule(Nt::S, vec![n(Nt::A), t('c')])
            .rule(Nt::A, vec![t('a'), t('b')])
            .rule(Nt::A, vec![t('a'), n(Nt::B)])
            .rule(Nt::B, vec![t('b')])
            .build()
            .unwrap();
        let tokens = ['a', 'b', 'c'];

        let chart = recognize(&grammar, &tokens, &EarleyConfig::default());
        assert_eq!(chart.accepting(&grammar).len(), 2);

        let kept = recognize(
            &grammar,
            &tokens,
            &EarleyConfig::default().with_ambiguity(AmbiguityPolicy::KeepFirst),
        );
        assert_eq!(kept.accepting(&grammar).len(), 1);
    }
}
