//! Chart data structure for Earley parser

use crate::earley::config::AmbiguityPolicy;
use crate::grammar::{Grammar, NonTerminal, RuleId, Symbol};
use hashbrown::HashMap;
use smallvec::SmallVec;
use std::fmt;

/// Index of an item in the chart's arena.
///
/// Ids are handed out in creation order, starting from zero for every parse,
/// and double as the item number shown in chart dumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(usize);

impl ItemId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of an item within a column.
///
/// Two items with equal keys in the same column occupy the same slot, no
/// matter which backpointers they carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemKey {
    pub rule: RuleId,
    pub dot: usize,
    pub origin: usize,
}

/// An Earley item (state) in the chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// The rule being recognized
    pub rule: RuleId,
    /// Current position in the production (dot position)
    pub dot: usize,
    /// Column the rule application started in
    pub origin: usize,
    /// Column the item lives in
    pub end: usize,
    /// Finished sub-derivations, one per nonterminal left of the dot
    pub backpointers: SmallVec<[ItemId; 4]>,
}

impl Item {
    /// Create a new Earley item
    #[must_use]
    pub const fn new(
        rule: RuleId,
        dot: usize,
        origin: usize,
        end: usize,
        backpointers: SmallVec<[ItemId; 4]>,
    ) -> Self {
        Self {
            rule,
            dot,
            origin,
            end,
            backpointers,
        }
    }

    /// The identity used for deduplication within a column
    #[must_use]
    pub const fn key(&self) -> ItemKey {
        ItemKey {
            rule: self.rule,
            dot: self.dot,
            origin: self.origin,
        }
    }

    /// Check if this item is finished (dot is at the end)
    #[must_use]
    pub fn is_finished<T, N, H>(&self, grammar: &Grammar<T, N, H>) -> bool
    where
        N: NonTerminal,
    {
        self.dot >= grammar.rule(self.rule).len()
    }

    /// Get the symbol after the dot
    #[must_use]
    pub fn next_symbol<'g, T, N, H>(&self, grammar: &'g Grammar<T, N, H>) -> Option<&'g Symbol<T, N>>
    where
        N: NonTerminal,
    {
        grammar.rule(self.rule).symbol_at(self.dot)
    }
}

/// Outcome of [`Chart::add`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// The item opened a new slot and must be processed
    Added(ItemId),
    /// The slot existed; the item was kept as an alternative derivation
    Merged { slot: ItemId, alternative: ItemId },
    /// The slot already holds a derivation with the same backpointers
    Duplicate(ItemId),
    /// The slot existed and the policy discarded the new derivation
    Dropped(ItemId),
}

impl Insertion {
    /// Whether the insertion opened a new slot
    #[must_use]
    pub const fn is_new(&self) -> bool {
        matches!(self, Self::Added(_))
    }

    /// The slot the item ended up in
    #[must_use]
    pub const fn slot(&self) -> ItemId {
        match *self {
            Self::Added(id) | Self::Duplicate(id) | Self::Dropped(id) => id,
            Self::Merged { slot, .. } => slot,
        }
    }
}

/// One chart column: the items ending at a single input position
#[derive(Debug, Clone, Default)]
pub struct Column {
    /// Slot items in insertion order; this is also the processing worklist
    slots: Vec<ItemId>,
    index: HashMap<ItemKey, ItemId, ahash::RandomState>,
    alternatives: HashMap<ItemId, SmallVec<[ItemId; 2]>, ahash::RandomState>,
}

impl Column {
    /// Slot items in the order they were added
    #[must_use]
    pub fn items(&self) -> &[ItemId] {
        &self.slots
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The slot item with the given identity, if present
    #[must_use]
    pub fn get(&self, key: &ItemKey) -> Option<ItemId> {
        self.index.get(key).copied()
    }

    /// Alternative derivations merged into `slot`
    #[must_use]
    pub fn alternatives(&self, slot: ItemId) -> &[ItemId] {
        self.alternatives
            .get(&slot)
            .map_or(&[] as &[ItemId], SmallVec::as_slice)
    }

    fn alternative_count(&self) -> usize {
        self.alternatives.values().map(SmallVec::len).sum()
    }
}

/// Chart for Earley parsing (set of items for each position)
#[derive(Debug, Clone)]
pub struct Chart {
    /// Every item ever created, slot items and alternatives alike
    arena: Vec<Item>,
    /// `columns[k]` holds the items that end at input position `k`
    columns: Vec<Column>,
}

impl Chart {
    /// Create a new chart for parsing input of given length
    #[must_use]
    pub fn new(input_len: usize) -> Self {
        Self {
            arena: Vec::new(),
            columns: vec![Column::default(); input_len + 1],
        }
    }

    /// Number of input tokens the chart was built for. The chart has one
    /// more column than this.
    #[must_use]
    pub fn input_len(&self) -> usize {
        self.columns.len() - 1
    }

    /// Get the column at a given position
    #[must_use]
    pub fn column(&self, position: usize) -> &Column {
        &self.columns[position]
    }

    /// Resolve an item id
    #[must_use]
    pub fn item(&self, id: ItemId) -> &Item {
        &self.arena[id.0]
    }

    /// Every item in creation order
    pub fn items(&self) -> impl Iterator<Item = (ItemId, &Item)> {
        self.arena.iter().enumerate().map(|(idx, item)| (ItemId(idx), item))
    }

    /// Alternative derivations merged into the slot `id`
    #[must_use]
    pub fn alternatives(&self, id: ItemId) -> &[ItemId] {
        self.columns[self.item(id).end].alternatives(id)
    }

    /// A slot followed by its alternative derivations
    pub fn derivations(&self, slot: ItemId) -> impl Iterator<Item = ItemId> + '_ {
        std::iter::once(slot).chain(self.alternatives(slot).iter().copied())
    }

    /// Add an item to the column given by its `end`.
    ///
    /// When the item's identity is already present, `policy` decides whether
    /// a derivation with different backpointers is kept as an alternative.
    pub fn add(&mut self, item: Item, policy: AmbiguityPolicy) -> Insertion {
        let key = item.key();
        let position = item.end;

        let Some(slot) = self.columns[position].get(&key) else {
            let id = self.push(item);
            let column = &mut self.columns[position];
            column.index.insert(key, id);
            column.slots.push(id);
            return Insertion::Added(id);
        };

        let same_derivation = self
            .derivations(slot)
            .any(|existing| self.item(existing).backpointers == item.backpointers);
        if same_derivation {
            return Insertion::Duplicate(slot);
        }

        match policy {
            AmbiguityPolicy::KeepFirst => Insertion::Dropped(slot),
            AmbiguityPolicy::Merge => {
                let alternative = self.push(item);
                self.columns[position]
                    .alternatives
                    .entry(slot)
                    .or_default()
                    .push(alternative);
                Insertion::Merged { slot, alternative }
            }
        }
    }

    fn push(&mut self, item: Item) -> ItemId {
        let id = ItemId(self.arena.len());
        self.arena.push(item);
        id
    }

    /// Accepting derivations: finished start-rule items in the last column
    /// that span the whole input, each slot followed by its alternatives.
    #[must_use]
    pub fn accepting<T, N, H>(&self, grammar: &Grammar<T, N, H>) -> Vec<ItemId>
    where
        N: NonTerminal,
    {
        let last = self.input_len();
        self.columns[last]
            .items()
            .iter()
            .copied()
            .filter(|&id| {
                let item = self.item(id);
                item.origin == 0 && grammar.is_start_rule(item.rule) && item.is_finished(grammar)
            })
            .flat_map(|slot| self.derivations(slot))
            .collect()
    }

    /// Summary counts for logging and benchmarks
    #[must_use]
    pub fn stats(&self) -> ChartStats {
        ChartStats {
            columns: self.columns.len(),
            slots: self.columns.iter().map(Column::len).sum(),
            alternatives: self.columns.iter().map(Column::alternative_count).sum(),
            items: self.arena.len(),
        }
    }

    /// Render the chart one item per line, grouped by column
    #[must_use]
    pub fn display<'a, T, N, H>(&'a self, grammar: &'a Grammar<T, N, H>) -> ChartDisplay<'a, T, N, H>
    where
        N: NonTerminal,
    {
        ChartDisplay {
            chart: self,
            grammar,
        }
    }
}

/// Size summary of a finished chart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChartStats {
    pub columns: usize,
    /// Distinct `(rule, dot, origin)` identities across all columns
    pub slots: usize,
    /// Derivations merged into an existing slot
    pub alternatives: usize,
    /// Arena size (slots + alternatives)
    pub items: usize,
}

/// Display adapter returned by [`Chart::display`].
///
/// Each item is printed as
/// `{id}. {lhs} -> {symbols, $ marking the dot} [{origin}-{end}] [{backpointers}]`.
pub struct ChartDisplay<'a, T, N, H>
where
    N: NonTerminal,
{
    chart: &'a Chart,
    grammar: &'a Grammar<T, N, H>,
}

impl<T, N, H> ChartDisplay<'_, T, N, H>
where
    T: fmt::Debug,
    N: NonTerminal,
{
    fn write_item(&self, f: &mut fmt::Formatter<'_>, id: ItemId) -> fmt::Result {
        let item = self.chart.item(id);
        let rule = self.grammar.rule(item.rule);

        write!(f, "{id}. {} ->", rule.variable.name())?;
        for (idx, symbol) in rule.production.iter().enumerate() {
            if idx == item.dot {
                f.write_str(" $")?;
            }
            match symbol {
                Symbol::Terminal(t) => write!(f, " {t:?}")?,
                Symbol::NonTerminal(n) => write!(f, " {}", n.name())?,
            }
        }
        if item.dot >= rule.len() {
            f.write_str(" $")?;
        }

        write!(f, " [{}-{}] [", item.origin, item.end)?;
        for (idx, bp) in item.backpointers.iter().enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{bp}")?;
        }
        f.write_str("]")
    }
}

impl<T, N, H> fmt::Display for ChartDisplay<'_, T, N, H>
where
    T: fmt::Debug,
    N: NonTerminal,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, column) in self.chart.columns.iter().enumerate() {
            writeln!(f, "== column {position} ==")?;
            for &slot in column.items() {
                self.write_item(f, slot)?;
                f.write_str("\n")?;
                for &alt in column.alternatives(slot) {
                    f.write_str("  | ")?;
                    self.write_item(f, alt)?;
                    f.write_str("\n")?;
                }
            }
        }
        Ok(())
    }
}
