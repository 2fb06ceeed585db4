use crate::earley::{Chart, ItemId};
use crate::grammar::{Grammar, NonTerminal, Symbol};
use crate::tree::Tree;

/// Rebuilds derivation trees by following chart backpointers.
///
/// Each backpointer stands for one nonterminal of the production, in
/// left-to-right order, so the builder walks the production and the
/// backpointer list side by side. Terminals become leaves without hooks.
pub struct TreeBuilder<'a, T, N, H>
where
    N: NonTerminal,
{
    grammar: &'a Grammar<T, N, H>,
    chart: &'a Chart,
}

impl<'a, T, N, H> TreeBuilder<'a, T, N, H>
where
    T: Clone,
    N: NonTerminal,
    H: Clone,
{
    #[must_use]
    pub const fn new(grammar: &'a Grammar<T, N, H>, chart: &'a Chart) -> Self {
        Self { grammar, chart }
    }

    /// One tree per accepting derivation, in chart order
    #[must_use]
    pub fn build_all(&self) -> Vec<Tree<T, N, H>> {
        self.chart
            .accepting(self.grammar)
            .into_iter()
            .map(|id| self.build(id))
            .collect()
    }

    /// Build the tree rooted at `id`.
    ///
    /// Nested sub-derivations are rebuilt from the backpointers of their
    /// slot item. A nonterminal with no backpointer left to consume becomes a
    /// childless node without hooks. Works on an explicit stack of partly
    /// built nodes, so deep derivations do not exhaust the call stack.
    #[must_use]
    pub fn build(&self, id: ItemId) -> Tree<T, N, H> {
        let mut current = Frame::new(id, self.chart.item(id).origin);
        let mut parents: Vec<Frame<T, N, H>> = Vec::new();

        loop {
            let item = self.chart.item(current.id);
            let rule = self.grammar.rule(item.rule);

            match rule.production.get(current.symbol) {
                Some(Symbol::Terminal(t)) => {
                    let position = current.position;
                    current.children.push(Tree::leaf(t.clone(), position..position + 1));
                    current.position += 1;
                    current.symbol += 1;
                }
                Some(Symbol::NonTerminal(n)) => {
                    current.symbol += 1;
                    match item.backpointers.get(current.pointer) {
                        Some(&child) => {
                            current.pointer += 1;
                            let frame = Frame::new(child, self.chart.item(child).origin);
                            parents.push(std::mem::replace(&mut current, frame));
                        }
                        None => {
                            let position = current.position;
                            current
                                .children
                                .push(Tree::node(n.clone(), Vec::new(), None, None, position..position));
                        }
                    }
                }
                None => {
                    let node = Tree::node(
                        rule.variable.clone(),
                        std::mem::take(&mut current.children),
                        rule.enter.clone(),
                        rule.exit.clone(),
                        item.origin..item.end,
                    );
                    let Some(parent) = parents.pop() else {
                        return node;
                    };
                    current = parent;
                    current.position = item.end;
                    current.children.push(node);
                }
            }
        }
    }
}

/// A node under construction: the item it comes from, how far along its
/// production and backpointers the builder is, and the finished children
struct Frame<T, N, H> {
    id: ItemId,
    symbol: usize,
    pointer: usize,
    position: usize,
    children: Vec<Tree<T, N, H>>,
}

impl<T, N, H> Frame<T, N, H> {
    const fn new(id: ItemId, position: usize) -> Self {
        Self {
            id,
            symbol: 0,
            pointer: 0,
            position,
            children: Vec::new(),
        }
    }
}
