//! # Derivation Trees
//!
//! Trees reconstructed from accepting chart items.
//!
//! ## Overview
//!
//! Every interior node is labeled with the variable of the rule it was built
//! from and carries that rule's enter/exit hooks. Terminal leaves are labeled
//! with the terminal symbol of the production and carry no hooks. Each node
//! also records the span of token positions it covers.
//!
//! The parser never calls the hooks. A semantic evaluator can run them in
//! enter/exit order by implementing [`TreeVisitor`] and calling
//! [`Tree::walk`].

mod builder;
mod visitor;

pub use builder::TreeBuilder;
pub use visitor::TreeVisitor;

use crate::grammar::{NonTerminal, Symbol};
use std::fmt;
use std::ops::Range;

/// A derivation tree.
///
/// Left-recursive rules produce trees as deep as the input is long, so
/// traversal, comparison, cloning and drop all run on explicit stacks.
#[derive(Debug)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize))]
pub struct Tree<T, N, H = ()> {
    label: Symbol<T, N>,
    children: Vec<Tree<T, N, H>>,
    #[cfg_attr(feature = "serialize", serde(skip))]
    enter: Option<H>,
    #[cfg_attr(feature = "serialize", serde(skip))]
    exit: Option<H>,
    span: Range<usize>,
}

impl<T, N, H> Tree<T, N, H> {
    /// Create a terminal leaf covering `span`
    #[must_use]
    pub const fn leaf(terminal: T, span: Range<usize>) -> Self {
        Self {
            label: Symbol::Terminal(terminal),
            children: Vec::new(),
            enter: None,
            exit: None,
            span,
        }
    }

    /// Create an interior node for `variable`
    #[must_use]
    pub const fn node(
        variable: N,
        children: Vec<Self>,
        enter: Option<H>,
        exit: Option<H>,
        span: Range<usize>,
    ) -> Self {
        Self {
            label: Symbol::NonTerminal(variable),
            children,
            enter,
            exit,
            span,
        }
    }

    /// The symbol this node is labeled with
    #[must_use]
    pub const fn label(&self) -> &Symbol<T, N> {
        &self.label
    }

    /// The rule variable, for interior nodes
    #[must_use]
    pub const fn variable(&self) -> Option<&N> {
        self.label.as_nonterminal()
    }

    /// The terminal, for leaves
    #[must_use]
    pub const fn terminal(&self) -> Option<&T> {
        self.label.as_terminal()
    }

    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Hook to run before the children are visited
    #[must_use]
    pub const fn enter(&self) -> Option<&H> {
        self.enter.as_ref()
    }

    /// Hook to run after the children are visited
    #[must_use]
    pub const fn exit(&self) -> Option<&H> {
        self.exit.as_ref()
    }

    /// Token positions covered by this node (`start..end` in chart columns)
    #[must_use]
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Whether this node is labeled with a terminal
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self.label, Symbol::Terminal(_))
    }

    /// Number of nodes on the longest root-to-leaf path
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 1)];
        while let Some((node, depth)) = pending.pop() {
            deepest = deepest.max(depth);
            pending.extend(node.children.iter().map(|child| (child, depth + 1)));
        }
        deepest
    }

    /// Total number of nodes
    #[must_use]
    pub fn size(&self) -> usize {
        self.preorder().count()
    }

    /// Terminal leaves in left-to-right order
    #[must_use]
    pub fn leaves(&self) -> Vec<&T> {
        self.preorder().filter_map(Self::terminal).collect()
    }

    fn preorder(&self) -> impl Iterator<Item = &Self> {
        let mut pending = vec![self];
        std::iter::from_fn(move || {
            let node = pending.pop()?;
            pending.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

/// One node per line, indented with a tab per level
impl<T, N, H> fmt::Display for Tree<T, N, H>
where
    T: fmt::Display,
    N: NonTerminal,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pending = vec![(self, 0)];
        while let Some((node, level)) = pending.pop() {
            for _ in 0..level {
                f.write_str("\t")?;
            }
            writeln!(f, "{}", node.label)?;
            pending.extend(node.children.iter().rev().map(|child| (child, level + 1)));
        }
        Ok(())
    }
}

impl<T: Clone, N: Clone, H: Clone> Clone for Tree<T, N, H> {
    fn clone(&self) -> Self {
        let copy = |node: &Self, children| Self {
            label: node.label.clone(),
            children,
            enter: node.enter.clone(),
            exit: node.exit.clone(),
            span: node.span.clone(),
        };

        // Post-order: a node is copied once all of its children are.
        let mut done: Vec<Self> = Vec::new();
        let mut pending = vec![(self, false)];
        while let Some((node, expanded)) = pending.pop() {
            if expanded {
                let children = done.split_off(done.len() - node.children.len());
                done.push(copy(node, children));
            } else {
                pending.push((node, true));
                pending.extend(node.children.iter().rev().map(|child| (child, false)));
            }
        }
        done.pop().unwrap_or_else(|| copy(self, Vec::new()))
    }
}

impl<T: PartialEq, N: PartialEq, H: PartialEq> PartialEq for Tree<T, N, H> {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            if a.label != b.label
                || a.span != b.span
                || a.enter != b.enter
                || a.exit != b.exit
                || a.children.len() != b.children.len()
            {
                return false;
            }
            pending.extend(a.children.iter().zip(&b.children));
        }
        true
    }
}

impl<T: Eq, N: Eq, H: Eq> Eq for Tree<T, N, H> {}

impl<T, N, H> Drop for Tree<T, N, H> {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}
