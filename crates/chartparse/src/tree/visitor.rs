use crate::tree::Tree;
use std::ops::ControlFlow;

/// Trait for visiting derivation trees
pub trait TreeVisitor<T, N, H> {
    /// Called when entering an interior node (before visiting children)
    fn enter_node(&mut self, node: &Tree<T, N, H>) -> ControlFlow<()> {
        let _ = node;
        ControlFlow::Continue(())
    }

    /// Called when exiting an interior node (after visiting children)
    fn exit_node(&mut self, node: &Tree<T, N, H>) -> ControlFlow<()> {
        let _ = node;
        ControlFlow::Continue(())
    }

    /// Called when visiting a terminal leaf
    fn visit_leaf(&mut self, leaf: &Tree<T, N, H>) -> ControlFlow<()> {
        let _ = leaf;
        ControlFlow::Continue(())
    }
}

impl<T, N, H> Tree<T, N, H> {
    /// Walk this tree depth-first, left to right.
    ///
    /// Stops early as soon as a visitor method returns `Break`.
    pub fn walk<V: TreeVisitor<T, N, H>>(&self, visitor: &mut V) -> ControlFlow<()> {
        if self.is_leaf() {
            return visitor.visit_leaf(self);
        }

        visitor.enter_node(self)?;
        // Interior nodes with the index of the next child to visit
        let mut pending = vec![(self, 0)];
        while let Some((node, next)) = pending.pop() {
            let Some(child) = node.children().get(next) else {
                visitor.exit_node(node)?;
                continue;
            };
            pending.push((node, next + 1));
            if child.is_leaf() {
                visitor.visit_leaf(child)?;
            } else {
                visitor.enter_node(child)?;
                pending.push((child, 0));
            }
        }
        ControlFlow::Continue(())
    }
}
