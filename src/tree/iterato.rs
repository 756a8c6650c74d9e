//! Traversal iterators over a finished [`Node`] tree.

use super::Node;
use std::collections::VecDeque;

// --- BFS Iterator ---

/// A Breadth-First Search (BFS) iterator state.
#[derive(Clone)]
pub struct BfsIter<'a> {
    queue: VecDeque<&'a Node>,
}

impl<'a> BfsIter<'a> {
    /// Create a new BFS iterator starting at `start`.
    pub fn new(start: &'a Node) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back(start);
        BfsIter { queue }
    }
}

impl<'a> Iterator for BfsIter<'a> {
    type Item = &'a Node;
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        self.queue.extend(node.children.iter());
        Some(node)
    }
}

// --- Preorder Iterator ---

/// A pre-order DFS iterator state.
#[derive(Clone)]
pub struct PreorderIter<'a> {
    /// Stack for DFS traversal. Stores nodes to visit.
    stack: Vec<&'a Node>,
}

impl<'a> PreorderIter<'a> {
    /// Create a new pre-order iterator starting at `start`.
    pub fn new(start: &'a Node) -> Self {
        PreorderIter { stack: vec![start] }
    }
}

impl<'a> Iterator for PreorderIter<'a> {
    type Item = &'a Node;
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;

        // Push children in reverse order so the first child is processed next
        self.stack.extend(node.children.iter().rev());

        Some(node)
    }
}
