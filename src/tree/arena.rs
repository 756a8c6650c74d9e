use bitvec::vec::BitVec;

use super::{Node, TreeNodeId};

/// A node as stored in the memo table: its label plus an ordered vector of
/// child positions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArenaNode {
    pub label: Option<i64>,
    pub children: Vec<TreeNodeId>,
}

/// Per-line memo table.
///
/// One slot per sentence position; a slot only holds a node once its bit in
/// `built` is set. Nodes refer to each other by position, never by ownership,
/// so a position can be looked up after it has been attached somewhere.
///
/// `in_walk` marks the positions built by the chain walk in progress. Reaching
/// one of them again means the parent pointers loop.
#[derive(Clone, Debug)]
pub struct MemoTable {
    nodes: Vec<ArenaNode>,
    built: BitVec,
    in_walk: BitVec,
    walk: Vec<TreeNodeId>,
}

impl MemoTable {
    pub fn new(len: usize) -> Self {
        MemoTable {
            nodes: vec![ArenaNode::default(); len],
            built: BitVec::repeat(false, len),
            in_walk: BitVec::repeat(false, len),
            walk: Vec::new(),
        }
    }

    pub fn contains(&self, id: TreeNodeId) -> bool {
        self.built.get(id.0).is_some_and(|b| *b)
    }

    /// Whether `id` was built by the current chain walk.
    pub fn in_current_walk(&self, id: TreeNodeId) -> bool {
        self.in_walk.get(id.0).is_some_and(|b| *b)
    }

    /// Number of positions that received a node.
    pub fn n_built(&self) -> usize {
        self.built.count_ones()
    }

    /// Builds the node for `id`. A position is built at most once.
    pub fn insert(&mut self, id: TreeNodeId, label: Option<i64>) {
        debug_assert!(!self.contains(id), "position {id} built twice");
        self.nodes[id.0] = ArenaNode {
            label,
            children: Vec::new(),
        };
        self.built.set(id.0, true);
        self.in_walk.set(id.0, true);
        self.walk.push(id);
    }

    /// Adds `child` as the *last* child of `parent`.
    pub fn add_child(&mut self, parent: TreeNodeId, child: TreeNodeId) {
        self.nodes[parent.0].children.push(child);
    }

    /// Closes the current chain walk.
    pub fn end_walk(&mut self) {
        for id in self.walk.drain(..) {
            self.in_walk.set(id.0, false);
        }
    }

    /// Moves the subtree rooted at `root` out of the arena into an owned tree.
    ///
    /// Nodes not reachable from `root` are dropped. Iterative post-order, so
    /// long chains do not grow the call stack.
    pub fn into_tree(mut self, root: TreeNodeId) -> Node {
        let mut finished: Vec<Option<Node>> = vec![None; self.nodes.len()];
        let mut stack = vec![(root, false)];

        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                let ArenaNode { label, children } = std::mem::take(&mut self.nodes[id.0]);
                let mut node = Node::new(id.0, label);
                node.children = children
                    .into_iter()
                    .filter_map(|c| finished[c.0].take())
                    .collect();
                finished[id.0] = Some(node);
            } else {
                stack.push((id, true));
                for &child in self.nodes[id.0].children.iter().rev() {
                    stack.push((child, false));
                }
            }
        }

        finished[root.0]
            .take()
            .unwrap_or_else(|| Node::new(root.0, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detach_keeps_attachment_order() {
        let mut memo = MemoTable::new(4);
        for i in 0..4 {
            memo.insert(TreeNodeId(i), None);
        }
        memo.add_child(TreeNodeId(1), TreeNodeId(3));
        memo.add_child(TreeNodeId(1), TreeNodeId(0));
        memo.add_child(TreeNodeId(0), TreeNodeId(2));

        let tree = memo.into_tree(TreeNodeId(1));
        assert_eq!(tree.to_string(), "1(3 0(2))");
    }

    #[test]
    fn unreachable_nodes_are_dropped() {
        let mut memo = MemoTable::new(3);
        memo.insert(TreeNodeId(0), Some(4));
        memo.insert(TreeNodeId(2), None);
        memo.add_child(TreeNodeId(2), TreeNodeId(1));

        assert_eq!(memo.n_built(), 2);
        let tree = memo.into_tree(TreeNodeId(0));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.label(), Some(4));
    }

    #[test]
    fn walk_marks_are_cleared() {
        let mut memo = MemoTable::new(2);
        memo.insert(TreeNodeId(0), None);
        assert!(memo.in_current_walk(TreeNodeId(0)));
        memo.end_walk();
        assert!(!memo.in_current_walk(TreeNodeId(0)));
        assert!(memo.contains(TreeNodeId(0)));
        assert!(!memo.contains(TreeNodeId(1)));
        assert!(!memo.contains(TreeNodeId(7)));
    }
}
