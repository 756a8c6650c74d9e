//! Linked tree produced by parent-pointer reconstruction.
//!
//! A [`Node`] exclusively owns its children, so a finished tree is a plain
//! recursive value that can be shared read-only once built. Construction goes
//! through the position-indexed [`arena::MemoTable`], where nodes refer to each
//! other by [`TreeNodeId`] only; the owned tree is detached from the arena in a
//! single pass once the reconstruction is done.
//!
//! The core components are:
//! *   [`Node`]: a tree vertex carrying its 0-based sentence position, an optional
//!     integer label and its children in attachment order.
//! *   [`TreeNodeId`]: typed 0-based position used as the memo key and as the join
//!     key between a node and its sentence token.
//! *   [`iterato`]: pre-order and breadth-first iterators over a finished tree.

use std::{
    fmt::{Display, Write},
    hash::{Hash, Hasher},
};

use itertools::Itertools;

use crate::reconstruct::ParentArray;

pub mod arena;
pub mod iterato;

use iterato::{BfsIter, PreorderIter};

/// A type-safe 0-based sentence position.
/// Wraps a `usize` index into the parent-pointer array.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeNodeId(pub(crate) usize);

impl TreeNodeId {
    /// Position of the node in its sentence, 0-based.
    pub fn position(self) -> usize {
        self.0
    }

    /// The same position as written in a parent-pointer line (1-based).
    pub fn one_based(self) -> i64 {
        self.0 as i64 + 1
    }
}

impl From<usize> for TreeNodeId {
    fn from(i: usize) -> Self {
        TreeNodeId(i)
    }
}

impl From<TreeNodeId> for usize {
    fn from(id: TreeNodeId) -> Self {
        id.0
    }
}

impl Display for TreeNodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A vertex of a reconstructed tree.
///
/// `children` are kept in the order their chains attached during
/// reconstruction, which is deterministic for a given input but not
/// necessarily left-to-right sentence order.
///
/// Drop, `Clone`, equality, hashing and both renderings walk the tree with an
/// explicit stack, so arbitrarily deep chains are safe. The derived `Debug`
/// and serde impls still recurse once per level.
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub(crate) index: usize,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub(crate) label: Option<i64>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty", default))]
    pub(crate) children: Vec<Node>,
}

impl Node {
    pub fn new(index: usize, label: Option<i64>) -> Self {
        Node {
            index,
            label,
            children: Vec::new(),
        }
    }

    /// Appends `child` as the last child of this node.
    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn id(&self) -> TreeNodeId {
        TreeNodeId(self.index)
    }

    pub fn label(&self) -> Option<i64> {
        self.label
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes reachable from (and including) this node.
    pub fn len(&self) -> usize {
        self.iter_preorder().count()
    }

    /// A node is never empty; present for symmetry with [`Node::len`].
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns a pre-order DFS iterator: the node itself, then each child
    /// subtree in attachment order.
    pub fn iter_preorder(&self) -> PreorderIter<'_> {
        PreorderIter::new(self)
    }

    /// Returns a BFS iterator starting at this node.
    pub fn iter_bfs(&self) -> BfsIter<'_> {
        BfsIter::new(self)
    }

    /// Returns an iterator over the leaves of this subtree, in pre-order.
    pub fn leaves(&self) -> impl Iterator<Item = &Node> + '_ {
        self.iter_preorder().filter(|n| n.is_leaf())
    }

    /// Height of the subtree counted in nodes: a lone leaf has depth 1.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, d)) = stack.pop() {
            max = max.max(d);
            stack.extend(node.children.iter().map(|c| (c, d + 1)));
        }
        max
    }

    /// Sorted 0-based positions of every node in this subtree.
    pub fn indices(&self) -> Vec<usize> {
        self.iter_preorder().map(|n| n.index).sorted().collect()
    }

    /// Finds the node at sentence position `index` within this subtree.
    pub fn find(&self, index: usize) -> Option<&Node> {
        self.iter_preorder().find(|n| n.index == index)
    }

    /// Re-encodes this tree as a parent-pointer array of length `len`.
    ///
    /// The receiver becomes the position pointing at the virtual root (`0`),
    /// every other node points at its parent's 1-based position and positions
    /// that are not part of the tree are marked inactive (`-1`).
    ///
    /// Returns `None` if some node index does not fit into `len` positions.
    pub fn to_parent_array(&self, len: usize) -> Option<ParentArray> {
        let mut parents = vec![-1i64; len];
        *parents.get_mut(self.index)? = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            for child in &node.children {
                *parents.get_mut(child.index)? = node.index as i64 + 1;
                stack.push(child);
            }
        }
        ParentArray::new(parents).ok()
    }

    fn write_label(&self, writer: &mut impl Write) -> std::fmt::Result {
        write!(writer, "{}", self.index)?;
        if let Some(label) = self.label {
            write!(writer, "[{label}]")?;
        }
        Ok(())
    }

    /// Renders the tree one node per line with box-drawing connectors.
    pub fn debug_draw(&self) -> String {
        let mut output = String::new();
        let _ = self.write_label(&mut output);
        output.push('\n');

        // (node, prefix, is_last_child); the first child sits on top.
        let mut stack: Vec<(&Node, String, bool)> = self
            .children
            .iter()
            .rev()
            .enumerate()
            .map(|(i, child)| (child, String::new(), i == 0))
            .collect();

        while let Some((node, prefix, is_last_child)) = stack.pop() {
            let connector = if is_last_child {
                "└── "
            } else {
                "├── "
            };
            let _ = write!(output, "{prefix}{connector}");
            let _ = node.write_label(&mut output);
            output.push('\n');

            let child_prefix = format!("{}{}", prefix, if is_last_child { "    " } else { "│   " });
            stack.extend(
                node.children
                    .iter()
                    .rev()
                    .enumerate()
                    .map(|(i, child)| (child, child_prefix.clone(), i == 0)),
            );
        }
        output
    }

    fn shape(&self) -> (usize, Option<i64>, usize) {
        (self.index, self.label, self.children.len())
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

impl Clone for Node {
    fn clone(&self) -> Self {
        // Reverse pre-order visits every subtree before its root, so a node's
        // copied children are the topmost entries of `built`.
        let order: Vec<&Node> = self.iter_preorder().collect();
        let mut built: Vec<Node> = Vec::with_capacity(order.len());
        for node in order.into_iter().rev() {
            let mut copy = Node::new(node.index, node.label);
            let first = built.len() - node.children.len();
            copy.children = built.drain(first..).rev().collect();
            built.push(copy);
        }
        built
            .pop()
            .unwrap_or_else(|| Node::new(self.index, self.label))
    }
}

/// The pre-order sequence of `(index, label, child count)` determines a tree,
/// so equality and hashing compare that sequence.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.iter_preorder()
            .map(Node::shape)
            .eq(other.iter_preorder().map(Node::shape))
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for node in self.iter_preorder() {
            node.shape().hash(state);
        }
    }
}

enum Step<'a> {
    Open { node: &'a Node, first: bool },
    Close,
}

impl Display for Node {
    /// Bracketed form, e.g. `1(0 2[3])`: index, optional label, children.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut stack = vec![Step::Open {
            node: self,
            first: true,
        }];
        while let Some(step) = stack.pop() {
            match step {
                Step::Close => f.write_char(')')?,
                Step::Open { node, first } => {
                    if !first {
                        f.write_char(' ')?;
                    }
                    node.write_label(f)?;
                    if !node.children.is_empty() {
                        f.write_char('(')?;
                        stack.push(Step::Close);
                        stack.extend(
                            node.children
                                .iter()
                                .enumerate()
                                .rev()
                                .map(|(i, child)| Step::Open {
                                    node: child,
                                    first: i == 0,
                                }),
                        );
                    }
                }
            }
        }
        Ok(())
    }
}
