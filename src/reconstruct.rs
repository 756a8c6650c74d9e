//! Parent-pointer to tree reconstruction.
//!
//! A sentence tree arrives as one integer per token position. The value at
//! 1-based position `p` is the 1-based position of `p`'s parent, `0` when `p`
//! hangs off the virtual root, or `-1` when `p` takes no part in the tree.
//!
//! [`Reconstructor`] turns such an array into a linked [`Node`] tree in a
//! single memoized pass. Positions are scanned left to right; from each
//! unvisited active position a *chain walk* follows parent pointers upward,
//! building one node per step and linking every new node above the previous
//! one, until it reaches a position that is already built (the chain is
//! grafted there) or the virtual root (the last node becomes the root). Every
//! position is built at most once, so the whole pass is linear.
//!
//! Differences from a literal dictionary-based rendition:
//! * out of range parent values are rejected up front
//!   ([`InvalidTreeEncoding::OutOfBounds`]);
//! * a walk that runs into a node it built itself is a pointer loop and fails
//!   with [`InvalidTreeEncoding::Cycle`] instead of producing a cyclic tree;
//! * an input with no chain reaching `0` fails with
//!   [`InvalidTreeEncoding::MissingRoot`].
//!
//! Several positions pointing at `0` are tolerated: the last one scanned
//! becomes the root and everything not reachable from it is dropped.

use std::ops::Index;

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::{
    label::coerce,
    tree::{arena::MemoTable, Node, TreeNodeId},
};

/// Parent value marking a position that takes no part in the tree.
pub const INACTIVE: i64 = -1;
/// Parent value attaching a position to the virtual root.
pub const VIRTUAL_ROOT: i64 = 0;

/// Errors that make a parent-pointer array unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidTreeEncoding {
    #[error("empty parent array")]
    Empty,
    #[error("position {position} points to {parent}, expected -1, 0 or 1..={len}")]
    OutOfBounds {
        position: usize,
        parent: i64,
        len: usize,
    },
    #[error("{labels} labels given for {parents} positions")]
    LabelCountMismatch { parents: usize, labels: usize },
    #[error("pointer cycle: position {position} points back to {parent}")]
    Cycle { position: usize, parent: usize },
    #[error("no position attaches to the virtual root")]
    MissingRoot,
}

/// Validated parent-pointer array.
///
/// Every value is `-1`, `0` or a 1-based position inside the array.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParentArray(Vec<i64>);

impl ParentArray {
    pub fn new(parents: Vec<i64>) -> Result<Self, InvalidTreeEncoding> {
        if parents.is_empty() {
            return Err(InvalidTreeEncoding::Empty);
        }
        let len = parents.len();
        if let Some((i, &parent)) = parents
            .iter()
            .enumerate()
            .find(|(_, &p)| p < INACTIVE || p > len as i64)
        {
            return Err(InvalidTreeEncoding::OutOfBounds {
                position: i + 1,
                parent,
                len,
            });
        }
        Ok(ParentArray(parents))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    pub fn is_active(&self, id: TreeNodeId) -> bool {
        self[id] != INACTIVE
    }

    /// Number of positions not marked inactive.
    pub fn n_active(&self) -> usize {
        self.0.iter().filter(|&&p| p != INACTIVE).count()
    }
}

impl TryFrom<Vec<i64>> for ParentArray {
    type Error = InvalidTreeEncoding;
    fn try_from(parents: Vec<i64>) -> Result<Self, Self::Error> {
        ParentArray::new(parents)
    }
}

impl Index<TreeNodeId> for ParentArray {
    type Output = i64;
    fn index(&self, index: TreeNodeId) -> &Self::Output {
        &self.0[index.0]
    }
}

/// Raw label tokens, aligned position by position with a [`ParentArray`].
///
/// Tokens stay unparsed until the position they belong to becomes a node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct LabelArray(Vec<String>);

impl LabelArray {
    pub fn new(labels: Vec<String>) -> Self {
        LabelArray(labels)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn raw(&self, id: TreeNodeId) -> &str {
        &self.0[id.0]
    }

    /// The coerced label of position `id`.
    pub fn coerced(&self, id: TreeNodeId) -> i64 {
        coerce(self.raw(id))
    }
}

impl<S: Into<String>> FromIterator<S> for LabelArray {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        LabelArray(iter.into_iter().map(Into::into).collect())
    }
}

/// One reconstruction run over one parent array.
///
/// Holds the per-line memo table; a `Reconstructor` is consumed by
/// [`Reconstructor::run`], so memo state never outlives its line.
pub struct Reconstructor<'a> {
    parents: &'a ParentArray,
    labels: Option<&'a LabelArray>,
    memo: MemoTable,
    root: Option<TreeNodeId>,
}

impl<'a> Reconstructor<'a> {
    pub fn new(
        parents: &'a ParentArray,
        labels: Option<&'a LabelArray>,
    ) -> Result<Self, InvalidTreeEncoding> {
        if let Some(labels) = labels {
            if labels.len() != parents.len() {
                return Err(InvalidTreeEncoding::LabelCountMismatch {
                    parents: parents.len(),
                    labels: labels.len(),
                });
            }
        }
        Ok(Reconstructor {
            parents,
            labels,
            memo: MemoTable::new(parents.len()),
            root: None,
        })
    }

    /// Scans every position once and returns the root of the reconstructed tree.
    pub fn run(mut self) -> Result<Node, InvalidTreeEncoding> {
        for start in (0..self.parents.len()).map(TreeNodeId) {
            if self.memo.contains(start) || !self.parents.is_active(start) {
                continue;
            }
            self.walk_chain(start)?;
        }

        let root = self.root.ok_or(InvalidTreeEncoding::MissingRoot)?;
        let built = self.memo.n_built();
        let tree = self.memo.into_tree(root);
        let nodes = tree.len();
        if nodes < built {
            debug!(
                detached = built - nodes,
                "positions built but not reachable from the root"
            );
        }
        trace!(
            positions = self.parents.len(),
            active = self.parents.n_active(),
            nodes,
            root = %root,
            "reconstructed tree"
        );
        Ok(tree)
    }

    /// Follows parent pointers upward from `start`, building one node per
    /// unvisited position and linking each new node above the previous one.
    fn walk_chain(&mut self, start: TreeNodeId) -> Result<(), InvalidTreeEncoding> {
        let mut current = start;
        let mut prev: Option<TreeNodeId> = None;

        let outcome = loop {
            let parent = self.parents[current];
            if parent == INACTIVE {
                // only reachable mid-chain: `prev` stays built but unattached
                break Ok(());
            }

            let label = self.labels.map(|labels| labels.coerced(current));
            self.memo.insert(current, label);
            if let Some(prev) = prev {
                self.memo.add_child(current, prev);
            }

            if parent == VIRTUAL_ROOT {
                if let Some(superseded) = self.root.replace(current) {
                    warn!(
                        superseded = %superseded,
                        root = %current,
                        "several positions attach to the virtual root, keeping the last"
                    );
                }
                break Ok(());
            }

            let parent_id = TreeNodeId(parent as usize - 1);
            if self.memo.contains(parent_id) {
                if self.memo.in_current_walk(parent_id) {
                    break Err(InvalidTreeEncoding::Cycle {
                        position: current.position() + 1,
                        parent: parent_id.position() + 1,
                    });
                }
                self.memo.add_child(parent_id, current);
                break Ok(());
            }

            prev = Some(current);
            current = parent_id;
        };

        self.memo.end_walk();
        outcome
    }
}

/// Reconstructs the tree encoded by `parents`, labelling every node from
/// `labels` when given.
pub fn reconstruct(
    parents: &ParentArray,
    labels: Option<&LabelArray>,
) -> Result<Node, InvalidTreeEncoding> {
    Reconstructor::new(parents, labels)?.run()
}
