//! Pre-order snapshot of a document tree.
//!
//! Gives every node a position in document order and answers parent, depth
//! and containment queries in constant time. Blocks, relevant elements and
//! the subtree reconstructor all refer to nodes by their position here.

use std::collections::HashMap;

use dom_query::{NodeId, NodeRef};

use crate::walker::{walk, Visitor};

/// Position of a node in document pre-order.
pub type NodePos = usize;

/// Arena of node references in document order.
pub struct NodeIndex<'a> {
    nodes: Vec<NodeRef<'a>>,
    positions: HashMap<NodeId, NodePos>,
    parents: Vec<Option<NodePos>>,
    depths: Vec<usize>,
    /// Exclusive end of each node's subtree range.
    ends: Vec<NodePos>,
}

struct IndexBuilder<'a> {
    index: NodeIndex<'a>,
    open: Vec<NodePos>,
}

impl<'a> Visitor<'a> for IndexBuilder<'a> {
    fn visit(&mut self, node: &NodeRef<'a>) -> bool {
        let pos = self.index.nodes.len();
        self.index.nodes.push(node.clone());
        self.index.positions.insert(node.id, pos);
        self.index.parents.push(self.open.last().copied());
        self.index.depths.push(self.open.len());
        self.index.ends.push(pos + 1);
        self.open.push(pos);
        true
    }

    fn exit(&mut self, _node: &NodeRef<'a>) {
        if let Some(pos) = self.open.pop() {
            self.index.ends[pos] = self.index.nodes.len();
        }
    }
}

impl<'a> NodeIndex<'a> {
    /// Index the subtree rooted at `root` (usually the `<html>` element).
    #[must_use]
    pub fn build(root: &NodeRef<'a>) -> Self {
        let mut builder = IndexBuilder {
            index: NodeIndex {
                nodes: Vec::new(),
                positions: HashMap::new(),
                parents: Vec::new(),
                depths: Vec::new(),
                ends: Vec::new(),
            },
            open: Vec::new(),
        };
        walk(root, &mut builder);
        builder.index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn position(&self, id: NodeId) -> Option<NodePos> {
        self.positions.get(&id).copied()
    }

    #[must_use]
    pub fn position_of(&self, node: &NodeRef) -> Option<NodePos> {
        self.position(node.id)
    }

    /// The node at a position. Positions come from this index, so this
    /// panics only on a foreign position.
    #[must_use]
    pub fn node(&self, pos: NodePos) -> &NodeRef<'a> {
        &self.nodes[pos]
    }

    #[must_use]
    pub fn parent(&self, pos: NodePos) -> Option<NodePos> {
        self.parents[pos]
    }

    /// Depth below the indexed root (the root has depth 0).
    #[must_use]
    pub fn depth(&self, pos: NodePos) -> usize {
        self.depths[pos]
    }

    /// Whether `ancestor` is `descendant` or one of its ancestors.
    #[must_use]
    pub fn contains(&self, ancestor: NodePos, descendant: NodePos) -> bool {
        ancestor <= descendant && descendant < self.ends[ancestor]
    }

    /// Exclusive end of the subtree starting at `pos`.
    #[must_use]
    pub fn subtree_end(&self, pos: NodePos) -> NodePos {
        self.ends[pos]
    }

    /// Child positions of a node, in order.
    #[must_use]
    pub fn children(&self, pos: NodePos) -> Vec<NodePos> {
        let mut out = Vec::new();
        let mut child = pos + 1;
        while child < self.ends[pos] {
            out.push(child);
            child = self.ends[child];
        }
        out
    }

    /// Closest common ancestor of two nodes (either may be the answer).
    #[must_use]
    pub fn common_ancestor(&self, a: NodePos, b: NodePos) -> NodePos {
        let mut current = a;
        while !self.contains(current, b) {
            match self.parents[current] {
                Some(p) => current = p,
                None => break,
            }
        }
        current
    }
}
