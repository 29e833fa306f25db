//! Pre-order DOM traversal with visit/exit hooks.
//!
//! `walk` calls `Visitor::visit` for every node in document order. When it
//! returns `false` the node's children are skipped and `exit` is not called
//! for it; otherwise the children are walked first to last and `exit` follows.
//! The tree must not be mutated during a walk.

use dom_query::NodeRef;

/// Callbacks driven by [`walk`].
pub trait Visitor<'a> {
    /// Called on entering a node. Return `false` to skip its subtree.
    fn visit(&mut self, node: &NodeRef<'a>) -> bool;

    /// Called after all children of a visited node have been walked.
    fn exit(&mut self, _node: &NodeRef<'a>) {}

    /// Notification for an element bypassed by a filtering visitor.
    fn skip(&mut self, _element: &NodeRef<'a>) {}
}

/// Walk the subtree rooted at `root` (inclusive) in pre-order.
pub fn walk<'a, V: Visitor<'a> + ?Sized>(root: &NodeRef<'a>, visitor: &mut V) {
    if !visitor.visit(root) {
        return;
    }
    // Each frame holds a visited node and its remaining children, reversed.
    let mut stack: Vec<(NodeRef<'a>, Vec<NodeRef<'a>>)> = Vec::new();
    stack.push((root.clone(), reversed_children(root)));

    loop {
        let next = match stack.last_mut() {
            Some((_, pending)) => pending.pop(),
            None => break,
        };
        match next {
            Some(child) => {
                if visitor.visit(&child) {
                    let grandchildren = reversed_children(&child);
                    stack.push((child, grandchildren));
                }
            }
            None => {
                if let Some((done, _)) = stack.pop() {
                    visitor.exit(&done);
                }
            }
        }
    }
}

fn reversed_children<'a>(node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    let mut children = node.children();
    children.reverse();
    children
}

/// Visitor adapter that hides invisible elements from the wrapped visitor.
///
/// Hidden elements are reported through `skip` and handed to `on_hidden`
/// so callers can keep a set of them.
pub struct VisibleOnly<'v, V> {
    inner: &'v mut V,
    hidden: Vec<dom_query::NodeId>,
}

impl<'v, V> VisibleOnly<'v, V> {
    pub fn new(inner: &'v mut V) -> Self {
        Self {
            inner,
            hidden: Vec::new(),
        }
    }

    /// Ids of the hidden elements seen during the walk, in document order.
    #[must_use]
    pub fn into_hidden(self) -> Vec<dom_query::NodeId> {
        self.hidden
    }
}

impl<'a, V: Visitor<'a>> Visitor<'a> for VisibleOnly<'_, V> {
    fn visit(&mut self, node: &NodeRef<'a>) -> bool {
        if crate::dom::is_hidden_element(node) {
            self.hidden.push(node.id);
            self.inner.skip(node);
            return false;
        }
        self.inner.visit(node)
    }

    fn exit(&mut self, node: &NodeRef<'a>) {
        self.inner.exit(node);
    }
}
