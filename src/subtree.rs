//! Minimal subtree reconstruction.
//!
//! Given the selected nodes in document order, builds the smallest tree of
//! the original document that holds all of them and serialises a clone of
//! it. Nodes on the path between selected nodes and their common ancestor
//! are materialised lazily, when a selected descendant is first reached;
//! everything else is left out.

use std::collections::HashMap;

use url::Url;

use crate::dom::{self, VOID_ELEMENTS};
use crate::node_index::{NodeIndex, NodePos};
use crate::url_utils::create_absolute_url;

/// Consumes an ordered list of nodes one match at a time.
#[derive(Debug, Clone)]
pub struct OrderedNodeMatcher<'n> {
    nodes: &'n [NodePos],
    next: usize,
}

impl<'n> OrderedNodeMatcher<'n> {
    #[must_use]
    pub fn new(nodes: &'n [NodePos]) -> Self {
        Self { nodes, next: 0 }
    }

    /// Advance if `pos` is the next expected node.
    pub fn matches(&mut self, pos: NodePos) -> bool {
        if self.nodes.get(self.next) == Some(&pos) {
            self.next += 1;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn peek(&self) -> Option<NodePos> {
        self.nodes.get(self.next).copied()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.next >= self.nodes.len()
    }
}

#[derive(Debug, Clone)]
struct TreeNode {
    pos: NodePos,
    /// Effective direction, recorded when the node was materialised. A
    /// text node takes the direction of its parent.
    direction: String,
    children: Vec<usize>,
}

/// A tree over original document nodes, stored as an arena.
#[derive(Debug, Clone, Default)]
pub struct NodeTree {
    nodes: Vec<TreeNode>,
    root: Option<usize>,
}

impl NodeTree {
    /// Build the minimal tree containing `selected`, which must be in
    /// document order.
    #[must_use]
    pub fn build(index: &NodeIndex, selected: &[NodePos]) -> Self {
        let mut tree = Self::default();
        if selected.is_empty() || index.is_empty() {
            return tree;
        }

        let mut materialized: HashMap<NodePos, usize> = HashMap::new();
        let mut matcher = OrderedNodeMatcher::new(selected);
        while let Some(pos) = matcher.peek() {
            matcher.matches(pos);
            if pos >= index.len() || materialized.contains_key(&pos) {
                continue;
            }
            // Materialise the node and any missing ancestors, bottom-up.
            let mut child = tree.push(index, pos);
            materialized.insert(pos, child);
            let mut current = pos;
            loop {
                let Some(parent) = index.parent(current) else {
                    tree.root = Some(child);
                    break;
                };
                if let Some(&existing) = materialized.get(&parent) {
                    tree.nodes[existing].children.push(child);
                    break;
                }
                let id = tree.push(index, parent);
                materialized.insert(parent, id);
                tree.nodes[id].children.push(child);
                child = id;
                current = parent;
            }
        }

        tree.prune_root(selected);
        tree
    }

    fn push(&mut self, index: &NodeIndex, pos: NodePos) -> usize {
        let node = index.node(pos);
        let direction = dom::text_direction(node);
        self.nodes.push(TreeNode {
            pos,
            direction,
            children: Vec::new(),
        });
        self.nodes.len() - 1
    }

    /// Drop unselected single-child nodes from the top of the tree.
    fn prune_root(&mut self, selected: &[NodePos]) {
        while let Some(root) = self.root {
            let node = &self.nodes[root];
            if node.children.len() != 1 || selected.first() == Some(&node.pos) {
                break;
            }
            self.root = Some(node.children[0]);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Document position of the root node.
    #[must_use]
    pub fn root_position(&self) -> Option<NodePos> {
        self.root.map(|r| self.nodes[r].pos)
    }

    /// Document positions of a node's children, by document position of
    /// the node. Empty for nodes not in the tree.
    #[must_use]
    pub fn children_of(&self, pos: NodePos) -> Vec<NodePos> {
        self.nodes
            .iter()
            .find(|n| n.pos == pos)
            .map(|n| n.children.iter().map(|&c| self.nodes[c].pos).collect())
            .unwrap_or_default()
    }

    /// Direction recorded for the root element, `auto` when unknown.
    #[must_use]
    pub fn root_direction(&self) -> String {
        self.root
            .map_or_else(|| "auto".to_string(), |r| self.nodes[r].direction.clone())
    }

    /// All positions in the tree in document order.
    #[must_use]
    pub fn positions(&self) -> Vec<NodePos> {
        let mut out = Vec::with_capacity(self.nodes.len());
        if let Some(root) = self.root {
            self.collect(root, &mut out);
        }
        out
    }

    fn collect(&self, id: usize, out: &mut Vec<NodePos>) {
        out.push(self.nodes[id].pos);
        for &child in &self.nodes[id].children {
            self.collect(child, out);
        }
    }

    /// Serialise a clone of the tree.
    ///
    /// Every element carries its recorded `dir`. With a base URL, `href`
    /// and `src` attributes are made absolute. A root `<html>` or `<body>`
    /// is unwrapped to its children.
    #[must_use]
    pub fn to_html(&self, index: &NodeIndex, base_url: Option<&Url>) -> String {
        let Some(root) = self.root else {
            return String::new();
        };
        let mut out = String::new();
        let root_node = index.node(self.nodes[root].pos);
        if dom::has_tag(root_node, "html") || dom::has_tag(root_node, "body") {
            for &child in &self.nodes[root].children {
                self.write_node(index, child, base_url, &mut out);
            }
        } else {
            self.write_node(index, root, base_url, &mut out);
        }
        out
    }

    fn write_node(&self, index: &NodeIndex, id: usize, base_url: Option<&Url>, out: &mut String) {
        let tree_node = &self.nodes[id];
        let node = index.node(tree_node.pos);
        if node.is_text() {
            out.push_str(&escape_html(&node.text()));
            return;
        }
        let Some(tag) = dom::tag_name(node) else {
            return;
        };

        out.push('<');
        out.push_str(&tag);
        for (name, value) in dom::get_all_attributes(node) {
            if name == "dir" {
                continue;
            }
            let value = match base_url {
                Some(base) if is_link_attribute(&tag, &name) => create_absolute_url(&value, base),
                _ => value,
            };
            out.push(' ');
            out.push_str(&name);
            out.push_str("=\"");
            out.push_str(&escape_html(&value));
            out.push('"');
        }
        out.push_str(" dir=\"");
        out.push_str(&tree_node.direction);
        out.push('"');
        out.push('>');

        if VOID_ELEMENTS.contains(&tag.as_str()) {
            return;
        }
        for &child in &tree_node.children {
            self.write_node(index, child, base_url, out);
        }
        out.push_str("</");
        out.push_str(&tag);
        out.push('>');
    }
}

fn is_link_attribute(tag: &str, attribute: &str) -> bool {
    matches!(
        (tag, attribute),
        ("a", "href") | ("img" | "source" | "video" | "audio" | "iframe" | "embed", "src") | ("video", "poster")
    )
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(index: &NodeIndex, doc: &dom::Document, selector: &str) -> Vec<NodePos> {
        doc.select(selector)
            .nodes()
            .iter()
            .map(|n| index.position_of(n).unwrap())
            .collect()
    }

    #[test]
    fn test_matcher_consumes_in_order() {
        let nodes = [3, 5];
        let mut matcher = OrderedNodeMatcher::new(&nodes);
        assert!(!matcher.matches(5));
        assert!(matcher.matches(3));
        assert_eq!(matcher.peek(), Some(5));
        assert!(matcher.matches(5));
        assert!(matcher.is_finished());
    }

    #[test]
    fn test_minimal_tree_of_two_siblings() {
        let items: String = (1..=10).map(|i| format!("<p id=\"p{i}\">item {i}</p>")).collect();
        let html = format!("<html><body><div id=\"list\">{items}</div></body></html>");
        let doc = dom::parse(&html);
        let index = NodeIndex::build(&dom::html_root(&doc).unwrap());
        let selected = positions(&index, &doc, "#p3, #p5");
        let parent = positions(&index, &doc, "#list")[0];

        let tree = NodeTree::build(&index, &selected);

        assert_eq!(tree.root_position(), Some(parent));
        assert_eq!(tree.children_of(parent), selected);
        assert_eq!(tree.positions().len(), 3);
        assert_eq!(
            tree.to_html(&index, None),
            r#"<div id="list" dir="auto"><p id="p3" dir="auto"></p><p id="p5" dir="auto"></p></div>"#
        );
    }

    #[test]
    fn test_single_node() {
        let doc = dom::parse("<html><body><p>one</p><p>two</p></body></html>");
        let index = NodeIndex::build(&dom::html_root(&doc).unwrap());
        let p = positions(&index, &doc, "p")[1];
        let text = index.children(p)[0];

        let tree = NodeTree::build(&index, &[text]);
        assert_eq!(tree.root_position(), Some(text));
        assert_eq!(tree.to_html(&index, None), "two");
    }

    #[test]
    fn test_text_root_takes_parent_direction() {
        let doc = dom::parse(r#"<html><body><p dir="rtl">one</p></body></html>"#);
        let index = NodeIndex::build(&dom::html_root(&doc).unwrap());
        let p = positions(&index, &doc, "p")[0];

        let tree = NodeTree::build(&index, &index.children(p));
        assert_eq!(tree.root_direction(), "rtl");
    }

    #[test]
    fn test_texts_in_different_branches_keep_structure() {
        let doc = dom::parse(r#"<html><body><div dir="rtl"><h1>T</h1><section><p>a &amp; b</p><p>skip</p></section></div><footer>f</footer></body></html>"#);
        let index = NodeIndex::build(&dom::html_root(&doc).unwrap());
        let h1 = positions(&index, &doc, "h1")[0];
        let p = positions(&index, &doc, "section p")[0];
        let selected = vec![index.children(h1)[0], index.children(p)[0]];

        let tree = NodeTree::build(&index, &selected);
        assert_eq!(tree.root_direction(), "rtl");
        assert_eq!(
            tree.to_html(&index, None),
            r#"<div dir="rtl"><h1 dir="rtl">T</h1><section dir="rtl"><p dir="rtl">a &amp; b</p></section></div>"#
        );
    }

    #[test]
    fn test_links_made_absolute_and_void_elements() {
        let doc = dom::parse(r#"<html><body><p><a href="/next">n</a><br><img src="pic.png"></p></body></html>"#);
        let index = NodeIndex::build(&dom::html_root(&doc).unwrap());
        let p = positions(&index, &doc, "p")[0];
        let mut selected = vec![p];
        selected.extend(index.children(p));
        let a = positions(&index, &doc, "a")[0];
        selected.insert(2, index.children(a)[0]);

        let base = Url::parse("http://site.com/dir/page").unwrap();
        let html = NodeTree::build(&index, &selected).to_html(&index, Some(&base));
        assert_eq!(
            html,
            r#"<p dir="auto"><a href="http://site.com/next" dir="auto">n</a><br dir="auto"><img src="http://site.com/dir/pic.png" dir="auto"></p>"#
        );
    }

    #[test]
    fn test_empty_selection() {
        let doc = dom::parse("<p>x</p>");
        let index = NodeIndex::build(&dom::html_root(&doc).unwrap());
        let tree = NodeTree::build(&index, &[]);
        assert!(tree.is_empty());
        assert_eq!(tree.to_html(&index, None), "");
        assert_eq!(tree.root_direction(), "auto");
    }
}
