//! Segmentation of a DOM tree into text blocks.
//!
//! Every element gets an [`ElementAction`] from its display type: inline
//! elements are transparent, inline-block ones only deepen the tag level and
//! everything else ends the current block. Text is accumulated between
//! block boundaries; hidden subtrees are skipped and reported back.

use std::collections::HashSet;

use tracing::trace;

use crate::dom::{self, Display, NodeRef};
use crate::node_index::{NodeIndex, NodePos};
use crate::patterns::COMMENT_CLASS;
use crate::text_utils::{count_words, is_all_whitespace, normalize_whitespace};
use crate::walker::{walk, Visitor, VisibleOnly};

use super::{Label, TextBlock, TextDocument};

/// Elements that never take comment-section labels from their class or id.
const UNLABELLED_CONTAINERS: &[&str] = &["html", "body", "article"];

/// More classes than this and the element is a layout wrapper, not a
/// comment section.
const MAX_CLASS_COUNT: usize = 2;

/// What an element does to block segmentation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementAction {
    /// Entering or leaving the element ends the current block.
    pub flush: bool,
    /// Text inside the element sits one level deeper.
    pub changes_tag_level: bool,
    /// Text inside counts as anchor text.
    pub is_anchor: bool,
    /// Labels given to every block built inside the element.
    pub labels: Vec<Label>,
}

impl ElementAction {
    #[must_use]
    pub fn for_element(element: &NodeRef) -> Self {
        let mut action = Self::default();
        let tag = dom::tag_name(element).unwrap_or_default();

        match dom::display(element) {
            Display::Inline => {}
            Display::InlineBlock => action.changes_tag_level = true,
            // A floated span is a drop cap, part of the paragraph it starts.
            Display::Block
                if tag == "span"
                    && dom::style_property(element, "float").is_some_and(|f| f != "none") => {}
            _ => {
                action.flush = true;
                action.changes_tag_level = true;
            }
        }

        if !UNLABELLED_CONTAINERS.contains(&tag.as_str()) {
            let class = dom::get_attribute(element, "class").unwrap_or_default();
            let id = dom::get_attribute(element, "id").unwrap_or_default();
            if (COMMENT_CLASS.is_match(&class) || COMMENT_CLASS.is_match(&id))
                && class.split_whitespace().count() <= MAX_CLASS_COUNT
            {
                action.labels.push(Label::StrictlyNotContent);
            }
            match tag.as_str() {
                "aside" | "nav" => action.labels.push(Label::StrictlyNotContent),
                "li" => action.labels.push(Label::Li),
                "hr" => action.labels.push(Label::Hr),
                "a" => action.is_anchor = element.has_attr("href"),
                _ => {
                    if let Some(heading) = Label::for_heading(&tag) {
                        action.labels.push(heading);
                        action.labels.push(Label::Heading);
                    }
                }
            }
        }
        action
    }
}

/// Text collected since the last block boundary.
#[derive(Default)]
struct PendingBlock {
    text: String,
    num_words: usize,
    num_words_in_anchor_text: usize,
    num_chars: usize,
    num_chars_in_anchor_text: usize,
    tag_level: Option<usize>,
    text_nodes: Vec<NodePos>,
    non_whitespace_text_nodes: Vec<NodePos>,
}

struct BlockBuilder<'i, 'a> {
    index: &'i NodeIndex<'a>,
    actions: Vec<ElementAction>,
    tag_level: usize,
    anchor_depth: usize,
    pending: PendingBlock,
    blocks: Vec<TextBlock>,
}

impl<'i, 'a> BlockBuilder<'i, 'a> {
    fn new(index: &'i NodeIndex<'a>) -> Self {
        Self {
            index,
            actions: Vec::new(),
            tag_level: 0,
            anchor_depth: 0,
            pending: PendingBlock::default(),
            blocks: Vec::new(),
        }
    }

    fn add_text(&mut self, node: &NodeRef<'a>) {
        let text = node.text();
        if text.is_empty() {
            return;
        }
        let Some(pos) = self.index.position_of(node) else {
            return;
        };
        self.pending.text.push_str(&text);
        self.pending.text_nodes.push(pos);
        if is_all_whitespace(&text) {
            return;
        }

        let words = count_words(&text);
        let chars = text.chars().filter(|c| !c.is_whitespace()).count();
        self.pending.num_words += words;
        self.pending.num_chars += chars;
        if self.anchor_depth > 0 {
            self.pending.num_words_in_anchor_text += words;
            self.pending.num_chars_in_anchor_text += chars;
        }
        self.pending.non_whitespace_text_nodes.push(pos);
        if self.pending.tag_level.is_none() {
            self.pending.tag_level = Some(self.tag_level);
        }
    }

    /// End the current block. Text without a visible character is dropped.
    fn flush(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        let Some(tag_level) = pending.tag_level else {
            return;
        };

        let offset = self.blocks.len();
        let mut block = TextBlock::new("", 0, 0);
        block.text = normalize_whitespace(&pending.text);
        block.num_words = pending.num_words;
        block.num_words_in_anchor_text = pending.num_words_in_anchor_text;
        block.num_chars = pending.num_chars;
        block.num_chars_in_anchor_text = pending.num_chars_in_anchor_text;
        block.offset_start = offset;
        block.offset_end = offset;
        block.tag_level = tag_level;
        block.text_nodes = pending.text_nodes;
        block.non_whitespace_text_nodes = pending.non_whitespace_text_nodes;
        block.labels = self
            .actions
            .iter()
            .flat_map(|a| a.labels.iter().copied())
            .collect();
        block.update_link_density();

        trace!(offset, words = block.num_words, text = %block.text, "built block");
        self.blocks.push(block);
    }
}

impl<'a> Visitor<'a> for BlockBuilder<'_, 'a> {
    fn visit(&mut self, node: &NodeRef<'a>) -> bool {
        if node.is_text() {
            self.add_text(node);
            return false;
        }
        if !node.is_element() {
            return false;
        }

        let action = ElementAction::for_element(node);
        // Pending text belongs to the enclosing element, so it is cut off
        // before this element's labels are pushed.
        if action.flush {
            self.flush();
        }
        if action.changes_tag_level {
            self.tag_level += 1;
        }
        if action.is_anchor {
            self.anchor_depth += 1;
            self.pending.text.push(' ');
        }
        self.actions.push(action);
        true
    }

    fn exit(&mut self, node: &NodeRef<'a>) {
        if !node.is_element() {
            return;
        }
        let Some(action) = self.actions.last().cloned() else {
            return;
        };
        if action.flush {
            self.flush();
        }
        if action.changes_tag_level {
            self.tag_level = self.tag_level.saturating_sub(1);
        }
        if action.is_anchor {
            self.anchor_depth = self.anchor_depth.saturating_sub(1);
            self.pending.text.push(' ');
        }
        self.actions.pop();
    }
}

/// Segment the indexed tree into text blocks.
///
/// Returns the document and the positions of the hidden elements whose
/// subtrees were skipped.
#[must_use]
pub fn build_text_document(index: &NodeIndex) -> (TextDocument, HashSet<NodePos>) {
    if index.is_empty() {
        return (TextDocument::default(), HashSet::new());
    }
    let root = index.node(0).clone();
    let mut builder = BlockBuilder::new(index);
    let hidden_ids = {
        let mut visible = VisibleOnly::new(&mut builder);
        walk(&root, &mut visible);
        visible.into_hidden()
    };
    builder.flush();

    let hidden = hidden_ids
        .into_iter()
        .filter_map(|id| index.position(id))
        .collect();
    (TextDocument::new(builder.blocks), hidden)
}
