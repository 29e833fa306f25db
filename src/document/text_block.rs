//! The text block: a contiguous run of visible text plus the structural
//! features the classifier works on.

use std::collections::BTreeSet;

use crate::node_index::NodePos;

use super::Label;

/// A contiguous span of visible text.
///
/// Blocks are created in document order by the segmenter, re-labelled by the
/// classifier passes and merged by fusion. A block remembers the text nodes
/// it was built from so the selection can be mapped back onto the DOM.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    /// Text of the block with whitespace runs collapsed.
    pub text: String,
    pub labels: BTreeSet<Label>,
    pub num_words: usize,
    pub num_words_in_anchor_text: usize,
    /// Non-whitespace characters.
    pub num_chars: usize,
    /// Non-whitespace characters inside `a[href]`.
    pub num_chars_in_anchor_text: usize,
    /// Fraction of characters inside links (0 for an empty block).
    pub link_density: f64,
    /// Index of the first segmented block this block covers.
    pub offset_start: usize,
    /// Index of the last segmented block this block covers.
    pub offset_end: usize,
    /// Element depth at the first non-whitespace text.
    pub tag_level: usize,
    pub is_content: bool,
    /// All text nodes of the block, whitespace-only ones included.
    pub text_nodes: Vec<NodePos>,
    /// Text nodes that hold at least one non-whitespace character.
    pub non_whitespace_text_nodes: Vec<NodePos>,
}

impl TextBlock {
    /// A bare block used by tests and by callers that only need the text
    /// features.
    #[must_use]
    pub fn new(text: &str, num_words: usize, num_words_in_anchor_text: usize) -> Self {
        let mut block = Self {
            text: text.to_string(),
            labels: BTreeSet::new(),
            num_words,
            num_words_in_anchor_text,
            num_chars: 0,
            num_chars_in_anchor_text: 0,
            link_density: 0.0,
            offset_start: 0,
            offset_end: 0,
            tag_level: 0,
            is_content: false,
            text_nodes: Vec::new(),
            non_whitespace_text_nodes: Vec::new(),
        };
        block.num_chars = text.chars().filter(|c| !c.is_whitespace()).count();
        block.num_chars_in_anchor_text = if num_words == 0 {
            0
        } else {
            block.num_chars * num_words_in_anchor_text / num_words
        };
        block.update_link_density();
        block
    }

    /// Set the classification. Returns `true` if the value changed.
    pub fn set_is_content(&mut self, is_content: bool) -> bool {
        if self.is_content == is_content {
            return false;
        }
        self.is_content = is_content;
        true
    }

    #[must_use]
    pub fn has_label(&self, label: Label) -> bool {
        self.labels.contains(&label)
    }

    pub fn add_label(&mut self, label: Label) {
        self.labels.insert(label);
    }

    pub fn remove_label(&mut self, label: Label) -> bool {
        self.labels.remove(&label)
    }

    /// Absorb the block that follows this one.
    ///
    /// Texts are joined with a space, counts are summed, labels unioned and
    /// the tag level becomes the shallower of the two. The merged block is
    /// content if either side was.
    pub fn merge_next(&mut self, other: Self) {
        if !self.text.is_empty() && !other.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(&other.text);
        self.num_words += other.num_words;
        self.num_words_in_anchor_text += other.num_words_in_anchor_text;
        self.num_chars += other.num_chars;
        self.num_chars_in_anchor_text += other.num_chars_in_anchor_text;
        self.offset_end = other.offset_end;
        self.is_content |= other.is_content;
        self.labels.extend(other.labels);
        self.tag_level = self.tag_level.min(other.tag_level);
        self.text_nodes.extend(other.text_nodes);
        self.non_whitespace_text_nodes
            .extend(other.non_whitespace_text_nodes);
        self.update_link_density();
    }

    #[must_use]
    pub fn first_non_whitespace_text_node(&self) -> Option<NodePos> {
        self.non_whitespace_text_nodes.first().copied()
    }

    #[must_use]
    pub fn last_non_whitespace_text_node(&self) -> Option<NodePos> {
        self.non_whitespace_text_nodes.last().copied()
    }

    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn update_link_density(&mut self) {
        self.link_density = if self.num_chars == 0 {
            0.0
        } else {
            self.num_chars_in_anchor_text as f64 / self.num_chars as f64
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_is_content_reports_change() {
        let mut block = TextBlock::new("hello world", 2, 0);
        assert!(block.set_is_content(true));
        assert!(!block.set_is_content(true));
        assert!(block.set_is_content(false));
    }

    #[test]
    fn test_link_density_from_characters() {
        let block = TextBlock::new("link text", 2, 2);
        assert!((block.link_density - 1.0).abs() < f64::EPSILON);

        let block = TextBlock::new("plain text", 2, 0);
        assert!(block.link_density.abs() < f64::EPSILON);

        let block = TextBlock::new("", 0, 0);
        assert!(block.link_density.abs() < f64::EPSILON);
    }

    #[test]
    fn test_merge_next_combines_features() {
        let mut first = TextBlock::new("aaaa", 1, 1);
        first.tag_level = 4;
        first.text_nodes = vec![3];
        first.non_whitespace_text_nodes = vec![3];
        first.add_label(Label::Heading);

        let mut second = TextBlock::new("bbbb", 1, 0);
        second.tag_level = 2;
        second.offset_start = 1;
        second.offset_end = 1;
        second.is_content = true;
        second.text_nodes = vec![7, 8];
        second.non_whitespace_text_nodes = vec![7];
        second.add_label(Label::Li);

        first.merge_next(second);

        assert_eq!(first.text, "aaaa bbbb");
        assert_eq!(first.num_words, 2);
        assert_eq!(first.num_words_in_anchor_text, 1);
        assert_eq!(first.offset_end, 1);
        assert_eq!(first.tag_level, 2);
        assert!(first.is_content);
        assert!(first.has_label(Label::Heading) && first.has_label(Label::Li));
        assert_eq!(first.text_nodes, vec![3, 7, 8]);
        assert_eq!(first.last_non_whitespace_text_node(), Some(7));
        assert!((first.link_density - 0.5).abs() < f64::EPSILON);
    }
}
