//! Block filters run after the initial classification.

use crate::document::{Label, TextBlock};
use crate::node_index::{NodeIndex, NodePos};

/// Blocks with at least this many words at the main block's level are
/// content.
const LARGE_BLOCK_WORDS: usize = 100;

/// Demote every content block carrying `label`.
pub fn label_to_boilerplate(blocks: &mut [TextBlock], label: Label) -> bool {
    let mut changed = false;
    for block in blocks.iter_mut().filter(|b| b.is_content && b.has_label(label)) {
        block.is_content = false;
        changed = true;
    }
    changed
}

/// Drop non-content blocks. Title blocks are kept either way.
pub fn remove_boilerplate(blocks: &mut Vec<TextBlock>) -> bool {
    let before = blocks.len();
    blocks.retain(|b| b.is_content || b.has_label(Label::Title));
    blocks.len() != before
}

/// Keep only the largest content block, then re-admit neighbours whose text
/// sits under the same parent element as the main block's.
///
/// Title blocks are neither candidates nor demoted.
pub fn keep_largest_block(blocks: &mut [TextBlock], index: &NodeIndex) -> bool {
    if blocks.len() < 2 {
        return false;
    }
    let mut largest: Option<usize> = None;
    for (i, block) in blocks.iter().enumerate() {
        if !block.is_content || block.has_label(Label::Title) {
            continue;
        }
        if largest.is_none_or(|l| block.num_words > blocks[l].num_words) {
            largest = Some(i);
        }
    }

    for (i, block) in blocks.iter_mut().enumerate() {
        if Some(i) == largest {
            block.is_content = true;
            block.add_label(Label::VeryLikelyContent);
        } else if !block.has_label(Label::Title) {
            block.is_content = false;
            block.add_label(Label::MightBeContent);
        }
    }

    if let Some(main) = largest {
        expand_to_later_siblings(blocks, main, index);
        expand_to_earlier_siblings(blocks, main, index);
    }
    true
}

/// Parent element of a text node.
fn text_parent(index: &NodeIndex, text: Option<NodePos>) -> Option<NodePos> {
    text.and_then(|t| index.parent(t))
}

fn is_sibling(index: &NodeIndex, a: Option<NodePos>, b: Option<NodePos>) -> bool {
    match (a.and_then(|a| index.parent(a)), b.and_then(|b| index.parent(b))) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

fn expand_to_later_siblings(blocks: &mut [TextBlock], main: usize, index: &NodeIndex) {
    let mut last_element = text_parent(index, blocks[main].last_non_whitespace_text_node());
    for candidate in blocks.iter_mut().skip(main + 1) {
        let first = text_parent(index, candidate.first_non_whitespace_text_node());
        if is_sibling(index, last_element, first) {
            candidate.is_content = true;
            candidate.add_label(Label::SiblingOfMainContent);
            last_element = text_parent(index, candidate.last_non_whitespace_text_node());
        }
    }
}

fn expand_to_earlier_siblings(blocks: &mut [TextBlock], main: usize, index: &NodeIndex) {
    let mut first_element = text_parent(index, blocks[main].first_non_whitespace_text_node());
    for candidate in blocks[..main].iter_mut().rev() {
        let last = text_parent(index, candidate.last_non_whitespace_text_node());
        if is_sibling(index, first_element, last) {
            candidate.is_content = true;
            candidate.add_label(Label::SiblingOfMainContent);
            first_element = text_parent(index, candidate.first_non_whitespace_text_node());
        }
    }
}

/// Mark `MIGHT_BE_CONTENT` blocks between the title and the first content
/// block as content.
pub fn expand_title_to_content(blocks: &mut [TextBlock]) -> bool {
    let mut title = None;
    let mut content_start = None;
    for (i, block) in blocks.iter().enumerate() {
        if content_start.is_none() && block.has_label(Label::Title) {
            title = Some(i);
            continue;
        }
        if content_start.is_none() && block.is_content {
            content_start = Some(i);
        }
    }
    let (Some(title), Some(content_start)) = (title, content_start) else {
        return false;
    };
    if content_start <= title {
        return false;
    }
    let mut changed = false;
    for block in &mut blocks[title..content_start] {
        if block.has_label(Label::MightBeContent) {
            changed |= block.set_is_content(true);
        }
    }
    changed
}

/// Large non-content blocks at the main block's tag level become content.
pub fn large_blocks_at_main_level(blocks: &mut [TextBlock]) -> bool {
    let Some(level) = blocks
        .iter()
        .find(|b| b.is_content && b.has_label(Label::VeryLikelyContent))
        .map(|b| b.tag_level)
    else {
        return false;
    };
    let mut changed = false;
    for block in blocks.iter_mut() {
        if !block.is_content && block.num_words >= LARGE_BLOCK_WORDS && block.tag_level == level {
            block.is_content = true;
            changed = true;
        }
    }
    changed
}

/// A link-free list right after the main block, nested deeper than it, is
/// part of the article.
pub fn list_at_end(blocks: &mut [TextBlock]) -> bool {
    let mut changed = false;
    let mut level: Option<usize> = None;
    for block in blocks.iter_mut() {
        if block.is_content && block.has_label(Label::VeryLikelyContent) {
            level = Some(block.tag_level);
        } else if level.is_some_and(|l| block.tag_level > l)
            && block.has_label(Label::MightBeContent)
            && block.has_label(Label::Li)
            && block.num_chars_in_anchor_text == 0
        {
            block.is_content = true;
            changed = true;
        } else {
            level = None;
        }
    }
    changed
}
