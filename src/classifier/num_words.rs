//! Decision tree over word counts and link densities of a block and its
//! neighbours.

use crate::document::{Label, TextBlock};

/// Classify every block as content or boilerplate. Title blocks are always
/// content. Returns `true` if any classification changed.
pub fn classify_by_word_counts(blocks: &mut [TextBlock]) -> bool {
    let mut changed = false;
    for i in 0..blocks.len() {
        let prev = i.checked_sub(1).map(|p| &blocks[p]);
        let next = blocks.get(i + 1);
        let is_content = blocks[i].has_label(Label::Title) || decide(prev, &blocks[i], next);
        changed |= blocks[i].set_is_content(is_content);
    }
    changed
}

fn decide(prev: Option<&TextBlock>, curr: &TextBlock, next: Option<&TextBlock>) -> bool {
    if curr.link_density > 0.333_333 {
        return false;
    }
    let next_words = next.map_or(0, |b| b.num_words);
    if prev.is_none_or(|p| p.link_density <= 0.555_556) {
        if curr.num_words > 16 || next_words > 15 {
            return true;
        }
        prev.is_some_and(|p| p.num_words > 4)
    } else {
        curr.num_words > 40 || next_words > 17
    }
}
