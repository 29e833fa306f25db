//! Terminating blocks: short markers that open a comment section or other
//! trailing boilerplate.

use crate::document::{Label, TextBlock};
use crate::patterns::TERMINATING_BLOCK;

/// Blocks longer than this are never markers.
const MAX_WORDS: usize = 14;

/// Whether a block is a comment-section or sharing marker.
#[must_use]
pub fn is_terminating(block: &TextBlock) -> bool {
    if block.num_words > MAX_WORDS {
        return false;
    }
    let text = block.text.trim();
    if text.chars().count() >= 8 {
        TERMINATING_BLOCK.is_match(text)
    } else if (block.link_density - 1.0).abs() < f64::EPSILON {
        text == "Comment"
    } else {
        text == "Shares"
    }
}

/// Label every terminating block `STRICTLY_NOT_CONTENT`.
pub fn mark_terminating_blocks(blocks: &mut [TextBlock]) -> bool {
    let mut changed = false;
    for block in blocks.iter_mut().filter(|b| is_terminating(b)) {
        block.add_label(Label::StrictlyNotContent);
        changed = true;
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_markers() {
        assert!(is_terminating(&TextBlock::new("Comments", 1, 0)));
        assert!(is_terminating(&TextBlock::new("12 comments so far", 4, 0)));
        assert!(is_terminating(&TextBlock::new("Add your comment below", 4, 0)));
        assert!(is_terminating(&TextBlock::new("Comment", 1, 1)));
        assert!(is_terminating(&TextBlock::new("Shares", 1, 0)));
    }

    #[test]
    fn test_ordinary_blocks() {
        assert!(!is_terminating(&TextBlock::new("Comment", 1, 0)));
        assert!(!is_terminating(&TextBlock::new("A normal sentence here.", 4, 0)));
        let long = "comments ".repeat(20);
        assert!(!is_terminating(&TextBlock::new(&long, 20, 0)));
    }

    #[test]
    fn test_marks_label() {
        let mut blocks = vec![TextBlock::new("Body text of the story.", 5, 0), TextBlock::new("Post a comment", 3, 0)];
        assert!(mark_terminating_blocks(&mut blocks));
        assert!(!blocks[0].has_label(Label::StrictlyNotContent));
        assert!(blocks[1].has_label(Label::StrictlyNotContent));
    }
}
