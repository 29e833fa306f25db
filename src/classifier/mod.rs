//! Content classification pipeline.
//!
//! Labels and classifies the blocks of a [`TextDocument`] as content or
//! boilerplate, fusing and filtering them along the way. Passes run in a
//! fixed order, each one mutating the block list in place:
//!
//! 1. terminating blocks (comment markers) become strictly-not-content
//! 2. title matching
//! 3. word-count rules
//! 4. strictly-not-content blocks are demoted
//! 5. similar-sibling expansion (twice)
//! 6. heading fusion
//! 7. pre-filtering proximity fusion
//! 8. boilerplate removal (titles kept)
//! 9. post-filtering proximity fusion
//! 10. keep the largest block and its siblings
//! 11. expand the title down to the content
//! 12. large blocks at the main level
//! 13. trailing lists

mod expansion;
mod filters;
mod num_words;
mod terminating;
mod title_match;

pub use expansion::SimilarSiblingExpansion;
pub use filters::{
    expand_title_to_content, keep_largest_block, label_to_boilerplate,
    large_blocks_at_main_level, list_at_end, remove_boilerplate,
};
pub use num_words::classify_by_word_counts;
pub use terminating::{is_terminating, mark_terminating_blocks};
pub use title_match::TitleMatcher;

use tracing::{debug, instrument};

use crate::document::{Label, TextDocument};
use crate::fusion::{heading_fusion_to_fixed_point, proximity_fusion_to_fixed_point, FusionMode};
use crate::node_index::NodeIndex;

/// Run every classification pass over `document`.
///
/// `candidate_titles` are matched against the blocks; `fusion_mode` is the
/// proximity fusion applied after boilerplate removal.
#[instrument(skip_all, fields(blocks = document.blocks.len()))]
pub fn classify(
    document: &mut TextDocument,
    index: &NodeIndex,
    candidate_titles: &[String],
    fusion_mode: FusionMode,
) {
    let blocks = &mut document.blocks;
    if blocks.is_empty() {
        return;
    }

    let changed = mark_terminating_blocks(blocks);
    debug!(changed, "terminating blocks");

    let changed = TitleMatcher::new(candidate_titles).process(blocks);
    debug!(changed, "title match");

    let changed = classify_by_word_counts(blocks);
    debug!(changed, "word count rules");

    let changed = label_to_boilerplate(blocks, Label::StrictlyNotContent);
    debug!(changed, "strictly not content");

    let changed = SimilarSiblingExpansion::CROSS_HEADINGS.process(blocks, index);
    debug!(changed, "sibling expansion across headings");

    let changed = SimilarSiblingExpansion::MIXED_TAGS.process(blocks, index);
    debug!(changed, "sibling expansion with mixed tags");

    let changed = heading_fusion_to_fixed_point(blocks);
    debug!(changed, "heading fusion");

    let changed = proximity_fusion_to_fixed_point(blocks, FusionMode::PreFiltering);
    debug!(changed, "pre-filtering fusion");

    let changed = remove_boilerplate(blocks);
    debug!(changed, remaining = blocks.len(), "boilerplate removal");

    let changed = proximity_fusion_to_fixed_point(blocks, fusion_mode);
    debug!(changed, "post-filtering fusion");

    let changed = keep_largest_block(blocks, index);
    debug!(changed, "keep largest block");

    let changed = expand_title_to_content(blocks);
    debug!(changed, "expand title to content");

    let changed = large_blocks_at_main_level(blocks);
    debug!(changed, "large blocks at main level");

    let changed = list_at_end(blocks);
    debug!(changed, "list at end");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::build_text_document;
    use crate::dom;

    fn run(html: &str, titles: &[String]) -> TextDocument {
        let doc = dom::parse(html);
        let root = dom::html_root(&doc).unwrap();
        let index = NodeIndex::build(&root);
        let (mut document, _) = build_text_document(&index);
        classify(&mut document, &index, titles, FusionMode::PostFiltering);
        document
    }

    fn lorem(words: usize) -> String {
        let base = ["lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit"];
        (0..words).map(|i| base[i % base.len()]).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_single_block_is_content() {
        let text = lorem(40);
        let document = run(&format!("<html><body><div>{text}</div></body></html>"), &[]);

        assert_eq!(document.blocks.len(), 1);
        assert!(document.blocks[0].is_content);
        assert_eq!(document.blocks[0].text, text);
    }

    #[test]
    fn test_menu_list_is_rejected() {
        let para = lorem(100);
        let html = format!(
            r#"<html><body><ul><li><a href="/a">Home page</a></li><li><a href="/b">About us</a></li><li><a href="/c">Contact us</a></li><li><a href="/d">Our blog</a></li><li><a href="/e">Log in</a></li></ul><p>{para}</p></body></html>"#
        );
        let document = run(&html, &[]);

        let content: Vec<&str> = document
            .blocks
            .iter()
            .filter(|b| b.is_content)
            .map(|b| b.text.as_str())
            .collect();
        assert_eq!(content, vec![para.as_str()]);
    }

    #[test]
    fn test_title_block_is_kept_and_labelled() {
        let body = lorem(60);
        let html = format!("<html><body><h1>Storm Hits The Coast</h1><p>{body}</p></body></html>");
        let document = run(&html, &["Storm Hits The Coast".to_string()]);

        assert!(document.blocks[0].has_label(Label::Title));
        assert!(document.blocks.iter().any(|b| b.is_content && b.text == body));
    }

    #[test]
    fn test_comment_section_is_dropped() {
        let body = lorem(60);
        let html = format!(
            r#"<html><body><article><p>{body}</p></article><div class="comments"><p>{}</p></div></body></html>"#,
            lorem(30)
        );
        let document = run(&html, &[]);

        let content: Vec<&str> = document.blocks.iter().filter(|b| b.is_content).map(|b| b.text.as_str()).collect();
        assert_eq!(content, vec![body.as_str()]);
    }

    #[test]
    fn test_empty_document() {
        let document = run("<html><body></body></html>", &[]);
        assert!(document.blocks.is_empty());
    }
}
