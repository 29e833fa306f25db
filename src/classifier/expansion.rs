//! Similar-sibling content expansion.
//!
//! A non-content block becomes content when its DOM representative is a
//! sibling of a nearby content block's representative (same parent, and the
//! same tag unless mixed tags are allowed).

use crate::document::{Label, TextBlock};
use crate::dom;
use crate::node_index::{NodeIndex, NodePos};

/// Configuration of one expansion pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimilarSiblingExpansion {
    pub allow_cross_titles: bool,
    pub allow_cross_headings: bool,
    pub allow_mixed_tags: bool,
    pub max_link_density: f64,
    /// Maximum distance in blocks between two siblings.
    pub max_block_distance: usize,
}

impl SimilarSiblingExpansion {
    /// Expand across headings to siblings with a link density up to 0.5.
    pub const CROSS_HEADINGS: Self = Self {
        allow_cross_titles: false,
        allow_cross_headings: true,
        allow_mixed_tags: false,
        max_link_density: 0.5,
        max_block_distance: 10,
    };

    /// Expand across headings to link-free siblings of any tag.
    pub const MIXED_TAGS: Self = Self {
        allow_cross_titles: false,
        allow_cross_headings: true,
        allow_mixed_tags: true,
        max_link_density: 0.0,
        max_block_distance: 10,
    };

    fn expand_from(block: &TextBlock) -> bool {
        block.is_content
            && !block.has_label(Label::StrictlyNotContent)
            && !block.has_label(Label::Title)
    }

    fn expand_to(&self, block: &TextBlock) -> bool {
        block.link_density <= self.max_link_density
            && !block.is_content
            && !block.has_label(Label::StrictlyNotContent)
            && !block.has_label(Label::Title)
    }

    fn is_similar(&self, index: &NodeIndex, reps: &[Option<NodePos>], i: usize, j: usize) -> bool {
        let (Some(left), Some(right)) = (reps[i], reps[j]) else {
            return false;
        };
        if !self.allow_mixed_tags
            && dom::tag_name(index.node(left)) != dom::tag_name(index.node(right))
        {
            return false;
        }
        index.parent(left) == index.parent(right)
    }

    /// Run the pass. Returns `true` if any block became content.
    pub fn process(&self, blocks: &mut [TextBlock], index: &NodeIndex) -> bool {
        if blocks.len() < 2 || index.is_empty() {
            return false;
        }
        let reps = canonical_representatives(blocks, index);

        // Content blocks that may still pull in siblings, and non-content
        // blocks that may still be pulled in. Both are windows into
        // append-only lists.
        let mut good: Vec<usize> = Vec::with_capacity(blocks.len());
        let mut good_begin = 0;
        let mut bad: Vec<usize> = Vec::with_capacity(blocks.len());
        let mut bad_begin = 0;
        let mut changed = false;

        for i in 0..blocks.len() {
            if (!self.allow_cross_titles && blocks[i].has_label(Label::Title))
                || (!self.allow_cross_headings && blocks[i].has_label(Label::Heading))
            {
                good_begin = good.len();
                bad_begin = bad.len();
                continue;
            }

            if Self::expand_from(&blocks[i]) {
                good.push(i);
                let mut j = bad_begin;
                while j < bad.len() {
                    let b = bad[j];
                    if i - b > self.max_block_distance {
                        if j == bad_begin {
                            bad_begin += 1;
                        }
                        j += 1;
                        continue;
                    }
                    if self.is_similar(index, &reps, i, b) {
                        changed = true;
                        blocks[b].is_content = true;
                        bad[j] = bad[bad_begin];
                        bad_begin += 1;
                    }
                    j += 1;
                }
            } else if self.expand_to(&blocks[i]) {
                let mut matched = false;
                let mut j = good_begin;
                while j < good.len() {
                    let g = good[j];
                    if i - g > self.max_block_distance {
                        if j == good_begin {
                            good_begin += 1;
                        }
                        j += 1;
                        continue;
                    }
                    if self.is_similar(index, &reps, i, g) {
                        changed = true;
                        blocks[i].is_content = true;
                        good[j] = good[good_begin];
                        good_begin += 1;
                        matched = true;
                        break;
                    }
                    j += 1;
                }
                if matched {
                    good.push(i);
                } else {
                    bad.push(i);
                }
            }
        }
        changed
    }
}

/// For each block, the highest ancestor of its first text node that does
/// not also contain the neighbouring blocks' text.
fn canonical_representatives(blocks: &[TextBlock], index: &NodeIndex) -> Vec<Option<NodePos>> {
    let root = 0;
    (0..blocks.len())
        .map(|i| {
            let mut current = blocks[i].first_non_whitespace_text_node()?;
            let prev = if i == 0 {
                Some(root)
            } else {
                blocks[i - 1].last_non_whitespace_text_node()
            };
            let next = blocks
                .get(i + 1)
                .map_or(Some(root), TextBlock::first_non_whitespace_text_node);
            let touches = |pos: NodePos, other: Option<NodePos>| {
                other.is_some_and(|o| index.contains(pos, o))
            };
            while let Some(parent) = index.parent(current) {
                if touches(parent, prev) || touches(parent, next) {
                    break;
                }
                current = parent;
            }
            Some(current)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::build_text_document;

    fn classify_with(html: &str, content: &[bool], pass: SimilarSiblingExpansion) -> Vec<bool> {
        let doc = dom::parse(html);
        let root = dom::html_root(&doc).unwrap();
        let index = NodeIndex::build(&root);
        let (mut document, _) = build_text_document(&index);
        assert_eq!(document.blocks.len(), content.len());
        for (block, is_content) in document.blocks.iter_mut().zip(content) {
            block.is_content = *is_content;
        }
        pass.process(&mut document.blocks, &index);
        document.blocks.iter().map(|b| b.is_content).collect()
    }

    #[test]
    fn test_expands_to_same_tag_siblings() {
        let html = "<html><body><div><p>one</p><p>two</p><p>three</p></div><div><span>x</span></div></body></html>";
        let result = classify_with(html, &[true, false, false, false], SimilarSiblingExpansion::CROSS_HEADINGS);
        assert_eq!(result, vec![true, true, true, false]);
    }

    #[test]
    fn test_mixed_tags_only_when_allowed() {
        let html = "<html><body><div><p>one</p><blockquote>two</blockquote></div></body></html>";
        let strict = classify_with(html, &[true, false], SimilarSiblingExpansion::CROSS_HEADINGS);
        assert_eq!(strict, vec![true, false]);

        let mixed = classify_with(html, &[true, false], SimilarSiblingExpansion::MIXED_TAGS);
        assert_eq!(mixed, vec![true, true]);
    }

    #[test]
    fn test_link_density_limit() {
        let html = r#"<html><body><div><p>one</p><p><a href="/x">two</a></p></div></body></html>"#;
        let result = classify_with(html, &[true, false], SimilarSiblingExpansion::MIXED_TAGS);
        assert_eq!(result, vec![true, false]);
    }

    #[test]
    fn test_earlier_bad_block_expanded_from_later_content() {
        let html = "<html><body><div><p>one</p><p>two</p></div></body></html>";
        let result = classify_with(html, &[false, true], SimilarSiblingExpansion::CROSS_HEADINGS);
        assert_eq!(result, vec![true, true]);
    }
}
