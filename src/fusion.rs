//! Block fusion: merging adjacent blocks into coherent regions.
//!
//! Both policies only ever merge a block into its immediate predecessor, so
//! document order is preserved. Each merge removes one block, which bounds
//! the fixed-point loops by the block count.

use tracing::debug;

use crate::document::{Label, TextBlock};

/// Blocks further apart than this (counted in segmented blocks) are never
/// fused by proximity.
const MAX_BLOCK_DISTANCE: usize = 1;

/// Policy for proximity fusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FusionMode {
    /// Before filtering: both blocks content, and the later block was not
    /// produced by fusing a boilerplate heading.
    PreFiltering,
    /// After filtering: both blocks content and at the same tag level.
    PostFiltering,
    /// Regardless of content state: neither block is a list item and the
    /// tag levels differ by at most `max_tag_level_delta`.
    ContentAgnostic { max_tag_level_delta: usize },
}

impl FusionMode {
    fn allows(self, prev: &TextBlock, block: &TextBlock) -> bool {
        match self {
            Self::PreFiltering => {
                prev.is_content
                    && block.is_content
                    && !block.has_label(Label::BoilerplateHeadingFused)
            }
            Self::PostFiltering => {
                prev.is_content && block.is_content && prev.tag_level == block.tag_level
            }
            Self::ContentAgnostic {
                max_tag_level_delta,
            } => {
                !prev.has_label(Label::Li)
                    && !block.has_label(Label::Li)
                    && prev.tag_level.abs_diff(block.tag_level) <= max_tag_level_delta
            }
        }
    }
}

/// Whether two adjacent blocks may be fused under any policy.
fn labels_agree(prev: &TextBlock, block: &TextBlock) -> bool {
    if prev.has_label(Label::StrictlyNotContent) != block.has_label(Label::StrictlyNotContent) {
        return false;
    }
    if prev.has_label(Label::Title) != block.has_label(Label::Title) {
        return false;
    }
    // A menu entry never swallows the text that follows the menu.
    !(!prev.is_content && prev.has_label(Label::Li) && !block.has_label(Label::Li))
}

/// One left-to-right proximity fusion sweep. Returns `true` if any blocks
/// were merged.
pub fn proximity_fusion(blocks: &mut Vec<TextBlock>, mode: FusionMode) -> bool {
    if blocks.len() < 2 {
        return false;
    }
    let mut changed = false;
    let mut fused: Vec<TextBlock> = Vec::with_capacity(blocks.len());
    for block in blocks.drain(..) {
        let Some(prev) = fused.last_mut() else {
            fused.push(block);
            continue;
        };
        let distance = block
            .offset_start
            .saturating_sub(prev.offset_end)
            .saturating_sub(1);
        if distance <= MAX_BLOCK_DISTANCE && mode.allows(prev, &block) && labels_agree(prev, &block)
        {
            prev.merge_next(block);
            changed = true;
        } else {
            fused.push(block);
        }
    }
    *blocks = fused;
    changed
}

/// One heading fusion sweep.
///
/// A heading followed by content is merged into it. A heading followed by
/// boilerplate is itself demoted. Title blocks and strictly-not-content
/// blocks are left alone on either side.
pub fn heading_fusion(blocks: &mut Vec<TextBlock>) -> bool {
    if blocks.len() < 2 {
        return false;
    }
    let mut changed = false;
    let mut fused: Vec<TextBlock> = Vec::with_capacity(blocks.len());
    for block in blocks.drain(..) {
        let Some(prev) = fused.last_mut() else {
            fused.push(block);
            continue;
        };
        let eligible = prev.has_label(Label::Heading)
            && !prev.has_label(Label::StrictlyNotContent)
            && !block.has_label(Label::StrictlyNotContent)
            && !prev.has_label(Label::Title)
            && !block.has_label(Label::Title);
        if !eligible {
            fused.push(block);
            continue;
        }
        if block.is_content {
            let heading_was_content = prev.is_content;
            prev.merge_next(block);
            prev.remove_label(Label::Heading);
            if !heading_was_content {
                prev.add_label(Label::BoilerplateHeadingFused);
            }
            changed = true;
        } else {
            if prev.is_content {
                prev.is_content = false;
                changed = true;
            }
            fused.push(block);
        }
    }
    *blocks = fused;
    changed
}

/// Repeat proximity fusion until no adjacent pair qualifies.
pub fn proximity_fusion_to_fixed_point(blocks: &mut Vec<TextBlock>, mode: FusionMode) -> bool {
    let mut changed = false;
    let mut rounds = 0;
    while proximity_fusion(blocks, mode) {
        changed = true;
        rounds += 1;
    }
    if changed {
        debug!(?mode, rounds, remaining = blocks.len(), "proximity fusion");
    }
    changed
}

/// Repeat heading fusion until it makes no further change.
pub fn heading_fusion_to_fixed_point(blocks: &mut Vec<TextBlock>) -> bool {
    let mut changed = false;
    while heading_fusion(blocks) {
        changed = true;
    }
    changed
}
