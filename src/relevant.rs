//! Re-association of non-text elements with the selected content.
//!
//! Classification only selects text nodes. A second walk over the document
//! brings back the images, videos, figures, line breaks and known embeds
//! (YouTube and Vimeo players, Twitter blockquotes) that sit inside the
//! selected text, and optionally one header image found just outside it.

use std::collections::HashSet;

use tracing::debug;
use url::Url;

use crate::dom::{self, NodeRef};
use crate::header_image::HeaderImageFinder;
use crate::node_index::{NodeIndex, NodePos};
use crate::subtree::OrderedNodeMatcher;
use crate::text_utils::is_all_whitespace;
use crate::walker::{walk, Visitor};

/// Elements kept with their whole subtree when met inside content.
const RELEVANT_TAGS: &[&str] = &["br", "figure", "img", "video"];

/// Root domain of an embed provider and the path segment that comes just
/// before the id in its player URLs.
const EMBED_PLAYERS: &[(&str, &str)] = &[("youtube.com", "embed"), ("player.vimeo.com", "video")];

fn has_root_domain(url: &Url, root: &str) -> bool {
    url.host_str()
        .is_some_and(|host| format!(".{host}").to_ascii_lowercase().ends_with(&format!(".{root}")))
}

/// Last non-empty path segment, unless that is `marker` itself.
fn embed_id<'u>(url: &'u Url, marker: &str) -> Option<&'u str> {
    url.path_segments()?
        .rev()
        .find(|segment| !segment.is_empty())
        .filter(|&segment| segment != marker)
}

/// An iframe playing a YouTube or Vimeo video, or an unrendered Twitter
/// blockquote.
fn is_known_embed(node: &NodeRef, tag: &str) -> bool {
    match tag {
        "iframe" => {
            let Some(src) = dom::get_attribute(node, "src") else {
                return false;
            };
            let src = src.trim();
            let src = if src.starts_with("//") {
                format!("https:{src}")
            } else {
                src.to_string()
            };
            let Ok(url) = Url::parse(&src) else {
                return false;
            };
            EMBED_PLAYERS
                .iter()
                .any(|&(root, marker)| has_root_domain(&url, root) && embed_id(&url, marker).is_some())
        }
        "blockquote" => {
            dom::get_attribute(node, "class").is_some_and(|class| class.contains("twitter-tweet"))
                && !dom::descendants_by_tag(node, "a").is_empty()
        }
        _ => false,
    }
}

/// Content nodes merged with their relevant elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelevantElements {
    /// All nodes in document order.
    pub nodes: Vec<NodePos>,
    /// The header image, when one was kept.
    pub header_image: Option<NodePos>,
}

struct RelevantFinder<'i, 'a, 'n> {
    index: &'i NodeIndex<'a>,
    matcher: OrderedNodeMatcher<'n>,
    hidden: &'i HashSet<NodePos>,
    in_content: bool,
    header: Option<(HeaderImageFinder, f64)>,
    images: Vec<(NodePos, i32)>,
    output: Vec<NodePos>,
}

impl RelevantFinder<'_, '_, '_> {
    /// Add an element and its visible subtree.
    fn add_subtree(&mut self, root: NodePos) {
        let end = self.index.subtree_end(root);
        let mut pos = root;
        while pos < end {
            if self.hidden.contains(&pos) {
                pos = self.index.subtree_end(pos);
                continue;
            }
            let node = self.index.node(pos);
            if node.is_text() {
                self.matcher.matches(pos);
                self.output.push(pos);
            } else if node.is_element() {
                self.output.push(pos);
            }
            pos += 1;
        }
    }

    fn consider_header_image(&mut self, pos: NodePos) {
        let Some((finder, min_score)) = &self.header else {
            return;
        };
        let score = finder.score(self.index, pos);
        if f64::from(score) > *min_score {
            debug!(pos, score, "header image candidate");
            self.images.push((pos, score));
            self.output.push(pos);
        }
    }

    /// Keep only the best header image candidate, the first one on ties.
    fn finish(mut self) -> RelevantElements {
        let mut best: Option<(NodePos, i32)> = None;
        for &(pos, score) in &self.images {
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((pos, score));
            }
        }
        let header_image = best.map(|(pos, _)| pos);
        let rejected: HashSet<NodePos> = self
            .images
            .iter()
            .map(|&(pos, _)| pos)
            .filter(|&pos| Some(pos) != header_image)
            .collect();
        if !rejected.is_empty() {
            self.output.retain(|pos| !rejected.contains(pos));
        }
        RelevantElements {
            nodes: self.output,
            header_image,
        }
    }
}

impl<'a> Visitor<'a> for RelevantFinder<'_, 'a, '_> {
    fn visit(&mut self, node: &NodeRef<'a>) -> bool {
        let Some(pos) = self.index.position_of(node) else {
            return false;
        };
        if node.is_text() {
            let matched = self.matcher.matches(pos);
            if matched {
                self.output.push(pos);
            }
            self.in_content = matched || (self.in_content && is_all_whitespace(&node.text()));
            return false;
        }
        if !node.is_element() {
            return false;
        }
        if self.matcher.is_finished() && !self.in_content {
            return false;
        }
        if self.hidden.contains(&pos) {
            return false;
        }

        let tag = dom::tag_name(node).unwrap_or_default();
        if self.in_content {
            if RELEVANT_TAGS.contains(&tag.as_str()) || is_known_embed(node, &tag) {
                self.add_subtree(pos);
                return false;
            }
        } else if tag == "img" {
            self.consider_header_image(pos);
            return false;
        }
        true
    }
}

/// Merge `content_nodes` (text nodes in document order) with the relevant
/// elements around them.
///
/// `hidden` holds the hidden elements found while building blocks. With
/// `min_header_image_score` set, images outside the content are scored and
/// the best one above the threshold is kept.
#[must_use]
pub fn find_relevant_elements(
    index: &NodeIndex,
    content_nodes: &[NodePos],
    hidden: &HashSet<NodePos>,
    min_header_image_score: Option<f64>,
) -> RelevantElements {
    if index.is_empty() || content_nodes.is_empty() {
        return RelevantElements::default();
    }
    let header = min_header_image_score
        .map(|min| (HeaderImageFinder::new(content_nodes.first().copied()), min));
    let mut finder = RelevantFinder {
        index,
        matcher: OrderedNodeMatcher::new(content_nodes),
        hidden,
        in_content: false,
        header,
        images: Vec::new(),
        output: Vec::new(),
    };
    let root = index.node(0).clone();
    walk(&root, &mut finder);
    finder.finish()
}
