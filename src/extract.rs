//! The extraction pipeline.
//!
//! Parse, segment into text blocks, classify, bring back the relevant
//! non-text elements, rebuild the minimal subtree and serialize it. Paging
//! signals are computed from the untouched document.

use std::time::Instant;

use tracing::{debug, instrument, warn};
use url::Url;

use crate::classifier::classify;
use crate::document::{build_text_document, Label, TextDocument};
use crate::dom::{self, Document};
use crate::error::{Error, Result};
use crate::node_index::{NodeIndex, NodePos};
use crate::options::Options;
use crate::paging;
use crate::relevant::find_relevant_elements;
use crate::result::{ExtractResult, Pagination, Statistics, Timing};
use crate::subtree::NodeTree;
use crate::title::{candidate_titles, document_title};
use crate::url_utils::{create_absolute_url, document_base_url, parse_document_url};

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Text nodes of the content blocks other than the title, in document
/// order.
fn content_nodes(document: &TextDocument) -> Vec<NodePos> {
    let mut nodes: Vec<NodePos> = document
        .blocks
        .iter()
        .filter(|b| b.is_content && !b.has_label(Label::Title))
        .flat_map(|b| b.text_nodes.iter().copied())
        .collect();
    nodes.sort_unstable();
    nodes.dedup();
    nodes
}

/// `src` of every image in the tree, resolved against `base` when known.
fn image_urls(tree: &NodeTree, index: &NodeIndex, base: Option<&Url>) -> Vec<String> {
    tree.positions()
        .into_iter()
        .map(|pos| index.node(pos))
        .filter(|node| dom::has_tag(node, "img"))
        .filter_map(|img| dom::get_attribute(img, "src"))
        .map(|src| match base {
            Some(base) => create_absolute_url(&src, base),
            None => src.trim().to_string(),
        })
        .filter(|src| !src.is_empty())
        .collect()
}

fn detect_pagination(doc: &Document, doc_url: &Url, options: &Options) -> Pagination {
    let url = doc_url.as_str();
    Pagination {
        next_page: paging::find_next(doc, url, options.min_paging_link_score),
        prev_page: paging::find_previous(doc, url, options.min_paging_link_score),
        page_param_info: paging::detect(doc, url, options.max_page_number),
    }
}

/// Main entry point for content extraction.
#[instrument(skip_all, fields(html_len = html.len()))]
pub(crate) fn extract_content(html: &str, options: &Options) -> Result<ExtractResult> {
    let total = Instant::now();
    let mut timing = Timing::default();
    let mut warnings = Vec::new();

    let doc_url = match options.url.as_deref() {
        Some(raw) => {
            let parsed = parse_document_url(Some(raw));
            if parsed.is_none() {
                warn!(url = raw, "invalid document url, paging detection skipped");
                warnings.push(format!("invalid document URL: {raw}"));
            }
            parsed
        }
        None => None,
    };

    let started = Instant::now();
    let doc = dom::parse(html);
    let root = dom::html_root(&doc)
        .ok_or_else(|| Error::ParseError("document has no root element".to_string()))?;
    let index = NodeIndex::build(&root);
    timing.parse_ms = elapsed_ms(started);

    let started = Instant::now();
    let title = document_title(&doc);
    let titles = candidate_titles(&doc);
    let (mut text_doc, hidden) = build_text_document(&index);
    classify(&mut text_doc, &index, &titles, options.fusion_mode);
    timing.classify_ms = elapsed_ms(started);

    let started = Instant::now();
    let base = doc_url.as_ref().map(|url| document_base_url(&doc, url));
    let nodes = content_nodes(&text_doc);
    let min_header_score = options.find_header_image.then_some(options.min_header_image_score);
    let relevant = find_relevant_elements(&index, &nodes, &hidden, min_header_score);
    if let Some(image) = relevant.header_image {
        debug!(position = image, "header image kept");
    }
    let tree = NodeTree::build(&index, &relevant.nodes);

    let content_html = if options.text_only {
        String::new()
    } else {
        let link_base = base.as_ref().filter(|_| options.make_links_absolute);
        tree.to_html(&index, link_base)
    };
    let content_text = text_doc.content_text();
    let image_urls = image_urls(&tree, &index, base.as_ref());
    let text_direction = tree.root_direction();
    timing.assemble_ms = elapsed_ms(started);

    let started = Instant::now();
    let pagination = match &doc_url {
        Some(url) if options.detect_paging => detect_pagination(&doc, url, options),
        _ => Pagination::default(),
    };
    timing.paging_ms = elapsed_ms(started);
    timing.total_ms = elapsed_ms(total);

    let word_count = text_doc.content_word_count();
    debug!(
        blocks = text_doc.blocks.len(),
        content_nodes = nodes.len(),
        word_count,
        "extraction finished"
    );

    Ok(ExtractResult {
        title,
        content_html,
        content_text,
        text_direction,
        image_urls,
        pagination,
        statistics: Statistics { word_count },
        timing,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::TextBlock;

    fn extract_ok(html: &str, options: &Options) -> ExtractResult {
        match extract_content(html, options) {
            Ok(result) => result,
            Err(err) => panic!("expected Ok(_), got Err({err:?})"),
        }
    }

    #[test]
    fn test_content_nodes_skip_title_and_boilerplate() {
        let mut title = TextBlock::new("Title", 1, 0);
        title.is_content = true;
        title.add_label(Label::Title);
        title.text_nodes = vec![3];

        let mut body = TextBlock::new("Body", 1, 0);
        body.is_content = true;
        body.text_nodes = vec![9, 7];

        let mut menu = TextBlock::new("Menu", 1, 1);
        menu.text_nodes = vec![5];

        let document = TextDocument::new(vec![title, menu, body]);
        assert_eq!(content_nodes(&document), vec![7, 9]);
    }

    #[test]
    fn test_invalid_url_is_a_warning() {
        let options = Options {
            url: Some("not a url".to_string()),
            ..Options::default()
        };
        let result = extract_ok("<html><body><p>Hello world</p></body></html>", &options);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.pagination, Pagination::default());
    }

    #[test]
    fn test_empty_document() {
        let result = extract_ok("", &Options::default());
        assert!(result.content_html.is_empty());
        assert!(result.content_text.is_empty());
        assert_eq!(result.text_direction, "auto");
        assert_eq!(result.statistics.word_count, 0);
    }

    #[test]
    fn test_text_only_leaves_html_empty() {
        let text = ["alpha", "beta", "gamma", "delta", "epsilon"].repeat(8).join(" ");
        let html = format!("<html><body><div>{text}</div></body></html>");
        let options = Options {
            text_only: true,
            ..Options::default()
        };
        let result = extract_ok(&html, &options);
        assert!(result.content_html.is_empty());
        assert_eq!(result.content_text, format!("{text}\n"));
        assert_eq!(result.statistics.word_count, 40);
    }
}
