//! DOM Operations Adapter
//!
//! Thin helpers over `dom_query` node references, plus the "computed style"
//! capability the pipeline consumes. A parsed document has no layout engine,
//! so display, visibility, size and direction are derived from tag defaults,
//! HTML attributes and inline `style` declarations.

// Re-export core types for external use
pub use dom_query::{Document, NodeId, NodeRef};

// Re-export StrTendril for external use
pub use tendril::StrTendril;

use crate::text_utils::normalize_whitespace;

/// Tags whose content is never rendered.
const NEVER_RENDERED: &[&str] = &[
    "head", "script", "style", "noscript", "template", "meta", "link", "title", "base",
];

/// Tags rendered inline by default.
const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "acronym", "b", "bdi", "bdo", "big", "cite", "code", "data", "dfn", "em",
    "font", "i", "kbd", "label", "mark", "q", "rp", "rt", "ruby", "s", "samp", "small", "span",
    "strike", "strong", "sub", "sup", "time", "tt", "u", "var", "wbr", "br",
];

/// Tags rendered inline-block by default.
const INLINE_BLOCK_TAGS: &[&str] = &[
    "img", "button", "input", "select", "textarea", "video", "audio", "canvas", "iframe",
    "embed", "object", "meter", "progress",
];

/// Void elements never have children and are serialized without a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

// === Parsing ===

/// Parse HTML string into document
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

/// The `<html>` element of a parsed document.
#[must_use]
pub fn html_root(doc: &Document) -> Option<NodeRef<'_>> {
    doc.select("html").nodes().first().cloned()
}

// === Tag/Attribute Information ===

/// Get tag name (lowercase). `None` for text, comment and document nodes.
#[must_use]
pub fn tag_name(node: &NodeRef) -> Option<String> {
    if !node.is_element() {
        return None;
    }
    node.node_name().map(|t| t.to_ascii_lowercase())
}

/// Check whether an element has the given tag name.
#[must_use]
pub fn has_tag(node: &NodeRef, tag: &str) -> bool {
    tag_name(node).is_some_and(|t| t == tag)
}

/// Get any attribute value
#[inline]
#[must_use]
pub fn get_attribute(node: &NodeRef, name: &str) -> Option<String> {
    node.attr(name).map(|s| s.to_string())
}

/// Get all attributes as key-value pairs, in source order.
#[must_use]
pub fn get_all_attributes(node: &NodeRef) -> Vec<(String, String)> {
    node.attrs()
        .iter()
        .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
        .collect()
}

/// Class and id joined by a space, the way the paging heuristics read them.
#[must_use]
pub fn class_and_id(node: &NodeRef) -> String {
    format!(
        "{} {}",
        node.attr("class").map(|s| s.to_string()).unwrap_or_default(),
        node.attr("id").map(|s| s.to_string()).unwrap_or_default()
    )
}

/// Raw text of a text node, or all descendant text of an element.
#[inline]
#[must_use]
pub fn text_content(node: &NodeRef) -> StrTendril {
    node.text()
}

// === Tree Navigation ===

/// Parent element, skipping the document node.
#[must_use]
pub fn parent_element<'a>(node: &NodeRef<'a>) -> Option<NodeRef<'a>> {
    node.parent().filter(NodeRef::is_element)
}

/// Element ancestors from the closest outwards.
#[must_use]
pub fn ancestor_elements<'a>(node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    let mut out = Vec::new();
    let mut current = parent_element(node);
    while let Some(p) = current {
        current = parent_element(&p);
        out.push(p);
    }
    out
}

/// All descendant elements with the given tag, in document order.
#[must_use]
pub fn descendants_by_tag<'a>(node: &NodeRef<'a>, tag: &str) -> Vec<NodeRef<'a>> {
    let mut out = Vec::new();
    let mut stack: Vec<NodeRef<'a>> = node.children().into_iter().rev().collect();
    while let Some(n) = stack.pop() {
        if n.is_element() {
            if has_tag(&n, tag) {
                out.push(n.clone());
            }
            stack.extend(n.children().into_iter().rev());
        }
    }
    out
}

// === Inline Style ===

/// Look up a property in the element's inline `style` attribute.
///
/// The last declaration wins; `!important` is dropped and the value is
/// lowercased.
#[must_use]
pub fn style_property(node: &NodeRef, property: &str) -> Option<String> {
    let style = node.attr("style")?;
    style
        .split(';')
        .filter_map(|decl| decl.split_once(':'))
        .filter(|(name, _)| name.trim().eq_ignore_ascii_case(property))
        .map(|(_, value)| {
            value
                .trim()
                .trim_end_matches("!important")
                .trim()
                .to_ascii_lowercase()
        })
        .last()
}

/// Pixel value of a CSS length or a bare number, if it has one.
fn parse_pixels(value: &str) -> Option<u32> {
    let v = value.trim().trim_end_matches("px").trim();
    v.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite() && *f >= 0.0)
        .map(|f| f.round() as u32)
}

// === Computed Style Emulation ===

/// Display type of an element as used by block segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    None,
    Inline,
    InlineBlock,
    Block,
    ListItem,
    Table,
    TableRow,
    TableCell,
}

/// Effective display of an element: inline style first, then tag default.
#[must_use]
pub fn display(node: &NodeRef) -> Display {
    if let Some(value) = style_property(node, "display") {
        return match value.as_str() {
            "none" => Display::None,
            "inline" | "contents" => Display::Inline,
            "inline-block" | "inline-flex" | "inline-grid" | "inline-table" => {
                Display::InlineBlock
            }
            "list-item" => Display::ListItem,
            "table" => Display::Table,
            "table-row" => Display::TableRow,
            "table-cell" => Display::TableCell,
            _ => Display::Block,
        };
    }
    let Some(tag) = tag_name(node) else {
        return Display::Inline;
    };
    let tag = tag.as_str();
    if NEVER_RENDERED.contains(&tag) {
        Display::None
    } else if INLINE_TAGS.contains(&tag) {
        Display::Inline
    } else if INLINE_BLOCK_TAGS.contains(&tag) {
        Display::InlineBlock
    } else {
        match tag {
            "li" => Display::ListItem,
            "table" => Display::Table,
            "tr" => Display::TableRow,
            "td" | "th" => Display::TableCell,
            _ => Display::Block,
        }
    }
}

/// Check whether an element itself is hidden, ignoring its ancestors.
#[must_use]
pub fn is_hidden_element(node: &NodeRef) -> bool {
    if !node.is_element() {
        return false;
    }
    if node.has_attr("hidden") {
        return true;
    }
    if display(node) == Display::None {
        return true;
    }
    if style_property(node, "visibility").is_some_and(|v| v == "hidden" || v == "collapse") {
        return true;
    }
    style_property(node, "opacity")
        .and_then(|v| v.parse::<f64>().ok())
        .is_some_and(|o| o <= 0.0)
}

/// Check whether a node is rendered: neither it nor any ancestor is hidden.
#[must_use]
pub fn is_visible(node: &NodeRef) -> bool {
    !is_hidden_element(node) && !ancestor_elements(node).iter().any(is_hidden_element)
}

/// Width and height in pixels from attributes or inline style; 0 if unknown.
#[must_use]
pub fn dimensions(node: &NodeRef) -> (u32, u32) {
    let read = |name: &str| {
        style_property(node, name)
            .and_then(|v| parse_pixels(&v))
            .or_else(|| node.attr(name).and_then(|v| parse_pixels(&v)))
            .unwrap_or(0)
    };
    (read("width"), read("height"))
}

/// Effective text direction: `ltr`, `rtl` or `auto`.
///
/// The closest element declaring a direction (via `dir` or inline style)
/// decides.
#[must_use]
pub fn text_direction(node: &NodeRef) -> String {
    let own = if node.is_element() { Some(node.clone()) } else { None };
    for element in own.into_iter().chain(ancestor_elements(node)) {
        if let Some(dir) = element.attr("dir") {
            let dir = dir.trim().to_ascii_lowercase();
            if matches!(dir.as_str(), "ltr" | "rtl" | "auto") {
                return dir;
            }
        }
        if let Some(dir) = style_property(&element, "direction") {
            if dir == "ltr" || dir == "rtl" {
                return dir;
            }
        }
    }
    "auto".to_string()
}

/// A link styled with a text cursor does not behave as a link.
#[must_use]
pub fn is_disabled_link(node: &NodeRef) -> bool {
    style_property(node, "cursor").is_some_and(|c| c == "text")
}

/// Visible text of a node with whitespace runs collapsed.
#[must_use]
pub fn inner_text(node: &NodeRef) -> String {
    fn collect(node: &NodeRef, out: &mut String) {
        if node.is_text() {
            out.push_str(&node.text());
            out.push(' ');
            return;
        }
        if node.is_element() && is_hidden_element(node) {
            return;
        }
        for child in node.children() {
            collect(&child, out);
        }
    }
    let mut out = String::new();
    collect(node, &mut out);
    normalize_whitespace(&out)
}

/// A link has no rendered box when it shows no text and holds no image.
#[must_use]
pub fn is_zero_size_link(node: &NodeRef) -> bool {
    inner_text(node).is_empty()
        && descendants_by_tag(node, "img")
            .iter()
            .all(|img| !is_visible(img))
}
