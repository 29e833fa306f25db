//! Structural labels attached to text blocks.

use serde::{Deserialize, Serialize};

/// A label carried by a [`TextBlock`](super::TextBlock).
///
/// Labels are added while segmenting (from the enclosing elements) and by the
/// classifier passes. Fusion unions the labels of merged blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Label {
    /// Text matches one of the candidate document titles.
    Title,
    MightBeContent,
    VeryLikelyContent,
    /// Text follows a horizontal rule.
    Hr,
    /// Text is inside a list item.
    Li,
    /// Text is inside any `h1`..`h6`.
    Heading,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    /// A non-content heading was fused into this block.
    BoilerplateHeadingFused,
    /// Never content: navigation, asides, comment sections.
    StrictlyNotContent,
    /// Re-marked content because it shares a parent with the main block.
    SiblingOfMainContent,
}

impl Label {
    /// The specific heading label for `h1`..`h6`.
    #[must_use]
    pub fn for_heading(tag: &str) -> Option<Self> {
        match tag {
            "h1" => Some(Self::H1),
            "h2" => Some(Self::H2),
            "h3" => Some(Self::H3),
            "h4" => Some(Self::H4),
            "h5" => Some(Self::H5),
            "h6" => Some(Self::H6),
            _ => None,
        }
    }
}
