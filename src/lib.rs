//! # rs-distiller
//!
//! Main-content, title and pagination extraction from HTML documents.
//!
//! The document is segmented into text blocks, each block is classified as
//! content or boilerplate from its word counts, link density and
//! neighbours, and the smallest subtree holding the content is rebuilt and
//! serialized. Independently, the document's links are searched for the
//! next/previous page and for a page parameter in the URL.
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_distiller::{extract_with_options, Options};
//!
//! let body = "Rust is a language empowering everyone to build reliable and efficient software. "
//!     .repeat(4);
//! let html = format!("<html><head><title>Why Rust</title></head><body><div>{body}</div></body></html>");
//!
//! let options = Options {
//!     url: Some("https://example.com/why-rust".to_string()),
//!     ..Options::default()
//! };
//! let result = extract_with_options(&html, &options)?;
//! assert_eq!(result.title, "Why Rust");
//! assert!(result.content_text.contains("reliable and efficient"));
//! # Ok::<(), rs_distiller::Error>(())
//! ```
//!
//! ## Pipeline
//!
//! - [`walker`] and [`document`]: DOM walk and segmentation into text blocks
//! - [`classifier`] and [`fusion`]: content classification and block fusion
//! - [`relevant`] and [`header_image`]: images and breaks kept with the text
//! - [`subtree`]: minimal subtree reconstruction and serialization
//! - [`paging`]: page-parameter detection and next/previous link scoring

mod error;
mod extract;
mod options;
mod patterns;
mod result;

/// DOM helpers over `dom_query`, including the style-derived properties
/// (visibility, display, dimensions, direction).
pub mod dom;

/// Pre-order positions of the nodes of a document.
pub mod node_index;

/// Depth-first DOM walker with enter/exit callbacks.
pub mod walker;

/// Text blocks and the segmenter that builds them.
pub mod document;

/// Content/boilerplate classification passes.
pub mod classifier;

/// Merging of adjacent text blocks.
pub mod fusion;

/// Header image scoring.
pub mod header_image;

/// Non-text elements associated with the selected content.
pub mod relevant;

/// Minimal subtree reconstruction.
pub mod subtree;

/// Document title cleaning.
pub mod title;

/// Page-parameter detection and paging link scoring.
pub mod paging;

/// Word counting and number parsing.
pub mod text_utils;

/// URL validation and resolution.
pub mod url_utils;

/// Character encoding detection and transcoding.
pub mod encoding;

// Public API - re-exports
pub use error::{Error, Result};
pub use fusion::FusionMode;
pub use options::Options;
pub use result::{ExtractResult, Pagination, Statistics, Timing};

/// Extracts main content from an HTML document using default options.
///
/// # Example
///
/// ```rust
/// use rs_distiller::extract;
///
/// let result = extract("<html><body><div>Content</div></body></html>")?;
/// println!("{}", result.content_text);
/// # Ok::<(), rs_distiller::Error>(())
/// ```
pub fn extract(html: &str) -> Result<ExtractResult> {
    extract_with_options(html, &Options::default())
}

/// Extracts main content from an HTML document with custom options.
///
/// # Example
///
/// ```rust
/// use rs_distiller::{extract_with_options, Options};
///
/// let options = Options {
///     url: Some("https://example.com/story?page=2".to_string()),
///     text_only: true,
///     ..Options::default()
/// };
/// let result = extract_with_options("<html><body><p>Content</p></body></html>", &options)?;
/// assert!(result.content_html.is_empty());
/// # Ok::<(), rs_distiller::Error>(())
/// ```
pub fn extract_with_options(html: &str, options: &Options) -> Result<ExtractResult> {
    extract::extract_content(html, options)
}

/// Extracts main content from HTML bytes with automatic encoding detection.
///
/// The charset comes from `<meta charset>` or a `Content-Type` `http-equiv`
/// declaration in the first 1024 bytes and defaults to UTF-8. Invalid
/// sequences are replaced with U+FFFD rather than causing errors.
///
/// # Example
///
/// ```rust
/// use rs_distiller::extract_bytes;
///
/// let html = b"<html><head><meta charset=\"ISO-8859-1\"><title>Caf\xE9</title></head><body></body></html>";
/// let result = extract_bytes(html)?;
/// assert_eq!(result.title, "Café");
/// # Ok::<(), rs_distiller::Error>(())
/// ```
pub fn extract_bytes(html: &[u8]) -> Result<ExtractResult> {
    extract_bytes_with_options(html, &Options::default())
}

/// Extracts main content from HTML bytes with custom options and automatic
/// encoding detection.
pub fn extract_bytes_with_options(html: &[u8], options: &Options) -> Result<ExtractResult> {
    let html = encoding::transcode_to_utf8(html);
    extract_with_options(&html, options)
}
