//! URL Utility Functions
//!
//! Validation and resolution helpers used for output links, image URLs and
//! the paging detectors.

use url::Url;

/// Check if a string is a valid absolute `http(s)` URL.
///
/// # Returns
/// * `(is_absolute, parsed_url)` - Whether URL is absolute and the parsed URL if valid
#[must_use]
pub fn is_absolute_url(s: &str) -> (bool, Option<Url>) {
    let s = s.trim();

    if s.is_empty() {
        return (false, None);
    }

    // Must start with http:// or https://
    if !s.starts_with("http://") && !s.starts_with("https://") {
        return (false, None);
    }

    match Url::parse(s) {
        Ok(url) => {
            // Verify it has a host
            if url.host().is_some() {
                (true, Some(url))
            } else {
                (false, None)
            }
        }
        Err(_) => (false, None),
    }
}

/// Convert a relative or absolute URL to absolute form.
///
/// # Arguments
/// * `url_str` - The URL to resolve (can be relative or absolute)
/// * `base` - The base URL for resolution
///
/// # Returns
/// * The absolute URL string, or the original if resolution fails
#[must_use]
pub fn create_absolute_url(url_str: &str, base: &Url) -> String {
    let url_str = url_str.trim();

    if url_str.is_empty() {
        return String::new();
    }

    // Preserve special URLs unchanged
    if url_str.starts_with("data:")
        || url_str.starts_with("javascript:")
        || url_str.starts_with("mailto:")
        || url_str.starts_with("tel:")
        || url_str.starts_with('#')
    {
        return url_str.to_string();
    }

    let (is_abs, _) = is_absolute_url(url_str);
    if is_abs {
        return url_str.to_string();
    }

    match base.join(url_str) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => url_str.to_string(),
    }
}

/// Parse the document URL given in the options.
///
/// Returns `None` for a missing or non-`http(s)` URL.
#[must_use]
pub fn parse_document_url(url: Option<&str>) -> Option<Url> {
    let (is_abs, parsed) = is_absolute_url(url?);
    if is_abs {
        parsed
    } else {
        None
    }
}

/// Base for resolving links in a document: the first `<base href>` resolved
/// against the document URL, or the document URL itself.
#[must_use]
pub fn document_base_url(doc: &crate::dom::Document, document_url: &Url) -> Url {
    doc.select("base[href]")
        .nodes()
        .first()
        .and_then(|base| base.attr("href"))
        .and_then(|href| document_url.join(href.trim()).ok())
        .unwrap_or_else(|| document_url.clone())
}
