//! Result types for extraction output.
//!
//! Everything here serializes with serde so the CLI can print a result as
//! JSON.

use serde::{Deserialize, Serialize};

use crate::paging::PageParamInfo;

/// Result of distilling an HTML document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractResult {
    /// Cleaned document title.
    pub title: String,

    /// Main content as HTML, empty when nothing was selected or when
    /// `text_only` is set.
    pub content_html: String,

    /// Main content as plain text, one content block per line.
    pub content_text: String,

    /// Direction of the content root: `ltr`, `rtl` or `auto`.
    pub text_direction: String,

    /// Absolute `src` of every image in the content, in document order.
    pub image_urls: Vec<String>,

    pub pagination: Pagination,

    pub statistics: Statistics,

    pub timing: Timing,

    /// Non-fatal problems met during extraction, such as an invalid
    /// document URL.
    pub warnings: Vec<String>,
}

/// Paging signals of the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    /// Best scoring link to the next page.
    pub next_page: Option<String>,

    /// Best scoring link to the previous page.
    pub prev_page: Option<String>,

    /// Detected page parameter; `Unset` when none was found.
    pub page_param_info: PageParamInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    /// Words in the content blocks.
    pub word_count: usize,
}

/// Wall-clock time spent in each pass, in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timing {
    pub parse_ms: f64,
    pub classify_ms: f64,
    pub assemble_ms: f64,
    pub paging_ms: f64,
    pub total_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paging::PageParamType;

    #[test]
    fn test_default_result_is_empty() {
        let result = ExtractResult::default();
        assert!(result.title.is_empty());
        assert!(result.content_html.is_empty());
        assert!(result.image_urls.is_empty());
        assert_eq!(result.pagination.page_param_info.param_type, PageParamType::Unset);
        assert_eq!(result.statistics.word_count, 0);
    }

    #[test]
    fn test_serializes_to_json() {
        let result = ExtractResult {
            title: "Hello".to_string(),
            text_direction: "ltr".to_string(),
            pagination: Pagination {
                next_page: Some("http://example.com/2".to_string()),
                ..Pagination::default()
            },
            ..ExtractResult::default()
        };
        let json = match serde_json::to_value(&result) {
            Ok(json) => json,
            Err(err) => panic!("expected Ok(_), got Err({err:?})"),
        };
        assert_eq!(json["title"], "Hello");
        assert_eq!(json["pagination"]["next_page"], "http://example.com/2");
        assert_eq!(json["pagination"]["page_param_info"]["type"], "UNSET");
        assert!(json["pagination"]["prev_page"].is_null());
    }
}
