//! Configuration options for content extraction.
//!
//! The `Options` struct controls extraction behavior: where links resolve
//! against, which output form is produced, and the thresholds used by the
//! header-image and pagination heuristics.

use crate::fusion::FusionMode;

/// Configuration options for content extraction.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use rs_distiller::Options;
///
/// // Use defaults
/// let options = Options::default();
///
/// // Customize specific fields
/// let options = Options {
///     url: Some("https://example.com/story?page=2".to_string()),
///     text_only: true,
///     ..Options::default()
/// };
/// ```
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct Options {
    /// URL of the document being distilled.
    ///
    /// Used to resolve relative links and images, and required for
    /// page-parameter detection and next/previous paging links.
    ///
    /// Default: `None`
    pub url: Option<String>,

    /// Produce plain text instead of an HTML subtree.
    ///
    /// Each content block's text is emitted followed by a newline.
    ///
    /// Default: `false`
    pub text_only: bool,

    /// Largest number still considered a page number in link text.
    ///
    /// Default: `100`
    pub max_page_number: i32,

    /// Minimum score for a link to be reported as the next/previous page.
    ///
    /// Default: `50`
    pub min_paging_link_score: i32,

    /// Minimum score for an image outside the content to be kept as the
    /// header image.
    ///
    /// Default: `25.0`
    pub min_header_image_score: f64,

    /// Score images outside the selected content as header-image candidates.
    ///
    /// Default: `true`
    pub find_header_image: bool,

    /// Run the page-parameter detector and the paging-link scorer.
    ///
    /// Both need `url` to be set.
    ///
    /// Default: `true`
    pub detect_paging: bool,

    /// Proximity fusion policy applied after boilerplate filtering.
    ///
    /// Default: `FusionMode::PostFiltering`
    pub fusion_mode: FusionMode,

    /// Rewrite `a[href]` and `img[src]` in the output to absolute URLs.
    ///
    /// Has no effect without `url` or a `<base href>`.
    ///
    /// Default: `true`
    pub make_links_absolute: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            url: None,
            text_only: false,
            max_page_number: 100,
            min_paging_link_score: 50,
            min_header_image_score: 25.0,
            find_header_image: true,
            detect_paging: true,
            fusion_mode: FusionMode::PostFiltering,
            make_links_absolute: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_thresholds() {
        let opts = Options::default();

        assert!(opts.url.is_none());
        assert!(!opts.text_only);
        assert_eq!(opts.max_page_number, 100);
        assert_eq!(opts.min_paging_link_score, 50);
        assert!((opts.min_header_image_score - 25.0).abs() < f64::EPSILON);
        assert!(opts.find_header_image);
        assert!(opts.detect_paging);
        assert_eq!(opts.fusion_mode, FusionMode::PostFiltering);
        assert!(opts.make_links_absolute);
    }

    #[test]
    fn test_custom_thresholds() {
        let opts = Options {
            max_page_number: 20,
            min_paging_link_score: 75,
            min_header_image_score: 40.0,
            ..Options::default()
        };

        assert_eq!(opts.max_page_number, 20);
        assert_eq!(opts.min_paging_link_score, 75);
        assert!((opts.min_header_image_score - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_content_agnostic_fusion_can_be_selected() {
        let opts = Options {
            fusion_mode: FusionMode::ContentAgnostic {
                max_tag_level_delta: 1,
            },
            ..Options::default()
        };

        assert_eq!(
            opts.fusion_mode,
            FusionMode::ContentAgnostic {
                max_tag_level_delta: 1
            }
        );
    }

    #[test]
    fn test_boolean_options_can_be_toggled() {
        let opts = Options {
            text_only: true,
            find_header_image: false,
            detect_paging: false,
            make_links_absolute: false,
            ..Options::default()
        };

        assert!(opts.text_only);
        assert!(!opts.find_header_image);
        assert!(!opts.detect_paging);
        assert!(!opts.make_links_absolute);
    }
}
