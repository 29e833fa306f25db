use rs_distiller::{extract, extract_bytes, extract_with_options, FusionMode, Options};

fn lorem(words: usize) -> String {
    let base = ["lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit"];
    (0..words).map(|i| base[i % base.len()]).collect::<Vec<_>>().join(" ")
}

#[test]
fn single_content_block_is_extracted_whole() {
    let text = lorem(40);
    let html = format!("<html><body><div>{text}</div></body></html>");

    match extract(&html) {
        Ok(result) => {
            assert_eq!(result.content_text, format!("{text}\n"));
            assert!(result.content_html.contains(&text));
            assert_eq!(result.statistics.word_count, 40);
            assert!(result.warnings.is_empty());
        }
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    }
}

#[test]
fn menu_link_list_is_excluded() {
    let para = lorem(100);
    let html = format!(
        r#"<html><body><ul><li><a href="/a">Home page</a></li><li><a href="/b">About us</a></li><li><a href="/c">Contact us</a></li><li><a href="/d">Our blog</a></li><li><a href="/e">Log in</a></li></ul><p>{para}</p></body></html>"#
    );

    match extract(&html) {
        Ok(result) => {
            assert_eq!(result.content_text, format!("{para}\n"));
            assert!(result.content_html.contains(&para));
            assert!(!result.content_html.contains("Home page"));
            assert!(!result.content_html.contains("<li"));
        }
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    }
}

#[test]
fn title_is_cleaned_of_site_name() {
    let html = format!(
        "<html><head><title>Storm Hits The Coast Overnight | Daily News</title></head><body><p>{}</p></body></html>",
        lorem(60)
    );

    match extract(&html) {
        Ok(result) => assert_eq!(result.title, "Storm Hits The Coast Overnight"),
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    }
}

#[test]
fn text_direction_comes_from_content_root() {
    let html = format!(
        r#"<html><body><div dir="rtl"><p>{}</p><p>{}</p></div></body></html>"#,
        lorem(40),
        lorem(45)
    );

    match extract(&html) {
        Ok(result) => assert_eq!(result.text_direction, "rtl"),
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    }
}

#[test]
fn images_inside_content_are_made_absolute() {
    let html = format!(
        r#"<html><body><p>{} <img src="pics/a.jpg"> {}</p></body></html>"#,
        lorem(30),
        lorem(30)
    );
    let options = Options {
        url: Some("https://example.com/articles/story.html".to_string()),
        ..Options::default()
    };

    match extract_with_options(&html, &options) {
        Ok(result) => {
            assert_eq!(result.image_urls, vec!["https://example.com/articles/pics/a.jpg"]);
            assert!(result
                .content_html
                .contains(r#"src="https://example.com/articles/pics/a.jpg""#));
        }
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    }
}

#[test]
fn relative_links_kept_when_absolutizing_is_off() {
    let html = format!(
        r#"<html><body><p>{} <img src="pics/a.jpg"> {}</p></body></html>"#,
        lorem(30),
        lorem(30)
    );
    let options = Options {
        url: Some("https://example.com/articles/story.html".to_string()),
        make_links_absolute: false,
        ..Options::default()
    };

    match extract_with_options(&html, &options) {
        Ok(result) => assert!(result.content_html.contains(r#"src="pics/a.jpg""#)),
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    }
}

#[test]
fn next_page_link_is_reported() {
    let html = format!(
        r#"<html><body><p>{}</p><div><a href="/story/page/2">next page</a></div></body></html>"#,
        lorem(60)
    );
    let options = Options {
        url: Some("http://example.com/story/page/1".to_string()),
        ..Options::default()
    };

    match extract_with_options(&html, &options) {
        Ok(result) => {
            assert_eq!(
                result.pagination.next_page.as_deref(),
                Some("http://example.com/story/page/2")
            );
            assert_eq!(result.pagination.prev_page, None);
        }
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    }
}

#[test]
fn paging_is_skipped_without_url_or_when_disabled() {
    let html = r#"<html><body><a href="/story/page/2">next page</a></body></html>"#;

    match extract(html) {
        Ok(result) => assert_eq!(result.pagination.next_page, None),
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    }

    let options = Options {
        url: Some("http://example.com/story/page/1".to_string()),
        detect_paging: false,
        ..Options::default()
    };
    match extract_with_options(html, &options) {
        Ok(result) => assert_eq!(result.pagination.next_page, None),
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    }
}

#[test]
fn invalid_url_only_warns() {
    let options = Options {
        url: Some("ftp://example.com/file".to_string()),
        ..Options::default()
    };

    match extract_with_options(&format!("<html><body><div>{}</div></body></html>", lorem(40)), &options) {
        Ok(result) => {
            assert_eq!(result.warnings.len(), 1);
            assert!(!result.content_text.is_empty());
        }
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    }
}

#[test]
fn content_agnostic_fusion_still_extracts() {
    let options = Options {
        fusion_mode: FusionMode::ContentAgnostic { max_tag_level_delta: 1 },
        ..Options::default()
    };
    let text = lorem(50);

    match extract_with_options(&format!("<html><body><article><p>{text}</p></article></body></html>"), &options) {
        Ok(result) => assert_eq!(result.content_text, format!("{text}\n")),
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    }
}

#[test]
fn bytes_are_decoded_with_declared_charset() {
    let mut html = b"<html><head><meta charset=\"windows-1252\"><title>Caf\xE9 society</title></head><body><div>".to_vec();
    html.extend_from_slice(lorem(40).as_bytes());
    html.extend_from_slice(b"</div></body></html>");

    match extract_bytes(&html) {
        Ok(result) => assert_eq!(result.title, "Café society"),
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    }
}

#[test]
fn result_serializes_to_json() {
    match extract(&format!("<html><body><div>{}</div></body></html>", lorem(40))) {
        Ok(result) => {
            let json = serde_json::to_value(&result).unwrap_or_default();
            assert_eq!(json["statistics"]["word_count"], 40);
            assert_eq!(json["pagination"]["page_param_info"]["type"], "UNSET");
        }
        Err(err) => panic!("expected Ok(_), got Err({err:?})"),
    }
}
