use rs_distiller::dom;
use rs_distiller::paging::{
    detect, find_next, find_previous, linear_formula, parse_page_infos, LinearFormula,
    MonotonicGroups, PageLinkInfo, PageParamType, ParsedUrl,
};

fn page_numbers(groups: &MonotonicGroups) -> Vec<Vec<i32>> {
    groups
        .groups()
        .iter()
        .map(|g| g.pages.iter().map(|p| p.page_num).collect())
        .collect()
}

fn groups_in(body: &str) -> MonotonicGroups {
    let doc = dom::parse(&format!("<html><body><p>{body}</p></body></html>"));
    let Some(doc_url) = ParsedUrl::parse("http://a.com/b?p=1") else {
        panic!("expected a valid url");
    };
    parse_page_infos(&doc, &doc_url, doc_url.url(), 100)
}

#[test]
fn word_text_splits_monotonic_groups() {
    let groups = groups_in(
        r#"1 <a href="?p=2">2</a> <a href="?p=3">3</a> foo <a href="?p=5">5</a> <a href="?p=4">4</a> <a href="?p=3">3</a>"#,
    );
    assert_eq!(page_numbers(&groups), vec![vec![1, 2, 3], vec![5, 4, 3]]);
    assert_eq!(groups.groups()[0].delta_sign, 1);
    assert_eq!(groups.groups()[1].delta_sign, -1);
}

#[test]
fn word_link_splits_monotonic_groups() {
    let groups = groups_in(
        r#"1 <a href="?p=2">2</a> <a href="?p=3">3</a> <a href="?p=foo">foo</a> <a href="?p=5">5</a> <a href="?p=4">4</a> <a href="?p=3">3</a>"#,
    );
    assert_eq!(page_numbers(&groups), vec![vec![1, 2, 3], vec![5, 4, 3]]);
    assert_eq!(groups.groups()[0].delta_sign, 1);
    assert_eq!(groups.groups()[1].delta_sign, -1);
}

#[test]
fn linear_formula_requires_exact_fit() {
    let links = |pairs: &[(i32, i32)]| -> Vec<PageLinkInfo> {
        pairs
            .iter()
            .enumerate()
            .map(|(i, &(page_num, page_param_value))| PageLinkInfo {
                page_num,
                page_param_value,
                pos_in_ascending: i,
            })
            .collect()
    };

    assert_eq!(
        linear_formula(&links(&[(1, 10), (2, 20), (3, 30)])),
        Some(LinearFormula { coefficient: 10, delta: 0 })
    );
    assert_eq!(linear_formula(&links(&[(1, 11), (2, 20)])), None);
    assert_eq!(linear_formula(&links(&[(1, 1), (3, 4)])), None);
}

#[test]
fn query_pagination_with_view_all_link() {
    let doc = dom::parse(
        r#"<html><body><div class="pager">1 <a href="?p=2">2</a> <a href="?p=3">3</a> <a href="?p=all">view all</a></div></body></html>"#,
    );

    let info = detect(&doc, "http://a.com/b?p=1", 100);
    assert_eq!(info.param_type, PageParamType::PageNumber);
    assert_eq!(info.formula, Some(LinearFormula { coefficient: 1, delta: 0 }));
    assert_eq!(info.page_pattern, "http://a.com/b?p=[*!]");
    assert_eq!(info.single_page_url, "http://a.com/b?p=all");
}

#[test]
fn invalid_document_url_leaves_info_unset() {
    let doc = dom::parse(r#"<html><body>1 <a href="?p=2">2</a> <a href="?p=3">3</a></body></html>"#);

    let info = detect(&doc, "not a url", 100);
    assert_eq!(info.param_type, PageParamType::Unset);
    assert!(info.all_page_info.is_empty());
    assert_eq!(find_next(&doc, "not a url", 50), None);
}

#[test]
fn next_and_previous_links() {
    let doc = dom::parse(
        r#"<html><body><div class="nav"><a href="/news/page/1">previous</a> <a href="/news/page/3">next</a></div></body></html>"#,
    );
    let url = "http://example.com/news/page/2";

    assert_eq!(find_next(&doc, url, 50).as_deref(), Some("http://example.com/news/page/3"));
    assert_eq!(find_previous(&doc, url, 50).as_deref(), Some("http://example.com/news/page/1"));
}

#[test]
fn threshold_controls_paging_links() {
    let doc = dom::parse(r#"<html><body><a href="/news/page2">page 2</a></body></html>"#);
    let url = "http://example.com/news/story.html";

    assert!(find_next(&doc, url, 50).is_some());
    assert_eq!(find_next(&doc, url, 51), None);
}
