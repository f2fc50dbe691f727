use crate::config::FormatConfig;
use crate::test_utils::{build_title_page, default_styles, format_doc, geometry};
use emboss_doc::Document;
use emboss_types::PageNumberKind;

#[test]
fn test_title_page_stretches_to_bottom() {
    let mut doc = Document::new();
    build_title_page(&mut doc, doc.root(), &["volume one", "some press", "year"]);
    let styles = default_styles();
    let config = FormatConfig::default();
    let pages = format_doc(&mut doc, &styles, &config, geometry(20, 6));

    assert_eq!(pages.page_count(), 1);
    let page = pages.page(0);
    // First content line on the first row, last on the final drawable row.
    assert_eq!(page.first_content_row(), Some(0));
    assert_eq!(page.last_content_row(), Some(page.bottom_row()));
    assert_eq!(page.page_number_kind(), PageNumberKind::TitlePage);
}

#[test]
fn test_title_page_with_running_head_starts_on_row_one() {
    let mut doc = Document::new();
    build_title_page(&mut doc, doc.root(), &["title", "publisher"]);
    let styles = default_styles();
    let config = FormatConfig {
        running_head: true,
        ..Default::default()
    };
    let pages = format_doc(&mut doc, &styles, &config, geometry(20, 6));

    let page = pages.page(0);
    assert_eq!(page.first_content_row(), Some(1));
    assert_eq!(page.last_content_row(), Some(page.bottom_row()));
}

#[test]
fn test_slack_remainder_lands_in_later_gaps() {
    // Three sections on an 8-row page: 5 rows of slack over 2 gaps means
    // shares of 2 and 3, the single remainder line in the later gap.
    let mut doc = Document::new();
    build_title_page(&mut doc, doc.root(), &["one", "two", "three"]);
    let styles = default_styles();
    let config = FormatConfig::default();
    let pages = format_doc(&mut doc, &styles, &config, geometry(20, 8));

    let page = pages.page(0);
    let rows: Vec<u16> = page.spans().iter().map(|s| s.row).collect();
    assert_eq!(rows, vec![0, 3, 7]);
}

#[test]
fn test_single_section_fills_from_top() {
    // With no gaps to stretch, the section stays top-aligned.
    let mut doc = Document::new();
    build_title_page(&mut doc, doc.root(), &["alone"]);
    let styles = default_styles();
    let config = FormatConfig::default();
    let pages = format_doc(&mut doc, &styles, &config, geometry(20, 5));

    assert_eq!(pages.page(0).first_content_row(), Some(0));
}

#[test]
fn test_overflowing_title_page_renders_plain() {
    // More section lines than rows: centering is impossible and the
    // sections flow top-aligned across pages instead.
    let mut doc = Document::new();
    let sections: Vec<String> = (0..8).map(|i| format!("section {i}")).collect();
    let refs: Vec<&str> = sections.iter().map(String::as_str).collect();
    build_title_page(&mut doc, doc.root(), &refs);
    let styles = default_styles();
    let config = FormatConfig::default();
    let pages = format_doc(&mut doc, &styles, &config, geometry(20, 4));

    assert!(pages.page_count() >= 2);
    let total_spans: usize = pages.iter().map(|p| p.spans().len()).sum();
    assert_eq!(total_spans, 8);
}

#[test]
fn test_last_line_wraps_clear_of_page_number() {
    let mut doc = Document::new();
    let wide = "b".repeat(19);
    build_title_page(&mut doc, doc.root(), &["top", &wide]);
    let styles = default_styles();
    let config = FormatConfig::default();
    let pages = format_doc(&mut doc, &styles, &config, geometry(20, 4));

    assert_eq!(pages.page_count(), 1);
    let page = pages.page(0);
    let limit = page.geometry().cells_per_line - page.page_number_width();
    for span in page.spans().iter().filter(|s| s.row == page.bottom_row()) {
        assert!(
            span.end_x() <= limit,
            "span {span:?} collides with the page-number label"
        );
    }
    assert_eq!(page.last_content_row(), Some(page.bottom_row()));
}

#[test]
fn test_title_page_starts_on_fresh_sheet() {
    let mut doc = Document::new();
    doc.add_braille(doc.root(), "body text before");
    build_title_page(&mut doc, doc.root(), &["title", "press"]);
    let styles = default_styles();
    let config = FormatConfig::default();
    let pages = format_doc(&mut doc, &styles, &config, geometry(20, 6));

    assert_eq!(pages.page_count(), 2);
    // The body page keeps its normal numbering; the title sheet does not.
    assert_eq!(pages.page(0).page_number_kind(), PageNumberKind::Normal);
    assert_eq!(pages.page(1).page_number_kind(), PageNumberKind::TitlePage);
    assert_eq!(pages.page(1).first_content_row(), Some(0));
}
