use crate::config::FormatConfig;
use crate::context::FormatContext;
use crate::literary::LiteraryFormatter;
use crate::numbered::NumberedLineFormatter;
use crate::test_utils::{build_line_group, default_styles, geometry};
use emboss_canvas::PageSet;
use emboss_doc::{Continuation, Document};

#[test]
fn test_widening_labels_trigger_two_relayouts() {
    // Labels "9", "10", "100": the margin widens on "10" and again on
    // "100", each time re-adding every previously placed line.
    let mut doc = Document::new();
    let group = build_line_group(
        &mut doc,
        doc.root(),
        false,
        &[
            (Some("9"), "first verse"),
            (Some("10"), "second verse"),
            (Some("100"), "third verse"),
        ],
    );
    let styles = default_styles();
    let config = FormatConfig::default();
    let literary = LiteraryFormatter::new();
    let mut pages = PageSet::new(geometry(24, 10));
    let mut ctx = FormatContext::new(&mut doc, &styles, &config);

    let stats = NumberedLineFormatter::new(&literary)
        .format(&mut ctx, group, false, &mut pages)
        .unwrap();

    assert_eq!(stats.relayouts, 2);
    // Final margin covers the widest rendered label plus its gap.
    assert_eq!(stats.margin, 4);

    // All three lines and labels are on the page exactly once.
    let page = pages.page(0);
    assert!(page.row_text(0).starts_with("first verse"));
    assert!(page.row_text(0).ends_with('9'));
    assert!(page.row_text(1).starts_with("second verse"));
    assert!(page.row_text(1).ends_with("10"));
    assert!(page.row_text(2).starts_with("third verse"));
    assert!(page.row_text(2).ends_with("100"));
}

#[test]
fn test_margin_covers_widest_label() {
    let mut doc = Document::new();
    let group = build_line_group(
        &mut doc,
        doc.root(),
        false,
        &[
            (Some("1"), "one one one one"),
            (Some("12"), "two two"),
        ],
    );
    let styles = default_styles();
    let config = FormatConfig::default();
    let literary = LiteraryFormatter::new();
    let mut pages = PageSet::new(geometry(20, 10));
    let mut ctx = FormatContext::new(&mut doc, &styles, &config);

    let stats = NumberedLineFormatter::new(&literary)
        .format(&mut ctx, group, false, &mut pages)
        .unwrap();

    let widest = 2;
    assert!(stats.margin >= widest + 1);
    // Reserved margin means no line text enters the label band.
    let lines = doc.children(group).to_vec();
    for page in pages.iter() {
        for span in page.spans() {
            if lines.contains(&span.node) {
                assert!(span.end_x() <= 20 - stats.margin);
            }
        }
    }
}

#[test]
fn test_labels_right_aligned_at_page_edge() {
    let mut doc = Document::new();
    let group = build_line_group(&mut doc, doc.root(), false, &[(Some("7"), "verse")]);
    let styles = default_styles();
    let config = FormatConfig::default();
    let literary = LiteraryFormatter::new();
    let mut pages = PageSet::new(geometry(16, 6));
    let mut ctx = FormatContext::new(&mut doc, &styles, &config);

    NumberedLineFormatter::new(&literary)
        .format(&mut ctx, group, false, &mut pages)
        .unwrap();

    let label = pages
        .page(0)
        .spans()
        .iter()
        .find(|s| s.text == "7")
        .expect("label placed");
    assert_eq!(label.end_x(), 16);
    let line = doc.children(group)[0];
    assert_eq!(doc.marks(line).line_label.as_deref(), Some("7"));
}

#[test]
fn test_continued_line_marks_and_defers_label() {
    let mut doc = Document::new();
    // One line tall enough to cross the 3-row page.
    let group = build_line_group(
        &mut doc,
        doc.root(),
        false,
        &[(Some("5"), "aaaa bbbb cccc dddd eeee ffff gggg hhhh")],
    );
    let styles = default_styles();
    let config = FormatConfig::default();
    let literary = LiteraryFormatter::new();
    let mut pages = PageSet::new(geometry(12, 3));
    let mut ctx = FormatContext::new(&mut doc, &styles, &config);

    NumberedLineFormatter::new(&literary)
        .format(&mut ctx, group, false, &mut pages)
        .unwrap();

    assert!(pages.page_count() > 1);
    let line = doc.children(group)[0];
    assert_eq!(doc.marks(line).continuation, Some(Continuation::Last));

    // The label rides the final fragment, not the first page.
    let label_page = pages
        .iter()
        .position(|p| p.spans().iter().any(|s| s.text == "5"))
        .expect("label placed");
    assert_eq!(label_page, pages.page_count() - 1);
}

#[test]
fn test_unnumbered_lines_reserve_no_margin() {
    let mut doc = Document::new();
    let group = build_line_group(
        &mut doc,
        doc.root(),
        false,
        &[(None, "plain first"), (None, "plain second")],
    );
    let styles = default_styles();
    let config = FormatConfig::default();
    let literary = LiteraryFormatter::new();
    let mut pages = PageSet::new(geometry(20, 6));
    let mut ctx = FormatContext::new(&mut doc, &styles, &config);

    let stats = NumberedLineFormatter::new(&literary)
        .format(&mut ctx, group, false, &mut pages)
        .unwrap();

    assert_eq!(stats.relayouts, 0);
    assert_eq!(stats.margin, 0);
    assert_eq!(pages.page(0).row_text(0), "plain first");
}

#[test]
fn test_irrecoverable_group_falls_back_to_literary() {
    // A 4-cell page cannot reserve a 4-cell margin and still hold text;
    // the group renders as plain literary content instead.
    let mut doc = Document::new();
    let group = build_line_group(&mut doc, doc.root(), false, &[(Some("100"), "abc")]);
    let styles = default_styles();
    let config = FormatConfig::default();
    let literary = LiteraryFormatter::new();
    let mut pages = PageSet::new(geometry(4, 6));
    let mut ctx = FormatContext::new(&mut doc, &styles, &config);

    NumberedLineFormatter::new(&literary)
        .format(&mut ctx, group, false, &mut pages)
        .unwrap();

    // Text still reaches the page, without any label.
    assert!(pages.iter().any(|p| !p.spans().is_empty()));
    assert!(!pages
        .iter()
        .flat_map(|p| p.spans())
        .any(|s| s.text == "100"));
}

#[test]
fn test_prose_lines_flow_inline() {
    let mut doc = Document::new();
    let group = build_line_group(
        &mut doc,
        doc.root(),
        true,
        &[(Some("1"), "alpha"), (None, "beta")],
    );
    let styles = default_styles();
    let config = FormatConfig::default();
    let literary = LiteraryFormatter::new();
    let mut pages = PageSet::new(geometry(20, 6));
    let mut ctx = FormatContext::new(&mut doc, &styles, &config);

    NumberedLineFormatter::new(&literary)
        .format(&mut ctx, group, true, &mut pages)
        .unwrap();

    // Both prose lines share row 0.
    let page = pages.page(0);
    assert!(page.row_text(0).contains("alpha"));
    assert!(page.row_text(0).contains("beta"));
}
