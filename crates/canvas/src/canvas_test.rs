use crate::set::PageSet;
use crate::wrap;
use emboss_doc::Document;
use emboss_style::Align;
use emboss_types::{NodeId, PageGeometry, Pos};

fn chars(text: &str) -> Vec<char> {
    text.chars().collect()
}

fn small_pages() -> PageSet {
    PageSet::new(PageGeometry::new(10, 4))
}

#[test]
fn test_wrap_breaks_at_blanks() {
    let text = chars("ab cd ef gh");
    let lines = wrap::wrap(&text, 5, 5);
    let rendered: Vec<String> = lines
        .iter()
        .map(|l| text[l.start..l.end].iter().collect())
        .collect();
    assert_eq!(rendered, vec!["ab cd", "ef gh"]);
}

#[test]
fn test_wrap_hard_breaks_long_words() {
    let text = chars("abcdefgh");
    let lines = wrap::wrap(&text, 3, 3);
    let rendered: Vec<String> = lines
        .iter()
        .map(|l| text[l.start..l.end].iter().collect())
        .collect();
    assert_eq!(rendered, vec!["abc", "def", "gh"]);
}

#[test]
fn test_wrap_narrow_first_line() {
    let text = chars("ab cd");
    let lines = wrap::wrap(&text, 0, 5);
    // First line is an empty marker; content starts on the second.
    assert_eq!(lines[0].start, lines[0].end);
    let second: String = text[lines[1].start..lines[1].end].iter().collect();
    assert_eq!(second, "ab cd");
}

#[test]
fn test_add_text_places_and_turns_pages() {
    let mut doc = Document::new();
    let node = doc.add_braille(doc.root(), "aa bb cc dd ee ff");
    let mut pages = small_pages();

    // 10 cells per line, 4 lines: the 17-cell text needs 2 rows.
    let placement = pages.add_brl(&doc, node).unwrap();
    assert_eq!(placement.pages_turned, 0);
    assert_eq!(pages.active().row_text(0), "aa bb cc");
    assert_eq!(pages.active().row_text(1), "dd ee ff");
    assert_eq!(placement.end, Pos::new(8, 1));
}

#[test]
fn test_add_text_crosses_page_boundary() {
    let mut pages = small_pages();
    let node = NodeId(1);
    // Five 8-cell rows on a 4-row page: the last row lands on page 2.
    let placement = pages
        .add_text("aaaaaaaa bbbbbbbb cccccccc dddddddd eeeeeeee", node)
        .unwrap();
    assert_eq!(placement.pages_turned, 1);
    assert_eq!(pages.page_count(), 2);
    assert!(placement.crossed_page());
    assert_eq!(pages.page(1).row_text(0), "eeeeeeee");
}

#[test]
fn test_centered_alignment() {
    let mut pages = small_pages();
    pages.active_mut().set_align(Align::Centered);
    pages.add_text("abcd", NodeId(1)).unwrap();
    // 10-cell line, 4-cell text: centered at x=3.
    assert_eq!(pages.active().spans()[0].x, 3);
}

#[test]
fn test_remove_brl_undoes_every_fragment() {
    let mut pages = small_pages();
    pages.add_text("aa bb cc dd", NodeId(1)).unwrap();
    assert!(!pages.active().is_pristine());

    let removed = pages.remove_brl(NodeId(1));
    assert_eq!(removed, 2);
    assert!(pages.active().spans().is_empty());
}

#[test]
fn test_pending_spacing_flush() {
    let mut pages = small_pages();
    pages.add_text("aa", NodeId(1)).unwrap();
    pages.active_mut().queue_lines(1);
    let turned = pages.process_spacing();
    assert_eq!(turned, 0);
    // One blank line between row 0 and the cursor row.
    assert_eq!(pages.active().cursor(), Pos::new(0, 2));
}

#[test]
fn test_blank_lines_dropped_on_fresh_page() {
    let mut pages = small_pages();
    pages.active_mut().queue_lines(2);
    pages.process_spacing();
    // A pristine page swallows leading blank lines.
    assert_eq!(pages.active().cursor().y, 0);
}

#[test]
fn test_spacing_past_bottom_turns_page() {
    let mut pages = small_pages();
    pages.add_text("aa", NodeId(1)).unwrap();
    pages.active_mut().set_cursor(Pos::new(0, 3));
    pages.active_mut().queue_lines(3);
    let turned = pages.process_spacing();
    assert_eq!(turned, 1);
    assert_eq!(pages.page_count(), 2);
    assert_eq!(pages.active().cursor().y, 0);
}

#[test]
fn test_rollback_drops_pages_and_spans() {
    let mut pages = small_pages();
    pages.add_text("kept", NodeId(1)).unwrap();
    let mark = pages.mark();

    pages.add_text(" more", NodeId(2)).unwrap();
    pages.turn_page();
    pages.add_text("overflow", NodeId(3)).unwrap();
    assert_eq!(pages.page_count(), 2);

    pages.rollback_to(mark);
    assert_eq!(pages.page_count(), 1);
    assert_eq!(pages.active().spans().len(), 1);
    assert_eq!(pages.active().row_text(0), "kept");
}

#[test]
fn test_write_at_detects_occupied_cells() {
    let mut pages = small_pages();
    pages
        .active_mut()
        .write_at(0, 2, "abc", NodeId(1))
        .unwrap();
    let err = pages.active_mut().write_at(0, 4, "xy", NodeId(2));
    assert!(err.is_err());
    // Disjoint cells on the same row are fine.
    pages.active_mut().write_at(0, 6, "xy", NodeId(2)).unwrap();
}

#[test]
fn test_write_at_bounds() {
    let mut pages = small_pages();
    assert!(pages
        .active_mut()
        .write_at(0, 8, "abc", NodeId(1))
        .is_err());
    assert!(pages.active_mut().write_at(9, 0, "a", NodeId(1)).is_err());
}

#[test]
fn test_reserved_rows_are_skipped() {
    let mut pages = small_pages();
    pages.active_mut().reserve_lines(2).unwrap();
    pages.add_text("ab", NodeId(1)).unwrap();
    // Rows 0-1 are reserved for a graphic; text lands on row 2.
    assert_eq!(pages.active().spans()[0].row, 2);
}

#[test]
fn test_indents_bound_the_band() {
    let mut pages = small_pages();
    pages.active_mut().set_indents(2, 2);
    pages.add_text("abcdef gh", NodeId(1)).unwrap();
    // 6-cell band: "abcdef" fills row 0 from x=2, "gh" wraps.
    assert_eq!(pages.active().spans()[0].x, 2);
    assert_eq!(pages.active().spans()[0].text, "abcdef");
    assert_eq!(pages.active().spans()[1].row, 1);
}

#[test]
fn test_running_head_reserves_row_zero() {
    let mut pages = PageSet::with_options(PageGeometry::new(10, 4), 1, true);
    pages.add_text("ab", NodeId(1)).unwrap();
    assert_eq!(pages.active().spans()[0].row, 1);
}

#[test]
fn test_braille_page_advances_on_turn() {
    let mut pages = small_pages();
    assert_eq!(pages.active().braille_page(), 1);
    pages.turn_page();
    assert_eq!(pages.active().braille_page(), 2);
}
