use crate::node::ElementKind;
use crate::tree::Document;

#[test]
fn test_build_and_traverse() {
    let mut doc = Document::new();
    let table = doc.add_element(doc.root(), ElementKind::Table);
    let row = doc.add_element(table, ElementKind::TableRow);
    let cell = doc.add_element(row, ElementKind::TableCell);
    let brl = doc.add_braille(cell, "⠁⠃⠉");

    assert_eq!(doc.parent(brl), Some(cell));
    assert_eq!(doc.descendants(table), vec![row, cell, brl]);
    assert_eq!(doc.collect_braille(table), "⠁⠃⠉");
}

#[test]
fn test_insert_before_and_after() {
    let mut doc = Document::new();
    let a = doc.add_element(doc.root(), ElementKind::Block);
    let b = doc.add_element(doc.root(), ElementKind::Block);

    let sep = doc.new_element(ElementKind::Block);
    doc.insert_before(b, sep);
    assert_eq!(doc.children(doc.root()), &[a, sep, b]);

    let tail = doc.new_element(ElementKind::Block);
    doc.insert_after(b, tail);
    assert_eq!(doc.children(doc.root()), &[a, sep, b, tail]);
}

#[test]
fn test_clear_synthetic_removes_injected_content() {
    let mut doc = Document::new();
    let table = doc.add_element(doc.root(), ElementKind::Table);
    let row = doc.add_element(table, ElementKind::TableRow);
    let divider = doc.add_braille(table, "⠒⠒⠒⠒");
    doc.marks_mut(divider).synthetic = true;
    doc.marks_mut(row).line_label = Some("3".to_string());

    doc.clear_synthetic(table);

    assert_eq!(doc.children(table), &[row]);
    assert_eq!(doc.marks(row).line_label, None);
}

#[test]
fn test_path_from_root() {
    let mut doc = Document::new();
    let group = doc.add_element(doc.root(), ElementKind::LineGroup { prose: false });
    let line = doc.add_element(group, ElementKind::Line { number: None });

    assert_eq!(doc.path_from_root(line), vec![doc.root(), group, line]);
}

#[test]
fn test_detach_keeps_arena_ids_valid() {
    let mut doc = Document::new();
    let a = doc.add_element(doc.root(), ElementKind::Block);
    let brl = doc.add_braille(a, "⠁");

    doc.detach(a);
    assert!(doc.children(doc.root()).is_empty());
    // The subtree is unreachable but still addressable.
    assert_eq!(doc.braille(brl).unwrap().text, "⠁");
}
