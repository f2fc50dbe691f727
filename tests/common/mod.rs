use emboss::doc::ElementKind;
use emboss::{Document, FormatConfig, FormatError, PageGeometry, PageSet, StyleMap};

pub type TestResult = Result<(), FormatError>;

pub fn paginate_default(doc: &mut Document, geometry: PageGeometry) -> Result<PageSet, FormatError> {
    let styles = StyleMap::new();
    let config = FormatConfig::default();
    emboss::paginate(doc, &styles, geometry, &config)
}

pub fn add_paragraph(doc: &mut Document, text: &str) {
    let block = doc.add_element(doc.root(), ElementKind::Block);
    doc.add_braille(block, text);
}

pub fn add_simple_table(doc: &mut Document, rows: &[&[&str]]) -> emboss::types::NodeId {
    let table = doc.add_element(doc.root(), ElementKind::Table);
    for row_texts in rows {
        let row = doc.add_element(table, ElementKind::TableRow);
        for text in *row_texts {
            let cell = doc.add_element(row, ElementKind::TableCell);
            doc.add_braille(cell, *text);
        }
    }
    table
}

/// Asserts every span on every page stays inside the cell grid.
pub fn assert_spans_in_bounds(pages: &PageSet) {
    let width = pages.active().geometry().cells_per_line;
    let height = pages.active().geometry().lines_per_page;
    for page in pages.iter() {
        for span in page.spans() {
            assert!(span.end_x() <= width, "span {span:?} exceeds page width");
            assert!(span.row < height, "span {span:?} exceeds page height");
        }
    }
}
