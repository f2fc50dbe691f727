use crate::config::FormatConfig;
use crate::context::FormatContext;
use crate::literary::LiteraryFormatter;
use emboss_canvas::PageSet;
use emboss_doc::{Document, ElementKind};
use emboss_style::{Style, StyleMap};
use emboss_types::{NodeId, PageGeometry};

pub fn geometry(cells: u16, lines: u16) -> PageGeometry {
    PageGeometry::new(cells, lines)
}

/// Builds a table under `parent` from literal cell texts, one slice per
/// row. Row 0 is the heading row.
pub fn build_table(doc: &mut Document, parent: NodeId, rows: &[&[&str]]) -> NodeId {
    let table = doc.add_element(parent, ElementKind::Table);
    for row_texts in rows {
        let row = doc.add_element(table, ElementKind::TableRow);
        for text in *row_texts {
            let cell = doc.add_element(row, ElementKind::TableCell);
            if !text.is_empty() {
                doc.add_braille(cell, *text);
            }
        }
    }
    table
}

/// Builds a numbered-line group from (number, text) pairs.
pub fn build_line_group(
    doc: &mut Document,
    parent: NodeId,
    prose: bool,
    lines: &[(Option<&str>, &str)],
) -> NodeId {
    let group = doc.add_element(parent, ElementKind::LineGroup { prose });
    for (number, text) in lines {
        let line = doc.add_element(
            group,
            ElementKind::Line {
                number: number.map(str::to_string),
            },
        );
        doc.add_braille(line, *text);
    }
    group
}

/// Builds a title page whose sections each hold one braille line.
pub fn build_title_page(doc: &mut Document, parent: NodeId, sections: &[&str]) -> NodeId {
    let tpage = doc.add_element(parent, ElementKind::TitlePage);
    for text in sections {
        let section = doc.add_element(tpage, ElementKind::TitleSection);
        doc.add_braille(section, *text);
    }
    tpage
}

/// Runs the literary driver over the whole document on a fresh page set.
pub fn format_doc(
    doc: &mut Document,
    styles: &StyleMap,
    config: &FormatConfig,
    geometry: PageGeometry,
) -> PageSet {
    let mut pages = PageSet::with_options(geometry, 1, config.running_head);
    let formatter = LiteraryFormatter::new();
    let root = doc.root();
    let mut ctx = FormatContext::new(doc, styles, config);
    formatter
        .format(&mut ctx, root, &mut pages)
        .expect("formatting succeeds");
    pages
}

pub fn default_styles() -> StyleMap {
    StyleMap::with_default(Style::default())
}

/// Every (page, row, x, text) span in the set, in a comparable form.
pub fn all_spans(pages: &PageSet) -> Vec<(usize, u16, u16, String)> {
    pages
        .iter()
        .enumerate()
        .flat_map(|(i, page)| {
            page.spans()
                .iter()
                .map(move |s| (i, s.row, s.x, s.text.clone()))
        })
        .collect()
}
