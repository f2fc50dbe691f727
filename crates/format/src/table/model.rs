//! Shared table machinery: cell collection, noise stripping, stale-layout
//! deletion, and the bookkeeping every strategy needs for all-or-nothing
//! rollback.

use crate::context::FormatContext;
use emboss_canvas::PageSet;
use emboss_doc::{BrailleSegment, ElementKind, NodeKind};
use emboss_types::NodeId;

/// Filler glyph between a cell's text and the next column boundary.
pub const GUIDE_DOT: char = '⠄';
/// Rendered in place of an empty cell.
pub const OMISSION: &str = "⠤⠤";
/// Glyph of the synthetic divider row under column headings.
pub const HEADING_DIVIDER: char = '⠒';
/// Divider after the first cell of a linearized row.
pub const LINEAR_COLON: char = '⠒';
/// Divider between the remaining cells of a linearized row.
pub const LINEAR_SEMICOLON: char = '⠰';

/// Where a cell ended up, once placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPlacement {
    pub page: usize,
    pub x: u16,
    pub y: u16,
    pub height: u16,
}

#[derive(Debug, Clone)]
pub struct TableCell {
    /// The table-cell element whose spans placement is attributed to.
    pub node: NodeId,
    pub row: usize,
    pub col: usize,
    pub text: String,
    /// Resolved once placed; reset to `None` on rollback.
    pub placed: Option<CellPlacement>,
}

impl TableCell {
    pub fn width_cells(&self) -> usize {
        self.text.chars().count()
    }

    /// Text a strategy should render: empty cells show the omission sign.
    pub fn render_text(&self) -> &str {
        if self.text.is_empty() {
            OMISSION
        } else {
            &self.text
        }
    }
}

/// A snapshot of one table's content, collected after stale layout has
/// been deleted and inter-cell noise stripped.
#[derive(Debug, Clone)]
pub struct TableModel {
    pub node: NodeId,
    pub caption: Option<NodeId>,
    pub cells: Vec<TableCell>,
    /// Row elements in document order; flowing strategies attribute their
    /// spans to these.
    pub row_nodes: Vec<NodeId>,
    pub rows: usize,
    pub cols: usize,
}

impl TableModel {
    /// Builds the model for `table`. Deletes any stale prior layout and
    /// detaches blank braille sitting between rows and cells. Returns
    /// `None` (with a warning) when the element holds no rows.
    pub fn collect(ctx: &mut FormatContext, table: NodeId) -> Option<TableModel> {
        ctx.doc.clear_synthetic(table);
        strip_noise(ctx, table);

        let mut caption = None;
        let mut cells = Vec::new();
        let mut row_nodes = Vec::new();
        let mut rows = 0;
        let mut cols = 0;

        let children: Vec<NodeId> = ctx.doc.children(table).to_vec();
        for child in children {
            match ctx.doc.element_kind(child) {
                Some(ElementKind::TableCaption) => caption = Some(child),
                Some(ElementKind::TableRow) => {
                    let cell_nodes: Vec<NodeId> = ctx
                        .doc
                        .children(child)
                        .iter()
                        .copied()
                        .filter(|&c| {
                            matches!(ctx.doc.element_kind(c), Some(ElementKind::TableCell))
                        })
                        .collect();
                    for (col, cell) in cell_nodes.iter().enumerate() {
                        cells.push(TableCell {
                            node: *cell,
                            row: rows,
                            col,
                            text: ctx.doc.collect_braille(*cell).trim().to_string(),
                            placed: None,
                        });
                    }
                    cols = cols.max(cell_nodes.len());
                    row_nodes.push(child);
                    rows += 1;
                }
                _ => {}
            }
        }

        if rows == 0 || cols == 0 {
            log::warn!(
                "table {table} has no rows or cells; it contributes nothing to the page"
            );
            return None;
        }

        Some(TableModel {
            node: table,
            caption,
            cells,
            row_nodes,
            rows,
            cols,
        })
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&TableCell> {
        self.cells.iter().find(|c| c.row == row && c.col == col)
    }

    pub fn cells_in_row(&self, row: usize) -> impl Iterator<Item = &TableCell> {
        self.cells.iter().filter(move |c| c.row == row)
    }

    pub fn cells_in_col(&self, col: usize) -> impl Iterator<Item = &TableCell> {
        self.cells.iter().filter(move |c| c.col == col)
    }

    /// Widest cell text in a column, in cells.
    pub fn col_need(&self, col: usize) -> u16 {
        self.cells_in_col(col)
            .map(|c| c.render_text().chars().count())
            .max()
            .unwrap_or(0) as u16
    }

    /// A table is ragged when some row has fewer cells than the widest.
    pub fn is_ragged(&self) -> bool {
        (0..self.rows).any(|r| self.cells_in_row(r).count() != self.cols)
    }

    pub fn set_placed(&mut self, row: usize, col: usize, placement: CellPlacement) {
        if let Some(cell) = self
            .cells
            .iter_mut()
            .find(|c| c.row == row && c.col == col)
        {
            cell.placed = Some(placement);
        }
    }

    pub fn set_unplaced(&mut self, row: usize, col: usize) {
        if let Some(cell) = self
            .cells
            .iter_mut()
            .find(|c| c.row == row && c.col == col)
        {
            cell.placed = None;
        }
    }

    pub fn reset_placements(&mut self) {
        for cell in &mut self.cells {
            cell.placed = None;
        }
    }

    /// Removes every span any cell or row placed and resets the
    /// placements. Callers pair this with a page-set rollback mark.
    pub fn remove_all_spans(&mut self, pages: &mut PageSet) {
        for cell in &mut self.cells {
            cell.placed = None;
            pages.remove_brl(cell.node);
        }
        for &row in &self.row_nodes {
            pages.remove_brl(row);
        }
    }
}

/// Detaches blank braille segments sitting directly under the table or a
/// row. The translation stage leaves whitespace runs between cells that
/// would otherwise be treated as content.
fn strip_noise(ctx: &mut FormatContext, table: NodeId) {
    let mut noise = Vec::new();
    let mut candidates: Vec<NodeId> = ctx.doc.children(table).to_vec();
    for child in ctx.doc.children(table) {
        if matches!(ctx.doc.element_kind(*child), Some(ElementKind::TableRow)) {
            candidates.extend(ctx.doc.children(*child));
        }
    }
    for node in candidates {
        if let NodeKind::Braille(segment) = ctx.doc.kind(node) {
            if segment.is_blank() {
                noise.push(node);
            }
        }
    }
    for node in noise {
        ctx.doc.detach(node);
    }
}

/// Creates a synthetic braille node under `parent` for layout-injected
/// content (guide dots, dividers) and returns it.
pub fn synthetic_node(
    ctx: &mut FormatContext,
    parent: NodeId,
    text: impl Into<String>,
) -> NodeId {
    let node = ctx.doc.new_braille(BrailleSegment::new(text));
    ctx.doc.marks_mut(node).synthetic = true;
    ctx.doc.append_child(parent, node);
    node
}

/// Undoes a list of synthetic nodes: spans removed, nodes detached.
pub fn remove_synthetic(ctx: &mut FormatContext, pages: &mut PageSet, nodes: &[NodeId]) {
    for &node in nodes {
        pages.remove_brl(node);
        ctx.doc.detach(node);
    }
}
