//! Facing table layout: two related tables across a left/right page
//! spread, heading blocks and row cursors kept in lockstep.

use crate::context::FormatContext;
use crate::literary::LiteraryFormatter;
use crate::table::model::{CellPlacement, TableModel};
use crate::table::simple::{solve_widths, two_row_minimum};
use crate::{FitResult, FormatError};
use emboss_canvas::{wrap, PageSet};
use emboss_doc::TableFormat;
use emboss_types::{NodeId, Pos};

pub struct FacingTableFormatter<'f> {
    literary: &'f LiteraryFormatter,
}

struct Spread {
    left: usize,
    right: usize,
}

impl<'f> FacingTableFormatter<'f> {
    pub fn new(literary: &'f LiteraryFormatter) -> Self {
        Self { literary }
    }

    /// Lays the pair across a spread; falls back to formatting the two
    /// tables independently when the spread cannot hold matched rows.
    pub fn format_pair(
        &self,
        ctx: &mut FormatContext,
        pair: (NodeId, NodeId),
        pages: &mut PageSet,
    ) -> Result<(), FormatError> {
        let (left_node, right_node) = pair;
        let left_model = TableModel::collect(ctx, left_node);
        let right_model = TableModel::collect(ctx, right_node);
        let (Some(mut left), Some(mut right)) = (left_model, right_model) else {
            // A degenerate half renders both sides as ordinary content.
            self.literary.format(ctx, left_node, pages)?;
            self.literary.format(ctx, right_node, pages)?;
            return Ok(());
        };

        match self.try_spread(ctx, &mut left, &mut right, pages)? {
            FitResult::Fits => {
                ctx.doc.marks_mut(left_node).table_format = Some(TableFormat::Facing);
                ctx.doc.marks_mut(right_node).table_format = Some(TableFormat::Facing);
                Ok(())
            }
            FitResult::DoesNotFit => {
                log::debug!(
                    "facing spread refused for {left_node}/{right_node}; formatting separately"
                );
                self.literary.format(ctx, left_node, pages)?;
                self.literary.format(ctx, right_node, pages)?;
                Ok(())
            }
        }
    }

    fn try_spread(
        &self,
        ctx: &mut FormatContext,
        left: &mut TableModel,
        right: &mut TableModel,
        pages: &mut PageSet,
    ) -> Result<FitResult, FormatError> {
        let gap = ctx.config.cell_gap;
        let page_width = pages.active().width();

        let widths_l = match feasible_widths(left, page_width, gap) {
            Some(w) => w,
            None => return Ok(FitResult::DoesNotFit),
        };
        let widths_r = match feasible_widths(right, page_width, gap) {
            Some(w) => w,
            None => return Ok(FitResult::DoesNotFit),
        };
        let offsets_l = offsets(&widths_l, gap);
        let offsets_r = offsets(&widths_r, gap);

        pages.process_spacing();
        let mark = pages.mark();
        let mut spread = self.open_spread(pages);

        // Heading blocks: push whichever ends earlier down one row until
        // both end on the same row.
        let y0 = pages.page(spread.left).top_row();
        let lines_l = heading_lines(left, &widths_l);
        let lines_r = heading_lines(right, &widths_r);
        let mut end_l = y0 + tallest(&lines_l) - 1;
        let mut end_r = y0 + tallest(&lines_r) - 1;
        while end_l != end_r {
            if end_l < end_r {
                end_l += 1;
            } else {
                end_r += 1;
            }
        }
        let heading_end = end_l;
        if heading_end >= pages.page(spread.left).bottom_row() {
            self.abandon(left, right, pages, mark);
            return Ok(FitResult::DoesNotFit);
        }
        self.place_headings(left, &lines_l, &offsets_l, spread.left, heading_end, pages)?;
        self.place_headings(right, &lines_r, &offsets_r, spread.right, heading_end, pages)?;

        // Matched rows; both cursors advance to the max of the two.
        let mut y = heading_end + 1;
        let rows = left.rows.max(right.rows);
        for row in 1..rows {
            let mut at_spread_top = false;
            loop {
                let h_l = self.row_height(left, row, &widths_l);
                let h_r = self.row_height(right, row, &widths_r);
                let height = h_l.max(h_r).max(1);
                let bottom = pages.page(spread.left).bottom_row();

                if y + height - 1 > bottom {
                    if at_spread_top {
                        self.abandon(left, right, pages, mark);
                        return Ok(FitResult::DoesNotFit);
                    }
                    // Fresh spread, rows continue at its top.
                    spread = self.open_spread(pages);
                    y = pages.page(spread.left).top_row();
                    at_spread_top = true;
                    continue;
                }

                self.place_row(left, row, &widths_l, &offsets_l, spread.left, y, pages)?;
                self.place_row(right, row, &widths_r, &offsets_r, spread.right, y, pages)?;
                y += height;
                break;
            }
        }

        pages.active_mut().set_cursor(Pos::new(0, y));
        Ok(FitResult::Fits)
    }

    /// Opens a fresh left/right pair; the right page stays active.
    fn open_spread(&self, pages: &mut PageSet) -> Spread {
        if !pages.active().is_pristine() {
            pages.turn_page();
        }
        let left = pages.active_index();
        pages.turn_page();
        Spread {
            left,
            right: pages.active_index(),
        }
    }

    fn place_headings(
        &self,
        model: &mut TableModel,
        lines: &[(usize, Vec<String>)],
        x_offsets: &[u16],
        page: usize,
        end_row: u16,
        pages: &mut PageSet,
    ) -> Result<(), FormatError> {
        for (col, cell_lines) in lines {
            let start = end_row + 1 - cell_lines.len() as u16;
            let node = model.cell(0, *col).expect("heading cell exists").node;
            for (i, line) in cell_lines.iter().enumerate() {
                pages
                    .page_mut(page)
                    .write_at(start + i as u16, x_offsets[*col], line, node)?;
            }
            model.set_placed(
                0,
                *col,
                CellPlacement {
                    page,
                    x: x_offsets[*col],
                    y: start,
                    height: cell_lines.len() as u16,
                },
            );
        }
        Ok(())
    }

    fn row_height(&self, model: &TableModel, row: usize, widths: &[u16]) -> u16 {
        model
            .cells_in_row(row)
            .map(|c| wrap_len(c.render_text(), widths[c.col]))
            .max()
            .unwrap_or(0)
    }

    fn place_row(
        &self,
        model: &mut TableModel,
        row: usize,
        widths: &[u16],
        x_offsets: &[u16],
        page: usize,
        y: u16,
        pages: &mut PageSet,
    ) -> Result<(), FormatError> {
        if row >= model.rows {
            return Ok(());
        }
        let cols: Vec<usize> = model.cells_in_row(row).map(|c| c.col).collect();
        for col in cols {
            let cell = model.cell(row, col).expect("cell exists");
            let node = cell.node;
            let lines = wrap_cell(cell.render_text(), widths[col]);
            for (i, line) in lines.iter().enumerate() {
                pages
                    .page_mut(page)
                    .write_at(y + i as u16, x_offsets[col], line, node)?;
            }
            model.set_placed(
                row,
                col,
                CellPlacement {
                    page,
                    x: x_offsets[col],
                    y,
                    height: lines.len() as u16,
                },
            );
        }
        Ok(())
    }

    fn abandon(
        &self,
        left: &mut TableModel,
        right: &mut TableModel,
        pages: &mut PageSet,
        mark: emboss_canvas::PageMark,
    ) {
        left.remove_all_spans(pages);
        right.remove_all_spans(pages);
        pages.rollback_to(mark);
    }
}

fn feasible_widths(model: &TableModel, page_width: u16, gap: u16) -> Option<Vec<u16>> {
    let widths = solve_widths(model, page_width, gap)?;
    let total_gaps = gap * (model.cols as u16 - 1);
    let minima: u16 = (0..model.cols).map(|c| two_row_minimum(model, c)).sum();
    (minima + total_gaps <= page_width).then_some(widths)
}

fn offsets(widths: &[u16], gap: u16) -> Vec<u16> {
    let mut out = Vec::with_capacity(widths.len());
    let mut x = 0;
    for &w in widths {
        out.push(x);
        x += w + gap;
    }
    out
}

fn heading_lines(model: &TableModel, widths: &[u16]) -> Vec<(usize, Vec<String>)> {
    (0..model.cols)
        .filter_map(|col| {
            model
                .cell(0, col)
                .map(|cell| (col, wrap_cell(cell.render_text(), widths[col])))
        })
        .collect()
}

fn tallest(lines: &[(usize, Vec<String>)]) -> u16 {
    lines.iter().map(|(_, l)| l.len() as u16).max().unwrap_or(1)
}

fn wrap_cell(text: &str, width: u16) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    wrap(&chars, width, width)
        .into_iter()
        .map(|l| chars[l.start..l.end].iter().collect())
        .collect()
}

fn wrap_len(text: &str, width: u16) -> u16 {
    emboss_canvas::line_count(text, width) as u16
}
