//! Columnar table layout: the preferred strategy for regular tables.

use crate::context::FormatContext;
use crate::table::model::{
    remove_synthetic, synthetic_node, CellPlacement, TableModel, GUIDE_DOT, HEADING_DIVIDER,
};
use crate::{FitResult, FormatError};
use emboss_canvas::{line_count, wrap, PageSet};
use emboss_types::NodeId;

pub struct SimpleTableFormatter;

/// Everything one attempt placed, so failure can undo exactly that.
struct Attempt {
    synthetic: Vec<NodeId>,
}

impl SimpleTableFormatter {
    /// Attempts the columnar layout. On `DoesNotFit` the page set and the
    /// tree are exactly as they were before the call.
    pub fn format(
        &self,
        ctx: &mut FormatContext,
        model: &mut TableModel,
        pages: &mut PageSet,
    ) -> Result<FitResult, FormatError> {
        let gap = ctx.config.cell_gap;
        let page_width = pages.active().width();

        let Some(mut widths) = solve_widths(model, page_width, gap) else {
            return Ok(FitResult::DoesNotFit);
        };

        // Feasibility pre-check: the smallest width per column that wraps
        // its content into at most two rows. Abort before placing anything
        // when even those minima cannot share the page.
        let minima: Vec<u16> = (0..model.cols)
            .map(|c| two_row_minimum(model, c))
            .collect();
        let total_gaps = gap * (model.cols as u16 - 1);
        if minima.iter().sum::<u16>() + total_gaps > page_width {
            log::debug!(
                "table {}: two-row minima exceed the drawable width; columnar layout refused",
                model.node
            );
            return Ok(FitResult::DoesNotFit);
        }
        raise_to_minima(&mut widths, &minima);

        let x_offsets = offsets(&widths, gap);
        debug_assert!(
            widths.iter().sum::<u16>() + total_gaps <= page_width,
            "column widths plus gaps exceed the drawable width"
        );

        pages.process_spacing();
        if pages.active().cursor().x > 0 {
            pages.active_mut().new_line();
        }

        let mark = pages.mark();
        let mut attempt = Attempt {
            synthetic: Vec::new(),
        };
        match self.place(ctx, model, &widths, &x_offsets, pages, &mut attempt) {
            Ok(FitResult::Fits) => Ok(FitResult::Fits),
            Ok(FitResult::DoesNotFit) => {
                remove_synthetic(ctx, pages, &attempt.synthetic);
                model.remove_all_spans(pages);
                pages.rollback_to(mark);
                Ok(FitResult::DoesNotFit)
            }
            Err(e) => {
                remove_synthetic(ctx, pages, &attempt.synthetic);
                model.remove_all_spans(pages);
                pages.rollback_to(mark);
                Err(e)
            }
        }
    }

    fn place(
        &self,
        ctx: &mut FormatContext,
        model: &mut TableModel,
        widths: &[u16],
        x_offsets: &[u16],
        pages: &mut PageSet,
        attempt: &mut Attempt,
    ) -> Result<FitResult, FormatError> {
        // Column headings first; they must all end on the same row.
        let mut fresh_page = pages.active().is_pristine();
        loop {
            match self.place_heading_block(ctx, model, widths, x_offsets, pages, attempt)? {
                FitResult::Fits => break,
                FitResult::DoesNotFit if fresh_page => return Ok(FitResult::DoesNotFit),
                FitResult::DoesNotFit => {
                    pages.turn_page();
                    fresh_page = true;
                }
            }
        }

        // Body rows, left to right at the precomputed offsets.
        for row in 1..model.rows {
            let mut at_page_top =
                pages.active().cursor().y == pages.active().top_row();
            loop {
                match self.place_row(ctx, model, row, widths, x_offsets, pages, attempt)? {
                    FitResult::Fits => break,
                    FitResult::DoesNotFit if at_page_top => {
                        // A row that cannot fit even on a fresh page is
                        // unrecoverable for this strategy.
                        return Ok(FitResult::DoesNotFit);
                    }
                    FitResult::DoesNotFit => {
                        pages.turn_page();
                        at_page_top = true;
                    }
                }
            }
        }

        if pages.active().cursor().x > 0 {
            pages.active_mut().new_line();
        }
        Ok(FitResult::Fits)
    }

    /// Places row 0 bottom-aligned so every heading ends on the same row,
    /// followed by the synthetic divider line.
    fn place_heading_block(
        &self,
        ctx: &mut FormatContext,
        model: &mut TableModel,
        widths: &[u16],
        x_offsets: &[u16],
        pages: &mut PageSet,
        attempt: &mut Attempt,
    ) -> Result<FitResult, FormatError> {
        let y0 = pages.active().cursor().y;
        let heading_lines: Vec<(usize, Vec<String>)> = (0..model.cols)
            .filter_map(|col| {
                model
                    .cell(0, col)
                    .map(|cell| (col, wrap_cell(cell.render_text(), widths[col])))
            })
            .collect();
        let target = heading_lines
            .iter()
            .map(|(_, lines)| lines.len())
            .max()
            .unwrap_or(1);

        // +1 for the divider row.
        let end_row = y0 as usize + target;
        if end_row > pages.active().bottom_row() as usize {
            return Ok(FitResult::DoesNotFit);
        }

        let page = pages.active_index();
        for (col, lines) in &heading_lines {
            // Shorter headings are pushed down until they end with the
            // tallest neighbor.
            let start = y0 as usize + (target - lines.len());
            let node = model.cell(0, *col).expect("heading cell exists").node;
            for (i, line) in lines.iter().enumerate() {
                pages
                    .active_mut()
                    .write_at((start + i) as u16, x_offsets[*col], line, node)?;
            }
            model.set_placed(
                0,
                *col,
                CellPlacement {
                    page,
                    x: x_offsets[*col],
                    y: start as u16,
                    height: lines.len() as u16,
                },
            );
        }

        let table_width =
            x_offsets.last().copied().unwrap_or(0) + widths.last().copied().unwrap_or(0);
        let divider: String = std::iter::repeat(HEADING_DIVIDER)
            .take(table_width.min(pages.active().width()) as usize)
            .collect();
        let divider_node = synthetic_node(ctx, model.node, divider.clone());
        attempt.synthetic.push(divider_node);
        pages
            .active_mut()
            .write_at(end_row as u16, x_offsets[0], &divider, divider_node)?;

        pages
            .active_mut()
            .set_cursor(emboss_types::Pos::new(0, end_row as u16 + 1));
        Ok(FitResult::Fits)
    }

    /// Places one body row. On overflow every cell already placed in the
    /// row is removed again and the caller retries on a fresh page.
    fn place_row(
        &self,
        ctx: &mut FormatContext,
        model: &mut TableModel,
        row: usize,
        widths: &[u16],
        x_offsets: &[u16],
        pages: &mut PageSet,
        attempt: &mut Attempt,
    ) -> Result<FitResult, FormatError> {
        let y = pages.active().cursor().y;
        let bottom = pages.active().bottom_row();
        let page = pages.active_index();
        let mut placed_cols: Vec<usize> = Vec::new();
        let mut placed_synthetic: Vec<NodeId> = Vec::new();
        let mut row_height: u16 = 1;

        let cols: Vec<usize> = model.cells_in_row(row).map(|c| c.col).collect();
        for col in cols {
            let cell = model.cell(row, col).expect("cell exists");
            let node = cell.node;
            let lines = wrap_cell(cell.render_text(), widths[col]);

            if y as usize + lines.len() - 1 > bottom as usize {
                // Roll back the whole row and report the overflow.
                for &c in &placed_cols {
                    let placed_node = model.cell(row, c).expect("cell exists").node;
                    pages.remove_brl(placed_node);
                    model.set_unplaced(row, c);
                }
                remove_synthetic(ctx, pages, &placed_synthetic);
                attempt
                    .synthetic
                    .retain(|n| !placed_synthetic.contains(n));
                return Ok(FitResult::DoesNotFit);
            }

            for (i, line) in lines.iter().enumerate() {
                pages
                    .active_mut()
                    .write_at(y + i as u16, x_offsets[col], line, node)?;
            }

            // Guide dots span the gap to the next column on the first line.
            if ctx.config.guide_dots && col + 1 < model.cols {
                let text_end = x_offsets[col] + lines[0].chars().count() as u16;
                let next_col = x_offsets[col + 1];
                if next_col > text_end + 2 {
                    let dots: String = std::iter::repeat(GUIDE_DOT)
                        .take((next_col - text_end - 2) as usize)
                        .collect();
                    let dots_node = synthetic_node(ctx, node, dots.clone());
                    pages
                        .active_mut()
                        .write_at(y, text_end + 1, &dots, dots_node)?;
                    placed_synthetic.push(dots_node);
                    attempt.synthetic.push(dots_node);
                }
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
            placed_cols.push(col);
            row_height = row_height.max(lines.len() as u16);
        }

        pages
            .active_mut()
            .set_cursor(emboss_types::Pos::new(0, y + row_height));
        Ok(FitResult::Fits)
    }
}

fn wrap_cell(text: &str, width: u16) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    wrap(&chars, width, width)
        .into_iter()
        .map(|l| chars[l.start..l.end].iter().collect())
        .collect()
}

/// Starts from an equal split, shrinks columns whose content needs less,
/// and hands the leftover to columns that still need more, never past
/// their need.
pub fn solve_widths(model: &TableModel, page_width: u16, gap: u16) -> Option<Vec<u16>> {
    let cols = model.cols as u16;
    let total_gaps = gap * (cols - 1);
    let usable = page_width.checked_sub(total_gaps)?;
    if usable < cols {
        return None;
    }

    let base = usable / cols;
    let rem = (usable % cols) as usize;
    let mut widths: Vec<u16> = (0..model.cols)
        .map(|i| base + u16::from(i < rem))
        .collect();
    let need: Vec<u16> = (0..model.cols).map(|c| model.col_need(c)).collect();

    let mut pool: u16 = 0;
    for (w, n) in widths.iter_mut().zip(&need) {
        if *n < *w {
            pool += *w - *n;
            *w = *n;
        }
    }

    while pool > 0 {
        let needy: Vec<usize> = (0..model.cols)
            .filter(|&i| widths[i] < need[i])
            .collect();
        if needy.is_empty() {
            break;
        }
        let share = (pool / needy.len() as u16).max(1);
        for i in needy {
            let give = share.min(need[i] - widths[i]).min(pool);
            widths[i] += give;
            pool -= give;
            if pool == 0 {
                break;
            }
        }
    }

    Some(widths)
}

/// Smallest width at which every cell of the column wraps into at most
/// two rows, found by binary search.
pub fn two_row_minimum(model: &TableModel, col: usize) -> u16 {
    let need = model.col_need(col).max(1);
    let fits_two = |w: u16| {
        model
            .cells_in_col(col)
            .all(|c| line_count(c.render_text(), w) <= 2)
    };

    let (mut lo, mut hi) = (1, need);
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if fits_two(mid) {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    lo
}

/// Lifts deficient columns up to their two-row minimum, taking the cells
/// from columns sitting above theirs. Callable only when the minima sum
/// fits the page.
fn raise_to_minima(widths: &mut [u16], minima: &[u16]) {
    for i in 0..widths.len() {
        while widths[i] < minima[i] {
            let Some(donor) = (0..widths.len()).find(|&j| widths[j] > minima[j]) else {
                return;
            };
            widths[donor] -= 1;
            widths[i] += 1;
        }
    }
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
