//! Stairstep table layout: the layout of last resort. Every row's cells
//! stack vertically with a two-cell increasing indent per column, which
//! degrades gracefully for arbitrary shapes.

use crate::context::FormatContext;
use crate::table::model::{CellPlacement, TableModel};
use crate::FormatError;
use emboss_canvas::{wrap, PageSet};
use emboss_types::Pos;

const STEP: u16 = 2;

pub struct StairstepTableFormatter;

impl StairstepTableFormatter {
    pub fn format(
        &self,
        _ctx: &mut FormatContext,
        model: &mut TableModel,
        pages: &mut PageSet,
    ) -> Result<(), FormatError> {
        pages.process_spacing();
        if pages.active().cursor().x > 0 {
            pages.active_mut().new_line();
        }

        let page_width = pages.active().width();
        // Deep tables cap the step so at least a few cells stay writable.
        let max_indent = page_width.saturating_sub(4);

        for row in 0..model.rows {
            let cells: Vec<(usize, String)> = model
                .cells_in_row(row)
                .map(|c| (c.col, c.render_text().to_string()))
                .collect();
            for (col, text) in cells {
                let x = (STEP * col as u16).min(max_indent);
                let width = page_width - x;
                let chars: Vec<char> = text.chars().collect();
                let lines = wrap(&chars, width, width);

                // Keep whole cells together where possible; cells taller
                // than a page simply continue on the next one.
                let height = lines.len() as u16;
                if height > pages.active().rows_remaining()
                    && height <= pages.active().band_height()
                {
                    pages.turn_page();
                }

                let node = model.cell(row, col).expect("cell exists").node;
                let mut placement: Option<CellPlacement> = None;
                let mut y = pages.active().cursor().y;
                for line in &lines {
                    if y > pages.active().bottom_row() {
                        pages.turn_page();
                        y = pages.active().cursor().y;
                    }
                    let fragment: String = chars[line.start..line.end].iter().collect();
                    pages.active_mut().write_at(y, x, &fragment, node)?;
                    if placement.is_none() {
                        placement = Some(CellPlacement {
                            page: pages.active_index(),
                            x,
                            y,
                            height,
                        });
                    }
                    y += 1;
                }
                if let Some(p) = placement {
                    model.set_placed(row, col, p);
                }
                pages.active_mut().set_cursor(Pos::new(0, y));
            }
        }
        Ok(())
    }
}
