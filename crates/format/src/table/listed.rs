//! Listed table layout: the fallback when columns will not share a page.
//! Each body row becomes a stacked group of "heading: value" lines.

use crate::context::FormatContext;
use crate::table::model::{CellPlacement, TableModel, LINEAR_COLON};
use crate::{FitResult, FormatError};
use emboss_canvas::{wrap, PageSet};
use emboss_types::Pos;

const VALUE_RUNOVER: u16 = 2;

pub struct ListedTableFormatter;

impl ListedTableFormatter {
    pub fn format(
        &self,
        _ctx: &mut FormatContext,
        model: &mut TableModel,
        pages: &mut PageSet,
    ) -> Result<FitResult, FormatError> {
        if model.rows < 2 {
            // Nothing to list against: there is only the heading row.
            return Ok(FitResult::DoesNotFit);
        }

        // Row-0 headings become the inline prefix of every value below.
        let headings: Vec<String> = (0..model.cols)
            .map(|col| {
                model
                    .cell(0, col)
                    .map(|c| c.text.clone())
                    .unwrap_or_default()
            })
            .collect();

        pages.process_spacing();
        if pages.active().cursor().x > 0 {
            pages.active_mut().new_line();
        }
        let mark = pages.mark();

        for row in 1..model.rows {
            let mut at_page_top = pages.active().cursor().y == pages.active().top_row();
            loop {
                match self.place_group(model, row, &headings, pages)? {
                    FitResult::Fits => break,
                    FitResult::DoesNotFit if at_page_top => {
                        model.remove_all_spans(pages);
                        pages.rollback_to(mark);
                        return Ok(FitResult::DoesNotFit);
                    }
                    FitResult::DoesNotFit => {
                        pages.turn_page();
                        at_page_top = true;
                    }
                }
            }
            // A blank line between row groups.
            if row + 1 < model.rows {
                let next_y = pages.active().cursor().y + 1;
                pages.active_mut().set_cursor(Pos::new(0, next_y));
            }
        }
        Ok(FitResult::Fits)
    }

    /// Places one row as a stacked label/value group; all-or-nothing.
    fn place_group(
        &self,
        model: &mut TableModel,
        row: usize,
        headings: &[String],
        pages: &mut PageSet,
    ) -> Result<FitResult, FormatError> {
        let width = pages.active().width();
        let bottom = pages.active().bottom_row();
        let y0 = pages.active().cursor().y;
        let page = pages.active_index();

        // Measure the whole group before writing a single cell.
        let entries: Vec<(usize, Vec<String>)> = model
            .cells_in_row(row)
            .map(|cell| {
                let label = headings.get(cell.col).map(String::as_str).unwrap_or("");
                let line = if label.is_empty() {
                    cell.render_text().to_string()
                } else {
                    format!("{label}{LINEAR_COLON} {}", cell.render_text())
                };
                (cell.col, wrap_entry(&line, width))
            })
            .collect();
        let height: usize = entries.iter().map(|(_, lines)| lines.len()).sum();
        if height == 0 {
            return Ok(FitResult::Fits);
        }
        if y0 as usize + height - 1 > bottom as usize {
            return Ok(FitResult::DoesNotFit);
        }

        let mut y = y0;
        for (col, lines) in &entries {
            let node = model.cell(row, *col).expect("cell exists").node;
            for (i, line) in lines.iter().enumerate() {
                let x = if i == 0 { 0 } else { VALUE_RUNOVER };
                pages.active_mut().write_at(y + i as u16, x, line, node)?;
            }
            model.set_placed(
                row,
                *col,
                CellPlacement {
                    page,
                    x: 0,
                    y,
                    height: lines.len() as u16,
                },
            );
            y += lines.len() as u16;
        }

        pages.active_mut().set_cursor(Pos::new(0, y));
        Ok(FitResult::Fits)
    }
}

fn wrap_entry(text: &str, width: u16) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    wrap(&chars, width, width.saturating_sub(VALUE_RUNOVER).max(1))
        .into_iter()
        .map(|l| chars[l.start..l.end].iter().collect())
        .collect()
}
