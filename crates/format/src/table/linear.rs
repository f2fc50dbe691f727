//! Linear table layout: each row serialized into one flowing paragraph.
//! Used for narrow pages and tables no columnar strategy can place.

use crate::context::FormatContext;
use crate::table::model::{TableModel, LINEAR_COLON, LINEAR_SEMICOLON};
use crate::FormatError;
use emboss_canvas::PageSet;
use itertools::Itertools;

const ROW_RUNOVER: u16 = 2;

pub struct LinearTableFormatter;

impl LinearTableFormatter {
    /// Serializes every row as running text with divider glyphs between
    /// cells. Flowing placement turns pages as needed, so this strategy
    /// cannot refuse.
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

        let left = pages.active().left_indent();
        for row in 0..model.rows {
            let text = self.serialize_row(model, row);
            if text.is_empty() {
                continue;
            }
            let canvas = pages.active_mut();
            canvas.set_first_line_indent(Some(left));
            canvas.set_indents(left + ROW_RUNOVER, canvas.right_indent());
            pages.add_text(&text, model.row_nodes[row])?;
            pages.active_mut().new_line();
        }

        let canvas = pages.active_mut();
        canvas.set_indents(left, canvas.right_indent());
        canvas.set_first_line_indent(None);
        Ok(())
    }

    /// The first cell is set off with a colon, the rest separated by
    /// semicolons.
    fn serialize_row(&self, model: &TableModel, row: usize) -> String {
        let mut cells = model.cells_in_row(row);
        let Some(first) = cells.next() else {
            return String::new();
        };
        let rest = cells
            .map(|c| c.render_text().to_string())
            .join(&format!("{LINEAR_SEMICOLON} "));
        if rest.is_empty() {
            first.render_text().to_string()
        } else {
            format!("{}{LINEAR_COLON} {rest}", first.render_text())
        }
    }
}
