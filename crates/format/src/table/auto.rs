//! The table dispatcher: detects the table's shape, runs the strategy
//! chain, and tags the element with the format that finally placed it.

use crate::context::FormatContext;
use crate::literary::LiteraryFormatter;
use crate::table::linear::LinearTableFormatter;
use crate::table::listed::ListedTableFormatter;
use crate::table::model::TableModel;
use crate::table::simple::SimpleTableFormatter;
use crate::table::stairstep::StairstepTableFormatter;
use crate::FormatError;
use emboss_canvas::PageSet;
use emboss_doc::TableFormat;
use emboss_types::NodeId;

pub struct AutoTableFormatter<'f> {
    literary: &'f LiteraryFormatter,
}

impl<'f> AutoTableFormatter<'f> {
    pub fn new(literary: &'f LiteraryFormatter) -> Self {
        Self { literary }
    }

    /// Formats a table by the first strategy in the chain that fits:
    /// Simple, then Listed, then Linear. Ragged shapes go straight to
    /// Stairstep. A table that defeats every strategy renders as plain
    /// literary content.
    pub fn format(
        &self,
        ctx: &mut FormatContext,
        table: NodeId,
        pages: &mut PageSet,
    ) -> Result<(), FormatError> {
        let Some(mut model) = TableModel::collect(ctx, table) else {
            return self.literary.format_children(ctx, table, pages);
        };

        if let Some(caption) = model.caption {
            self.literary.format(ctx, caption, pages)?;
        }

        let chosen = self.dispatch(ctx, &mut model, pages)?;
        match chosen {
            Some(format) => {
                let marks = ctx.doc.marks_mut(table);
                marks.table_format = Some(format);
                // A table never runs straight into following content.
                marks.lines_after_override.get_or_insert(1);
                Ok(())
            }
            None => {
                log::warn!("table {table}: every strategy refused; rendering as literary");
                self.literary.format_children(ctx, table, pages)
            }
        }
    }

    fn dispatch(
        &self,
        ctx: &mut FormatContext,
        model: &mut TableModel,
        pages: &mut PageSet,
    ) -> Result<Option<TableFormat>, FormatError> {
        if model.is_ragged() {
            StairstepTableFormatter.format(ctx, model, pages)?;
            return Ok(Some(TableFormat::Stairstep));
        }

        let gap = ctx.config.cell_gap;
        let min_columnar = model.cols as u16 * 3 + gap * (model.cols as u16 - 1);
        let narrow = pages.active().width() < min_columnar;

        if !narrow {
            if SimpleTableFormatter.format(ctx, model, pages)?.fits() {
                return Ok(Some(TableFormat::Simple));
            }
            log::debug!(
                "table {}: columnar layout does not fit, trying listed",
                model.node
            );
            if ListedTableFormatter.format(ctx, model, pages)?.fits() {
                return Ok(Some(TableFormat::Listed));
            }
        }

        LinearTableFormatter.format(ctx, model, pages)?;
        Ok(Some(TableFormat::Linear))
    }
}
