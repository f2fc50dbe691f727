//! Title/volume page layout: content is stretched vertically so the first
//! line sits on the first usable row and the last line on the last
//! drawable row.

use crate::context::FormatContext;
use crate::literary::LiteraryFormatter;
use crate::FormatError;
use emboss_canvas::{PageMark, PageSet};
use emboss_doc::ElementKind;
use emboss_types::{NodeId, PageNumberKind, Pos};

/// Hard cap on re-centering passes, over and above the section-count
/// bound. Exhausting it abandons centering rather than trusting the
/// arithmetic to converge.
const MAX_CENTERING_PASSES: usize = 8;

pub struct TitlePageFormatter<'f> {
    literary: &'f LiteraryFormatter,
}

impl<'f> TitlePageFormatter<'f> {
    pub fn new(literary: &'f LiteraryFormatter) -> Self {
        Self { literary }
    }

    pub fn format(
        &self,
        ctx: &mut FormatContext,
        tpage: NodeId,
        pages: &mut PageSet,
    ) -> Result<(), FormatError> {
        let sections: Vec<NodeId> = ctx
            .doc
            .children(tpage)
            .iter()
            .copied()
            .filter(|&c| matches!(ctx.doc.element_kind(c), Some(ElementKind::TitleSection)))
            .collect();
        if sections.is_empty() {
            return self.literary.format_children(ctx, tpage, pages);
        }

        // A title page owns a whole sheet.
        pages.active_mut().take_pending();
        if !pages.active().is_pristine() {
            pages.turn_page();
        }
        pages
            .active_mut()
            .set_page_number_kind(PageNumberKind::TitlePage);
        let mark = pages.mark();

        // First pass with the sections' natural spacing.
        if self.render_once(ctx, &sections, &[], pages)? {
            // Content taller than one page cannot be centered at all.
            log::warn!("title page {tpage} overflows a bare page; centering abandoned");
            self.undo(ctx, &sections, pages, mark);
            return self.render_plain(ctx, &sections, pages);
        }

        let bottom = pages.active().bottom_row();
        let last = pages
            .active()
            .last_content_row()
            .unwrap_or_else(|| pages.active().top_row());
        let mut extra_total = (bottom - last) as usize;

        // Distribute the slack across the section gaps; when a pass
        // overflows, hand back one line and try again, bounded by the
        // section count plus the hard cap.
        let gaps = sections.len().saturating_sub(1);
        if extra_total > 0 && gaps > 0 {
            let mut passes = 0;
            loop {
                passes += 1;
                self.undo(ctx, &sections, pages, mark);
                let extras = distribute(extra_total, gaps);
                if !self.render_once(ctx, &sections, &extras, pages)? {
                    break;
                }
                if extra_total == 0 || passes > sections.len() + MAX_CENTERING_PASSES {
                    log::warn!(
                        "title page {tpage} centering did not converge; rendering plain"
                    );
                    self.undo(ctx, &sections, pages, mark);
                    return self.render_plain(ctx, &sections, pages);
                }
                extra_total -= 1;
            }
        }

        self.avoid_page_number_collision(ctx, pages)?;
        Ok(())
    }

    /// Renders every section once, queueing `extras[i]` additional blank
    /// lines ahead of section `i + 1`. Returns whether a page turned.
    fn render_once(
        &self,
        ctx: &mut FormatContext,
        sections: &[NodeId],
        extras: &[usize],
        pages: &mut PageSet,
    ) -> Result<bool, FormatError> {
        let start_pages = pages.page_count();
        for (i, &section) in sections.iter().enumerate() {
            if i > 0 {
                let extra = extras.get(i - 1).copied().unwrap_or(0);
                pages.active_mut().queue_lines(extra as u16);
            }
            self.literary.format(ctx, section, pages)?;
            if pages.page_count() > start_pages {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Removes everything the sections placed and returns to the mark.
    fn undo(
        &self,
        ctx: &mut FormatContext,
        sections: &[NodeId],
        pages: &mut PageSet,
        mark: PageMark,
    ) {
        for &section in sections {
            pages.remove_brl(section);
            let subtree: Vec<NodeId> = ctx.doc.descendants(section);
            for node in subtree {
                pages.remove_brl(node);
                if ctx.doc.marks(node).synthetic {
                    ctx.doc.detach(node);
                }
            }
        }
        pages.rollback_to(mark);
    }

    /// Centering given up: plain literary rendering, top-aligned.
    fn render_plain(
        &self,
        ctx: &mut FormatContext,
        sections: &[NodeId],
        pages: &mut PageSet,
    ) -> Result<(), FormatError> {
        for &section in sections {
            self.literary.format(ctx, section, pages)?;
        }
        Ok(())
    }

    /// When the last content line reaches into the page-number corner,
    /// its node is re-flowed with the number label's width reserved so
    /// the line wraps early instead of colliding.
    fn avoid_page_number_collision(
        &self,
        ctx: &mut FormatContext,
        pages: &mut PageSet,
    ) -> Result<(), FormatError> {
        let canvas = pages.active();
        let label_width = canvas.page_number_width();
        if label_width == 0 {
            return Ok(());
        }
        let bottom = canvas.bottom_row();
        let limit = canvas.width().saturating_sub(label_width);
        let Some(span) = canvas
            .spans()
            .iter()
            .filter(|s| s.row == bottom && s.end_x() > limit)
            .max_by_key(|s| s.end_x())
        else {
            return Ok(());
        };

        let node = span.node;
        let first_row = pages
            .active()
            .spans_for(node)
            .map(|s| s.row)
            .min()
            .unwrap_or(bottom);
        let old_rows = pages.active().spans_for(node).count() as u16;
        pages.active_mut().remove_node(node);

        // Wrapping early adds rows; start higher so the last one still
        // lands on the bottom row.
        let canvas = pages.active_mut();
        let left = canvas.left_indent();
        let narrowed = canvas.width().saturating_sub(left).saturating_sub(label_width);
        let new_rows = emboss_canvas::line_count(&ctx.doc.collect_braille(node), narrowed) as u16;
        let start = first_row.saturating_sub(new_rows.saturating_sub(old_rows));

        canvas.set_indents(left, label_width);
        canvas.set_cursor(Pos::new(0, start));
        pages.add_brl(ctx.doc, node)?;
        let canvas = pages.active_mut();
        canvas.set_indents(left, 0);
        Ok(())
    }
}

/// Splits `total` extra lines across `gaps` section gaps: an even share
/// everywhere, the remainder as single extra lines in the later gaps.
fn distribute(total: usize, gaps: usize) -> Vec<usize> {
    let share = total / gaps;
    let rem = total % gaps;
    (0..gaps)
        .map(|i| share + usize::from(i >= gaps - rem))
        .collect()
}
