//! The general recursive tree-to-page driver. Everything else is invoked
//! from here, and every specialized formatter that gives up falls back to
//! plain literary rendering.

use crate::base;
use crate::context::FormatContext;
use crate::leaf::{MathFormatter, SkipFormatter, SkipLinesFormatter};
use crate::numbered::NumberedLineFormatter;
use crate::table::auto::AutoTableFormatter;
use crate::table::facing::FacingTableFormatter;
use crate::tpage::TitlePageFormatter;
use crate::FormatError;
use emboss_canvas::{line_count, PageSet};
use emboss_doc::{ElementKind, NodeKind};
use emboss_types::NodeId;

pub struct LiteraryFormatter {
    math: MathFormatter,
}

impl LiteraryFormatter {
    pub fn new() -> Self {
        Self {
            math: MathFormatter::new(),
        }
    }

    /// Formats one node and its subtree onto the page sequence.
    pub fn format(
        &self,
        ctx: &mut FormatContext,
        node: NodeId,
        pages: &mut PageSet,
    ) -> Result<(), FormatError> {
        let style = ctx.styles.resolve(node);

        // Block-level elements start on a fresh line; tabs stay inline.
        let inline = matches!(
            ctx.doc.element_kind(node),
            Some(ElementKind::Tab { .. }) | None
        );
        if !inline && pages.active().cursor().x > 0 {
            pages.active_mut().new_line();
        }

        base::pre_format(ctx, node, &style, pages)?;
        self.format_content(ctx, node, pages)?;
        base::post_format(ctx, node, &style, pages)?;
        Ok(())
    }

    /// Resumes formatting mid-document from a saved ancestor path,
    /// recreating each ancestor's indent/alignment context without
    /// reprocessing already-committed siblings.
    pub fn partial_format(
        &self,
        ctx: &mut FormatContext,
        path: &[NodeId],
        pages: &mut PageSet,
    ) -> Result<(), FormatError> {
        let Some((&target, ancestors)) = path.split_last() else {
            return Ok(());
        };
        for &ancestor in ancestors {
            let style = ctx.styles.resolve(ancestor);
            base::apply_style_context(pages.active_mut(), &style);
        }
        self.format(ctx, target, pages)
    }

    fn format_content(
        &self,
        ctx: &mut FormatContext,
        node: NodeId,
        pages: &mut PageSet,
    ) -> Result<(), FormatError> {
        if let Some(kind) = ctx.doc.attrs(node).page_number_kind {
            pages.active_mut().set_page_number_kind(kind);
        }
        if ctx.config.guide_words && ctx.doc.attrs(node).guide_word.is_some() {
            pages.active_mut().note_guide_word(node);
        }

        let Some(kind) = ctx.doc.element_kind(node).cloned() else {
            return self.place_braille(ctx, node, pages);
        };

        match kind {
            ElementKind::Table => AutoTableFormatter::new(self).format(ctx, node, pages),
            ElementKind::LineGroup { prose } => {
                NumberedLineFormatter::new(self)
                    .format(ctx, node, prose, pages)
                    .map(|_| ())
            }
            ElementKind::TitlePage => TitlePageFormatter::new(self).format(ctx, node, pages),
            ElementKind::Graphic { lines } => SkipLinesFormatter.format(lines, pages),
            ElementKind::Placeholder => {
                SkipFormatter.format(ctx, node);
                Ok(())
            }
            ElementKind::Math => self.math.format(ctx, node, pages),
            ElementKind::PageBreak => {
                pages.process_spacing();
                if !pages.active().is_pristine() {
                    pages.turn_page();
                }
                Ok(())
            }
            ElementKind::VolumeEnd => {
                self.volume_end(ctx, pages);
                Ok(())
            }
            ElementKind::Tab { target } => {
                self.tab_stop(target, pages);
                Ok(())
            }
            _ => self.format_children(ctx, node, pages),
        }
    }

    /// Iterates an element's children, threading the (possibly new) active
    /// canvas through and re-establishing the parent's context before each
    /// inline braille child.
    pub(crate) fn format_children(
        &self,
        ctx: &mut FormatContext,
        node: NodeId,
        pages: &mut PageSet,
    ) -> Result<(), FormatError> {
        let own_style = ctx.styles.resolve(node);
        let children: Vec<NodeId> = ctx.doc.children(node).to_vec();

        let mut i = 0;
        while i < children.len() {
            let child = children[i];
            match ctx.doc.kind(child) {
                NodeKind::Braille(_) => {
                    base::apply_style_context(pages.active_mut(), &own_style);
                    self.place_braille(ctx, child, pages)?;
                }
                NodeKind::Element(_) => {
                    if let Some(pair) = self.facing_pair(ctx, &children, i) {
                        FacingTableFormatter::new(self).format_pair(ctx, pair, pages)?;
                        i += 2;
                        continue;
                    }
                    self.page_break_avoidance(ctx, &children, i, pages);
                    self.format(ctx, child, pages)?;
                }
            }
            i += 1;
        }
        Ok(())
    }

    /// Two adjacent tables both flagged as a facing pair are laid out
    /// across a left/right page spread instead of one after the other.
    fn facing_pair(
        &self,
        ctx: &FormatContext,
        children: &[NodeId],
        i: usize,
    ) -> Option<(NodeId, NodeId)> {
        let left = children[i];
        let right = *children.get(i + 1)?;
        let is_facing_table = |n: NodeId| {
            matches!(ctx.doc.element_kind(n), Some(ElementKind::Table))
                && ctx.doc.attrs(n).facing
        };
        (is_facing_table(left) && is_facing_table(right)).then_some((left, right))
    }

    /// Honors keep-with-next and don't-split: when the block (plus the
    /// first line of its keep-partner) cannot finish on this page but
    /// could on a whole one, the page turns first.
    fn page_break_avoidance(
        &self,
        ctx: &FormatContext,
        children: &[NodeId],
        i: usize,
        pages: &mut PageSet,
    ) {
        let child = children[i];
        let style = ctx.styles.resolve(child);
        if !style.dont_split && !style.keep_with_next {
            return;
        }

        let mut needed = self.estimate_rows(ctx, child, pages);
        if style.keep_with_next && children.get(i + 1).is_some() {
            needed += 1;
        }
        let canvas = pages.active();
        let mut avail = canvas.rows_remaining() as usize;
        if canvas.cursor().x > 0 {
            // The block starts after the current line is finished.
            avail = avail.saturating_sub(canvas.line_spacing() as usize);
        }
        if needed > avail && needed <= canvas.band_height() as usize {
            pages.active_mut().take_pending();
            pages.turn_page();
        }
    }

    fn estimate_rows(&self, ctx: &FormatContext, node: NodeId, pages: &PageSet) -> usize {
        let style = ctx.styles.resolve(node);
        let text = ctx.doc.collect_braille(node);
        let width = pages
            .active()
            .width()
            .saturating_sub(style.left_indent)
            .saturating_sub(style.right_indent)
            .max(1);
        line_count(&text, width)
    }

    fn place_braille(
        &self,
        ctx: &mut FormatContext,
        node: NodeId,
        pages: &mut PageSet,
    ) -> Result<(), FormatError> {
        let empty = ctx
            .doc
            .braille(node)
            .map(|s| s.text.is_empty())
            .unwrap_or(true);
        if empty {
            log::warn!("expected braille on {node} but found none; node contributes nothing");
            return Ok(());
        }
        pages.add_brl(ctx.doc, node)?;
        Ok(())
    }

    /// A volume boundary finishes the current page. Whether the braille
    /// page counter carries into the next volume is a transcriber setting.
    fn volume_end(&self, ctx: &FormatContext, pages: &mut PageSet) {
        pages.active_mut().take_pending();
        if !pages.active().is_pristine() {
            pages.turn_page();
        }
        if !ctx.config.continue_pages {
            pages.active_mut().reset_braille_page(1);
        }
    }

    /// Advance to the tab's target cell, or to the target on the next
    /// line when the cursor has already passed it.
    fn tab_stop(&self, target: u16, pages: &mut PageSet) {
        let canvas = pages.active_mut();
        if target >= canvas.cursor().x {
            canvas.set_cursor_x(target);
        } else {
            canvas.new_line();
            canvas.set_cursor_x(target);
        }
    }
}

impl Default for LiteraryFormatter {
    fn default() -> Self {
        Self::new()
    }
}
