//! Poetry and line-numbered prose.
//!
//! A line number's rendered width is unknown until its final text exists,
//! yet that width sets the right margin reserved for every line in the
//! group. Lines are placed optimistically; when a wider label arrives,
//! everything placed so far is undone and re-added against the widened
//! margin.

use crate::context::FormatContext;
use crate::literary::LiteraryFormatter;
use crate::FormatError;
use emboss_canvas::{CanvasError, PageMark, PageSet};
use emboss_doc::{BrailleSegment, Continuation, ElementKind};
use emboss_style::Style;
use emboss_types::NodeId;

pub struct NumberedLineFormatter<'f> {
    literary: &'f LiteraryFormatter,
}

/// Outcome of a group, exposed for inspection: how often the margin had
/// to widen and what it ended at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NumberedStats {
    pub relayouts: usize,
    pub margin: u16,
}

/// Group-scoped record of one placed line; threaded through the call, not
/// kept on the formatter.
struct PlacedLine {
    line: NodeId,
    label: Option<String>,
    label_node: Option<NodeId>,
}

enum LinePlacement {
    Placed { label_node: Option<NodeId> },
    DoesNotFit,
}

impl<'f> NumberedLineFormatter<'f> {
    pub fn new(literary: &'f LiteraryFormatter) -> Self {
        Self { literary }
    }

    pub fn format(
        &self,
        ctx: &mut FormatContext,
        group: NodeId,
        prose: bool,
        pages: &mut PageSet,
    ) -> Result<NumberedStats, FormatError> {
        // Labels from a previous layout are stale content.
        ctx.doc.clear_synthetic(group);
        let lines: Vec<NodeId> = ctx
            .doc
            .children(group)
            .iter()
            .copied()
            .filter(|&c| matches!(ctx.doc.element_kind(c), Some(ElementKind::Line { .. })))
            .collect();
        if lines.is_empty() {
            self.literary.format_children(ctx, group, pages)?;
            return Ok(NumberedStats::default());
        }

        let group_style = ctx.styles.resolve(group);
        pages.process_spacing();
        if pages.active().cursor().x > 0 {
            pages.active_mut().new_line();
        }
        let mark = pages.mark();

        let mut stats = NumberedStats::default();
        let mut placed: Vec<PlacedLine> = Vec::new();

        for &line in &lines {
            let number = match ctx.doc.element_kind(line) {
                Some(ElementKind::Line { number }) => number.clone(),
                _ => None,
            };
            let needed = number
                .as_ref()
                .map(|n| n.chars().count() as u16 + 1)
                .unwrap_or(0);

            // A wider label than the reserved margin invalidates every
            // line already placed in this group.
            if needed > stats.margin {
                stats.margin = needed;
                if !placed.is_empty() {
                    stats.relayouts += 1;
                    self.undo_group(ctx, &placed, pages, mark);
                    for k in 0..placed.len() {
                        let (prev_line, prev_label) = (placed[k].line, placed[k].label.clone());
                        match self.place_line(
                            ctx,
                            prev_line,
                            prev_label,
                            stats.margin,
                            &group_style,
                            prose,
                            pages,
                        )? {
                            LinePlacement::Placed { label_node } => {
                                placed[k].label_node = label_node
                            }
                            LinePlacement::DoesNotFit => {
                                return self.fall_back(ctx, &lines, placed, pages, mark, stats);
                            }
                        }
                    }
                }
            }

            match self.place_line(
                ctx,
                line,
                number.clone(),
                stats.margin,
                &group_style,
                prose,
                pages,
            )? {
                LinePlacement::Placed { label_node } => placed.push(PlacedLine {
                    line,
                    label: number,
                    label_node,
                }),
                LinePlacement::DoesNotFit => {
                    return self.fall_back(ctx, &lines, placed, pages, mark, stats);
                }
            }
        }

        // Restore the group's own margins for whatever follows.
        pages
            .active_mut()
            .set_indents(group_style.left_indent, group_style.right_indent);
        Ok(stats)
    }

    /// Places one line with the number margin reserved on the right, then
    /// writes the label against the page edge on the line's final row.
    fn place_line(
        &self,
        ctx: &mut FormatContext,
        line: NodeId,
        label: Option<String>,
        margin: u16,
        group_style: &Style,
        prose: bool,
        pages: &mut PageSet,
    ) -> Result<LinePlacement, FormatError> {
        let canvas = pages.active_mut();
        canvas.set_indents(group_style.left_indent, group_style.right_indent + margin);
        canvas.set_first_line_indent(group_style.first_line_indent);
        if canvas.right_limit() <= canvas.left_indent() + 1 {
            return Ok(LinePlacement::DoesNotFit);
        }

        if prose && pages.active().cursor().x > 0 {
            pages.add_text(" ", line)?;
        }

        let placement = pages.add_brl(ctx.doc, line)?;
        if placement.rows.is_empty() {
            log::warn!("numbered line {line} carries no braille; skipped");
            return Ok(LinePlacement::Placed { label_node: None });
        }

        if placement.crossed_page() {
            // The label rides the final fragment of a continued line.
            ctx.doc.marks_mut(line).continuation = Some(Continuation::Last);
        }

        let mut label_node = None;
        if let Some(label) = label {
            let &(page_idx, row) = if prose {
                placement.rows.first()
            } else {
                placement.rows.last()
            }
            .expect("placement has rows");

            let len = label.chars().count() as u16;
            let x = pages.page(page_idx).width().saturating_sub(len);
            let node = ctx.doc.new_braille(BrailleSegment::new(label.clone()));
            ctx.doc.marks_mut(node).synthetic = true;
            ctx.doc.append_child(line, node);

            match pages.page_mut(page_idx).write_at(row, x, &label, node) {
                Ok(()) => {
                    ctx.doc.marks_mut(line).line_label = Some(label);
                    label_node = Some(node);
                }
                Err(CanvasError::Occupied { .. }) if prose => {
                    // Interval labels may land on a shared row; the later
                    // one is simply dropped.
                    log::debug!("prose line label for {line} collides; dropped");
                    ctx.doc.detach(node);
                }
                Err(_) => {
                    ctx.doc.detach(node);
                    pages.remove_brl(line);
                    return Ok(LinePlacement::DoesNotFit);
                }
            }
        }

        if !prose {
            pages.active_mut().new_line();
        }
        Ok(LinePlacement::Placed { label_node })
    }

    /// Removes every placed line and label from the canvas and resets the
    /// cursor to the group's start.
    fn undo_group(
        &self,
        ctx: &mut FormatContext,
        placed: &[PlacedLine],
        pages: &mut PageSet,
        mark: PageMark,
    ) {
        for p in placed {
            pages.remove_brl(p.line);
            if let Some(node) = p.label_node {
                pages.remove_brl(node);
                ctx.doc.detach(node);
            }
            ctx.doc.marks_mut(p.line).continuation = None;
            ctx.doc.marks_mut(p.line).line_label = None;
        }
        pages.rollback_to(mark);
    }

    /// Irrecoverable: the group renders as plain literary content instead.
    fn fall_back(
        &self,
        ctx: &mut FormatContext,
        lines: &[NodeId],
        placed: Vec<PlacedLine>,
        pages: &mut PageSet,
        mark: PageMark,
        stats: NumberedStats,
    ) -> Result<NumberedStats, FormatError> {
        log::warn!("numbered-line layout is irrecoverable; rendering the group as literary");
        self.undo_group(ctx, &placed, pages, mark);
        for &line in lines {
            self.literary.format(ctx, line, pages)?;
        }
        Ok(stats)
    }
}
