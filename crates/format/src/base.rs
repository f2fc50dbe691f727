//! Shared pre/post hooks every formatter wraps around its content work.

use crate::context::FormatContext;
use crate::FormatError;
use emboss_canvas::PageSet;
use emboss_doc::BrailleSegment;
use emboss_style::{Align, Style};
use emboss_types::NodeId;

/// Pushes a style's alignment, indents and spacing mode onto the canvas
/// without queueing anything.
pub fn apply_style_context(canvas: &mut emboss_canvas::PageCanvas, style: &Style) {
    canvas.set_align(style.align);
    canvas.set_indents(style.left_indent, style.right_indent);
    canvas.set_first_line_indent(style.first_line_indent);
    canvas.set_line_spacing(style.line_spacing);
    canvas.set_number_line_skip(style.skip_number_lines);
}

/// Applies alignment/indents, queues spacing before the content and
/// inserts the start separator.
pub fn pre_format(
    ctx: &mut FormatContext,
    node: NodeId,
    style: &Style,
    pages: &mut PageSet,
) -> Result<(), FormatError> {
    let canvas = pages.active_mut();
    apply_style_context(canvas, style);
    canvas.queue_pages(style.pages_before);
    canvas.queue_lines(style.lines_before);

    if let Some(glyph) = style.start_separator {
        insert_separator(ctx, node, glyph, pages, true)?;
    }
    Ok(())
}

/// Queues spacing after the content (honoring a per-node override) and
/// inserts the end separator. Must mirror [`pre_format`].
pub fn post_format(
    ctx: &mut FormatContext,
    node: NodeId,
    style: &Style,
    pages: &mut PageSet,
) -> Result<(), FormatError> {
    if let Some(glyph) = style.end_separator {
        insert_separator(ctx, node, glyph, pages, false)?;
    }

    let lines_after = ctx
        .doc
        .marks(node)
        .lines_after_override
        .unwrap_or(style.lines_after);
    let canvas = pages.active_mut();
    canvas.queue_lines(lines_after);
    canvas.queue_pages(style.pages_after);
    Ok(())
}

/// Places a centered separator line of `glyph` as a synthetic sibling of
/// `node`, so a later re-format can find and delete it.
fn insert_separator(
    ctx: &mut FormatContext,
    node: NodeId,
    glyph: char,
    pages: &mut PageSet,
    before: bool,
) -> Result<(), FormatError> {
    let width = separator_width(pages);
    let text: String = std::iter::repeat(glyph).take(width as usize).collect();

    let sep = ctx.doc.new_braille(BrailleSegment::new(text.clone()));
    ctx.doc.marks_mut(sep).synthetic = true;
    if before {
        ctx.doc.insert_before(node, sep);
    } else {
        ctx.doc.insert_after(node, sep);
    }

    pages.process_spacing();
    let canvas = pages.active_mut();
    if canvas.cursor().x > 0 {
        canvas.new_line();
    }
    let prev_align = canvas.align();
    canvas.set_align(Align::Centered);
    pages.add_text(&text, sep)?;
    let canvas = pages.active_mut();
    canvas.set_align(prev_align);
    canvas.new_line();
    Ok(())
}

fn separator_width(pages: &PageSet) -> u16 {
    let canvas = pages.active();
    let band = canvas
        .right_limit()
        .saturating_sub(canvas.left_indent());
    band.min(12).max(1)
}
