//! Trivial leaf formatters: placeholder braille, reserved graphic space,
//! and the regex line-wrapper for technical notation.

use crate::context::FormatContext;
use crate::FormatError;
use emboss_canvas::PageSet;
use emboss_types::NodeId;
use regex::Regex;

/// Discards placeholder braille. The placeholder exists so the editor has
/// something to select; it must never reach a page.
pub struct SkipFormatter;

impl SkipFormatter {
    pub fn format(&self, ctx: &FormatContext, node: NodeId) {
        let cells = ctx.doc.collect_braille(node).chars().count();
        log::debug!("discarding {cells} cells of placeholder braille under {node}");
    }
}

/// Reserves blank lines for a tactile graphic, moving to a fresh page
/// first when the current one cannot hold the whole reservation.
pub struct SkipLinesFormatter;

impl SkipLinesFormatter {
    pub fn format(&self, lines: u16, pages: &mut PageSet) -> Result<(), FormatError> {
        pages.process_spacing();
        if pages.active().cursor().x > 0 {
            pages.active_mut().new_line();
        }
        let lines = lines.min(pages.active().band_height());
        if lines > pages.active().rows_remaining() {
            pages.turn_page();
        }
        pages.active_mut().reserve_lines(lines)?;
        Ok(())
    }
}

/// Wraps technical notation. Unlike running text, math may only break at
/// blanks or immediately before comparison/operation signs; continuation
/// lines take a two-cell runover indent.
pub struct MathFormatter {
    breaks: Regex,
}

const MATH_RUNOVER: u16 = 2;

impl MathFormatter {
    pub fn new() -> Self {
        Self {
            // Blanks and the signs a line may be broken before.
            breaks: Regex::new(r"[ =+<>×÷⠬⠨⠪⠱-]").expect("math break pattern is valid"),
        }
    }

    pub fn format(
        &self,
        ctx: &mut FormatContext,
        node: NodeId,
        pages: &mut PageSet,
    ) -> Result<(), FormatError> {
        let text = ctx.doc.collect_braille(node);
        if text.is_empty() {
            log::warn!("math element {node} carries no braille; skipping");
            return Ok(());
        }

        pages.process_spacing();
        if pages.active().cursor().x > 0 {
            pages.active_mut().new_line();
        }

        let left = pages.active().left_indent();
        let right = pages.active().right_limit();
        let lines = self.break_lines(&text, right.saturating_sub(left), MATH_RUNOVER);

        for (i, line) in lines.iter().enumerate() {
            while pages.active().cursor().y > pages.active().bottom_row() {
                pages.turn_page();
            }
            let x = if i == 0 { left } else { left + MATH_RUNOVER };
            let row = pages.active().cursor().y;
            pages.active_mut().write_at(row, x, line, node)?;
            pages.active_mut().new_line();
        }
        Ok(())
    }

    /// Greedy wrap at the last break opportunity inside each window.
    fn break_lines(&self, text: &str, width: u16, runover: u16) -> Vec<String> {
        let width = width.max(1) as usize;
        let chars: Vec<char> = text.chars().collect();
        // Char positions where a new line may start.
        let mut breakable = vec![false; chars.len()];
        let char_of_byte: std::collections::HashMap<usize, usize> = text
            .char_indices()
            .enumerate()
            .map(|(ci, (bi, _))| (bi, ci))
            .collect();
        for m in self.breaks.find_iter(text) {
            if let Some(&ci) = char_of_byte.get(&m.start()) {
                breakable[ci] = true;
            }
        }

        let mut out = Vec::new();
        let mut start = 0;
        while start < chars.len() {
            let max = if out.is_empty() {
                width
            } else {
                width.saturating_sub(runover as usize).max(1)
            };
            if chars.len() - start <= max {
                out.push(chars[start..].iter().collect());
                break;
            }
            let window_end = start + max;
            let break_at = (start + 1..=window_end)
                .rev()
                .find(|&i| i < chars.len() && breakable[i])
                .unwrap_or(window_end);
            let mut end = break_at;
            // A break at a blank consumes it; a break before a sign keeps it.
            while end > start && chars[end - 1] == ' ' {
                end -= 1;
            }
            out.push(chars[start..end].iter().collect());
            start = break_at;
            while start < chars.len() && chars[start] == ' ' {
                start += 1;
            }
        }
        if out.is_empty() {
            out.push(String::new());
        }
        out
    }
}

impl Default for MathFormatter {
    fn default() -> Self {
        Self::new()
    }
}
