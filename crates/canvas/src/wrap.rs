//! Greedy line breaking for finalized braille text.
//!
//! One character is one cell, so wrapping is pure arithmetic: break at the
//! last blank that fits, hard-break words wider than a whole line.

/// One wrapped line as a char range into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrappedLine {
    pub start: usize,
    pub end: usize,
}

impl WrappedLine {
    pub fn width(&self) -> u16 {
        (self.end - self.start) as u16
    }
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\u{2800}'
}

/// Breaks `text` into lines of at most `first_width` cells for the first
/// line and `width` cells for the rest. Leading blanks on continuation
/// lines are consumed by the break.
pub fn wrap(text: &[char], first_width: u16, width: u16) -> Vec<WrappedLine> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut start = 0;
    let total = text.len();

    while start < total {
        let limit = if lines.is_empty() { first_width } else { width };
        let max = limit as usize;
        if max == 0 {
            // No room on this line at all; emit an empty marker so the
            // caller moves to the next line and retries at full width.
            lines.push(WrappedLine { start, end: start });
            continue;
        }

        let remaining = total - start;
        if remaining <= max {
            lines.push(WrappedLine {
                start,
                end: total,
            });
            break;
        }

        // Find the last blank inside the window.
        let window_end = start + max;
        let break_at = (start..=window_end)
            .rev()
            .find(|&i| i < total && is_blank(text[i]));

        match break_at {
            Some(at) if at > start => {
                lines.push(WrappedLine { start, end: at });
                start = at + 1;
            }
            _ => {
                // Unbreakable word wider than the window: hard break.
                lines.push(WrappedLine {
                    start,
                    end: window_end,
                });
                start = window_end;
            }
        }

        // Consume further blanks so continuation lines never start blank.
        while start < total && is_blank(text[start]) {
            start += 1;
        }
    }

    if lines.is_empty() {
        lines.push(WrappedLine { start: 0, end: 0 });
    }
    lines
}

/// Number of lines `text` occupies at the given uniform width.
pub fn line_count(text: &str, width: u16) -> usize {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return 0;
    }
    wrap(&chars, width, width).len()
}
