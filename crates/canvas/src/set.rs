use crate::page::{PageCanvas, PendingSpacing};
use crate::wrap::{self, WrappedLine};
use crate::CanvasError;
use emboss_doc::Document;
use emboss_style::Align;
use emboss_types::{NodeId, PageGeometry, Pos};

/// Result of one flowing placement.
#[derive(Debug, Clone, Default)]
pub struct Placement {
    /// Pages opened while placing (spacing flush included).
    pub pages_turned: usize,
    /// Position of the first cell written.
    pub start: Pos,
    /// Cursor position after the last cell written.
    pub end: Pos,
    /// (page index, row) of every line written, in order.
    pub rows: Vec<(usize, u16)>,
}

impl Placement {
    pub fn crossed_page(&self) -> bool {
        self.rows
            .first()
            .zip(self.rows.last())
            .is_some_and(|(a, b)| a.0 != b.0)
    }
}

/// Snapshot for all-or-nothing strategies: page count, cursor and span
/// count of the page that was active when the mark was taken.
#[derive(Debug, Clone, Copy)]
pub struct PageMark {
    pages: usize,
    cursor: Pos,
    spans: usize,
}

/// The ordered page sequence: every finished page plus exactly one active
/// canvas being written. Turning the page retires the active canvas.
#[derive(Debug, Clone)]
pub struct PageSet {
    finished: Vec<PageCanvas>,
    active: PageCanvas,
}

impl PageSet {
    pub fn new(geometry: PageGeometry) -> Self {
        Self::with_options(geometry, 1, false)
    }

    pub fn with_options(geometry: PageGeometry, first_page: u32, running_head: bool) -> Self {
        Self {
            finished: Vec::new(),
            active: PageCanvas::new(geometry, first_page, running_head),
        }
    }

    pub fn page_count(&self) -> usize {
        self.finished.len() + 1
    }

    pub fn active(&self) -> &PageCanvas {
        &self.active
    }

    pub fn active_mut(&mut self) -> &mut PageCanvas {
        &mut self.active
    }

    pub fn active_index(&self) -> usize {
        self.finished.len()
    }

    pub fn page(&self, index: usize) -> &PageCanvas {
        if index == self.finished.len() {
            &self.active
        } else {
            &self.finished[index]
        }
    }

    pub fn page_mut(&mut self, index: usize) -> &mut PageCanvas {
        if index == self.finished.len() {
            &mut self.active
        } else {
            &mut self.finished[index]
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PageCanvas> {
        self.finished.iter().chain(std::iter::once(&self.active))
    }

    /// Retires the active canvas and opens a fresh page continuing it.
    pub fn turn_page(&mut self) {
        let next = self.active.next_page();
        let prev = std::mem::replace(&mut self.active, next);
        self.finished.push(prev);
    }

    // --- Marks and rollback ---

    pub fn mark(&self) -> PageMark {
        PageMark {
            pages: self.page_count(),
            cursor: self.active.cursor(),
            spans: self.active.spans().len(),
        }
    }

    /// Drops every page opened since the mark and restores the then-active
    /// page's cursor and span count. Content placed on *earlier* pages is
    /// untouched; strategies remove their own nodes via [`Self::remove_brl`].
    pub fn rollback_to(&mut self, mark: PageMark) {
        if self.page_count() > mark.pages {
            log::debug!(
                "rolling back {} page(s) opened by a failed layout attempt",
                self.page_count() - mark.pages
            );
        }
        while self.page_count() > mark.pages {
            self.active = self
                .finished
                .pop()
                .expect("page_count > mark.pages implies a finished page");
        }
        self.active.truncate_spans(mark.spans);
        self.active.set_cursor(mark.cursor);
    }

    /// Removes every span of `node` on every page.
    pub fn remove_brl(&mut self, node: NodeId) -> usize {
        let mut removed = self.active.remove_node(node);
        for page in &mut self.finished {
            removed += page.remove_node(node);
        }
        removed
    }

    // --- Spacing ---

    /// Flushes the active page's pending blank lines and page turns.
    /// Returns the number of pages opened. Queued blank lines that would
    /// run past the bottom, or that land on a pristine page top, are
    /// dropped rather than carried over.
    pub fn process_spacing(&mut self) -> usize {
        let PendingSpacing { lines, pages } = self.active.take_pending();
        let mut turned = 0;

        for _ in 0..pages {
            self.turn_page();
            turned += 1;
        }

        if lines > 0 {
            if self.active.cursor().x > 0 {
                self.active.new_line();
            }
            let at_fresh_top =
                self.active.is_pristine() && self.active.cursor().y == self.active.top_row();
            if !at_fresh_top {
                let target = self.active.cursor().y + lines;
                if target > self.active.bottom_row() {
                    self.turn_page();
                    turned += 1;
                } else {
                    self.active.set_cursor(Pos::new(0, target));
                }
            }
        }

        turned
    }

    // --- Flowing placement ---

    /// Places a node's braille from the cursor, wrapping inside the current
    /// margins and turning pages as needed. The braille text is the
    /// concatenation of the node's braille descendants (or the node's own
    /// segment).
    pub fn add_brl(&mut self, doc: &Document, node: NodeId) -> Result<Placement, CanvasError> {
        let text = doc.collect_braille(node);
        self.add_text(&text, node)
    }

    /// Places raw text for `node`; the flowing half of the canvas contract.
    pub fn add_text(&mut self, text: &str, node: NodeId) -> Result<Placement, CanvasError> {
        let mut placement = Placement {
            pages_turned: self.process_spacing(),
            ..Default::default()
        };
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            placement.start = self.active.cursor();
            placement.end = placement.start;
            return Ok(placement);
        }

        let left = self.active.left_indent();
        let first_left = self.active.first_line_indent().unwrap_or(left);
        let right = self.active.right_limit();
        let inline_start = self.active.cursor().x > 0;

        let start_x = if inline_start {
            self.active.cursor().x
        } else {
            first_left
        };
        let first_width = right.saturating_sub(start_x);
        let width = right.saturating_sub(left);
        let lines = wrap::wrap(&chars, first_width, width);

        let mut first = true;
        let mut wrote_any = false;
        for (i, line) in lines.iter().enumerate() {
            if line.start == line.end && first {
                // No room on the partial first line; drop to a fresh one.
                self.active.new_line();
                first = false;
                continue;
            }
            if !first {
                // Continuation lines restart at the left band edge.
                self.active.set_cursor_x(0);
            }
            let turned = self.ensure_row()?;
            placement.pages_turned += turned;

            let x = self.line_x(line, first, start_x, left, right);
            let row = self.active.cursor().y;
            let fragment: String = chars[line.start..line.end].iter().collect();
            self.active
                .write_span(row, x, &fragment, node, line.start)?;
            placement.rows.push((self.active_index(), row));
            if !wrote_any {
                placement.start = Pos::new(x, row);
                wrote_any = true;
            }
            self.active.set_cursor(Pos::new(x + line.width(), row));
            if i + 1 < lines.len() {
                self.active.new_line();
            }
            first = false;
        }

        placement.end = self.active.cursor();
        Ok(placement)
    }

    /// Advances the cursor past reserved rows and off the page bottom,
    /// turning the page when the band is exhausted. Returns pages turned.
    fn ensure_row(&mut self) -> Result<usize, CanvasError> {
        let mut turned = 0;
        loop {
            let y = self.active.cursor().y;
            if y > self.active.bottom_row() {
                self.turn_page();
                turned += 1;
                continue;
            }
            if self.active.is_reserved(y) {
                let x = self.active.cursor().x;
                self.active.set_cursor(Pos::new(x, y + 1));
                continue;
            }
            return Ok(turned);
        }
    }

    fn line_x(&self, line: &WrappedLine, first: bool, start_x: u16, left: u16, right: u16) -> u16 {
        let width = line.width();
        let band_start = if first { start_x } else { left };
        match self.active.align() {
            Align::Left => band_start,
            Align::Centered => {
                let free = right.saturating_sub(left).saturating_sub(width);
                left + free / 2
            }
            Align::Right => right.saturating_sub(width),
        }
    }
}
