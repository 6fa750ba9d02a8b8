//! Monospace layout for surface content.
//!
//! The host has no font shaping; every character cell is `CHAR_WIDTH` x
//! `LINE_HEIGHT`. Content is laid out top-left at the surface's bounds
//! origin, breaking at newlines and soft-wrapping at the surface's column
//! capacity. Scrolling does not move the laid-out content; readers subtract
//! scroll offsets themselves when converting to surface-local coordinates.

use std::collections::BTreeMap;

use crate::geometry::Rect;

/// Width of one character cell in pixels.
pub const CHAR_WIDTH: f64 = 8.0;

/// Height of one line in pixels.
pub const LINE_HEIGHT: f64 = 16.0;

/// A character cell position: visual line and column, both 0-indexed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharPos {
    pub line: usize,
    pub col: usize,
}

impl CharPos {
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// Column capacity of a surface given its content width. Always at least 1
/// so layout can make progress on degenerate bounds.
pub fn wrap_columns(width: f64) -> usize {
    ((width / CHAR_WIDTH).floor() as usize).max(1)
}

/// Walk `text` one character at a time, yielding each character together
/// with its cell position. Newlines occupy a cell position at the end of
/// their line (they are real characters for offset math) but have no width.
fn walk(text: &str, max_cols: usize, mut visit: impl FnMut(usize, char, CharPos)) -> CharPos {
    let mut pos = CharPos::default();
    for (index, ch) in text.chars().enumerate() {
        if ch != '\n' && pos.col >= max_cols {
            pos = CharPos::new(pos.line + 1, 0);
        }
        visit(index, ch, pos);
        if ch == '\n' {
            pos = CharPos::new(pos.line + 1, 0);
        } else {
            pos.col += 1;
        }
    }
    if pos.col >= max_cols.max(1) && max_cols != usize::MAX {
        // Caret past the wrap point sits at the start of the next line
        pos = CharPos::new(pos.line + 1, 0);
    }
    pos
}

/// Cell position of the caret at character `offset` (clamped to text end).
pub fn caret_pos(text: &str, max_cols: usize, offset: usize) -> CharPos {
    let mut found = None;
    let end = walk(text, max_cols, |index, _, pos| {
        if index == offset {
            found = Some(pos);
        }
    });
    found.unwrap_or(end)
}

/// Per-visual-line rectangles for the rendered characters in
/// `[start, end)`, in viewport coordinates anchored at `bounds`' origin.
///
/// One rectangle per visual line touched by the span, emitted top-to-bottom
/// (the ordering contract of selection children). Newline characters
/// contribute no width, so a span covering only a line break yields no
/// rectangle for it.
pub fn span_rects(text: &str, max_cols: usize, start: usize, end: usize, bounds: &Rect) -> Vec<Rect> {
    if start >= end {
        return Vec::new();
    }
    // line -> (first col, last col) of covered non-newline cells
    let mut lines: BTreeMap<usize, (usize, usize)> = BTreeMap::new();
    walk(text, max_cols, |index, ch, pos| {
        if index < start || index >= end || ch == '\n' {
            return;
        }
        lines
            .entry(pos.line)
            .and_modify(|(lo, hi)| {
                *lo = (*lo).min(pos.col);
                *hi = (*hi).max(pos.col);
            })
            .or_insert((pos.col, pos.col));
    });
    lines
        .into_iter()
        .map(|(line, (lo, hi))| {
            Rect::from_edges(
                bounds.left + lo as f64 * CHAR_WIDTH,
                bounds.top + line as f64 * LINE_HEIGHT,
                bounds.left + (hi + 1) as f64 * CHAR_WIDTH,
                bounds.top + (line + 1) as f64 * LINE_HEIGHT,
            )
        })
        .collect()
}

/// Minimal scroll adjustment bringing the caret cell into the visible frame.
/// Returns the new `(scroll_x, scroll_y)`.
pub fn scroll_into_view(bounds: &Rect, scroll_x: f64, scroll_y: f64, caret: CharPos) -> (f64, f64) {
    let caret_x = caret.col as f64 * CHAR_WIDTH;
    let caret_y = caret.line as f64 * LINE_HEIGHT;

    let mut new_x = scroll_x;
    if caret_x < new_x {
        new_x = caret_x;
    } else if caret_x + CHAR_WIDTH > new_x + bounds.width {
        new_x = caret_x + CHAR_WIDTH - bounds.width;
    }

    let mut new_y = scroll_y;
    if caret_y < new_y {
        new_y = caret_y;
    } else if caret_y + LINE_HEIGHT > new_y + bounds.height {
        new_y = caret_y + LINE_HEIGHT - bounds.height;
    }

    (new_x.max(0.0), new_y.max(0.0))
}
