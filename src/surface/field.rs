//! Field surface state: a plain-text entry control whose selection is a pair
//! of character offsets.

use ropey::Rope;

use crate::selection::Direction;

/// State of a field-type surface. The value lives in a rope so multi-line
/// fields stay cheap to slice and splice.
#[derive(Debug, Clone)]
pub struct FieldState {
    value: Rope,
    multi_line: bool,
    pub(crate) selection_start: usize,
    pub(crate) selection_end: usize,
    pub(crate) direction: Option<Direction>,
}

impl FieldState {
    pub fn new(value: &str, multi_line: bool) -> Self {
        let mut state = Self {
            value: Rope::new(),
            multi_line,
            selection_start: 0,
            selection_end: 0,
            direction: None,
        };
        state.set_value(value);
        state
    }

    pub fn multi_line(&self) -> bool {
        self.multi_line
    }

    pub fn value(&self) -> String {
        self.value.to_string()
    }

    pub fn len_chars(&self) -> usize {
        self.value.len_chars()
    }

    /// Replace the whole value. Single-line fields reject line breaks the
    /// way the corresponding native control does.
    pub fn set_value(&mut self, value: &str) {
        let text = if self.multi_line {
            value.to_string()
        } else {
            value.replace(['\n', '\r'], "")
        };
        self.value = Rope::from_str(&text);
        let len = self.len_chars();
        self.selection_start = self.selection_start.min(len);
        self.selection_end = self.selection_end.min(len);
    }

    /// Character slice of the value.
    pub fn slice(&self, start: usize, end: usize) -> String {
        let len = self.len_chars();
        let start = start.min(len);
        let end = end.min(len);
        if start >= end {
            return String::new();
        }
        self.value.slice(start..end).to_string()
    }

    /// Remove the characters in `[start, end)`.
    pub fn splice_out(&mut self, start: usize, end: usize) {
        let len = self.len_chars();
        let start = start.min(len);
        let end = end.min(len);
        if start < end {
            self.value.remove(start..end);
        }
        let len = self.len_chars();
        self.selection_start = self.selection_start.min(len);
        self.selection_end = self.selection_end.min(len);
    }

    /// Store a selection. Offsets are clamped to the value length and
    /// ordered so `selection_start <= selection_end` always holds.
    pub fn select(&mut self, start: usize, end: usize, direction: Option<Direction>) {
        let len = self.len_chars();
        let start = start.min(len);
        let end = end.min(len);
        self.selection_start = start.min(end);
        self.selection_end = start.max(end);
        self.direction = direction;
    }

    /// Collapse the selection to its end offset (what focus loss does to the
    /// visible selection when nothing restores it).
    pub fn collapse_selection(&mut self) {
        self.selection_start = self.selection_end;
    }

    pub fn selection_offsets(&self) -> (usize, usize) {
        (self.selection_start, self.selection_end)
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }
}
