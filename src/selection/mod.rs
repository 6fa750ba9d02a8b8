//! Unified selection model over editable surfaces.
//!
//! The core shapes live here; the operations are split by concern the way
//! the algorithms compose:
//!
//! - [`read`]: normalize native selection state into linear offsets and
//!   compute selection geometry.
//! - [`write`]: re-apply a selection to either surface kind, optionally in
//!   silent mode.
//! - [`keep`]: retain a selection across focus loss.
//! - [`remove`]: delete the spanned content.

pub mod keep;
pub mod read;
pub mod remove;
pub mod write;

pub use keep::{keep_selection, BlurCallback, BoundRegion, KeepSelection, KeepSelectionOptions};
pub use read::{get_native_selection, get_selection, get_selection_rect};
pub use remove::{remove_selection_content, RemoveSelectionOptions};
pub use write::{
    set_selection, set_selection_node, set_selection_rich, SetSelectionNodeOptions,
    SetSelectionOptions,
};

use serde::{Deserialize, Serialize};

use crate::dom::Boundary;
use crate::geometry::{Position, Rect};

/// Reported selection directionality.
///
/// `None` is a real platform value (a selection with no directionality), not
/// the absence of a report; absence is modeled as `Option::None` around this
/// enum. Structured surfaces always report `Direction::None` because their
/// range boundaries carry no reliable directionality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
    None,
}

/// Selection state in the surface-independent linear-offset coordinate
/// system.
///
/// Invariant: `start <= end`. For field surfaces `text` is exactly the
/// selected value slice, so `text.chars().count() == end - start`. For
/// structured surfaces `text` is the serialized markup fragment of the
/// spanned range; its rendered length need not equal `end - start` because
/// structural markup is preserved for re-insertion but not counted as
/// characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSelection {
    pub text: String,
    pub start: usize,
    pub end: usize,
    pub direction: Option<Direction>,
}

impl NormalizedSelection {
    /// The degenerate no-selection value. Reading a surface with no native
    /// selection yields this rather than an error.
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            start: 0,
            end: 0,
            direction: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Visual geometry of a selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionRectResult {
    /// Union bounding box, clamped to the owning surface's bounds. `None`
    /// when there is no usable range or the union lies entirely outside the
    /// surface's visible frame.
    pub rect: Option<Rect>,
    /// Per-visual-line fragment rectangles, each independently clamped, in
    /// native reporting order (top-to-bottom).
    pub children: Vec<Rect>,
    /// Caret-equivalent point at the first fragment (its top-left).
    pub start: Position,
    /// Caret-equivalent point at the last fragment (its bottom-right).
    pub end: Position,
}

impl SelectionRectResult {
    pub(crate) fn empty() -> Self {
        Self {
            rect: None,
            children: Vec::new(),
            start: Position::zero(),
            end: Position::zero(),
        }
    }
}

/// Node-identity anchor/focus pair of a structured surface's selection.
///
/// Linear offsets alone cannot re-anchor a selection faithfully: the same
/// offset can sit at the boundary of two adjacent nodes. This snapshot is
/// the representation writers prefer when restoring onto a structured
/// surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeSelectionSnapshot {
    pub start_node: crate::dom::NodeId,
    pub start_offset: usize,
    pub end_node: crate::dom::NodeId,
    pub end_offset: usize,
}

impl NativeSelectionSnapshot {
    pub(crate) fn anchor(&self) -> Boundary {
        Boundary::new(self.start_node, self.start_offset)
    }

    pub(crate) fn focus(&self) -> Boundary {
        Boundary::new(self.end_node, self.end_offset)
    }
}
