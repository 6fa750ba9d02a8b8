//! Reading selection state: normalization to linear offsets and geometry.
//!
//! Field surfaces store offsets natively, so reading them is a direct copy.
//! Structured surfaces have no native linear index; offsets are derived by
//! the two-pass prefix-length measurement: clone the active range, expand it
//! to cover the whole surface subtree, shrink its end to each original
//! boundary in turn, and measure the rendered length of what remains.
//!
//! Geometry for field surfaces is borrowed through a transient shadow
//! surface, because only structured surfaces expose per-line rectangles.
//! The shadow is removed and the field's own selection silently restored on
//! every exit path, so a geometry query never observably changes the
//! surface it measures.

use tracing::trace;

use crate::dom::DomRange;
use crate::error::SelectionError;
use crate::geometry::{clamp_rect, relative_rect, Position, Rect};
use crate::host::Host;
use crate::selection::write::{self, SetSelectionOptions};
use crate::selection::{Direction, NativeSelectionSnapshot, NormalizedSelection, SelectionRectResult};
use crate::surface::{Surface, SurfaceId};

/// Read the normalized selection of a surface (or of the focused surface
/// when none is given).
///
/// Absence of a native selection is not an error: it reads as the degenerate
/// `{text: "", start: 0, end: 0}`. A document-level selection living on a
/// different surface than the target reads the same way.
pub fn get_selection(
    host: &Host,
    surface: Option<SurfaceId>,
) -> Result<NormalizedSelection, SelectionError> {
    let target = host.resolve_target(surface)?;
    let s = host.surface(target)?;
    if s.is_field() {
        Ok(field_selection(s))
    } else {
        Ok(rich_selection(host, target))
    }
}

fn field_selection(surface: &Surface) -> NormalizedSelection {
    let Some(field) = surface.field() else {
        return NormalizedSelection::empty();
    };
    let (start, end) = field.selection_offsets();
    NormalizedSelection {
        text: field.slice(start, end),
        start,
        end,
        direction: field.direction(),
    }
}

fn rich_selection(host: &Host, target: SurfaceId) -> NormalizedSelection {
    let Some((range_surface, range)) = host.ordered_range() else {
        return NormalizedSelection::empty();
    };
    if range_surface != target {
        return NormalizedSelection::empty();
    }
    let Ok(root) = host.rich_root(target) else {
        return NormalizedSelection::empty();
    };
    let arena = host.arena();

    // Two-pass prefix measurement: the rendered length from the surface
    // start to each boundary is that boundary's linear offset.
    let mut pre_caret = DomRange::select_node_contents(arena, root);
    pre_caret.set_end(range.start);
    let start = pre_caret.len_chars(arena);
    pre_caret.set_end(range.end);
    let end = pre_caret.len_chars(arena);
    trace!(?target, start, end, "measured structured selection offsets");

    // Serialized markup keeps formatting for re-insertion; plain text is the
    // fallback when the fragment serializes to nothing.
    let markup = range.contents_markup(arena);
    let text = if markup.is_empty() {
        range.to_text(arena)
    } else {
        markup
    };

    NormalizedSelection {
        text,
        start,
        end,
        direction: Some(Direction::None),
    }
}

/// Capture the document-level selection as a node-identity snapshot. This is
/// the only representation that can re-anchor a structured selection exactly
/// when its boundaries sit between adjacent nodes.
pub fn get_native_selection(host: &Host) -> Option<NativeSelectionSnapshot> {
    host.native_selection().map(|sel| NativeSelectionSnapshot {
        start_node: sel.anchor.node,
        start_offset: sel.anchor.offset,
        end_node: sel.focus.node,
        end_offset: sel.focus.offset,
    })
}

/// Compute the visual rectangles of a surface's selection without leaving
/// any observable change behind.
///
/// `current` spares a re-read when the caller already holds the normalized
/// selection; for field surfaces it is also what gets silently restored
/// afterwards.
pub fn get_selection_rect(
    host: &mut Host,
    surface: Option<SurfaceId>,
    current: Option<&NormalizedSelection>,
) -> Result<SelectionRectResult, SelectionError> {
    let target = host.resolve_target(surface)?;
    if !host.surface(target)?.is_field() {
        return Ok(compute_rects(host, target));
    }

    let (start, end, direction) = match current {
        Some(sel) => (sel.start, sel.end, sel.direction),
        None => {
            let sel = get_selection(host, Some(target))?;
            (sel.start, sel.end, sel.direction)
        }
    };

    // Shadow lifetime: inserted here, removed below with the field's own
    // selection restored, with no early return in between.
    let shadow = host.insert_shadow_for_field(target)?;
    let applied = write::set_selection_rich(
        host,
        shadow,
        &SetSelectionOptions {
            start,
            end,
            direction: Some(direction.unwrap_or(Direction::None)),
            no_effect: true,
        },
    );
    let result = if applied.is_ok() {
        compute_rects(host, target)
    } else {
        SelectionRectResult::empty()
    };
    host.remove_surface(shadow);
    let restored = write::set_selection(
        host,
        target,
        &SetSelectionOptions {
            start,
            end,
            direction,
            no_effect: true,
        },
    );
    applied?;
    restored?;
    Ok(result)
}

/// Rectangle extraction over the active document-level range, reported in
/// `target`'s coordinate space.
///
/// The union box is clamped to the target's bounds. Each per-line client
/// rect is first converted into the target's scrolled coordinates (skipped
/// for single-line fields, whose shadow already accounts for scrolling),
/// then clamped; rects falling entirely outside the bounds are dropped.
/// `start`/`end` are taken from the first/last reported fragments, before
/// dropping, defaulting to the origin when those fragments clamp away.
fn compute_rects(host: &Host, target: SurfaceId) -> SelectionRectResult {
    let Ok(surface) = host.surface(target) else {
        return SelectionRectResult::empty();
    };
    let Some((range_surface, range)) = host.ordered_range() else {
        return SelectionRectResult::empty();
    };

    let raw = host.range_client_rects(range_surface, &range);
    let bound = surface.bounds;

    let union = raw.iter().copied().reduce(|a, b| {
        Rect::from_edges(
            a.left.min(b.left),
            a.top.min(b.top),
            a.right.max(b.right),
            a.bottom.max(b.bottom),
        )
    });
    let rect = union.and_then(|u| clamp_rect(u, bound));

    let adjust_scroll = !surface.is_single_line_field();
    let mapped: Vec<Option<Rect>> = raw
        .iter()
        .map(|r| {
            let r = if adjust_scroll {
                relative_rect(*r, surface.scroll_x, surface.scroll_y)
            } else {
                *r
            };
            clamp_rect(r, bound)
        })
        .collect();

    let start = mapped
        .first()
        .copied()
        .flatten()
        .map(|r| r.top_left())
        .unwrap_or_else(Position::zero);
    let end = mapped
        .last()
        .copied()
        .flatten()
        .map(|r| r.bottom_right())
        .unwrap_or_else(Position::zero);
    let children = mapped.into_iter().flatten().collect();

    SelectionRectResult {
        rect,
        children,
        start,
        end,
    }
}
