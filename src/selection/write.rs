//! Re-applying selection state to a surface.
//!
//! Every writer takes `no_effect`: when set, the selection is applied
//! without the user-visible side effect of scrolling the caret into view.
//! The reader's shadow path and the retention controller always write in
//! silent mode so the surface is never observably disturbed.

use tracing::trace;

use crate::dom::layout;
use crate::error::SelectionError;
use crate::host::Host;
use crate::selection::{Direction, NativeSelectionSnapshot};
use crate::surface::SurfaceId;

/// Options for offset-based selection application.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetSelectionOptions {
    pub start: usize,
    pub end: usize,
    pub direction: Option<Direction>,
    /// Suppress visible side effects (scroll-into-view).
    pub no_effect: bool,
}

/// Options for snapshot-based selection application.
#[derive(Debug, Clone, Copy)]
pub struct SetSelectionNodeOptions {
    pub native_selection: NativeSelectionSnapshot,
    /// Suppress visible side effects (scroll-into-view).
    pub no_effect: bool,
}

/// Apply a linear offset range to a field surface.
pub fn set_selection(
    host: &mut Host,
    surface: SurfaceId,
    options: &SetSelectionOptions,
) -> Result<(), SelectionError> {
    let target = host.surface_mut(surface)?;
    let bounds = target.bounds;
    let (scroll_x, scroll_y) = (target.scroll_x, target.scroll_y);
    let wrap = target.wrap;
    let field = target
        .field_mut()
        .ok_or(SelectionError::NotAFieldSurface(surface))?;

    field.select(options.start, options.end, options.direction);
    trace!(?surface, start = options.start, end = options.end, "field selection applied");

    if !options.no_effect {
        let value = field.value();
        let max_cols = if wrap {
            layout::wrap_columns(bounds.width)
        } else {
            usize::MAX
        };
        let caret = layout::caret_pos(&value, max_cols, options.end);
        let (x, y) = layout::scroll_into_view(&bounds, scroll_x, scroll_y, caret);
        let target = host.surface_mut(surface)?;
        target.scroll_x = x;
        target.scroll_y = y;
    }
    Ok(())
}

/// Apply a linear offset range to a structured surface by reconstructing
/// node-level boundaries from the offsets.
///
/// The reconstruction is the lossy direction of the dual representation: an
/// offset that falls exactly between two adjacent nodes resolves into the
/// earlier one. Callers holding a [`NativeSelectionSnapshot`] should use
/// [`set_selection_node`] instead.
pub fn set_selection_rich(
    host: &mut Host,
    surface: SurfaceId,
    options: &SetSelectionOptions,
) -> Result<(), SelectionError> {
    let root = host.rich_root(surface)?;

    let start = options.start.min(options.end);
    let end = options.start.max(options.end);
    let start_boundary = host.arena().boundary_at(root, start);
    let end_boundary = host.arena().boundary_at(root, end);

    // A backward selection anchors at its end and focuses its start.
    let (anchor, focus) = match options.direction {
        Some(Direction::Backward) => (end_boundary, start_boundary),
        _ => (start_boundary, end_boundary),
    };
    host.set_native_selection(surface, anchor, focus)?;
    trace!(?surface, start, end, "structured selection applied");

    if !options.no_effect {
        scroll_focus_into_view(host, surface, end)?;
    }
    Ok(())
}

/// Re-apply a previously captured node-level snapshot directly, bypassing
/// linear-offset reconstruction.
pub fn set_selection_node(
    host: &mut Host,
    options: &SetSelectionNodeOptions,
) -> Result<(), SelectionError> {
    let snapshot = options.native_selection;
    let root = host.arena().root_of(snapshot.start_node);
    let surface = host
        .surface_owning_root(root)
        .ok_or(SelectionError::SnapshotWithoutSurface)?;
    host.set_native_selection(surface, snapshot.anchor(), snapshot.focus())?;
    trace!(?surface, "native snapshot re-applied");

    if !options.no_effect {
        let focus_offset = host
            .arena()
            .linear_offset(root, snapshot.focus())
            .unwrap_or(0);
        scroll_focus_into_view(host, surface, focus_offset)?;
    }
    Ok(())
}

fn scroll_focus_into_view(
    host: &mut Host,
    surface: SurfaceId,
    offset: usize,
) -> Result<(), SelectionError> {
    let root = host.rich_root(surface)?;
    let text = host.arena().subtree_text(root);
    let target = host.surface_mut(surface)?;
    let max_cols = if target.wrap {
        layout::wrap_columns(target.bounds.width)
    } else {
        usize::MAX
    };
    let caret = layout::caret_pos(&text, max_cols, offset);
    let (x, y) = layout::scroll_into_view(&target.bounds, target.scroll_x, target.scroll_y, caret);
    target.scroll_x = x;
    target.scroll_y = y;
    Ok(())
}
